//! Recursive feature elimination driven by an external importance scorer.
//!
//! [`RecursiveElimination`] repeatedly asks an [`ImportanceScorer`] to score the remaining
//! candidates and drops the least important ones until `target_count` candidates are left.
//! The scores themselves are never computed here.
use crate::ranker::{EvalSet, ImportanceRanker, RankRequest, Selection};
use crate::table::Table;
use itertools::Itertools as _;
use ordered_float::OrderedFloat;
use std::num::NonZeroUsize;
use thiserror::Error;

/// An external procedure assigning an importance score to every column of a table.
pub trait ImportanceScorer {
    type Error: std::error::Error + 'static;

    /// Returns one score per column of `features`; higher is more important.
    ///
    /// `eval_set`, when given, has the same column layout as `features`.
    fn score(
        &self,
        features: &Table,
        labels: &[f64],
        eval_set: Option<&EvalSet>,
    ) -> Result<Vec<f64>, Self::Error>;
}

#[derive(Debug, Clone)]
pub struct EliminationOptions {
    steps: NonZeroUsize,
}

impl EliminationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of scoring rounds the elimination is spread over.
    pub fn steps(mut self, steps: NonZeroUsize) -> Self {
        self.steps = steps;
        self
    }

    pub fn build<S: ImportanceScorer>(self, scorer: S) -> RecursiveElimination<S> {
        RecursiveElimination {
            scorer,
            options: self,
        }
    }
}

impl Default for EliminationOptions {
    fn default() -> Self {
        Self {
            steps: NonZeroUsize::new(1).expect("never fails"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecursiveElimination<S> {
    scorer: S,
    options: EliminationOptions,
}

impl<S: ImportanceScorer> RecursiveElimination<S> {
    pub fn new(scorer: S) -> Self {
        EliminationOptions::default().build(scorer)
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub fn options(&self) -> &EliminationOptions {
        &self.options
    }

    fn resolve_candidates(
        request: &RankRequest<'_>,
    ) -> Result<Vec<usize>, EliminationError<S::Error>> {
        let positions = request
            .candidates
            .iter()
            .map(|name| {
                request
                    .features
                    .position(name)
                    .ok_or_else(|| EliminationError::UnknownCandidate { name: name.clone() })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(positions.into_iter().unique().collect())
    }

    /// Number of candidates dropped by each round.
    fn round_sizes(&self, eliminations: usize) -> impl Iterator<Item = usize> {
        let rounds = self.options.steps.get().min(eliminations.max(1));
        let base = eliminations / rounds;
        let remainder = eliminations % rounds;
        (0..rounds)
            .map(move |i| if i < remainder { base + 1 } else { base })
            .filter(|&n| n > 0)
    }

    fn score_round(
        &self,
        request: &RankRequest<'_>,
        remaining: &[usize],
    ) -> Result<Vec<f64>, EliminationError<S::Error>> {
        let features = project::<S::Error>(request.features, remaining)?;
        let eval_set = request
            .eval_set
            .map(|eval| {
                project::<S::Error>(&eval.features, remaining)
                    .map(|features| EvalSet::new(features, eval.labels.clone()))
            })
            .transpose()?;

        let scores = self
            .scorer
            .score(&features, request.labels, eval_set.as_ref())
            .map_err(EliminationError::Scorer)?;
        if scores.len() != remaining.len() {
            return Err(EliminationError::ScoreLengthMismatch {
                expected: remaining.len(),
                actual: scores.len(),
            });
        }
        Ok(scores)
    }
}

fn project<E>(table: &Table, positions: &[usize]) -> Result<Table, EliminationError<E>> {
    table
        .select(positions)
        .map_err(|index| EliminationError::EvalColumnMissing { index })
}

impl<S: ImportanceScorer> ImportanceRanker for RecursiveElimination<S> {
    type Error = EliminationError<S::Error>;

    fn rank(&self, request: RankRequest<'_>) -> Result<Selection, Self::Error> {
        if request.labels.len() != request.features.rows_len() {
            return Err(EliminationError::LabelSizeMismatch {
                rows: request.features.rows_len(),
                labels: request.labels.len(),
            });
        }

        let mut remaining = Self::resolve_candidates(&request)?;
        let requested = request.target_count.get();
        if requested > remaining.len() {
            return Err(EliminationError::TooManyFeaturesRequested {
                requested,
                available: remaining.len(),
            });
        }

        let mut eliminated = Vec::new();
        let eliminations = remaining.len() - requested;
        for (round, count) in self.round_sizes(eliminations).enumerate() {
            let scores = self.score_round(&request, &remaining)?;

            // Least important first; among equal scores the later position goes first.
            let dropped = remaining
                .iter()
                .copied()
                .zip(scores)
                .sorted_by_key(|&(position, score)| {
                    (OrderedFloat(score), std::cmp::Reverse(position))
                })
                .take(count)
                .map(|(position, _)| position)
                .collect::<Vec<_>>();
            remaining.retain(|p| !dropped.contains(p));

            if request.verbose {
                tracing::info!(round, ?dropped, remaining = remaining.len(), "eliminated features");
            } else {
                tracing::debug!(round, ?dropped, remaining = remaining.len(), "eliminated features");
            }
            eliminated.extend(dropped);
        }

        remaining.sort_unstable();
        let mut selection = Selection::from_positions(remaining, request.features);
        selection.eliminated_features = eliminated;
        Ok(selection)
    }
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EliminationError<E> {
    #[error("candidate {name:?} is not a column of the training table")]
    UnknownCandidate { name: String },

    #[error("{requested} features were requested but only {available} candidates are available")]
    TooManyFeaturesRequested { requested: usize, available: usize },

    #[error("training table has {rows} rows but {labels} labels were given")]
    LabelSizeMismatch { rows: usize, labels: usize },

    #[error("evaluation table has no column at position {index}")]
    EvalColumnMissing { index: usize },

    #[error("scorer returned {actual} scores for {expected} columns")]
    ScoreLengthMismatch { expected: usize, actual: usize },

    #[error("importance scorer failed")]
    Scorer(#[source] E),
}
