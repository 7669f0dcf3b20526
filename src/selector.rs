//! A fit/transform stage keeping the columns an [`ImportanceRanker`] selects.
use crate::ranker::{EvalSet, ImportanceRanker, RankRequest, Selection};
use crate::table::Table;
use crate::transformer::Transformer;
use std::num::NonZeroUsize;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct FeatureSelectorOptions {
    target_count: NonZeroUsize,
    eval_set: Option<EvalSet>,
    verbose: bool,
    check_column_names: bool,
}

impl FeatureSelectorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of columns to keep.
    pub fn target_count(mut self, count: NonZeroUsize) -> Self {
        self.target_count = count;
        self
    }

    /// Sets the held-out data passed through to the ranker.
    pub fn eval_set(mut self, eval_set: EvalSet) -> Self {
        self.eval_set = Some(eval_set);
        self
    }

    /// Lets the ranker report its progress.
    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    /// Makes `transform` verify the names of the selected columns against the ones seen by `fit`.
    pub fn check_column_names(mut self, enabled: bool) -> Self {
        self.check_column_names = enabled;
        self
    }

    pub fn get_target_count(&self) -> NonZeroUsize {
        self.target_count
    }

    pub fn get_eval_set(&self) -> Option<&EvalSet> {
        self.eval_set.as_ref()
    }

    pub fn build<R: ImportanceRanker>(self, ranker: R) -> FeatureSelector<R> {
        FeatureSelector {
            ranker,
            options: self,
            state: State::Unfit,
        }
    }
}

impl Default for FeatureSelectorOptions {
    fn default() -> Self {
        Self {
            target_count: NonZeroUsize::new(15).expect("never fails"),
            eval_set: None,
            verbose: false,
            check_column_names: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Unfit,
    Fitted {
        selection: Selection,

        /// Name of each selected column in the training table, aligned with the positions.
        fitted_names: Vec<Option<String>>,
    },
}

/// Keeps the columns chosen by `R` at fit time and projects later tables onto them.
///
/// Before the first successful [`fit`](FeatureSelector::fit) no column is selected, so
/// [`transform`](FeatureSelector::transform) yields a table without columns.
#[derive(Debug, Clone)]
pub struct FeatureSelector<R> {
    ranker: R,
    options: FeatureSelectorOptions,
    state: State,
}

impl<R: ImportanceRanker> FeatureSelector<R> {
    pub fn new(ranker: R) -> Self {
        FeatureSelectorOptions::default().build(ranker)
    }

    pub fn options(&self) -> &FeatureSelectorOptions {
        &self.options
    }

    pub fn ranker(&self) -> &R {
        &self.ranker
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self.state, State::Fitted { .. })
    }

    /// Positions of the selected columns, in projection order.
    pub fn selected_features(&self) -> &[usize] {
        match &self.state {
            State::Unfit => &[],
            State::Fitted { selection, .. } => &selection.selected_features,
        }
    }

    pub fn selected_feature_names(&self) -> &[String] {
        match &self.state {
            State::Unfit => &[],
            State::Fitted { selection, .. } => &selection.selected_feature_names,
        }
    }

    pub fn eliminated_features(&self) -> &[usize] {
        match &self.state {
            State::Unfit => &[],
            State::Fitted { selection, .. } => &selection.eliminated_features,
        }
    }

    /// Asks the ranker for the most important columns of `features` and commits them.
    ///
    /// Any previous selection is replaced. On error the selector keeps its previous state.
    pub fn fit(
        &mut self,
        features: &Table,
        labels: &[f64],
    ) -> Result<&mut Self, SelectorError<R::Error>> {
        let candidates = match features.names() {
            Some(names) => names,
            None => {
                tracing::debug!("refusing to fit on a table without column names");
                return Err(SelectorError::InvalidInputType);
            }
        };

        tracing::debug!(
            candidates = candidates.len(),
            target_count = self.options.target_count.get(),
            eval_set = self.options.eval_set.is_some(),
            "ranking features"
        );
        let mut selection = self
            .ranker
            .rank(RankRequest {
                candidates,
                features,
                labels,
                target_count: self.options.target_count,
                eval_set: self.options.eval_set.as_ref(),
                verbose: self.options.verbose,
            })
            .map_err(|e| {
                tracing::debug!(error = %e, "importance ranker failed");
                SelectorError::Ranker(e)
            })?;

        let target_count = self.options.target_count.get();
        if selection.selected_features.len() > target_count {
            tracing::warn!(
                returned = selection.selected_features.len(),
                target_count,
                "ranker selected more features than requested; keeping the first ones"
            );
            selection.selected_features.truncate(target_count);
            selection.selected_feature_names.truncate(target_count);
        }

        let fitted_names = selection
            .selected_features
            .iter()
            .map(|&i| features.name(i).map(str::to_owned))
            .collect();

        tracing::debug!(selected = ?selection.selected_features, "committed feature selection");
        self.state = State::Fitted {
            selection,
            fitted_names,
        };
        Ok(self)
    }

    /// Returns a new table with only the selected columns of `features`, in selection order.
    ///
    /// `labels` is accepted for pipeline compatibility and never read.
    pub fn transform(
        &self,
        features: &Table,
        _labels: Option<&[f64]>,
    ) -> Result<Table, SelectorError<R::Error>> {
        if !features.is_named() {
            tracing::debug!("refusing to transform a table without column names");
            return Err(SelectorError::InvalidInputType);
        }

        let (selection, fitted_names) = match &self.state {
            State::Unfit => {
                tracing::trace!(rows = features.rows_len(), "not fitted; keeping no columns");
                return Ok(Table::empty(features.rows_len(), true));
            }
            State::Fitted {
                selection,
                fitted_names,
            } => (selection, fitted_names),
        };

        if self.options.check_column_names {
            Self::check_names(&selection.selected_features, fitted_names, features)?;
        }

        let projected = features.select(&selection.selected_features).map_err(|index| {
            SelectorError::ColumnIndexOutOfRange {
                index,
                columns: features.columns_len(),
            }
        })?;
        tracing::trace!(
            rows = projected.rows_len(),
            columns = projected.columns_len(),
            "projected table"
        );
        Ok(projected)
    }

    /// Fits on `features` and returns its projection.
    pub fn fit_transform(
        &mut self,
        features: &Table,
        labels: &[f64],
    ) -> Result<Table, SelectorError<R::Error>> {
        self.fit(features, labels)?.transform(features, Some(labels))
    }

    fn check_names(
        positions: &[usize],
        fitted_names: &[Option<String>],
        features: &Table,
    ) -> Result<(), SelectorError<R::Error>> {
        debug_assert_eq!(positions.len(), fitted_names.len());
        for (&index, expected) in positions.iter().zip(fitted_names) {
            let found = features
                .name(index)
                .ok_or(SelectorError::ColumnIndexOutOfRange {
                    index,
                    columns: features.columns_len(),
                })?;
            if expected.as_deref() != Some(found) {
                return Err(SelectorError::ColumnNameMismatch {
                    index,
                    expected: expected.clone(),
                    found: found.to_owned(),
                });
            }
        }
        Ok(())
    }
}

impl<R: ImportanceRanker> Transformer for FeatureSelector<R> {
    type Error = SelectorError<R::Error>;

    fn fit(&mut self, features: &Table, labels: &[f64]) -> Result<&mut Self, Self::Error> {
        FeatureSelector::fit(self, features, labels)
    }

    fn transform(&self, features: &Table, labels: Option<&[f64]>) -> Result<Table, Self::Error> {
        FeatureSelector::transform(self, features, labels)
    }
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SelectorError<E> {
    #[error("input must be a table with named columns")]
    InvalidInputType,

    #[error("selected column {index} is out of range for a table with {columns} columns")]
    ColumnIndexOutOfRange { index: usize, columns: usize },

    /// `expected` is `None` when the training table had no column at `index`.
    #[error("selected column {index} was {expected:?} at fit time but is {found:?} now")]
    ColumnNameMismatch {
        index: usize,
        expected: Option<String>,
        found: String,
    },

    #[error(transparent)]
    Ranker(E),
}
