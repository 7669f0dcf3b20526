//! The boundary to the external importance ranking procedure.
use crate::table::Table;
use std::num::NonZeroUsize;

/// Held-out data handed to the ranker to guide the selection.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalSet {
    pub features: Table,
    pub labels: Vec<f64>,
}

impl EvalSet {
    pub fn new(features: Table, labels: Vec<f64>) -> Self {
        Self { features, labels }
    }
}

/// Everything a ranker is given for one selection.
#[derive(Debug, Clone, Copy)]
pub struct RankRequest<'a> {
    /// Names of the columns the ranker may choose from.
    pub candidates: &'a [String],
    pub features: &'a Table,
    pub labels: &'a [f64],
    pub target_count: NonZeroUsize,
    pub eval_set: Option<&'a EvalSet>,

    /// Whether the ranker may report its progress.
    pub verbose: bool,
}

/// Result of a ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Positions of the selected columns, at most `target_count` of them.
    pub selected_features: Vec<usize>,
    pub selected_feature_names: Vec<String>,

    /// Positions of the dropped columns, in the order they were dropped.
    pub eliminated_features: Vec<usize>,
}

impl Selection {
    /// Makes a selection of `positions`, looking their names up in `features`.
    ///
    /// Names stay aligned with `positions`; a position `features` lacks gets an empty name.
    pub fn from_positions(positions: Vec<usize>, features: &Table) -> Self {
        let selected_feature_names = positions
            .iter()
            .map(|&i| features.name(i).unwrap_or_default().to_owned())
            .collect();
        Self {
            selected_features: positions,
            selected_feature_names,
            eliminated_features: Vec::new(),
        }
    }
}

/// An external procedure choosing the most important columns of a table.
///
/// The call is treated as atomic and blocking. How the ranking is computed,
/// including tie breaking, belongs entirely to the implementation.
pub trait ImportanceRanker {
    type Error: std::error::Error + 'static;

    fn rank(&self, request: RankRequest<'_>) -> Result<Selection, Self::Error>;
}

impl<F, E> ImportanceRanker for F
where
    F: Fn(RankRequest<'_>) -> Result<Selection, E>,
    E: std::error::Error + 'static,
{
    type Error = E;

    fn rank(&self, request: RankRequest<'_>) -> Result<Selection, Self::Error> {
        self(request)
    }
}
