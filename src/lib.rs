//! A fit/transform feature selection stage for tabular data.
//!
//! [`FeatureSelector`] asks an [`ImportanceRanker`] for the most important columns of a
//! training table and then projects any table with the same layout onto them.
//!
//! ```
//! use boost_select::{FeatureSelectorOptions, RankRequest, Selection, Table};
//! use std::convert::Infallible;
//! use std::num::NonZeroUsize;
//!
//! let x = Table::new(vec![
//!     ("a", vec![0.0, 1.0]),
//!     ("b", vec![2.0, 3.0]),
//!     ("c", vec![4.0, 5.0]),
//! ])?;
//! let ranker = |request: RankRequest<'_>| -> Result<Selection, Infallible> {
//!     Ok(Selection::from_positions(vec![2, 0], request.features))
//! };
//!
//! let mut selector = FeatureSelectorOptions::new()
//!     .target_count(NonZeroUsize::new(2).unwrap())
//!     .build(ranker);
//! let selected = selector.fit(&x, &[0.0, 1.0])?.transform(&x, None)?;
//! assert_eq!(selected.names(), Some(&["c".to_owned(), "a".to_owned()][..]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub use elimination::{EliminationError, EliminationOptions, ImportanceScorer, RecursiveElimination};
pub use ranker::{EvalSet, ImportanceRanker, RankRequest, Selection};
pub use selector::{FeatureSelector, FeatureSelectorOptions, SelectorError};
pub use table::{Table, TableError};
pub use transformer::{Pipeline, PipelineError, Transformer};

pub mod elimination;

mod ranker;
mod selector;
mod table;
mod transformer;
