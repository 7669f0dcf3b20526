//! The fit/transform contract shared by pipeline stages.
use crate::table::Table;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A stage that learns from a labelled table once and then rewrites tables.
pub trait Transformer {
    type Error;

    fn fit(&mut self, features: &Table, labels: &[f64]) -> Result<&mut Self, Self::Error>;

    fn transform(&self, features: &Table, labels: Option<&[f64]>) -> Result<Table, Self::Error>;

    fn fit_transform(&mut self, features: &Table, labels: &[f64]) -> Result<Table, Self::Error> {
        self.fit(features, labels)?.transform(features, Some(labels))
    }
}

/// Object safe view of a [`Transformer`], used to store heterogeneous stages.
trait Stage {
    fn fit_stage(&mut self, features: &Table, labels: &[f64]) -> Result<Table, BoxError>;
    fn transform_stage(&self, features: &Table, labels: Option<&[f64]>) -> Result<Table, BoxError>;
}

impl<T> Stage for T
where
    T: Transformer,
    T::Error: std::error::Error + Send + Sync + 'static,
{
    fn fit_stage(&mut self, features: &Table, labels: &[f64]) -> Result<Table, BoxError> {
        Ok(Transformer::fit_transform(self, features, labels)?)
    }

    fn transform_stage(&self, features: &Table, labels: Option<&[f64]>) -> Result<Table, BoxError> {
        Ok(Transformer::transform(self, features, labels)?)
    }
}

/// An ordered sequence of stages, each one fed with the output of the previous one.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage<T>(mut self, stage: T) -> Self
    where
        T: 'static + Transformer,
        T::Error: std::error::Error + Send + Sync + 'static,
    {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages.len())
            .finish()
    }
}

impl Transformer for Pipeline {
    type Error = PipelineError;

    fn fit(&mut self, features: &Table, labels: &[f64]) -> Result<&mut Self, Self::Error> {
        let mut current = features.clone();
        for (i, stage) in self.stages.iter_mut().enumerate() {
            tracing::debug!(stage = i, "fitting pipeline stage");
            current = stage
                .fit_stage(&current, labels)
                .map_err(|source| PipelineError::Stage { stage: i, source })?;
        }
        Ok(self)
    }

    fn transform(&self, features: &Table, labels: Option<&[f64]>) -> Result<Table, Self::Error> {
        let mut current = features.clone();
        for (i, stage) in self.stages.iter().enumerate() {
            current = stage
                .transform_stage(&current, labels)
                .map_err(|source| PipelineError::Stage { stage: i, source })?;
        }
        Ok(current)
    }
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline stage {stage} failed")]
    Stage {
        stage: usize,
        #[source]
        source: BoxError,
    },
}
