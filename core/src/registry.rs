// crewline/src/registry.rs

//! Defines `PipelineRegistry`, a name-keyed registry for sharing and running
//! pipelines (one per content generator in the front end).

use crate::core::capability::Crew;
use crate::core::context::RunContext;
use crate::core::result::PipelineResult;
use crate::error::PipelineError;
use crate::pipeline::definition::Pipeline;

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Pipelines are stored behind `Arc` and never mutated after registration,
/// so concurrent runs of the same pipeline share nothing mutable.
#[derive(Default)]
pub struct PipelineRegistry {
  registry: RwLock<HashMap<String, Arc<Pipeline>>>,
}

impl PipelineRegistry {
  /// Creates a new, empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `pipeline` under its own name, replacing any pipeline
  /// previously registered under that name.
  pub fn register(&self, pipeline: Pipeline) -> Arc<Pipeline> {
    let name = pipeline.name().to_string();
    let pipeline = Arc::new(pipeline);
    let replaced = self.registry.write().insert(name.clone(), pipeline.clone()).is_some();
    event!(Level::DEBUG, pipeline = %name, replaced, "Registering pipeline.");
    pipeline
  }

  pub fn get(&self, name: &str) -> Option<Arc<Pipeline>> {
    self.registry.read().get(name).cloned()
  }

  /// Registered pipeline names, sorted.
  pub fn names(&self) -> Vec<String> {
    let mut names: Vec<String> = self.registry.read().keys().cloned().collect();
    names.sort();
    names
  }

  pub fn len(&self) -> usize {
    self.registry.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.registry.read().is_empty()
  }

  /// Runs the pipeline registered under `name`.
  #[instrument(name = "PipelineRegistry::run", skip(self, crew, input_text), err(Display))]
  pub async fn run(&self, name: &str, crew: &Crew, input_text: &str) -> Result<PipelineResult, PipelineError> {
    self.run_with_context(name, crew, input_text, &RunContext::new()).await
  }

  pub async fn run_with_context(
    &self,
    name: &str,
    crew: &Crew,
    input_text: &str,
    ctx: &RunContext,
  ) -> Result<PipelineResult, PipelineError> {
    // Clone the Arc out so the registry lock is released before awaiting.
    let pipeline = self.get(name).ok_or_else(|| {
      event!(Level::ERROR, pipeline = %name, "No pipeline registered under this name.");
      PipelineError::NotRegistered(name.to_string())
    })?;
    pipeline.run_with_context(crew, input_text, ctx).await
  }
}

impl std::fmt::Debug for PipelineRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PipelineRegistry").field("pipelines", &self.names()).finish()
  }
}
