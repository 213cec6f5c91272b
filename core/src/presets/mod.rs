// crewline/src/presets/mod.rs

//! The four content generators, as static pipeline configurations.
//!
//! Step order is declared explicitly in each preset and results are looked
//! up by step name, never by position.

use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use crate::registry::PipelineRegistry;

pub mod blog;
pub mod instagram;
pub mod linkedin;
pub mod twitter;

pub const INSTAGRAM: &str = "instagram";
pub const BLOG: &str = "blog";
pub const LINKEDIN: &str = "linkedin";
pub const TWITTER: &str = "twitter";

/// Builds every preset, unregistered, so callers can attach hooks or a step
/// timeout first.
pub fn all() -> Result<Vec<Pipeline>, PipelineError> {
  Ok(vec![
    instagram::pipeline()?,
    blog::pipeline()?,
    linkedin::pipeline()?,
    twitter::pipeline()?,
  ])
}

/// Registers every preset with `registry`.
pub fn register_all(registry: &PipelineRegistry) -> Result<(), PipelineError> {
  tracing::info!("Registering content pipelines...");

  for pipeline in all()? {
    registry.register(pipeline);
  }

  tracing::info!(count = registry.len(), "All content pipelines registered.");
  Ok(())
}
