// crewline/src/error.rs
use crate::core::control::RunState;
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Failure raised by a text-completion capability.
///
/// There is no retry contract: a `CompletionError` aborts the whole run.
#[derive(Debug, Error)]
pub enum CompletionError {
  #[error("completion provider returned {status}: {body}")]
  Provider { status: u16, body: String },

  #[error("completion response was malformed: {0}")]
  Malformed(String),

  #[error("completion call failed: {source}")]
  Other {
    #[source]
    source: AnyhowError,
  },
}

impl From<AnyhowError> for CompletionError {
  fn from(err: AnyhowError) -> Self {
    CompletionError::Other { source: err }
  }
}

/// Failure raised by a tool capability (search, scrape, image generation).
#[derive(Debug, Error)]
pub enum ToolError {
  #[error("{tool} provider returned {status}: {body}")]
  Provider { tool: String, status: u16, body: String },

  #[error("{tool} cannot handle query: {message}")]
  InvalidQuery { tool: String, message: String },

  #[error("{tool} response was malformed: {message}")]
  Malformed { tool: String, message: String },

  #[error("{tool} call failed: {source}")]
  Other {
    tool: String,
    #[source]
    source: AnyhowError,
  },
}

impl ToolError {
  /// Wraps an arbitrary adapter failure for the named tool.
  pub fn other(tool: impl Into<String>, source: impl Into<AnyhowError>) -> Self {
    ToolError::Other {
      tool: tool.into(),
      source: source.into(),
    }
  }
}

#[derive(Debug, Error)]
pub enum PipelineError {
  /// A step references an undefined or later step, or the pipeline shape is
  /// otherwise unusable. Raised while building the pipeline, never mid-run.
  #[error("Configuration error for step '{step_name}': {message}")]
  Configuration { step_name: String, message: String },

  /// The request was rejected before any step executed.
  #[error("Validation error: {0}")]
  Validation(String),

  /// A step needs a tool the run's crew does not provide.
  #[error("Step '{step_name}' requires the {tool} capability, which this crew does not provide")]
  MissingCapability { step_name: String, tool: String },

  #[error("Tool failed in step '{step_name}': {source}")]
  Tool {
    step_name: String,
    #[source]
    source: ToolError,
  },

  #[error("Completion failed in step '{step_name}': {source}")]
  Completion {
    step_name: String,
    #[source]
    source: CompletionError,
  },

  #[error("No pipeline registered under '{0}'")]
  NotRegistered(String),

  /// A `RunContext` carries exactly one run; this one was already used.
  #[error("Run context is not fresh (state: {state}); use a new RunContext per run")]
  ContextInUse { state: RunState },
}

impl PipelineError {
  pub(crate) fn configuration(step_name: impl Into<String>, message: impl Into<String>) -> Self {
    PipelineError::Configuration {
      step_name: step_name.into(),
      message: message.into(),
    }
  }

  /// Name of the step the error is attributed to, if any.
  pub fn step_name(&self) -> Option<&str> {
    match self {
      PipelineError::Configuration { step_name, .. }
      | PipelineError::MissingCapability { step_name, .. }
      | PipelineError::Tool { step_name, .. }
      | PipelineError::Completion { step_name, .. } => Some(step_name),
      PipelineError::Validation(_) | PipelineError::NotRegistered(_) | PipelineError::ContextInUse { .. } => None,
    }
  }

  /// True for errors raised before any capability was invoked.
  pub fn is_pre_execution(&self) -> bool {
    matches!(
      self,
      PipelineError::Configuration { .. }
        | PipelineError::Validation(_)
        | PipelineError::MissingCapability { .. }
        | PipelineError::NotRegistered(_)
        | PipelineError::ContextInUse { .. }
    )
  }
}

pub type CrewResult<T, E = PipelineError> = std::result::Result<T, E>;
