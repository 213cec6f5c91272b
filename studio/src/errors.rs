// crewline_studio/src/errors.rs

use crewline::PipelineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Pipeline Error: {source}")]
  Pipeline {
    #[from]
    source: PipelineError,
  },

  #[error("Output Error: {0}")]
  Output(#[from] serde_json::Error),

  #[error("Internal Error: {0}")]
  Internal(String),
}

impl AppError {
  /// The line shown to the user when a command fails.
  ///
  /// Rejected input gets its own message; every other pipeline failure is
  /// reported as a kickoff error.
  pub fn user_message(&self) -> String {
    match self {
      AppError::Pipeline {
        source: PipelineError::Validation(message),
      } => message.clone(),
      AppError::Pipeline {
        source: PipelineError::NotRegistered(name),
      } => format!("Unknown pipeline '{name}'. Run `crewline-studio list` to see the available ones."),
      AppError::Config(message) => message.clone(),
      other => format!("An error occurred during the kickoff process: {other}"),
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use crewline::CompletionError;

  #[test]
  fn validation_errors_show_their_own_message() {
    let err = AppError::from(PipelineError::Validation(
      "Please enter a topic or theme for the post.".to_string(),
    ));
    assert_eq!(err.user_message(), "Please enter a topic or theme for the post.");
  }

  #[test]
  fn run_failures_are_reported_as_kickoff_errors() {
    let err = AppError::from(PipelineError::Completion {
      step_name: "write".to_string(),
      source: CompletionError::Provider {
        status: 429,
        body: "rate limited".to_string(),
      },
    });
    let message = err.user_message();
    assert!(message.starts_with("An error occurred during the kickoff process: "));
    assert!(message.contains("write"));
    assert!(message.contains("rate limited"));
  }
}
