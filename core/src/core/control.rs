// crewline/src/core/control.rs

//! Lifecycle of a single pipeline run.

use std::fmt;

/// `Pending -> Running(step 0..n) -> Completed | Failed`.
///
/// Steps are never skipped or reordered and a run cannot be cancelled, so a
/// run either reaches `Completed` or stops at the first fatal step error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
  Pending,
  Running { step_index: usize, step_name: String },
  Completed,
  Failed { step_name: Option<String> },
}

impl RunState {
  pub fn is_terminal(&self) -> bool {
    matches!(self, RunState::Completed | RunState::Failed { .. })
  }
}

impl fmt::Display for RunState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RunState::Pending => write!(f, "pending"),
      RunState::Running { step_index, step_name } => write!(f, "running step {step_index} ({step_name})"),
      RunState::Completed => write!(f, "completed"),
      RunState::Failed { step_name: Some(step) } => write!(f, "failed at step '{step}'"),
      RunState::Failed { step_name: None } => write!(f, "failed before any step"),
    }
  }
}
