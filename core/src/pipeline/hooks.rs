// crewline/src/pipeline/hooks.rs

//! Contains methods for registering `before_step` and `after_step` observers.
//!
//! Observers are synchronous and see every step of every run of the pipeline,
//! in execution order. They cannot alter the run; they exist for progress
//! reporting (spinners, verbose logs, metrics in the front end).

use crate::core::result::StepResult;
use crate::pipeline::definition::Pipeline;
use tracing::{event, Level};

/// Passed to `before_step` observers just before a step executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepStarted {
  pub pipeline: String,
  pub step_index: usize,
  pub step_name: String,
  pub total_steps: usize,
  pub uses_tool: Option<&'static str>,
}

pub(crate) type BeforeStepHook = Box<dyn Fn(&StepStarted) + Send + Sync>;
pub(crate) type AfterStepHook = Box<dyn Fn(&StepResult) + Send + Sync>;

impl Pipeline {
  /// Registers an observer called before each step executes.
  pub fn before_step(&mut self, hook: impl Fn(&StepStarted) + Send + Sync + 'static) {
    self.before.push(Box::new(hook));
    event!(Level::DEBUG, pipeline = %self.name, count = self.before.len(), "before_step hook registered.");
  }

  /// Registers an observer called with each recorded step result, including
  /// locally recovered failures. Not called for a step that aborts the run.
  pub fn after_step(&mut self, hook: impl Fn(&StepResult) + Send + Sync + 'static) {
    self.after.push(Box::new(hook));
    event!(Level::DEBUG, pipeline = %self.name, count = self.after.len(), "after_step hook registered.");
  }

  pub(crate) fn notify_before(&self, started: &StepStarted) {
    for hook in &self.before {
      hook(started);
    }
  }

  pub(crate) fn notify_after(&self, result: &StepResult) {
    for hook in &self.after {
      hook(result);
    }
  }
}
