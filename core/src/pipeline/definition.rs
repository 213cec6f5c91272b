// crewline/src/pipeline/definition.rs

//! Contains the `Pipeline` struct definition and its validated construction.

use crate::core::step::StepSpec;
use crate::error::PipelineError;
use crate::pipeline::hooks::{AfterStepHook, BeforeStepHook};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{event, Level};

/// An ordered, validated list of steps.
///
/// A `Pipeline` is immutable configuration: it is built once, may be shared
/// (usually behind an `Arc`) and run concurrently by any number of requests.
/// Every step reference is checked in [`Pipeline::new`], so a run never
/// meets an undefined or out-of-order reference.
pub struct Pipeline {
  pub(crate) name: String,
  pub(crate) description: String,
  pub(crate) steps: Vec<StepSpec>,
  pub(crate) display: Vec<String>,
  pub(crate) step_timeout: Option<Duration>,
  pub(crate) preferred_model: Option<String>,

  pub(crate) before: Vec<BeforeStepHook>,
  pub(crate) after: Vec<AfterStepHook>,
}

impl Pipeline {
  /// Builds a pipeline from steps in execution order.
  ///
  /// Fails with [`PipelineError::Configuration`] when the list is empty, a
  /// step name is blank or repeated, or a step references (through a
  /// template placeholder or its context scope) a step that is not declared
  /// strictly before it.
  pub fn new(name: impl Into<String>, steps: Vec<StepSpec>) -> Result<Self, PipelineError> {
    let name = name.into();
    if steps.is_empty() {
      return Err(PipelineError::configuration(
        name.as_str(),
        "a pipeline needs at least one step",
      ));
    }

    let mut declared: HashSet<&str> = HashSet::new();
    for (idx, step) in steps.iter().enumerate() {
      if step.name.trim().is_empty() {
        return Err(PipelineError::configuration(
          format!("#{idx}"),
          "step names must not be empty",
        ));
      }
      if declared.contains(step.name.as_str()) {
        return Err(PipelineError::configuration(
          step.name.as_str(),
          "step name is declared more than once",
        ));
      }

      for dep in step.dependencies() {
        if dep == step.name {
          return Err(PipelineError::configuration(
            step.name.as_str(),
            "a step cannot reference its own output",
          ));
        }
        if !declared.contains(dep) {
          let message = if steps.iter().any(|s| s.name == dep) {
            format!("references step '{dep}', which runs later")
          } else {
            format!("references undefined step '{dep}'")
          };
          return Err(PipelineError::configuration(step.name.as_str(), message));
        }
      }
      declared.insert(step.name.as_str());
    }

    let last = steps.last().map(|s| s.name.clone()).unwrap_or_default();
    event!(Level::DEBUG, pipeline = %name, num_steps = steps.len(), "Pipeline defined.");

    Ok(Self {
      name,
      description: String::new(),
      steps,
      display: vec![last],
      step_timeout: None,
      preferred_model: None,
      before: Vec::new(),
      after: Vec::new(),
    })
  }

  /// Designates the steps a front end should show, in display order.
  /// Defaults to the last step.
  pub fn display(mut self, step_names: &[&str]) -> Result<Self, PipelineError> {
    if step_names.is_empty() {
      return Err(PipelineError::configuration(
        self.name.as_str(),
        "at least one display step is required",
      ));
    }
    for name in step_names {
      if !self.has_step(name) {
        return Err(PipelineError::configuration(
          *name,
          "display step is not declared in the pipeline",
        ));
      }
    }
    self.display = step_names.iter().map(|s| (*s).to_string()).collect();
    Ok(self)
  }

  /// Bounds each step's tool or completion call. An elapsed step is recorded
  /// as a failed step and the run continues.
  pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
    self.step_timeout = Some(timeout);
    self
  }

  /// Records the completion model this pipeline was written for. Front ends
  /// use it when building the run's completion capability.
  pub fn with_preferred_model(mut self, model: impl Into<String>) -> Self {
    self.preferred_model = Some(model.into());
    self
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = description.into();
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn steps(&self) -> &[StepSpec] {
    &self.steps
  }

  pub fn step_names(&self) -> impl Iterator<Item = &str> {
    self.steps.iter().map(|s| s.name.as_str())
  }

  pub fn display_steps(&self) -> &[String] {
    &self.display
  }

  pub fn step_timeout(&self) -> Option<Duration> {
    self.step_timeout
  }

  pub fn preferred_model(&self) -> Option<&str> {
    self.preferred_model.as_deref()
  }

  /// True when any step invokes `tool`'s kind of capability.
  pub fn uses_tool(&self, tool_name: &str) -> bool {
    self.steps.iter().filter_map(|s| s.tool).any(|t| t.name() == tool_name)
  }

  pub(crate) fn has_step(&self, step_name: &str) -> bool {
    self.steps.iter().any(|s| s.name == step_name)
  }
}

impl std::fmt::Debug for Pipeline {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pipeline")
      .field("name", &self.name)
      .field("steps", &self.step_names().collect::<Vec<_>>())
      .field("display", &self.display)
      .field("step_timeout", &self.step_timeout)
      .field("preferred_model", &self.preferred_model)
      .field("before_hooks", &self.before.len())
      .field("after_hooks", &self.after.len())
      .finish()
  }
}
