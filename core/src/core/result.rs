// crewline/src/core/result.rs

//! Request and result types of a pipeline run.

use crate::error::PipelineError;
use serde::Serialize;

/// The single free-text input of a run (a topic or theme).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRequest {
  input_text: String,
}

impl PipelineRequest {
  /// Builds a request. The text is trimmed and must not be empty.
  pub fn new(input_text: impl AsRef<str>) -> Result<Self, PipelineError> {
    let trimmed = input_text.as_ref().trim();
    if trimmed.is_empty() {
      return Err(PipelineError::Validation(
        "Please enter a topic or theme for the post.".to_string(),
      ));
    }
    Ok(Self {
      input_text: trimmed.to_string(),
    })
  }

  pub fn input_text(&self) -> &str {
    &self.input_text
  }
}

/// Outcome of one executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepResult {
  pub step_name: String,
  pub output_text: String,
  pub ok: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl StepResult {
  pub fn success(step_name: impl Into<String>, output_text: impl Into<String>) -> Self {
    Self {
      step_name: step_name.into(),
      output_text: output_text.into(),
      ok: true,
      error: None,
    }
  }

  pub fn recovered(step_name: impl Into<String>, placeholder: impl Into<String>, error: impl Into<String>) -> Self {
    Self {
      step_name: step_name.into(),
      output_text: placeholder.into(),
      ok: false,
      error: Some(error.into()),
    }
  }
}

/// All step results of a completed run, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineResult {
  pub pipeline: String,
  pub steps: Vec<StepResult>,
  /// Names of the steps a front end should show, in display order.
  pub display: Vec<String>,
}

impl PipelineResult {
  /// Looks a step result up by step name.
  pub fn step(&self, name: &str) -> Option<&StepResult> {
    self.steps.iter().find(|s| s.step_name == name)
  }

  /// The result of the last executed step.
  pub fn final_result(&self) -> Option<&StepResult> {
    self.steps.last()
  }

  /// The designated display steps, resolved by name.
  pub fn displayed(&self) -> Vec<&StepResult> {
    self.display.iter().filter_map(|name| self.step(name)).collect()
  }

  /// True when every step succeeded without a local recovery.
  pub fn all_ok(&self) -> bool {
    self.steps.iter().all(|s| s.ok)
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }
}
