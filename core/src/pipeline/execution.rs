// crewline/src/pipeline/execution.rs

//! Contains `Pipeline::run()`, which executes the steps strictly in declared
//! order and threads each step's output forward as context.
//!
//! Failure policy:
//! - A tool with a local recovery (image generation) records a failed step
//!   with its placeholder output and the run continues.
//! - An elapsed per-step timeout is treated the same way.
//! - Any other tool error and every completion error abort the run. Partial
//!   results are discarded and the caller receives a single error.

use crate::core::capability::Crew;
use crate::core::context::RunContext;
use crate::core::control::RunState;
use crate::core::result::{PipelineRequest, PipelineResult, StepResult};
use crate::core::step::{ContextScope, StepSpec};
use crate::error::PipelineError;
use crate::pipeline::definition::Pipeline;
use crate::pipeline::hooks::StepStarted;
use tracing::{event, instrument, span, Instrument, Level};

/// Output recorded for a step whose call exceeded the pipeline's step timeout.
pub const STEP_TIMEOUT_SENTINEL: &str = "Step timed out.";

/// Everything a step call needs, rendered from this run's prior results up
/// front.
struct PreparedStep {
  role_description: String,
  prompt: String,
  tool_query: String,
  context: Vec<String>,
}

impl Pipeline {
  /// Runs the pipeline for `input_text` with the capabilities in `crew`.
  ///
  /// Returns every step result in execution order. Blank input is rejected
  /// with [`PipelineError::Validation`] and a crew lacking a tool some step
  /// needs with [`PipelineError::MissingCapability`]; in both cases no
  /// capability is invoked.
  pub async fn run(&self, crew: &Crew, input_text: &str) -> Result<PipelineResult, PipelineError> {
    self.run_with_context(crew, input_text, &RunContext::new()).await
  }

  /// Like [`Pipeline::run`], recording progress into a caller-held
  /// [`RunContext`] that other tasks may observe while the run is in flight.
  ///
  /// The context must be fresh: one that already carried a run is rejected
  /// with [`PipelineError::ContextInUse`] and left untouched.
  #[instrument(
        name = "Pipeline::run",
        skip_all,
        fields(
            pipeline = %self.name,
            num_steps = self.steps.len(),
        ),
        err(Display)
    )]
  pub async fn run_with_context(
    &self,
    crew: &Crew,
    input_text: &str,
    ctx: &RunContext,
  ) -> Result<PipelineResult, PipelineError> {
    let first = RunState::Running {
      step_index: 0,
      step_name: self.steps.first().map(|s| s.name.clone()).unwrap_or_default(),
    };
    if let Err(state) = ctx.claim(first) {
      event!(Level::ERROR, %state, "Run context was already used.");
      return Err(PipelineError::ContextInUse { state });
    }

    let request = match PipelineRequest::new(input_text) {
      Ok(request) => request,
      Err(e) => {
        event!(Level::WARN, "Rejected blank input before any step.");
        ctx.set_state(RunState::Failed { step_name: None });
        return Err(e);
      }
    };

    if let Err(e) = self.check_crew(crew) {
      event!(Level::ERROR, error = %e, "Crew cannot serve this pipeline.");
      ctx.set_state(RunState::Failed { step_name: None });
      return Err(e);
    }

    event!(Level::DEBUG, "Pipeline execution starting.");

    // This run's results; the shared context only mirrors them for observers.
    let mut results: Vec<StepResult> = Vec::with_capacity(self.steps.len());
    for (step_idx, step) in self.steps.iter().enumerate() {
      let step_span = span!(
        Level::INFO,
        "pipeline_step_execution",
        step_name = step.name.as_str(),
        step_index = step_idx,
        tool = step.tool.map(|t| t.name()).unwrap_or("completion"),
      );

      match self.execute_step(crew, &request, ctx, &results, step_idx, step).instrument(step_span).await {
        Ok(result) => {
          self.notify_after(&result);
          ctx.push(result.clone());
          results.push(result);
        }
        Err(e) => {
          event!(Level::ERROR, step_name = %step.name, error = %e, "Step failed, aborting run.");
          ctx.set_state(RunState::Failed {
            step_name: Some(step.name.clone()),
          });
          ctx.discard_results();
          return Err(e);
        }
      }
    }

    ctx.set_state(RunState::Completed);
    event!(Level::DEBUG, "Pipeline execution completed successfully.");
    Ok(PipelineResult {
      pipeline: self.name.clone(),
      steps: results,
      display: self.display.clone(),
    })
  }

  fn check_crew(&self, crew: &Crew) -> Result<(), PipelineError> {
    for step in &self.steps {
      if let Some(tool) = step.tool {
        if !tool.is_provided_by(crew) {
          return Err(PipelineError::MissingCapability {
            step_name: step.name.clone(),
            tool: tool.name().to_string(),
          });
        }
      }
    }
    Ok(())
  }

  async fn execute_step(
    &self,
    crew: &Crew,
    request: &PipelineRequest,
    ctx: &RunContext,
    prior: &[StepResult],
    step_idx: usize,
    step: &StepSpec,
  ) -> Result<StepResult, PipelineError> {
    ctx.set_state(RunState::Running {
      step_index: step_idx,
      step_name: step.name.clone(),
    });
    self.notify_before(&StepStarted {
      pipeline: self.name.clone(),
      step_index: step_idx,
      step_name: step.name.clone(),
      total_steps: self.steps.len(),
      uses_tool: step.tool.map(|t| t.name()),
    });
    event!(Level::DEBUG, "Processing step.");

    let prepared = prepare(step, request.input_text(), prior);

    let call = async {
      match step.tool {
        Some(tool) => match tool.invoke(crew, &prepared.tool_query).await {
          Ok(output) => Ok(StepResult::success(step.name.as_str(), output)),
          Err(e) => match tool.recovery() {
            Some(placeholder) => {
              event!(Level::WARN, tool = tool.name(), error = %e, "Tool failed, recording placeholder output.");
              Ok(StepResult::recovered(step.name.as_str(), placeholder, e.to_string()))
            }
            None => Err(PipelineError::Tool {
              step_name: step.name.clone(),
              source: e,
            }),
          },
        },
        None => crew
          .completion
          .complete(&prepared.role_description, &prepared.prompt, &prepared.context)
          .await
          .map(|output| StepResult::success(step.name.as_str(), output))
          .map_err(|e| PipelineError::Completion {
            step_name: step.name.clone(),
            source: e,
          }),
      }
    };

    let result = match self.step_timeout {
      Some(limit) => match tokio::time::timeout(limit, call).await {
        Ok(result) => result?,
        Err(_) => {
          event!(Level::WARN, timeout = ?limit, "Step timed out, recording placeholder output.");
          StepResult::recovered(
            step.name.as_str(),
            STEP_TIMEOUT_SENTINEL,
            format!("step timed out after {limit:?}"),
          )
        }
      },
      None => call.await?,
    };

    event!(Level::DEBUG, ok = result.ok, output_len = result.output_text.len(), "Step processing finished.");
    Ok(result)
  }
}

fn prepare(step: &StepSpec, input: &str, prior: &[StepResult]) -> PreparedStep {
  let lookup = |name: &str| {
    prior
      .iter()
      .find(|r| r.step_name == name)
      .map(|r| r.output_text.as_str())
  };

  let instructions = step.instructions.render(input, lookup);
  let tool_query = match &step.tool_query {
    Some(query) => query.render(input, lookup),
    None => instructions,
  };
  let context = prior
    .iter()
    .filter(|r| match &step.context {
      ContextScope::AllPrior => true,
      ContextScope::Only(names) => names.iter().any(|n| *n == r.step_name),
    })
    .map(|r| r.output_text.clone())
    .collect();

  PreparedStep {
    role_description: step.role.describe(input, lookup),
    prompt: step.prompt(input, lookup),
    tool_query,
    context,
  }
}
