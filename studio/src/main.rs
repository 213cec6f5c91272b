// crewline_studio/src/main.rs

mod cli;
mod config;
mod errors;
mod render;
mod services;

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::errors::{AppError, Result as AppResult};

use clap::Parser;
use crewline::{presets, Pipeline, PipelineError, PipelineRegistry, PipelineRequest, StepStarted};
use std::process::ExitCode;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> ExitCode {
  // Logs go to stderr; stdout carries only the generated content.
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    )
    .with_span_events(FmtSpan::CLOSE)
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  match run(cli.command).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!(error = %e, "Command failed.");
      eprintln!("{}", e.user_message());
      ExitCode::FAILURE
    }
  }
}

async fn run(command: Command) -> AppResult<()> {
  match command {
    Command::List => {
      for pipeline in presets::all()? {
        println!("{:<10} {}", pipeline.name(), pipeline.description());
      }
      Ok(())
    }
    Command::Run { pipeline, input, json } => {
      // Blank topics are rejected before keys are even looked at.
      let request = PipelineRequest::new(cli::topic(&input))?;
      let app_config = AppConfig::from_env()?;
      let registry = build_registry(app_config.step_timeout)?;

      let pipeline = registry
        .get(&pipeline)
        .ok_or_else(|| AppError::from(PipelineError::NotRegistered(pipeline.clone())))?;
      let crew = services::build_crew(&app_config, &pipeline)?;

      tracing::info!(pipeline = %pipeline.name(), "Kicking off crew.");
      let result = pipeline.run(&crew, request.input_text()).await?;

      if json {
        println!("{}", render::render_json(&result)?);
      } else {
        println!("{}\n", render::success_line(pipeline.name()));
        print!("{}", render::render_text(&pipeline, &result));
      }
      Ok(())
    }
  }
}

/// Registers the presets with the configured step timeout and a progress
/// line per step.
fn build_registry(step_timeout: Option<Duration>) -> Result<PipelineRegistry, PipelineError> {
  let registry = PipelineRegistry::new();
  for pipeline in presets::all()? {
    registry.register(prepare(pipeline, step_timeout));
  }
  tracing::info!(count = registry.len(), "Content pipelines registered.");
  Ok(registry)
}

fn prepare(mut pipeline: Pipeline, step_timeout: Option<Duration>) -> Pipeline {
  pipeline.before_step(|started: &StepStarted| {
    let tool = started.uses_tool.map(|t| format!(" [{t}]")).unwrap_or_default();
    eprintln!(
      "[{}/{}] {}{}...",
      started.step_index + 1,
      started.total_steps,
      started.step_name,
      tool
    );
  });
  match step_timeout {
    Some(timeout) => pipeline.with_step_timeout(timeout),
    None => pipeline,
  }
}
