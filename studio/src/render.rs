// crewline_studio/src/render.rs

//! Terminal output for a finished run.

use crewline::presets::{BLOG, INSTAGRAM, LINKEDIN, TWITTER};
use crewline::{Pipeline, PipelineResult, StepResult, ToolRef};
use std::fmt::Write;

pub fn success_line(pipeline_name: &str) -> String {
  let what = match pipeline_name {
    INSTAGRAM => "Instagram post".to_string(),
    BLOG => "blog post".to_string(),
    LINKEDIN => "LinkedIn post".to_string(),
    TWITTER => "tweet".to_string(),
    other => format!("{other} post"),
  };
  format!("Your {what} has been generated!")
}

fn heading(pipeline: &Pipeline, step_name: &str) -> String {
  match (pipeline.name(), step_name) {
    (_, "image") => "Generated Image".to_string(),
    (INSTAGRAM, "caption") => "Generated Caption & Hashtags".to_string(),
    (TWITTER, "tweet") => "Final Tweet".to_string(),
    (TWITTER, "hashtags") => "Suggested Hashtags".to_string(),
    (BLOG, _) => "Generated Blog Post".to_string(),
    (LINKEDIN, _) => "Generated LinkedIn Post".to_string(),
    (_, other) => {
      let mut chars = other.chars();
      match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
      }
    }
  }
}

fn is_image_step(pipeline: &Pipeline, step_name: &str) -> bool {
  pipeline
    .steps()
    .iter()
    .any(|s| s.name == step_name && s.tool == Some(ToolRef::ImageGeneration))
}

fn render_step(out: &mut String, pipeline: &Pipeline, step: &StepResult) {
  let _ = writeln!(out, "### {}\n", heading(pipeline, &step.step_name));
  if is_image_step(pipeline, &step.step_name) {
    if step.output_text.starts_with("http") {
      let _ = writeln!(out, "AI-Generated Image: {}", step.output_text);
    } else {
      let _ = writeln!(out, "Warning: Could not retrieve the generated image.");
      let _ = writeln!(out, "{}", step.output_text);
    }
  } else {
    let _ = writeln!(out, "{}", step.output_text);
  }
}

/// Markdown-ish text of every display step, in display order.
pub fn render_text(pipeline: &Pipeline, result: &PipelineResult) -> String {
  let mut out = String::new();
  for (idx, step) in result.displayed().into_iter().enumerate() {
    if idx > 0 {
      out.push('\n');
    }
    render_step(&mut out, pipeline, step);
  }
  out
}

pub fn render_json(result: &PipelineResult) -> serde_json::Result<String> {
  serde_json::to_string_pretty(result)
}
