// crewline/src/presets/linkedin.rs

//! LinkedIn post: research, read the top source, plan, write, edit.

use super::LINKEDIN;
use crate::core::step::{AgentRole, StepSpec};
use crate::core::tool::ToolRef;
use crate::error::PipelineError;
use crate::pipeline::Pipeline;

pub fn pipeline() -> Result<Pipeline, PipelineError> {
  let planner = AgentRole::new(
    "LinkedIn Content Planner",
    "Plan engaging and factually accurate content for LinkedIn on {input}",
    "You are planning a concise LinkedIn post about {input}. \
     You collect information that helps the audience learn and make informed decisions. \
     Your work is the basis for the Content Writer.",
  );

  let writer = AgentRole::new(
    "Content Writer",
    "Write an insightful and factually accurate opinion piece about {input} for LinkedIn",
    "You are writing a new opinion piece about {input} for LinkedIn, based on the Content Planner's outline. \
     You provide impartial insights backed by information, use bullet points, \
     and end with a question to encourage comments. Your post stays under 300 words.",
  );

  let editor = AgentRole::new(
    "Editor",
    "Edit a LinkedIn post to match the organization's writing style.",
    "You are a meticulous editor reviewing a LinkedIn article. \
     You keep viewpoints balanced, fix grammar, improve flow, and make the tone natural, engaging and professional.",
  );

  let steps = vec![
    StepSpec::new("research", planner.clone(), "Find the most relevant recent sources on {input}.")
      .with_tool(ToolRef::WebSearch { max_results: 2 })
      .with_tool_query("{input}"),
    StepSpec::new("source", planner.clone(), "Read the top source found for {input}.")
      .with_tool(ToolRef::WebScrape)
      .with_tool_query("{steps.research}"),
    StepSpec::new(
      "plan",
      planner,
      "1. Create a concise content plan for a LinkedIn post on {input}.\n\
       2. Focus on key trends, players and news from the research and source below.\n\
       3. Identify the target audience's interests and pain points.\n\
       4. Develop a concise outline (introduction, key points, call to action).",
    )
    .with_context(&["research", "source"])
    .expecting("A concise content plan (under 150 words) with an outline, audience analysis and relevant resources."),
    StepSpec::new(
      "write",
      writer,
      "1. Craft a concise LinkedIn post on {input} based on the content plan.\n\
       2. Make it engaging, insightful and factual.\n\
       3. Structure it with an introduction, a body with bullet points and a conclusion.\n\
       4. Keep it under 300 words and add relevant hashtags.",
    )
    .with_context(&["plan"])
    .expecting("A LinkedIn post under 300 words with a hook, insights, a call to action and hashtags."),
    StepSpec::new(
      "edit",
      editor,
      "Proofread and refine this LinkedIn post for grammar, flow, tone and clarity:\n\n{steps.write}",
    )
    .with_context(&["write"])
    .expecting("A final polished LinkedIn post ready for publication."),
  ];

  Ok(
    Pipeline::new(LINKEDIN, steps)?
      .with_preferred_model("gpt-4o-mini")
      .with_description("A professional, insightful LinkedIn post on any topic."),
  )
}
