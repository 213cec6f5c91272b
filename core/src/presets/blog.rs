// crewline/src/presets/blog.rs

//! Blog post: research, read the top source, plan, write, edit.

use super::BLOG;
use crate::core::step::{AgentRole, StepSpec};
use crate::core::tool::ToolRef;
use crate::error::PipelineError;
use crate::pipeline::Pipeline;

pub fn pipeline() -> Result<Pipeline, PipelineError> {
  let planner = AgentRole::new(
    "Content Planner",
    "Plan engaging content on {input}",
    "You are a content planner focused on {input}. \
     You gather information to inform the audience, and your plan guides the writer.",
  );

  let writer = AgentRole::new(
    "Content Writer",
    "Write an opinion piece about {input}",
    "You are a writer creating an opinion piece on {input}, based on the content plan. \
     You aim for insightful and balanced writing, and you distinguish opinions from facts.",
  );

  let editor = AgentRole::new(
    "Editor",
    "Edit a blog post for style and accuracy.",
    "You are an editor reviewing blog posts for quality, balance and adherence to guidelines.",
  );

  let steps = vec![
    StepSpec::new("research", planner.clone(), "Find recent trends, key players and news on {input}.")
      .with_tool(ToolRef::WebSearch { max_results: 5 })
      .with_tool_query("{input} latest trends and news"),
    StepSpec::new("source", planner.clone(), "Read the top source found for {input}.")
      .with_tool(ToolRef::WebScrape)
      .with_tool_query("{steps.research}"),
    StepSpec::new(
      "plan",
      planner,
      "1. Using the research and source below, summarize key trends, players and news on {input}.\n\
       2. Identify the target audience.\n\
       3. Develop a concise content outline (under 100 words).\n\
       4. Include SEO keywords and relevant data.",
    )
    .with_context(&["research", "source"])
    .expecting("A concise content plan with an outline, audience analysis, SEO keywords and key resources (under 100 words)."),
    StepSpec::new(
      "write",
      writer,
      "1. Draft a blog post on {input} using the content plan.\n\
       2. Incorporate the SEO keywords.\n\
       3. Use engaging titles and a clear structure: intro, body, conclusion.\n\
       4. Proofread for errors and brand voice.",
    )
    .with_context(&["plan"])
    .expecting("A well-written blog post in markdown (under 400 words), ready for publication, with distinct sections."),
    StepSpec::new(
      "edit",
      editor,
      "Proofread this blog post for grammar, style and brand voice:\n\n{steps.write}",
    )
    .with_context(&["write"])
    .expecting("A final, proofread blog post in markdown, ready for publication."),
  ];

  Ok(
    Pipeline::new(BLOG, steps)?
      .with_preferred_model("gpt-4o")
      .with_description("A complete blog post from a topic: content plan, written article and edited final version."),
  )
}
