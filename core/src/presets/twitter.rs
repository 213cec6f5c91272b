// crewline/src/presets/twitter.rs

//! Tweet plus hashtags, written from a quick web search so the tweet's link
//! is a real one.

use super::TWITTER;
use crate::core::step::{AgentRole, StepSpec};
use crate::core::tool::ToolRef;
use crate::error::PipelineError;
use crate::pipeline::Pipeline;

pub fn pipeline() -> Result<Pipeline, PipelineError> {
  let strategist = AgentRole::new(
    "Tweet Strategist",
    "Write concise, punchy tweets on {input} that resonate with the target audience and drive engagement.",
    "You are a seasoned Twitter expert writing about {input}. \
     You distill complex ideas into sharp, witty or emotionally resonant tweets under 280 characters, \
     and you work with the Hashtag Analyst so your tweets are discoverable.",
  );

  let analyst = AgentRole::new(
    "Hashtag & Trending Topic Analyst",
    "Identify high-traffic hashtags that make the Tweet Strategist's tweets discoverable.",
    "You are a data-savvy analyst monitoring Twitter trends and hashtag performance. \
     You make sure the tweet lines up with trending themes and uses hashtags that maximize reach.",
  );

  let steps = vec![
    StepSpec::new("research", strategist.clone(), "Find recent news and sources on {input}.")
      .with_tool(ToolRef::WebSearch { max_results: 5 })
      .with_tool_query("{input}"),
    StepSpec::new(
      "tweet",
      strategist,
      "Write a concise, impactful tweet on {input} that hooks readers and matches current engagement styles. \
       Attach a relevant, functional link taken from these search results:\n{steps.research}",
    )
    .with_context(&["research"])
    .expecting("A concise, impactful tweet under 280 characters with a relevant link."),
    StepSpec::new(
      "hashtags",
      analyst,
      "Analyze Twitter trends for this tweet and suggest relevant hashtags:\n{steps.tweet}",
    )
    .with_context(&["tweet"])
    .expecting("A list of 3-5 relevant hashtags to append to the tweet."),
  ];

  Ok(
    Pipeline::new(TWITTER, steps)?
      .display(&["tweet", "hashtags"])?
      .with_preferred_model("gpt-4o-mini")
      .with_description("A concise, impactful tweet with relevant hashtags."),
  )
}
