// crewline/src/presets/instagram.rs

//! Instagram post: an image first, then a caption written around it.

use super::INSTAGRAM;
use crate::core::step::{AgentRole, StepSpec};
use crate::core::tool::ToolRef;
use crate::error::PipelineError;
use crate::pipeline::Pipeline;

pub fn pipeline() -> Result<Pipeline, PipelineError> {
  let visual_creator = AgentRole::new(
    "Visual Content Creator",
    "Generate visually compelling, on-brand images for Instagram content on the theme: {input}",
    "You are an AI-based visual artist creating Instagram-ready images. \
     The Caption & Hashtag Strategist builds captions around your visuals. \
     Your images attract attention, convey mood and support the message, \
     and they look realistic and vibrant rather than AI-generated.",
  );

  let caption_strategist = AgentRole::new(
    "Caption & Hashtag Strategist",
    "Create engaging captions and effective hashtag strategies",
    "You are a social media copywriter specializing in Instagram content. \
     You craft captions on {input} that resonate emotionally or humorously with audiences, \
     and keep them discoverable through relevant hashtags. \
     Your work is based on the image produced by the Visual Content Creator.",
  );

  let steps = vec![
    StepSpec::new(
      "image",
      visual_creator,
      "A beautiful, natural-looking Instagram-style photo on the theme '{input}'. \
       It must not look AI-generated.",
    )
    .with_tool(ToolRef::ImageGeneration)
    .expecting("A high-quality image URL matching the theme and tone."),
    StepSpec::new(
      "caption",
      caption_strategist,
      "Write a catchy Instagram caption and a set of 3-5 trending hashtags for the theme '{input}'. \
       The post's image: {steps.image}",
    )
    .expecting("A single catchy caption followed by 3-5 relevant hashtags."),
  ];

  Ok(
    Pipeline::new(INSTAGRAM, steps)?
      .display(&["image", "caption"])?
      .with_preferred_model("gpt-4o")
      .with_description("An engaging caption and a matching image for an Instagram post, from a theme."),
  )
}
