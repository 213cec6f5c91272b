// crewline_studio/src/services/openai.rs

//! OpenAI-compatible chat completion and image generation.

use async_trait::async_trait;
use crewline::{Completion, CompletionError, ImageGenerator, ToolError};
use serde_json::{json, Value};
use tracing::{event, instrument, Level};

const IMAGE_TOOL: &str = "image_generation";

/// Chat completions at temperature 0, one request per step.
pub struct OpenAiCompletion {
  client: reqwest::Client,
  key: String,
  base_url: String,
  model: String,
}

impl OpenAiCompletion {
  pub fn new(client: reqwest::Client, key: String, base_url: String, model: String) -> Self {
    Self {
      client,
      key,
      base_url,
      model,
    }
  }
}

/// System message carries the role; earlier step outputs go in one user
/// message ahead of the instructions.
pub(crate) fn chat_messages(role_description: &str, instructions: &str, context: &[String]) -> Vec<Value> {
  let mut messages = vec![json!({ "role": "system", "content": role_description })];
  if !context.is_empty() {
    messages.push(json!({
      "role": "user",
      "content": format!("Context from earlier steps:\n\n{}", context.join("\n\n---\n\n")),
    }));
  }
  messages.push(json!({ "role": "user", "content": instructions }));
  messages
}

pub(crate) fn parse_chat_response(response_json: &Value) -> Result<String, CompletionError> {
  response_json
    .get("choices")
    .and_then(|arr| arr.as_array())
    .and_then(|arr| arr.first())
    .and_then(|choice| choice.get("message"))
    .and_then(|message| message.get("content"))
    .and_then(|content| content.as_str())
    .map(|text| text.trim().to_string())
    .ok_or_else(|| CompletionError::Malformed("no message content in first choice".to_string()))
}

#[async_trait]
impl Completion for OpenAiCompletion {
  #[instrument(name = "OpenAiCompletion::complete", skip_all, fields(model = %self.model), err(Display))]
  async fn complete(
    &self,
    role_description: &str,
    instructions: &str,
    context: &[String],
  ) -> Result<String, CompletionError> {
    let body = json!({
      "model": &self.model,
      "temperature": 0,
      "messages": chat_messages(role_description, instructions, context),
    });

    let res = self
      .client
      .post(format!("{}/chat/completions", self.base_url))
      .bearer_auth(&self.key)
      .json(&body)
      .send()
      .await
      .map_err(anyhow::Error::from)?;

    let status = res.status();
    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      event!(Level::WARN, %status, "Chat completion rejected.");
      return Err(CompletionError::Provider {
        status: status.as_u16(),
        body,
      });
    }

    let response_json: Value = res.json().await.map_err(|e| CompletionError::Malformed(e.to_string()))?;
    parse_chat_response(&response_json)
  }
}

/// DALL-E style image generation. Returns the hosted image URL.
pub struct OpenAiImages {
  client: reqwest::Client,
  key: String,
  base_url: String,
  model: String,
}

impl OpenAiImages {
  pub fn new(client: reqwest::Client, key: String, base_url: String, model: String) -> Self {
    Self {
      client,
      key,
      base_url,
      model,
    }
  }
}

pub(crate) fn realistic_prompt(query: &str) -> String {
  format!(
    "Create a realistic image of: {query}. Style: Focus on lifelike details, accurate lighting, and natural \
     textures, with a realistic color palette. The scene should capture the true essence of the description, \
     ensuring it looks as if it could exist in the real world."
  )
}

pub(crate) fn parse_image_response(response_json: &Value) -> Result<String, ToolError> {
  response_json
    .get("data")
    .and_then(|arr| arr.as_array())
    .and_then(|arr| arr.first())
    .and_then(|image| image.get("url"))
    .and_then(|url| url.as_str())
    .map(str::to_string)
    .ok_or_else(|| ToolError::Malformed {
      tool: IMAGE_TOOL.to_string(),
      message: "no image url in response".to_string(),
    })
}

#[async_trait]
impl ImageGenerator for OpenAiImages {
  #[instrument(name = "OpenAiImages::generate_image", skip_all, fields(model = %self.model), err(Display))]
  async fn generate_image(&self, prompt: &str) -> Result<String, ToolError> {
    let body = json!({
      "model": &self.model,
      "prompt": realistic_prompt(prompt),
      "size": "1024x1024",
      "quality": "standard",
      "n": 1,
    });

    let res = self
      .client
      .post(format!("{}/images/generations", self.base_url))
      .bearer_auth(&self.key)
      .json(&body)
      .send()
      .await
      .map_err(|e| ToolError::other(IMAGE_TOOL, e))?;

    let status = res.status();
    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      return Err(ToolError::Provider {
        tool: IMAGE_TOOL.to_string(),
        status: status.as_u16(),
        body,
      });
    }

    let response_json: Value = res.json().await.map_err(|e| ToolError::other(IMAGE_TOOL, e))?;
    parse_image_response(&response_json)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn chat_messages_put_context_before_instructions() {
    let messages = chat_messages("You are the Editor.", "Edit this.", &["draft one".into(), "notes".into()]);

    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[0]["content"], "You are the Editor.");
    let context = messages[1]["content"].as_str().unwrap();
    assert!(context.contains("draft one\n\n---\n\nnotes"));
    assert_eq!(messages[2]["content"], "Edit this.");
  }

  #[test]
  fn chat_messages_skip_empty_context() {
    let messages = chat_messages("role", "do it", &[]);
    assert_eq!(messages.len(), 2);
  }

  #[test]
  fn chat_response_content_is_extracted() {
    let response = json!({
      "choices": [{ "message": { "role": "assistant", "content": "  A tweet.  " } }]
    });
    assert_eq!(parse_chat_response(&response).unwrap(), "A tweet.");
  }

  #[test]
  fn chat_response_without_choices_is_malformed() {
    let err = parse_chat_response(&json!({ "choices": [] })).unwrap_err();
    assert!(matches!(err, CompletionError::Malformed(_)));
  }

  #[test]
  fn image_response_url_is_extracted() {
    let response = json!({ "data": [{ "url": "https://img.example/a.png", "revised_prompt": "..." }] });
    assert_eq!(parse_image_response(&response).unwrap(), "https://img.example/a.png");
    assert!(parse_image_response(&json!({ "data": [] })).is_err());
  }

  #[test]
  fn image_prompt_asks_for_a_realistic_style() {
    let prompt = realistic_prompt("a beach at dawn");
    assert!(prompt.starts_with("Create a realistic image of: a beach at dawn. Style:"));
  }
}
