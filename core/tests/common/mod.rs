// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use crewline::{
  AgentRole, Completion, CompletionError, Crew, ImageGenerator, SearchHit, StepSpec, ToolError, WebScrape, WebSearch,
};
use parking_lot::Mutex;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use std::time::Duration;
use tracing::Level;

// --- Recorded calls ---
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionCall {
  pub role_description: String,
  pub instructions: String,
  pub context: Vec<String>,
}

enum Reply {
  Text(String),
  Fail(String),
  Slow(Duration, String),
}

/// Deterministic completion: the first rule whose needle appears in the
/// instructions decides the reply; otherwise it echoes the first line.
#[derive(Default)]
pub struct ScriptedCompletion {
  rules: Vec<(String, Reply)>,
  calls: Mutex<Vec<CompletionCall>>,
}

impl ScriptedCompletion {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn reply_when(mut self, needle: &str, reply: &str) -> Self {
    self.rules.push((needle.to_string(), Reply::Text(reply.to_string())));
    self
  }

  pub fn fail_when(mut self, needle: &str, message: &str) -> Self {
    self.rules.push((needle.to_string(), Reply::Fail(message.to_string())));
    self
  }

  pub fn slow_when(mut self, needle: &str, delay: Duration, reply: &str) -> Self {
    self.rules.push((needle.to_string(), Reply::Slow(delay, reply.to_string())));
    self
  }

  pub fn calls(&self) -> Vec<CompletionCall> {
    self.calls.lock().clone()
  }

  pub fn call_count(&self) -> usize {
    self.calls.lock().len()
  }
}

#[async_trait]
impl Completion for ScriptedCompletion {
  async fn complete(
    &self,
    role_description: &str,
    instructions: &str,
    context: &[String],
  ) -> Result<String, CompletionError> {
    self.calls.lock().push(CompletionCall {
      role_description: role_description.to_string(),
      instructions: instructions.to_string(),
      context: context.to_vec(),
    });
    tracing::debug!(target: "test_capabilities", "completion called: '{}'", instructions.lines().next().unwrap_or(""));

    for (needle, reply) in &self.rules {
      if instructions.contains(needle.as_str()) {
        return match reply {
          Reply::Text(text) => Ok(text.clone()),
          Reply::Fail(message) => Err(CompletionError::Provider {
            status: 500,
            body: message.clone(),
          }),
          Reply::Slow(delay, text) => {
            tokio::time::sleep(*delay).await;
            Ok(text.clone())
          }
        };
      }
    }
    Ok(format!("echo: {}", instructions.lines().next().unwrap_or("")))
  }
}

#[derive(Default)]
pub struct StubSearch {
  pub hits: Vec<SearchHit>,
  pub fail_with: Option<String>,
  pub calls: AtomicUsize,
  pub queries: Mutex<Vec<(String, usize)>>,
}

impl StubSearch {
  pub fn with_hits(hits: Vec<SearchHit>) -> Self {
    Self {
      hits,
      ..Default::default()
    }
  }

  pub fn failing(message: &str) -> Self {
    Self {
      fail_with: Some(message.to_string()),
      ..Default::default()
    }
  }
}

#[async_trait]
impl WebSearch for StubSearch {
  async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, ToolError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.queries.lock().push((query.to_string(), max_results));
    if let Some(message) = &self.fail_with {
      return Err(ToolError::Provider {
        tool: "web_search".to_string(),
        status: 403,
        body: message.clone(),
      });
    }
    Ok(self.hits.iter().take(max_results).cloned().collect())
  }
}

#[derive(Default)]
pub struct StubScrape {
  pub calls: AtomicUsize,
  pub urls: Mutex<Vec<String>>,
}

#[async_trait]
impl WebScrape for StubScrape {
  async fn scrape(&self, url: &str) -> Result<String, ToolError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.urls.lock().push(url.to_string());
    Ok(format!("page text of {url}"))
  }
}

#[derive(Default)]
pub struct StubImages {
  pub fail_with: Option<String>,
  pub calls: AtomicUsize,
  pub prompts: Mutex<Vec<String>>,
}

impl StubImages {
  pub fn failing(message: &str) -> Self {
    Self {
      fail_with: Some(message.to_string()),
      ..Default::default()
    }
  }
}

#[async_trait]
impl ImageGenerator for StubImages {
  async fn generate_image(&self, prompt: &str) -> Result<String, ToolError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.prompts.lock().push(prompt.to_string());
    match &self.fail_with {
      Some(message) => Err(ToolError::Provider {
        tool: "image_generation".to_string(),
        status: 400,
        body: message.clone(),
      }),
      None => Ok("https://images.example/generated.png".to_string()),
    }
  }
}

// --- Common helpers ---
pub fn role(title: &str) -> AgentRole {
  AgentRole::new(title, "Help with {input}", "You are a test agent.")
}

pub fn step(name: &str, instructions: &str) -> StepSpec {
  StepSpec::new(name, role(name), instructions)
}

pub fn crew_with(completion: Arc<ScriptedCompletion>) -> Crew {
  Crew::new(completion)
}

pub fn hit(title: &str, url: &str) -> SearchHit {
  SearchHit {
    title: title.to_string(),
    url: url.to_string(),
    snippet: format!("about {title}"),
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
