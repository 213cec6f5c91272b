// crewline/src/core/capability.rs

//! The external collaborators a pipeline run calls through.
//!
//! Implementations are built per request by the caller, with that request's
//! credentials, and bundled into a [`Crew`]. The runner never reads keys or
//! clients from process-wide state.

use crate::error::{CompletionError, ToolError};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Plain text completion. A single call per step, no retries.
#[async_trait]
pub trait Completion: Send + Sync {
  async fn complete(
    &self,
    role_description: &str,
    instructions: &str,
    context: &[String],
  ) -> Result<String, CompletionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
  pub title: String,
  pub url: String,
  pub snippet: String,
}

#[async_trait]
pub trait WebSearch: Send + Sync {
  async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, ToolError>;
}

#[async_trait]
pub trait WebScrape: Send + Sync {
  /// Fetches `url` and returns its readable text.
  async fn scrape(&self, url: &str) -> Result<String, ToolError>;
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
  /// Generates an image for `prompt` and returns its URL.
  async fn generate_image(&self, prompt: &str) -> Result<String, ToolError>;
}

/// API keys for one request. Passed by value into capability constructors.
#[derive(Clone, Default)]
pub struct Credentials {
  pub completion_api_key: String,
  pub search_api_key: Option<String>,
}

impl Credentials {
  pub fn new(completion_api_key: impl Into<String>) -> Self {
    Self {
      completion_api_key: completion_api_key.into(),
      search_api_key: None,
    }
  }

  pub fn with_search_key(mut self, key: impl Into<String>) -> Self {
    self.search_api_key = Some(key.into());
    self
  }
}

impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("completion_api_key", &"[REDACTED]")
      .field("search_api_key", &self.search_api_key.as_ref().map(|_| "[REDACTED]"))
      .finish()
  }
}

/// The capabilities available to one pipeline run.
///
/// Completion is mandatory; tools are optional and a pipeline whose steps
/// reference a missing tool is rejected before its first step.
#[derive(Clone)]
pub struct Crew {
  pub(crate) completion: Arc<dyn Completion>,
  pub(crate) search: Option<Arc<dyn WebSearch>>,
  pub(crate) scrape: Option<Arc<dyn WebScrape>>,
  pub(crate) images: Option<Arc<dyn ImageGenerator>>,
}

impl Crew {
  pub fn new(completion: Arc<dyn Completion>) -> Self {
    Self {
      completion,
      search: None,
      scrape: None,
      images: None,
    }
  }

  pub fn with_search(mut self, search: Arc<dyn WebSearch>) -> Self {
    self.search = Some(search);
    self
  }

  pub fn with_scrape(mut self, scrape: Arc<dyn WebScrape>) -> Self {
    self.scrape = Some(scrape);
    self
  }

  pub fn with_images(mut self, images: Arc<dyn ImageGenerator>) -> Self {
    self.images = Some(images);
    self
  }
}

impl fmt::Debug for Crew {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Crew")
      .field("search", &self.search.is_some())
      .field("scrape", &self.scrape.is_some())
      .field("images", &self.images.is_some())
      .finish()
  }
}
