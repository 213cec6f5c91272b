// crewline/src/core/tool.rs

//! Tool references carried by steps, and how each tool is invoked and
//! recovered from.

use super::capability::{Crew, SearchHit};
use crate::error::ToolError;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{event, Level};

/// Output recorded for a failed image generation. The run continues with
/// this text as the step's output.
pub const IMAGE_FAILURE_SENTINEL: &str = "Failed to generate image.";

/// Search output when the provider found nothing.
pub const NO_SEARCH_RESULTS: &str = "No search results found.";

/// A tool a step invokes instead of a plain completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolRef {
  WebSearch { max_results: usize },
  WebScrape,
  ImageGeneration,
}

impl ToolRef {
  pub fn name(&self) -> &'static str {
    match self {
      ToolRef::WebSearch { .. } => "web_search",
      ToolRef::WebScrape => "web_scrape",
      ToolRef::ImageGeneration => "image_generation",
    }
  }

  /// The placeholder output used when this tool fails, for tools that are
  /// recovered locally. `None` means a failure aborts the run.
  pub fn recovery(&self) -> Option<&'static str> {
    match self {
      ToolRef::ImageGeneration => Some(IMAGE_FAILURE_SENTINEL),
      ToolRef::WebSearch { .. } | ToolRef::WebScrape => None,
    }
  }

  pub(crate) fn is_provided_by(&self, crew: &Crew) -> bool {
    match self {
      ToolRef::WebSearch { .. } => crew.search.is_some(),
      ToolRef::WebScrape => crew.scrape.is_some(),
      ToolRef::ImageGeneration => crew.images.is_some(),
    }
  }

  /// Invokes the tool from `crew` with `query` and returns its textual output.
  pub(crate) async fn invoke(&self, crew: &Crew, query: &str) -> Result<String, ToolError> {
    match self {
      ToolRef::WebSearch { max_results } => {
        let search = crew.search.as_ref().ok_or_else(|| self.not_provided())?;
        let hits = search.search(query, *max_results).await?;
        event!(Level::DEBUG, hits = hits.len(), "Search returned.");
        Ok(format_search_hits(&hits))
      }
      ToolRef::WebScrape => {
        let scrape = crew.scrape.as_ref().ok_or_else(|| self.not_provided())?;
        let url = first_url(query).ok_or_else(|| ToolError::InvalidQuery {
          tool: self.name().to_string(),
          message: "no http(s) URL found in the query".to_string(),
        })?;
        event!(Level::DEBUG, %url, "Scraping.");
        scrape.scrape(url).await
      }
      ToolRef::ImageGeneration => {
        let images = crew.images.as_ref().ok_or_else(|| self.not_provided())?;
        images.generate_image(query).await
      }
    }
  }

  // Unreachable through Pipeline::run, which checks the crew up front.
  fn not_provided(&self) -> ToolError {
    ToolError::InvalidQuery {
      tool: self.name().to_string(),
      message: "tool is not provided by this crew".to_string(),
    }
  }
}

/// Renders search hits as a numbered list the following steps can read.
pub fn format_search_hits(hits: &[SearchHit]) -> String {
  if hits.is_empty() {
    return NO_SEARCH_RESULTS.to_string();
  }
  hits
    .iter()
    .enumerate()
    .map(|(i, hit)| format!("{}. {}\n   {}\n   {}", i + 1, hit.title, hit.url, hit.snippet))
    .collect::<Vec<_>>()
    .join("\n")
}

/// The first `http://` or `https://` URL in `text`, with trailing
/// punctuation and unbalanced closing parentheses trimmed.
pub fn first_url(text: &str) -> Option<&str> {
  static RE: OnceLock<Regex> = OnceLock::new();
  let re = RE.get_or_init(|| Regex::new(r#"https?://[^\s<>"'\[\]]+"#).expect("url regex is valid"));
  re.find(text).map(|m| trim_url_tail(m.as_str()))
}

fn trim_url_tail(mut url: &str) -> &str {
  loop {
    let mut trimmed = url.trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!' | '?'));
    // `(see https://a.example/x)` closes the prose, `.../Rust_(lang)` does not.
    if trimmed.ends_with(')') && trimmed.matches(')').count() > trimmed.matches('(').count() {
      trimmed = &trimmed[..trimmed.len() - 1];
    }
    if trimmed.len() == url.len() {
      return url;
    }
    url = trimmed;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_image_generation_recovers() {
    assert_eq!(ToolRef::ImageGeneration.recovery(), Some(IMAGE_FAILURE_SENTINEL));
    assert_eq!(ToolRef::WebSearch { max_results: 3 }.recovery(), None);
    assert_eq!(ToolRef::WebScrape.recovery(), None);
  }

  #[test]
  fn first_url_skips_prose_and_trailing_punctuation() {
    let text = "1. Rust 2024\n   https://blog.rust-lang.org/2025/02/20/Rust-1.85.0.html.\n   more https://b.example";
    assert_eq!(first_url(text), Some("https://blog.rust-lang.org/2025/02/20/Rust-1.85.0.html"));
    assert_eq!(first_url("no links here"), None);
  }

  #[test]
  fn first_url_keeps_balanced_parentheses() {
    let text = "Background (see https://en.wikipedia.org/wiki/Rust_(programming_language)).";
    assert_eq!(first_url(text), Some("https://en.wikipedia.org/wiki/Rust_(programming_language)"));
    assert_eq!(
      first_url("[Rust](https://www.rust-lang.org/learn)"),
      Some("https://www.rust-lang.org/learn")
    );
    assert_eq!(first_url("(https://a.example/x)"), Some("https://a.example/x"));
  }

  #[test]
  fn search_hits_render_as_numbered_list() {
    let hits = vec![
      SearchHit {
        title: "A".into(),
        url: "https://a.example".into(),
        snippet: "first".into(),
      },
      SearchHit {
        title: "B".into(),
        url: "https://b.example".into(),
        snippet: "second".into(),
      },
    ];
    assert_eq!(
      format_search_hits(&hits),
      "1. A\n   https://a.example\n   first\n2. B\n   https://b.example\n   second"
    );
    assert_eq!(format_search_hits(&[]), NO_SEARCH_RESULTS);
  }
}
