// crewline_studio/src/services/serper.rs

use async_trait::async_trait;
use crewline::{SearchHit, ToolError, WebSearch};
use serde::Deserialize;
use serde_json::json;
use tracing::{event, instrument, Level};

const SEARCH_TOOL: &str = "web_search";

/// Google search through serper.dev.
pub struct SerperSearch {
  client: reqwest::Client,
  key: String,
  endpoint: String,
}

impl SerperSearch {
  pub fn new(client: reqwest::Client, key: String, endpoint: String) -> Self {
    Self { client, key, endpoint }
  }
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
  #[serde(default)]
  organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
  #[serde(default)]
  title: String,
  #[serde(default)]
  link: String,
  #[serde(default)]
  snippet: String,
}

/// Organic results only, in provider order, capped at `max_results`.
pub(crate) fn parse_search_response(body: &str, max_results: usize) -> Result<Vec<SearchHit>, ToolError> {
  let response: SerperResponse = serde_json::from_str(body).map_err(|e| ToolError::Malformed {
    tool: SEARCH_TOOL.to_string(),
    message: e.to_string(),
  })?;

  Ok(
    response
      .organic
      .into_iter()
      .filter(|r| !r.link.is_empty())
      .take(max_results)
      .map(|r| SearchHit {
        title: r.title,
        url: r.link,
        snippet: r.snippet,
      })
      .collect(),
  )
}

#[async_trait]
impl WebSearch for SerperSearch {
  #[instrument(name = "SerperSearch::search", skip(self), err(Display))]
  async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, ToolError> {
    let res = self
      .client
      .post(&self.endpoint)
      .header("X-API-KEY", &self.key)
      .json(&json!({ "q": query, "num": max_results }))
      .send()
      .await
      .map_err(|e| ToolError::other(SEARCH_TOOL, e))?;

    let status = res.status();
    let body = res.text().await.map_err(|e| ToolError::other(SEARCH_TOOL, e))?;
    if !status.is_success() {
      return Err(ToolError::Provider {
        tool: SEARCH_TOOL.to_string(),
        status: status.as_u16(),
        body,
      });
    }

    let hits = parse_search_response(&body, max_results)?;
    event!(Level::DEBUG, hits = hits.len(), "Serper search returned.");
    Ok(hits)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const BODY: &str = r#"{
    "searchParameters": { "q": "electric cars" },
    "knowledgeGraph": { "title": "Electric car" },
    "organic": [
      { "title": "EV sales double", "link": "https://news.example/ev", "snippet": "Sales doubled.", "position": 1 },
      { "title": "No link", "snippet": "dropped" },
      { "title": "Battery prices fall", "link": "https://news.example/battery", "position": 2 },
      { "title": "Third", "link": "https://news.example/third", "snippet": "x", "position": 3 }
    ]
  }"#;

  #[test]
  fn organic_results_are_mapped_and_capped() {
    let hits = parse_search_response(BODY, 2).unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].title, "EV sales double");
    assert_eq!(hits[0].url, "https://news.example/ev");
    assert_eq!(hits[1].url, "https://news.example/battery");
    assert_eq!(hits[1].snippet, "");
  }

  #[test]
  fn missing_organic_section_means_no_hits() {
    assert!(parse_search_response(r#"{ "answerBox": {} }"#, 5).unwrap().is_empty());
  }

  #[test]
  fn non_json_body_is_malformed() {
    assert!(matches!(
      parse_search_response("<html>", 5),
      Err(ToolError::Malformed { .. })
    ));
  }
}
