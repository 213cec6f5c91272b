// crewline_studio/src/services/scrape.rs

use async_trait::async_trait;
use crewline::{ToolError, WebScrape};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{event, instrument, Level};

const SCRAPE_TOOL: &str = "web_scrape";

/// Fetches a page and reduces it to readable text.
pub struct HttpScraper {
  client: reqwest::Client,
  max_chars: usize,
}

impl HttpScraper {
  pub fn new(client: reqwest::Client, max_chars: usize) -> Self {
    Self { client, max_chars }
  }
}

struct Patterns {
  hidden: Regex,
  breaks: Regex,
  tags: Regex,
  spaces: Regex,
}

fn patterns() -> &'static Patterns {
  static PATTERNS: OnceLock<Patterns> = OnceLock::new();
  PATTERNS.get_or_init(|| Patterns {
    hidden: Regex::new(r"(?is)<(script|style|noscript|svg|head)\b.*?</(script|style|noscript|svg|head)>|<!--.*?-->")
      .expect("hidden-block regex is valid"),
    breaks: Regex::new(r"(?i)<(br|/p|/div|/li|/h[1-6]|/tr|/section|/article)\b[^>]*>")
      .expect("break regex is valid"),
    tags: Regex::new(r"<[^>]*>").expect("tag regex is valid"),
    spaces: Regex::new(r"[ \t\r\f\v]+").expect("space regex is valid"),
  })
}

fn decode_entities(text: &str) -> String {
  text
    .replace("&nbsp;", " ")
    .replace("&lt;", "<")
    .replace("&gt;", ">")
    .replace("&quot;", "\"")
    .replace("&#39;", "'")
    .replace("&apos;", "'")
    .replace("&amp;", "&")
}

/// Strips markup, keeps each non-empty block on its own line and truncates
/// to `max_chars` characters.
pub(crate) fn html_to_text(html: &str, max_chars: usize) -> String {
  let p = patterns();
  let text = p.hidden.replace_all(html, " ");
  let text = p.breaks.replace_all(&text, "\n");
  let text = p.tags.replace_all(&text, " ");
  let text = decode_entities(&text);
  let text = p.spaces.replace_all(&text, " ");
  let text = text
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .collect::<Vec<_>>()
    .join("\n");

  match text.char_indices().nth(max_chars) {
    Some((cut, _)) => text[..cut].to_string(),
    None => text.to_string(),
  }
}

#[async_trait]
impl WebScrape for HttpScraper {
  #[instrument(name = "HttpScraper::scrape", skip(self), err(Display))]
  async fn scrape(&self, url: &str) -> Result<String, ToolError> {
    let res = self
      .client
      .get(url)
      .send()
      .await
      .map_err(|e| ToolError::other(SCRAPE_TOOL, e))?;

    let status = res.status();
    if !status.is_success() {
      return Err(ToolError::Provider {
        tool: SCRAPE_TOOL.to_string(),
        status: status.as_u16(),
        body: format!("fetching {url} failed"),
      });
    }

    let html = res.text().await.map_err(|e| ToolError::other(SCRAPE_TOOL, e))?;
    let text = html_to_text(&html, self.max_chars);
    event!(Level::DEBUG, bytes = html.len(), chars = text.chars().count(), "Page scraped.");
    Ok(text)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn markup_scripts_and_styles_are_removed() {
    let html = r#"<html><head><title>T</title><style>body { color: red; }</style></head>
      <body><h1>Headline</h1><script>alert("x")</script>
      <p>First <b>bold</b> paragraph.</p><!-- hidden --><p>Fish &amp; chips&nbsp;today</p></body></html>"#;

    let text = html_to_text(html, 1000);

    assert_eq!(text, "Headline\nFirst bold paragraph.\nFish & chips today");
  }

  #[test]
  fn output_is_truncated_on_char_boundaries() {
    let text = html_to_text("<p>héllo wörld</p>", 5);
    assert_eq!(text, "héllo");
  }

  #[test]
  fn plain_text_passes_through() {
    assert_eq!(html_to_text("just text", 100), "just text");
  }
}
