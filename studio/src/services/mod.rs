// crewline_studio/src/services/mod.rs

//! HTTP implementations of the pipeline capabilities, and per-run crew
//! assembly.

pub mod openai;
pub mod scrape;
pub mod serper;

use crate::config::{AppConfig, SERPER_SEARCH_URL};
use crate::errors::{AppError, Result};
use crewline::{Crew, Pipeline};
use std::sync::Arc;

use self::openai::{OpenAiCompletion, OpenAiImages};
use self::scrape::HttpScraper;
use self::serper::SerperSearch;

const USER_AGENT: &str = concat!("crewline-studio/", env!("CARGO_PKG_VERSION"));

pub fn http_client(config: &AppConfig) -> Result<reqwest::Client> {
  reqwest::Client::builder()
    .timeout(config.http_timeout)
    .user_agent(USER_AGENT)
    .build()
    .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))
}

/// Builds the capabilities `pipeline` needs, from this run's credentials.
///
/// Only tools some step actually uses are attached; a searching pipeline
/// without a search key is a configuration error.
pub fn build_crew(config: &AppConfig, pipeline: &Pipeline) -> Result<Crew> {
  let client = http_client(config)?;
  let credentials = config.credentials.clone();
  let model = config.chat_model_for(pipeline.preferred_model());
  tracing::debug!(pipeline = %pipeline.name(), model = %model, "Building crew.");

  let completion = OpenAiCompletion::new(
    client.clone(),
    credentials.completion_api_key.clone(),
    config.openai_base_url.clone(),
    model,
  );
  let mut crew = Crew::new(Arc::new(completion));

  if pipeline.uses_tool("web_search") {
    let key = credentials.search_api_key.clone().ok_or_else(|| {
      AppError::Config(format!(
        "The {} pipeline searches the web. Please set SERPER_API_KEY.",
        pipeline.name()
      ))
    })?;
    crew = crew.with_search(Arc::new(SerperSearch::new(
      client.clone(),
      key,
      SERPER_SEARCH_URL.to_string(),
    )));
  }
  if pipeline.uses_tool("web_scrape") {
    crew = crew.with_scrape(Arc::new(HttpScraper::new(client.clone(), config.scrape_max_chars)));
  }
  if pipeline.uses_tool("image_generation") {
    crew = crew.with_images(Arc::new(OpenAiImages::new(
      client,
      credentials.completion_api_key,
      config.openai_base_url.clone(),
      config.image_model.clone(),
    )));
  }

  Ok(crew)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crewline::presets;
  use std::collections::HashMap;

  fn config(vars: &[(&str, &str)]) -> AppConfig {
    let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    AppConfig::from_lookup(|name| vars.get(name).cloned()).unwrap()
  }

  #[test]
  fn searching_pipelines_need_a_search_key() {
    let config = config(&[("OPENAI_API_KEY", "sk-test")]);

    for pipeline in [presets::blog::pipeline().unwrap(), presets::twitter::pipeline().unwrap()] {
      let err = build_crew(&config, &pipeline).unwrap_err();
      assert!(matches!(err, AppError::Config(ref m) if m.contains("SERPER_API_KEY")));
    }
  }

  #[test]
  fn instagram_runs_with_only_the_openai_key() {
    let config = config(&[("OPENAI_API_KEY", "sk-test")]);

    let instagram = build_crew(&config, &presets::instagram::pipeline().unwrap()).unwrap();

    let rendered = format!("{instagram:?}");
    assert!(rendered.contains("images: true"));
    assert!(rendered.contains("search: false"));
  }

  #[test]
  fn twitter_crew_gets_search_but_no_images() {
    let config = config(&[("OPENAI_API_KEY", "sk-test"), ("SERPER_API_KEY", "serper-test")]);
    let twitter = build_crew(&config, &presets::twitter::pipeline().unwrap()).unwrap();

    let rendered = format!("{twitter:?}");
    assert!(rendered.contains("search: true"));
    assert!(rendered.contains("images: false"));
  }

  #[test]
  fn linkedin_crew_gets_search_and_scrape() {
    let config = config(&[("OPENAI_API_KEY", "sk-test"), ("SERPER_API_KEY", "serper-test")]);
    let crew = build_crew(&config, &presets::linkedin::pipeline().unwrap()).unwrap();

    let rendered = format!("{crew:?}");
    assert!(rendered.contains("search: true"));
    assert!(rendered.contains("scrape: true"));
    assert!(!rendered.contains("serper-test"));
  }
}
