// crewline_studio/src/config.rs

use crate::errors::{AppError, Result};
use crewline::Credentials;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const SERPER_SEARCH_URL: &str = "https://google.serper.dev/search";

#[derive(Debug, Clone)]
pub struct AppConfig {
  /// Redacted in `Debug`.
  pub credentials: Credentials,
  pub openai_base_url: String,
  /// Forces one chat model for every pipeline, ignoring preset hints.
  pub chat_model: Option<String>,
  pub image_model: String,
  pub http_timeout: Duration,
  pub step_timeout: Option<Duration>,
  pub scrape_max_chars: usize,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any key lookup. `from_env` passes the process
  /// environment.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get_env = |var_name: &str| lookup(var_name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let openai_api_key = get_env("OPENAI_API_KEY").ok_or_else(|| {
      AppError::Config("Missing environment variable 'OPENAI_API_KEY'. Please provide your OpenAI API key.".to_string())
    })?;
    let mut credentials = Credentials::new(openai_api_key);
    if let Some(search_key) = get_env("SERPER_API_KEY") {
      credentials = credentials.with_search_key(search_key);
    }

    let openai_base_url = get_env("CREWLINE_OPENAI_BASE_URL")
      .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
      .trim_end_matches('/')
      .to_string();
    let chat_model = get_env("CREWLINE_CHAT_MODEL");
    let image_model = get_env("CREWLINE_IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string());

    let parsed = |var_name: &str| parse_var::<u64>(var_name, get_env(var_name));
    let http_timeout = Duration::from_secs(parsed("CREWLINE_HTTP_TIMEOUT_SECS")?.unwrap_or(120));
    let step_timeout = parsed("CREWLINE_STEP_TIMEOUT_SECS")?.map(Duration::from_secs);
    let scrape_max_chars = parse_var::<usize>("CREWLINE_SCRAPE_MAX_CHARS", get_env("CREWLINE_SCRAPE_MAX_CHARS"))?
      .unwrap_or(8000);

    if http_timeout.is_zero() {
      return Err(AppError::Config("CREWLINE_HTTP_TIMEOUT_SECS must be greater than zero".to_string()));
    }
    if step_timeout.is_some_and(|t| t.is_zero()) {
      return Err(AppError::Config("CREWLINE_STEP_TIMEOUT_SECS must be greater than zero".to_string()));
    }

    tracing::info!("Application configuration loaded successfully.");
    tracing::debug!(
      base_url = %openai_base_url,
      chat_model = ?chat_model,
      image_model = %image_model,
      has_search_key = credentials.search_api_key.is_some(),
      "Loaded config details"
    );

    Ok(Self {
      credentials,
      openai_base_url,
      chat_model,
      image_model,
      http_timeout,
      step_timeout,
      scrape_max_chars,
    })
  }

  /// Chat model for a run: the override, else the pipeline's hint, else the
  /// default.
  pub fn chat_model_for(&self, preferred: Option<&str>) -> String {
    self
      .chat_model
      .as_deref()
      .or(preferred)
      .unwrap_or(DEFAULT_CHAT_MODEL)
      .to_string()
  }
}

fn parse_var<T>(var_name: &str, value: Option<String>) -> Result<Option<T>>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  value
    .map(|raw| {
      raw
        .parse::<T>()
        .map_err(|e| AppError::Config(format!("Invalid {}: {}", var_name, e)))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
    let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    AppConfig::from_lookup(|name| vars.get(name).cloned())
  }

  #[test]
  fn defaults_apply_when_only_the_openai_key_is_set() {
    let config = config_from(&[("OPENAI_API_KEY", "sk-test")]).unwrap();

    assert_eq!(config.credentials.completion_api_key, "sk-test");
    assert!(config.credentials.search_api_key.is_none());
    assert_eq!(config.openai_base_url, DEFAULT_OPENAI_BASE_URL);
    assert_eq!(config.image_model, "dall-e-3");
    assert_eq!(config.http_timeout, Duration::from_secs(120));
    assert_eq!(config.step_timeout, None);
    assert_eq!(config.scrape_max_chars, 8000);
  }

  #[test]
  fn missing_or_blank_openai_key_is_a_config_error() {
    assert!(matches!(config_from(&[]), Err(AppError::Config(_))));
    assert!(matches!(config_from(&[("OPENAI_API_KEY", "  ")]), Err(AppError::Config(_))));
  }

  #[test]
  fn overrides_are_parsed() {
    let config = config_from(&[
      ("OPENAI_API_KEY", "sk-test"),
      ("SERPER_API_KEY", "serper-test"),
      ("CREWLINE_OPENAI_BASE_URL", "http://localhost:8080/v1/"),
      ("CREWLINE_CHAT_MODEL", "gpt-4o"),
      ("CREWLINE_STEP_TIMEOUT_SECS", "45"),
      ("CREWLINE_SCRAPE_MAX_CHARS", "500"),
    ])
    .unwrap();

    assert_eq!(config.credentials.search_api_key.as_deref(), Some("serper-test"));
    assert_eq!(config.openai_base_url, "http://localhost:8080/v1");
    assert_eq!(config.step_timeout, Some(Duration::from_secs(45)));
    assert_eq!(config.scrape_max_chars, 500);
    assert_eq!(config.chat_model_for(Some("gpt-4o-mini")), "gpt-4o");
  }

  #[test]
  fn invalid_numbers_are_rejected() {
    let err = config_from(&[("OPENAI_API_KEY", "sk-test"), ("CREWLINE_HTTP_TIMEOUT_SECS", "soon")]).unwrap_err();
    assert!(err.to_string().contains("CREWLINE_HTTP_TIMEOUT_SECS"));

    let err = config_from(&[("OPENAI_API_KEY", "sk-test"), ("CREWLINE_STEP_TIMEOUT_SECS", "0")]).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
  }

  #[test]
  fn chat_model_falls_back_to_the_pipeline_hint_then_the_default() {
    let config = config_from(&[("OPENAI_API_KEY", "sk-test")]).unwrap();
    assert_eq!(config.chat_model_for(Some("gpt-4o")), "gpt-4o");
    assert_eq!(config.chat_model_for(None), DEFAULT_CHAT_MODEL);
  }

  #[test]
  fn debug_output_never_contains_keys() {
    let config = config_from(&[("OPENAI_API_KEY", "sk-secret"), ("SERPER_API_KEY", "serper-secret")]).unwrap();
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("sk-secret"));
    assert!(!rendered.contains("serper-secret"));
  }
}
