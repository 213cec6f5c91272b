// crewline/examples/basic_pipeline.rs

use async_trait::async_trait;
use crewline::{
  presets, Completion, CompletionError, Crew, PipelineError, PipelineRegistry, SearchHit, ToolError, WebSearch,
};
use std::sync::Arc;
use tracing::info;

// 1. A completion capability. Real front ends call an LLM provider here; this
//    one answers from the instructions so the example runs offline.
struct CannedCompletion;

#[async_trait]
impl Completion for CannedCompletion {
  async fn complete(&self, _role: &str, instructions: &str, context: &[String]) -> Result<String, CompletionError> {
    if instructions.contains("hashtags") {
      Ok("#EV #CleanEnergy #Tesla".to_string())
    } else {
      Ok(format!(
        "EVs are eating the market. ⚡ ({} prior outputs seen)",
        context.len()
      ))
    }
  }
}

// The twitter pipeline searches before writing, so the tweet links to a real
// page. This search answers with a fixed hit.
struct CannedSearch;

#[async_trait]
impl WebSearch for CannedSearch {
  async fn search(&self, query: &str, _max_results: usize) -> Result<Vec<SearchHit>, ToolError> {
    Ok(vec![SearchHit {
      title: format!("Latest on {query}"),
      url: "https://news.example/ev-sales".to_string(),
      snippet: "EV sales doubled year over year.".to_string(),
    }])
  }
}

#[tokio::main]
async fn main() -> Result<(), PipelineError> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Pipeline Example ---");

  // 2. Register the built-in content pipelines
  let registry = PipelineRegistry::new();
  presets::register_all(&registry)?;

  // 3. Build a crew for this request
  let crew = Crew::new(Arc::new(CannedCompletion)).with_search(Arc::new(CannedSearch));

  // 4. Run the twitter pipeline
  let result = registry.run(presets::TWITTER, &crew, "electric cars").await?;

  // 5. Inspect the results, by step name
  for step in result.displayed() {
    info!("[{}] {}", step.step_name, step.output_text);
  }
  assert_eq!(result.len(), 3);
  assert!(result.step("research").map_or(false, |s| s.output_text.contains("https://news.example/ev-sales")));
  assert_eq!(result.step("hashtags").map(|s| s.output_text.as_str()), Some("#EV #CleanEnergy #Tesla"));

  Ok(())
}
