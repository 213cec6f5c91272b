// crewline/src/lib.rs

//! crewline: a small sequential multi-agent pipeline runner for LLM content
//! generation.
//!
//! A pipeline is an ordered list of steps. Each step frames a prompt with an
//! agent role, renders its instructions from the request text and the
//! outputs of earlier steps, and then either calls a tool (web search, web
//! scrape, image generation) or a text completion. Steps run strictly in
//! declared order and every result becomes context for the steps after it.
//!
//! The capabilities themselves (LLM provider, search provider, ...) are
//! injected per request through a [`Crew`], so credentials never live in
//! process-wide state.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod presets;
pub mod registry;

// --- Re-exports for the Public API ---

pub use crate::core::capability::{Completion, Credentials, Crew, ImageGenerator, SearchHit, WebScrape, WebSearch};
pub use crate::core::context::RunContext;
pub use crate::core::control::RunState;
pub use crate::core::result::{PipelineRequest, PipelineResult, StepResult};
pub use crate::core::step::{AgentRole, ContextScope, StepSpec};
pub use crate::core::template::Template;
pub use crate::core::tool::{ToolRef, IMAGE_FAILURE_SENTINEL, NO_SEARCH_RESULTS};

pub use crate::pipeline::{Pipeline, StepStarted, STEP_TIMEOUT_SENTINEL};

pub use crate::error::{CompletionError, CrewResult, PipelineError, ToolError};

pub use crate::registry::PipelineRegistry;

/*
    Core workflow:
    1. Declare `StepSpec`s in execution order, each with an `AgentRole`,
       instructions using `{input}` / `{steps.<name>}` placeholders, and
       optionally a `ToolRef`.
    2. Build a `Pipeline` (construction rejects out-of-order references).
    3. Register it with a `PipelineRegistry`, or use `presets::register_all`.
    4. Per request, build a `Crew` from that request's credentials.
    5. `registry.run("twitter", &crew, "electric cars").await`.
*/
