pub mod capability;
pub mod context;
pub mod control;
pub mod result;
pub mod step;
pub mod template;
pub mod tool;

// Re-export key types for easier access from other crewline modules (and lib.rs)
pub use capability::{Completion, Credentials, Crew, ImageGenerator, SearchHit, WebScrape, WebSearch};
pub use context::RunContext;
pub use control::RunState;
pub use result::{PipelineRequest, PipelineResult, StepResult};
pub use step::{AgentRole, ContextScope, StepSpec};
pub use template::Template;
pub use tool::ToolRef;
