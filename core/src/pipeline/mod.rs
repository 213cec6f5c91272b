// crewline/src/pipeline/mod.rs

//! Defines the `Pipeline` struct, its construction, observers and execution logic.

pub mod definition;
pub mod execution;
pub mod hooks;

// Re-export the main Pipeline struct
pub use definition::Pipeline;
pub use execution::STEP_TIMEOUT_SENTINEL;
pub use hooks::StepStarted;
