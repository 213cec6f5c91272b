// crewline/src/core/context.rs

//! Per-run accumulated context: the ordered step results and the run state.

use super::control::RunState;
use super::result::StepResult;
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;

#[derive(Debug)]
pub struct RunLedger {
  pub state: RunState,
  pub results: Vec<StepResult>,
}

/// Shared handle on one run's context.
///
/// A run owns exactly one `RunContext`; clones share it so another task can
/// watch progress while the run is in flight. Nothing is shared between runs.
///
/// IMPORTANT: guards obtained from this struct are blocking and MUST NOT be
/// held across `.await` suspension points.
#[derive(Debug, Clone)]
pub struct RunContext(Arc<RwLock<RunLedger>>);

impl RunContext {
  pub fn new() -> Self {
    RunContext(Arc::new(RwLock::new(RunLedger {
      state: RunState::Pending,
      results: Vec::new(),
    })))
  }

  pub fn read(&self) -> RwLockReadGuard<'_, RunLedger> {
    self.0.read()
  }

  pub fn state(&self) -> RunState {
    self.0.read().state.clone()
  }

  /// Number of steps recorded so far.
  pub fn completed_steps(&self) -> usize {
    self.0.read().results.len()
  }

  /// A copy of the results recorded so far, in execution order.
  pub fn snapshot(&self) -> Vec<StepResult> {
    self.0.read().results.clone()
  }

  /// Moves a fresh context out of `Pending` for the run about to start.
  /// Fails with the current state when the context has been used before.
  pub(crate) fn claim(&self, first: RunState) -> Result<(), RunState> {
    let mut ledger = self.0.write();
    if ledger.state != RunState::Pending || !ledger.results.is_empty() {
      return Err(ledger.state.clone());
    }
    ledger.state = first;
    Ok(())
  }

  pub(crate) fn set_state(&self, state: RunState) {
    self.0.write().state = state;
  }

  pub(crate) fn push(&self, result: StepResult) {
    self.0.write().results.push(result);
  }

  /// Drops partial results of a failed run.
  pub(crate) fn discard_results(&self) {
    self.0.write().results.clear();
  }
}

impl Default for RunContext {
  fn default() -> Self {
    Self::new()
  }
}
