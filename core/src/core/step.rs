// crewline/src/core/step.rs

//! Defines the structure for a single step within a pipeline.

use super::template::Template;
use super::tool::ToolRef;

/// The agent framing a step runs under.
///
/// `goal` and `backstory` are templates: `{input}` and prior-step
/// placeholders are substituted the same way as in instructions.
#[derive(Debug, Clone)]
pub struct AgentRole {
  pub title: String,
  pub goal: Template,
  pub backstory: Template,
}

impl AgentRole {
  pub fn new(title: impl Into<String>, goal: impl Into<Template>, backstory: impl Into<Template>) -> Self {
    Self {
      title: title.into(),
      goal: goal.into(),
      backstory: backstory.into(),
    }
  }

  /// Renders the role into the single role-description string handed to the
  /// completion capability.
  pub fn describe<'a, F>(&self, input: &str, lookup: F) -> String
  where
    F: Fn(&str) -> Option<&'a str> + Copy,
  {
    format!(
      "You are the {}.\nGoal: {}\nBackstory: {}",
      self.title,
      self.goal.render(input, lookup),
      self.backstory.render(input, lookup)
    )
  }

  pub(crate) fn references(&self) -> impl Iterator<Item = &str> {
    self.goal.references().chain(self.backstory.references())
  }
}

/// Which prior step outputs are passed to a completion as context.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContextScope {
  /// Every step that ran before this one, in execution order.
  #[default]
  AllPrior,
  /// Only the named prior steps, in execution order.
  Only(Vec<String>),
}

/// Definition of a pipeline step. Immutable once its pipeline is built and
/// shared read-only by every run of that pipeline.
#[derive(Debug, Clone)]
pub struct StepSpec {
  pub name: String,
  pub role: AgentRole,
  pub instructions: Template,
  pub tool: Option<ToolRef>,
  /// Query handed to the tool. Defaults to the rendered instructions.
  pub tool_query: Option<Template>,
  pub context: ContextScope,
  /// Natural-language description of the expected output. Only ever used as
  /// a prompt hint; nothing checks the output against it.
  pub output_contract: String,
}

impl StepSpec {
  pub fn new(name: impl Into<String>, role: AgentRole, instructions: impl Into<Template>) -> Self {
    Self {
      name: name.into(),
      role,
      instructions: instructions.into(),
      tool: None,
      tool_query: None,
      context: ContextScope::AllPrior,
      output_contract: String::new(),
    }
  }

  pub fn with_tool(mut self, tool: ToolRef) -> Self {
    self.tool = Some(tool);
    self
  }

  pub fn with_tool_query(mut self, query: impl Into<Template>) -> Self {
    self.tool_query = Some(query.into());
    self
  }

  /// Restricts the completion context to the named prior steps.
  pub fn with_context(mut self, steps: &[&str]) -> Self {
    self.context = ContextScope::Only(steps.iter().map(|s| (*s).to_string()).collect());
    self
  }

  pub fn expecting(mut self, contract: impl Into<String>) -> Self {
    self.output_contract = contract.into();
    self
  }

  /// Every prior step this step depends on, from any of its templates or its
  /// context scope.
  pub(crate) fn dependencies(&self) -> Vec<&str> {
    let mut deps: Vec<&str> = self.instructions.references().collect();
    deps.extend(self.role.references());
    if let Some(query) = &self.tool_query {
      deps.extend(query.references());
    }
    if let ContextScope::Only(names) = &self.context {
      deps.extend(names.iter().map(String::as_str));
    }
    deps
  }

  /// Instructions plus the expected-output hint, as sent to the completion.
  pub(crate) fn prompt<'a, F>(&self, input: &str, lookup: F) -> String
  where
    F: Fn(&str) -> Option<&'a str>,
  {
    let instructions = self.instructions.render(input, lookup);
    if self.output_contract.is_empty() {
      instructions
    } else {
      format!("{instructions}\n\nExpected output: {}", self.output_contract)
    }
  }
}
