// crewline/src/core/template.rs

//! Instruction templates with `{input}` and `{steps.<name>}` placeholders.
//!
//! Templates are parsed once when a step is declared so that every step
//! reference can be checked against the pipeline's declared order before a
//! run starts. Rendering afterwards cannot fail.

use regex::Regex;
use std::sync::OnceLock;

fn placeholder_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"\{(input|steps\.([A-Za-z0-9_\-]+))\}").expect("placeholder regex is valid"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
  Literal(String),
  Input,
  Step(String),
}

/// A parsed instruction template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
  source: String,
  segments: Vec<Segment>,
}

impl Template {
  pub fn parse(source: impl Into<String>) -> Self {
    let source = source.into();
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in placeholder_re().captures_iter(&source) {
      let whole = match caps.get(0) {
        Some(m) => m,
        None => continue,
      };
      if whole.start() > last {
        segments.push(Segment::Literal(source[last..whole.start()].to_string()));
      }
      match caps.get(2) {
        Some(step) => segments.push(Segment::Step(step.as_str().to_string())),
        None => segments.push(Segment::Input),
      }
      last = whole.end();
    }
    if last < source.len() {
      segments.push(Segment::Literal(source[last..].to_string()));
    }

    Self { source, segments }
  }

  /// The raw template text as declared.
  pub fn source(&self) -> &str {
    &self.source
  }

  /// Step names referenced through `{steps.<name>}`, in order of appearance.
  pub fn references(&self) -> impl Iterator<Item = &str> {
    self.segments.iter().filter_map(|s| match s {
      Segment::Step(name) => Some(name.as_str()),
      _ => None,
    })
  }

  /// Substitutes the request input and prior step outputs.
  ///
  /// `lookup` returns the output text of an already executed step. References
  /// are validated at pipeline construction, so a miss only happens when a
  /// template is rendered outside a pipeline; it renders as an empty string.
  pub fn render<'a, F>(&self, input: &str, lookup: F) -> String
  where
    F: Fn(&str) -> Option<&'a str>,
  {
    let mut out = String::with_capacity(self.source.len() + input.len());
    for segment in &self.segments {
      match segment {
        Segment::Literal(text) => out.push_str(text),
        Segment::Input => out.push_str(input),
        Segment::Step(name) => out.push_str(lookup(name).unwrap_or_default()),
      }
    }
    out
  }
}

impl From<&str> for Template {
  fn from(source: &str) -> Self {
    Template::parse(source)
  }
}

impl From<String> for Template {
  fn from(source: String) -> Self {
    Template::parse(source)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  #[test]
  fn renders_input_and_step_outputs() {
    let t = Template::parse("Hashtags for {input} based on: {steps.tweet}");
    let mut outputs = HashMap::new();
    outputs.insert("tweet".to_string(), "EVs rule".to_string());

    let rendered = t.render("electric cars", |name| outputs.get(name).map(String::as_str));
    assert_eq!(rendered, "Hashtags for electric cars based on: EVs rule");
    assert_eq!(t.references().collect::<Vec<_>>(), vec!["tweet"]);
  }

  #[test]
  fn unknown_braces_stay_literal() {
    let t = Template::parse(r#"Reply as JSON like {"caption": "..."} about {input}. {topic} stays."#);
    assert_eq!(
      t.render("cats", |_| None),
      r#"Reply as JSON like {"caption": "..."} about cats. {topic} stays."#
    );
    assert_eq!(t.references().count(), 0);
  }

  #[test]
  fn repeated_placeholders_are_all_substituted() {
    let t = Template::parse("{input}/{input}/{steps.a}{steps.a}");
    assert_eq!(t.render("x", |_| Some("y")), "x/x/yy");
    assert_eq!(t.references().collect::<Vec<_>>(), vec!["a", "a"]);
  }

  #[test]
  fn template_without_placeholders_round_trips() {
    let t = Template::parse("Proofread the post.");
    assert_eq!(t.source(), "Proofread the post.");
    assert_eq!(t.render("ignored", |_| None), "Proofread the post.");
  }
}
