// crewline_studio/src/cli.rs

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "crewline-studio", version, about = "Generate social media content with a crew of AI agents.")]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// List the available content pipelines.
  List,

  /// Run a pipeline on a topic or theme.
  Run {
    /// Pipeline name, e.g. `twitter`.
    pipeline: String,

    /// The topic or theme. Multiple words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    input: Vec<String>,

    /// Print every step result as JSON instead of the display steps.
    #[arg(long)]
    json: bool,
  },
}

pub fn topic(input: &[String]) -> String {
  input.join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn run_collects_the_whole_topic() {
    let cli = Cli::try_parse_from(["crewline-studio", "run", "twitter", "electric", "cars"]).unwrap();
    match cli.command {
      Command::Run { pipeline, input, json } => {
        assert_eq!(pipeline, "twitter");
        assert_eq!(topic(&input), "electric cars");
        assert!(!json);
      }
      other => panic!("Expected Command::Run, got {:?}", other),
    }
  }

  #[test]
  fn json_flag_is_recognised() {
    let cli = Cli::try_parse_from(["crewline-studio", "run", "--json", "blog", "The Future of AI"]).unwrap();
    assert!(matches!(cli.command, Command::Run { json: true, .. }));
  }

  #[test]
  fn json_flag_after_the_topic_is_not_part_of_it() {
    let cli = Cli::try_parse_from(["crewline-studio", "run", "twitter", "electric", "cars", "--json"]).unwrap();
    match cli.command {
      Command::Run { input, json, .. } => {
        assert_eq!(topic(&input), "electric cars");
        assert!(json);
      }
      other => panic!("Expected Command::Run, got {:?}", other),
    }
  }

  #[test]
  fn run_requires_a_topic() {
    assert!(Cli::try_parse_from(["crewline-studio", "run", "twitter"]).is_err());
  }
}
