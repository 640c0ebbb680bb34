//! CLI interface for deploy-notify.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

pub mod classify;
pub mod notify;

pub use classify::ClassifyCommand;
pub use notify::NotifyCommand;

/// deploy-notify: announces deployment commits in Slack.
#[derive(Parser)]
#[command(name = "deploy-notify")]
#[command(about = "Classifies deployment commits and announces them in Slack", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Classifies a commit message and prints the extracted fields.
    Classify(ClassifyCommand),
    /// Announces a deployment commit in its Slack channel.
    Notify(NotifyCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Classify(classify_cmd) => classify_cmd.execute(),
            Commands::Notify(notify_cmd) => notify_cmd.execute().await,
        }
    }
}

/// Structured output format.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// YAML document.
    #[default]
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Renders a value in this format.
    pub fn render<T: Serialize>(self, value: &T) -> Result<String> {
        Ok(match self {
            Self::Yaml => serde_yaml::to_string(value)?,
            Self::Json => serde_json::to_string_pretty(value)? + "\n",
        })
    }
}
