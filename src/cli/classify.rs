//! Classify command — prints how a commit message is classified.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use super::OutputFormat;
use crate::commit::{is_deployment_commit, Commit};
use crate::git::GitRepository;

/// Classify command options.
#[derive(Parser)]
pub struct ClassifyCommand {
    /// Commit message to classify instead of reading a commit from git.
    #[arg(long, short, conflicts_with = "rev")]
    pub message: Option<String>,

    /// Revision to read when no message is given (defaults to HEAD).
    #[arg(long, value_name = "REV")]
    pub rev: Option<String>,

    /// Repository to read the commit from.
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub repo: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

impl ClassifyCommand {
    /// Executes the classify command.
    pub fn execute(self) -> Result<()> {
        let commit = match self.message {
            Some(commit_message) => Commit {
                commit_message,
                ..Commit::default()
            },
            None => {
                let rev = self.rev.as_deref().unwrap_or("HEAD");
                GitRepository::open_at(&self.repo)
                    .context("Failed to open git repository. Make sure you're in a git repository.")?
                    .read_commit(rev)?
            }
        };

        let classification = is_deployment_commit(&commit);
        print!("{}", self.format.render(&classification)?);

        Ok(())
    }
}
