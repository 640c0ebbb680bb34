//! Notify command — announces a deployment commit in Slack.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use crate::config::ActionConfig;
use crate::git::GitRepository;
use crate::notify::{Announcement, Notifier, NotifyOutcome, SlackClient};

/// Notify command options.
#[derive(Parser)]
pub struct NotifyCommand {
    /// Read the commit from git at this revision instead of the action inputs.
    #[arg(long, value_name = "REV")]
    pub rev: Option<String>,

    /// Repository to read the commit from when --rev is given.
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub repo: PathBuf,

    /// Print what would be posted without contacting Slack.
    #[arg(long)]
    pub dry_run: bool,
}

impl NotifyCommand {
    /// Executes the notify command.
    pub async fn execute(self) -> Result<()> {
        info!("Running deploy-notify");

        let config = ActionConfig::load()?;

        let commit = match &self.rev {
            Some(rev) => GitRepository::open_at(&self.repo)
                .context("Failed to open git repository. Make sure you're in a git repository.")?
                .read_commit(rev)?,
            None => config.commit.clone(),
        };

        let Some(announcement) = Announcement::for_commit(&commit) else {
            info!(commit_message = %commit.commit_message, "Commit is not a deployment commit");
            return Ok(());
        };

        if self.dry_run {
            print!("{}", serde_yaml::to_string(&announcement)?);
            return Ok(());
        }

        if let NotifyOutcome::Sent {
            channel,
            ts,
            replied,
        } = deliver(&config, announcement).await
        {
            info!(
                channel = %channel,
                ts = ts.as_deref().unwrap_or(""),
                replied,
                "Notification finished"
            );
        }

        Ok(())
    }
}

/// Posts the announcement with the configured Slack credentials.
///
/// A client that cannot be built (e.g. no token) counts as a failed delivery:
/// it is logged and the run still succeeds.
async fn deliver(config: &ActionConfig, announcement: Announcement) -> NotifyOutcome {
    match SlackClient::new(
        config.slack_access_token.as_str(),
        config.slack_api_url.as_str(),
    ) {
        Ok(client) => Notifier::new(Box::new(client)).deliver(announcement).await,
        Err(e) => {
            error!(channel = %announcement.channel, error = %e, "Cannot post deployment announcement");
            NotifyOutcome::Sent {
                channel: announcement.channel,
                ts: None,
                replied: false,
            }
        }
    }
}
