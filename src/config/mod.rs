//! Action inputs and settings.
//!
//! Each input is looked up, in order, as the runner-provided input variable
//! (`INPUT_COMMIT-MESSAGE`), as a plain environment variable
//! (`COMMIT_MESSAGE`), and finally in the `env` map of
//! `$HOME/.deploy-notify/settings.json`. Inputs that are found nowhere resolve
//! to the empty string.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::commit::Commit;

/// Default Slack Web API base URL.
pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";

/// Environment variable overriding the Slack API base URL.
pub const SLACK_API_URL_VAR: &str = "SLACK_API_URL";

/// Named inputs of the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Slack bot token.
    SlackAccessToken,
    /// Link to the commit.
    CommitUrl,
    /// Commit author handle.
    CommitAuthorUsername,
    /// Commit author email.
    CommitAuthorEmail,
    /// Full commit message.
    CommitMessage,
}

impl Input {
    /// Returns the input name as declared for the runner.
    pub fn name(self) -> &'static str {
        match self {
            Self::SlackAccessToken => "slack-access-token",
            Self::CommitUrl => "commit-url",
            Self::CommitAuthorUsername => "commit-author-username",
            Self::CommitAuthorEmail => "commit-author-email",
            Self::CommitMessage => "commit-message",
        }
    }

    /// Returns the plain environment variable used for local runs.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::SlackAccessToken => "SLACK_ACCESS_TOKEN",
            Self::CommitUrl => "COMMIT_URL",
            Self::CommitAuthorUsername => "COMMIT_AUTHOR_USERNAME",
            Self::CommitAuthorEmail => "COMMIT_AUTHOR_EMAIL",
            Self::CommitMessage => "COMMIT_MESSAGE",
        }
    }

    /// Returns the variable the runner exposes the input under.
    pub fn runner_var(self) -> String {
        format!("INPUT_{}", self.name().replace(' ', "_").to_uppercase())
    }
}

/// Settings loaded from $HOME/.deploy-notify/settings.json.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Environment variable fallbacks.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path. A missing file yields empty settings.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Self>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".deploy-notify").join("settings.json"))
    }
}

/// Everything the notify flow needs from its environment.
#[derive(Debug, Clone)]
pub struct ActionConfig {
    /// Slack bot token, possibly empty.
    pub slack_access_token: String,
    /// Slack Web API base URL.
    pub slack_api_url: String,
    /// The commit to announce.
    pub commit: Commit,
}

impl ActionConfig {
    /// Loads the configuration from the process environment and settings file.
    pub fn load() -> Result<Self> {
        let settings = Settings::load().context("Failed to load settings")?;
        Ok(Self::resolve(&settings, |key| env::var(key).ok()))
    }

    /// Resolves the configuration against an arbitrary variable lookup.
    pub fn resolve<F>(settings: &Settings, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let input = |which| resolve_input(which, settings, &lookup);

        let slack_api_url = non_empty(lookup(SLACK_API_URL_VAR))
            .or_else(|| non_empty(settings.env.get(SLACK_API_URL_VAR).cloned()))
            .unwrap_or_else(|| DEFAULT_SLACK_API_URL.to_string());

        Self {
            slack_access_token: input(Input::SlackAccessToken),
            slack_api_url,
            commit: Commit {
                url: input(Input::CommitUrl),
                author_username: input(Input::CommitAuthorUsername),
                author_email: input(Input::CommitAuthorEmail),
                commit_message: input(Input::CommitMessage),
            },
        }
    }
}

/// Resolves one input through the runner variable, the environment and the
/// settings file, in that order.
pub fn resolve_input<F>(input: Input, settings: &Settings, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = non_empty(lookup(&input.runner_var())) {
        debug!(input = input.name(), "Resolved from runner input");
        return value;
    }

    if let Some(value) = non_empty(lookup(input.env_var())) {
        debug!(input = input.name(), var = input.env_var(), "Resolved from environment");
        return value;
    }

    settings
        .env
        .get(input.env_var())
        .cloned()
        .unwrap_or_default()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
