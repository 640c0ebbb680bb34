//! Deployment announcements.
//!
//! A [`Notifier`] classifies a commit, posts the announcement to the
//! deployment channel and threads the commit body underneath it. Delivery
//! failures are logged and never abort the run.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::commit::{classify_title, Commit, DeploymentDetails};

pub mod error;
pub mod format;
pub mod slack;
#[cfg(test)]
pub(crate) mod test_utils;

pub use error::SlackError;
pub use slack::SlackClient;

/// A message to post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Target channel, e.g. `#deploys-billing-prod`.
    pub channel: String,
    /// Message text.
    pub text: String,
    /// Parent message timestamp when replying in a thread.
    pub thread_ts: Option<String>,
}

/// A message the chat service accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    /// Channel the message landed in.
    pub channel: String,
    /// Message timestamp, usable as a thread parent.
    pub ts: String,
}

/// Trait for chat services that can receive announcements.
pub trait ChatClient: Send + Sync {
    /// Posts a message and returns where it landed.
    fn post_message<'a>(
        &'a self,
        message: &'a ChatMessage,
    ) -> Pin<Box<dyn Future<Output = Result<PostedMessage>> + Send + 'a>>;
}

/// Everything that would be posted for one deployment commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Announcement {
    /// Name of the template that matched.
    pub matcher: &'static str,
    /// Classified fields.
    pub details: DeploymentDetails,
    /// Target channel.
    pub channel: String,
    /// Top-level message.
    pub text: String,
    /// Threaded reply with the commit body.
    pub reply: Option<String>,
}

impl Announcement {
    /// Builds the announcement for a commit, or `None` if it is not a deployment.
    pub fn for_commit(commit: &Commit) -> Option<Self> {
        let matched = classify_title(commit.title())?;
        Some(Self {
            matcher: matched.name,
            channel: format::channel_name(&matched.details),
            text: format::announcement(commit, &matched.details),
            reply: format::reply(commit),
            details: matched.details,
        })
    }
}

/// Result of one notify run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// The commit does not describe a deployment; nothing was posted.
    Skipped,
    /// The announcement was attempted.
    Sent {
        /// Channel the announcement was addressed to.
        channel: String,
        /// Timestamp of the announcement, `None` if posting failed.
        ts: Option<String>,
        /// Whether the body reply was posted.
        replied: bool,
    },
}

/// Posts deployment announcements through a chat client.
pub struct Notifier {
    client: Box<dyn ChatClient>,
}

impl Notifier {
    /// Creates a notifier over the given chat client.
    pub fn new(client: Box<dyn ChatClient>) -> Self {
        Self { client }
    }

    /// Classifies the commit and posts the announcement and body reply.
    pub async fn notify(&self, commit: &Commit) -> NotifyOutcome {
        match Announcement::for_commit(commit) {
            Some(announcement) => self.deliver(announcement).await,
            None => {
                info!(commit_message = %commit.commit_message, "Commit is not a deployment commit");
                NotifyOutcome::Skipped
            }
        }
    }

    /// Posts an already classified announcement and its body reply.
    pub async fn deliver(&self, announcement: Announcement) -> NotifyOutcome {
        info!(
            matcher = announcement.matcher,
            channel = %announcement.channel,
            "Announcing deployment"
        );

        let top_level = ChatMessage {
            channel: announcement.channel.clone(),
            text: announcement.text,
            thread_ts: None,
        };

        let ts = match self.client.post_message(&top_level).await {
            Ok(posted) => {
                info!(channel = %posted.channel, ts = %posted.ts, "Message sent to channel");
                Some(posted.ts)
            }
            Err(e) => {
                warn!(channel = %announcement.channel, error = %e, "Failed to post message to channel");
                None
            }
        };

        let replied = match (&ts, announcement.reply) {
            (Some(parent), Some(text)) => {
                let reply = ChatMessage {
                    channel: announcement.channel.clone(),
                    text,
                    thread_ts: Some(parent.clone()),
                };
                match self.client.post_message(&reply).await {
                    Ok(posted) => {
                        info!(channel = %posted.channel, ts = %posted.ts, "Reply sent to thread");
                        true
                    }
                    Err(e) => {
                        warn!(channel = %announcement.channel, error = %e, "Failed to post thread reply");
                        false
                    }
                }
            }
            _ => false,
        };

        NotifyOutcome::Sent {
            channel: announcement.channel,
            ts,
            replied,
        }
    }
}
