//! Slack-specific error handling.

use thiserror::Error;

/// Slack Web API errors.
#[derive(Error, Debug)]
pub enum SlackError {
    /// No bot token was configured.
    #[error(
        "Slack access token not found. Set the slack-access-token input or SLACK_ACCESS_TOKEN environment variable"
    )]
    TokenNotFound,

    /// The HTTP request itself failed.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Slack answered with a non-success HTTP status.
    #[error("Slack API request failed: {0}")]
    ApiRequestFailed(String),

    /// Slack answered `ok: false`.
    #[error("Slack API returned error: {0}")]
    Api(String),

    /// The response body could not be decoded.
    #[error("Invalid response format from Slack API: {0}")]
    InvalidResponseFormat(String),
}
