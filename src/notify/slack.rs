//! Slack Web API client.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::SlackError;
use super::{ChatClient, ChatMessage, PostedMessage};

/// HTTP timeout for a single Slack call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `chat.postMessage` request body.
#[derive(Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
    as_user: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    thread_ts: Option<&'a str>,
}

/// `chat.postMessage` response body.
#[derive(Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Slack client posting as the bot user that owns the token.
pub struct SlackClient {
    client: Client,
    token: String,
    base_url: String,
}

impl SlackClient {
    /// Creates a client for the given token and API base URL.
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self, SlackError> {
        let token = token.into();
        if token.is_empty() {
            return Err(SlackError::TokenNotFound);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SlackError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat.postMessage", self.base_url)
    }

    async fn post(&self, message: &ChatMessage) -> Result<PostedMessage, SlackError> {
        let request = PostMessageRequest {
            channel: &message.channel,
            text: &message.text,
            as_user: true,
            thread_ts: message.thread_ts.as_deref(),
        };

        info!(
            url = %self.endpoint(),
            channel = %message.channel,
            threaded = message.thread_ts.is_some(),
            "Sending message to Slack"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| SlackError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SlackError::ApiRequestFailed(format!("HTTP {status}: {body}")));
        }

        let body: PostMessageResponse = response
            .json()
            .await
            .map_err(|e| SlackError::InvalidResponseFormat(e.to_string()))?;

        if !body.ok {
            return Err(SlackError::Api(
                body.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }

        let posted = PostedMessage {
            channel: body.channel.unwrap_or_else(|| message.channel.clone()),
            ts: body.ts.ok_or_else(|| {
                SlackError::InvalidResponseFormat("missing message timestamp".to_string())
            })?,
        };

        debug!(channel = %posted.channel, ts = %posted.ts, "Slack accepted message");

        Ok(posted)
    }
}

impl ChatClient for SlackClient {
    fn post_message<'a>(
        &'a self,
        message: &'a ChatMessage,
    ) -> Pin<Box<dyn Future<Output = Result<PostedMessage>> + Send + 'a>> {
        Box::pin(async move { Ok(self.post(message).await?) })
    }
}
