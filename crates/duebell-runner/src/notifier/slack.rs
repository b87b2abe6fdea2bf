//! Slack Web API notifier (`chat.postMessage`).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use duebell_core::text::MAX_ERROR_BODY_CHARS;
use duebell_core::truncate_for_error;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{ChatError, Notice, Notifier, PostedMessage};

#[derive(Debug, Deserialize)]
struct ChatPostMessageResponse {
    ok: bool,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct SlackNotifier {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
    channel_id: String,
}

impl SlackNotifier {
    pub fn new(
        api_base: &str,
        bot_token: &str,
        channel_id: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to create slack api client")?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.trim().to_string(),
            channel_id: channel_id.to_string(),
        })
    }
}

/// Request body for `chat.postMessage`.
///
/// A digest carries its blocks with link unfurling off; a fetch failure is
/// the warning text alone.
pub fn post_message_payload(channel: &str, notice: &Notice) -> Value {
    match notice {
        Notice::Digest(message) => json!({
            "channel": channel,
            "text": message.text,
            "blocks": message.blocks,
            "unfurl_links": false,
        }),
        Notice::FetchFailed => json!({
            "channel": channel,
            "text": notice.text(),
        }),
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    fn name(&self) -> &str {
        "slack"
    }

    async fn notify(&self, notice: &Notice) -> Result<PostedMessage, ChatError> {
        let payload = post_message_payload(&self.channel_id, notice);
        let resp = self
            .http
            .post(format!("{}/chat.postMessage", self.api_base))
            .bearer_auth(&self.bot_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChatError::Transport(format!(
                "chat.postMessage returned {status}: {}",
                truncate_for_error(&body, MAX_ERROR_BODY_CHARS)
            )));
        }

        let body = resp
            .json::<ChatPostMessageResponse>()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))?;
        debug!("slack chat.postMessage response: {body:?}");

        if !body.ok {
            return Err(ChatError::Api(
                body.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        Ok(PostedMessage {
            channel: body.channel.unwrap_or_else(|| self.channel_id.clone()),
            ts: body.ts.unwrap_or_default(),
        })
    }
}
