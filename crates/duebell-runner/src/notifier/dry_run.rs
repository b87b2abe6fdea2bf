use async_trait::async_trait;
use tracing::info;

use super::slack::post_message_payload;
use super::{ChatError, Notice, Notifier, PostedMessage};

/// Pretty-printed `chat.postMessage` body for `notice`.
pub fn render_payload(channel: &str, notice: &Notice) -> String {
    format!("{:#}", post_message_payload(channel, notice))
}

/// Logs the Slack payload instead of posting it.
pub struct DryRunNotifier {
    channel_id: String,
}

impl DryRunNotifier {
    pub fn new(channel_id: &str) -> Self {
        Self {
            channel_id: channel_id.to_string(),
        }
    }
}

#[async_trait]
impl Notifier for DryRunNotifier {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn notify(&self, notice: &Notice) -> Result<PostedMessage, ChatError> {
        let rendered = render_payload(&self.channel_id, notice);
        info!("dry run, not posting:\n{rendered}");
        Ok(PostedMessage {
            channel: self.channel_id.clone(),
            ts: "dry-run".into(),
        })
    }
}
