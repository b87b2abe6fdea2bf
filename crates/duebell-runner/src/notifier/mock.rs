use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatError, Notice, Notifier, PostedMessage};

/// A mock notifier for testing that records every notice it receives
/// and can be configured to fail like the chat API would.
#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<Notice>>,
    fail: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_failure(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn sent(&self) -> Vec<Notice> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn notify(&self, notice: &Notice) -> Result<PostedMessage, ChatError> {
        let count = {
            let mut sent = self
                .sent
                .lock()
                .map_err(|_| ChatError::Transport("mock notifier poisoned".into()))?;
            sent.push(notice.clone());
            sent.len()
        };
        if self.fail {
            return Err(ChatError::Api("channel_not_found".into()));
        }
        Ok(PostedMessage {
            channel: "CMOCK".into(),
            ts: format!("{count}.000"),
        })
    }
}
