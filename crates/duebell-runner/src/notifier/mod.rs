pub mod dry_run;
pub mod mock;
pub mod slack;

use async_trait::async_trait;
use duebell_core::message::FETCH_FAILED_WARNING;
use duebell_core::ChatMessage;
use thiserror::Error;

/// Errors raised by the chat API. The orchestrator logs these and stops.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The API answered but refused the request (`ok: false`).
    #[error("chat api error: {0}")]
    Api(String),

    #[error("chat transport error: {0}")]
    Transport(String),

    #[error("chat response decode failed: {0}")]
    Decode(String),
}

/// What gets posted at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The overdue digest; the fetch succeeded.
    Digest(ChatMessage),
    /// The tracker could not be queried; carries no issue data.
    FetchFailed,
}

impl Notice {
    pub fn fetch_succeeded(&self) -> bool {
        matches!(self, Notice::Digest(_))
    }

    /// Plain text of the post: the digest fallback or the fixed warning.
    pub fn text(&self) -> &str {
        match self {
            Notice::Digest(message) => &message.text,
            Notice::FetchFailed => FETCH_FAILED_WARNING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub channel: String,
    pub ts: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn notify(&self, notice: &Notice) -> Result<PostedMessage, ChatError>;
}
