//! Slack Block Kit payload for the overdue digest.
//!
//! The digest is a leading announcement section and divider, followed by
//! three blocks per issue: a linked title section, a context line with the
//! due date, assignee and project, and a divider.

use serde::{Deserialize, Serialize};

use crate::{IdentityMapping, Issue};

/// Announcement shown above the digest; also the notification fallback text.
pub const ANNOUNCEMENT: &str = "期限切れのタスクたちをお知らせしますぞ。";

/// Posted instead of the digest when the tracker could not be queried.
pub const FETCH_FAILED_WARNING: &str =
    ":warning: 期限切れタスクの通知に失敗しましたぞ。修正してくだされ。 :warning:";

/// Shown when an issue has no assignee.
pub const UNASSIGNED: &str = "なし";

const DUE_LABEL: &str = "締切：";
const ASSIGNEE_LABEL: &str = "担当：";
const PROJECT_LABEL: &str = "プロジェクト：";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    Mrkdwn { text: String },
}

impl TextObject {
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        TextObject::Mrkdwn { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            TextObject::Mrkdwn { text } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section { text: TextObject },
    Divider,
    Context { elements: Vec<TextObject> },
}

impl Block {
    pub fn section(text: impl Into<String>) -> Self {
        Block::Section {
            text: TextObject::mrkdwn(text),
        }
    }

    pub fn context(text: impl Into<String>) -> Self {
        Block::Context {
            elements: vec![TextObject::mrkdwn(text)],
        }
    }

    /// Text of a section, or the first element of a context block.
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Section { text } => Some(text.text()),
            Block::Context { elements } => elements.first().map(TextObject::text),
            Block::Divider => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Plain-text fallback for notifications and clients without block support.
    pub text: String,
    pub blocks: Vec<Block>,
}

/// Build the digest for `issues`, keeping their order.
pub fn build_message<'a, I>(issues: I, mapping: Option<&IdentityMapping>) -> ChatMessage
where
    I: IntoIterator<Item = &'a Issue>,
{
    let mut blocks = vec![Block::section(ANNOUNCEMENT), Block::Divider];

    for issue in issues {
        blocks.push(Block::section(format!(
            "*<{}|#{} {}>*",
            issue.url,
            issue.id,
            escape(&issue.title)
        )));
        blocks.push(Block::context(format!(
            "{DUE_LABEL}{}\n{ASSIGNEE_LABEL}{}\n{PROJECT_LABEL}{}",
            issue.due_date,
            assignee_display(issue, mapping),
            escape(&issue.project.name)
        )));
        blocks.push(Block::Divider);
    }

    ChatMessage {
        text: ANNOUNCEMENT.to_string(),
        blocks,
    }
}

/// Resolve how the assignee is shown: placeholder, plain name, or mention.
pub fn assignee_display(issue: &Issue, mapping: Option<&IdentityMapping>) -> String {
    let Some(assignee) = &issue.assigned_to else {
        return UNASSIGNED.to_string();
    };
    match mapping.and_then(|m| m.chat_id_for(&assignee.id)) {
        Some(chat_id) => mention(chat_id),
        None => escape(&assignee.name),
    }
}

pub fn mention(chat_id: &str) -> String {
    format!("<@{chat_id}>")
}

/// Escape the characters Slack treats as control sequences in mrkdwn.
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
