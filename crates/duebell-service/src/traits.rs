use async_trait::async_trait;
use chrono::NaiveDate;
use duebell_core::Issue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("decode failed: {0}")]
    Decode(String),
}

/// Selects open issues due on or before `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverdueQuery {
    pub today: NaiveDate,
}

impl OverdueQuery {
    pub fn as_of(today: NaiveDate) -> Self {
        Self { today }
    }
}

/// Read-only access to an issue tracker.
///
/// `RedmineService` talks to a Redmine server over its REST API.
/// `mock::MockTracker` serves canned results for tests.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    fn name(&self) -> &str;

    /// Open issues due on or before `query.today`, ascending by due date.
    async fn fetch_overdue_issues(&self, query: &OverdueQuery) -> Result<Vec<Issue>, ServiceError>;
}
