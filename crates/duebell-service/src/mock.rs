use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use duebell_core::Issue;

use crate::{IssueTracker, OverdueQuery, ServiceError};

/// A mock tracker for testing that returns a fixed issue list
/// (or a failure) and counts how often it was queried.
pub struct MockTracker {
    issues: Vec<Issue>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockTracker {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self {
            issues,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::empty()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IssueTracker for MockTracker {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_overdue_issues(&self, query: &OverdueQuery) -> Result<Vec<Issue>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ServiceError::Connection("mock tracker failure".into()));
        }
        let mut issues: Vec<Issue> = self
            .issues
            .iter()
            .filter(|issue| issue.is_overdue(query.today))
            .cloned()
            .collect();
        issues.sort_by_key(|issue| issue.due_date);
        Ok(issues)
    }
}
