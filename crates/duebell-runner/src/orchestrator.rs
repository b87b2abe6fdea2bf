use std::fmt;
use std::path::Path;

use duebell_core::mapping::load_mapping;
use duebell_core::{build_message, Issue};
use duebell_service::{IssueTracker, OverdueQuery, ServiceError};
use tracing::{debug, error, info};

use crate::notifier::{Notice, Notifier};

/// How a single invocation ended. Every variant is a normal exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The digest was posted.
    Notified { issue_count: usize },
    /// Nothing is overdue; no post was made.
    NothingToReport,
    /// The tracker query failed and the warning was posted.
    FailureNotified,
    /// The chat API rejected the post.
    NotifyFailed,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Notified { issue_count } => {
                write!(f, "notified ({issue_count} issues)")
            }
            RunOutcome::NothingToReport => f.write_str("nothing to report"),
            RunOutcome::FailureNotified => f.write_str("fetch failure notified"),
            RunOutcome::NotifyFailed => f.write_str("notify failed"),
        }
    }
}

/// Fetch overdue issues, then post the digest or the failure warning.
///
/// Each external call is made at most once. The mapping file is only read
/// when there is a digest to build.
pub async fn run_once(
    tracker: &dyn IssueTracker,
    notifier: &dyn Notifier,
    query: &OverdueQuery,
    mapping_file: &Path,
) -> RunOutcome {
    let fetched: Result<Vec<Issue>, ServiceError> = tracker.fetch_overdue_issues(query).await;

    let (notice, issue_count) = match fetched {
        Ok(issues) if issues.is_empty() => {
            info!("no overdue issues as of {}, nothing to notify", query.today);
            return RunOutcome::NothingToReport;
        }
        Ok(issues) => {
            info!(
                "found {} overdue issues in {} as of {}",
                issues.len(),
                tracker.name(),
                query.today
            );
            let mapping = load_mapping(mapping_file);
            (
                Notice::Digest(build_message(&issues, mapping.as_ref())),
                issues.len(),
            )
        }
        Err(e) => {
            error!("failed to fetch overdue issues from {}: {e}", tracker.name());
            (Notice::FetchFailed, 0)
        }
    };

    match notifier.notify(&notice).await {
        Ok(posted) => {
            debug!(
                "{} accepted message {} in {}",
                notifier.name(),
                posted.ts,
                posted.channel
            );
            if notice.fetch_succeeded() {
                RunOutcome::Notified { issue_count }
            } else {
                RunOutcome::FailureNotified
            }
        }
        Err(e) => {
            error!("failed to notify {}: {e}", notifier.name());
            RunOutcome::NotifyFailed
        }
    }
}
