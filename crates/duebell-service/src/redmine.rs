use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use duebell_core::text::MAX_ERROR_BODY_CHARS;
use duebell_core::{truncate_for_error, Assignee, Issue, ProjectRef};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::{IssueTracker, OverdueQuery, ServiceError};

/// Redmine caps a single page at 100 issues.
const PAGE_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
struct IssuesPage {
    issues: Vec<RedmineIssue>,
    #[serde(default)]
    total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RedmineIssue {
    id: u64,
    subject: String,
    #[serde(default)]
    due_date: Option<NaiveDate>,
    project: IdName,
    #[serde(default)]
    assigned_to: Option<IdName>,
}

#[derive(Debug, Deserialize)]
struct IdName {
    id: u64,
    name: String,
}

/// Async HTTP client for the Redmine REST API.
pub struct RedmineService {
    base_url: String,
    client: Client,
    api_key: String,
}

impl RedmineService {
    pub fn new(base_url: &str, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            api_key,
        }
    }

    /// Like `new`, with a per-request timeout.
    pub fn with_timeout(
        base_url: &str,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::InvalidInput(format!("build client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn issue_url(&self, id: u64) -> String {
        format!("{}/issues/{id}", self.base_url)
    }

    fn overdue_url(&self, query: &OverdueQuery) -> Result<Url, ServiceError> {
        let mut url = Url::parse(&format!("{}/issues.json", self.base_url))
            .map_err(|e| ServiceError::InvalidInput(format!("invalid base url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("status_id", "open")
            .append_pair("due_date", &format!("<={}", query.today))
            .append_pair("sort", "due_date:asc")
            .append_pair("limit", &PAGE_LIMIT.to_string());
        Ok(url)
    }

    fn to_issue(&self, raw: RedmineIssue) -> Option<Issue> {
        let Some(due_date) = raw.due_date else {
            warn!("issue #{} has no due date, skipping", raw.id);
            return None;
        };
        Some(Issue {
            id: raw.id,
            url: self.issue_url(raw.id),
            title: raw.subject,
            due_date,
            project: ProjectRef {
                id: raw.project.id.to_string(),
                name: raw.project.name,
            },
            assigned_to: raw.assigned_to.map(|a| Assignee {
                id: a.id.to_string(),
                name: a.name,
            }),
        })
    }
}

#[async_trait]
impl IssueTracker for RedmineService {
    fn name(&self) -> &str {
        "redmine"
    }

    async fn fetch_overdue_issues(&self, query: &OverdueQuery) -> Result<Vec<Issue>, ServiceError> {
        let url = self.overdue_url(query)?;
        debug!("querying {}", url.path());
        let resp = self
            .client
            .get(url)
            .header("X-Redmine-API-Key", self.api_key.as_str())
            .send()
            .await
            .map_err(|e| ServiceError::Connection(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(parse_error(status, resp).await);
        }

        let page = resp
            .json::<IssuesPage>()
            .await
            .map_err(|e| ServiceError::Decode(format!("json decode: {e}")))?;

        if let Some(total) = page.total_count {
            if total > page.issues.len() as u64 {
                warn!(
                    "redmine reported {total} overdue issues, only the first {} are included",
                    page.issues.len()
                );
            }
        }

        let mut issues: Vec<Issue> = page
            .issues
            .into_iter()
            .filter_map(|raw| self.to_issue(raw))
            .collect();
        issues.sort_by_key(|issue| issue.due_date);
        Ok(issues)
    }
}

async fn parse_error(status: StatusCode, resp: reqwest::Response) -> ServiceError {
    let body = resp.text().await.unwrap_or_default();
    let msg = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v["errors"].as_array().map(|errs| {
                errs.iter()
                    .filter_map(|e| e.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            })
        })
        .filter(|m| !m.is_empty())
        .unwrap_or(body);
    let msg = truncate_for_error(&msg, MAX_ERROR_BODY_CHARS);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceError::Unauthorized(msg),
        StatusCode::NOT_FOUND => ServiceError::NotFound(msg),
        _ => ServiceError::Status {
            status: status.as_u16(),
            body: msg,
        },
    }
}
