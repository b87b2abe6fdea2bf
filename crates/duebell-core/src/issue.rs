use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The person an issue is assigned to, as the tracker knows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
    pub name: String,
}

/// An open issue read from the tracker. Never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub due_date: NaiveDate,
    pub project: ProjectRef,
    #[serde(default)]
    pub assigned_to: Option<Assignee>,
}

impl Issue {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date <= today
    }
}
