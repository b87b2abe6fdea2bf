pub mod mock;
mod redmine;
mod traits;

pub use redmine::RedmineService;
pub use traits::{IssueTracker, OverdueQuery, ServiceError};
