use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::Parser;
use duebell_core::mapping::DEFAULT_MAPPING_FILE;

pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";

#[derive(Clone, Parser)]
#[command(name = "duebell", about = "Post overdue Redmine issues to a Slack channel")]
pub struct RunnerConfig {
    /// Redmine base URL
    #[arg(long, env = "REDMINE_URL")]
    pub redmine_url: String,

    /// Redmine REST API key
    #[arg(long, env = "REDMINE_API_KEY", hide_env_values = true)]
    pub redmine_api_key: String,

    /// Slack bot token (xoxb-...)
    #[arg(long, env = "SLACK_BOT_TOKEN", hide_env_values = true)]
    pub slack_bot_token: String,

    /// Slack channel to post to
    #[arg(long, env = "SLACK_CHANNEL_ID")]
    pub slack_channel_id: String,

    /// Slack Web API base URL
    #[arg(long, env = "SLACK_API_BASE", default_value = DEFAULT_SLACK_API_BASE)]
    pub slack_api_base: String,

    /// JSON file mapping Redmine user ids to Slack user ids
    #[arg(long, env = "DUEBELL_MAPPING_FILE", default_value = DEFAULT_MAPPING_FILE)]
    pub mapping_file: PathBuf,

    /// Treat this date (YYYY-MM-DD) as today instead of the local date
    #[arg(long, env = "DUEBELL_AS_OF")]
    pub as_of: Option<NaiveDate>,

    /// HTTP request timeout (seconds, at least 1)
    #[arg(
        long,
        env = "DUEBELL_REQUEST_TIMEOUT",
        default_value = "30",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub request_timeout: u64,

    /// Log the Slack payload instead of posting it
    #[arg(long)]
    pub dry_run: bool,
}

impl RunnerConfig {
    pub fn today(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl fmt::Debug for RunnerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerConfig")
            .field("redmine_url", &self.redmine_url)
            .field("redmine_api_key", &"<redacted>")
            .field("slack_bot_token", &"<redacted>")
            .field("slack_channel_id", &self.slack_channel_id)
            .field("slack_api_base", &self.slack_api_base)
            .field("mapping_file", &self.mapping_file)
            .field("as_of", &self.as_of)
            .field("request_timeout", &self.request_timeout)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}
