use anyhow::{Context, Result};
use clap::Parser;
use duebell_runner::config::RunnerConfig;
use duebell_runner::notifier::dry_run::DryRunNotifier;
use duebell_runner::notifier::slack::SlackNotifier;
use duebell_runner::notifier::Notifier;
use duebell_runner::orchestrator;
use duebell_service::{OverdueQuery, RedmineService};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = RunnerConfig::parse();
    info!("duebell starting");
    info!("redmine: {}", config.redmine_url);

    let tracker = RedmineService::with_timeout(
        &config.redmine_url,
        config.redmine_api_key.clone(),
        config.request_timeout(),
    )
    .context("failed to create redmine client")?;

    let notifier: Box<dyn Notifier> = if config.dry_run {
        Box::new(DryRunNotifier::new(&config.slack_channel_id))
    } else {
        Box::new(SlackNotifier::new(
            &config.slack_api_base,
            &config.slack_bot_token,
            &config.slack_channel_id,
            config.request_timeout(),
        )?)
    };

    let query = OverdueQuery::as_of(config.today());
    let outcome =
        orchestrator::run_once(&tracker, notifier.as_ref(), &query, &config.mapping_file).await;
    info!("run finished: {outcome}");
    Ok(())
}
