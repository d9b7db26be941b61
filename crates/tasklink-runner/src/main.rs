use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tasklink_core::EventPayload;
use tasklink_runner::config::{Cli, Command};
use tasklink_runner::{pr, release};
use tasklink_service::{find_task, TaskTracker};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let tracker: Arc<dyn TaskTracker> = Arc::new(cli.asana.client());

    match cli.command {
        Command::Pr { github, event_path } => {
            let event = EventPayload::from_file(&event_path)?;
            let host = github.host();
            info!("annotating pull request via {}", host.name());
            let outcome =
                pr::annotate_pull_request(tracker.as_ref(), host.as_ref(), &event, github.repo()?)
                    .await?;
            info!("pull request: {outcome:?}");
        }
        Command::Release {
            github,
            body,
            release_id,
        } => {
            let repo = github
                .repo()?
                .context("GITHUB_REPOSITORY (or --repository) is required for releases")?;
            let host = github.host();
            info!("annotating release {release_id} in {repo} via {}", host.name());
            release::annotate_release(tracker, host.as_ref(), &repo, release_id, &body).await?;
        }
        Command::Lookup { task_id } => {
            let task = find_task(tracker.as_ref(), &task_id).await?;
            println!("{}\t{}", task.name, task.permalink_url);
        }
    }

    Ok(())
}
