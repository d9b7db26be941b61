use std::sync::Arc;

use anyhow::{Context, Result};
use tasklink_core::{ReleaseUpdate, RepoRef, TaskReference};
use tasklink_service::{find_task, RepoHost, TaskTracker};
use tracing::{debug, error, info};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseOutcome {
    pub body: String,
    /// Lines that gained a task link.
    pub linked: usize,
    /// Lines with a task reference whose lookup failed.
    pub unresolved: usize,
}

enum LineRewrite {
    Unchanged(String),
    Linked(String),
    Unresolved(String),
}

/// Link every task reference in `body`, then publish the release with the
/// rewritten body. Lookup failures leave their line as it was; a failed
/// release update is returned as an error.
pub async fn annotate_release(
    tracker: Arc<dyn TaskTracker>,
    host: &dyn RepoHost,
    repo: &RepoRef,
    release_id: u64,
    body: &str,
) -> Result<ReleaseOutcome> {
    let outcome = rewrite_body(tracker, body).await;

    host.update_release(repo, release_id, &ReleaseUpdate::publish(outcome.body.clone()))
        .await
        .with_context(|| format!("publish release {release_id} in {repo}"))?;

    info!(
        "published release {release_id}: {} linked, {} unresolved",
        outcome.linked, outcome.unresolved
    );
    Ok(outcome)
}

/// Rewrite each line on its own task. Handles are awaited in line order, so
/// the result keeps the original order whatever order lookups finish in.
pub async fn rewrite_body(tracker: Arc<dyn TaskTracker>, body: &str) -> ReleaseOutcome {
    let lines: Vec<String> = body.split('\n').map(String::from).collect();

    let handles: Vec<_> = lines
        .iter()
        .cloned()
        .map(|line| {
            let tracker = tracker.clone();
            tokio::spawn(async move { rewrite_line(tracker.as_ref(), line).await })
        })
        .collect();

    let mut outcome = ReleaseOutcome::default();
    let mut rewritten = Vec::with_capacity(lines.len());
    for (handle, original) in handles.into_iter().zip(lines) {
        match handle.await {
            Ok(LineRewrite::Unchanged(line)) => rewritten.push(line),
            Ok(LineRewrite::Linked(line)) => {
                outcome.linked += 1;
                rewritten.push(line);
            }
            Ok(LineRewrite::Unresolved(line)) => {
                outcome.unresolved += 1;
                rewritten.push(line);
            }
            Err(e) => {
                error!("line task failed, keeping line as is: {e}");
                outcome.unresolved += 1;
                rewritten.push(original);
            }
        }
    }

    outcome.body = rewritten.join("\n");
    outcome
}

async fn rewrite_line(tracker: &dyn TaskTracker, line: String) -> LineRewrite {
    let Some(reference) = TaskReference::find(&line) else {
        return LineRewrite::Unchanged(line);
    };
    let Some(task_id) = reference.task_id() else {
        debug!("task reference without id: {line:?}");
        return LineRewrite::Unchanged(line);
    };

    match find_task(tracker, task_id).await {
        Ok(task) => LineRewrite::Linked(reference.link(&line, &task.permalink_url)),
        Err(e) => {
            info!("{e}");
            LineRewrite::Unresolved(line)
        }
    }
}
