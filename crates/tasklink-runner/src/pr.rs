use anyhow::{Context, Result};
use tasklink_core::pull_request::TASK_LINK_PLACEHOLDER;
use tasklink_core::{
    BranchRef, EventPayload, IssueUpdate, PullRequestContext, RepoRef, Task, TitleConvention,
};
use tasklink_service::{find_task, RepoHost, TaskTracker};
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrOutcome {
    /// The event carried no pull request.
    UnsupportedPayload,
    /// The head branch has no `<digits>-<slug>` part.
    UnsupportedBranch(String),
    /// No body, or no placeholder in it.
    NoUpdateNeeded,
    Updated(IssueUpdate),
}

/// Handle a pull request event: resolve the context, then [`annotate`].
///
/// `repo` overrides the repository named in the payload.
pub async fn annotate_pull_request(
    tracker: &dyn TaskTracker,
    host: &dyn RepoHost,
    event: &EventPayload,
    repo: Option<RepoRef>,
) -> Result<PrOutcome> {
    let Some(ctx) = PullRequestContext::from_event(event, repo) else {
        error!("Unsupported payload: {}", event.raw);
        return Ok(PrOutcome::UnsupportedPayload);
    };
    annotate(tracker, host, &ctx).await
}

/// Replace the placeholder in the PR body with a link to the branch's task.
///
/// A failed lookup aborts before anything is written to the host.
pub async fn annotate(
    tracker: &dyn TaskTracker,
    host: &dyn RepoHost,
    ctx: &PullRequestContext,
) -> Result<PrOutcome> {
    let Some(branch) = BranchRef::parse(&ctx.branch) else {
        error!("Unsupported branch name format: {}", ctx.branch);
        return Ok(PrOutcome::UnsupportedBranch(ctx.branch.clone()));
    };

    let Some(body) = ctx.body_with_placeholder() else {
        info!("Pull request doesn't need updating.");
        return Ok(PrOutcome::NoUpdateNeeded);
    };

    let task = find_task(tracker, &branch.task_id)
        .await
        .with_context(|| format!("look up task for branch {}", ctx.branch))?;

    let (repo, number) = ctx.target()?;
    let update = build_update(body, &task);
    host.update_issue(repo, number, &update)
        .await
        .with_context(|| format!("update {repo}#{number}"))?;

    info!("Updated pull request details.");
    Ok(PrOutcome::Updated(update))
}

/// New body (first placeholder replaced) and, when the task name follows the
/// `<digits> - <rest>` convention, a `[<digits>] <rest>` title.
pub fn build_update(body: &str, task: &Task) -> IssueUpdate {
    IssueUpdate {
        body: body.replacen(TASK_LINK_PLACEHOLDER, &task.markdown_link(), 1),
        title: TitleConvention::parse(&task.name).map(|c| c.pr_title()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklink_service::mock::task;

    #[test]
    fn build_update_links_and_renames() {
        let update = build_update(
            "Asana task: _asanaTaskLink_\n\nDetails",
            &task("12345 - Fix the thing", "U"),
        );
        assert_eq!(update.body, "Asana task: [12345 - Fix the thing](U)\n\nDetails");
        assert_eq!(update.title.as_deref(), Some("[12345] Fix the thing"));
    }

    #[test]
    fn build_update_replaces_first_placeholder_only() {
        let update = build_update("_asanaTaskLink_ _asanaTaskLink_", &task("n", "U"));
        assert_eq!(update.body, "[n](U) _asanaTaskLink_");
    }

    #[test]
    fn build_update_keeps_title_for_unconventional_name() {
        let update = build_update("_asanaTaskLink_", &task("Fix the thing", "U"));
        assert_eq!(update.title, None);
    }
}
