use async_trait::async_trait;
use tasklink_core::{IssueUpdate, ReleaseUpdate, RepoRef};
use tasklink_service::{HostError, RepoHost};
use tracing::info;

/// A host that logs the updates it would send. Used with `--dry-run`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunHost;

#[async_trait]
impl RepoHost for DryRunHost {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn update_issue(
        &self,
        repo: &RepoRef,
        number: u64,
        update: &IssueUpdate,
    ) -> Result<(), HostError> {
        info!(
            "dry run: would update {repo}#{number}: {}",
            serde_json::to_string(update).unwrap_or_default()
        );
        Ok(())
    }

    async fn update_release(
        &self,
        repo: &RepoRef,
        release_id: u64,
        update: &ReleaseUpdate,
    ) -> Result<(), HostError> {
        info!(
            "dry run: would update release {release_id} in {repo}: {}",
            serde_json::to_string(update).unwrap_or_default()
        );
        Ok(())
    }
}
