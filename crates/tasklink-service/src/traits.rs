use async_trait::async_trait;
use tasklink_core::{IssueUpdate, ReleaseUpdate, RepoRef, Task};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("could not find the Asana task with id {0}")]
    NotFound(String),

    #[error("found {count} Asana tasks with id {task_id}")]
    Ambiguous { task_id: String, count: usize },

    #[error("network error: {0}")]
    Network(String),

    #[error("asana api error ({status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("network error: {0}")]
    Network(String),

    #[error("github api error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Full-text search over the tasks of one workspace.
///
/// `AsanaClient` talks to the Asana REST API; `mock::MockTaskTracker`
/// answers from a fixed table.
#[async_trait]
pub trait TaskTracker: Send + Sync {
    /// Tasks whose text matches `text`, with only name and permalink populated.
    async fn search_tasks(&self, text: &str) -> Result<Vec<Task>, TrackerError>;
}

/// Write side of the source-control host.
#[async_trait]
pub trait RepoHost: Send + Sync {
    fn name(&self) -> &str;

    async fn update_issue(
        &self,
        repo: &RepoRef,
        number: u64,
        update: &IssueUpdate,
    ) -> Result<(), HostError>;

    async fn update_release(
        &self,
        repo: &RepoRef,
        release_id: u64,
        update: &ReleaseUpdate,
    ) -> Result<(), HostError>;
}
