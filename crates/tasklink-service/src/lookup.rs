use tasklink_core::Task;
use tracing::debug;

use crate::{TaskTracker, TrackerError};

/// Find the single task whose text matches `task_id`.
///
/// Zero hits is `NotFound`, more than one is `Ambiguous`. Transport errors
/// are returned as the tracker reported them; there is no retry.
pub async fn find_task(tracker: &dyn TaskTracker, task_id: &str) -> Result<Task, TrackerError> {
    let mut tasks = tracker.search_tasks(task_id).await?;
    debug!("search for task {task_id} returned {} result(s)", tasks.len());

    match tasks.len() {
        0 => Err(TrackerError::NotFound(task_id.to_string())),
        1 => Ok(tasks.remove(0)),
        count => Err(TrackerError::Ambiguous {
            task_id: task_id.to_string(),
            count,
        }),
    }
}
