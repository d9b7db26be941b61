use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tasklink_core::{IssueUpdate, ReleaseUpdate, RepoRef, Task};

use crate::{HostError, RepoHost, TaskTracker, TrackerError};

/// Build a task with a gid derived from its permalink.
pub fn task(name: &str, permalink_url: &str) -> Task {
    Task {
        gid: format!("gid-{permalink_url}"),
        name: name.to_string(),
        permalink_url: permalink_url.to_string(),
    }
}

/// A tracker answering searches from a fixed table, for tests.
/// Records every search text it receives.
#[derive(Default)]
pub struct MockTaskTracker {
    results: HashMap<String, Vec<Task>>,
    failing: HashSet<String>,
    panicking: HashSet<String>,
    delays: HashMap<String, Duration>,
    searches: Mutex<Vec<String>>,
}

impl MockTaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `task` to the results for search text `text`.
    pub fn with_task(mut self, text: &str, task: Task) -> Self {
        self.results.entry(text.to_string()).or_default().push(task);
        self
    }

    /// Make searches for `text` fail with a network error.
    pub fn with_failure(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    /// Make searches for `text` panic, as a crashed lookup task would.
    pub fn with_panic(mut self, text: &str) -> Self {
        self.panicking.insert(text.to_string());
        self
    }

    /// Delay the answer for `text`, to shuffle completion order.
    pub fn with_delay(mut self, text: &str, delay: Duration) -> Self {
        self.delays.insert(text.to_string(), delay);
        self
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TaskTracker for MockTaskTracker {
    async fn search_tasks(&self, text: &str) -> Result<Vec<Task>, TrackerError> {
        if let Ok(mut searches) = self.searches.lock() {
            searches.push(text.to_string());
        }
        if let Some(delay) = self.delays.get(text) {
            tokio::time::sleep(*delay).await;
        }
        if self.panicking.contains(text) {
            panic!("mock search panic for {text}");
        }
        if self.failing.contains(text) {
            return Err(TrackerError::Network("mock search failure".into()));
        }
        Ok(self.results.get(text).cloned().unwrap_or_default())
    }
}

/// A host that records updates instead of sending them.
#[derive(Default)]
pub struct MockRepoHost {
    fail: bool,
    issue_updates: Mutex<Vec<(RepoRef, u64, IssueUpdate)>>,
    release_updates: Mutex<Vec<(RepoRef, u64, ReleaseUpdate)>>,
}

impl MockRepoHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn issue_updates(&self) -> Vec<(RepoRef, u64, IssueUpdate)> {
        self.issue_updates
            .lock()
            .map(|u| u.clone())
            .unwrap_or_default()
    }

    pub fn release_updates(&self) -> Vec<(RepoRef, u64, ReleaseUpdate)> {
        self.release_updates
            .lock()
            .map(|u| u.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RepoHost for MockRepoHost {
    fn name(&self) -> &str {
        "mock"
    }

    async fn update_issue(
        &self,
        repo: &RepoRef,
        number: u64,
        update: &IssueUpdate,
    ) -> Result<(), HostError> {
        if self.fail {
            return Err(HostError::Api {
                status: 500,
                message: "mock issue update failure".into(),
            });
        }
        if let Ok(mut updates) = self.issue_updates.lock() {
            updates.push((repo.clone(), number, update.clone()));
        }
        Ok(())
    }

    async fn update_release(
        &self,
        repo: &RepoRef,
        release_id: u64,
        update: &ReleaseUpdate,
    ) -> Result<(), HostError> {
        if self.fail {
            return Err(HostError::Api {
                status: 500,
                message: "mock release update failure".into(),
            });
        }
        if let Ok(mut updates) = self.release_updates.lock() {
            updates.push((repo.clone(), release_id, update.clone()));
        }
        Ok(())
    }
}
