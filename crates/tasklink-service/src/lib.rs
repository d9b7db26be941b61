mod asana;
mod github;
mod lookup;
pub mod mock;
mod traits;

pub use asana::{AsanaClient, DEFAULT_ASANA_API_URL};
pub use github::{GitHubClient, DEFAULT_GITHUB_API_URL};
pub use lookup::find_task;
pub use traits::{HostError, RepoHost, TaskTracker, TrackerError};
