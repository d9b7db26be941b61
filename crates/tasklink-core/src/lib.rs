pub mod branch;
pub mod error;
pub mod pull_request;
pub mod release;
pub mod task;

pub use branch::BranchRef;
pub use error::PayloadError;
pub use pull_request::{EventPayload, IssueUpdate, PullRequestContext, RepoRef};
pub use release::{ReleaseUpdate, TaskReference};
pub use task::{Task, TitleConvention};
