use std::sync::LazyLock;

use regex::Regex;

static BRANCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<task_id>\d+)-(?P<task_slug>.+)").expect("branch pattern")
});

/// Task reference carried by a branch name such as `12345-fix-thing`.
///
/// The pattern is not anchored, so `feature/12345-fix-thing` yields the same
/// id. The first digit run followed by a dash wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    pub task_id: String,
    pub slug: String,
}

impl BranchRef {
    pub fn parse(branch: &str) -> Option<Self> {
        let caps = BRANCH_RE.captures(branch)?;
        Some(Self {
            task_id: caps["task_id"].to_string(),
            slug: caps["task_slug"].to_string(),
        })
    }
}
