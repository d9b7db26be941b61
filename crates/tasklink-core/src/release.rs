use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\s\[(?P<task_id>[0-9]*)\]").expect("task reference pattern")
});

// Checked against the rest of the line right after a reference. The regex
// crate has no look-around, so "not followed by a link" is a second match.
static LINK_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\(https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}(?-u:\b)[-a-zA-Z0-9()@:%_+.~#?&/=]*\)",
    )
    .expect("link suffix pattern")
});

/// A release note checklist item that names a task but has no link yet,
/// e.g. the `* [222]` in `* [222] pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReference {
    /// The matched prefix, `* [<digits>]`.
    pub matched: String,
    /// Digits between the brackets; may be empty for `* []`.
    pub digits: String,
}

impl TaskReference {
    /// Find an unlinked reference at the start of `line`.
    pub fn find(line: &str) -> Option<Self> {
        let caps = REFERENCE_RE.captures(line)?;
        let whole = caps.get(0)?;
        if LINK_SUFFIX_RE.is_match(&line[whole.end()..]) {
            return None;
        }
        Some(Self {
            matched: whole.as_str().to_string(),
            digits: caps["task_id"].to_string(),
        })
    }

    /// The task id to look up, if the brackets hold one.
    pub fn task_id(&self) -> Option<&str> {
        (!self.digits.is_empty()).then_some(self.digits.as_str())
    }

    /// Wrap the reference in a link: `* [222] pending` becomes
    /// `[* [222](<permalink>)] pending`.
    pub fn link(&self, line: &str, permalink: &str) -> String {
        line.replacen(
            &self.matched,
            &format!("[{}({permalink})]", self.matched),
            1,
        )
    }
}

/// Body of `PATCH /repos/{owner}/{repo}/releases/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseUpdate {
    pub body: String,
    pub draft: bool,
}

impl ReleaseUpdate {
    /// An update that publishes the release with the given body.
    pub fn publish(body: String) -> Self {
        Self { body, draft: false }
    }
}
