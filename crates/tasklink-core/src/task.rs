use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static TASK_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<task_id>\d+) - (?P<task_name>.*)$").expect("task name pattern")
});

/// An Asana task as returned by a workspace search.
///
/// Only `name` and `permalink_url` are requested from the API; `gid` comes
/// back with every compact record regardless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub gid: String,
    pub name: String,
    pub permalink_url: String,
}

impl Task {
    /// Markdown link to the task, `[name](permalink)`.
    pub fn markdown_link(&self) -> String {
        format!("[{}]({})", self.name, self.permalink_url)
    }
}

/// A task name following the `<digits> - <rest>` convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleConvention {
    pub task_id: String,
    pub rest: String,
}

impl TitleConvention {
    pub fn parse(task_name: &str) -> Option<Self> {
        let caps = TASK_NAME_RE.captures(task_name)?;
        Some(Self {
            task_id: caps["task_id"].to_string(),
            rest: caps["task_name"].to_string(),
        })
    }

    /// Pull request title for this task: `[<digits>] <rest>`.
    pub fn pr_title(&self) -> String {
        format!("[{}] {}", self.task_id, self.rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_from_conventional_name() {
        let conv = TitleConvention::parse("12345 - Fix the thing").unwrap();
        assert_eq!(conv.task_id, "12345");
        assert_eq!(conv.rest, "Fix the thing");
        assert_eq!(conv.pr_title(), "[12345] Fix the thing");
    }

    #[test]
    fn title_rest_may_contain_separator() {
        let conv = TitleConvention::parse("7 - a - b").unwrap();
        assert_eq!(conv.pr_title(), "[7] a - b");
    }

    #[test]
    fn title_requires_leading_digits_and_spaced_dash() {
        assert_eq!(TitleConvention::parse("Fix the thing"), None);
        assert_eq!(TitleConvention::parse("12345-Fix the thing"), None);
        assert_eq!(TitleConvention::parse("x12345 - Fix"), None);
        assert_eq!(TitleConvention::parse(""), None);
    }

    #[test]
    fn markdown_link_format() {
        let task = Task {
            gid: "1".into(),
            name: "12345 - Fix the thing".into(),
            permalink_url: "https://app.asana.com/0/1/2".into(),
        };
        assert_eq!(
            task.markdown_link(),
            "[12345 - Fix the thing](https://app.asana.com/0/1/2)"
        );
    }

    #[test]
    fn task_decodes_without_gid() {
        let task: Task =
            serde_json::from_str(r#"{"name":"n","permalink_url":"u"}"#).unwrap();
        assert_eq!(task.gid, "");
        assert_eq!(task.name, "n");
    }
}
