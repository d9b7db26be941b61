use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PayloadError;

/// Placeholder a PR template leaves in the body until the task link is injected.
pub const TASK_LINK_PLACEHOLDER: &str = "_asanaTaskLink_";

/// The subset of a GitHub webhook event this tool reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub pull_request: Option<PullRequestPayload>,
    #[serde(default)]
    pub issue: Option<IssuePayload>,
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub repository: Option<RepositoryPayload>,
    /// The whole event as received, for logging.
    #[serde(skip)]
    pub raw: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestPayload {
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub body: Option<String>,
    pub head: HeadPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadPayload {
    #[serde(rename = "ref")]
    pub git_ref: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuePayload {
    pub number: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryPayload {
    pub name: String,
    pub owner: OwnerPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerPayload {
    pub login: String,
}

impl EventPayload {
    /// Read and decode the event file GitHub Actions points `GITHUB_EVENT_PATH` at.
    pub fn from_file(path: &Path) -> Result<Self, PayloadError> {
        let raw = std::fs::read_to_string(path).map_err(|e| PayloadError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, PayloadError> {
        let raw: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| PayloadError::Decode(e.to_string()))?;
        let mut event: Self = serde_json::from_value(raw.clone())
            .map_err(|e| PayloadError::Decode(e.to_string()))?;
        event.raw = raw;
        Ok(event)
    }

    /// Issue number the same way the Actions toolkit resolves `context.issue`:
    /// pull request first, then the top-level number, then the issue.
    pub fn issue_number(&self) -> Option<u64> {
        self.pull_request
            .as_ref()
            .and_then(|pr| pr.number)
            .or(self.number)
            .or_else(|| self.issue.as_ref().map(|i| i.number))
    }

    pub fn repo(&self) -> Option<RepoRef> {
        self.repository.as_ref().map(|r| RepoRef {
            owner: r.owner.login.clone(),
            name: r.name.clone(),
        })
    }
}

/// Repository coordinates, `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Parse the `owner/repo` form used by `GITHUB_REPOSITORY`.
    pub fn parse(slug: &str) -> Result<Self, PayloadError> {
        match slug.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(PayloadError::InvalidRepository(slug.to_string())),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// What the PR annotator works on once the event has been accepted.
///
/// Repository and issue number are only needed to send an update, so they
/// stay unresolved until [`PullRequestContext::target`] asks for them.
#[derive(Debug, Clone)]
pub struct PullRequestContext {
    pub body: Option<String>,
    pub branch: String,
    pub issue_number: Option<u64>,
    pub repo: Option<RepoRef>,
}

impl PullRequestContext {
    /// Build the context from a pull request event. Returns `None` when the
    /// payload is not a pull request event at all.
    pub fn from_event(event: &EventPayload, repo: Option<RepoRef>) -> Option<Self> {
        let pr = event.pull_request.as_ref()?;
        Some(Self {
            body: pr.body.clone(),
            branch: pr.head.git_ref.clone(),
            issue_number: event.issue_number(),
            repo: repo.or_else(|| event.repo()),
        })
    }

    /// The body, if it still carries the task link placeholder.
    pub fn body_with_placeholder(&self) -> Option<&str> {
        self.body
            .as_deref()
            .filter(|b| b.contains(TASK_LINK_PLACEHOLDER))
    }

    /// Repository and issue number the update goes to.
    pub fn target(&self) -> Result<(&RepoRef, u64), PayloadError> {
        let repo = self
            .repo
            .as_ref()
            .ok_or(PayloadError::Missing("repository"))?;
        let number = self
            .issue_number
            .ok_or(PayloadError::Missing("pull_request.number"))?;
        Ok((repo, number))
    }
}

/// Body of `PATCH /repos/{owner}/{repo}/issues/{number}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueUpdate {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr_event() -> &'static str {
        r#"{
            "action": "opened",
            "number": 7,
            "pull_request": {
                "number": 7,
                "body": "Asana task: _asanaTaskLink_\n",
                "head": { "ref": "12345-fix-thing", "sha": "abc" }
            },
            "repository": { "name": "app", "owner": { "login": "acme" } }
        }"#
    }

    #[test]
    fn context_from_pull_request_event() {
        let event = EventPayload::from_json(pr_event()).unwrap();
        let ctx = PullRequestContext::from_event(&event, None).unwrap();
        assert_eq!(ctx.branch, "12345-fix-thing");
        assert_eq!(
            ctx.body_with_placeholder(),
            Some("Asana task: _asanaTaskLink_\n")
        );
        let (repo, number) = ctx.target().unwrap();
        assert_eq!(repo.to_string(), "acme/app");
        assert_eq!(number, 7);
    }

    #[test]
    fn explicit_repo_overrides_payload() {
        let event = EventPayload::from_json(pr_event()).unwrap();
        let repo = RepoRef::parse("other/place").unwrap();
        let ctx = PullRequestContext::from_event(&event, Some(repo)).unwrap();
        let (repo, _) = ctx.target().unwrap();
        assert_eq!(repo.owner, "other");
        assert_eq!(repo.name, "place");
    }

    #[test]
    fn push_event_is_not_a_pull_request() {
        let event = EventPayload::from_json(r#"{"ref":"refs/heads/main"}"#).unwrap();
        assert!(PullRequestContext::from_event(&event, None).is_none());
    }

    #[test]
    fn null_body_needs_no_link() {
        let event = EventPayload::from_json(
            r#"{"pull_request":{"number":1,"body":null,"head":{"ref":"1-x"}},
                "repository":{"name":"r","owner":{"login":"o"}}}"#,
        )
        .unwrap();
        let ctx = PullRequestContext::from_event(&event, None).unwrap();
        assert!(ctx.body.is_none());
        assert_eq!(ctx.body_with_placeholder(), None);
    }

    #[test]
    fn body_without_placeholder_needs_no_link() {
        let event = EventPayload::from_json(
            r#"{"pull_request":{"body":"linked already","head":{"ref":"1-x"}}}"#,
        )
        .unwrap();
        let ctx = PullRequestContext::from_event(&event, None).unwrap();
        assert_eq!(ctx.body_with_placeholder(), None);
    }

    #[test]
    fn unresolved_target_only_fails_when_asked() {
        let event = EventPayload::from_json(r#"{"pull_request":{"head":{"ref":"1-x"}}}"#)
            .unwrap();
        let ctx = PullRequestContext::from_event(&event, None).unwrap();
        assert_eq!(ctx.branch, "1-x");
        let err = ctx.target().unwrap_err();
        assert!(matches!(err, PayloadError::Missing("repository")));

        let ctx = PullRequestContext::from_event(&event, Some(RepoRef::parse("o/r").unwrap()))
            .unwrap();
        let err = ctx.target().unwrap_err();
        assert!(matches!(err, PayloadError::Missing("pull_request.number")));
    }

    #[test]
    fn raw_event_keeps_unknown_fields() {
        let event = EventPayload::from_json(pr_event()).unwrap();
        assert_eq!(event.raw["action"], "opened");
        assert_eq!(event.raw["pull_request"]["head"]["sha"], "abc");
    }

    #[test]
    fn issue_number_falls_back_to_top_level() {
        let event = EventPayload::from_json(
            r#"{"number":42,"pull_request":{"head":{"ref":"1-x"}}}"#,
        )
        .unwrap();
        assert_eq!(event.issue_number(), Some(42));
    }

    #[test]
    fn repo_ref_parse() {
        let repo = RepoRef::parse("acme/app").unwrap();
        assert_eq!(repo.owner, "acme");
        assert_eq!(repo.name, "app");
        assert!(RepoRef::parse("acme").is_err());
        assert!(RepoRef::parse("/app").is_err());
        assert!(RepoRef::parse("acme/").is_err());
        assert!(RepoRef::parse("a/b/c").is_err());
    }

    #[test]
    fn issue_update_omits_absent_title() {
        let update = IssueUpdate {
            body: "b".into(),
            title: None,
        };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"body":"b"}"#);
    }

    #[test]
    fn event_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, pr_event()).unwrap();
        let event = EventPayload::from_file(&path).unwrap();
        assert!(event.pull_request.is_some());

        let missing = EventPayload::from_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, PayloadError::Read { .. }));
    }
}
