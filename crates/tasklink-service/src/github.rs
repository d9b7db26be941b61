use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use tasklink_core::{IssueUpdate, ReleaseUpdate, RepoRef};
use tracing::info;

use crate::{HostError, RepoHost};

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";

/// Async client for the GitHub REST endpoints this tool writes to.
pub struct GitHubClient {
    base_url: String,
    client: Client,
    token: String,
}

impl GitHubClient {
    pub fn new(base_url: &str, token: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
            token,
        }
    }

    /// GitHub rejects requests without a User-Agent.
    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header(
                "User-Agent",
                concat!("tasklink/", env!("CARGO_PKG_VERSION")),
            )
    }

    async fn patch_json<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), HostError> {
        let builder = self
            .client
            .patch(format!("{}{path}", self.base_url))
            .json(body);
        let resp = self
            .with_auth(builder)
            .send()
            .await
            .map_err(|e| HostError::Network(e.to_string()))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(parse_error(resp.status(), resp).await)
        }
    }
}

#[async_trait]
impl RepoHost for GitHubClient {
    fn name(&self) -> &str {
        "github"
    }

    async fn update_issue(
        &self,
        repo: &RepoRef,
        number: u64,
        update: &IssueUpdate,
    ) -> Result<(), HostError> {
        self.patch_json(
            &format!("/repos/{}/{}/issues/{number}", repo.owner, repo.name),
            update,
        )
        .await?;
        info!("github: updated {repo}#{number}");
        Ok(())
    }

    async fn update_release(
        &self,
        repo: &RepoRef,
        release_id: u64,
        update: &ReleaseUpdate,
    ) -> Result<(), HostError> {
        self.patch_json(
            &format!("/repos/{}/{}/releases/{release_id}", repo.owner, repo.name),
            update,
        )
        .await?;
        info!("github: updated release {release_id} in {repo} (draft={})", update.draft);
        Ok(())
    }
}

/// GitHub reports failures as `{"message": "..."}`.
async fn parse_error(status: StatusCode, resp: reqwest::Response) -> HostError {
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["message"].as_str().map(String::from))
        .unwrap_or(body);

    HostError::Api {
        status: status.as_u16(),
        message,
    }
}
