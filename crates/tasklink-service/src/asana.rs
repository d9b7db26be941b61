use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tasklink_core::Task;
use tracing::debug;

use crate::{TaskTracker, TrackerError};

pub const DEFAULT_ASANA_API_URL: &str = "https://app.asana.com/api/1.0";

/// Fields requested from the search endpoint.
const TASK_FIELDS: &str = "name,permalink_url";

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    #[serde(default)]
    data: Option<T>,
}

/// Async HTTP client for the Asana REST API, scoped to one workspace.
pub struct AsanaClient {
    base_url: String,
    client: Client,
    token: String,
    workspace_gid: String,
}

impl AsanaClient {
    pub fn new(base_url: &str, token: String, workspace_gid: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
            token,
            workspace_gid,
        }
    }

    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
    }
}

#[async_trait]
impl TaskTracker for AsanaClient {
    async fn search_tasks(&self, text: &str) -> Result<Vec<Task>, TrackerError> {
        let url = format!(
            "{}/workspaces/{}/tasks/search",
            self.base_url, self.workspace_gid
        );
        debug!("asana: searching workspace {} for {text:?}", self.workspace_gid);

        let builder = self
            .client
            .get(url)
            .query(&[("text", text), ("opt_fields", TASK_FIELDS)]);
        let resp = self
            .with_auth(builder)
            .send()
            .await
            .map_err(|e| TrackerError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(parse_error(status, resp).await);
        }

        let envelope = resp
            .json::<DataEnvelope<Vec<Task>>>()
            .await
            .map_err(|e| TrackerError::Network(format!("json decode: {e}")))?;
        Ok(envelope.data.unwrap_or_default())
    }
}

/// Asana reports failures as `{"errors": [{"message": "..."}]}`.
async fn parse_error(status: StatusCode, resp: reqwest::Response) -> TrackerError {
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["errors"][0]["message"].as_str().map(String::from))
        .unwrap_or(body);

    TrackerError::Api {
        status: status.as_u16(),
        message,
    }
}
