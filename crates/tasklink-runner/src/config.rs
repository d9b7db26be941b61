use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tasklink_core::{PayloadError, RepoRef};
use tasklink_service::{
    AsanaClient, GitHubClient, RepoHost, DEFAULT_ASANA_API_URL, DEFAULT_GITHUB_API_URL,
};

use crate::dry_run::DryRunHost;

#[derive(Debug, Parser)]
#[command(
    name = "tasklink",
    version,
    about = "Link Asana tasks into GitHub pull requests and releases"
)]
pub struct Cli {
    #[command(flatten)]
    pub asana: AsanaConfig,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inject the Asana task link into a pull request body (pull_request events)
    Pr {
        #[command(flatten)]
        github: GitHubConfig,

        /// Webhook payload of the triggering event
        #[arg(long, env = "GITHUB_EVENT_PATH")]
        event_path: PathBuf,
    },

    /// Link task references in a release body and publish the release
    Release {
        #[command(flatten)]
        github: GitHubConfig,

        /// Release body, one entry per line
        #[arg(long, env = "BODY")]
        body: String,

        /// Release to update
        #[arg(long, env = "RELEASE_ID")]
        release_id: u64,
    },

    /// Look up a single task and print its name and permalink
    Lookup {
        /// Short numeric task id
        task_id: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct AsanaConfig {
    /// Asana personal access token
    #[arg(long, env = "ASANA_PAT", hide_env_values = true)]
    pub asana_pat: String,

    /// Workspace searched for tasks
    #[arg(long, env = "WORKSPACE_GID")]
    pub workspace_gid: String,

    /// Asana API base URL
    #[arg(long, env = "ASANA_API_URL", default_value = DEFAULT_ASANA_API_URL)]
    pub asana_api_url: String,
}

impl AsanaConfig {
    pub fn client(&self) -> AsanaClient {
        AsanaClient::new(
            &self.asana_api_url,
            self.asana_pat.clone(),
            self.workspace_gid.clone(),
        )
    }
}

#[derive(Debug, Clone, Args)]
pub struct GitHubConfig {
    /// Token used for the issue and release updates
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_GITHUB_API_URL)]
    pub github_api_url: String,

    /// Repository as owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Log the update instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

impl GitHubConfig {
    pub fn repo(&self) -> Result<Option<RepoRef>, PayloadError> {
        self.repository.as_deref().map(RepoRef::parse).transpose()
    }

    pub fn host(&self) -> Box<dyn RepoHost> {
        if self.dry_run {
            Box::new(DryRunHost)
        } else {
            Box::new(GitHubClient::new(
                &self.github_api_url,
                self.github_token.clone(),
            ))
        }
    }
}
