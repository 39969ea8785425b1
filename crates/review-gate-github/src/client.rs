//! GitHub REST client
//!
//! Thin typed wrapper over the handful of endpoints the gate needs. List
//! endpoints are paginated with `per_page=100` until a short page comes back.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::GitHubError;
use crate::models::{
    CheckRun, CheckRunOutput, CommentBody, CreateCheckRun, IssueComment, PullRequestFile,
    PullRequestReview, User,
};
use crate::Result;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Login of the identity behind the Actions `GITHUB_TOKEN`.
pub const DEFAULT_COMMENT_AUTHOR: &str = "github-actions[bot]";
const PER_PAGE: usize = 100;
const API_VERSION: &str = "2022-11-28";

/// GitHub client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// REST API root, e.g. `https://api.github.com`
    pub api_url: String,
    /// Token for repository endpoints
    pub token: Option<String>,
    /// Token for the team membership query; falls back to `token`
    pub team_token: Option<String>,
    /// Login that writes the gate comment; only its comments are updated
    pub comment_author: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        GitHubConfig {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            team_token: None,
            comment_author: DEFAULT_COMMENT_AUTHOR.to_string(),
            timeout_secs: 30,
        }
    }
}

impl GitHubConfig {
    /// Read `GITHUB_API_URL`, `GITHUB_TOKEN`, `REVIEW_GATE_TEAM_TOKEN` and
    /// `REVIEW_GATE_COMMENT_AUTHOR`.
    pub fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        GitHubConfig {
            api_url: var("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token: var("GITHUB_TOKEN"),
            team_token: var("REVIEW_GATE_TEAM_TOKEN"),
            comment_author: var("REVIEW_GATE_COMMENT_AUTHOR")
                .unwrap_or_else(|| DEFAULT_COMMENT_AUTHOR.to_string()),
            ..Self::default()
        }
    }

    /// Config for a specific API root
    pub fn new(api_url: &str) -> Self {
        GitHubConfig {
            api_url: api_url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn with_team_token(mut self, token: &str) -> Self {
        self.team_token = Some(token.to_string());
        self
    }

    pub fn with_comment_author(mut self, login: &str) -> Self {
        self.comment_author = login.to_string();
        self
    }
}

/// Client for the GitHub REST API
#[derive(Debug, Clone)]
pub struct GitHubClient {
    config: GitHubConfig,
    http_client: Client,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(concat!("review-gate/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GitHubError::Client(e.to_string()))?;

        Ok(GitHubClient {
            config,
            http_client,
        })
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GitHubConfig::from_env())
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        let builder = builder
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, operation: &'static str, builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| GitHubError::http(operation, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("GitHub API error during {}: {} - {}", operation, status, body);
            return Err(GitHubError::Api {
                operation,
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn get_paginated<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        token: Option<&str>,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let url = format!("{}?per_page={}&page={}", self.url(path), PER_PAGE, page);
            let request = self.authorize(self.http_client.get(&url), token);
            let batch: Vec<T> = self
                .send(operation, request)
                .await?
                .json()
                .await
                .map_err(|e| GitHubError::decode(operation, e))?;

            let count = batch.len();
            items.extend(batch);
            debug!(operation, page, count, "fetched page");

            if count < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    /// `GET /repos/{owner}/{repo}/pulls/{number}/files`
    pub async fn list_pull_request_files(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<PullRequestFile>> {
        let path = format!("/repos/{}/{}/pulls/{}/files", owner, repo, number);
        let files = self
            .get_paginated("list pull request files", &path, self.config.token.as_deref())
            .await?;
        info!("Found {} changed files on {}/{}#{}", files.len(), owner, repo, number);
        Ok(files)
    }

    /// `GET /repos/{owner}/{repo}/pulls/{number}/reviews`
    pub async fn list_pull_request_reviews(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<PullRequestReview>> {
        let path = format!("/repos/{}/{}/pulls/{}/reviews", owner, repo, number);
        let reviews = self
            .get_paginated("list pull request reviews", &path, self.config.token.as_deref())
            .await?;
        info!("Found {} reviews on {}/{}#{}", reviews.len(), owner, repo, number);
        Ok(reviews)
    }

    /// `GET /orgs/{org}/teams/{slug}/members`
    pub async fn list_team_members(&self, org: &str, slug: &str) -> Result<Vec<User>> {
        let path = format!("/orgs/{}/teams/{}/members", org, slug);
        let token = self
            .config
            .team_token
            .as_deref()
            .or(self.config.token.as_deref());
        let members = self
            .get_paginated("list team members", &path, token)
            .await?;
        info!("Found {} members in {}/{}", members.len(), org, slug);
        Ok(members)
    }

    /// `GET /repos/{owner}/{repo}/issues/{number}/comments`
    pub async fn list_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<IssueComment>> {
        let path = format!("/repos/{}/{}/issues/{}/comments", owner, repo, number);
        self.get_paginated("list issue comments", &path, self.config.token.as_deref())
            .await
    }

    /// `POST /repos/{owner}/{repo}/issues/{number}/comments`
    pub async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<IssueComment> {
        const OP: &str = "create issue comment";
        let url = self.url(&format!("/repos/{}/{}/issues/{}/comments", owner, repo, number));
        let request = self
            .authorize(self.http_client.post(&url), self.config.token.as_deref())
            .json(&CommentBody { body });

        let comment: IssueComment = self
            .send(OP, request)
            .await?
            .json()
            .await
            .map_err(|e| GitHubError::decode(OP, e))?;
        info!("Created comment {} on {}/{}#{}", comment.id, owner, repo, number);
        Ok(comment)
    }

    /// `PATCH /repos/{owner}/{repo}/issues/comments/{comment_id}`
    pub async fn update_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: u64,
        body: &str,
    ) -> Result<IssueComment> {
        const OP: &str = "update issue comment";
        let url = self.url(&format!(
            "/repos/{}/{}/issues/comments/{}",
            owner, repo, comment_id
        ));
        let request = self
            .authorize(self.http_client.patch(&url), self.config.token.as_deref())
            .json(&CommentBody { body });

        let comment: IssueComment = self
            .send(OP, request)
            .await?
            .json()
            .await
            .map_err(|e| GitHubError::decode(OP, e))?;
        info!("Updated comment {} in {}/{}", comment.id, owner, repo);
        Ok(comment)
    }

    /// `POST /repos/{owner}/{repo}/check-runs` with `status=completed`
    #[allow(clippy::too_many_arguments)]
    pub async fn create_completed_check_run(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        head_sha: &str,
        conclusion: &'static str,
        details_url: Option<&str>,
        title: &str,
        summary: &str,
    ) -> Result<CheckRun> {
        const OP: &str = "create check run";
        let url = self.url(&format!("/repos/{}/{}/check-runs", owner, repo));
        let payload = CreateCheckRun {
            name,
            head_sha,
            status: "completed",
            conclusion,
            details_url,
            output: CheckRunOutput { title, summary },
        };
        let request = self
            .authorize(self.http_client.post(&url), self.config.token.as_deref())
            .json(&payload);

        let check: CheckRun = self
            .send(OP, request)
            .await?
            .json()
            .await
            .map_err(|e| GitHubError::decode(OP, e))?;
        info!(
            "Created check run {} ({}) on {} in {}/{}",
            check.id, conclusion, head_sha, owner, repo
        );
        Ok(check)
    }
}
