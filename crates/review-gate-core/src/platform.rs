//! Collaborator traits for the code-review platform.
//!
//! - `PullRequestSource`: read-only queries (files, reviews, team members)
//! - `Notifier`: the two writes a run performs (comment upsert, check run)
//!
//! Both traits are async and backend-agnostic. In-memory fakes live in the
//! `fakes` module; the GitHub implementation lives in `review-gate-github`.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{
    ChangedFileSet, CheckConclusion, PullRequestRef, Result, ReviewHistory, TeamRef, TeamRoster,
};

/// Read side of the platform.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Paths changed by the pull request.
    async fn changed_files(&self, pr: &PullRequestRef) -> Result<ChangedFileSet>;

    /// All submitted reviews of the pull request.
    async fn reviews(&self, pr: &PullRequestRef) -> Result<ReviewHistory>;

    /// Current members of `team`.
    async fn team_members(&self, team: &TeamRef) -> Result<TeamRoster>;
}

/// What happened to the marker comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "id", rename_all = "snake_case")]
pub enum CommentUpsert {
    Created(u64),
    Updated(u64),
    /// Nothing was sent (dry run).
    Skipped,
}

/// A completed check run to publish against the head commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRunRequest {
    pub name: String,
    pub head_sha: String,
    pub conclusion: CheckConclusion,
    pub details_url: Option<String>,
    pub title: String,
    pub summary: String,
}

/// Write side of the platform.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Create the comment whose body contains `marker`, or update it in place
    /// if it already exists.
    async fn upsert_comment(
        &self,
        pr: &PullRequestRef,
        marker: &str,
        body: &str,
    ) -> Result<CommentUpsert>;

    /// Publish a completed check run.
    async fn publish_check(&self, pr: &PullRequestRef, check: &CheckRunRequest) -> Result<()>;
}
