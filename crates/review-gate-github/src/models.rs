//! Wire shapes of the GitHub REST resources used by the gate, and their
//! validation into domain records.

use chrono::{DateTime, Utc};
use review_gate_core::{Review, ReviewState};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;

#[derive(Debug, Deserialize)]
pub struct PullRequestFile {
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestReview {
    pub id: u64,
    /// `null` for reviews left by deleted accounts.
    pub user: Option<User>,
    pub state: String,
    /// Absent while a review is still pending.
    pub submitted_at: Option<DateTime<Utc>>,
}

impl PullRequestReview {
    /// Validate into a domain [`Review`].
    ///
    /// Reviews without an author or without a submission time cannot take
    /// part in the gate and are dropped (`Ok(None)`). An unknown state is an
    /// error.
    pub fn into_review(self) -> Result<Option<Review>> {
        let state: ReviewState = self.state.parse()?;

        let Some(user) = self.user else {
            debug!(review_id = self.id, "dropping review without author");
            return Ok(None);
        };
        let Some(submitted_at) = self.submitted_at else {
            debug!(review_id = self.id, author = %user.login, "dropping unsubmitted review");
            return Ok(None);
        };

        Ok(Some(Review::new(user.login, state, submitted_at)))
    }
}

#[derive(Debug, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub body: Option<String>,
}

impl IssueComment {
    /// Whether this is a gate comment: written by `author` and opening with
    /// `marker`.
    pub fn is_gate_comment(&self, author: &str, marker: &str) -> bool {
        let by_author = self.user.as_ref().is_some_and(|u| u.login == author);
        by_author && self.body.as_deref().is_some_and(|b| b.starts_with(marker))
    }
}

#[derive(Debug, Serialize)]
pub struct CommentBody<'a> {
    pub body: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CheckRunOutput<'a> {
    pub title: &'a str,
    pub summary: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CreateCheckRun<'a> {
    pub name: &'a str,
    pub head_sha: &'a str,
    pub status: &'static str,
    pub conclusion: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details_url: Option<&'a str>,
    pub output: CheckRunOutput<'a>,
}

#[derive(Debug, Deserialize)]
pub struct CheckRun {
    pub id: u64,
}
