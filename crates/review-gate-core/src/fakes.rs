//! In-memory fakes for the platform traits (testing only)
//!
//! `MemoryPlatform` serves canned files, reviews and rosters, and records
//! every comment and check run written to it.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{
    ChangedFileSet, GateError, PullRequestRef, Result, ReviewHistory, TeamRef, TeamRoster,
};
use crate::platform::{CheckRunRequest, CommentUpsert, Notifier, PullRequestSource};

/// A comment stored by [`MemoryPlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredComment {
    pub id: u64,
    pub pr_number: u64,
    pub body: String,
}

#[derive(Debug, Default)]
struct PlatformState {
    comments: Vec<StoredComment>,
    checks: Vec<CheckRunRequest>,
    next_comment_id: u64,
    calls: Vec<&'static str>,
}

/// In-memory platform for a single pull request.
#[derive(Debug, Default)]
pub struct MemoryPlatform {
    files: ChangedFileSet,
    reviews: ReviewHistory,
    teams: HashMap<String, TeamRoster>,
    failing: Option<&'static str>,
    state: Mutex<PlatformState>,
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(mut self, files: ChangedFileSet) -> Self {
        self.files = files;
        self
    }

    pub fn with_reviews(mut self, reviews: ReviewHistory) -> Self {
        self.reviews = reviews;
        self
    }

    pub fn with_team(mut self, team: &TeamRef, roster: TeamRoster) -> Self {
        self.teams.insert(team.to_string(), roster);
        self
    }

    /// Make the named operation (`changed_files`, `reviews`, `team_members`,
    /// `upsert_comment`, `publish_check`) return a platform error.
    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.failing = Some(operation);
        self
    }

    /// Seed an existing comment, as if left by an earlier run.
    pub fn with_comment(self, pr_number: u64, body: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_comment_id += 1;
            let id = state.next_comment_id;
            state.comments.push(StoredComment {
                id,
                pr_number,
                body: body.to_string(),
            });
        }
        self
    }

    pub fn comments(&self) -> Vec<StoredComment> {
        self.state.lock().unwrap().comments.clone()
    }

    pub fn checks(&self) -> Vec<CheckRunRequest> {
        self.state.lock().unwrap().checks.clone()
    }

    /// Operations invoked so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    fn enter(&self, operation: &'static str) -> Result<()> {
        self.state.lock().unwrap().calls.push(operation);
        if self.failing == Some(operation) {
            return Err(GateError::platform(operation, "injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl PullRequestSource for MemoryPlatform {
    async fn changed_files(&self, _pr: &PullRequestRef) -> Result<ChangedFileSet> {
        self.enter("changed_files")?;
        Ok(self.files.clone())
    }

    async fn reviews(&self, _pr: &PullRequestRef) -> Result<ReviewHistory> {
        self.enter("reviews")?;
        Ok(self.reviews.clone())
    }

    async fn team_members(&self, team: &TeamRef) -> Result<TeamRoster> {
        self.enter("team_members")?;
        Ok(self
            .teams
            .get(&team.to_string())
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl Notifier for MemoryPlatform {
    async fn upsert_comment(
        &self,
        pr: &PullRequestRef,
        marker: &str,
        body: &str,
    ) -> Result<CommentUpsert> {
        self.enter("upsert_comment")?;
        let mut state = self.state.lock().unwrap();

        if let Some(existing) = state
            .comments
            .iter_mut()
            .find(|c| c.pr_number == pr.number && c.body.contains(marker))
        {
            existing.body = body.to_string();
            return Ok(CommentUpsert::Updated(existing.id));
        }

        state.next_comment_id += 1;
        let id = state.next_comment_id;
        state.comments.push(StoredComment {
            id,
            pr_number: pr.number,
            body: body.to_string(),
        });
        Ok(CommentUpsert::Created(id))
    }

    async fn publish_check(&self, _pr: &PullRequestRef, check: &CheckRunRequest) -> Result<()> {
        self.enter("publish_check")?;
        self.state.lock().unwrap().checks.push(check.clone());
        Ok(())
    }
}
