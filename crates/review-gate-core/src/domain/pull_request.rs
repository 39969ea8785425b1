//! Pull request coordinates.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, GateError, Result};

/// Identifies the pull request (and the commit) a gate run evaluates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub head_sha: String,
}

/// Split `owner/repo` into its parts.
pub fn parse_repository(full_name: &str) -> std::result::Result<(String, String), ConfigError> {
    match full_name.trim().split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(ConfigError::InvalidRepository(full_name.to_string())),
    }
}

/// Subset of a `pull_request` / `pull_request_review` / `pull_request_target`
/// event payload.
#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<EventPullRequest>,
}

#[derive(Debug, Deserialize)]
struct EventPullRequest {
    number: u64,
    head: EventHead,
}

#[derive(Debug, Deserialize)]
struct EventHead {
    sha: String,
}

impl PullRequestRef {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        number: u64,
        head_sha: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
            head_sha: head_sha.into(),
        }
    }

    /// Build from `owner/repo` and the JSON body of a workflow event.
    pub fn from_event_json(repository: &str, payload: &str) -> Result<Self> {
        let (owner, repo) = parse_repository(repository)?;
        let event: EventPayload = serde_json::from_str(payload)?;
        let pr = event.pull_request.ok_or_else(|| GateError::InvalidRecord {
            kind: "event",
            reason: "payload has no pull_request object".to_string(),
        })?;

        Ok(Self {
            owner,
            repo,
            number: pr.number,
            head_sha: pr.head.sha,
        })
    }

    /// Like [`PullRequestRef::from_event_json`], reading the payload from disk
    /// (the file `GITHUB_EVENT_PATH` points at).
    pub fn from_event_file(repository: &str, path: &Path) -> Result<Self> {
        let payload = std::fs::read_to_string(path)?;
        Self::from_event_json(repository, &payload)
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}
