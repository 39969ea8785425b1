//! Review records as submitted on a pull request.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::GateError;

/// State of a single submitted review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Pending,
    Approved,
    ChangesRequested,
    Dismissed,
    Commented,
}

impl ReviewState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewState::Pending => "PENDING",
            ReviewState::Approved => "APPROVED",
            ReviewState::ChangesRequested => "CHANGES_REQUESTED",
            ReviewState::Dismissed => "DISMISSED",
            ReviewState::Commented => "COMMENTED",
        }
    }
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewState {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ReviewState::Pending),
            "APPROVED" => Ok(ReviewState::Approved),
            "CHANGES_REQUESTED" => Ok(ReviewState::ChangesRequested),
            "DISMISSED" => Ok(ReviewState::Dismissed),
            "COMMENTED" => Ok(ReviewState::Commented),
            other => Err(GateError::InvalidRecord {
                kind: "review",
                reason: format!("unknown review state {:?}", other),
            }),
        }
    }
}

/// One review submitted by one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub state: ReviewState,
    pub submitted_at: DateTime<Utc>,
}

impl Review {
    pub fn new(author: impl Into<String>, state: ReviewState, submitted_at: DateTime<Utc>) -> Self {
        Self {
            author: author.into(),
            state,
            submitted_at,
        }
    }
}

/// All reviews of one pull request, in the order they were fetched.
///
/// The order carries no meaning except as the tie-break between two reviews
/// of the same author with identical timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewHistory(Vec<Review>);

impl ReviewHistory {
    pub fn new(reviews: Vec<Review>) -> Self {
        Self(reviews)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Review> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Review> for ReviewHistory {
    fn from_iter<T: IntoIterator<Item = Review>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
