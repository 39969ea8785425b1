//! Counting qualifying approvals.
//!
//! Only the latest review of each roster member counts. A member whose latest
//! review is anything other than `APPROVED` (a dismissal included) does not
//! contribute, whatever they submitted earlier.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{Review, ReviewHistory, ReviewState, TeamRoster};

/// Distinct roster members currently approving.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApprovalTally {
    pub count: usize,

    /// Approving members, sorted.
    pub approvers: Vec<String>,
}

/// Latest review per author.
///
/// Reviews with equal timestamps resolve by input order: the one listed later
/// wins.
pub fn latest_reviews(history: &ReviewHistory) -> HashMap<&str, &Review> {
    let mut latest: HashMap<&str, &Review> = HashMap::new();
    for review in history.iter() {
        match latest.get(review.author.as_str()) {
            Some(current) if current.submitted_at > review.submitted_at => {}
            _ => {
                latest.insert(review.author.as_str(), review);
            }
        }
    }
    latest
}

/// Count roster members whose latest review is an approval.
pub fn count_approvals(history: &ReviewHistory, roster: &TeamRoster) -> ApprovalTally {
    let latest = latest_reviews(history);

    let mut approvers: Vec<String> = roster
        .members()
        .filter(|member| {
            latest
                .get(member)
                .is_some_and(|review| review.state == ReviewState::Approved)
        })
        .map(str::to_string)
        .collect();
    approvers.sort();

    ApprovalTally {
        count: approvers.len(),
        approvers,
    }
}
