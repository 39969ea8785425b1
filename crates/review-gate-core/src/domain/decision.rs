//! Gate outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of evaluating the gate for one run. Recomputed every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateDecision {
    /// No protected path changed.
    NotRequired,
    /// Protected paths changed and enough roster members approved.
    Satisfied,
    /// Protected paths changed and approvals are still missing.
    Unsatisfied,
}

impl GateDecision {
    /// Check-run conclusion to publish.
    ///
    /// A missing approval is reported as neutral, never as a failure: a failed
    /// check would not be cleared by a later successful run in the same check
    /// lineage.
    pub fn conclusion(&self) -> CheckConclusion {
        match self {
            GateDecision::NotRequired | GateDecision::Satisfied => CheckConclusion::Success,
            GateDecision::Unsatisfied => CheckConclusion::Neutral,
        }
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GateDecision::NotRequired => "NOT_REQUIRED",
            GateDecision::Satisfied => "SATISFIED",
            GateDecision::Unsatisfied => "UNSATISFIED",
        };
        f.write_str(s)
    }
}

/// Conclusions the gate ever publishes. There is no failure variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    Success,
    Neutral,
}

impl CheckConclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckConclusion::Success => "success",
            CheckConclusion::Neutral => "neutral",
        }
    }
}

impl fmt::Display for CheckConclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
