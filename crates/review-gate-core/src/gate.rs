//! Gate evaluation.

use serde::Serialize;

use crate::approvals::{count_approvals, ApprovalTally};
use crate::classifier::{classify, Classification};
use crate::config::GateConfig;
use crate::domain::{ChangedFileSet, CheckConclusion, GateDecision, ReviewHistory, TeamRoster};

/// Decide the gate from the classifier result and the approval count.
///
/// Gate rule:
/// - not triggered: `NotRequired`
/// - triggered, `approvals >= required`: `Satisfied`
/// - triggered, `approvals < required`: `Unsatisfied`
pub fn decide(triggered: bool, approvals: usize, required: usize) -> GateDecision {
    if !triggered {
        GateDecision::NotRequired
    } else if approvals >= required {
        GateDecision::Satisfied
    } else {
        GateDecision::Unsatisfied
    }
}

/// Everything a run reports: the decision, how it was reached, and the text
/// published alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateReport {
    pub decision: GateDecision,
    pub conclusion: CheckConclusion,
    pub protected_prefix: String,
    pub protected_files: Vec<String>,
    pub approvals: ApprovalTally,
    pub required_approvals: usize,
    pub team: Option<String>,
    pub title: String,
    pub summary: String,
}

impl GateReport {
    pub fn new(config: &GateConfig, classification: Classification, approvals: ApprovalTally) -> Self {
        let decision = decide(
            classification.triggered,
            approvals.count,
            config.required_approvals,
        );
        let team = config.team.as_ref().map(ToString::to_string);
        let reviewers = team
            .as_deref()
            .map(|t| format!("members of `{}`", t))
            .unwrap_or_else(|| "team members".to_string());

        let (title, summary) = match decision {
            GateDecision::NotRequired => (
                "No protected changes".to_string(),
                format!(
                    "No changed file is under `{}`; extra approvals are not required.",
                    config.protected_prefix
                ),
            ),
            GateDecision::Satisfied => (
                format!(
                    "{} of {} required approvals",
                    approvals.count, config.required_approvals
                ),
                format!(
                    "Changes under `{}` have {} of {} required approvals from {}.",
                    config.protected_prefix,
                    approvals.count,
                    config.required_approvals,
                    reviewers
                ),
            ),
            GateDecision::Unsatisfied => (
                format!(
                    "Waiting for approvals: {} of {}",
                    approvals.count, config.required_approvals
                ),
                format!(
                    "Changes under `{}` require {} approvals from {}; currently {}.",
                    config.protected_prefix,
                    config.required_approvals,
                    reviewers,
                    approvals.count
                ),
            ),
        };

        GateReport {
            decision,
            conclusion: decision.conclusion(),
            protected_prefix: config.protected_prefix.clone(),
            protected_files: classification.protected_files,
            approvals,
            required_approvals: config.required_approvals,
            team,
            title,
            summary,
        }
    }
}

impl GateReport {
    /// Build the report for a classification. Approvals are counted only when
    /// the classification triggered the gate and `inputs` carries the review
    /// history and roster; otherwise the tally is empty.
    pub fn evaluate(
        config: &GateConfig,
        classification: Classification,
        inputs: Option<(&ReviewHistory, &TeamRoster)>,
    ) -> Self {
        let approvals = match inputs {
            Some((history, roster)) if classification.triggered => {
                count_approvals(history, roster)
            }
            _ => ApprovalTally::default(),
        };
        GateReport::new(config, classification, approvals)
    }
}

/// Evaluate the whole policy over already-fetched inputs.
///
/// `history` and `roster` are ignored when nothing protected changed.
/// [`GateRunner`](crate::GateRunner) classifies first and fetches them only
/// when needed; both paths finish through [`GateReport::evaluate`].
pub fn evaluate_policy(
    config: &GateConfig,
    files: &ChangedFileSet,
    history: &ReviewHistory,
    roster: &TeamRoster,
) -> GateReport {
    let classification = classify(files, &config.protected_prefix);
    GateReport::evaluate(config, classification, Some((history, roster)))
}
