//! One gate run against a live platform.
//!
//! Order of operations:
//! 1. list changed files and classify them
//! 2. only if triggered: fetch the team roster and the reviews, count approvals
//! 3. decide
//! 4. only if unsatisfied: upsert the marker comment
//! 5. publish the check run
//!
//! Any platform error aborts the run before anything further is published, so
//! the previously published check stays in place.

use serde::Serialize;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::classifier::classify;
use crate::config::GateConfig;
use crate::domain::{GateDecision, PullRequestRef, Result};
use crate::gate::GateReport;
use crate::notify::{check_run_request, render_comment};
use crate::platform::{CommentUpsert, Notifier, PullRequestSource};

/// Report of a run plus what was written to the platform.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub evaluation_id: Uuid,
    pub pull_request: PullRequestRef,
    pub report: GateReport,
    pub comment: Option<CommentUpsert>,
}

pub struct GateRunner<'a> {
    config: &'a GateConfig,
    source: &'a dyn PullRequestSource,
    notifier: &'a dyn Notifier,
}

impl<'a> GateRunner<'a> {
    pub fn new(
        config: &'a GateConfig,
        source: &'a dyn PullRequestSource,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            config,
            source,
            notifier,
        }
    }

    /// Evaluate `pr` and publish the result.
    pub async fn run(&self, pr: &PullRequestRef) -> Result<RunOutcome> {
        self.config.validate()?;

        let evaluation_id = Uuid::new_v4();
        let span = info_span!(
            "gate_run",
            %evaluation_id,
            owner = %pr.owner,
            repo = %pr.repo,
            pr = pr.number,
            head_sha = %pr.head_sha,
        );

        self.run_inner(evaluation_id, pr).instrument(span).await
    }

    async fn run_inner(&self, evaluation_id: Uuid, pr: &PullRequestRef) -> Result<RunOutcome> {
        let files = self.source.changed_files(pr).await?;
        let classification = classify(&files, &self.config.protected_prefix);
        info!(
            changed = files.len(),
            protected = classification.protected_files.len(),
            prefix = %self.config.protected_prefix,
            "classified changed files"
        );

        let fetched = if classification.triggered {
            let team = self.config.require_team()?;
            let roster = self.source.team_members(team).await?;
            let history = self.source.reviews(pr).await?;
            debug!(
                team = %team,
                members = roster.len(),
                reviews = history.len(),
                "fetched roster and reviews"
            );
            Some((history, roster))
        } else {
            None
        };

        let inputs = fetched.as_ref().map(|(history, roster)| (history, roster));
        let report = GateReport::evaluate(self.config, classification, inputs);
        info!(
            decision = %report.decision,
            approvals = report.approvals.count,
            required = report.required_approvals,
            "gate evaluated"
        );

        let comment = if report.decision == GateDecision::Unsatisfied {
            let body = render_comment(self.config, &report);
            let outcome = self
                .notifier
                .upsert_comment(pr, &self.config.comment_marker, &body)
                .await?;
            debug!(?outcome, "comment upserted");
            Some(outcome)
        } else {
            None
        };

        let check = check_run_request(self.config, pr, &report);
        self.notifier.publish_check(pr, &check).await?;
        info!(conclusion = %check.conclusion, name = %check.name, "check run published");

        Ok(RunOutcome {
            evaluation_id,
            pull_request: pr.clone(),
            report,
            comment,
        })
    }
}
