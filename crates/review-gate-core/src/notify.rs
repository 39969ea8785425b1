//! Rendering of published output, and a notifier that only logs.

use async_trait::async_trait;
use tracing::info;

use crate::config::GateConfig;
use crate::domain::{PullRequestRef, Result};
use crate::gate::GateReport;
use crate::platform::{CheckRunRequest, CommentUpsert, Notifier};

/// Comment body for an unsatisfied gate. Starts with the marker so later runs
/// find and update the same comment.
pub fn render_comment(config: &GateConfig, report: &GateReport) -> String {
    let mut body = format!("{}\n", config.comment_marker);
    body.push_str(&format!(
        "### Additional approvals required\n\n{}\n",
        report.summary
    ));

    if !report.protected_files.is_empty() {
        body.push_str("\nProtected files changed:\n");
        for path in &report.protected_files {
            body.push_str(&format!("- `{}`\n", path));
        }
    }

    if !report.approvals.approvers.is_empty() {
        let approvers: Vec<String> = report
            .approvals
            .approvers
            .iter()
            .map(|a| format!("@{}", a))
            .collect();
        body.push_str(&format!("\nApproved so far by: {}\n", approvers.join(", ")));
    }

    body
}

/// Check run for `report` on the head commit of `pr`.
pub fn check_run_request(
    config: &GateConfig,
    pr: &PullRequestRef,
    report: &GateReport,
) -> CheckRunRequest {
    CheckRunRequest {
        name: config.check_name.clone(),
        head_sha: pr.head_sha.clone(),
        conclusion: report.conclusion,
        details_url: config.details_url.clone(),
        title: report.title.clone(),
        summary: report.summary.clone(),
    }
}

/// Notifier that logs instead of publishing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunNotifier;

#[async_trait]
impl Notifier for DryRunNotifier {
    async fn upsert_comment(
        &self,
        pr: &PullRequestRef,
        marker: &str,
        body: &str,
    ) -> Result<CommentUpsert> {
        info!(%pr, marker, bytes = body.len(), "dry run: would upsert comment");
        Ok(CommentUpsert::Skipped)
    }

    async fn publish_check(&self, pr: &PullRequestRef, check: &CheckRunRequest) -> Result<()> {
        info!(
            %pr,
            name = %check.name,
            conclusion = %check.conclusion,
            title = %check.title,
            "dry run: would publish check run"
        );
        Ok(())
    }
}
