//! `PullRequestSource` and `Notifier` backed by the GitHub REST API.

use async_trait::async_trait;
use review_gate_core::{
    ChangedFileSet, CheckRunRequest, CommentUpsert, Notifier, PullRequestRef, PullRequestSource,
    Result, ReviewHistory, TeamRef, TeamRoster,
};
use tracing::info;

use crate::client::GitHubClient;

#[async_trait]
impl PullRequestSource for GitHubClient {
    async fn changed_files(&self, pr: &PullRequestRef) -> Result<ChangedFileSet> {
        let files = self
            .list_pull_request_files(&pr.owner, &pr.repo, pr.number)
            .await?;
        Ok(files.into_iter().map(|f| f.filename).collect())
    }

    async fn reviews(&self, pr: &PullRequestRef) -> Result<ReviewHistory> {
        let raw = self
            .list_pull_request_reviews(&pr.owner, &pr.repo, pr.number)
            .await?;

        let mut reviews = Vec::with_capacity(raw.len());
        for review in raw {
            if let Some(review) = review.into_review()? {
                reviews.push(review);
            }
        }
        Ok(ReviewHistory::new(reviews))
    }

    async fn team_members(&self, team: &TeamRef) -> Result<TeamRoster> {
        let members = self.list_team_members(&team.org, &team.slug).await?;
        Ok(members.into_iter().map(|u| u.login).collect())
    }
}

#[async_trait]
impl Notifier for GitHubClient {
    async fn upsert_comment(
        &self,
        pr: &PullRequestRef,
        marker: &str,
        body: &str,
    ) -> Result<CommentUpsert> {
        let comments = self
            .list_issue_comments(&pr.owner, &pr.repo, pr.number)
            .await?;

        let author = self.config().comment_author.as_str();
        let existing = comments
            .into_iter()
            .find(|c| c.is_gate_comment(author, marker));

        match existing {
            Some(comment) => {
                info!("Found existing gate comment {}, updating", comment.id);
                let updated = self
                    .update_issue_comment(&pr.owner, &pr.repo, comment.id, body)
                    .await?;
                Ok(CommentUpsert::Updated(updated.id))
            }
            None => {
                let created = self
                    .create_issue_comment(&pr.owner, &pr.repo, pr.number, body)
                    .await?;
                Ok(CommentUpsert::Created(created.id))
            }
        }
    }

    async fn publish_check(&self, pr: &PullRequestRef, check: &CheckRunRequest) -> Result<()> {
        self.create_completed_check_run(
            &pr.owner,
            &pr.repo,
            &check.name,
            &check.head_sha,
            check.conclusion.as_str(),
            check.details_url.as_deref(),
            &check.title,
            &check.summary,
        )
        .await?;
        Ok(())
    }
}
