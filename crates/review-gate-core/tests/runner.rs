//! Integration tests for GateRunner with MemoryPlatform.

use chrono::{TimeZone, Utc};
use review_gate_core::fakes::MemoryPlatform;
use review_gate_core::{
    CheckConclusion, CommentUpsert, GateConfig, GateDecision, GateRunner, PullRequestRef, Review,
    ReviewHistory, ReviewState, TeamRef,
};

fn team() -> TeamRef {
    "dbt-labs/core-group".parse().unwrap()
}

fn config() -> GateConfig {
    GateConfig {
        team: Some(team()),
        details_url: Some("https://github.com/o/r/actions/runs/1".to_string()),
        ..GateConfig::default()
    }
}

fn pr() -> PullRequestRef {
    PullRequestRef::new("dbt-labs", "dbt-core", 101, "0123abcd")
}

fn approved(author: &str, minute: u32) -> Review {
    Review::new(
        author,
        ReviewState::Approved,
        Utc.with_ymd_and_hms(2024, 6, 1, 9, minute, 0).unwrap(),
    )
}

#[tokio::test]
async fn test_not_required_skips_roster_and_comment() {
    let platform = MemoryPlatform::new().with_files(["README.md"].into_iter().collect());
    let config = config();

    let outcome = GateRunner::new(&config, &platform, &platform)
        .run(&pr())
        .await
        .expect("run failed");

    assert_eq!(outcome.report.decision, GateDecision::NotRequired);
    assert!(outcome.comment.is_none());
    assert_eq!(platform.calls(), vec!["changed_files", "publish_check"]);

    let checks = platform.checks();
    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].conclusion, CheckConclusion::Success);
    assert_eq!(checks[0].head_sha, "0123abcd");
}

#[tokio::test]
async fn test_unsatisfied_posts_comment_and_neutral_check() {
    let platform = MemoryPlatform::new()
        .with_files(["core/dbt/artifacts/schemas/x.py"].into_iter().collect())
        .with_reviews(ReviewHistory::new(vec![approved("a", 1)]))
        .with_team(&team(), ["a", "b", "c"].into_iter().collect());
    let config = config();

    let outcome = GateRunner::new(&config, &platform, &platform)
        .run(&pr())
        .await
        .expect("run failed");

    assert_eq!(outcome.report.decision, GateDecision::Unsatisfied);
    assert_eq!(outcome.comment, Some(CommentUpsert::Created(1)));

    let comments = platform.comments();
    assert_eq!(comments.len(), 1);
    assert!(comments[0].body.starts_with(&config.comment_marker));

    let checks = platform.checks();
    assert_eq!(checks[0].conclusion, CheckConclusion::Neutral);
    assert!(checks[0].title.contains("1 of 2"));
    assert_eq!(
        checks[0].details_url.as_deref(),
        Some("https://github.com/o/r/actions/runs/1")
    );
}

#[tokio::test]
async fn test_rerun_updates_existing_comment() {
    let config = config();
    let platform = MemoryPlatform::new()
        .with_comment(101, "unrelated discussion")
        .with_comment(101, &format!("{}\nold body", config.comment_marker))
        .with_files(["core/dbt/artifacts/x.py"].into_iter().collect())
        .with_team(&team(), ["a", "b"].into_iter().collect());

    let runner = GateRunner::new(&config, &platform, &platform);
    let first = runner.run(&pr()).await.expect("first run failed");
    let second = runner.run(&pr()).await.expect("second run failed");

    assert_eq!(first.comment, Some(CommentUpsert::Updated(2)));
    assert_eq!(second.comment, Some(CommentUpsert::Updated(2)));
    assert_eq!(platform.comments().len(), 2);
    assert_eq!(platform.checks().len(), 2);
    assert_eq!(first.report, second.report);
}

#[tokio::test]
async fn test_satisfied_publishes_success_without_comment() {
    let platform = MemoryPlatform::new()
        .with_files(["core/dbt/artifacts/x.py"].into_iter().collect())
        .with_reviews(ReviewHistory::new(vec![approved("a", 1), approved("b", 2)]))
        .with_team(&team(), ["a", "b", "c"].into_iter().collect());
    let config = config();

    let outcome = GateRunner::new(&config, &platform, &platform)
        .run(&pr())
        .await
        .expect("run failed");

    assert_eq!(outcome.report.decision, GateDecision::Satisfied);
    assert!(outcome.comment.is_none());
    assert!(platform.comments().is_empty());
    assert_eq!(platform.checks()[0].conclusion, CheckConclusion::Success);
}

#[tokio::test]
async fn test_platform_failure_aborts_before_publishing() {
    let platform = MemoryPlatform::new()
        .with_files(["core/dbt/artifacts/x.py"].into_iter().collect())
        .with_team(&team(), ["a"].into_iter().collect())
        .failing_on("reviews");
    let config = config();

    let err = GateRunner::new(&config, &platform, &platform)
        .run(&pr())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("reviews"));
    assert!(platform.checks().is_empty());
    assert!(platform.comments().is_empty());
}

#[tokio::test]
async fn test_missing_team_is_config_error_when_triggered() {
    let platform =
        MemoryPlatform::new().with_files(["core/dbt/artifacts/x.py"].into_iter().collect());
    let config = GateConfig::default();

    let err = GateRunner::new(&config, &platform, &platform)
        .run(&pr())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("team"));
    assert!(platform.checks().is_empty());
}

#[tokio::test]
async fn test_invalid_config_rejected_up_front() {
    let platform = MemoryPlatform::new();
    let config = GateConfig {
        required_approvals: 0,
        ..config()
    };

    assert!(GateRunner::new(&config, &platform, &platform)
        .run(&pr())
        .await
        .is_err());
    assert!(platform.calls().is_empty());
}
