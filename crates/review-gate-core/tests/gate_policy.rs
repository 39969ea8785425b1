//! Policy-level behaviour of the gate over in-memory inputs.

use chrono::{DateTime, Duration, TimeZone, Utc};
use review_gate_core::{
    evaluate_policy, ChangedFileSet, CheckConclusion, GateConfig, GateDecision, Review,
    ReviewHistory, ReviewState, TeamRoster,
};

fn t(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap() + Duration::minutes(n)
}

fn files(paths: &[&str]) -> ChangedFileSet {
    paths.iter().copied().collect()
}

fn roster(members: &[&str]) -> TeamRoster {
    members.iter().copied().collect()
}

fn config() -> GateConfig {
    GateConfig {
        team: Some("dbt-labs/core-group".parse().unwrap()),
        ..GateConfig::default()
    }
}

#[test]
fn two_member_approvals_satisfy_gate() {
    let history = ReviewHistory::new(vec![
        Review::new("a", ReviewState::Approved, t(1)),
        Review::new("b", ReviewState::Approved, t(2)),
    ]);

    let report = evaluate_policy(
        &config(),
        &files(&["core/dbt/artifacts/x.py"]),
        &history,
        &roster(&["a", "b", "c"]),
    );

    assert_eq!(report.decision, GateDecision::Satisfied);
    assert_eq!(report.approvals.count, 2);
    assert_eq!(report.conclusion, CheckConclusion::Success);
}

#[test]
fn dismissed_approval_leaves_gate_unsatisfied() {
    let history = ReviewHistory::new(vec![
        Review::new("a", ReviewState::Approved, t(1)),
        Review::new("a", ReviewState::Dismissed, t(2)),
    ]);

    let report = evaluate_policy(
        &config(),
        &files(&["core/dbt/artifacts/x.py"]),
        &history,
        &roster(&["a", "b", "c"]),
    );

    assert_eq!(report.decision, GateDecision::Unsatisfied);
    assert_eq!(report.approvals.count, 0);
    assert_eq!(report.conclusion, CheckConclusion::Neutral);
}

#[test]
fn unprotected_change_not_required_whatever_the_reviews() {
    let histories = [
        ReviewHistory::default(),
        ReviewHistory::new(vec![
            Review::new("a", ReviewState::Approved, t(1)),
            Review::new("b", ReviewState::Approved, t(2)),
        ]),
        ReviewHistory::new(vec![Review::new("a", ReviewState::ChangesRequested, t(1))]),
    ];

    for history in &histories {
        let report = evaluate_policy(
            &config(),
            &files(&["README.md"]),
            history,
            &roster(&["a", "b", "c"]),
        );
        assert_eq!(report.decision, GateDecision::NotRequired);
        assert_eq!(report.conclusion, CheckConclusion::Success);
    }
}

#[test]
fn empty_change_set_not_required() {
    let report = evaluate_policy(
        &config(),
        &ChangedFileSet::default(),
        &ReviewHistory::default(),
        &roster(&["a"]),
    );
    assert_eq!(report.decision, GateDecision::NotRequired);
}

#[test]
fn empty_roster_never_satisfies() {
    let history = ReviewHistory::new(vec![
        Review::new("a", ReviewState::Approved, t(1)),
        Review::new("b", ReviewState::Approved, t(2)),
    ]);
    let report = evaluate_policy(
        &config(),
        &files(&["core/dbt/artifacts/x.py"]),
        &history,
        &TeamRoster::default(),
    );
    assert_eq!(report.decision, GateDecision::Unsatisfied);
}

#[test]
fn evaluation_is_idempotent() {
    let history = ReviewHistory::new(vec![
        Review::new("c", ReviewState::Commented, t(3)),
        Review::new("a", ReviewState::Approved, t(1)),
        Review::new("b", ReviewState::Approved, t(2)),
        Review::new("b", ReviewState::ChangesRequested, t(4)),
    ]);
    let changed = files(&["docs/a.md", "core/dbt/artifacts/resources/base.py"]);
    let members = roster(&["a", "b", "c"]);

    let first = evaluate_policy(&config(), &changed, &history, &members);
    let second = evaluate_policy(&config(), &changed, &history, &members);

    assert_eq!(first, second);
    assert_eq!(first.decision, GateDecision::Unsatisfied);
    assert_eq!(first.approvals.approvers, vec!["a".to_string()]);
}

#[test]
fn custom_threshold_is_respected() {
    let cfg = GateConfig {
        required_approvals: 1,
        ..config()
    };
    let history = ReviewHistory::new(vec![Review::new("a", ReviewState::Approved, t(1))]);

    let report = evaluate_policy(
        &cfg,
        &files(&["core/dbt/artifacts/x.py"]),
        &history,
        &roster(&["a"]),
    );
    assert_eq!(report.decision, GateDecision::Satisfied);
    assert!(report.title.contains("1 of 1"));
}

#[test]
fn reviews_from_json_inputs() {
    let history: ReviewHistory = serde_json::from_str(
        r#"[
            {"author": "a", "state": "APPROVED", "submitted_at": "2024-06-01T09:01:00Z"},
            {"author": "b", "state": "APPROVED", "submitted_at": "2024-06-01T09:02:00Z"},
            {"author": "b", "state": "DISMISSED", "submitted_at": "2024-06-01T09:03:00Z"}
        ]"#,
    )
    .unwrap();
    let members: TeamRoster = serde_json::from_str(r#"["a", "b"]"#).unwrap();

    let report = evaluate_policy(
        &config(),
        &files(&["core/dbt/artifacts/x.py"]),
        &history,
        &members,
    );
    assert_eq!(report.approvals.count, 1);
    assert_eq!(report.decision, GateDecision::Unsatisfied);
}
