//! review-gate core library
//!
//! Decides whether a pull request that touches a protected path has enough
//! approvals from a designated team:
//! - `classifier`: does any changed path fall under the protected prefix
//! - `approvals`: how many roster members' latest review is an approval
//! - `gate`: NOT_REQUIRED / SATISFIED / UNSATISFIED
//! - `runner`: fetch, evaluate and publish through the `platform` traits

pub mod approvals;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod fakes;
pub mod gate;
pub mod notify;
pub mod platform;
pub mod runner;
pub mod telemetry;

pub use approvals::{count_approvals, latest_reviews, ApprovalTally};
pub use classifier::{classify, Classification};
pub use config::GateConfig;
pub use domain::{
    parse_repository, ChangedFileSet, CheckConclusion, ConfigError, GateDecision, GateError,
    PullRequestRef, Result, Review, ReviewHistory, ReviewState, TeamRef, TeamRoster,
};
pub use gate::{decide, evaluate_policy, GateReport};
pub use notify::{check_run_request, render_comment, DryRunNotifier};
pub use platform::{CheckRunRequest, CommentUpsert, Notifier, PullRequestSource};
pub use runner::{GateRunner, RunOutcome};
pub use telemetry::init_tracing;
