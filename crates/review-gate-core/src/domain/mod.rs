//! Domain types shared by the gate, its collaborators and the CLI.

pub mod changes;
pub mod decision;
pub mod error;
pub mod pull_request;
pub mod review;
pub mod roster;

pub use changes::ChangedFileSet;
pub use decision::{CheckConclusion, GateDecision};
pub use error::{ConfigError, GateError, Result};
pub use pull_request::{parse_repository, PullRequestRef};
pub use review::{Review, ReviewHistory, ReviewState};
pub use roster::{TeamRef, TeamRoster};
