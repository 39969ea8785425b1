//! review-gate-github: GitHub backend for review-gate
//!
//! Implements the read side (`PullRequestSource`: changed files, reviews,
//! team members) and the write side (`Notifier`: marker comment upsert,
//! completed check runs) of the gate against the GitHub REST API.

pub mod client;
pub mod error;
pub mod models;
mod platform;

pub use client::{GitHubClient, GitHubConfig, DEFAULT_API_URL};
pub use error::GitHubError;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, GitHubError>;
