//! review-gate CLI
//!
//! ## Commands
//!
//! - `evaluate`: evaluate a pull request on GitHub and publish the result
//! - `check`: evaluate offline from JSON files (changed files, reviews, roster)
//!
//! Every decision exits 0; a non-zero exit means the gate could not be
//! evaluated.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use review_gate_core::config::actions_run_url;
use review_gate_core::{
    evaluate_policy, ChangedFileSet, DryRunNotifier, GateConfig, GateReport, GateRunner, Notifier,
    PullRequestRef, ReviewHistory, TeamRef, TeamRoster,
};
use review_gate_github::{GitHubClient, GitHubConfig};
use serde::de::DeserializeOwned;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "review-gate")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Require team approvals on pull requests that touch protected paths",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(flatten)]
    gate: GateArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Gate settings; each flag overrides the config file and environment.
#[derive(Args, Debug, Default)]
struct GateArgs {
    /// TOML config file
    #[arg(long, global = true, env = "REVIEW_GATE_CONFIG")]
    config: Option<PathBuf>,

    /// Distinct team approvals required
    #[arg(long, global = true)]
    required_approvals: Option<usize>,

    /// Team whose approvals count (org/slug)
    #[arg(long, global = true)]
    team: Option<String>,

    /// Changed paths starting with this prefix trigger the gate
    #[arg(long, global = true)]
    protected_prefix: Option<String>,

    /// Name of the published check run
    #[arg(long, global = true)]
    check_name: Option<String>,

    /// Link attached to the check run
    #[arg(long, global = true)]
    details_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a pull request on GitHub and publish the result
    Evaluate {
        /// Repository as owner/repo
        #[arg(long, env = "GITHUB_REPOSITORY")]
        repo: String,

        /// Pull request number (default: read from the event payload)
        #[arg(long, requires = "head_sha")]
        pr: Option<u64>,

        /// Head commit of the pull request
        #[arg(long, requires = "pr")]
        head_sha: Option<String>,

        /// Workflow event payload
        #[arg(long, env = "GITHUB_EVENT_PATH")]
        event_path: Option<PathBuf>,

        /// Evaluate without writing comments or check runs
        #[arg(long)]
        dry_run: bool,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate offline from JSON files
    Check {
        /// JSON array of changed paths
        #[arg(long)]
        files: PathBuf,

        /// JSON array of {author, state, submitted_at}
        #[arg(long)]
        reviews: PathBuf,

        /// JSON array of team member ids
        #[arg(long)]
        roster: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    review_gate_core::init_tracing(cli.json_logs, level);

    let config = load_config(&cli.gate)?;

    match cli.command {
        Commands::Evaluate {
            repo,
            pr,
            head_sha,
            event_path,
            dry_run,
            json,
        } => {
            let pr = resolve_pull_request(&repo, pr, head_sha, event_path.as_deref())?;
            cmd_evaluate(config, &pr, dry_run, json).await
        }
        Commands::Check {
            files,
            reviews,
            roster,
            json,
        } => cmd_check(&config, &files, &reviews, &roster, json),
    }
}

fn load_config(args: &GateArgs) -> Result<GateConfig> {
    let mut config = GateConfig::load(args.config.as_deref()).context("Failed to load config")?;

    if let Some(n) = args.required_approvals {
        config.required_approvals = n;
    }
    if let Some(team) = &args.team {
        config.team = Some(team.parse::<TeamRef>().context("Invalid --team")?);
    }
    if let Some(prefix) = &args.protected_prefix {
        config.protected_prefix = prefix.clone();
    }
    if let Some(name) = &args.check_name {
        config.check_name = name.clone();
    }
    if let Some(url) = &args.details_url {
        config.details_url = Some(url.clone());
    }
    if config.details_url.is_none() {
        let var = |key: &str| std::env::var(key).ok();
        config.details_url = actions_run_url(
            var("GITHUB_SERVER_URL").as_deref(),
            var("GITHUB_REPOSITORY").as_deref(),
            var("GITHUB_RUN_ID").as_deref(),
        );
    }

    config.validate().context("Invalid gate configuration")?;
    Ok(config)
}

fn resolve_pull_request(
    repo: &str,
    number: Option<u64>,
    head_sha: Option<String>,
    event_path: Option<&Path>,
) -> Result<PullRequestRef> {
    match (number, head_sha, event_path) {
        (Some(number), Some(head_sha), _) => {
            let (owner, name) = review_gate_core::parse_repository(repo)?;
            Ok(PullRequestRef::new(owner, name, number, head_sha))
        }
        (None, None, Some(path)) => PullRequestRef::from_event_file(repo, path)
            .with_context(|| format!("Failed to read pull request from {:?}", path)),
        _ => bail!("Pass --pr and --head-sha, or run inside a pull_request workflow (GITHUB_EVENT_PATH)"),
    }
}

async fn cmd_evaluate(
    config: GateConfig,
    pr: &PullRequestRef,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let github = GitHubClient::new(GitHubConfig::from_env())?;
    if github.config().token.is_none() {
        info!("GITHUB_TOKEN is not set; requests are unauthenticated");
    }

    let notifier: &dyn Notifier = if dry_run { &DryRunNotifier } else { &github };
    let outcome = GateRunner::new(&config, &github, notifier)
        .run(pr)
        .await
        .with_context(|| format!("Failed to evaluate {}", pr))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("Pull request: {}", pr);
        print_report(&outcome.report);
    }
    Ok(())
}

fn cmd_check(
    config: &GateConfig,
    files: &Path,
    reviews: &Path,
    roster: &Path,
    json: bool,
) -> Result<()> {
    let files: ChangedFileSet = read_json(files)?;
    let reviews: ReviewHistory = read_json(reviews)?;
    let roster: TeamRoster = read_json(roster)?;

    let report = evaluate_policy(config, &files, &reviews, &roster);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {:?}", path))
}

fn print_report(report: &GateReport) {
    println!("Decision: {} ({})", report.decision, report.conclusion);
    println!(
        "Protected files: {} under `{}`",
        report.protected_files.len(),
        report.protected_prefix
    );
    for path in &report.protected_files {
        println!("  {}", path);
    }
    if report.approvals.approvers.is_empty() {
        println!(
            "Approvals: {} of {}",
            report.approvals.count, report.required_approvals
        );
    } else {
        println!(
            "Approvals: {} of {} ({})",
            report.approvals.count,
            report.required_approvals,
            report.approvals.approvers.join(", ")
        );
    }
    println!("{}", report.summary);
}
