//! Gate configuration.
//!
//! Layers, lowest precedence first: built-in defaults, an optional TOML file,
//! `REVIEW_GATE_*` environment variables. The CLI applies its own flags on
//! top and then calls [`GateConfig::validate`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{ConfigError, TeamRef};

pub const DEFAULT_REQUIRED_APPROVALS: usize = 2;
pub const DEFAULT_PROTECTED_PREFIX: &str = "core/dbt/artifacts";
pub const DEFAULT_CHECK_NAME: &str = "Artifact review gate";
pub const DEFAULT_COMMENT_MARKER: &str = "<!-- review-gate:artifact-approvals -->";

pub const ENV_REQUIRED_APPROVALS: &str = "REVIEW_GATE_REQUIRED_APPROVALS";
pub const ENV_TEAM: &str = "REVIEW_GATE_TEAM";
pub const ENV_PROTECTED_PREFIX: &str = "REVIEW_GATE_PROTECTED_PREFIX";
pub const ENV_CHECK_NAME: &str = "REVIEW_GATE_CHECK_NAME";
pub const ENV_DETAILS_URL: &str = "REVIEW_GATE_DETAILS_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    /// Distinct roster approvals needed to satisfy the gate.
    pub required_approvals: usize,

    /// Team whose members' approvals count. Only needed when the roster is
    /// fetched from the platform.
    pub team: Option<TeamRef>,

    /// Any changed path starting with this string triggers the gate.
    pub protected_prefix: String,

    /// Name of the published check run.
    pub check_name: String,

    /// Hidden marker identifying the gate's own pull request comment.
    pub comment_marker: String,

    /// Link attached to the check run.
    pub details_url: Option<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        GateConfig {
            required_approvals: DEFAULT_REQUIRED_APPROVALS,
            team: None,
            protected_prefix: DEFAULT_PROTECTED_PREFIX.to_string(),
            check_name: DEFAULT_CHECK_NAME.to_string(),
            comment_marker: DEFAULT_COMMENT_MARKER.to_string(),
            details_url: None,
        }
    }
}

impl GateConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Read a TOML config file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&raw)?)
    }

    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override fields from `REVIEW_GATE_*` variables resolved through `lookup`.
    /// Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(raw) = get(ENV_REQUIRED_APPROVALS) {
            self.required_approvals =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: ENV_REQUIRED_APPROVALS.to_string(),
                        value: raw.clone(),
                    })?;
        }
        if let Some(raw) = get(ENV_TEAM) {
            self.team = Some(raw.parse()?);
        }
        if let Some(raw) = get(ENV_PROTECTED_PREFIX) {
            self.protected_prefix = raw;
        }
        if let Some(raw) = get(ENV_CHECK_NAME) {
            self.check_name = raw;
        }
        if let Some(raw) = get(ENV_DETAILS_URL) {
            self.details_url = Some(raw);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.required_approvals == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.protected_prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        if self.comment_marker.trim().is_empty() {
            return Err(ConfigError::EmptyMarker);
        }
        Ok(())
    }

    /// The team, or an error naming the missing setting.
    pub fn require_team(&self) -> Result<&TeamRef, ConfigError> {
        self.team
            .as_ref()
            .ok_or_else(|| ConfigError::Missing(format!("team ({})", ENV_TEAM)))
    }
}

/// Link to the workflow run page, if the Actions variables are all present.
pub fn actions_run_url(
    server_url: Option<&str>,
    repository: Option<&str>,
    run_id: Option<&str>,
) -> Option<String> {
    match (server_url, repository, run_id) {
        (Some(server), Some(repo), Some(run))
            if !server.is_empty() && !repo.is_empty() && !run.is_empty() =>
        {
            Some(format!(
                "{}/{}/actions/runs/{}",
                server.trim_end_matches('/'),
                repo,
                run
            ))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = GateConfig::default();
        assert_eq!(config.required_approvals, 2);
        assert_eq!(config.protected_prefix, "core/dbt/artifacts");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_partial_override() {
        let config = GateConfig::from_toml_str(
            r#"
            required_approvals = 3
            team = "dbt-labs/core-group"
            "#,
        )
        .unwrap();
        assert_eq!(config.required_approvals, 3);
        assert_eq!(config.team.unwrap().slug, "core-group");
        assert_eq!(config.check_name, DEFAULT_CHECK_NAME);
    }

    #[test]
    fn test_toml_rejects_unknown_keys() {
        assert!(GateConfig::from_toml_str("threshold = 2").is_err());
    }

    #[test]
    fn test_toml_rejects_bad_team() {
        assert!(GateConfig::from_toml_str(r#"team = "core-group""#).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = GateConfig::default();
        config
            .apply_env(env(&[
                (ENV_REQUIRED_APPROVALS, "1"),
                (ENV_TEAM, "acme/reviewers"),
                (ENV_PROTECTED_PREFIX, "schemas/"),
                (ENV_CHECK_NAME, ""),
            ]))
            .unwrap();

        assert_eq!(config.required_approvals, 1);
        assert_eq!(config.team.as_ref().unwrap().org, "acme");
        assert_eq!(config.protected_prefix, "schemas/");
        assert_eq!(config.check_name, DEFAULT_CHECK_NAME);
    }

    #[test]
    fn test_env_bad_threshold() {
        let mut config = GateConfig::default();
        let err = config
            .apply_env(env(&[(ENV_REQUIRED_APPROVALS, "two")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_REQUIRED_APPROVALS));
    }

    #[test]
    fn test_validate_rejects_zero_threshold_and_empty_prefix() {
        let mut config = GateConfig {
            required_approvals: 0,
            ..GateConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroThreshold)));

        config.required_approvals = 2;
        config.protected_prefix.clear();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyPrefix)));
    }

    #[test]
    fn test_require_team() {
        let config = GateConfig::default();
        assert!(config.require_team().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review-gate.toml");
        std::fs::write(&path, "protected_prefix = \"proto/\"\n").unwrap();

        let config = GateConfig::from_file(&path).unwrap();
        assert_eq!(config.protected_prefix, "proto/");
    }

    #[test]
    fn test_example_config_parses() {
        let config =
            GateConfig::from_toml_str(include_str!("../../../review-gate.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.team.unwrap().to_string(), "dbt-labs/core-group");
    }

    #[test]
    fn test_actions_run_url() {
        assert_eq!(
            actions_run_url(Some("https://github.com/"), Some("o/r"), Some("99")).as_deref(),
            Some("https://github.com/o/r/actions/runs/99")
        );
        assert!(actions_run_url(Some("https://github.com"), None, Some("99")).is_none());
    }

    #[test]
    fn test_actions_run_url_needs_run_id() {
        assert!(actions_run_url(Some("https://github.com"), Some("o/r"), Some("")).is_none());
        assert!(actions_run_url(Some("https://github.com"), Some("o/r"), None).is_none());
    }
}
