//! Team identity and membership.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// A team addressed as `org/slug`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TeamRef {
    pub org: String,
    pub slug: String,
}

impl FromStr for TeamRef {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((org, slug))
                if !org.is_empty() && !slug.is_empty() && !slug.contains('/') =>
            {
                Ok(TeamRef {
                    org: org.to_string(),
                    slug: slug.to_string(),
                })
            }
            _ => Err(ConfigError::InvalidTeam(s.to_string())),
        }
    }
}

impl fmt::Display for TeamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.org, self.slug)
    }
}

impl Serialize for TeamRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TeamRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Members whose approvals count toward the gate.
///
/// Identifiers are compared exactly; no case folding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamRoster(BTreeSet<String>);

impl TeamRoster {
    pub fn new(members: impl IntoIterator<Item = String>) -> Self {
        Self(members.into_iter().collect())
    }

    pub fn contains(&self, member: &str) -> bool {
        self.0.contains(member)
    }

    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TeamRoster {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
