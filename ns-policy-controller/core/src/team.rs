use crate::config::{Config, Team};
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// A regular expression matched against the whole namespace name.
///
/// A pattern that fails to compile never matches.
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "String")]
pub struct NamespacePattern {
    source: String,
    regex: Result<Regex, regex::Error>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("no team owns namespace {namespace}")]
pub struct TeamNotFound {
    pub namespace: String,
}

// === impl NamespacePattern ===

impl NamespacePattern {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{source})$"));
        Self { source, regex }
    }

    pub fn matches(&self, name: &str) -> bool {
        match &self.regex {
            Ok(regex) => regex.is_match(name),
            Err(error) => {
                tracing::debug!(pattern = %self.source, %error, "Skipping invalid namespace pattern");
                false
            }
        }
    }

    /// Returns the compilation error if the pattern is invalid.
    pub fn error(&self) -> Option<&regex::Error> {
        self.regex.as_ref().err()
    }
}

impl From<String> for NamespacePattern {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

impl From<&str> for NamespacePattern {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl fmt::Display for NamespacePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.source.fmt(f)
    }
}

// === impl Team ===

impl Team {
    pub fn owns(&self, namespace: &str) -> bool {
        self.namespaces.iter().any(|p| p.matches(namespace))
    }
}

// === impl Config ===

impl Config {
    /// Finds the first team, in declaration order, with a pattern matching the
    /// namespace name.
    pub fn find_team(&self, namespace: &str) -> Result<&Team, TeamNotFound> {
        self.maintainers
            .iter()
            .find(|team| team.owns(namespace))
            .ok_or_else(|| TeamNotFound {
                namespace: namespace.to_string(),
            })
    }
}
