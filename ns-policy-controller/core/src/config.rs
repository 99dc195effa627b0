use crate::{labels::LabelPolicy, team::NamespacePattern};
use regex::Regex;
use serde::Deserialize;
use std::{collections::BTreeMap, path::Path};
use thiserror::Error;

/// Kubernetes resource quantity syntax: a signed decimal number followed by an
/// optional binary suffix, decimal suffix, or decimal exponent.
const QUANTITY_REGEX: &str =
    r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+|Ki|Mi|Gi|Ti|Pi|Ei|n|u|m|k|M|G|T|P|E)?$";

/// The namespace ownership and policy document.
///
/// Loaded once at startup and shared immutably between reconciliations.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Teams in declaration order. The first team with a pattern matching a
    /// namespace owns it.
    pub maintainers: Vec<Team>,

    /// Namespaces that never receive a default limit range.
    #[serde(rename = "adminnamespaces")]
    pub admin_namespaces: Vec<String>,

    #[serde(rename = "limitcpu")]
    pub limit_cpu: Option<String>,

    #[serde(rename = "limitmemory")]
    pub limit_memory: Option<String>,

    #[serde(rename = "requestcpu")]
    pub request_cpu: Option<String>,

    #[serde(rename = "requestmemory")]
    pub request_memory: Option<String>,
}

/// An ownership unit: the namespaces a team owns and the labels those
/// namespaces must carry.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Team {
    #[serde(rename = "team")]
    pub name: String,

    pub labels: BTreeMap<String, LabelPolicy>,

    pub namespaces: Vec<NamespacePattern>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid quantity for {field}: {value:?}")]
    InvalidQuantity { field: &'static str, value: String },
}

// === impl Config ===

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config = serde_yaml::from_str::<Self>(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks resource overrides and reports namespace patterns that can never
    /// match.
    ///
    /// Invalid patterns are not fatal: they are kept and never match, so the
    /// remaining patterns continue to resolve.
    fn validate(&self) -> Result<(), ConfigError> {
        for team in &self.maintainers {
            for pattern in &team.namespaces {
                if let Some(error) = pattern.error() {
                    tracing::warn!(
                        team = %team.name,
                        pattern = %pattern,
                        %error,
                        "Namespace pattern is invalid and will never match"
                    );
                }
            }
        }

        let quantity = Regex::new(QUANTITY_REGEX).expect("quantity regex must compile");
        for (field, value) in [
            ("limitcpu", &self.limit_cpu),
            ("limitmemory", &self.limit_memory),
            ("requestcpu", &self.request_cpu),
            ("requestmemory", &self.request_memory),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                if !quantity.is_match(value) {
                    return Err(ConfigError::InvalidQuantity {
                        field,
                        value: value.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn is_admin_namespace(&self, namespace: &str) -> bool {
        self.admin_namespaces.iter().any(|ns| ns == namespace)
    }
}
