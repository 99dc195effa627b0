use crate::k8s::{
    labels::{POD_SECURITY_ENFORCE, POD_SECURITY_WARN},
    Labels,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// The values a label may take, parsed from a comma-separated list.
///
/// The first value is the default that is set when the label is missing or
/// holds a value that isn't allowed.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct LabelPolicy {
    allowed: Vec<String>,
}

// === impl LabelPolicy ===

impl LabelPolicy {
    pub fn parse(value: &str) -> Self {
        Self {
            allowed: value.split(',').map(ToString::to_string).collect(),
        }
    }

    pub fn default_value(&self) -> &str {
        // `split` always yields at least one element.
        &self.allowed[0]
    }

    pub fn allows(&self, value: &str) -> bool {
        self.allowed.iter().any(|v| v == value)
    }

    fn corrective_value(&self) -> Option<String> {
        Some(self.default_value())
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
    }
}

impl From<String> for LabelPolicy {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for LabelPolicy {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// Decides the value `key` must be set to, if it needs to change at all.
pub fn decide(labels: &Labels, key: &str, policy: &LabelPolicy) -> Option<String> {
    match labels.get(key) {
        None if key == POD_SECURITY_WARN && labels.contains_key(POD_SECURITY_ENFORCE) => None,
        None => policy.corrective_value(),
        Some(value) if !policy.allows(value) => policy.corrective_value(),
        Some(_) => None,
    }
}

/// Computes the labels a namespace must carry under a team's policies.
///
/// Evaluation happens in two phases. First, pod-security precedence is
/// resolved: when the enforce label is present on the namespace or managed by
/// the policy, the warn label is dropped. Then each policy key is checked
/// against its allowed values.
pub fn desired_labels(current: &Labels, policies: &BTreeMap<String, LabelPolicy>) -> Labels {
    let mut desired = current.clone();

    let enforced =
        current.contains_key(POD_SECURITY_ENFORCE) || policies.contains_key(POD_SECURITY_ENFORCE);
    if enforced {
        if let Some(value) = desired.remove(POD_SECURITY_WARN) {
            info!(%value, "Removing warn label superseded by enforce label");
        }
    }

    for (key, policy) in policies {
        if enforced && key == POD_SECURITY_WARN {
            debug!("Ignoring warn label policy superseded by enforce label");
            continue;
        }

        if let Some(value) = decide(&desired, key, policy) {
            match desired.insert(key.as_str(), value.as_str()) {
                None => info!(%key, %value, "Adding label"),
                Some(prior) => info!(%key, %value, %prior, "Replacing label with disallowed value"),
            }
        }
    }

    desired
}
