use crate::{
    api::ClusterApi,
    config::{Config, Team},
    k8s::{Labels, Namespace, ResourceExt},
    labels, limits, patch,
    limits::Provision,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reconciles namespaces against the team policy configuration.
///
/// The reconciler holds no state between calls; namespaces may be reconciled
/// concurrently.
#[derive(Clone, Debug)]
pub struct Reconciler<A> {
    config: Arc<Config>,
    api: A,
}

/// Describes what a single reconciliation did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// The limit range provisioning result, or `None` if provisioning failed.
    pub limit_range: Option<Provision>,
    /// The name of the owning team, if one was found.
    pub team: Option<String>,
    pub labels: LabelsOutcome,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LabelsOutcome {
    /// No team owns the namespace.
    NoTeam,
    /// The namespace's labels already satisfy the team's policy.
    Unchanged,
    Patched,
    Failed,
}

// === impl Reconciler ===

impl<A: ClusterApi> Reconciler<A> {
    pub fn new(config: Arc<Config>, api: A) -> Self {
        Self { config, api }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Provisions the namespace's default limit range and brings its labels
    /// in line with the owning team's policy.
    ///
    /// Failures are logged and reported in the outcome; they never abort the
    /// remaining steps.
    pub async fn reconcile(&self, ns: &Namespace) -> Outcome {
        let name = ns.name_any();

        let limit_range = match limits::ensure_limit_range(&self.api, &self.config, &name).await {
            Ok(provision) => {
                debug!(?provision, "Checked default limit range");
                Some(provision)
            }
            Err(error) => {
                warn!(%error, "Failed to provision default limit range");
                None
            }
        };

        let team = match self.config.find_team(&name) {
            Ok(team) => team,
            Err(error) => {
                info!(%error, "Skipping label enforcement");
                return Outcome {
                    limit_range,
                    team: None,
                    labels: LabelsOutcome::NoTeam,
                };
            }
        };
        debug!(team = %team.name, "Resolved team");

        Outcome {
            limit_range,
            team: Some(team.name.clone()),
            labels: self.enforce_labels(&name, ns, team).await,
        }
    }

    /// Applies every label correction in a single patch computed against the
    /// observed namespace.
    async fn enforce_labels(&self, name: &str, ns: &Namespace, team: &Team) -> LabelsOutcome {
        let current = Labels::from_ns(ns);
        let desired = labels::desired_labels(&current, &team.labels);
        if desired == current {
            return LabelsOutcome::Unchanged;
        }

        let mut next = ns.clone();
        next.metadata.labels = Some(desired.into_inner());
        let patch = match patch::diff(ns, &next) {
            Ok(patch) => patch,
            Err(error) => {
                warn!(%error, "Failed to build namespace patch");
                return LabelsOutcome::Failed;
            }
        };
        if patch.0.is_empty() {
            return LabelsOutcome::Unchanged;
        }

        debug!(?patch, "Patching namespace");
        match self.api.patch_namespace(name, &patch).await {
            Ok(()) => {
                info!("Patched namespace labels");
                LabelsOutcome::Patched
            }
            Err(error) => {
                warn!(%error, "Failed to patch namespace");
                LabelsOutcome::Failed
            }
        }
    }
}
