use crate::core::{LabelsOutcome, Outcome, Provision};
use prometheus_client::{
    encoding::EncodeLabelSet,
    metrics::{counter::Counter, family::Family},
    registry::Registry,
};

#[derive(Clone, Debug, Default)]
pub struct ControllerMetrics {
    reconciles: Counter,
    limit_ranges: Family<ResultLabels, Counter>,
    label_patches: Family<ResultLabels, Counter>,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct ResultLabels {
    result: &'static str,
}

// === impl ControllerMetrics ===

impl ControllerMetrics {
    pub fn register(prom: &mut Registry) -> Self {
        let reconciles = Counter::default();
        prom.register(
            "reconciles",
            "Count of namespace reconciliations",
            reconciles.clone(),
        );

        let limit_ranges = Family::default();
        prom.register(
            "limit_ranges",
            "Count of default limit range checks by result",
            limit_ranges.clone(),
        );

        let label_patches = Family::default();
        prom.register(
            "label_enforcements",
            "Count of namespace label enforcements by result",
            label_patches.clone(),
        );

        Self {
            reconciles,
            limit_ranges,
            label_patches,
        }
    }

    pub(crate) fn observe(&self, outcome: &Outcome) {
        self.reconciles.inc();

        let result = match outcome.limit_range {
            Some(Provision::Skipped) => "skipped",
            Some(Provision::Exists) => "exists",
            Some(Provision::Created) => "created",
            None => "failed",
        };
        self.limit_ranges.get_or_create(&ResultLabels { result }).inc();

        let result = match outcome.labels {
            LabelsOutcome::NoTeam => "no_team",
            LabelsOutcome::Unchanged => "unchanged",
            LabelsOutcome::Patched => "patched",
            LabelsOutcome::Failed => "failed",
        };
        self.label_patches.get_or_create(&ResultLabels { result }).inc();
    }
}
