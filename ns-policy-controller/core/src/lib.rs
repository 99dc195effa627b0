#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod labels;
pub mod limits;
pub mod patch;
mod reconcile;
mod team;

pub use self::{
    api::{ApiError, ClusterApi},
    config::{Config, ConfigError, Team},
    labels::LabelPolicy,
    limits::{LimitDefaults, Provision, ProvisionError},
    patch::PatchError,
    reconcile::{LabelsOutcome, Outcome, Reconciler},
    team::{NamespacePattern, TeamNotFound},
};
pub use ns_policy_controller_k8s_api as k8s;
