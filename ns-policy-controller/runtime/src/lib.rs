#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub use ns_policy_controller_core as core;
pub use ns_policy_controller_k8s_api as k8s;

mod args;
mod cluster;
mod metrics;
mod namespaces;

pub use self::{args::Args, cluster::KubeApi, metrics::ControllerMetrics};
