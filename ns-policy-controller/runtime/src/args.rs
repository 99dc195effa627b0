use crate::{
    cluster::KubeApi,
    core::{Config, Reconciler},
    k8s, namespaces, ControllerMetrics,
};
use anyhow::{bail, Context, Result};
use clap::Parser;
use kube::runtime::watcher;
use prometheus_client::registry::Registry;
use std::{path::PathBuf, sync::Arc};
use tokio::time::Duration;
use tracing::{info, info_span, Instrument};

#[derive(Debug, Parser)]
#[clap(
    name = "ns-policy",
    about = "Enforces team label policies and default limits on namespaces"
)]
pub struct Args {
    #[clap(
        long,
        default_value = "ns_policy=info,warn",
        env = "NS_POLICY_CONTROLLER_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    #[clap(flatten)]
    client: kubert::ClientArgs,

    #[clap(flatten)]
    admin: kubert::AdminArgs,

    /// Path to the team policy configuration.
    #[clap(
        long,
        default_value = "/etc/ns-policy-controller/config.yaml",
        env = "NS_POLICY_CONTROLLER_CONFIG"
    )]
    config: PathBuf,

    /// Timeout for each request to the Kubernetes API.
    #[clap(long, default_value = "5000")]
    patch_timeout_ms: u64,

    #[clap(long, default_value = "ns-policy-controller")]
    field_manager: String,
}

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            client,
            admin,
            config,
            patch_timeout_ms,
            field_manager,
        } = self;

        let mut prom = <Registry>::default();
        let metrics = ControllerMetrics::register(prom.sub_registry_with_prefix("ns_policy"));
        let rt_metrics = kubert::RuntimeMetrics::register(prom.sub_registry_with_prefix("kube"));

        let mut runtime = kubert::Runtime::builder()
            .with_log(log_level, log_format)
            .with_metrics(rt_metrics)
            .with_admin(admin.into_builder().with_prometheus(prom))
            .with_client(client)
            .build()
            .await?;

        // Reconciliation is meaningless without a policy, so a missing or
        // malformed config prevents startup.
        let config = Config::load(&config)
            .with_context(|| format!("failed to load config from {}", config.display()))?;
        info!(
            teams = config.maintainers.len(),
            admin_namespaces = config.admin_namespaces.len(),
            "Loaded config"
        );

        let api = KubeApi::new(
            runtime.client(),
            field_manager,
            Duration::from_millis(patch_timeout_ms),
        );
        let reconciler = Reconciler::new(Arc::new(config), api);

        let events = runtime.watch_all::<k8s::Namespace>(watcher::Config::default());
        tokio::spawn(
            namespaces::process(reconciler, metrics, events).instrument(info_span!("namespaces")),
        );

        // Block the main thread on the shutdown signal.
        if runtime.run().await.is_err() {
            bail!("Aborted");
        }

        Ok(())
    }
}
