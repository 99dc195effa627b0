use crate::{
    core::{ClusterApi, Reconciler},
    k8s::{Namespace, ResourceExt},
    metrics::ControllerMetrics,
};
use futures::prelude::*;
use kube::runtime::watcher::Event;
use tracing::{debug, info_span, Instrument};

/// Reconciles each namespace delivered by the watch.
///
/// Events are processed one at a time, so updates to the same namespace never
/// race each other.
pub(crate) async fn process<A, S>(reconciler: Reconciler<A>, metrics: ControllerMetrics, events: S)
where
    A: ClusterApi,
    S: Stream<Item = Event<Namespace>>,
{
    tokio::pin!(events);
    while let Some(event) = events.next().await {
        match event {
            Event::Apply(ns) | Event::InitApply(ns) => {
                let span = info_span!("namespace", ns = %ns.name_any());
                let outcome = reconciler.reconcile(&ns).instrument(span).await;
                metrics.observe(&outcome);
            }
            Event::Delete(ns) => debug!(ns = %ns.name_any(), "Namespace deleted"),
            Event::Init => debug!("Namespace watch restarted"),
            Event::InitDone => debug!("Namespace watch initialized"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{ApiError, Config},
        k8s::{LimitRange, ObjectMeta},
    };
    use maplit::btreemap;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct RecordingApi(Arc<Mutex<Vec<String>>>);

    #[async_trait::async_trait]
    impl ClusterApi for RecordingApi {
        async fn get_limit_range(
            &self,
            namespace: &str,
            _name: &str,
        ) -> Result<Option<LimitRange>, ApiError> {
            self.0.lock().push(format!("get {namespace}"));
            Ok(Some(LimitRange::default()))
        }

        async fn create_limit_range(
            &self,
            namespace: &str,
            _limit_range: LimitRange,
        ) -> Result<(), ApiError> {
            self.0.lock().push(format!("create {namespace}"));
            Ok(())
        }

        async fn patch_namespace(
            &self,
            name: &str,
            _patch: &json_patch::Patch,
        ) -> Result<(), ApiError> {
            self.0.lock().push(format!("patch {name}"));
            Ok(())
        }
    }

    fn namespace(name: &str) -> Namespace {
        Namespace {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                labels: Some(btreemap! {}),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn reconciles_applied_namespaces() {
        let config = Config::from_yaml(
            r#"
maintainers:
- team: kaas
  labels:
    maintainer: kaas
  namespaces:
  - foo
  - bar
"#,
        )
        .unwrap();
        let api = RecordingApi::default();
        let reconciler = Reconciler::new(Arc::new(config), api.clone());

        let events = stream::iter(vec![
            Event::Init,
            Event::InitApply(namespace("foo")),
            Event::InitDone,
            Event::Apply(namespace("bar")),
            Event::Delete(namespace("foo")),
        ]);
        process(reconciler, ControllerMetrics::default(), events).await;

        assert_eq!(
            *api.0.lock(),
            vec![
                "get foo".to_string(),
                "patch foo".to_string(),
                "get bar".to_string(),
                "patch bar".to_string(),
            ]
        );
    }
}
