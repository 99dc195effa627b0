use crate::{
    core::{ApiError, ClusterApi},
    k8s::{self, LimitRange, Namespace},
};
use std::future::Future;
use tokio::time;

/// A [`ClusterApi`] backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeApi {
    client: k8s::Client,
    field_manager: String,
    timeout: time::Duration,
}

// === impl KubeApi ===

impl KubeApi {
    pub fn new(client: k8s::Client, field_manager: String, timeout: time::Duration) -> Self {
        Self {
            client,
            field_manager,
            timeout,
        }
    }

    async fn timed<T>(
        &self,
        call: impl Future<Output = Result<T, k8s::Error>>,
    ) -> Result<T, ApiError> {
        time::timeout(self.timeout, call)
            .await
            .map_err(|_| ApiError::Timeout(self.timeout))?
            .map_err(Into::into)
    }
}

#[async_trait::async_trait]
impl ClusterApi for KubeApi {
    async fn get_limit_range(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<LimitRange>, ApiError> {
        let api = k8s::Api::<LimitRange>::namespaced(self.client.clone(), namespace);
        self.timed(api.get_opt(name)).await
    }

    async fn create_limit_range(
        &self,
        namespace: &str,
        limit_range: LimitRange,
    ) -> Result<(), ApiError> {
        let api = k8s::Api::<LimitRange>::namespaced(self.client.clone(), namespace);
        let params = k8s::PostParams {
            field_manager: Some(self.field_manager.clone()),
            ..Default::default()
        };
        self.timed(api.create(&params, &limit_range)).await?;
        Ok(())
    }

    async fn patch_namespace(&self, name: &str, patch: &json_patch::Patch) -> Result<(), ApiError> {
        let api = k8s::Api::<Namespace>::all(self.client.clone());
        let params = k8s::PatchParams {
            field_manager: Some(self.field_manager.clone()),
            ..Default::default()
        };
        self.timed(api.patch(name, &params, &k8s::Patch::Json::<()>(patch.clone())))
            .await?;
        Ok(())
    }
}
