use crate::k8s::{self, LimitRange};
use std::time::Duration;
use thiserror::Error;

/// The cluster operations the reconciler depends on.
#[async_trait::async_trait]
pub trait ClusterApi: Send + Sync {
    /// Fetches a limit range, returning `None` if it does not exist.
    async fn get_limit_range(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<LimitRange>, ApiError>;

    async fn create_limit_range(
        &self,
        namespace: &str,
        limit_range: LimitRange,
    ) -> Result<(), ApiError>;

    /// Applies a JSON patch to a namespace.
    async fn patch_namespace(&self, name: &str, patch: &json_patch::Patch) -> Result<(), ApiError>;
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Kube(#[from] k8s::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}
