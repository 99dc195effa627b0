use crate::{
    api::{ApiError, ClusterApi},
    config::Config,
    k8s::{LimitRange, LimitRangeItem, LimitRangeSpec, ObjectMeta, Quantity},
};
use std::collections::BTreeMap;
use thiserror::Error;

/// The name of the limit range provisioned in each namespace.
pub const LIMIT_RANGE_NAME: &str = "default-limits";

const DEFAULT_LIMIT_CPU: &str = "200m";
const DEFAULT_LIMIT_MEMORY: &str = "100Mi";
const DEFAULT_REQUEST_CPU: &str = "25m";
const DEFAULT_REQUEST_MEMORY: &str = "100Mi";

/// Container resource defaults applied to namespaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LimitDefaults {
    pub limit_cpu: String,
    pub limit_memory: String,
    pub request_cpu: String,
    pub request_memory: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Provision {
    /// The namespace is an admin namespace.
    Skipped,
    /// A limit range already exists and was left as-is.
    Exists,
    Created,
}

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("failed to fetch limit range: {0}")]
    Lookup(#[source] ApiError),

    #[error("failed to create limit range: {0}")]
    Create(#[source] ApiError),
}

// === impl LimitDefaults ===

impl LimitDefaults {
    pub fn from_config(config: &Config) -> Self {
        fn or_default(value: &Option<String>, default: &str) -> String {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        }

        Self {
            limit_cpu: or_default(&config.limit_cpu, DEFAULT_LIMIT_CPU),
            limit_memory: or_default(&config.limit_memory, DEFAULT_LIMIT_MEMORY),
            request_cpu: or_default(&config.request_cpu, DEFAULT_REQUEST_CPU),
            request_memory: or_default(&config.request_memory, DEFAULT_REQUEST_MEMORY),
        }
    }

    pub fn limit_range(&self) -> LimitRange {
        fn resources(cpu: &str, memory: &str) -> BTreeMap<String, Quantity> {
            [
                ("cpu".to_string(), Quantity(cpu.to_string())),
                ("memory".to_string(), Quantity(memory.to_string())),
            ]
            .into_iter()
            .collect()
        }

        LimitRange {
            metadata: ObjectMeta {
                name: Some(LIMIT_RANGE_NAME.to_string()),
                ..Default::default()
            },
            spec: Some(LimitRangeSpec {
                limits: vec![LimitRangeItem {
                    type_: "Container".to_string(),
                    default: Some(resources(&self.limit_cpu, &self.limit_memory)),
                    default_request: Some(resources(&self.request_cpu, &self.request_memory)),
                    ..Default::default()
                }],
            }),
        }
    }
}

impl Default for LimitDefaults {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Creates the default limit range in a namespace unless it is an admin
/// namespace or a limit range by that name already exists.
///
/// An existing limit range is never updated, even if it differs from the
/// configured defaults.
pub async fn ensure_limit_range<A>(
    api: &A,
    config: &Config,
    namespace: &str,
) -> Result<Provision, ProvisionError>
where
    A: ClusterApi + ?Sized,
{
    if config.is_admin_namespace(namespace) {
        return Ok(Provision::Skipped);
    }

    if api
        .get_limit_range(namespace, LIMIT_RANGE_NAME)
        .await
        .map_err(ProvisionError::Lookup)?
        .is_some()
    {
        return Ok(Provision::Exists);
    }

    let limit_range = LimitDefaults::from_config(config).limit_range();
    api.create_limit_range(namespace, limit_range)
        .await
        .map_err(ProvisionError::Create)?;
    tracing::info!(name = LIMIT_RANGE_NAME, "Created limit range");
    Ok(Provision::Created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::tests::MockApi;
    use pretty_assertions::assert_eq;

    fn config() -> Config {
        Config {
            admin_namespaces: vec!["kube-system".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn builtin_defaults() {
        assert_eq!(
            LimitDefaults::default(),
            LimitDefaults {
                limit_cpu: "200m".to_string(),
                limit_memory: "100Mi".to_string(),
                request_cpu: "25m".to_string(),
                request_memory: "100Mi".to_string(),
            }
        );
    }

    #[test]
    fn overridden_defaults() {
        let config = Config {
            limit_cpu: Some("1".to_string()),
            request_memory: Some("64Mi".to_string()),
            limit_memory: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            LimitDefaults::from_config(&config),
            LimitDefaults {
                limit_cpu: "1".to_string(),
                limit_memory: "100Mi".to_string(),
                request_cpu: "25m".to_string(),
                request_memory: "64Mi".to_string(),
            }
        );
    }

    #[test]
    fn limit_range_object() {
        let lr = LimitDefaults::default().limit_range();
        assert_eq!(lr.metadata.name.as_deref(), Some(LIMIT_RANGE_NAME));

        let spec = lr.spec.expect("spec must be set");
        assert_eq!(spec.limits.len(), 1);
        let item = &spec.limits[0];
        assert_eq!(item.type_, "Container");

        let default = item.default.as_ref().expect("default must be set");
        assert_eq!(default["cpu"], Quantity("200m".to_string()));
        assert_eq!(default["memory"], Quantity("100Mi".to_string()));

        let request = item.default_request.as_ref().expect("request must be set");
        assert_eq!(request["cpu"], Quantity("25m".to_string()));
        assert_eq!(request["memory"], Quantity("100Mi".to_string()));
    }

    #[tokio::test]
    async fn creates_once() {
        let api = MockApi::default();
        let config = config();

        let provision = ensure_limit_range(&api, &config, "foo").await.unwrap();
        assert_eq!(provision, Provision::Created);

        let provision = ensure_limit_range(&api, &config, "foo").await.unwrap();
        assert_eq!(provision, Provision::Exists);

        assert_eq!(api.state().creates, vec!["foo".to_string()]);
    }

    #[tokio::test]
    async fn existing_limit_range_is_untouched() {
        let api = MockApi::default();
        let existing = LimitDefaults {
            limit_cpu: "4".to_string(),
            ..Default::default()
        }
        .limit_range();
        api.state().limit_ranges.insert("foo".to_string(), existing.clone());

        let provision = ensure_limit_range(&api, &config(), "foo").await.unwrap();
        assert_eq!(provision, Provision::Exists);
        assert!(api.state().creates.is_empty());
        assert_eq!(api.state().limit_ranges["foo"], existing);
    }

    #[tokio::test]
    async fn admin_namespace_skipped() {
        let api = MockApi::default();
        let provision = ensure_limit_range(&api, &config(), "kube-system")
            .await
            .unwrap();
        assert_eq!(provision, Provision::Skipped);
        assert_eq!(api.state().lookups, 0);
        assert!(api.state().creates.is_empty());
    }

    #[tokio::test]
    async fn lookup_failure() {
        let api = MockApi::default();
        api.state().fail_lookup = true;
        let error = ensure_limit_range(&api, &config(), "foo")
            .await
            .expect_err("lookup must fail");
        assert!(matches!(error, ProvisionError::Lookup(_)), "{error}");
        assert!(api.state().creates.is_empty());
    }

    #[tokio::test]
    async fn create_failure() {
        let api = MockApi::default();
        api.state().fail_create = true;
        let error = ensure_limit_range(&api, &config(), "foo")
            .await
            .expect_err("create must fail");
        assert!(matches!(error, ProvisionError::Create(_)), "{error}");
    }
}
