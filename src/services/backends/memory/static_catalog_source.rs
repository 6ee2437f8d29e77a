use crate::services::base::status::object_details::ObjectDetails;
use crate::services::base::status::{Operation, Status};
use crate::services::base::types::ResourceScope;
use crate::services::discovery::catalog_source::CatalogSource;
use crate::services::discovery::type_descriptor::TypeDescriptor;
use async_trait::async_trait;
use kube::api::GroupVersionKind;
use kube::core::ErrorResponse;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Catalog source backed by a fixed list of types.
pub struct StaticCatalogSource {
    entries: Vec<TypeDescriptor>,
    failure_code: Option<u16>,
    fetches: AtomicUsize,
}

impl StaticCatalogSource {
    pub fn new(entries: Vec<TypeDescriptor>) -> Self {
        StaticCatalogSource {
            entries,
            failure_code: None,
            fetches: AtomicUsize::new(0),
        }
    }

    /// A small catalog of core types
    pub fn builtin() -> Self {
        let entry = |group: &str, kind: &str, plural: &str, scope: ResourceScope| {
            TypeDescriptor::new(&GroupVersionKind::gvk(group, "v1", kind), plural, scope)
        };
        Self::new(vec![
            entry("", "ConfigMap", "configmaps", ResourceScope::Namespaced),
            entry("", "Secret", "secrets", ResourceScope::Namespaced),
            entry("", "Namespace", "namespaces", ResourceScope::Cluster),
            entry("apps", "Deployment", "deployments", ResourceScope::Namespaced),
            entry("rbac.authorization.k8s.io", "Role", "roles", ResourceScope::Namespaced),
            entry("rbac.authorization.k8s.io", "ClusterRole", "clusterroles", ResourceScope::Cluster),
        ])
    }

    /// A source whose every fetch is rejected with the given HTTP status code.
    pub fn failing(code: u16) -> Self {
        StaticCatalogSource {
            failure_code: Some(code),
            ..Self::new(Vec::new())
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn fetch(&self) -> Result<Vec<TypeDescriptor>, Status> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.failure_code {
            Some(code) => Err(Status::from_kube(
                Operation::Discovery,
                ObjectDetails::new("APIResourceList", "", None),
                kube::Error::Api(ErrorResponse {
                    status: "Failure".to_string(),
                    message: "discovery is unavailable".to_string(),
                    reason: "ServiceUnavailable".to_string(),
                    code,
                }),
            )),
            None => Ok(self.entries.clone()),
        }
    }
}
