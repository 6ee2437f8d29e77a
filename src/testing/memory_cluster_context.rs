use crate::services::apply::apply_engine::ApplyEngine;
use crate::services::backends::memory::memory_cluster::MemoryCluster;
use crate::services::backends::memory::memory_object_store::MemoryObjectStore;
use crate::services::backends::memory::static_catalog_source::StaticCatalogSource;
use crate::services::base::types::ResourceScope;
use crate::services::client::client_config::ClientConfig;
use crate::services::client::object_client::ObjectClient;
use crate::services::discovery::type_resolver::TypeResolver;
use crate::services::discovery::type_descriptor::GroupKind;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::api::DynamicObject;
use std::sync::Arc;
use test_context::AsyncTestContext;

/// In-process cluster with the builtin catalog and a typed ConfigMap store.
pub struct MemoryClusterContext {
    pub cluster: Arc<MemoryCluster>,
    pub catalog: Arc<StaticCatalogSource>,
    pub config_maps: Arc<MemoryObjectStore<ConfigMap>>,
}

impl MemoryClusterContext {
    pub fn engine(&self) -> ApplyEngine {
        ApplyEngine::new(
            TypeResolver::new(self.catalog.clone()),
            self.cluster.clone(),
            ClientConfig::default(),
        )
    }

    pub fn config_map_client(&self) -> ObjectClient<ConfigMap> {
        ObjectClient::new(self.config_maps.clone(), ClientConfig::default())
    }

    /// Untyped store the engine writes objects of `kind` to.
    pub async fn dynamic_store(&self, group: &str, kind: &str) -> Arc<MemoryObjectStore<DynamicObject>> {
        let resolver = TypeResolver::new(self.catalog.clone());
        let descriptor = resolver
            .resolve(&GroupKind::new(group, kind), "v1")
            .await
            .expect("Type is not in the builtin catalog");
        self.cluster.store(&descriptor)
    }

    pub async fn dynamic_client(&self, group: &str, kind: &str, namespace: &str) -> ObjectClient<DynamicObject> {
        let store = self.dynamic_store(group, kind).await;
        ObjectClient::new(store, ClientConfig::default().with_namespace(namespace))
    }
}

impl AsyncTestContext for MemoryClusterContext {
    async fn setup() -> Self {
        MemoryClusterContext {
            cluster: Arc::new(MemoryCluster::new()),
            catalog: Arc::new(StaticCatalogSource::builtin()),
            config_maps: Arc::new(MemoryObjectStore::new("ConfigMap", ResourceScope::Namespaced)),
        }
    }
}
