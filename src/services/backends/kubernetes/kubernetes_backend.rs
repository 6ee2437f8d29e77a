use crate::configuration::models::client_settings::ClientSettings;
use crate::services::apply::apply_engine::ApplyEngine;
use crate::services::backends::kubernetes::kube_catalog_source::KubeCatalogSource;
use crate::services::backends::kubernetes::kube_object_store::KubeObjectStore;
use crate::services::backends::kubernetes::kube_store_factory::KubeStoreFactory;
use crate::services::backends::kubernetes::kubeconfig_loader;
use crate::services::client::client_config::ClientConfig;
use crate::services::client::object_client::ObjectClient;
use crate::services::discovery::type_resolver::TypeResolver;
use k8s_openapi::{ClusterResourceScope, NamespaceResourceScope};
use kube::{Client, Resource};
use log::info;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::sync::Arc;

/// Entry point for working against a live cluster.
#[derive(Clone)]
pub struct KubernetesBackend {
    client: Client,
    config: ClientConfig,
}

impl KubernetesBackend {
    pub fn new(client: Client, config: ClientConfig) -> Self {
        KubernetesBackend { client, config }
    }

    pub async fn connect(settings: &ClientSettings) -> anyhow::Result<Self> {
        let client = connect(settings).await?;
        Ok(Self::new(client, settings.into()))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Client for a namespaced type, bound to the configured namespace.
    pub fn objects<K>(&self) -> ObjectClient<K>
    where
        K: Resource<Scope = NamespaceResourceScope>
            + Clone
            + Debug
            + Serialize
            + DeserializeOwned
            + Send
            + Sync
            + 'static,
        K::DynamicType: Default,
    {
        ObjectClient::new(
            Arc::new(KubeObjectStore::<K>::namespaced(self.client.clone())),
            self.config.clone(),
        )
    }

    pub fn cluster_objects<K>(&self) -> ObjectClient<K>
    where
        K: Resource<Scope = ClusterResourceScope>
            + Clone
            + Debug
            + Serialize
            + DeserializeOwned
            + Send
            + Sync
            + 'static,
        K::DynamicType: Default,
    {
        ObjectClient::new(
            Arc::new(KubeObjectStore::<K>::cluster(self.client.clone())),
            self.config.clone(),
        )
    }

    /// Engine for manifests of any kind. Each engine keeps its own discovery catalog.
    pub fn apply_engine(&self) -> ApplyEngine {
        ApplyEngine::new(
            TypeResolver::new(Arc::new(KubeCatalogSource::new(self.client.clone()))),
            Arc::new(KubeStoreFactory::new(self.client.clone())),
            self.config.clone(),
        )
    }
}

/// Builds a client from the configured kubeconfig source.
pub async fn connect(settings: &ClientSettings) -> anyhow::Result<Client> {
    let config = kubeconfig_loader::load(&settings.kubeconfig).await?;
    info!("Connecting to Kubernetes API at {}", config.cluster_url);
    Ok(Client::try_from(config)?)
}
