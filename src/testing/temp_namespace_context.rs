use crate::services::backends::kubernetes::kubernetes_backend::KubernetesBackend;
use crate::services::client::object_client::ObjectClient;
use crate::testing::{create_namespace, kind_backend};
use k8s_openapi::api::core::v1::Namespace;
use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use test_context::AsyncTestContext;

/// A fresh namespace in the local kind cluster, removed on teardown.
pub struct TempNamespaceContext {
    pub namespace: String,
    pub backend: KubernetesBackend,
}

impl TempNamespaceContext {
    pub fn objects<K>(&self) -> ObjectClient<K>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>
            + Clone
            + Debug
            + Serialize
            + DeserializeOwned
            + Send
            + Sync
            + 'static,
        K::DynamicType: Default,
    {
        self.backend.objects::<K>().with_namespace(&self.namespace)
    }
}

impl AsyncTestContext for TempNamespaceContext {
    async fn setup() -> Self {
        let backend = kind_backend().await.expect("Failed to create backend");
        let namespace = create_namespace(&backend).await.expect("Failed to create namespace");
        TempNamespaceContext { namespace, backend }
    }

    async fn teardown(self) {
        let namespaces = self.backend.cluster_objects::<Namespace>();
        if let Err(e) = namespaces.delete(&self.namespace, true).await {
            warn!("Failed to remove namespace {}: {}", self.namespace, e);
        }
    }
}
