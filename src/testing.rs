use crate::configuration::models::client_settings::ClientSettings;
use crate::services::backends::kubernetes::kubeconfig_loader;
use crate::services::backends::kubernetes::kubernetes_backend::KubernetesBackend;
use crate::services::client::object_source::ObjectSource;
use k8s_openapi::api::core::v1::Namespace;
use kube::{Client, Config};
use log::info;
use serde_json::json;
use uuid::Uuid;

pub mod api_extensions;
pub mod memory_cluster_context;
pub mod recording_handler;
pub mod temp_namespace_context;

const KIND_KUBECONFIG_COMMAND: &str = "kind get kubeconfig --name kind";

/// COVERAGE: disabled since this is a testing helper
#[cfg_attr(coverage, coverage(off))]
pub async fn get_kubeconfig() -> anyhow::Result<Config> {
    kubeconfig_loader::from_command()
        .load(&KIND_KUBECONFIG_COMMAND.to_string())
        .await
}

pub async fn kind_backend() -> anyhow::Result<KubernetesBackend> {
    let client = Client::try_from(get_kubeconfig().await?)?;
    Ok(KubernetesBackend::new(client, (&ClientSettings::default()).into()))
}

pub async fn create_namespace(backend: &KubernetesBackend) -> anyhow::Result<String> {
    let namespace_name = Uuid::new_v4().to_string();
    info!("Using namespace: {}", namespace_name);

    let namespace: Namespace = serde_json::from_value(json!({
        "metadata": {
            "name": namespace_name
        }
    }))?;
    backend
        .cluster_objects::<Namespace>()
        .create(ObjectSource::Object(namespace))
        .await?;
    info!("Namespace {} created successfully", namespace_name);
    Ok(namespace_name)
}
