use crate::configuration::models::client_settings::KubeconfigSource;
use anyhow::bail;
use async_trait::async_trait;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Config;
use log::{debug, info};
use serde_yml::from_str;
use std::sync::Arc;
use tokio::process::Command;

pub fn from_command() -> Arc<dyn KubeConfigLoader<ConfigSource = String>> {
    Arc::new(ExecutableKubeConfigLoader)
}

pub fn from_file() -> Arc<dyn KubeConfigLoader<ConfigSource = String>> {
    Arc::new(FileKubeConfigLoader)
}

pub fn from_cluster() -> Arc<dyn ParameterLessConfigLoader> {
    Arc::new(InClusterKubeConfigLoader)
}

/// Builds the client configuration described by `source`.
pub async fn load(source: &KubeconfigSource) -> anyhow::Result<Config> {
    match source {
        KubeconfigSource::Infer => {
            info!("Inferring Kubernetes configuration from the environment");
            Ok(Config::infer().await?)
        }
        KubeconfigSource::File { path } => from_file().load(path).await,
        KubeconfigSource::Command { command } => from_command().load(command).await,
        KubeconfigSource::InCluster => from_cluster().load(),
    }
}

#[async_trait]
pub trait KubeConfigLoader: Send + Sync {
    type ConfigSource;
    async fn load(&self, source: &Self::ConfigSource) -> anyhow::Result<Config>;
}

pub trait ParameterLessConfigLoader: Send + Sync {
    fn load(&self) -> anyhow::Result<Config>;
}

async fn from_kubeconfig_string(kubeconfig_string: &str) -> anyhow::Result<Config> {
    let kubeconfig: Kubeconfig = from_str(kubeconfig_string)?;
    Ok(Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?)
}

struct ExecutableKubeConfigLoader;

#[async_trait]
impl KubeConfigLoader for ExecutableKubeConfigLoader {
    type ConfigSource = String;

    async fn load(&self, source: &Self::ConfigSource) -> anyhow::Result<Config> {
        info!("Loading kubeconfig from command: {:?}", source);
        let output = Command::new("sh").arg("-c").arg(source).output().await?;
        if !output.status.success() {
            bail!(
                "Failed to execute command: {:?}",
                String::from_utf8_lossy(&output.stderr)
            );
        }
        let kubeconfig_string = String::from_utf8(output.stdout)?;
        debug!("Loaded kubeconfig of {} bytes", kubeconfig_string.len());
        from_kubeconfig_string(&kubeconfig_string).await
    }
}

struct FileKubeConfigLoader;

#[async_trait]
impl KubeConfigLoader for FileKubeConfigLoader {
    type ConfigSource = String;

    async fn load(&self, source: &Self::ConfigSource) -> anyhow::Result<Config> {
        info!("Loading kubeconfig file: {:?}", source);
        let kubeconfig_string = tokio::fs::read_to_string(source).await?;
        from_kubeconfig_string(&kubeconfig_string).await
    }
}

struct InClusterKubeConfigLoader;

impl ParameterLessConfigLoader for InClusterKubeConfigLoader {
    fn load(&self) -> anyhow::Result<Config> {
        info!("Loading in-cluster Kubernetes configuration");
        let config = Config::incluster()?;
        Ok(config)
    }
}
