
use crate::services::client::client_config::{
    ClientConfig, DEFAULT_LIST_LIMIT, DEFAULT_NAMESPACE, DEFAULT_OPERATION_TIMEOUT,
};
use duration_string::DurationString;
use serde::Deserialize;

/// Where the cluster connection settings come from
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KubeconfigSource {
    /// Local kubeconfig, falling back to the in-cluster service account
    #[default]
    Infer,
    File {
        path: String,
    },
    /// Shell command that prints a kubeconfig to stdout
    Command {
        command: String,
    },
    InCluster,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSettings {
    #[serde(default)]
    pub kubeconfig: KubeconfigSource,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout: DurationString,
    #[serde(default)]
    pub dry_run: bool,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_list_limit() -> u32 {
    DEFAULT_LIST_LIMIT
}

fn default_operation_timeout() -> DurationString {
    DEFAULT_OPERATION_TIMEOUT.into()
}

impl Default for ClientSettings {
    fn default() -> Self {
        ClientSettings {
            kubeconfig: KubeconfigSource::default(),
            namespace: default_namespace(),
            list_limit: default_list_limit(),
            operation_timeout: default_operation_timeout(),
            dry_run: false,
        }
    }
}

impl From<&ClientSettings> for ClientConfig {
    fn from(settings: &ClientSettings) -> Self {
        ClientConfig::new(
            &settings.namespace,
            settings.list_limit,
            settings.operation_timeout.into(),
            settings.dry_run,
        )
    }
}
