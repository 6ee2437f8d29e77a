use crate::services::base::object_store::{ListQuery, WriteOptions};
use std::time::Duration;

pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_LIST_LIMIT: u32 = 500;
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings carried by every object client.
/// Values are never changed in place; `with_*` returns an adjusted copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    namespace: String,
    limit: u32,
    timeout: Duration,
    dry_run: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            namespace: DEFAULT_NAMESPACE.to_string(),
            limit: DEFAULT_LIST_LIMIT,
            timeout: DEFAULT_OPERATION_TIMEOUT,
            dry_run: false,
        }
    }
}

impl ClientConfig {
    pub fn new(namespace: &str, limit: u32, timeout: Duration, dry_run: bool) -> Self {
        ClientConfig {
            namespace: namespace.to_string(),
            limit,
            timeout,
            dry_run,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn with_namespace(&self, namespace: &str) -> Self {
        ClientConfig {
            namespace: namespace.to_string(),
            ..self.clone()
        }
    }

    pub fn with_limit(&self, limit: u32) -> Self {
        ClientConfig { limit, ..self.clone() }
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        ClientConfig { timeout, ..self.clone() }
    }

    pub fn with_dry_run(&self) -> Self {
        ClientConfig {
            dry_run: true,
            ..self.clone()
        }
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions { dry_run: self.dry_run }
    }

    pub fn list_query(&self, label_selector: Option<&str>) -> ListQuery {
        ListQuery {
            label_selector: label_selector.map(str::to_string),
            field_selector: None,
            limit: Some(self.limit),
            timeout: Some(self.timeout),
        }
    }
}
