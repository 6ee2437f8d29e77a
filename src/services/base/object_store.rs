use crate::services::base::status::Status;
use crate::services::base::types::ResourceScope;
use crate::services::discovery::type_descriptor::TypeDescriptor;
use async_trait::async_trait;
use futures::stream::BoxStream;
use kube::api::DynamicObject;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOptions {
    pub dry_run: bool,
    /// Remove immediately, skipping the graceful termination window
    pub force: bool,
}

/// Selection applied to list and watch calls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub label_selector: Option<String>,
    pub field_selector: Option<String>,
    pub limit: Option<u32>,
    pub timeout: Option<Duration>,
}

impl ListQuery {
    pub fn for_name(name: &str) -> Self {
        ListQuery {
            field_selector: Some(format!("metadata.name={}", name)),
            ..Default::default()
        }
    }
}

/// A single change notification delivered by a watch subscription
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectEvent<K> {
    Added(K),
    Modified(K),
    Deleted(K),
    Bookmark,
    Error(String),
    /// Every object that existed when the subscription opened has been announced
    Synced,
}

/// Event subscription; the end of the stream means the server closed the channel.
pub type EventStream<K> = BoxStream<'static, Result<ObjectEvent<K>, Status>>;

#[async_trait]
/// Raw access to one resource type at the server
pub trait ObjectStore<K>: Send + Sync
where
    K: Send + Sync + 'static,
{
    fn kind(&self) -> &str;

    fn scope(&self) -> ResourceScope;

    async fn create(&self, namespace: Option<&str>, object: &K, options: &WriteOptions) -> Result<K, Status>;

    /// Full replacement of an existing object
    async fn replace(
        &self,
        namespace: Option<&str>,
        name: &str,
        object: &K,
        options: &WriteOptions,
    ) -> Result<K, Status>;

    async fn delete(&self, namespace: Option<&str>, name: &str, options: &DeleteOptions) -> Result<(), Status>;

    async fn get(&self, namespace: Option<&str>, name: &str) -> Result<K, Status>;

    async fn list(&self, namespace: Option<&str>, query: &ListQuery) -> Result<Vec<K>, Status>;

    /// Opens a subscription. Objects that already exist are announced first as `Added`,
    /// followed by a single `Synced`.
    async fn watch(&self, namespace: Option<&str>, query: &ListQuery) -> Result<EventStream<K>, Status>;
}

/// Produces untyped stores for types discovered at runtime
pub trait DynamicStoreFactory: Send + Sync {
    fn store_for(&self, descriptor: &TypeDescriptor) -> Arc<dyn ObjectStore<DynamicObject>>;
}
