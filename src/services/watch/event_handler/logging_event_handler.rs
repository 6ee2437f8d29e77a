use crate::services::watch::event_handler::ObjectEventHandler;
use crate::services::watch::watch_state::WatchState;
use async_trait::async_trait;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::Resource;
use log::{debug, info};

pub struct LoggingEventHandler;

#[async_trait]
impl<K> ObjectEventHandler<K> for LoggingEventHandler
where
    K: Resource + Send + Sync + 'static,
{
    async fn on_add(&self, object: &K, _state: &WatchState<K>) {
        let metadata: &ObjectMeta = object.meta();
        info!(
            "Object added: {:?} in namespace {:?}",
            metadata.name, metadata.namespace
        );
    }

    async fn on_modify(&self, object: &K, _state: &WatchState<K>) {
        let metadata: &ObjectMeta = object.meta();
        debug!(
            "Object modified: {:?} in namespace {:?}, resource version {:?}",
            metadata.name, metadata.namespace, metadata.resource_version
        );
    }

    async fn on_delete(&self, object: &K, _state: &WatchState<K>) {
        let metadata: &ObjectMeta = object.meta();
        info!(
            "Object deleted: {:?} in namespace {:?}",
            metadata.name, metadata.namespace
        );
    }
}
