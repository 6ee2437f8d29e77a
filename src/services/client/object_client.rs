
use crate::services::apply::apply_report::ApplyAction;
use crate::services::base::object_store::{DeleteOptions, EventStream, ListQuery, ObjectStore};
use crate::services::base::status::Status;
use crate::services::base::types::ResourceScope;
use crate::services::client::client_config::ClientConfig;
use crate::services::client::object_source::ObjectSource;
use crate::services::watch::event_handler::ObjectEventHandler;
use crate::services::watch::event_handler::callback_event_handler::CallbackEventHandler;
use crate::services::watch::watch_loop::{WatchHandle, WatchLoop};
use crate::services::watch::watch_state::WatchState;
use kube::Resource;
use log::debug;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// Handle bound to one resource type and one namespace.
pub struct ObjectClient<K> {
    store: Arc<dyn ObjectStore<K>>,
    config: ClientConfig,
}

impl<K> Clone for ObjectClient<K> {
    fn clone(&self) -> Self {
        ObjectClient {
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

impl<K> ObjectClient<K>
where
    K: Resource + Clone + Debug + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(store: Arc<dyn ObjectStore<K>>, config: ClientConfig) -> Self {
        ObjectClient { store, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn kind(&self) -> &str {
        self.store.kind()
    }

    /// Target namespace, or `None` for cluster-scoped types
    pub fn namespace(&self) -> Option<&str> {
        match self.store.scope() {
            ResourceScope::Namespaced => Some(self.config.namespace()),
            ResourceScope::Cluster => None,
        }
    }

    pub fn with_namespace(&self, namespace: &str) -> Self {
        self.derive(self.config.with_namespace(namespace))
    }

    pub fn with_dry_run(&self) -> Self {
        self.derive(self.config.with_dry_run())
    }

    pub fn with_limit(&self, limit: u32) -> Self {
        self.derive(self.config.with_limit(limit))
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.derive(self.config.with_timeout(timeout))
    }

    pub async fn create(&self, source: impl Into<ObjectSource<K>>) -> Result<K, Status> {
        let object = self.prepare(source.into()).await?;
        debug!("Creating {} {:?}", self.kind(), object.meta().name);
        self.store
            .create(self.namespace(), &object, &self.config.write_options())
            .await
    }

    pub async fn update(&self, source: impl Into<ObjectSource<K>>) -> Result<K, Status> {
        let object = self.prepare(source.into()).await?;
        let name = self.object_name(&object)?;
        debug!("Replacing {} {}", self.kind(), name);
        self.store
            .replace(self.namespace(), &name, &object, &self.config.write_options())
            .await
    }

    pub async fn apply(&self, source: impl Into<ObjectSource<K>>) -> Result<K, Status> {
        self.upsert(source).await.map(|(object, _)| object)
    }

    /// Create, falling back to a full update when the object already exists.
    pub async fn upsert(&self, source: impl Into<ObjectSource<K>>) -> Result<(K, ApplyAction), Status> {
        let object = self.prepare(source.into()).await?;
        let options = self.config.write_options();

        match self.store.create(self.namespace(), &object, &options).await {
            Ok(created) => Ok((created, ApplyAction::Created)),
            Err(status) if status.is_already_exists() => {
                let name = self.object_name(&object)?;
                debug!("{} {} already exists, updating", self.kind(), name);
                let object = self.with_current_version(&name, object).await?;
                let updated = self.store.replace(self.namespace(), &name, &object, &options).await?;
                Ok((updated, ApplyAction::Updated))
            }
            Err(status) => Err(status),
        }
    }

    pub async fn delete(&self, name: &str, force: bool) -> Result<(), Status> {
        let options = DeleteOptions {
            dry_run: self.config.dry_run(),
            force,
        };
        debug!("Deleting {} {} (force: {})", self.kind(), name, force);
        self.store.delete(self.namespace(), name, &options).await
    }

    pub async fn get(&self, name: &str) -> Result<K, Status> {
        self.store.get(self.namespace(), name).await
    }

    pub async fn exists(&self, name: &str) -> Result<bool, Status> {
        match self.get(name).await {
            Ok(_) => Ok(true),
            Err(status) if status.is_not_found() => Ok(false),
            Err(status) => Err(status),
        }
    }

    /// Lists at most `limit` objects; continuation is left to the caller.
    pub async fn list(&self, label_selector: Option<&str>) -> Result<Vec<K>, Status> {
        let query = self.config.list_query(label_selector);
        self.store.list(self.namespace(), &query).await
    }

    pub fn watch<H>(&self, name: &str, handler: Arc<H>) -> WatchHandle
    where
        H: ObjectEventHandler<K> + ?Sized + 'static,
    {
        WatchLoop::new(self.clone(), name, handler).start()
    }

    pub fn watch_with<A, M, D>(&self, name: &str, on_add: A, on_modify: M, on_delete: D) -> WatchHandle
    where
        A: Fn(&K, &WatchState<K>) + Send + Sync + 'static,
        M: Fn(&K, &WatchState<K>) + Send + Sync + 'static,
        D: Fn(&K, &WatchState<K>) + Send + Sync + 'static,
    {
        let handler = CallbackEventHandler::new()
            .when_added(on_add)
            .when_modified(on_modify)
            .when_deleted(on_delete);
        self.watch(name, Arc::new(handler))
    }

    pub(crate) async fn list_named(&self, name: &str) -> Result<Vec<K>, Status> {
        let query = ListQuery {
            limit: Some(self.config.limit()),
            timeout: Some(self.config.timeout()),
            ..ListQuery::for_name(name)
        };
        self.store.list(self.namespace(), &query).await
    }

    pub(crate) async fn watch_named(&self, name: &str) -> Result<EventStream<K>, Status> {
        let query = ListQuery {
            timeout: Some(self.config.timeout()),
            ..ListQuery::for_name(name)
        };
        self.store.watch(self.namespace(), &query).await
    }

    fn derive(&self, config: ClientConfig) -> Self {
        ObjectClient {
            store: self.store.clone(),
            config,
        }
    }

    async fn prepare(&self, source: ObjectSource<K>) -> Result<K, Status> {
        let mut object = source.load().await?;
        if let Some(namespace) = self.namespace() {
            let meta = object.meta_mut();
            match meta.namespace.as_deref() {
                None => meta.namespace = Some(namespace.to_string()),
                Some(declared) if declared != namespace => {
                    return Err(Status::InvalidObject(format!(
                        "{} {:?} declares namespace '{}' but the client targets '{}'",
                        self.kind(),
                        meta.name,
                        declared,
                        namespace
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(object)
    }

    async fn with_current_version(&self, name: &str, mut object: K) -> Result<K, Status> {
        if object.meta().resource_version.is_none() {
            let current = self.get(name).await?;
            object.meta_mut().resource_version = current.meta().resource_version.clone();
        }
        Ok(object)
    }

    fn object_name(&self, object: &K) -> Result<String, Status> {
        object
            .meta()
            .name
            .clone()
            .ok_or_else(|| Status::InvalidObject(format!("{} has no metadata.name", self.kind())))
    }
}
