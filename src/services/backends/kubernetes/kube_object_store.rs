#[cfg(test)]
mod tests;

use crate::services::base::object_store::{
    DeleteOptions, EventStream, ListQuery, ObjectEvent, ObjectStore, WriteOptions,
};
use crate::services::base::status::object_details::ObjectDetails;
use crate::services::base::status::{Operation, Status};
use crate::services::base::types::ResourceScope;
use crate::services::discovery::type_descriptor::TypeDescriptor;
use async_trait::async_trait;
use futures::{StreamExt, stream};
use k8s_openapi::{ClusterResourceScope, NamespaceResourceScope};
use kube::api::{
    DeleteParams, DynamicObject, ListParams, PostParams, PropagationPolicy, WatchEvent, WatchParams,
};
use kube::{Api, Client, Resource};
use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::sync::Arc;

const FIELD_MANAGER: &str = "applier-core";

/// Server-side watch timeouts must stay below 295 seconds.
const MAX_WATCH_TIMEOUT_SECONDS: u64 = 290;

type ApiFactory<K> = Arc<dyn Fn(Option<&str>) -> Api<K> + Send + Sync>;

/// Object store talking to the API server through `kube::Api`.
pub struct KubeObjectStore<K> {
    kind: String,
    scope: ResourceScope,
    api: ApiFactory<K>,
}

impl<K> KubeObjectStore<K>
where
    K: Resource<Scope = NamespaceResourceScope> + 'static,
    K::DynamicType: Default,
{
    /// Store for a compiled-in namespaced type. Without a namespace it spans all namespaces.
    pub fn namespaced(client: Client) -> Self {
        KubeObjectStore {
            kind: K::kind(&K::DynamicType::default()).to_string(),
            scope: ResourceScope::Namespaced,
            api: Arc::new(move |namespace: Option<&str>| match namespace {
                Some(namespace) => Api::namespaced(client.clone(), namespace),
                None => Api::all(client.clone()),
            }),
        }
    }
}

impl<K> KubeObjectStore<K>
where
    K: Resource<Scope = ClusterResourceScope> + 'static,
    K::DynamicType: Default,
{
    pub fn cluster(client: Client) -> Self {
        KubeObjectStore {
            kind: K::kind(&K::DynamicType::default()).to_string(),
            scope: ResourceScope::Cluster,
            api: Arc::new(move |_: Option<&str>| Api::all(client.clone())),
        }
    }
}

impl KubeObjectStore<DynamicObject> {
    /// Store for a type known only from discovery.
    pub fn dynamic(client: Client, descriptor: &TypeDescriptor) -> Self {
        let resource = descriptor.api_resource();
        let scope = descriptor.scope;
        KubeObjectStore {
            kind: descriptor.kind.clone(),
            scope,
            api: Arc::new(move |namespace: Option<&str>| match (scope, namespace) {
                (ResourceScope::Namespaced, Some(namespace)) => {
                    Api::namespaced_with(client.clone(), namespace, &resource)
                }
                _ => Api::all_with(client.clone(), &resource),
            }),
        }
    }
}

impl<K> KubeObjectStore<K> {
    fn details(&self, namespace: Option<&str>, name: &str) -> ObjectDetails {
        ObjectDetails::new(&self.kind, name, namespace)
    }
}

pub(crate) fn post_params(options: &WriteOptions) -> PostParams {
    let mut params = PostParams::default();
    params.dry_run = options.dry_run;
    params.field_manager = Some(FIELD_MANAGER.to_string());
    params
}

pub(crate) fn delete_params(options: &DeleteOptions) -> DeleteParams {
    let mut params = DeleteParams::default();
    params.dry_run = options.dry_run;
    if options.force {
        params.grace_period_seconds = Some(0);
        params.propagation_policy = Some(PropagationPolicy::Background);
    }
    params
}

pub(crate) fn list_params(query: &ListQuery) -> ListParams {
    let mut params = ListParams::default();
    if let Some(labels) = &query.label_selector {
        params = params.labels(labels);
    }
    if let Some(fields) = &query.field_selector {
        params = params.fields(fields);
    }
    if let Some(limit) = query.limit {
        params = params.limit(limit);
    }
    if let Some(timeout) = query.timeout {
        params = params.timeout(timeout.as_secs().min(u32::MAX as u64) as u32);
    }
    params
}

pub(crate) fn watch_params(query: &ListQuery) -> WatchParams {
    let mut params = WatchParams::default();
    if let Some(labels) = &query.label_selector {
        params = params.labels(labels);
    }
    if let Some(fields) = &query.field_selector {
        params = params.fields(fields);
    }
    if let Some(timeout) = query.timeout {
        params = params.timeout(timeout.as_secs().clamp(1, MAX_WATCH_TIMEOUT_SECONDS) as u32);
    }
    params
}

fn to_object_event<K>(event: WatchEvent<K>) -> ObjectEvent<K> {
    match event {
        WatchEvent::Added(object) => ObjectEvent::Added(object),
        WatchEvent::Modified(object) => ObjectEvent::Modified(object),
        WatchEvent::Deleted(object) => ObjectEvent::Deleted(object),
        WatchEvent::Bookmark(_) => ObjectEvent::Bookmark,
        WatchEvent::Error(response) => ObjectEvent::Error(format!("{} ({})", response.message, response.code)),
    }
}

#[async_trait]
impl<K> ObjectStore<K> for KubeObjectStore<K>
where
    K: Resource + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn kind(&self) -> &str {
        &self.kind
    }

    fn scope(&self) -> ResourceScope {
        self.scope
    }

    async fn create(&self, namespace: Option<&str>, object: &K, options: &WriteOptions) -> Result<K, Status> {
        let name = object.meta().name.clone().unwrap_or_default();
        (self.api)(namespace)
            .create(&post_params(options), object)
            .await
            .map_err(|e| Status::from_kube(Operation::Create, self.details(namespace, &name), e))
    }

    async fn replace(
        &self,
        namespace: Option<&str>,
        name: &str,
        object: &K,
        options: &WriteOptions,
    ) -> Result<K, Status> {
        (self.api)(namespace)
            .replace(name, &post_params(options), object)
            .await
            .map_err(|e| Status::from_kube(Operation::Update, self.details(namespace, name), e))
    }

    async fn delete(&self, namespace: Option<&str>, name: &str, options: &DeleteOptions) -> Result<(), Status> {
        (self.api)(namespace)
            .delete(name, &delete_params(options))
            .await
            .map(|_| ())
            .map_err(|e| Status::from_kube(Operation::Delete, self.details(namespace, name), e))
    }

    async fn get(&self, namespace: Option<&str>, name: &str) -> Result<K, Status> {
        (self.api)(namespace)
            .get(name)
            .await
            .map_err(|e| Status::from_kube(Operation::Get, self.details(namespace, name), e))
    }

    async fn list(&self, namespace: Option<&str>, query: &ListQuery) -> Result<Vec<K>, Status> {
        let objects = (self.api)(namespace)
            .list(&list_params(query))
            .await
            .map_err(|e| Status::from_kube(Operation::List, self.details(namespace, "*"), e))?;
        Ok(objects.items)
    }

    async fn watch(&self, namespace: Option<&str>, query: &ListQuery) -> Result<EventStream<K>, Status> {
        let api = (self.api)(namespace);
        let snapshot = api
            .list(&list_params(&ListQuery {
                limit: None,
                ..query.clone()
            }))
            .await
            .map_err(|e| Status::from_kube(Operation::List, self.details(namespace, "*"), e))?;
        let version = snapshot.metadata.resource_version.clone().unwrap_or_default();
        debug!("Watching {} from resource version {}", self.kind, version);

        let details = self.details(namespace, "*");
        let events = api
            .watch(&watch_params(query), &version)
            .await
            .map_err(|e| Status::from_kube(Operation::Watch, details.clone(), e))?
            .map(move |item| {
                item.map(to_object_event)
                    .map_err(|e| Status::from_kube(Operation::Watch, details.clone(), e))
            });

        let existing = stream::iter(
            snapshot
                .items
                .into_iter()
                .map(|object| Ok(ObjectEvent::Added(object)))
                .chain(std::iter::once(Ok(ObjectEvent::Synced))),
        );
        Ok(existing.chain(events).boxed())
    }
}
