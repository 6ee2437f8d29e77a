use crate::services::backends::memory::selector::Selector;
use crate::services::base::object_store::{
    DeleteOptions, EventStream, ListQuery, ObjectEvent, ObjectStore, WriteOptions,
};
use crate::services::base::status::{Operation, Status};
use crate::services::base::status::object_details::ObjectDetails;
use crate::services::base::types::{ObjectHandle, ResourceScope};
use crate::services::client::client_config::DEFAULT_NAMESPACE;
use crate::services::discovery::type_descriptor::TypeDescriptor;
use async_trait::async_trait;
use futures::StreamExt;
use futures::channel::mpsc::{UnboundedSender, unbounded};
use kube::Resource;
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

struct Subscriber<K> {
    namespace: Option<String>,
    labels: Selector,
    fields: Selector,
    sender: UnboundedSender<Result<ObjectEvent<K>, Status>>,
}

struct StoreState<K> {
    objects: BTreeMap<ObjectHandle, K>,
    subscribers: Vec<Subscriber<K>>,
    revision: u64,
}

/// Process-local object store with the write, conflict and watch
/// semantics of the API server.
pub struct MemoryObjectStore<K> {
    kind: String,
    scope: ResourceScope,
    state: RwLock<StoreState<K>>,
}

impl<K> MemoryObjectStore<K>
where
    K: Resource + Clone + Serialize + Send + Sync + 'static,
{
    pub fn new(kind: &str, scope: ResourceScope) -> Self {
        MemoryObjectStore {
            kind: kind.to_string(),
            scope,
            state: RwLock::new(StoreState {
                objects: BTreeMap::new(),
                subscribers: Vec::new(),
                revision: 0,
            }),
        }
    }

    pub fn for_descriptor(descriptor: &TypeDescriptor) -> Self {
        Self::new(&descriptor.kind, descriptor.scope)
    }

    /// Closes every open watch stream, as a server-side disconnect would.
    pub async fn disconnect_watchers(&self) -> usize {
        let mut state = self.state.write().await;
        let closed = state.subscribers.len();
        state.subscribers.clear();
        debug!("Disconnected {} {} watchers", closed, self.kind);
        closed
    }

    pub async fn watcher_count(&self) -> usize {
        let state = self.state.read().await;
        state
            .subscribers
            .iter()
            .filter(|subscriber| !subscriber.sender.is_closed())
            .count()
    }

    /// Number of committed writes so far
    pub async fn revision(&self) -> u64 {
        self.state.read().await.revision
    }

    fn key(&self, namespace: Option<&str>, name: &str) -> ObjectHandle {
        ObjectHandle::new(self.scope, namespace, name, DEFAULT_NAMESPACE)
    }

    fn details(&self, key: &ObjectHandle) -> ObjectDetails {
        ObjectDetails::from_handle(&self.kind, key)
    }

    fn not_found(&self, operation: Operation, key: &ObjectHandle) -> Status {
        Status::NotFound {
            operation,
            object: self.details(key),
        }
    }

    fn stamp(&self, object: &K, key: &ObjectHandle) -> K {
        let mut stamped = object.clone();
        let meta = stamped.meta_mut();
        meta.name = Some(key.name.clone());
        meta.namespace = key.namespace.clone();
        stamped
    }
}

impl<K> StoreState<K>
where
    K: Resource + Clone + Send + Sync + 'static,
{
    fn next_revision(&mut self, object: &mut K) {
        self.revision += 1;
        object.meta_mut().resource_version = Some(self.revision.to_string());
    }

    fn broadcast(&mut self, event: ObjectEvent<K>, object: &K) {
        self.subscribers.retain(|subscriber| !subscriber.sender.is_closed());
        for subscriber in &self.subscribers {
            if matches(object, subscriber.namespace.as_deref(), &subscriber.labels, &subscriber.fields) {
                let _ = subscriber.sender.unbounded_send(Ok(event.clone()));
            }
        }
    }
}

fn matches<K>(object: &K, namespace: Option<&str>, labels: &Selector, fields: &Selector) -> bool
where
    K: Resource,
{
    let meta = object.meta();
    if namespace.is_some() && meta.namespace.as_deref() != namespace {
        return false;
    }
    let mut field_values = BTreeMap::new();
    if let Some(name) = &meta.name {
        field_values.insert("metadata.name".to_string(), name.clone());
    }
    if let Some(namespace) = &meta.namespace {
        field_values.insert("metadata.namespace".to_string(), namespace.clone());
    }
    labels.matches(&meta.labels.clone().unwrap_or_default()) && fields.matches(&field_values)
}

/// Object content without the server-maintained resource version
fn content<K: Serialize>(object: &K) -> Option<Value> {
    let mut value = serde_json::to_value(object).ok()?;
    if let Some(metadata) = value.get_mut("metadata").and_then(Value::as_object_mut) {
        metadata.remove("resourceVersion");
    }
    Some(value)
}

fn selectors(query: &ListQuery) -> Result<(Selector, Selector), Status> {
    let labels = Selector::parse_optional(query.label_selector.as_deref())
        .map_err(|e| Status::InvalidObject(format!("label selector: {}", e)))?;
    let fields = Selector::parse_optional(query.field_selector.as_deref())
        .map_err(|e| Status::InvalidObject(format!("field selector: {}", e)))?;
    Ok((labels, fields))
}

#[async_trait]
impl<K> ObjectStore<K> for MemoryObjectStore<K>
where
    K: Resource + Clone + Serialize + Send + Sync + 'static,
{
    fn kind(&self) -> &str {
        &self.kind
    }

    fn scope(&self) -> ResourceScope {
        self.scope
    }

    async fn create(&self, namespace: Option<&str>, object: &K, options: &WriteOptions) -> Result<K, Status> {
        let mut state = self.state.write().await;
        let meta = object.meta();
        let name = match (&meta.name, &meta.generate_name) {
            (Some(name), _) => name.clone(),
            (None, Some(prefix)) => format!("{}{}", prefix, state.revision + 1),
            (None, None) => {
                return Err(Status::InvalidObject(format!(
                    "{} has neither metadata.name nor metadata.generateName",
                    self.kind
                )));
            }
        };
        let key = self.key(namespace, &name);
        if state.objects.contains_key(&key) {
            return Err(Status::AlreadyExists {
                operation: Operation::Create,
                object: self.details(&key),
            });
        }

        let mut stored = self.stamp(object, &key);
        if options.dry_run {
            return Ok(stored);
        }
        state.next_revision(&mut stored);
        state.objects.insert(key, stored.clone());
        state.broadcast(ObjectEvent::Added(stored.clone()), &stored);
        Ok(stored)
    }

    async fn replace(
        &self,
        namespace: Option<&str>,
        name: &str,
        object: &K,
        options: &WriteOptions,
    ) -> Result<K, Status> {
        let mut state = self.state.write().await;
        let key = self.key(namespace, name);
        let existing = state
            .objects
            .get(&key)
            .cloned()
            .ok_or_else(|| self.not_found(Operation::Update, &key))?;

        let requested_version = object.meta().resource_version.as_ref();
        if requested_version.is_some() && requested_version != existing.meta().resource_version.as_ref() {
            return Err(Status::Conflict {
                operation: Operation::Update,
                object: self.details(&key),
            });
        }

        let mut stored = self.stamp(object, &key);
        stored.meta_mut().resource_version = existing.meta().resource_version.clone();
        let unchanged = matches!((content(&stored), content(&existing)), (Some(new), Some(old)) if new == old);
        if unchanged || options.dry_run {
            return Ok(stored);
        }
        state.next_revision(&mut stored);
        state.objects.insert(key, stored.clone());
        state.broadcast(ObjectEvent::Modified(stored.clone()), &stored);
        Ok(stored)
    }

    async fn delete(&self, namespace: Option<&str>, name: &str, options: &DeleteOptions) -> Result<(), Status> {
        let mut state = self.state.write().await;
        let key = self.key(namespace, name);
        if !state.objects.contains_key(&key) {
            return Err(self.not_found(Operation::Delete, &key));
        }
        if options.dry_run {
            return Ok(());
        }
        if let Some(mut removed) = state.objects.remove(&key) {
            state.next_revision(&mut removed);
            state.broadcast(ObjectEvent::Deleted(removed.clone()), &removed);
        }
        Ok(())
    }

    async fn get(&self, namespace: Option<&str>, name: &str) -> Result<K, Status> {
        let state = self.state.read().await;
        let key = self.key(namespace, name);
        state
            .objects
            .get(&key)
            .cloned()
            .ok_or_else(|| self.not_found(Operation::Get, &key))
    }

    async fn list(&self, namespace: Option<&str>, query: &ListQuery) -> Result<Vec<K>, Status> {
        let (labels, fields) = selectors(query)?;
        let state = self.state.read().await;
        let limit = query.limit.map_or(usize::MAX, |limit| limit as usize);
        Ok(state
            .objects
            .values()
            .filter(|object| matches(*object, namespace, &labels, &fields))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn watch(&self, namespace: Option<&str>, query: &ListQuery) -> Result<EventStream<K>, Status> {
        let (labels, fields) = selectors(query)?;
        let (sender, receiver) = unbounded();
        let mut state = self.state.write().await;
        for object in state.objects.values() {
            if matches(object, namespace, &labels, &fields) {
                let _ = sender.unbounded_send(Ok(ObjectEvent::Added(object.clone())));
            }
        }
        let _ = sender.unbounded_send(Ok(ObjectEvent::Synced));
        state.subscribers.push(Subscriber {
            namespace: namespace.map(str::to_string),
            labels,
            fields,
            sender,
        });
        Ok(receiver.boxed())
    }
}
