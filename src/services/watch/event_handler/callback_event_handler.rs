use crate::services::watch::event_handler::ObjectEventHandler;
use crate::services::watch::watch_state::WatchState;
use async_trait::async_trait;

type Callback<K> = Box<dyn Fn(&K, &WatchState<K>) + Send + Sync>;

/// Adapts plain functions to an event handler. Missing callbacks are no-ops.
pub struct CallbackEventHandler<K> {
    on_add: Option<Callback<K>>,
    on_modify: Option<Callback<K>>,
    on_delete: Option<Callback<K>>,
}

impl<K> Default for CallbackEventHandler<K> {
    fn default() -> Self {
        CallbackEventHandler {
            on_add: None,
            on_modify: None,
            on_delete: None,
        }
    }
}

impl<K> CallbackEventHandler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn when_added(mut self, callback: impl Fn(&K, &WatchState<K>) + Send + Sync + 'static) -> Self {
        self.on_add = Some(Box::new(callback));
        self
    }

    pub fn when_modified(mut self, callback: impl Fn(&K, &WatchState<K>) + Send + Sync + 'static) -> Self {
        self.on_modify = Some(Box::new(callback));
        self
    }

    pub fn when_deleted(mut self, callback: impl Fn(&K, &WatchState<K>) + Send + Sync + 'static) -> Self {
        self.on_delete = Some(Box::new(callback));
        self
    }
}

#[async_trait]
impl<K> ObjectEventHandler<K> for CallbackEventHandler<K>
where
    K: Send + Sync + 'static,
{
    async fn on_add(&self, object: &K, state: &WatchState<K>) {
        if let Some(callback) = &self.on_add {
            callback(object, state);
        }
    }

    async fn on_modify(&self, object: &K, state: &WatchState<K>) {
        if let Some(callback) = &self.on_modify {
            callback(object, state);
        }
    }

    async fn on_delete(&self, object: &K, state: &WatchState<K>) {
        if let Some(callback) = &self.on_delete {
            callback(object, state);
        }
    }
}
