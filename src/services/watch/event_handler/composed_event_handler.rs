
use crate::services::watch::event_handler::ObjectEventHandler;
use crate::services::watch::watch_state::WatchState;
use async_trait::async_trait;

/// Fans every notification out to the registered handlers in order.
pub struct ComposedEventHandler<K> {
    handlers: Vec<Box<dyn ObjectEventHandler<K>>>,
}

impl<K> Default for ComposedEventHandler<K> {
    fn default() -> Self {
        Self { handlers: Vec::new() }
    }
}

impl<K> ComposedEventHandler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_handler(mut self, handler: Box<dyn ObjectEventHandler<K>>) -> Self {
        self.handlers.push(handler);
        self
    }
}

#[async_trait]
impl<K> ObjectEventHandler<K> for ComposedEventHandler<K>
where
    K: Send + Sync + 'static,
{
    async fn on_add(&self, object: &K, state: &WatchState<K>) {
        for handler in &self.handlers {
            handler.on_add(object, state).await;
        }
    }

    async fn on_modify(&self, object: &K, state: &WatchState<K>) {
        for handler in &self.handlers {
            handler.on_modify(object, state).await;
        }
    }

    async fn on_delete(&self, object: &K, state: &WatchState<K>) {
        for handler in &self.handlers {
            handler.on_delete(object, state).await;
        }
    }
}
