pub mod callback_event_handler;
pub mod composed_event_handler;
pub mod logging_event_handler;

use crate::services::watch::watch_state::WatchState;
use async_trait::async_trait;

#[async_trait]
/// Receives the deduplicated notifications of a watch loop.
/// `state` is the state before the event is applied.
pub trait ObjectEventHandler<K>: Send + Sync
where
    K: Send + Sync + 'static,
{
    async fn on_add(&self, _object: &K, _state: &WatchState<K>) {}

    async fn on_modify(&self, _object: &K, _state: &WatchState<K>) {}

    async fn on_delete(&self, _object: &K, _state: &WatchState<K>) {}
}
