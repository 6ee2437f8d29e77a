use crate::services::watch::event_handler::ObjectEventHandler;
use crate::services::watch::watch_state::WatchState;
use crate::testing::api_extensions::wait_until;
use async_trait::async_trait;
use kube::Resource;
use std::sync::Mutex;
use std::time::Duration;

/// One handler invocation: object name and whether it was present beforehand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Added(String, bool),
    Modified(String, bool),
    Deleted(String, bool),
}

#[derive(Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<Recorded>>,
}

impl RecordingHandler {
    pub fn events(&self) -> Vec<Recorded> {
        self.events.lock().expect("Recording lock poisoned").clone()
    }

    pub async fn wait_for_events(&self, count: usize, timeout: Duration) -> Vec<Recorded> {
        wait_until(timeout, move || async move { self.events().len() >= count }).await;
        self.events()
    }

    fn record(&self, event: Recorded) {
        self.events.lock().expect("Recording lock poisoned").push(event);
    }
}

fn name_of<K: Resource>(object: &K) -> String {
    object.meta().name.clone().unwrap_or_default()
}

#[async_trait]
impl<K> ObjectEventHandler<K> for RecordingHandler
where
    K: Resource + Clone + Send + Sync + 'static,
{
    async fn on_add(&self, object: &K, state: &WatchState<K>) {
        self.record(Recorded::Added(name_of(object), state.is_present()));
    }

    async fn on_modify(&self, object: &K, state: &WatchState<K>) {
        self.record(Recorded::Modified(name_of(object), state.is_present()));
    }

    async fn on_delete(&self, object: &K, state: &WatchState<K>) {
        self.record(Recorded::Deleted(name_of(object), state.is_present()));
    }
}
