
use crate::services::base::object_store::{EventStream, ObjectEvent};
use crate::services::base::status::Status;
use crate::services::client::object_client::ObjectClient;
use crate::services::watch::event_handler::ObjectEventHandler;
use crate::services::watch::watch_state::WatchState;
use futures::StreamExt;
use kube::Resource;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

enum WatchPhase<K> {
    Disconnected,
    Listing,
    Watching(EventStream<K>),
}

/// Keeps a subscription to one named object alive across stream closures
/// and turns raw events into existence-aware notifications.
pub struct WatchLoop<K, H>
where
    H: ?Sized,
{
    client: ObjectClient<K>,
    name: String,
    handler: Arc<H>,
    state: WatchState<K>,
    /// Whether the object appeared in the snapshot still being delivered
    snapshot: Option<bool>,
}

impl<K, H> WatchLoop<K, H>
where
    K: Resource + Clone + Debug + DeserializeOwned + Send + Sync + 'static,
    H: ObjectEventHandler<K> + ?Sized + 'static,
{
    pub fn new(client: ObjectClient<K>, name: &str, handler: Arc<H>) -> Self {
        WatchLoop {
            client,
            name: name.to_string(),
            handler,
            state: WatchState::default(),
            snapshot: None,
        }
    }

    /// Runs the loop on a separate task.
    pub fn start(self) -> WatchHandle {
        let (stop_sender, stop_receiver) = watch::channel(false);
        let task = tokio::spawn(self.run(stop_receiver));
        WatchHandle {
            stop: stop_sender,
            task,
        }
    }

    /// Runs until `stop` is signalled or dropped. Returns an error only when
    /// listing or subscribing fails.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) -> Result<(), Status> {
        info!("Starting watch for {} {}", self.client.kind(), self.name);
        let mut phase = WatchPhase::Disconnected;
        let mut connected_before = false;

        loop {
            if is_cancelled(&stop) {
                info!("Watch for {} {} stopped", self.client.kind(), self.name);
                return Ok(());
            }

            phase = match phase {
                WatchPhase::Disconnected => WatchPhase::Listing,
                WatchPhase::Listing => {
                    let stream = self.connect(connected_before).await?;
                    connected_before = true;
                    WatchPhase::Watching(stream)
                }
                WatchPhase::Watching(mut stream) => {
                    let received = tokio::select! {
                        _ = stop.changed() => None,
                        item = stream.next() => Some(item),
                    };
                    match received {
                        None => WatchPhase::Watching(stream),
                        Some(Some(Ok(event))) => {
                            self.dispatch(event).await;
                            WatchPhase::Watching(stream)
                        }
                        Some(Some(Err(status))) => {
                            warn!(
                                "Watch stream for {} {} failed, reconnecting: {}",
                                self.client.kind(),
                                self.name,
                                status
                            );
                            WatchPhase::Disconnected
                        }
                        Some(None) => {
                            info!("Watch stream for {} {} closed, reconnecting", self.client.kind(), self.name);
                            WatchPhase::Disconnected
                        }
                    }
                }
            };
        }
    }

    async fn connect(&mut self, reconnecting: bool) -> Result<EventStream<K>, Status> {
        let current = self.client.list_named(&self.name).await?.into_iter().next();
        if reconnecting {
            self.reconcile_gap(current).await;
        } else {
            match current {
                Some(object) => self.state.observe(&object),
                None => self.state.mark_absent(),
            }
        }
        debug!(
            "Subscribing to {} {} (present: {})",
            self.client.kind(),
            self.name,
            self.state.is_present()
        );
        let stream = self.client.watch_named(&self.name).await?;
        self.snapshot = Some(false);
        Ok(stream)
    }

    /// Reports an existence change that happened while the stream was down.
    async fn reconcile_gap(&mut self, current: Option<K>) {
        match (self.state.is_present(), current) {
            (false, Some(object)) => {
                self.handler.on_add(&object, &self.state).await;
                self.state.observe(&object);
            }
            (true, Some(object)) => self.state.observe(&object),
            (true, None) => self.report_gone().await,
            (false, None) => {}
        }
    }

    async fn report_gone(&mut self) {
        match self.state.last_seen().cloned() {
            Some(last_seen) => {
                self.handler.on_delete(&last_seen, &self.state).await;
                self.state.forget(&last_seen);
            }
            None => self.state.mark_absent(),
        }
    }

    async fn dispatch(&mut self, event: ObjectEvent<K>) {
        match event {
            ObjectEvent::Added(object) => {
                if let Some(seen) = self.snapshot.as_mut() {
                    *seen = true;
                }
                if !self.state.is_present() {
                    self.handler.on_add(&object, &self.state).await;
                }
                self.state.observe(&object);
            }
            ObjectEvent::Modified(object) => {
                self.handler.on_modify(&object, &self.state).await;
                self.state.observe(&object);
            }
            ObjectEvent::Deleted(object) => {
                self.handler.on_delete(&object, &self.state).await;
                self.state.forget(&object);
            }
            ObjectEvent::Synced => {
                // Removed between the list and the subscription
                if self.snapshot.take() == Some(false) && self.state.is_present() {
                    self.report_gone().await;
                }
            }
            ObjectEvent::Bookmark => {}
            ObjectEvent::Error(message) => {
                warn!(
                    "Watch for {} {} received an error event: {}",
                    self.client.kind(),
                    self.name,
                    message
                );
            }
        }
    }
}

fn is_cancelled(stop: &watch::Receiver<bool>) -> bool {
    stop.has_changed().is_err() || *stop.borrow()
}

/// Owner side of a running watch loop. Dropping it stops the loop.
pub struct WatchHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<Result<(), Status>>,
}

impl WatchHandle {
    /// Signals the loop to stop at its next step.
    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the loop to end and returns its outcome.
    pub async fn join(self) -> Result<(), Status> {
        let WatchHandle { stop, task } = self;
        let result = task.await;
        drop(stop);
        match result {
            Ok(outcome) => outcome,
            Err(error) if error.is_panic() => std::panic::resume_unwind(error.into_panic()),
            Err(_) => Ok(()),
        }
    }

    pub async fn stop_and_wait(self) -> Result<(), Status> {
        self.stop();
        self.join().await
    }
}
