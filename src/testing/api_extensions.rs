use crate::services::backends::memory::memory_object_store::MemoryObjectStore;
use kube::Resource;
use serde::Serialize;
use std::future::Future;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Polls `condition` until it holds, panicking after `timeout`.
pub async fn wait_until<F, Fut>(timeout: Duration, mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start_time = Instant::now();
    while !condition().await {
        if start_time.elapsed() > timeout {
            panic!("Timed out waiting for condition");
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

#[allow(async_fn_in_trait)]
pub trait WaitForWatchers {
    async fn wait_for_watchers(&self, count: usize, timeout: Duration);
}

impl<K> WaitForWatchers for MemoryObjectStore<K>
where
    K: Resource + Clone + Serialize + Send + Sync + 'static,
{
    async fn wait_for_watchers(&self, count: usize, timeout: Duration) {
        wait_until(timeout, move || async move { self.watcher_count().await == count }).await;
    }
}
