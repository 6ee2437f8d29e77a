/// Existence of a watched object as seen by its watch loop.
/// Survives reconnects; dropped only when the loop stops.
#[derive(Debug, Clone)]
pub struct WatchState<K> {
    present: bool,
    last_seen: Option<K>,
}

impl<K> Default for WatchState<K> {
    fn default() -> Self {
        WatchState {
            present: false,
            last_seen: None,
        }
    }
}

impl<K> WatchState<K>
where
    K: Clone,
{
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// The most recent version observed, including the final one of a deleted object
    pub fn last_seen(&self) -> Option<&K> {
        self.last_seen.as_ref()
    }

    pub(crate) fn observe(&mut self, object: &K) {
        self.present = true;
        self.last_seen = Some(object.clone());
    }

    pub(crate) fn forget(&mut self, object: &K) {
        self.present = false;
        self.last_seen = Some(object.clone());
    }

    pub(crate) fn mark_absent(&mut self) {
        self.present = false;
    }
}
