use crate::services::backends::memory::memory_object_store::MemoryObjectStore;
use crate::services::base::object_store::{DynamicStoreFactory, ObjectStore};
use crate::services::discovery::type_descriptor::TypeDescriptor;
use kube::api::DynamicObject;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// A set of untyped in-memory stores, one per resource type.
#[derive(Default)]
pub struct MemoryCluster {
    stores: Mutex<HashMap<(String, String), Arc<MemoryObjectStore<DynamicObject>>>>,
}

impl MemoryCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the store for `descriptor`, creating it on first use.
    pub fn store(&self, descriptor: &TypeDescriptor) -> Arc<MemoryObjectStore<DynamicObject>> {
        let mut stores = self.stores.lock().unwrap_or_else(PoisonError::into_inner);
        stores
            .entry((descriptor.group.clone(), descriptor.plural.clone()))
            .or_insert_with(|| Arc::new(MemoryObjectStore::for_descriptor(descriptor)))
            .clone()
    }
}

impl DynamicStoreFactory for MemoryCluster {
    fn store_for(&self, descriptor: &TypeDescriptor) -> Arc<dyn ObjectStore<DynamicObject>> {
        self.store(descriptor)
    }
}
