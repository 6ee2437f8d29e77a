use crate::services::backends::kubernetes::kube_object_store::KubeObjectStore;
use crate::services::base::object_store::{DynamicStoreFactory, ObjectStore};
use crate::services::discovery::type_descriptor::TypeDescriptor;
use kube::Client;
use kube::api::DynamicObject;
use std::sync::Arc;

pub struct KubeStoreFactory {
    client: Client,
}

impl KubeStoreFactory {
    pub fn new(client: Client) -> Self {
        KubeStoreFactory { client }
    }
}

impl DynamicStoreFactory for KubeStoreFactory {
    fn store_for(&self, descriptor: &TypeDescriptor) -> Arc<dyn ObjectStore<DynamicObject>> {
        Arc::new(KubeObjectStore::dynamic(self.client.clone(), descriptor))
    }
}
