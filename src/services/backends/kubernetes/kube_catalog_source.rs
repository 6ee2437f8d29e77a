use crate::services::base::status::object_details::ObjectDetails;
use crate::services::base::status::{Operation, Status};
use crate::services::discovery::catalog_source::CatalogSource;
use crate::services::discovery::type_descriptor::TypeDescriptor;
use async_trait::async_trait;
use kube::Client;
use kube::discovery::Discovery;
use log::debug;

/// Reads the type catalog from the server's discovery endpoints.
pub struct KubeCatalogSource {
    client: Client,
}

impl KubeCatalogSource {
    pub fn new(client: Client) -> Self {
        KubeCatalogSource { client }
    }
}

#[async_trait]
impl CatalogSource for KubeCatalogSource {
    async fn fetch(&self) -> Result<Vec<TypeDescriptor>, Status> {
        let discovery = Discovery::new(self.client.clone()).run().await.map_err(|e| {
            Status::from_kube(Operation::Discovery, ObjectDetails::new("APIResourceList", "", None), e)
        })?;

        let mut entries = Vec::new();
        for group in discovery.groups() {
            for version in group.versions() {
                for (resource, capabilities) in group.versioned_resources(version) {
                    entries.push(TypeDescriptor::from_api_resource(&resource, (&capabilities.scope).into()));
                }
            }
        }
        debug!("Discovered {} resource types", entries.len());
        Ok(entries)
    }
}
