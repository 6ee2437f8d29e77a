#[cfg(test)]
mod tests;

use crate::services::base::status::Status;
use crate::services::discovery::catalog_source::CatalogSource;
use crate::services::discovery::discovery_catalog::DiscoveryCatalog;
use crate::services::discovery::type_descriptor::{GroupKind, TypeDescriptor};
use kube::api::GroupVersionKind;
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Resolves declared types to REST descriptors.
/// The catalog is fetched on first use and kept until `refresh` is called.
pub struct TypeResolver {
    source: Arc<dyn CatalogSource>,
    catalog: RwLock<Option<Arc<DiscoveryCatalog>>>,
}

impl TypeResolver {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        TypeResolver {
            source,
            catalog: RwLock::new(None),
        }
    }

    pub async fn catalog(&self) -> Result<Arc<DiscoveryCatalog>, Status> {
        {
            let read_guard = self.catalog.read().await;
            if let Some(catalog) = read_guard.as_ref() {
                return Ok(catalog.clone());
            }
        }
        let mut write_guard = self.catalog.write().await;
        // Another caller may have fetched it while we waited for the lock
        if let Some(catalog) = write_guard.as_ref() {
            return Ok(catalog.clone());
        }
        let catalog = self.fetch().await?;
        *write_guard = Some(catalog.clone());
        Ok(catalog)
    }

    /// Drops the cached catalog and fetches a new one.
    pub async fn refresh(&self) -> Result<Arc<DiscoveryCatalog>, Status> {
        let mut write_guard = self.catalog.write().await;
        let catalog = self.fetch().await?;
        *write_guard = Some(catalog.clone());
        Ok(catalog)
    }

    pub async fn resolve(&self, group_kind: &GroupKind, version: &str) -> Result<TypeDescriptor, Status> {
        let catalog = self.catalog().await?;
        catalog.resolve(group_kind, version).cloned().ok_or_else(|| {
            debug!(
                "No descriptor for kind {:?} in group {:?}, version {:?}",
                group_kind.kind, group_kind.group, version
            );
            Status::UnknownType(GroupVersionKind::gvk(&group_kind.group, version, &group_kind.kind))
        })
    }

    async fn fetch(&self) -> Result<Arc<DiscoveryCatalog>, Status> {
        let catalog = DiscoveryCatalog::new(self.source.fetch().await?);
        info!("Fetched discovery catalog with {} types", catalog.len());
        Ok(Arc::new(catalog))
    }
}
