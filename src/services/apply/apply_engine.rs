#[cfg(test)]
mod tests;

use crate::services::apply::apply_report::{ApplyAction, ApplyReport, DocumentTarget};
use crate::services::base::object_store::DynamicStoreFactory;
use crate::services::base::status::Status;
use crate::services::client::client_config::ClientConfig;
use crate::services::client::object_client::ObjectClient;
use crate::services::client::object_source::ObjectSource;
use crate::services::discovery::type_descriptor::TypeDescriptor;
use crate::services::discovery::type_resolver::TypeResolver;
use crate::services::manifest::manifest_decoder::ManifestDecoder;
use crate::services::manifest::raw_object::RawObject;
use anyhow::anyhow;
use kube::api::DynamicObject;
use log::{info, warn};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Applies manifests of arbitrary kinds with create-or-update semantics.
pub struct ApplyEngine {
    resolver: TypeResolver,
    stores: Arc<dyn DynamicStoreFactory>,
    config: ClientConfig,
}

impl ApplyEngine {
    pub fn new(resolver: TypeResolver, stores: Arc<dyn DynamicStoreFactory>, config: ClientConfig) -> Self {
        ApplyEngine {
            resolver,
            stores,
            config,
        }
    }

    pub fn resolver(&self) -> &TypeResolver {
        &self.resolver
    }

    /// Applies every document of `manifest`.
    ///
    /// Decoding and catalog failures abort the run before anything is written.
    /// Failures of single documents are recorded in the report and the
    /// remaining documents are still attempted.
    pub async fn apply(&self, manifest: &[u8]) -> Result<ApplyReport, Status> {
        let documents = decode_documents(manifest)?;
        self.resolver.catalog().await?;

        let mut report = ApplyReport::default();
        for (target, raw, object) in documents {
            let result = self.apply_object(&raw, object).await;
            match &result {
                Ok(action) => info!("{} {:?}", target, action),
                Err(status) => warn!("Failed to apply {}: {}", target, status),
            }
            report.record(target, result);
        }
        Ok(report)
    }

    pub async fn apply_file(&self, path: &Path) -> Result<ApplyReport, Status> {
        let manifest = read_manifest(path).await?;
        self.apply(&manifest).await
    }

    /// Deletes every object declared in `manifest`, last document first.
    /// Objects that are already gone count as deleted.
    pub async fn delete(&self, manifest: &[u8], force: bool) -> Result<ApplyReport, Status> {
        let documents = decode_documents(manifest)?;
        self.resolver.catalog().await?;

        let mut report = ApplyReport::default();
        for (target, raw, _) in documents.into_iter().rev() {
            let result = self.delete_object(&raw, force).await;
            if let Err(status) = &result {
                warn!("Failed to delete {}: {}", target, status);
            }
            report.record(target, result);
        }
        Ok(report)
    }

    pub async fn delete_file(&self, path: &Path, force: bool) -> Result<ApplyReport, Status> {
        let manifest = read_manifest(path).await?;
        self.delete(&manifest, force).await
    }

    async fn apply_object(&self, raw: &RawObject, mut object: DynamicObject) -> Result<ApplyAction, Status> {
        let (client, descriptor) = self.client_for(raw).await?;
        if !descriptor.is_namespaced() {
            object.metadata.namespace = None;
        }
        let (_, action) = client.upsert(ObjectSource::Object(object)).await?;
        Ok(action)
    }

    async fn delete_object(&self, raw: &RawObject, force: bool) -> Result<ApplyAction, Status> {
        let (client, _) = self.client_for(raw).await?;
        let name = raw
            .name()
            .ok_or_else(|| Status::InvalidObject(format!("{} has no metadata.name", raw.gvk().kind)))?;
        match client.delete(name, force).await {
            Ok(()) => Ok(ApplyAction::Deleted),
            Err(status) if status.is_not_found() => Ok(ApplyAction::Deleted),
            Err(status) => Err(status),
        }
    }

    async fn client_for(&self, raw: &RawObject) -> Result<(ObjectClient<DynamicObject>, TypeDescriptor), Status> {
        let descriptor = self.resolver.resolve(&raw.group_kind(), &raw.gvk().version).await?;
        let client = ObjectClient::new(self.stores.store_for(&descriptor), self.config.clone());
        let client = match raw.namespace() {
            Some(namespace) if descriptor.is_namespaced() => client.with_namespace(namespace),
            _ => client,
        };
        Ok((client, descriptor))
    }
}

/// Decodes the whole manifest into objects before anything is sent to the server.
fn decode_documents(manifest: &[u8]) -> Result<Vec<(DocumentTarget, RawObject, DynamicObject)>, Status> {
    ManifestDecoder::from_bytes(manifest)?
        .decode_all()?
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let target = DocumentTarget::of(&raw, index + 1);
            let object = DynamicObject::deserialize(raw.body())
                .map_err(|e| Status::Decode(anyhow!("document {}: {}", target.document, e)))?;
            Ok((target, raw, object))
        })
        .collect()
}

async fn read_manifest(path: &Path) -> Result<Vec<u8>, Status> {
    tokio::fs::read(path).await.map_err(|source| Status::Read {
        path: path.to_path_buf(),
        source,
    })
}
