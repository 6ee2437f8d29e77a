use crate::services::base::status::Status;
use crate::services::discovery::type_descriptor::TypeDescriptor;
use async_trait::async_trait;

#[async_trait]
/// Provides the full list of types registered at the server
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<TypeDescriptor>, Status>;
}
