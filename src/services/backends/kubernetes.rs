#[cfg(test)]
mod tests;

pub mod kube_catalog_source;
pub mod kube_object_store;
pub mod kube_store_factory;
pub mod kubeconfig_loader;
pub mod kubernetes_backend;
