use super::*;
use crate::services::backends::memory::static_catalog_source::StaticCatalogSource;
use crate::services::base::types::ResourceScope;

fn resolver() -> (Arc<StaticCatalogSource>, TypeResolver) {
    let source = Arc::new(StaticCatalogSource::builtin());
    let resolver = TypeResolver::new(source.clone());
    (source, resolver)
}

#[tokio::test]
async fn test_resolve_core_and_grouped_kinds() {
    let (_, resolver) = resolver();

    let config_map = resolver.resolve(&GroupKind::new("", "ConfigMap"), "v1").await.unwrap();
    let deployment = resolver
        .resolve(&GroupKind::new("apps", "Deployment"), "v1")
        .await
        .unwrap();
    let namespace = resolver.resolve(&GroupKind::new("", "Namespace"), "v1").await.unwrap();

    assert_eq!(config_map.plural, "configmaps");
    assert_eq!(config_map.scope, ResourceScope::Namespaced);
    assert_eq!(deployment.plural, "deployments");
    assert_eq!(namespace.scope, ResourceScope::Cluster);
}

#[tokio::test]
async fn test_catalog_is_fetched_once_per_resolver() {
    let (source, resolver) = resolver();

    for _ in 0..5 {
        resolver.resolve(&GroupKind::new("", "ConfigMap"), "v1").await.unwrap();
    }
    let _ = resolver.resolve(&GroupKind::new("", "Missing"), "v1").await;

    assert_eq!(source.fetch_count(), 1);
}

#[tokio::test]
async fn test_refresh_fetches_again() {
    let (source, resolver) = resolver();

    resolver.catalog().await.unwrap();
    resolver.refresh().await.unwrap();
    resolver.catalog().await.unwrap();

    assert_eq!(source.fetch_count(), 2);
}

#[tokio::test]
async fn test_unknown_version_is_reported() {
    let (_, resolver) = resolver();

    let error = resolver
        .resolve(&GroupKind::new("apps", "Deployment"), "v1beta9")
        .await
        .unwrap_err();

    match error {
        Status::UnknownType(gvk) => {
            assert_eq!(gvk.group, "apps");
            assert_eq!(gvk.version, "v1beta9");
            assert_eq!(gvk.kind, "Deployment");
        }
        other => panic!("unexpected status: {:?}", other),
    }
}

#[tokio::test]
async fn test_catalog_failure_is_propagated() {
    let resolver = TypeResolver::new(Arc::new(StaticCatalogSource::failing(503)));

    let error = resolver.resolve(&GroupKind::new("", "ConfigMap"), "v1").await.unwrap_err();

    assert!(matches!(error, Status::Rejected { operation: crate::services::base::status::Operation::Discovery, .. }));
}

#[tokio::test]
async fn test_every_catalog_entry_round_trips() {
    let (_, resolver) = resolver();
    let catalog = resolver.catalog().await.unwrap();

    for entry in catalog.descriptors() {
        let resolved = resolver.resolve(&entry.group_kind(), &entry.version).await.unwrap();
        let reverse = catalog.lookup_resource(&resolved.group, &resolved.plural).unwrap();

        assert_eq!(reverse.group_kind(), entry.group_kind());
    }
}
