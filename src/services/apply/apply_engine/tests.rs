use super::*;
use crate::services::backends::memory::static_catalog_source::StaticCatalogSource;
use crate::services::base::object_store::{ListQuery, ObjectStore};
use crate::testing::memory_cluster_context::MemoryClusterContext;
use std::io::Write;
use test_context::test_context;

const CONFIG_MAP: &str = r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: cm-a
data:
  key: value
"#;

const MIXED: &str = r#"
apiVersion: v1
kind: Namespace
metadata:
  name: team-a
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: settings
  namespace: team-a
data:
  mode: fast
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
spec:
  replicas: 1
"#;

fn data_value(object: &DynamicObject, key: &str) -> Option<String> {
    object.data["data"][key].as_str().map(str::to_string)
}

#[test_context(MemoryClusterContext)]
#[tokio::test]
async fn test_apply_twice_then_delete(ctx: &mut MemoryClusterContext) {
    // Arrange
    let engine = ctx.engine();
    let store = ctx.dynamic_store("", "ConfigMap").await;
    let client = ctx.dynamic_client("", "ConfigMap", "default").await;

    // Act
    let first = engine.apply(CONFIG_MAP.as_bytes()).await.unwrap();
    let revision = store.revision().await;
    let second = engine.apply(CONFIG_MAP.as_bytes()).await.unwrap();

    // Assert
    assert_eq!(first.applied(), 1);
    assert_eq!(second.applied(), 1);
    assert_eq!(first.outcomes()[0].result.as_ref().unwrap(), &ApplyAction::Created);
    assert_eq!(second.outcomes()[0].result.as_ref().unwrap(), &ApplyAction::Updated);
    assert_eq!(store.revision().await, revision);
    assert_eq!(data_value(&client.get("cm-a").await.unwrap(), "key").as_deref(), Some("value"));

    client.delete("cm-a", false).await.unwrap();
    assert!(client.get("cm-a").await.unwrap_err().is_not_found());
}

#[test_context(MemoryClusterContext)]
#[tokio::test]
async fn test_apply_changed_manifest_updates_object(ctx: &mut MemoryClusterContext) {
    let engine = ctx.engine();
    let client = ctx.dynamic_client("", "ConfigMap", "default").await;
    engine.apply(CONFIG_MAP.as_bytes()).await.unwrap();

    let changed = CONFIG_MAP.replace("key: value", "key: other");
    engine.apply(changed.as_bytes()).await.unwrap().into_result().unwrap();

    assert_eq!(data_value(&client.get("cm-a").await.unwrap(), "key").as_deref(), Some("other"));
}

#[test_context(MemoryClusterContext)]
#[tokio::test]
async fn test_apply_mixed_kinds_and_scopes(ctx: &mut MemoryClusterContext) {
    // Arrange
    let engine = ctx.engine();

    // Act
    let applied = engine.apply(MIXED.as_bytes()).await.unwrap().into_result().unwrap();

    // Assert
    let namespaces = ctx.dynamic_store("", "Namespace").await;
    let namespace = namespaces.get(None, "team-a").await.unwrap();
    let settings = ctx.dynamic_client("", "ConfigMap", "team-a").await.get("settings").await;
    let web = ctx.dynamic_client("apps", "Deployment", "default").await.get("web").await;

    assert_eq!(applied, 3);
    assert_eq!(namespace.metadata.namespace, None);
    assert_eq!(data_value(&settings.unwrap(), "mode").as_deref(), Some("fast"));
    assert_eq!(web.unwrap().data["spec"]["replicas"], 1);
}

#[test_context(MemoryClusterContext)]
#[tokio::test]
async fn test_unknown_kind_does_not_stop_other_documents(ctx: &mut MemoryClusterContext) {
    // Arrange
    let engine = ctx.engine();
    let manifest = format!(
        "{}---\napiVersion: example.com/v1\nkind: Widget\nmetadata:\n  name: w\n---\n{}",
        CONFIG_MAP,
        CONFIG_MAP.replace("cm-a", "cm-b")
    );

    // Act
    let report = engine.apply(manifest.as_bytes()).await.unwrap();

    // Assert
    assert_eq!(report.applied(), 2);
    assert!(matches!(report.first_error(), Some(Status::UnknownType(gvk)) if gvk.kind == "Widget"));
    assert_eq!(report.outcomes()[1].target.document, 2);
    assert!(report.into_result().is_err());
}

#[test_context(MemoryClusterContext)]
#[tokio::test]
async fn test_decode_error_aborts_before_writing(ctx: &mut MemoryClusterContext) {
    let engine = ctx.engine();
    let manifest = format!("{}---\nkind: [unterminated\n", CONFIG_MAP);

    let error = engine.apply(manifest.as_bytes()).await.unwrap_err();

    assert!(matches!(error, Status::Decode(_)));
    let store = ctx.dynamic_store("", "ConfigMap").await;
    assert!(store.list(None, &ListQuery::default()).await.unwrap().is_empty());
}

#[test_context(MemoryClusterContext)]
#[tokio::test]
async fn test_malformed_middle_document_aborts_before_writing(ctx: &mut MemoryClusterContext) {
    // Arrange
    let engine = ctx.engine();
    let store = ctx.dynamic_store("", "ConfigMap").await;
    let malformed = [
        "apiVersion: v1\nkind: ConfigMap\nmetadata: not-a-mapping\n",
        "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: [1, 2]\n",
    ];

    for document in malformed {
        let manifest = format!("{}---\n{}---\n{}", CONFIG_MAP, document, CONFIG_MAP.replace("cm-a", "cm-b"));

        // Act
        let applied = engine.apply(manifest.as_bytes()).await;
        let deleted = engine.delete(manifest.as_bytes(), false).await;

        // Assert
        assert!(matches!(applied.unwrap_err(), Status::Decode(_)));
        assert!(matches!(deleted.unwrap_err(), Status::Decode(_)));
        assert!(store.list(None, &ListQuery::default()).await.unwrap().is_empty());
        assert_eq!(store.revision().await, 0);
    }
}

#[test_context(MemoryClusterContext)]
#[tokio::test]
async fn test_catalog_failure_aborts_apply(ctx: &mut MemoryClusterContext) {
    let engine = ApplyEngine::new(
        TypeResolver::new(Arc::new(StaticCatalogSource::failing(503))),
        ctx.cluster.clone(),
        ClientConfig::default(),
    );

    let error = engine.apply(CONFIG_MAP.as_bytes()).await.unwrap_err();

    assert!(matches!(error, Status::Rejected { .. }));
}

#[test_context(MemoryClusterContext)]
#[tokio::test]
async fn test_delete_manifest_in_reverse_order(ctx: &mut MemoryClusterContext) {
    // Arrange
    let engine = ctx.engine();
    engine.apply(MIXED.as_bytes()).await.unwrap().into_result().unwrap();

    // Act
    let report = engine.delete(MIXED.as_bytes(), true).await.unwrap();
    let again = engine.delete(MIXED.as_bytes(), false).await.unwrap();

    // Assert
    let documents: Vec<usize> = report.outcomes().iter().map(|outcome| outcome.target.document).collect();
    assert_eq!(documents, vec![3, 2, 1]);
    assert_eq!(report.applied(), 3);
    assert_eq!(again.into_result().unwrap(), 3);
    let namespaces = ctx.dynamic_store("", "Namespace").await;
    assert!(namespaces.get(None, "team-a").await.unwrap_err().is_not_found());
}

#[test_context(MemoryClusterContext)]
#[tokio::test]
async fn test_apply_file(ctx: &mut MemoryClusterContext) {
    // Arrange
    let engine = ctx.engine();
    let path = std::env::temp_dir().join(format!("{}.yaml", uuid::Uuid::new_v4()));
    std::fs::File::create(&path)
        .unwrap()
        .write_all(MIXED.as_bytes())
        .unwrap();

    // Act
    let report = engine.apply_file(&path).await;
    let missing = engine.apply_file(&path.with_extension("missing")).await;
    std::fs::remove_file(&path).unwrap();

    // Assert
    assert_eq!(report.unwrap().applied(), 3);
    assert!(matches!(missing.unwrap_err(), Status::Read { .. }));
}

#[test_context(MemoryClusterContext)]
#[tokio::test]
async fn test_resolver_is_shared_across_runs(ctx: &mut MemoryClusterContext) {
    let engine = ctx.engine();

    engine.apply(CONFIG_MAP.as_bytes()).await.unwrap();
    engine.apply(MIXED.as_bytes()).await.unwrap();

    assert_eq!(ctx.catalog.fetch_count(), 1);
    assert!(engine.resolver().catalog().await.unwrap().len() >= 3);
}
