use crate::services::apply::apply_report::ApplyAction;
use crate::services::client::object_source::ObjectSource;
use crate::testing::recording_handler::{Recorded, RecordingHandler};
use crate::testing::temp_namespace_context::TempNamespaceContext;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::api::ObjectMeta;
use maplit::btreemap;
use std::sync::Arc;
use std::time::Duration;
use test_context::test_context;

const TIMEOUT: Duration = Duration::from_secs(30);

fn config_map(name: &str, value: &str) -> ObjectSource<ConfigMap> {
    ObjectSource::Object(ConfigMap {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        data: Some(btreemap! { "key".to_string() => value.to_string() }),
        ..Default::default()
    })
}

#[test_context(TempNamespaceContext)]
#[tokio::test]
#[ignore = "requires a kind cluster"]
async fn test_config_map_round_trip(ctx: &mut TempNamespaceContext) {
    // Arrange
    let client = ctx.objects::<ConfigMap>();

    // Act
    let (_, first) = client.upsert(config_map("cm-a", "1")).await.unwrap();
    let (_, second) = client.upsert(config_map("cm-a", "1")).await.unwrap();
    client.delete("cm-a", true).await.unwrap();

    // Assert
    assert_eq!(first, ApplyAction::Created);
    assert_eq!(second, ApplyAction::Updated);
    assert!(client.get("cm-a").await.unwrap_err().is_not_found());
}

#[test_context(TempNamespaceContext)]
#[tokio::test]
#[ignore = "requires a kind cluster"]
async fn test_apply_manifest_with_discovery(ctx: &mut TempNamespaceContext) {
    // Arrange
    let manifest = format!(
        "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: cm-a\n  namespace: {0}\ndata:\n  key: value\n---\napiVersion: rbac.authorization.k8s.io/v1\nkind: Role\nmetadata:\n  name: reader\n  namespace: {0}\nrules: []\n",
        ctx.namespace
    );
    let engine = ctx.backend.apply_engine();

    // Act
    let applied = engine.apply(manifest.as_bytes()).await.unwrap().into_result().unwrap();
    let reapplied = engine.apply(manifest.as_bytes()).await.unwrap().into_result().unwrap();

    // Assert
    assert_eq!(applied, 2);
    assert_eq!(reapplied, 2);
    assert!(ctx.objects::<ConfigMap>().exists("cm-a").await.unwrap());
}

#[test_context(TempNamespaceContext)]
#[tokio::test]
#[ignore = "requires a kind cluster"]
async fn test_watch_reports_changes(ctx: &mut TempNamespaceContext) {
    // Arrange
    let client = ctx.objects::<ConfigMap>();
    let handler = Arc::new(RecordingHandler::default());
    let handle = client.watch("cm-a", handler.clone());
    tokio::time::sleep(Duration::from_secs(1)).await;

    // Act
    client.create(config_map("cm-a", "1")).await.unwrap();
    client.update(config_map("cm-a", "2")).await.unwrap();
    client.delete("cm-a", true).await.unwrap();
    let events = handler.wait_for_events(3, TIMEOUT).await;
    handle.stop_and_wait().await.unwrap();

    // Assert
    assert_eq!(events[0], Recorded::Added("cm-a".to_string(), false));
    assert_eq!(events[1], Recorded::Modified("cm-a".to_string(), true));
    assert!(matches!(events.last(), Some(Recorded::Deleted(..))));
}
