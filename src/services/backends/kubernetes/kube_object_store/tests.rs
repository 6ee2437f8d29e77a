use super::*;
use std::time::Duration;

#[test]
fn test_list_params_carry_query() {
    let query = ListQuery {
        label_selector: Some("app=web".to_string()),
        field_selector: Some("metadata.name=cm-a".to_string()),
        limit: Some(10),
        timeout: Some(Duration::from_secs(30)),
    };

    let params = list_params(&query);

    assert_eq!(params.label_selector.as_deref(), Some("app=web"));
    assert_eq!(params.field_selector.as_deref(), Some("metadata.name=cm-a"));
    assert_eq!(params.limit, Some(10));
    assert_eq!(params.timeout, Some(30));
}

#[test]
fn test_watch_timeout_is_clamped() {
    let query = ListQuery {
        timeout: Some(Duration::from_secs(3600)),
        ..ListQuery::for_name("cm-a")
    };

    let params = watch_params(&query);

    assert_eq!(params.timeout, Some(290));
    assert_eq!(params.field_selector.as_deref(), Some("metadata.name=cm-a"));
}

#[test]
fn test_force_delete_skips_grace_period() {
    let graceful = delete_params(&DeleteOptions::default());
    let forced = delete_params(&DeleteOptions {
        dry_run: true,
        force: true,
    });

    assert_eq!(graceful.grace_period_seconds, None);
    assert!(!graceful.dry_run);
    assert_eq!(forced.grace_period_seconds, Some(0));
    assert!(matches!(forced.propagation_policy, Some(PropagationPolicy::Background)));
    assert!(forced.dry_run);
}

#[test]
fn test_post_params_mark_field_manager() {
    let params = post_params(&WriteOptions { dry_run: true });

    assert!(params.dry_run);
    assert_eq!(params.field_manager.as_deref(), Some(FIELD_MANAGER));
}

#[test]
fn test_watch_events_are_translated() {
    let config_map = k8s_openapi::api::core::v1::ConfigMap::default();

    assert!(matches!(
        to_object_event(WatchEvent::Modified(config_map.clone())),
        ObjectEvent::Modified(_)
    ));
    assert!(matches!(
        to_object_event(WatchEvent::<k8s_openapi::api::core::v1::ConfigMap>::Error(kube::core::ErrorResponse {
            status: "Failure".to_string(),
            message: "too old resource version".to_string(),
            reason: "Expired".to_string(),
            code: 410,
        })),
        ObjectEvent::Error(message) if message.contains("410")
    ));
}
