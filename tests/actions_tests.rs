// Dispatcher sequencing: confirmation precondition, backend success/failure
// branches, re-poll pair, notifications

mod common;

use axum::{Json, Router, http::StatusCode, routing::post};
use kubedash_console::actions::{Action, ActionError, Confirmation, Dispatcher};
use kubedash_console::clients::BackendClient;
use kubedash_console::notify::{NotificationKind, Notifier};
use kubedash_console::poller::{CycleError, PollSession};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::time::Duration;

fn stop_web1() -> Action {
    Action::StopPod {
        namespace: "default".to_string(),
        name: "web-1".to_string(),
        owner_kind: Some("Deployment".to_string()),
        owner_name: Some("web".to_string()),
    }
}

/// Session whose cycles just count; interval is long enough that only the
/// initial fill and forced polls ever run.
fn counting_session(cycles: Arc<AtomicUsize>) -> PollSession<u64> {
    PollSession::start("health", Duration::from_secs(3600), 0u64, move || {
        let cycles = cycles.clone();
        async move {
            let n = cycles.fetch_add(1, Ordering::SeqCst) as u64 + 1;
            Ok::<_, CycleError>((n, n))
        }
    })
}

#[tokio::test]
async fn confirmed_stop_success_schedules_repoll_pair() {
    let backend = Router::new().route(
        "/api/pods/stop",
        post(|| async {
            Json(serde_json::json!({
                "success": true,
                "message": "Deployment web in namespace default scaled to 0 replicas"
            }))
        }),
    );
    let base = common::spawn_backend(backend).await;
    let client = Arc::new(BackendClient::new(base));

    let cycles = Arc::new(AtomicUsize::new(0));
    let session = counting_session(cycles.clone());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(cycles.load(Ordering::SeqCst), 1); // initial fill

    let notifier = Notifier::new(5000);
    let mut events = notifier.subscribe();
    let dispatcher = Dispatcher::new(
        client,
        session.trigger(),
        notifier.clone(),
        Duration::from_millis(50),
    );

    let outcome = dispatcher
        .execute(stop_web1(), Confirmation::Confirmed)
        .await
        .unwrap();
    assert!(outcome.message.contains("scaled to 0"));

    // Immediate re-poll plus the delayed follow-up.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(cycles.load(Ordering::SeqCst), 3);

    let note = events.recv().await.unwrap();
    assert_eq!(note.kind, NotificationKind::Success);
    assert!(note.message.contains("scaled to 0"));
    assert_eq!(note.dismiss_after_ms, 5000);
    session.stop();
}

#[tokio::test]
async fn backend_rejection_surfaces_error_and_skips_repolls() {
    let backend = Router::new().route(
        "/api/pods/stop",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "message": "Error stopping pod: pods \"web-1\" not found"
                })),
            )
        }),
    );
    let base = common::spawn_backend(backend).await;
    let client = Arc::new(BackendClient::new(base));

    let cycles = Arc::new(AtomicUsize::new(0));
    let session = counting_session(cycles.clone());
    tokio::time::sleep(Duration::from_millis(50)).await;

    let notifier = Notifier::new(5000);
    let mut events = notifier.subscribe();
    let dispatcher = Dispatcher::new(
        client,
        session.trigger(),
        notifier.clone(),
        Duration::from_millis(20),
    );

    let err = dispatcher
        .execute(stop_web1(), Confirmation::Confirmed)
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::Backend(_)));
    assert!(err.to_string().contains("not found"));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(cycles.load(Ordering::SeqCst), 1); // no re-polls

    let note = events.recv().await.unwrap();
    assert_eq!(note.kind, NotificationKind::Error);
    session.stop();
}

#[tokio::test]
async fn unconfirmed_destructive_action_never_reaches_backend() {
    let hits = Arc::new(AtomicUsize::new(0));
    let backend = Router::new().route(
        "/api/pods/stop",
        post({
            let hits = hits.clone();
            move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(serde_json::json!({"success": true, "message": "stopped"}))
                }
            }
        }),
    );
    let base = common::spawn_backend(backend).await;
    let client = Arc::new(BackendClient::new(base));

    let cycles = Arc::new(AtomicUsize::new(0));
    let session = counting_session(cycles.clone());
    tokio::time::sleep(Duration::from_millis(50)).await;

    let notifier = Notifier::new(5000);
    let dispatcher = Dispatcher::new(
        client,
        session.trigger(),
        notifier,
        Duration::from_millis(20),
    );

    let err = dispatcher
        .execute(stop_web1(), Confirmation::NotConfirmed)
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::Validation(_)));
    assert!(err.to_string().contains("requires confirmation"));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(cycles.load(Ordering::SeqCst), 1);
    session.stop();
}

#[tokio::test]
async fn scale_and_create_validation() {
    let base = common::dead_backend().await;
    let client = Arc::new(BackendClient::new(base));

    let cycles = Arc::new(AtomicUsize::new(0));
    let session = counting_session(cycles.clone());
    let notifier = Notifier::new(5000);
    let dispatcher = Dispatcher::new(
        client,
        session.trigger(),
        notifier,
        Duration::from_millis(20),
    );

    let err = dispatcher
        .execute(
            Action::ScaleDeployment {
                namespace: "default".to_string(),
                name: "web".to_string(),
                replicas: -1,
            },
            Confirmation::NotConfirmed,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::Validation(_)));
    assert!(err.to_string().contains("non-negative"));

    let err = dispatcher
        .execute(
            Action::CreateDeployment {
                namespace: "default".to_string(),
                name: "web".to_string(),
                image: "  ".to_string(),
                replicas: 1,
            },
            Confirmation::NotConfirmed,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::Validation(_)));
    assert!(err.to_string().contains("image"));

    let err = dispatcher
        .execute(
            Action::RestartPod {
                namespace: String::new(),
                name: "web-1".to_string(),
            },
            Confirmation::Confirmed,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::Validation(_)));
    session.stop();
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let base = common::dead_backend().await;
    let client = Arc::new(BackendClient::new(base));

    let cycles = Arc::new(AtomicUsize::new(0));
    let session = counting_session(cycles.clone());
    tokio::time::sleep(Duration::from_millis(50)).await;

    let notifier = Notifier::new(5000);
    let dispatcher = Dispatcher::new(
        client,
        session.trigger(),
        notifier,
        Duration::from_millis(20),
    );

    let err = dispatcher
        .execute(stop_web1(), Confirmation::Confirmed)
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::Network(_)));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(cycles.load(Ordering::SeqCst), 1);
    session.stop();
}

#[tokio::test]
async fn scale_without_confirmation_goes_through() {
    let backend = Router::new().route(
        "/api/deployments/scale",
        post(|| async {
            Json(serde_json::json!({
                "success": true,
                "message": "Deployment web scaled to 3 replicas"
            }))
        }),
    );
    let base = common::spawn_backend(backend).await;
    let client = Arc::new(BackendClient::new(base));

    let cycles = Arc::new(AtomicUsize::new(0));
    let session = counting_session(cycles.clone());
    tokio::time::sleep(Duration::from_millis(50)).await;

    let notifier = Notifier::new(5000);
    let dispatcher = Dispatcher::new(
        client,
        session.trigger(),
        notifier,
        Duration::from_millis(20),
    );

    let outcome = dispatcher
        .execute(
            Action::ScaleDeployment {
                namespace: "default".to_string(),
                name: "web".to_string(),
                replicas: 3,
            },
            Confirmation::NotConfirmed,
        )
        .await
        .unwrap();
    assert!(outcome.message.contains("3 replicas"));
    session.stop();
}
