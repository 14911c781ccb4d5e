pub mod api;
pub mod sse;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Views
        .route("/api/view/dashboard", get(api::handle_dashboard_view))
        .route("/api/view/pod-health", get(api::handle_health_view))
        .route(
            "/api/view/pods/{namespace}/{name}",
            get(api::handle_pod_detail).delete(api::handle_close_pod_detail),
        )
        // Logs
        .route(
            "/api/pods/{namespace}/{name}/logs",
            get(api::handle_pod_logs).delete(api::handle_close_pod_logs),
        )
        // Deployments
        .route(
            "/api/deployments/{namespace}/{name}/status",
            get(api::handle_deployment_status),
        )
        // Actions
        .route("/api/actions", post(api::handle_action))
        // Notifications
        .route("/api/events", get(sse::handle_events))
        // Health
        .route("/healthz", get(api::handle_healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
