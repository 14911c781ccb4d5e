use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::AppState;
use crate::actions::{Action, ActionError, Confirmation};
use crate::helpers::parse_age;
use crate::models::backend::PodRecord;
use crate::models::views::{HealthView, IssueMetric, IssueRow, PodKey};
use crate::slots::{DetailPanel, LogViewer, Slot};

#[derive(Debug, Serialize)]
pub struct HealthViewPayload {
    pub seq: u64,
    pub total_issues: usize,
    pub pods_with_issues: BTreeSet<String>,
    pub issues_by_type: BTreeMap<String, usize>,
    pub metrics: Vec<IssueMetric>,
    pub rows: Vec<IssueRow>,
}

impl From<&HealthView> for HealthViewPayload {
    fn from(view: &HealthView) -> Self {
        Self {
            seq: view.seq,
            total_issues: view.total_issues,
            pods_with_issues: view.pods_with_issues.clone(),
            issues_by_type: view.issues_by_type.clone(),
            metrics: view.issue_metrics(),
            rows: view.issue_rows(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PodDetailPayload {
    pub seq: u64,
    pub age: String,
    #[serde(flatten)]
    pub pod: PodRecord,
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    #[serde(flatten)]
    pub action: Action,
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Serialize)]
pub struct ActionReply {
    pub success: bool,
    pub message: String,
}

pub async fn handle_healthz() -> &'static str {
    "ok\n"
}

pub async fn handle_dashboard_view(State(state): State<AppState>) -> Response {
    Json(state.dashboard.view().as_ref().clone()).into_response()
}

pub async fn handle_health_view(State(state): State<AppState>) -> Response {
    let view = state.health.view();
    Json(HealthViewPayload::from(view.as_ref())).into_response()
}

/// Pod detail, read from the latest committed view. Opening it claims the
/// detail slot: a panel already showing another pod is torn down first.
pub async fn handle_pod_detail(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
) -> Response {
    let view = state.health.view();
    match view.get(&namespace, &name) {
        Some(record) => {
            let key = PodKey::new(&namespace, &name);
            let updates = state.health.subscribe();
            state
                .slots
                .open(Slot::PodDetails, || Box::new(DetailPanel::new(key, updates)));
            Json(PodDetailPayload {
                seq: view.seq,
                age: parse_age(&record.start_time),
                pod: record.clone(),
            })
            .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            format!("pod {}/{} not found", namespace, name),
        )
            .into_response(),
    }
}

pub async fn handle_close_pod_detail(
    State(state): State<AppState>,
    Path((_namespace, _name)): Path<(String, String)>,
) -> StatusCode {
    state.slots.close(Slot::PodDetails);
    StatusCode::NO_CONTENT
}

/// Fetches logs for one pod and claims the log-viewer slot, replacing a
/// viewer still open for another pod.
pub async fn handle_pod_logs(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
) -> Response {
    match state.client.fetch_pod_logs(&namespace, &name).await {
        Ok(resp) if resp.success => {
            let key = PodKey::new(&namespace, &name);
            state
                .slots
                .open(Slot::PodLogs, || Box::new(LogViewer::new(key, &resp.logs)));
            (
                StatusCode::OK,
                [("content-type", "text/plain; charset=utf-8")],
                resp.logs,
            )
                .into_response()
        }
        Ok(resp) => (StatusCode::BAD_GATEWAY, resp.error_text()).into_response(),
        Err(e) => (StatusCode::BAD_GATEWAY, e.to_string()).into_response(),
    }
}

pub async fn handle_close_pod_logs(
    State(state): State<AppState>,
    Path((_namespace, _name)): Path<(String, String)>,
) -> StatusCode {
    state.slots.close(Slot::PodLogs);
    StatusCode::NO_CONTENT
}

pub async fn handle_deployment_status(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
) -> Response {
    match state.client.deployment_status(&namespace, &name).await {
        Ok(resp) if resp.success => Json(resp).into_response(),
        Ok(resp) => (StatusCode::BAD_GATEWAY, resp.error_text()).into_response(),
        Err(e) => (StatusCode::BAD_GATEWAY, e.to_string()).into_response(),
    }
}

pub async fn handle_action(
    State(state): State<AppState>,
    Json(req): Json<ActionRequest>,
) -> Response {
    match state
        .dispatcher
        .execute(req.action, Confirmation::from(req.confirmed))
        .await
    {
        Ok(outcome) => Json(ActionReply {
            success: true,
            message: outcome.message,
        })
        .into_response(),
        Err(e) => {
            let status = match &e {
                ActionError::Validation(_) => StatusCode::BAD_REQUEST,
                ActionError::Backend(_) | ActionError::Network(_) => StatusCode::BAD_GATEWAY,
            };
            (
                status,
                Json(ActionReply {
                    success: false,
                    message: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
