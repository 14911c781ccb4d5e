use serde::{Deserialize, Serialize};

// Wire types matching the dashboard backend's snake_case JSON. Mutating
// endpoints reply with the {success, message|error} convention.

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PodRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default)]
    pub container_statuses: Vec<ContainerRecord>,
    #[serde(default)]
    pub potential_issues: Vec<Issue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContainerRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub restart_count: u32,
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

/// One anomaly report attached to a pod. Detection runs in the backend; the
/// engine carries these through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub issue_type: String,
    pub severity: Severity,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

// Ord: Warning < Error, so sorting descending puts errors first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

// --- /api/data payload ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardData {
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub pods: Vec<DashboardPod>,
    #[serde(default)]
    pub deployments: Vec<DeploymentRecord>,
    #[serde(default)]
    pub resource_usage: ResourceUsage,
    #[serde(default)]
    pub cluster_health: ClusterHealth,
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NodeRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardPod {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeploymentRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub replicas: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResourceUsage {
    #[serde(default)]
    pub cpu: UsageGauge,
    #[serde(default)]
    pub memory: UsageGauge,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UsageGauge {
    #[serde(default)]
    pub used: f64,
    #[serde(default)]
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClusterHealth {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub components: Vec<ComponentHealth>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ComponentHealth {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Alert {
    #[serde(default)]
    pub severity: String,
    #[serde(default, rename = "type")]
    pub alert_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: String,
}

// --- Mutation requests and replies ---

#[derive(Debug, Clone, Serialize)]
pub struct PodActionRequest {
    pub namespace: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeploymentActionRequest {
    pub namespace: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResponse {
    /// Backend text regardless of which field it arrived in.
    pub fn text(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| {
                if self.success {
                    "ok".to_string()
                } else {
                    "backend gave no reason".to_string()
                }
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LogsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub logs: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogsResponse {
    pub fn error_text(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| "backend gave no reason".to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeploymentStatusResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<DeploymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DeploymentStatusResponse {
    pub fn error_text(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "backend gave no reason".to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeploymentStatus {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub current_replicas: i32,
    #[serde(default)]
    pub available_replicas: i32,
    #[serde(default)]
    pub ready_replicas: i32,
}
