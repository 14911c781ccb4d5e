use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::models::backend::{Alert, DashboardData, PodRecord, Severity};

/// `namespace/name` identity of a pod.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PodKey {
    pub namespace: String,
    pub name: String,
}

impl PodKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for PodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl Serialize for PodKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Display-ready aggregate of one pod-health snapshot. Rebuilt wholesale on
/// every successful refresh and swapped in as a unit; never patched in place.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HealthView {
    /// Fetch sequence of the snapshot this view was built from.
    pub seq: u64,
    pub pods: BTreeMap<PodKey, PodRecord>,
    pub total_issues: usize,
    /// Pod names with at least one issue; a pod with N issues counts once.
    pub pods_with_issues: BTreeSet<String>,
    pub issues_by_type: BTreeMap<String, usize>,
}

impl HealthView {
    pub fn get(&self, namespace: &str, name: &str) -> Option<&PodRecord> {
        self.pods.get(&PodKey::new(namespace, name))
    }

    pub fn has_issues(&self) -> bool {
        self.total_issues > 0
    }

    /// Metrics summary ordering: errors before warnings, then larger counts,
    /// then type name. A type's severity is the worst one observed for it.
    pub fn issue_metrics(&self) -> Vec<IssueMetric> {
        let mut severity_by_type: BTreeMap<&str, Severity> = BTreeMap::new();
        for pod in self.pods.values() {
            for issue in &pod.potential_issues {
                let worst = severity_by_type
                    .entry(issue.issue_type.as_str())
                    .or_insert(issue.severity);
                if issue.severity > *worst {
                    *worst = issue.severity;
                }
            }
        }

        let mut metrics: Vec<IssueMetric> = self
            .issues_by_type
            .iter()
            .map(|(issue_type, count)| IssueMetric {
                issue_type: issue_type.clone(),
                count: *count,
                severity: severity_by_type
                    .get(issue_type.as_str())
                    .copied()
                    .unwrap_or(Severity::Warning),
            })
            .collect();
        metrics.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then(b.count.cmp(&a.count))
                .then(a.issue_type.cmp(&b.issue_type))
        });
        metrics
    }

    /// Flattened (pod, issue) rows for the anomaly table, in key order.
    pub fn issue_rows(&self) -> Vec<IssueRow> {
        let mut rows = Vec::new();
        for (key, pod) in &self.pods {
            for issue in &pod.potential_issues {
                rows.push(IssueRow {
                    namespace: key.namespace.clone(),
                    name: key.name.clone(),
                    issue_type: issue.issue_type.clone(),
                    severity: issue.severity,
                    duration: issue.duration.clone(),
                    description: issue.description.clone(),
                });
            }
        }
        rows
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueMetric {
    pub issue_type: String,
    pub count: usize,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueRow {
    pub namespace: String,
    pub name: String,
    pub issue_type: String,
    pub severity: Severity,
    pub duration: String,
    pub description: String,
}

/// Summary counters for the overview page, derived from one `/api/data`
/// snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardView {
    pub seq: u64,
    pub last_updated: String,
    pub pods_total: usize,
    pub pods_running: usize,
    pub nodes_total: usize,
    pub nodes_ready: usize,
    pub deployments_total: usize,
    pub deployments_available: usize,
    pub cpu_percent: u8,
    pub memory_percent: u8,
    pub cluster_status: String,
    pub alert_errors: usize,
    pub alert_warnings: usize,
    pub alerts: Vec<Alert>,
}

impl DashboardView {
    pub fn from_data(seq: u64, data: &DashboardData) -> Self {
        Self {
            seq,
            last_updated: data.last_updated.clone(),
            pods_total: data.pods.len(),
            pods_running: data.pods.iter().filter(|p| p.status == "Running").count(),
            nodes_total: data.nodes.len(),
            nodes_ready: data.nodes.iter().filter(|n| n.status == "Ready").count(),
            deployments_total: data.deployments.len(),
            deployments_available: data
                .deployments
                .iter()
                .filter(|d| d.status == "Available")
                .count(),
            cpu_percent: gauge_percent(data.resource_usage.cpu.used, data.resource_usage.cpu.total),
            memory_percent: gauge_percent(
                data.resource_usage.memory.used,
                data.resource_usage.memory.total,
            ),
            cluster_status: data.cluster_health.status.clone(),
            alert_errors: data.alerts.iter().filter(|a| a.severity == "error").count(),
            alert_warnings: data
                .alerts
                .iter()
                .filter(|a| a.severity == "warning")
                .count(),
            alerts: data.alerts.clone(),
        }
    }
}

fn gauge_percent(used: f64, total: f64) -> u8 {
    if total <= 0.0 {
        return 0;
    }
    ((used / total) * 100.0).round().clamp(0.0, 100.0) as u8
}
