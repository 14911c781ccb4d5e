use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

use crate::models::backend::{
    ActionResponse, DashboardData, DeploymentActionRequest, DeploymentStatusResponse,
    LogsResponse, PodActionRequest, PodRecord,
};

/// Point-in-time listing of one resource collection, tagged with the fetch
/// sequence assigned when the request was issued.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub seq: u64,
    pub body: T,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("backend returned {status}: {body}")]
    Http { status: u16, body: String },
    #[error("malformed response body: {0}")]
    Decode(#[source] serde_json::Error),
}

/// HTTP client for the dashboard backend. One outbound request per call, no
/// retries here — retry policy lives with the poll loop. The only shared
/// state is the fetch sequence counter.
pub struct BackendClient {
    base_url: String,
    http: Client,
    fetch_seq: AtomicU64,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            http,
            fetch_seq: AtomicU64::new(0),
        }
    }

    fn next_seq(&self) -> u64 {
        self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub async fn fetch_pod_health(&self) -> Result<Snapshot<Vec<PodRecord>>, FetchError> {
        let seq = self.next_seq();
        let body = self.get_json("/api/pod-health").await?;
        Ok(Snapshot { seq, body })
    }

    pub async fn fetch_dashboard(&self) -> Result<Snapshot<DashboardData>, FetchError> {
        let seq = self.next_seq();
        let body = self.get_json("/api/data").await?;
        Ok(Snapshot { seq, body })
    }

    pub async fn fetch_pod_logs(&self, ns: &str, name: &str) -> Result<LogsResponse, FetchError> {
        self.get_json(&format!("/api/pods/{}/{}/logs", ns, name))
            .await
    }

    pub async fn deployment_status(
        &self,
        ns: &str,
        name: &str,
    ) -> Result<DeploymentStatusResponse, FetchError> {
        self.get_json(&format!(
            "/api/deployment/status?namespace={}&deployment_name={}",
            ns, name
        ))
        .await
    }

    pub async fn start_pod(&self, req: &PodActionRequest) -> Result<ActionResponse, FetchError> {
        self.post_action("/api/pods/start", Some(req)).await
    }

    pub async fn stop_pod(&self, req: &PodActionRequest) -> Result<ActionResponse, FetchError> {
        self.post_action("/api/pods/stop", Some(req)).await
    }

    pub async fn restart_pod(&self, ns: &str, name: &str) -> Result<ActionResponse, FetchError> {
        self.post_action::<()>(&format!("/api/pods/{}/{}/restart", ns, name), None)
            .await
    }

    pub async fn delete_pod(&self, req: &PodActionRequest) -> Result<ActionResponse, FetchError> {
        self.post_action("/api/pods/delete", Some(req)).await
    }

    pub async fn create_deployment(
        &self,
        req: &DeploymentActionRequest,
    ) -> Result<ActionResponse, FetchError> {
        self.post_action("/api/deployments/create", Some(req)).await
    }

    pub async fn scale_deployment(
        &self,
        req: &DeploymentActionRequest,
    ) -> Result<ActionResponse, FetchError> {
        self.post_action("/api/deployments/scale", Some(req)).await
    }

    pub async fn restart_deployment(
        &self,
        req: &DeploymentActionRequest,
    ) -> Result<ActionResponse, FetchError> {
        self.post_action("/api/deployments/restart", Some(req))
            .await
    }

    pub async fn delete_deployment(
        &self,
        req: &DeploymentActionRequest,
    ) -> Result<ActionResponse, FetchError> {
        self.post_action("/api/deployments/delete", Some(req)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }
        let text = resp.text().await.map_err(FetchError::Transport)?;
        serde_json::from_str(&text).map_err(FetchError::Decode)
    }

    /// Mutating endpoints carry {success, message|error} even on non-2xx
    /// statuses, so the body is decoded before the status is judged.
    async fn post_action<B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<ActionResponse, FetchError> {
        let mut req = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header("Accept", "application/json");
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await.map_err(FetchError::Transport)?;

        let status = resp.status();
        let text = resp.text().await.map_err(FetchError::Transport)?;
        match serde_json::from_str::<ActionResponse>(&text) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(FetchError::Http {
                status: status.as_u16(),
                body: text,
            }),
            Err(e) => Err(FetchError::Decode(e)),
        }
    }
}
