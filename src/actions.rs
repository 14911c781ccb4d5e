use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Duration;
use tracing::{debug, info};

use crate::clients::{BackendClient, FetchError};
use crate::models::backend::{DeploymentActionRequest, PodActionRequest};
use crate::notify::Notifier;
use crate::poller::PollTrigger;

/// Operator command against a pod or deployment. Decoded straight from the
/// rendering layer's action request.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    StartPod {
        namespace: String,
        name: String,
        #[serde(default)]
        owner_kind: Option<String>,
        #[serde(default)]
        owner_name: Option<String>,
    },
    StopPod {
        namespace: String,
        name: String,
        #[serde(default)]
        owner_kind: Option<String>,
        #[serde(default)]
        owner_name: Option<String>,
    },
    RestartPod {
        namespace: String,
        name: String,
    },
    DeletePod {
        namespace: String,
        name: String,
    },
    CreateDeployment {
        namespace: String,
        name: String,
        image: String,
        #[serde(default = "default_replicas")]
        replicas: i32,
    },
    ScaleDeployment {
        namespace: String,
        name: String,
        replicas: i32,
    },
    RestartDeployment {
        namespace: String,
        name: String,
    },
    DeleteDeployment {
        namespace: String,
        name: String,
    },
}

fn default_replicas() -> i32 {
    1
}

impl Action {
    pub fn describe(&self) -> String {
        let (verb, kind) = match self {
            Action::StartPod { .. } => ("start", "pod"),
            Action::StopPod { .. } => ("stop", "pod"),
            Action::RestartPod { .. } => ("restart", "pod"),
            Action::DeletePod { .. } => ("delete", "pod"),
            Action::CreateDeployment { .. } => ("create", "deployment"),
            Action::ScaleDeployment { .. } => ("scale", "deployment"),
            Action::RestartDeployment { .. } => ("restart", "deployment"),
            Action::DeleteDeployment { .. } => ("delete", "deployment"),
        };
        let (namespace, name) = self.target();
        format!("{} {} {}/{}", verb, kind, namespace, name)
    }

    pub fn target(&self) -> (&str, &str) {
        match self {
            Action::StartPod {
                namespace, name, ..
            }
            | Action::StopPod {
                namespace, name, ..
            }
            | Action::RestartPod { namespace, name }
            | Action::DeletePod { namespace, name }
            | Action::CreateDeployment {
                namespace, name, ..
            }
            | Action::ScaleDeployment {
                namespace, name, ..
            }
            | Action::RestartDeployment { namespace, name }
            | Action::DeleteDeployment { namespace, name } => (namespace, name),
        }
    }

    /// Commands the operator must confirm before dispatch. Create and scale
    /// carry their parameters as the precondition instead.
    pub fn needs_confirmation(&self) -> bool {
        !matches!(
            self,
            Action::CreateDeployment { .. } | Action::ScaleDeployment { .. }
        )
    }
}

/// Operator confirmation state, collected by the rendering layer before the
/// request reaches the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    NotConfirmed,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::NotConfirmed
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0}")]
    Validation(String),
    #[error("backend rejected action: {0}")]
    Backend(String),
    #[error(transparent)]
    Network(#[from] FetchError),
}

/// Executes operator commands and, on success only, schedules the re-poll
/// pair that lets the view catch the backend's eventual state transition.
/// Identical commands fired concurrently are not deduplicated here; the
/// backend owns idempotence.
pub struct Dispatcher {
    client: Arc<BackendClient>,
    health_poll: PollTrigger,
    notifier: Notifier,
    repoll_delay: Duration,
}

impl Dispatcher {
    pub fn new(
        client: Arc<BackendClient>,
        health_poll: PollTrigger,
        notifier: Notifier,
        repoll_delay: Duration,
    ) -> Self {
        Self {
            client,
            health_poll,
            notifier,
            repoll_delay,
        }
    }

    pub async fn execute(
        &self,
        action: Action,
        confirmation: Confirmation,
    ) -> Result<ActionOutcome, ActionError> {
        match self.dispatch(&action, confirmation).await {
            Ok(outcome) => {
                info!(action = %action.describe(), "action succeeded");
                self.notifier.success(&outcome.message);
                self.schedule_repolls();
                Ok(outcome)
            }
            Err(e) => {
                // No automatic retry: the operator reissues the command.
                info!(action = %action.describe(), error = %e, "action failed");
                self.notifier.error(e.to_string());
                Err(e)
            }
        }
    }

    async fn dispatch(
        &self,
        action: &Action,
        confirmation: Confirmation,
    ) -> Result<ActionOutcome, ActionError> {
        self.validate(action, confirmation)?;

        let response = match action {
            Action::StartPod {
                namespace,
                name,
                owner_kind,
                owner_name,
            } => {
                self.client
                    .start_pod(&PodActionRequest {
                        namespace: namespace.clone(),
                        name: name.clone(),
                        owner_kind: owner_kind.clone(),
                        owner_name: owner_name.clone(),
                    })
                    .await?
            }
            Action::StopPod {
                namespace,
                name,
                owner_kind,
                owner_name,
            } => {
                self.client
                    .stop_pod(&PodActionRequest {
                        namespace: namespace.clone(),
                        name: name.clone(),
                        owner_kind: owner_kind.clone(),
                        owner_name: owner_name.clone(),
                    })
                    .await?
            }
            Action::RestartPod { namespace, name } => {
                self.client.restart_pod(namespace, name).await?
            }
            Action::DeletePod { namespace, name } => {
                self.client
                    .delete_pod(&PodActionRequest {
                        namespace: namespace.clone(),
                        name: name.clone(),
                        owner_kind: None,
                        owner_name: None,
                    })
                    .await?
            }
            Action::CreateDeployment {
                namespace,
                name,
                image,
                replicas,
            } => {
                self.client
                    .create_deployment(&DeploymentActionRequest {
                        namespace: namespace.clone(),
                        name: name.clone(),
                        image: Some(image.clone()),
                        replicas: Some(*replicas),
                    })
                    .await?
            }
            Action::ScaleDeployment {
                namespace,
                name,
                replicas,
            } => {
                self.client
                    .scale_deployment(&DeploymentActionRequest {
                        namespace: namespace.clone(),
                        name: name.clone(),
                        image: None,
                        replicas: Some(*replicas),
                    })
                    .await?
            }
            Action::RestartDeployment { namespace, name } => {
                self.client
                    .restart_deployment(&DeploymentActionRequest {
                        namespace: namespace.clone(),
                        name: name.clone(),
                        image: None,
                        replicas: None,
                    })
                    .await?
            }
            Action::DeleteDeployment { namespace, name } => {
                self.client
                    .delete_deployment(&DeploymentActionRequest {
                        namespace: namespace.clone(),
                        name: name.clone(),
                        image: None,
                        replicas: None,
                    })
                    .await?
            }
        };

        if response.success {
            Ok(ActionOutcome {
                message: response.text(),
            })
        } else {
            Err(ActionError::Backend(response.text()))
        }
    }

    fn validate(&self, action: &Action, confirmation: Confirmation) -> Result<(), ActionError> {
        let (namespace, name) = action.target();
        if namespace.is_empty() || name.is_empty() {
            return Err(ActionError::Validation(
                "namespace and name are required".to_string(),
            ));
        }
        if action.needs_confirmation() && confirmation != Confirmation::Confirmed {
            return Err(ActionError::Validation(format!(
                "{} requires confirmation",
                action.describe()
            )));
        }
        match action {
            Action::CreateDeployment { image, .. } if image.trim().is_empty() => Err(
                ActionError::Validation("image is required".to_string()),
            ),
            Action::CreateDeployment { replicas, .. } | Action::ScaleDeployment { replicas, .. }
                if *replicas < 0 =>
            {
                Err(ActionError::Validation(
                    "replicas must be non-negative".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Immediate poll plus one delayed follow-up: pod transitions
    /// (termination, then recreation) settle over a few seconds, so a single
    /// refresh misses the slow half.
    fn schedule_repolls(&self) {
        self.health_poll.fire();
        let trigger = self.health_poll.clone();
        let delay = self.repoll_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("delayed post-action poll");
            trigger.fire();
        });
    }
}
