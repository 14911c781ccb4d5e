use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient operator feedback for one action result. The dismiss delay
/// rides along so the rendering layer does not hardcode it.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub dismiss_after_ms: u64,
}

/// Fan-out of action-result notifications to whatever rendering is
/// subscribed. Publishing with no subscribers is fine; nobody was looking.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
    dismiss_after_ms: u64,
}

impl Notifier {
    pub fn new(dismiss_after_ms: u64) -> Self {
        let (tx, _) = broadcast::channel(32);
        Self {
            tx,
            dismiss_after_ms,
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(NotificationKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(NotificationKind::Error, message.into());
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    fn publish(&self, kind: NotificationKind, message: String) {
        let delivered = self
            .tx
            .send(Notification {
                kind,
                message,
                dismiss_after_ms: self.dismiss_after_ms,
            })
            .unwrap_or(0);
        debug!(?kind, delivered, "notification published");
    }
}
