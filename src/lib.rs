pub mod actions;
pub mod clients;
pub mod config;
pub mod helpers;
pub mod models;
pub mod notify;
pub mod poller;
pub mod reconcile;
pub mod routes;
pub mod slots;

use std::sync::Arc;

use actions::Dispatcher;
use clients::BackendClient;
use models::views::{DashboardView, HealthView};
use notify::Notifier;
use poller::PollSession;
use slots::SlotManager;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<BackendClient>,
    pub health: Arc<PollSession<HealthView>>,
    pub dashboard: Arc<PollSession<DashboardView>>,
    pub dispatcher: Arc<Dispatcher>,
    pub slots: Arc<SlotManager>,
    pub notifier: Notifier,
}
