use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::clients::BackendClient;
use crate::models::views::{DashboardView, HealthView};
use crate::reconcile::reconcile;

pub type CycleError = Box<dyn std::error::Error + Send + Sync>;

/// One polling loop for one view. The refresh cycle (fetch + rebuild) runs
/// inline in the loop task, so a session can never have two cycles in
/// flight: timer ticks that land while a cycle runs are skipped, not queued.
///
/// A cycle result is committed only when its sequence is newer than the last
/// committed one and the session is still active; consumers read the latest
/// committed view through a watch channel, so the swap is atomic and a
/// half-built view is never observable.
pub struct PollSession<V> {
    name: &'static str,
    active: Arc<AtomicBool>,
    view_rx: watch::Receiver<Arc<V>>,
    poll_tx: mpsc::Sender<()>,
    handle: tokio::task::JoinHandle<()>,
}

/// Cloneable handle for forcing out-of-band cycles on a session without
/// touching its timer. Fires are coalesced while one is already pending.
#[derive(Clone)]
pub struct PollTrigger {
    tx: mpsc::Sender<()>,
}

impl PollTrigger {
    pub fn fire(&self) {
        let _ = self.tx.try_send(());
    }
}

impl<V: Send + Sync + 'static> PollSession<V> {
    pub fn start<F, Fut>(name: &'static str, every: Duration, initial: V, mut cycle: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(u64, V), CycleError>> + Send,
    {
        let active = Arc::new(AtomicBool::new(true));
        let (view_tx, view_rx) = watch::channel(Arc::new(initial));
        let (poll_tx, mut poll_rx) = mpsc::channel::<()>(1);

        let loop_active = active.clone();
        let handle = tokio::spawn(async move {
            let mut tick = time::interval(every);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tick.tick().await; // consume the immediate first tick

            let mut last_seq = 0u64;

            // First fill so consumers have data before the interval elapses.
            run_cycle(name, &mut cycle, &view_tx, &loop_active, &mut last_seq).await;

            loop {
                if !loop_active.load(Ordering::SeqCst) {
                    break;
                }
                tokio::select! {
                    _ = tick.tick() => {}
                    recv = poll_rx.recv() => {
                        if recv.is_none() {
                            break;
                        }
                        debug!(session = name, "forced poll");
                    }
                }
                if !loop_active.load(Ordering::SeqCst) {
                    break;
                }
                run_cycle(name, &mut cycle, &view_tx, &loop_active, &mut last_seq).await;
            }
            info!(session = name, "poll session stopped");
        });

        Self {
            name,
            active,
            view_rx,
            poll_tx,
            handle,
        }
    }

    /// Latest committed view; cheap clone of the shared handle.
    pub fn view(&self) -> Arc<V> {
        self.view_rx.borrow().clone()
    }

    /// Change-driven subscription to committed views.
    pub fn subscribe(&self) -> watch::Receiver<Arc<V>> {
        self.view_rx.clone()
    }

    pub fn trigger(&self) -> PollTrigger {
        PollTrigger {
            tx: self.poll_tx.clone(),
        }
    }

    pub fn poll_now(&self) {
        let _ = self.poll_tx.try_send(());
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Ends the loop. An in-flight request is not aborted; its result is
    /// discarded at the commit gate when it settles.
    pub fn stop(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            info!(session = self.name, "stopping poll session");
            // Nudge the loop in case it is idle in select.
            let _ = self.poll_tx.try_send(());
        }
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}

async fn run_cycle<V, F, Fut>(
    name: &str,
    cycle: &mut F,
    view_tx: &watch::Sender<Arc<V>>,
    active: &AtomicBool,
    last_seq: &mut u64,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(u64, V), CycleError>>,
{
    match cycle().await {
        Ok((seq, view)) => {
            if !active.load(Ordering::SeqCst) {
                debug!(session = name, seq, "session stopped; discarding result");
                return;
            }
            if seq <= *last_seq {
                warn!(
                    session = name,
                    seq,
                    last_seq = *last_seq,
                    "discarding stale result"
                );
                return;
            }
            *last_seq = seq;
            let _ = view_tx.send(Arc::new(view));
            debug!(session = name, seq, "view committed");
        }
        // Each tick is fault-isolated: the previous view stays visible and
        // the loop keeps ticking.
        Err(e) => warn!(session = name, error = %e, "poll cycle failed; keeping last view"),
    }
}

/// Steady-state session over `/api/pod-health`.
pub fn start_health_session(
    client: Arc<BackendClient>,
    every: Duration,
) -> PollSession<HealthView> {
    PollSession::start("pod-health", every, HealthView::default(), move || {
        let client = client.clone();
        async move {
            let snapshot = client.fetch_pod_health().await?;
            let (view, dropped) = reconcile(snapshot.seq, &snapshot.body);
            for err in &dropped {
                warn!(session = "pod-health", error = %err, "dropping malformed entity");
            }
            Ok((snapshot.seq, view))
        }
    })
}

/// Steady-state session over `/api/data`.
pub fn start_dashboard_session(
    client: Arc<BackendClient>,
    every: Duration,
) -> PollSession<DashboardView> {
    PollSession::start("dashboard", every, DashboardView::default(), move || {
        let client = client.clone();
        async move {
            let snapshot = client.fetch_dashboard().await?;
            let view = DashboardView::from_data(snapshot.seq, &snapshot.body);
            Ok((snapshot.seq, view))
        }
    })
}
