use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::debug;

use crate::models::views::{HealthView, PodKey};

/// Named ownership point for one transient UI-bound resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    PodDetails,
    PodLogs,
}

impl Slot {
    pub fn name(&self) -> &'static str {
        match self {
            Slot::PodDetails => "pod-details",
            Slot::PodLogs => "pod-logs",
        }
    }
}

/// A resource whose lifetime is bound to what is currently on screen.
/// `dispose` detaches listeners and releases handles; it must be safe to
/// call exactly once, and the manager guarantees it is.
pub trait ViewResource: Send {
    fn dispose(&mut self);
}

/// Holds at most one live resource per slot. Opening an occupied slot
/// disposes the previous occupant before the replacement is built, so at no
/// observable instant are two occupants live; closing an empty slot is a
/// no-op. Disposal runs synchronously under the slot lock.
#[derive(Default)]
pub struct SlotManager {
    slots: Mutex<HashMap<Slot, Box<dyn ViewResource>>>,
}

impl SlotManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open<F>(&self, slot: Slot, build: F)
    where
        F: FnOnce() -> Box<dyn ViewResource>,
    {
        let mut slots = self.slots.lock().unwrap();
        if let Some(mut previous) = slots.remove(&slot) {
            previous.dispose();
            debug!(slot = slot.name(), "previous occupant disposed");
        }
        slots.insert(slot, build());
    }

    pub fn close(&self, slot: Slot) {
        let mut slots = self.slots.lock().unwrap();
        if let Some(mut previous) = slots.remove(&slot) {
            previous.dispose();
            debug!(slot = slot.name(), "slot closed");
        }
    }

    pub fn is_open(&self, slot: Slot) -> bool {
        self.slots.lock().unwrap().contains_key(&slot)
    }
}

/// Detail panel for one pod; keeps a live subscription to committed health
/// views so the panel always renders from the latest data.
pub struct DetailPanel {
    key: PodKey,
    updates: Option<watch::Receiver<Arc<HealthView>>>,
}

impl DetailPanel {
    pub fn new(key: PodKey, updates: watch::Receiver<Arc<HealthView>>) -> Self {
        Self {
            key,
            updates: Some(updates),
        }
    }

    pub fn key(&self) -> &PodKey {
        &self.key
    }
}

impl ViewResource for DetailPanel {
    fn dispose(&mut self) {
        self.updates.take();
        debug!(pod = %self.key, "detail panel disposed");
    }
}

/// One fetched log payload, split into lines for display.
pub struct LogViewer {
    key: PodKey,
    lines: Vec<String>,
}

impl LogViewer {
    pub fn new(key: PodKey, raw: &str) -> Self {
        Self {
            key,
            lines: raw.lines().map(str::to_string).collect(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

impl ViewResource for LogViewer {
    fn dispose(&mut self) {
        self.lines.clear();
        debug!(pod = %self.key, "log viewer disposed");
    }
}
