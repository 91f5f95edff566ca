//! Shared busy flag and error notifications for routed edits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::traits::NotificationSink;

/// User-facing notification, serialized as `{"type": "error", "message": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Notification {
    Error { message: String },
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Notification::Error {
            message: message.into(),
        }
    }
}

/// Sink that logs notifications through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Error { message } => tracing::warn!(%message, "route edit failed"),
        }
    }
}

/// In-memory sink, drained by the host (or tests).
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        match self.entries.lock() {
            Ok(mut entries) => std::mem::take(&mut *entries),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for NotificationLog {
    fn notify(&self, notification: Notification) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}

/// Busy flag plus error channel, shared by every routed edit.
///
/// The flag is an in-flight count so overlapping requests cannot clear it
/// early. Clones share the same state.
#[derive(Clone)]
pub struct LoadingSignal {
    in_flight: Arc<AtomicUsize>,
    sink: Arc<dyn NotificationSink>,
}

impl LoadingSignal {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            in_flight: Arc::new(AtomicUsize::new(0)),
            sink,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Marks a request in flight until the returned guard is dropped.
    pub fn begin(&self) -> BusyGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        BusyGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// Emits one error notification for a failed edit.
    pub fn report(&self, error: &EditError) {
        self.sink.notify(Notification::error(error.to_string()));
    }
}

impl Default for LoadingSignal {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl std::fmt::Debug for LoadingSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingSignal")
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Clears its share of the busy flag on drop, on every exit path.
#[derive(Debug)]
pub struct BusyGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
