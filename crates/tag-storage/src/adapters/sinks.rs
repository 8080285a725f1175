//! # Event Sinks
//!
//! `EventSink` implementations: forward to `tracing`, record, or discard.

use crate::domain::events::StorageEvent;
use crate::ports::outbound::EventSink;
use parking_lot::Mutex;
use std::sync::Arc;

/// Forwards events to `tracing` (debug for per-block activity, info otherwise).
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &StorageEvent) {
        match event {
            StorageEvent::SectorAuthenticated { sector, attempts } => {
                tracing::debug!(sector, attempts, "[tag] sector authenticated");
            }
            StorageEvent::BlockSkipped { block, reason } => {
                tracing::debug!(block, ?reason, "[tag] reserved block skipped");
            }
            StorageEvent::BlockRetry { block, attempt } => {
                tracing::debug!(block, attempt, "[tag] retrying block");
            }
            StorageEvent::ExtentWritten {
                start,
                last_block,
                bytes,
            } => {
                tracing::debug!(start, last_block, bytes, "[tag] extent written");
            }
            StorageEvent::ExtentRead { start, bytes } => {
                tracing::debug!(start, bytes, "[tag] extent read");
            }
            StorageEvent::MediumDetected { uid } => {
                tracing::info!(%uid, "[tag] tag detected");
            }
            StorageEvent::MediumReleased => {
                tracing::info!("[tag] tag released");
            }
            StorageEvent::DictionaryLoaded { entries } => {
                tracing::info!(entries, "[tag] dictionary loaded");
            }
            StorageEvent::DictionarySaved { entries, bytes } => {
                tracing::debug!(entries, bytes, "[tag] dictionary saved");
            }
            StorageEvent::DictionaryInvalidated { reason } => {
                tracing::debug!(?reason, "[tag] dictionary snapshot invalidated");
            }
        }
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &StorageEvent) {}
}

/// Keeps every event for later inspection.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<StorageEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the events recorded so far.
    pub fn events(&self) -> Vec<StorageEvent> {
        self.events.lock().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<StorageEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Number of recorded events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&StorageEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| predicate(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &StorageEvent) {
        self.events.lock().push(event.clone());
    }
}
