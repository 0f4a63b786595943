use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Serialize)]
pub struct InstrumentationEvent {
    /// Sequence number within the emitting channel.
    pub id: u64,
    pub kind: String,
    pub timestamp: DateTime<Utc>,
    pub payload: Value,
}

/// Lifecycle and request events for exactly one connection pool.
///
/// Clones refer to the same channel; a fresh channel is only ever created
/// through [`EventChannel::new`].
#[derive(Debug, Clone)]
pub struct EventChannel {
    id: u64,
    sender: broadcast::Sender<InstrumentationEvent>,
    sequence: Arc<AtomicU64>,
}

impl EventChannel {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            id: NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed),
            sender,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InstrumentationEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, kind: impl Into<String>, payload: Value) {
        let event = InstrumentationEvent {
            id: self.sequence.fetch_add(1, Ordering::Relaxed),
            kind: kind.into(),
            timestamp: Utc::now(),
            payload,
        };
        // no subscribers is fine
        let _ = self.sender.send(event);
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}
