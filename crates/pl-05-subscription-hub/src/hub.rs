//! Observer registry and fan-out.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use presence_telemetry::{FRAMES_DELIVERED, OBSERVERS_CONNECTED, OBSERVERS_EVICTED};
use shared_types::{ChangePublisher, Event, ServerMessage};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, warn};

use crate::errors::HubError;

/// A serialized text frame, shared by every observer it is sent to.
pub type Frame = Arc<str>;

/// Unique per hub; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obs-{}", self.0)
    }
}

/// Hub limits.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Frames buffered per observer before it counts as too slow.
    pub queue_depth: usize,
    /// Maximum simultaneous observers.
    pub max_observers: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            queue_depth: 256,
            max_observers: 1024,
        }
    }
}

/// Receiving half handed to the connection that owns the observer.
#[derive(Debug)]
pub struct Subscription {
    pub id: ObserverId,
    pub frames: mpsc::Receiver<Frame>,
}

/// Membership registry plus fan-out.
pub struct SubscriptionHub {
    observers: DashMap<ObserverId, mpsc::Sender<Frame>>,
    /// Slots taken against `max_observers`; reserved before the insert.
    occupied: AtomicUsize,
    next_id: AtomicU64,
    config: HubConfig,
}

impl SubscriptionHub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            observers: DashMap::new(),
            occupied: AtomicUsize::new(0),
            next_id: AtomicU64::new(1),
            config,
        }
    }

    /// Register a new observer.
    pub fn subscribe(&self) -> Result<Subscription, HubError> {
        let limit = self.config.max_observers;
        if self
            .occupied
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < limit).then_some(n + 1)
            })
            .is_err()
        {
            warn!(limit, "Observer limit reached");
            return Err(HubError::Full { limit });
        }

        let id = ObserverId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (tx, rx) = mpsc::channel(self.config.queue_depth.max(1));
        self.observers.insert(id, tx);
        OBSERVERS_CONNECTED.inc();

        debug!(observer = %id, observers = self.observers.len(), "Observer subscribed");
        Ok(Subscription { id, frames: rx })
    }

    /// Remove an observer. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        if self.observers.remove(&id).is_some() {
            self.occupied.fetch_sub(1, Ordering::SeqCst);
            OBSERVERS_CONNECTED.dec();
            debug!(observer = %id, "Observer unsubscribed");
            true
        } else {
            false
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Deliver `message` to every currently subscribed observer.
    ///
    /// Returns how many observers it was queued for.
    pub fn broadcast(&self, message: &ServerMessage) -> usize {
        let frame = match encode(message) {
            Ok(frame) => frame,
            Err(e) => {
                error!(error = %e, action = message.action(), "Dropping unencodable broadcast");
                return 0;
            }
        };

        let targets: Vec<(ObserverId, mpsc::Sender<Frame>)> = self
            .observers
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        let mut delivered = 0;
        for (id, sender) in targets {
            if self.deliver(id, &sender, Arc::clone(&frame)).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Queue `message` for one observer (query responses).
    pub fn send_to(&self, id: ObserverId, message: &ServerMessage) -> Result<(), HubError> {
        let sender = self
            .observers
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(HubError::UnknownObserver(id))?;
        let frame = encode(message)?;
        self.deliver(id, &sender, frame)
    }

    fn deliver(
        &self,
        id: ObserverId,
        sender: &mpsc::Sender<Frame>,
        frame: Frame,
    ) -> Result<(), HubError> {
        match sender.try_send(frame) {
            Ok(()) => {
                FRAMES_DELIVERED.inc();
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                warn!(observer = %id, depth = self.config.queue_depth, "Observer too slow, evicting");
                self.evict(id);
                Err(HubError::Evicted(id))
            }
            Err(TrySendError::Closed(_)) => {
                debug!(observer = %id, "Observer channel closed, pruning");
                self.evict(id);
                Err(HubError::Evicted(id))
            }
        }
    }

    fn evict(&self, id: ObserverId) {
        if self.unsubscribe(id) {
            OBSERVERS_EVICTED.inc();
        }
    }
}

impl Default for SubscriptionHub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}

impl ChangePublisher for SubscriptionHub {
    fn publish_change(&self, event: &Event) -> usize {
        self.broadcast(&ServerMessage::tag_modified(event.clone()))
    }
}

fn encode(message: &ServerMessage) -> Result<Frame, HubError> {
    message
        .to_frame()
        .map(Frame::from)
        .map_err(|e| HubError::Encoding(e.to_string()))
}
