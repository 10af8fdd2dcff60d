use crate::events::types::{PlatformEvent, PublishedEvent};
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Synchronous observer registered on the publisher
pub trait EventListener: Send + Sync {
    fn on_event(&self, event: &PublishedEvent);
}

impl<F> EventListener for F
where
    F: Fn(&PublishedEvent) + Send + Sync,
{
    fn on_event(&self, event: &PublishedEvent) {
        self(event)
    }
}

/// Event publisher for platform lifecycle events.
///
/// Delivery goes three ways: registered listeners are called synchronously in
/// registration order, async subscribers receive the event through a broadcast
/// channel, and the event is appended to a bounded in-memory history. The
/// history is append-only and may be written concurrently by background jobs
/// and foreground operations; sequence numbers are assigned under the history
/// lock so they match append order.
pub struct EventPublisher {
    sender: broadcast::Sender<PublishedEvent>,
    listeners: RwLock<Vec<Arc<dyn EventListener>>>,
    history: Mutex<EventHistory>,
}

struct EventHistory {
    events: VecDeque<PublishedEvent>,
    capacity: usize,
    next_sequence: u64,
}

impl std::fmt::Debug for EventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPublisher")
            .field("subscribers", &self.sender.receiver_count())
            .field("listeners", &self.listeners.read().len())
            .field("history_len", &self.history.lock().events.len())
            .finish()
    }
}

impl EventPublisher {
    /// Create a publisher with the given broadcast capacity and history bound
    pub fn new(buffer_size: usize, history_capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer_size.max(1));
        Self {
            sender,
            listeners: RwLock::new(Vec::new()),
            history: Mutex::new(EventHistory {
                events: VecDeque::new(),
                capacity: history_capacity,
                next_sequence: 0,
            }),
        }
    }

    /// Publish an event. Never fails; delivery is best effort.
    pub fn publish(&self, event: PlatformEvent) -> PublishedEvent {
        let published = {
            let mut history = self.history.lock();
            let published = PublishedEvent {
                sequence: history.next_sequence,
                name: event.name().to_string(),
                event,
                published_at: chrono::Utc::now(),
            };
            history.next_sequence += 1;
            if history.capacity > 0 {
                if history.events.len() == history.capacity {
                    history.events.pop_front();
                }
                history.events.push_back(published.clone());
            }
            published
        };

        let listeners: Vec<Arc<dyn EventListener>> = self.listeners.read().clone();
        for listener in &listeners {
            listener.on_event(&published);
        }

        // No subscribers is fine - we publish whether or not anyone listens
        if self.sender.send(published.clone()).is_err() && self.sender.receiver_count() > 0 {
            warn!(event = %published.name, "Failed to broadcast event to subscribers");
        }

        debug!(
            event = %published.name,
            sequence = published.sequence,
            listeners = listeners.len(),
            "Event published"
        );

        published
    }

    /// Register a synchronous listener
    pub fn add_listener(&self, listener: Arc<dyn EventListener>) {
        self.listeners.write().push(listener);
    }

    /// Subscribe to events asynchronously
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active async subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Snapshot of the retained history, oldest first
    pub fn history(&self) -> Vec<PublishedEvent> {
        self.history.lock().events.iter().cloned().collect()
    }

    /// Retained events with the given wire name, oldest first
    pub fn events_named(&self, name: &str) -> Vec<PublishedEvent> {
        self.history
            .lock()
            .events
            .iter()
            .filter(|event| event.name == name)
            .cloned()
            .collect()
    }

    /// Total number of events ever published
    pub fn published_count(&self) -> u64 {
        self.history.lock().next_sequence
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(1000, 10_000)
    }
}
