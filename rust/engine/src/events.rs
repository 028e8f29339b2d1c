use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::cards::Card;
use crate::config::Variant;
use crate::engine::RevealedHand;
use crate::logger::{HandAction, SeatRecord, Street};
use crate::player::PlayerId;
use crate::pot::Pot;

// Bounded so a stalled observer cannot grow memory; it gets pruned instead.
const EVENT_CHANNEL_BUFFER: usize = 1000;

pub type EventSender = mpsc::Sender<TableEvent>;
pub type EventReceiver = mpsc::Receiver<TableEvent>;

/// Everything an observer can learn about a table. Face-down cards only
/// appear in `HandComplete::revealed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableEvent {
    HandStarted {
        hand_id: String,
        variant: Variant,
        button: usize,
        seats: Vec<SeatRecord>,
    },
    CardsDealt {
        player_id: PlayerId,
        street: Street,
        face_down: usize,
        face_up: Vec<Card>,
    },
    StreetAdvanced {
        street: Street,
        revealed: Vec<Card>,
    },
    ActionTaken {
        seq: u64,
        player_id: PlayerId,
        street: Street,
        action: HandAction,
        stack: u32,
    },
    RoundComplete {
        street: Street,
    },
    PotsSettled {
        pots: Vec<Pot>,
    },
    HandComplete {
        hand_id: String,
        deltas: BTreeMap<PlayerId, i64>,
        revealed: BTreeMap<PlayerId, RevealedHand>,
        uncontested: bool,
    },
}

/// Live subscription; dropping it unsubscribes.
pub struct EventSubscription {
    bus: EventBus,
    subscriber_id: usize,
    receiver: EventReceiver,
}

impl EventSubscription {
    pub fn receiver(&mut self) -> &mut EventReceiver {
        &mut self.receiver
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.subscriber_id);
    }
}

/// Publish/subscribe hub for one table's events.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<Vec<(usize, EventSender)>>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> EventSubscription {
        let (subscriber_id, receiver) = self.subscribe_raw();
        EventSubscription {
            bus: self.clone(),
            subscriber_id,
            receiver,
        }
    }

    fn subscribe_raw(&self) -> (usize, EventReceiver) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        self.inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, tx));
        tracing::debug!(subscriber_id = id, "observer subscribed to table events");
        (id, rx)
    }

    /// Delivers to every subscriber without blocking. Subscribers whose
    /// channel is full or closed are dropped.
    pub fn publish(&self, event: TableEvent) {
        let subscribers = self
            .inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut failed = Vec::new();
        for (id, sender) in subscribers {
            if let Err(e) = sender.try_send(event.clone()) {
                tracing::warn!(subscriber_id = id, error = %e, "dropping table event subscriber");
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(&failed);
        }
    }

    pub fn unsubscribe(&self, subscriber_id: usize) {
        self.remove_subscribers(&[subscriber_id]);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn remove_subscribers(&self, ids: &[usize]) {
        self.inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(id, _)| !ids.contains(id));
    }
}
