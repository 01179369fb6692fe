//! Event bus - the only path from the engine to outside systems
//!
//! Collaborators are boxed and owned by the bus. They see every event after the grid state
//! that produced it is final, and may answer with a [`Signal`] the engine acts on once the
//! current step completes.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::types::GameEvent;

/// Events kept for [`EventBus::take_events`]; older ones are dropped once the outbox is full
pub const MAX_PENDING_EVENTS: usize = 4096;

/// Messages a collaborator can send back to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Signal {
    BossDefeated,
}

/// External consumer of engine events (scoring, audio, animation, boss)
pub trait Collaborator {
    fn on_event(&mut self, event: &GameEvent) -> Option<Signal>;
}

/// Shared handles let the caller keep reading a collaborator's state after subscribing it
impl<T: Collaborator> Collaborator for Rc<RefCell<T>> {
    fn on_event(&mut self, event: &GameEvent) -> Option<Signal> {
        self.borrow_mut().on_event(event)
    }
}

/// Forwards every event into an mpsc channel. A dropped receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<GameEvent>,
}

impl ChannelSink {
    pub fn new(tx: Sender<GameEvent>) -> Self {
        Self { tx }
    }
}

impl Collaborator for ChannelSink {
    fn on_event(&mut self, event: &GameEvent) -> Option<Signal> {
        let _ = self.tx.send(event.clone());
        None
    }
}

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Box<dyn Collaborator>>,
    outbox: VecDeque<GameEvent>,
    dropped: u64,
    signals: Vec<Signal>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, collaborator: Box<dyn Collaborator>) {
        self.subscribers.push(collaborator);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver to every subscriber in registration order, then append to the outbox
    pub fn publish(&mut self, event: GameEvent) {
        trace!(event = event.name(), "publish");
        for subscriber in &mut self.subscribers {
            if let Some(signal) = subscriber.on_event(&event) {
                self.signals.push(signal);
            }
        }
        if self.outbox.len() >= MAX_PENDING_EVENTS {
            if self.dropped == 0 {
                warn!(limit = MAX_PENDING_EVENTS, "event outbox full, dropping oldest events");
            }
            self.outbox.pop_front();
            self.dropped += 1;
        }
        self.outbox.push_back(event);
    }

    /// Drain the outbox
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.outbox.drain(..).collect()
    }

    pub fn pending_events(&self) -> impl Iterator<Item = &GameEvent> {
        self.outbox.iter()
    }

    pub fn pending_len(&self) -> usize {
        self.outbox.len()
    }

    /// Events discarded because nobody drained the outbox in time
    pub fn dropped_events(&self) -> u64 {
        self.dropped
    }

    /// Drain signals raised since the last call
    pub fn take_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("outbox", &self.outbox.len())
            .field("dropped", &self.dropped)
            .field("signals", &self.signals)
            .finish()
    }
}
