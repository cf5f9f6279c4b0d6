// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Event Bus Implementation - Pub/Sub for Swarm Events
//
// In-memory fan-out over a tokio broadcast channel. The CLI subscribes to
// print progress; tests subscribe to assert on the event sequence.
// Events published with no subscribers are dropped.

use crate::domain::events::SwarmEvent;
use crate::domain::swarm::SwarmId;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct SwarmEventBus {
    sender: Arc<broadcast::Sender<SwarmEvent>>,
}

impl SwarmEventBus {
    /// Capacity bounds how many events a slow subscriber may fall behind
    /// before it starts losing the oldest ones.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(1000)
    }

    pub fn publish(&self, event: SwarmEvent) {
        debug!("Publishing event: {:?}", event);
        if self.sender.send(event).is_err() {
            debug!("No subscribers listening to event");
        }
    }

    pub fn subscribe(&self) -> SwarmEventReceiver {
        SwarmEventReceiver {
            receiver: self.sender.subscribe(),
            swarm_id: None,
        }
    }

    /// Subscribe to the events of a single swarm run
    pub fn subscribe_swarm(&self, swarm_id: SwarmId) -> SwarmEventReceiver {
        SwarmEventReceiver {
            receiver: self.sender.subscribe(),
            swarm_id: Some(swarm_id),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SwarmEventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

pub struct SwarmEventReceiver {
    receiver: broadcast::Receiver<SwarmEvent>,
    swarm_id: Option<SwarmId>,
}

impl SwarmEventReceiver {
    /// Wait for the next matching event
    pub async fn recv(&mut self) -> Result<SwarmEvent, EventBusError> {
        loop {
            let event = self.receiver.recv().await.map_err(|e| match e {
                broadcast::error::RecvError::Closed => EventBusError::Closed,
                broadcast::error::RecvError::Lagged(n) => {
                    warn!("Event receiver lagged by {} events", n);
                    EventBusError::Lagged(n)
                }
            })?;
            if self.matches(&event) {
                return Ok(event);
            }
        }
    }

    pub fn try_recv(&mut self) -> Result<SwarmEvent, EventBusError> {
        loop {
            let event = self.receiver.try_recv().map_err(|e| match e {
                broadcast::error::TryRecvError::Empty => EventBusError::Empty,
                broadcast::error::TryRecvError::Closed => EventBusError::Closed,
                broadcast::error::TryRecvError::Lagged(n) => {
                    warn!("Event receiver lagged by {} events", n);
                    EventBusError::Lagged(n)
                }
            })?;
            if self.matches(&event) {
                return Ok(event);
            }
        }
    }

    /// Drain every event already buffered for this receiver
    pub fn drain(&mut self) -> Vec<SwarmEvent> {
        std::iter::from_fn(|| self.try_recv().ok()).collect()
    }

    fn matches(&self, event: &SwarmEvent) -> bool {
        self.swarm_id.is_none_or(|id| event.swarm_id() == id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EventBusError {
    #[error("Event bus is closed")]
    Closed,

    #[error("No events available")]
    Empty,

    #[error("Receiver lagged by {0} events (events were dropped)")]
    Lagged(u64),
}
