//! External event intake.
//!
//! The engine is driven by exactly three event kinds. They are queued in
//! arrival order and drained to completion once per frame; other threads
//! never touch engine state directly and instead enqueue through the
//! crossbeam [`EventBridge`].

use std::collections::VecDeque;

use bevy::prelude::Resource;
use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::{
    coords::{CellId, ViewBounds, WorldPos},
    interaction::{InteractionKind, InteractionRequest},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    PlayerMoved(WorldPos),
    ViewportChanged(ViewBounds),
    Interaction(InteractionRequest),
}

/// Ordered queue of pending events for the next frame.
#[derive(Resource, Debug, Default)]
pub struct InputQueue {
    pending: VecDeque<EngineEvent>,
}

impl InputQueue {
    pub fn push(&mut self, event: EngineEvent) {
        self.pending.push_back(event);
    }

    pub fn report_player_moved(&mut self, position: WorldPos) {
        self.push(EngineEvent::PlayerMoved(position));
    }

    pub fn report_viewport_bounds(&mut self, bounds: ViewBounds) {
        self.push(EngineEvent::ViewportChanged(bounds));
    }

    pub fn request_pickup(&mut self, cell: CellId) {
        self.push(EngineEvent::Interaction(InteractionRequest {
            kind: InteractionKind::Pickup,
            cell,
        }));
    }

    pub fn request_place(&mut self, cell: CellId) {
        self.push(EngineEvent::Interaction(InteractionRequest {
            kind: InteractionKind::Place,
            cell,
        }));
    }

    pub fn drain(&mut self) -> impl Iterator<Item = EngineEvent> + '_ {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Sending half of the event bridge, cloneable into UI or driver threads.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: Sender<EngineEvent>,
}

impl EventSender {
    /// Returns `false` once the engine side has been dropped.
    pub fn send(&self, event: EngineEvent) -> bool {
        self.sender.send(event).is_ok()
    }

    pub fn player_moved(&self, position: WorldPos) -> bool {
        self.send(EngineEvent::PlayerMoved(position))
    }

    pub fn viewport_changed(&self, bounds: ViewBounds) -> bool {
        self.send(EngineEvent::ViewportChanged(bounds))
    }

    pub fn request_pickup(&self, cell: CellId) -> bool {
        self.send(EngineEvent::Interaction(InteractionRequest {
            kind: InteractionKind::Pickup,
            cell,
        }))
    }

    pub fn request_place(&self, cell: CellId) -> bool {
        self.send(EngineEvent::Interaction(InteractionRequest {
            kind: InteractionKind::Place,
            cell,
        }))
    }
}

/// Receiving half, installed as a resource and drained at the head of each
/// frame.
#[derive(Resource, Debug)]
pub struct EventInbox {
    receiver: Receiver<EngineEvent>,
}

impl EventInbox {
    pub fn drain_into(&self, queue: &mut InputQueue) -> usize {
        let mut drained = 0;
        while let Ok(event) = self.receiver.try_recv() {
            queue.push(event);
            drained += 1;
        }
        drained
    }
}

pub fn event_bridge() -> (EventSender, EventInbox) {
    let (sender, receiver) = unbounded();
    (EventSender { sender }, EventInbox { receiver })
}
