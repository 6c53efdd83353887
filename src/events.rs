//! Synchronous in-process notifications from the game manager.
//!
//! Each manager owns its own [`EventBus`]. Listeners run in registration order
//! inside [`EventBus::emit`] and only see an immutable event, so they cannot
//! re-enter the match while it is being mutated.

use crate::board::ShipId;
use crate::common::{AttackOutcome, Coord};
use crate::game::GameState;
use crate::ship::Orientation;

/// Everything a presentation layer needs to follow a match.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum GameEvent {
    ShipPlaced {
        player: usize,
        ship: ShipId,
        length: usize,
        start: Coord,
        orientation: Orientation,
    },
    ShipMoved {
        player: usize,
        ship: ShipId,
        start: Coord,
        orientation: Orientation,
    },
    MoveRejected {
        player: usize,
        ship: ShipId,
        reason: String,
    },
    TurnChanged {
        previous: Option<usize>,
        next: usize,
        turn: u32,
    },
    AttackResolved {
        attacker: usize,
        target: usize,
        coord: Coord,
        outcome: AttackOutcome,
    },
    StateChanged {
        old: GameState,
        new: GameState,
    },
    GameOver {
        winner: String,
    },
}

/// Discriminant of a [`GameEvent`], used to subscribe to one kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ShipPlaced,
    ShipMoved,
    MoveRejected,
    TurnChanged,
    AttackResolved,
    StateChanged,
    GameOver,
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::ShipPlaced { .. } => EventKind::ShipPlaced,
            GameEvent::ShipMoved { .. } => EventKind::ShipMoved,
            GameEvent::MoveRejected { .. } => EventKind::MoveRejected,
            GameEvent::TurnChanged { .. } => EventKind::TurnChanged,
            GameEvent::AttackResolved { .. } => EventKind::AttackResolved,
            GameEvent::StateChanged { .. } => EventKind::StateChanged,
            GameEvent::GameOver { .. } => EventKind::GameOver,
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
pub type ListenerId = usize;

type Callback = Box<dyn FnMut(&GameEvent)>;

struct Listener {
    id: ListenerId,
    filter: Option<EventKind>,
    callback: Callback,
}

#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
    next_id: ListenerId,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every event.
    pub fn subscribe<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&GameEvent) + 'static,
    {
        self.add(None, Box::new(callback))
    }

    /// Receive only events of `kind`.
    pub fn subscribe_to<F>(&mut self, kind: EventKind, callback: F) -> ListenerId
    where
        F: FnMut(&GameEvent) + 'static,
    {
        self.add(Some(kind), Box::new(callback))
    }

    fn add(&mut self, filter: Option<EventKind>, callback: Callback) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            filter,
            callback,
        });
        id
    }

    /// Returns `false` if no listener had that id.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn emit(&mut self, event: &GameEvent) {
        let kind = event.kind();
        for listener in self.listeners.iter_mut() {
            if listener.filter.map_or(true, |f| f == kind) {
                (listener.callback)(event);
            }
        }
    }
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
