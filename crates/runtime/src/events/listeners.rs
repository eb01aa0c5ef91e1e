//! Synchronous event listeners.
//!
//! Listeners fire in registration order, on the thread that executed the
//! command, before control returns to the caller. Unit-scoped listeners are
//! dropped once their unit is destroyed.

use tactics_core::{GameEvent, UnitId};

use super::Topic;

/// Handle returned by [`Listeners::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Which events a listener receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerScope {
    All,
    Topic(Topic),
    /// Events that involve the unit as subject, attacker or healer.
    Unit(UnitId),
}

impl ListenerScope {
    fn matches(&self, event: &GameEvent) -> bool {
        match self {
            ListenerScope::All => true,
            ListenerScope::Topic(topic) => Topic::of(event) == *topic,
            ListenerScope::Unit(unit) => involves(event, *unit),
        }
    }
}

fn involves(event: &GameEvent, unit: UnitId) -> bool {
    match event {
        GameEvent::UnitAttacked { attacker, target, .. } => *attacker == unit || *target == unit,
        GameEvent::UnitHealed { healer, target, .. } => *healer == unit || *target == unit,
        GameEvent::StructureCaptured { unit: capturer, structure } => {
            *capturer == unit || *structure == unit
        }
        other => other.subject() == Some(unit),
    }
}

type Callback = Box<dyn FnMut(&GameEvent) + Send>;

struct Entry {
    id: ListenerId,
    scope: ListenerScope,
    callback: Callback,
}

#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<Entry>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        scope: ListenerScope,
        callback: impl FnMut(&GameEvent) + Send + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            scope,
            callback: Box::new(callback),
        });
        id
    }

    /// Returns whether a listener was removed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn notify(&mut self, event: &GameEvent) {
        for entry in &mut self.entries {
            if entry.scope.matches(event) {
                (entry.callback)(event);
            }
        }
        if let GameEvent::UnitDestroyed { unit, .. } = event {
            self.remove_unit(*unit);
        }
    }

    /// Drops every listener scoped to `unit`.
    pub fn remove_unit(&mut self, unit: UnitId) {
        self.entries
            .retain(|entry| entry.scope != ListenerScope::Unit(unit));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
