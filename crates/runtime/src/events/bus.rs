//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tokio::sync::broadcast;

use tactics_core::GameEvent;

/// Topics for event routing
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::EnumIter, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Topic {
    /// Match lifecycle: initialization, start, end
    Game,
    /// Turn boundaries
    Turn,
    /// Unit placement, movement, combat and ownership
    Unit,
}

impl Topic {
    pub fn of(event: &GameEvent) -> Self {
        match event {
            GameEvent::GameInitialized | GameEvent::GameStarted | GameEvent::GameEnded { .. } => {
                Topic::Game
            }
            GameEvent::TurnStarted { .. } | GameEvent::TurnEnded { .. } => Topic::Turn,
            GameEvent::UnitPlaced { .. }
            | GameEvent::UnitMoved { .. }
            | GameEvent::UnitAttacked { .. }
            | GameEvent::UnitHealed { .. }
            | GameEvent::StructureCaptured { .. }
            | GameEvent::HealthChanged { .. }
            | GameEvent::UnitDestroyed { .. }
            | GameEvent::OwnerChanged { .. }
            | GameEvent::UnitRestored { .. } => Topic::Unit,
        }
    }
}

/// Topic-based event bus
///
/// Consumers subscribe to the topics they care about. Publishing never
/// blocks; a receiver that falls more than the channel capacity behind
/// observes `RecvError::Lagged`.
#[derive(Clone, Debug)]
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<GameEvent>>>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a bus with `capacity` buffered events per topic.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let channels = Topic::iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();
        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: GameEvent) {
        let topic = Topic::of(&event);
        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!(target: "tactics::events", %topic, "no subscribers");
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<GameEvent> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // Every topic gets a channel in `with_capacity`.
            None => broadcast::channel(1).1,
        }
    }

    /// Subscribe to several topics at once.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<GameEvent>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.channels
            .get(&topic)
            .map_or(0, broadcast::Sender::receiver_count)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::UnitId;

    #[test]
    fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut units = bus.subscribe(Topic::Unit);
        let mut turns = bus.subscribe(Topic::Turn);

        bus.publish(GameEvent::UnitRestored { unit: UnitId(3) });
        bus.publish(GameEvent::GameStarted);

        assert_eq!(
            units.try_recv().unwrap(),
            GameEvent::UnitRestored { unit: UnitId(3) }
        );
        assert!(units.try_recv().is_err());
        assert!(turns.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(GameEvent::GameInitialized);
        assert_eq!(bus.subscriber_count(Topic::Game), 0);
    }
}
