//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::CombatEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Actions, encounters, ticks and presentation beats
    Combat,
    /// Reward signals
    Rewards,
    /// Pause changes and state digests
    State,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Combat, Topic::Rewards, Topic::State];
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks: a lagging subscriber
/// loses the oldest events.
#[derive(Clone)]
pub struct EventBus {
    combat: broadcast::Sender<CombatEvent>,
    rewards: broadcast::Sender<CombatEvent>,
    state: broadcast::Sender<CombatEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            combat: broadcast::channel(capacity).0,
            rewards: broadcast::channel(capacity).0,
            state: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<CombatEvent> {
        match topic {
            Topic::Combat => &self.combat,
            Topic::Rewards => &self.rewards,
            Topic::State => &self.state,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: CombatEvent) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!(target: "runtime::events", ?topic, "no subscribers");
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<CombatEvent> {
        self.sender(topic).subscribe()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.sender(topic).receiver_count()
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
    use combat_core::PauseReason;

    #[tokio::test]
    async fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(4);
        let mut state_rx = bus.subscribe(Topic::State);
        let mut combat_rx = bus.subscribe(Topic::Combat);

        bus.publish(CombatEvent::Paused(PauseReason::Manual));

        let event = state_rx.recv().await.unwrap();
        assert!(matches!(event, CombatEvent::Paused(PauseReason::Manual)));
        assert!(combat_rx.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(CombatEvent::PlayerDefeated { clock_ms: 0 });
        assert_eq!(bus.subscriber_count(Topic::Combat), 0);
    }
}
