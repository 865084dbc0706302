use std::collections::BTreeMap;

use super::PresentationEvent;

/// An event with its absolute due time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueuedEvent {
    pub due_ms: u64,
    pub seq: u64,
    pub event: PresentationEvent,
}

/// Bounded delay queue for presentation playback.
///
/// Events play in `(due, insertion)` order. When full, the oldest inserted
/// event is dropped to make room.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventQueue {
    capacity: usize,
    next_seq: u64,
    entries: BTreeMap<(u64, u64), PresentationEvent>,
}

impl EventQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            next_seq: 0,
            entries: BTreeMap::new(),
        }
    }

    /// Schedules `event` at `now_ms + event.delay_ms`.
    ///
    /// Returns the event evicted to make room, if any.
    pub fn push(&mut self, now_ms: u64, event: PresentationEvent) -> Option<QueuedEvent> {
        if self.capacity == 0 {
            return None;
        }
        let evicted = if self.entries.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        let due = now_ms.saturating_add(event.delay_ms);
        self.entries.insert((due, seq), event);
        evicted
    }

    fn evict_oldest(&mut self) -> Option<QueuedEvent> {
        let key = self.entries.keys().min_by_key(|(_, seq)| *seq).copied()?;
        let event = self.entries.remove(&key)?;
        tracing::debug!(target: "combat::events", seq = key.1, "event queue full; dropping oldest");
        Some(QueuedEvent {
            due_ms: key.0,
            seq: key.1,
            event,
        })
    }

    /// Removes and returns every event due at or before `now_ms`, in play order.
    pub fn pop_ready(&mut self, now_ms: u64) -> Vec<PresentationEvent> {
        let pending = match now_ms.checked_add(1) {
            Some(bound) => self.entries.split_off(&(bound, 0)),
            None => BTreeMap::new(),
        };
        let ready = std::mem::replace(&mut self.entries, pending);
        ready.into_values().collect()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.entries.keys().next().map(|(due, _)| *due)
    }

    /// Drops everything. Returns how many events were purged.
    pub fn purge(&mut self) -> usize {
        let purged = self.entries.len();
        self.entries.clear();
        purged
    }

    pub fn iter(&self) -> impl Iterator<Item = QueuedEvent> + '_ {
        self.entries.iter().map(|(&(due_ms, seq), event)| QueuedEvent {
            due_ms,
            seq,
            event: event.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
