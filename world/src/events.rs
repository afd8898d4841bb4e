use std::collections::HashMap;

use push_knight_core::{CellCoord, Event, EventKind};

/// De-duplicating event sink drained in priority order.
///
/// Events sharing a kind and target cell collapse into the latest one. Impact
/// events carry a sequence number in their key and never collapse.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<Event>,
    slots: HashMap<EventKey, usize>,
    impacts: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct EventKey {
    kind: EventKind,
    cell: CellCoord,
    sequence: Option<u64>,
}

impl EventQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an event, replacing an earlier one with the same key.
    pub fn push(&mut self, event: Event) {
        let kind = event.kind();
        let sequence = if kind == EventKind::Impact {
            self.impacts = self.impacts.wrapping_add(1);
            Some(self.impacts)
        } else {
            None
        };
        let key = EventKey {
            kind,
            cell: event.target(),
            sequence,
        };

        match self.slots.get(&key) {
            Some(&slot) => self.events[slot] = event,
            None => {
                let _ = self.slots.insert(key, self.events.len());
                self.events.push(event);
            }
        }
    }

    /// Removes every pending event, ordered by kind priority and then by
    /// first insertion.
    pub fn drain(&mut self) -> Vec<Event> {
        self.slots.clear();
        let mut events = std::mem::take(&mut self.events);
        events.sort_by_key(Event::kind);
        events
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use push_knight_core::Health;

    #[test]
    fn later_event_with_same_key_overwrites() {
        let mut queue = EventQueue::new();
        let cell = CellCoord::new(4, 4);
        queue.push(Event::EnemyDamaged {
            cell,
            health: Health::new(2),
        });
        queue.push(Event::EnemyDamaged {
            cell,
            health: Health::new(1),
        });

        assert_eq!(queue.len(), 1);
        assert_eq!(
            queue.drain(),
            vec![Event::EnemyDamaged {
                cell,
                health: Health::new(1),
            }]
        );
    }

    #[test]
    fn impacts_never_collapse() {
        let mut queue = EventQueue::new();
        let cell = CellCoord::new(1, 1);
        queue.push(Event::Impact { cell });
        queue.push(Event::Impact { cell });
        assert_eq!(queue.drain().len(), 2);
    }

    #[test]
    fn drain_sorts_by_priority_and_empties() {
        let mut queue = EventQueue::new();
        let a = CellCoord::new(0, 0);
        let b = CellCoord::new(1, 0);
        queue.push(Event::PlayerMoved { from: a, to: b });
        queue.push(Event::Impact { cell: b });
        queue.push(Event::EnemyDamaged {
            cell: b,
            health: Health::new(1),
        });
        queue.push(Event::EntityRemoved { cell: a });
        queue.push(Event::EnemyMoved {
            from: a,
            to: b,
            health: Health::new(1),
        });

        let kinds: Vec<EventKind> = queue.drain().iter().map(Event::kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::EnemyMove,
                EventKind::Damage,
                EventKind::RemoveEntity,
                EventKind::Impact,
                EventKind::PlayerMove,
            ]
        );
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }
}
