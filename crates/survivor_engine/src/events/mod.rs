//! Per-frame event queue
//!
//! Producers `send` events while a frame is simulated and consumers `drain`
//! them once the frame is done, in send order.

/// Typed event queue
#[derive(Debug, Clone)]
pub struct EventQueue<E> {
    pending: Vec<E>,
}

impl<E> EventQueue<E> {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self { pending: Vec::new() }
    }

    /// Send event for delivery on the next drain
    pub fn send(&mut self, event: E) {
        self.pending.push(event);
    }

    /// Take every queued event
    pub fn drain(&mut self) -> Vec<E> {
        std::mem::take(&mut self.pending)
    }

    /// Number of queued events
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Clear all queued events (useful for state transitions)
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        Hit(u32),
        Spawn,
    }

    #[test]
    fn test_events_drain_in_send_order() {
        let mut queue = EventQueue::new();
        queue.send(TestEvent::Hit(1));
        queue.send(TestEvent::Spawn);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain(), vec![TestEvent::Hit(1), TestEvent::Spawn]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut queue = EventQueue::new();
        queue.send(TestEvent::Spawn);
        queue.send(TestEvent::Hit(3));
        queue.clear();
        assert!(queue.drain().is_empty());
    }
}
