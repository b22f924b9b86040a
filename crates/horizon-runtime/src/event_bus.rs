//! Event bus for simulation diagnostics

/// A simple event queue that the frame loop pushes to and callers drain
#[derive(Debug)]
pub struct EventBus<E> {
    events: Vec<E>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event onto the bus
    pub fn push(&mut self, event: E) {
        self.events.push(event);
    }

    /// Drain all events from the bus, returning them
    pub fn drain(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events)
    }

    /// Pending events, oldest first
    pub fn pending(&self) -> &[E] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::SimEvent;

    #[test]
    fn test_push_and_drain() {
        let mut bus = EventBus::new();
        assert!(bus.is_empty());

        bus.push(SimEvent::Grabbed { actor: 1, vertex: 5 });
        bus.push(SimEvent::Released { actor: 1, vertex: 5 });

        assert_eq!(bus.len(), 2);
        assert_eq!(bus.pending()[0], SimEvent::Grabbed { actor: 1, vertex: 5 });

        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_drain_clears() {
        let mut bus: EventBus<u32> = EventBus::new();
        bus.push(7);

        let _ = bus.drain();
        let events = bus.drain();
        assert!(events.is_empty());
    }
}
