//! Change notifications
//!
//! Repositories publish an event after every successful mutation; readers
//! subscribe and re-run `list()` plus the derivation pipeline.

use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    ProductsChanged,
    CategoriesChanged,
    PreferencesChanged,
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Publish; having no subscribers is fine
    pub fn emit(&self, event: ChangeEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.emit(ChangeEvent::ProductsChanged);
        bus.emit(ChangeEvent::CategoriesChanged);

        assert_eq!(rx.recv().await.unwrap(), ChangeEvent::ProductsChanged);
        assert_eq!(rx.recv().await.unwrap(), ChangeEvent::CategoriesChanged);
    }

    #[test]
    fn test_emit_without_subscribers() {
        EventBus::new(1).emit(ChangeEvent::PreferencesChanged);
    }
}
