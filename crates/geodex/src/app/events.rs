//! Subscriber fan-out over crossbeam channels

use crossbeam_channel::{Receiver, Sender};

/// A set of subscribers receiving cloned events
///
/// Subscribers that dropped their receiver are pruned on the next notify.
pub struct Observers<E> {
    senders: Vec<Sender<E>>,
}

impl<E: Clone> Observers<E> {
    pub fn new() -> Self {
        Self {
            senders: Vec::new(),
        }
    }

    /// Register a new subscriber
    pub fn subscribe(&mut self) -> Receiver<E> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.senders.push(tx);
        rx
    }

    /// Deliver `event` to every live subscriber
    pub fn notify(&mut self, event: &E) {
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl<E: Clone> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_receives() {
        let mut observers = Observers::new();
        let a = observers.subscribe();
        let b = observers.subscribe();

        observers.notify(&7u32);

        assert_eq!(a.try_recv(), Ok(7));
        assert_eq!(b.try_recv(), Ok(7));
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut observers = Observers::new();
        let kept = observers.subscribe();
        let dropped = observers.subscribe();
        drop(dropped);

        observers.notify(&"hello");
        assert_eq!(observers.senders.len(), 1);
        assert_eq!(kept.try_recv(), Ok("hello"));
    }

    #[test]
    fn test_notify_without_subscribers() {
        let mut observers: Observers<u8> = Observers::default();
        observers.notify(&1);
        assert!(observers.senders.is_empty());
    }
}
