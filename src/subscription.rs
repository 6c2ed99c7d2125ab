use std::sync::{
    Arc, Mutex, PoisonError, Weak,
    mpsc::{self, Receiver, Sender},
};

use log::debug;
use rustc_hash::FxHashMap;

#[derive(Debug)]
struct Registry<T> {
    next_id: u64,
    senders: FxHashMap<u64, Sender<T>>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            senders: FxHashMap::default(),
        }
    }
}

/// Everyone listening for changes. Clones share the same set of listeners.
#[derive(Debug)]
pub struct Subscribers<T>(Arc<Mutex<Registry<T>>>);

impl<T> Clone for Subscribers<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self(Arc::new(Mutex::new(Registry::default())))
    }
}

impl<T: Clone> Subscribers<T> {
    /// Registers a new listener. `current` is the first value it receives.
    #[must_use]
    pub fn subscribe(&self, current: T) -> (Subscription<T>, Receiver<T>) {
        let (tx, rx) = mpsc::channel();
        let mut registry = self.0.lock().unwrap_or_else(PoisonError::into_inner);

        // The receiver is still in scope, so this can't fail.
        let _ok = tx.send(current);

        let id = registry.next_id;
        registry.next_id += 1;
        registry.senders.insert(id, tx);
        debug!("subscriber {id} added");

        (
            Subscription {
                id,
                registry: Some(Arc::downgrade(&self.0)),
            },
            rx,
        )
    }

    /// Sends `value` to every listener, dropping those whose receiver is gone.
    pub fn notify(&self, value: &T) {
        let mut registry = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        registry
            .senders
            .retain(|_, sender| sender.send(value.clone()).is_ok());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .senders
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle for one listener. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription<T> {
    id: u64,
    registry: Option<Weak<Mutex<Registry<T>>>>,
}

impl<T> Subscription<T> {
    /// Stops notifications. Calling it again, or after the store is gone,
    /// does nothing.
    pub fn unsubscribe(&mut self) {
        let Some(registry) = self.registry.take().and_then(|weak| weak.upgrade()) else {
            return;
        };

        let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
        if registry.senders.remove(&self.id).is_some() {
            debug!("subscriber {} removed", self.id);
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::Subscribers;

    #[test]
    fn first_value_is_the_current_state() {
        let subscribers = Subscribers::default();
        let (_subscription, rx) = subscribers.subscribe(3);
        assert_eq!(rx.try_recv(), Ok(3));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn notify_reaches_every_subscriber() {
        let subscribers = Subscribers::default();
        let (_first, rx_1) = subscribers.subscribe(0);
        let (_second, rx_2) = subscribers.subscribe(0);

        subscribers.notify(&7);
        assert_eq!(rx_1.try_iter().collect::<Vec<_>>(), [0, 7]);
        assert_eq!(rx_2.try_iter().collect::<Vec<_>>(), [0, 7]);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let subscribers = Subscribers::default();
        let (mut subscription, rx) = subscribers.subscribe(0);
        assert_eq!(subscribers.len(), 1);

        subscription.unsubscribe();
        subscription.unsubscribe();
        assert!(subscribers.is_empty());

        subscribers.notify(&1);
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), [0]);
    }

    #[test]
    fn drop_unsubscribes() {
        let subscribers = Subscribers::<u8>::default();
        {
            let (_subscription, _rx) = subscribers.subscribe(0);
            assert_eq!(subscribers.len(), 1);
        }
        assert!(subscribers.is_empty());
    }

    #[test]
    fn dead_receivers_are_pruned() {
        let subscribers = Subscribers::default();
        let (subscription, rx) = subscribers.subscribe("");
        drop(rx);

        subscribers.notify(&"hello");
        assert!(subscribers.is_empty());
        drop(subscription);
    }

    #[test]
    fn unsubscribe_after_registry_is_gone() {
        let subscribers = Subscribers::<u8>::default();
        let (mut subscription, _rx) = subscribers.subscribe(0);
        drop(subscribers);

        subscription.unsubscribe();
    }
}
