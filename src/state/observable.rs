//! Shared value holder that notifies subscribers on every change.

use std::sync::{Arc, Mutex, MutexGuard};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Inner<T> {
    value: T,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_id: u64,
}

/// Clones share the same value and subscriber list.
pub struct Observable<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value,
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> T {
        self.lock().value.clone()
    }

    pub fn set(&self, value: T) {
        self.update(|current| *current = value);
    }

    /// Mutates the value in place, then notifies subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let (value, listeners) = {
            let mut inner = self.lock();
            f(&mut inner.value);
            let listeners: Vec<Listener<T>> =
                inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect();
            (inner.value.clone(), listeners)
        };
        // Lock is released so listeners may read the value back.
        for listener in listeners {
            listener(&value);
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
        let mut inner = self.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|(existing, _)| *existing != id);
        inner.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().listeners.len()
    }
}
