//! Change publication for observable state.
//!
//! A [`Published`] value is written by exactly one owner. Readers call
//! [`Published::subscribe`] and await [`Subscription::changed`]; dropping
//! the subscription cancels it. Writes that do not change the value are
//! not announced.

use tokio::sync::watch;

/// A value whose changes can be observed.
#[derive(Debug)]
pub struct Published<T> {
    tx: watch::Sender<T>,
}

impl<T> Published<T> {
    pub fn new(value: T) -> Self {
        let (tx, _) = watch::channel(value);
        Self { tx }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.tx.borrow().clone()
    }

    /// Runs `f` against the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Replaces the value, notifying subscribers only if it changed.
    ///
    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        self.tx.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        })
    }

    /// Mutates the value in place and notifies subscribers if `f` returns true.
    pub fn modify(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }
}

impl<T: Default> Default for Published<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// A handle that observes a [`Published`] value.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: watch::Receiver<T>,
}

impl<T> Subscription<T> {
    /// Waits for the next change.
    ///
    /// Returns `false` once the publisher is gone; the subscription is
    /// then exhausted.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Returns whether a change arrived that has not been read yet.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Returns a clone of the latest value and marks it as seen.
    pub fn latest(&mut self) -> T
    where
        T: Clone,
    {
        self.rx.borrow_and_update().clone()
    }
}
