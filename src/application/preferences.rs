//! Observable preference values
//!
//! Each preference holds one typed value and notifies subscribers so they can
//! apply a platform-visible side effect: switching the presenter's unit
//! labels, rewriting localized output, and so on. Subscribers see the current
//! value immediately on registration, then every subsequent change.

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// An observable preference value
pub struct Preference<T> {
    tx: watch::Sender<T>,
}

impl<T> Preference<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a preference with an initial value
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Get the current value
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Update the value, notifying subscribers. Setting the same value again
    /// does not re-notify.
    pub fn set(&self, value: T) {
        self.tx.send_if_modified(|current| {
            if *current != value {
                *current = value;
                true
            } else {
                false
            }
        });
    }

    /// Register a side-effecting subscriber.
    ///
    /// The effect runs once with the current value, then after every change.
    /// The returned handle can be aborted to cancel the subscription; it also
    /// ends when the preference itself is dropped.
    pub fn subscribe<F>(&self, apply: F) -> JoinHandle<()>
    where
        F: Fn(&T) + Send + 'static,
    {
        let mut rx = self.tx.subscribe();
        tokio::spawn(async move {
            let current = rx.borrow_and_update().clone();
            apply(&current);

            while rx.changed().await.is_ok() {
                let value = rx.borrow_and_update().clone();
                apply(&value);
            }
        })
    }
}
