#![forbid(unsafe_code)]

//! Reactive state published by the runtime.
//!
//! The runtime owns [`Observable`] cells for navigation and loading state.
//! The shell reads them through [`ReadOnly`] handles and mutates them only
//! via the app's operations.

pub mod observable;

pub use observable::{Observable, Subscription};

/// Read-only view of an [`Observable`].
pub struct ReadOnly<T> {
    inner: Observable<T>,
}

impl<T> Clone for ReadOnly<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ReadOnly<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ReadOnly").field(&self.inner).finish()
    }
}

impl<T: Clone + PartialEq + 'static> ReadOnly<T> {
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.with(f)
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version()
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.inner.subscribe(callback)
    }
}

impl<T> From<&Observable<T>> for ReadOnly<T> {
    fn from(obs: &Observable<T>) -> Self {
        Self { inner: obs.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn read_only_tracks_source() {
        let obs = Observable::new(10_u8);
        let view = ReadOnly::from(&obs);
        let seen = Rc::new(Cell::new(0_u8));
        let s = Rc::clone(&seen);
        let _sub = view.subscribe(move |v| s.set(*v));
        obs.set(42);
        assert_eq!(view.get(), 42);
        assert_eq!(seen.get(), 42);
        assert_eq!(view.version(), 1);
    }
}
