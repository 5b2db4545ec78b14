//! Teardown signalling for late callbacks.
//!
//! Host callbacks (image settlements, animation frames, timers) can arrive
//! after the app has been unmounted. Each component holds a
//! [`CancellationToken`] and drops such callbacks once the owning
//! [`CancellationSource`] has been cancelled, the same role an
//! `AbortSignal` plays for DOM listeners.
//!
//! # Example
//!
//! ```
//! use folio_runtime::cancellation::CancellationSource;
//!
//! let source = CancellationSource::new();
//! let token = source.token();
//! assert!(!token.is_cancelled());
//!
//! source.cancel();
//! assert!(token.is_cancelled());
//! ```

#![forbid(unsafe_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cloneable view of a cancellation flag.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<AtomicBool>,
}

/// The control handle that triggers cancellation.
///
/// Dropping the source does **not** cancel its tokens; call
/// [`cancel`](Self::cancel) explicitly.
pub struct CancellationSource {
    inner: Arc<AtomicBool>,
}

impl CancellationSource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Obtain a token that observes this source.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Cancel every token. Returns `false` if already cancelled.
    pub fn cancel(&self) -> bool {
        !self.inner.swap(true, Ordering::Release)
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancellationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationSource")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl CancellationToken {
    /// A token that is never cancelled.
    #[must_use]
    pub fn never() -> Self {
        Self {
            inner: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_source_is_not_cancelled() {
        let source = CancellationSource::new();
        assert!(!source.is_cancelled());
        assert!(!source.token().is_cancelled());
    }

    #[test]
    fn cancel_reaches_all_tokens() {
        let source = CancellationSource::new();
        let a = source.token();
        let b = a.clone();
        assert!(source.cancel());
        assert!(a.is_cancelled());
        assert!(b.is_cancelled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let source = CancellationSource::new();
        assert!(source.cancel());
        assert!(!source.cancel());
        assert!(source.is_cancelled());
    }

    #[test]
    fn dropping_source_does_not_cancel() {
        let token = {
            let source = CancellationSource::new();
            source.token()
        };
        assert!(!token.is_cancelled());
    }

    #[test]
    fn never_token_stays_live() {
        assert!(!CancellationToken::never().is_cancelled());
    }

    #[test]
    fn debug_shows_state() {
        let source = CancellationSource::new();
        source.cancel();
        assert!(format!("{:?}", source.token()).contains("true"));
    }
}
