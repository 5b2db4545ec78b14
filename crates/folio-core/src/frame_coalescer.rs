#![forbid(unsafe_code)]

//! Animation-frame coalescing for geometry recomputation.
//!
//! Scroll, resize, and mutation notifications can arrive many times per
//! frame. Recomputing layout-dependent state for each one thrashes layout, so
//! [`FrameCoalescer`] admits at most one pending frame at a time.
//!
//! # Design
//!
//! - The first request while idle schedules a frame (`request` returns
//!   `true`; the caller asks the host for an animation frame).
//! - Requests while a frame is pending are dropped, not queued. Only the
//!   latest trigger is remembered, for diagnostics.
//! - [`begin_frame`](FrameCoalescer::begin_frame) clears the pending flag
//!   before the computation runs, so a request made during the computation
//!   schedules the next frame rather than being lost.
//!
//! # Usage
//!
//! ```
//! use folio_core::event::LocateTrigger;
//! use folio_core::frame_coalescer::FrameCoalescer;
//!
//! let mut coalescer = FrameCoalescer::new();
//! assert!(coalescer.request(LocateTrigger::Scroll));
//! assert!(!coalescer.request(LocateTrigger::Scroll));
//! assert!(!coalescer.request(LocateTrigger::Resize));
//!
//! assert_eq!(coalescer.begin_frame(), Some(LocateTrigger::Resize));
//! assert_eq!(coalescer.begin_frame(), None);
//! assert_eq!(coalescer.coalesced(), 2);
//! ```

use crate::event::LocateTrigger;

/// Admits at most one pending animation frame.
///
/// Not thread-safe; owned by the single UI event loop.
#[derive(Debug, Clone, Default)]
pub struct FrameCoalescer {
    /// Latest trigger while a frame is pending.
    pending: Option<LocateTrigger>,
    /// Requests dropped because a frame was already pending.
    coalesced: u64,
    /// Frames started.
    frames: u64,
}

impl FrameCoalescer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a frame. Returns `true` if the caller must schedule one.
    pub fn request(&mut self, trigger: LocateTrigger) -> bool {
        let was_idle = self.pending.is_none();
        if !was_idle {
            self.coalesced = self.coalesced.saturating_add(1);
        }
        self.pending = Some(trigger);
        was_idle
    }

    /// Start the pending frame, if any, returning its latest trigger.
    pub fn begin_frame(&mut self) -> Option<LocateTrigger> {
        let trigger = self.pending.take()?;
        self.frames = self.frames.saturating_add(1);
        Some(trigger)
    }

    /// Whether a frame is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Requests dropped so far.
    #[must_use]
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Frames started so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Drop any pending frame. Returns whether one was pending.
    pub fn reset(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_request_schedules() {
        let mut c = FrameCoalescer::new();
        assert!(!c.is_pending());
        assert!(c.request(LocateTrigger::Mutation));
        assert!(c.is_pending());
    }

    #[test]
    fn burst_collapses_to_one_frame() {
        let mut c = FrameCoalescer::new();
        let scheduled = (0..50)
            .filter(|_| c.request(LocateTrigger::Scroll))
            .count();
        assert_eq!(scheduled, 1);
        assert_eq!(c.coalesced(), 49);
        assert_eq!(c.begin_frame(), Some(LocateTrigger::Scroll));
        assert_eq!(c.frames(), 1);
    }

    #[test]
    fn request_during_frame_schedules_next() {
        let mut c = FrameCoalescer::new();
        c.request(LocateTrigger::Scroll);
        assert!(c.begin_frame().is_some());
        // In-flight computation issues another request.
        assert!(c.request(LocateTrigger::Mutation));
        assert_eq!(c.begin_frame(), Some(LocateTrigger::Mutation));
    }

    #[test]
    fn begin_without_request_is_none() {
        let mut c = FrameCoalescer::new();
        assert_eq!(c.begin_frame(), None);
        assert_eq!(c.frames(), 0);
    }

    #[test]
    fn reset_drops_pending() {
        let mut c = FrameCoalescer::new();
        c.request(LocateTrigger::Resize);
        assert!(c.reset());
        assert!(!c.reset());
        assert_eq!(c.begin_frame(), None);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn trigger() -> impl Strategy<Value = LocateTrigger> {
            prop_oneof![
                Just(LocateTrigger::Initial),
                Just(LocateTrigger::Scroll),
                Just(LocateTrigger::Resize),
                Just(LocateTrigger::Mutation),
                Just(LocateTrigger::Settle),
            ]
        }

        proptest! {
            #[test]
            fn every_request_is_scheduled_or_coalesced(
                ops in proptest::collection::vec(proptest::option::of(trigger()), 0..64)
            ) {
                let mut c = FrameCoalescer::new();
                let mut requests = 0_u64;
                let mut scheduled = 0_u64;
                for op in ops {
                    match op {
                        Some(t) => {
                            requests += 1;
                            scheduled += u64::from(c.request(t));
                        }
                        None => {
                            c.begin_frame();
                            prop_assert!(!c.is_pending());
                        }
                    }
                }
                prop_assert_eq!(scheduled + c.coalesced(), requests);
                prop_assert!(c.frames() <= scheduled);
                prop_assert_eq!(scheduled - c.frames(), u64::from(c.is_pending()));
            }
        }
    }
}
