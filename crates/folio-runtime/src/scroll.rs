#![forbid(unsafe_code)]

//! Scroll-to-section with sticky-header offset.
//!
//! The target offset is the section's document position minus the sticky
//! header height, floored and clamped to the scrollable range. If the
//! section is not mounted yet (the loading screen may still be up), the
//! lookup is retried on a fixed interval and then abandoned quietly.

use core::time::Duration;

use folio_backend::{GeometryQuery, ScrollBehavior, ScrollControl};
use folio_core::{Rect, SectionId};
use tracing::{debug, trace};

use crate::cancellation::CancellationToken;
use crate::config::NavigationConfig;
use crate::retry::{RetryPolicy, RetryState};
use crate::timer::TimerQueue;

/// Find the element for `id`: the registered element first, then the
/// `data-section` lookup.
#[must_use]
pub fn resolve_target<G: GeometryQuery + ?Sized>(geometry: &G, id: SectionId) -> Option<Rect> {
    geometry
        .registered_rect(id)
        .or_else(|| geometry.query_section_rect(id))
}

/// Scroll offset that puts an element with viewport-relative top
/// `element_top` just below a sticky header of height `sticky_offset`.
///
/// The result is floored and clamped to `[0, max(0, document_height - viewport_height)]`.
///
/// ```
/// use folio_runtime::scroll::clamp_scroll_offset;
///
/// assert_eq!(clamp_scroll_offset(0.0, 500.5, 72.0, 3000.0, 800.0), 428.0);
/// assert_eq!(clamp_scroll_offset(0.0, 10.0, 72.0, 3000.0, 800.0), 0.0);
/// assert_eq!(clamp_scroll_offset(0.0, 9000.0, 72.0, 3000.0, 800.0), 2200.0);
/// ```
#[must_use]
pub fn clamp_scroll_offset(
    scroll_top: f64,
    element_top: f64,
    sticky_offset: f64,
    document_height: f64,
    viewport_height: f64,
) -> f64 {
    let max = (document_height - viewport_height).max(0.0);
    let raw = (scroll_top + element_top - sticky_offset).floor();
    raw.max(0.0).min(max)
}

/// Result of a scroll request or retry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollOutcome {
    /// A scroll command was issued.
    Scrolled { top: f64 },
    /// The document is already at the target.
    AlreadyThere { top: f64 },
    /// The section is not mounted; another lookup is scheduled.
    Pending { attempt: u32 },
    /// Retries exhausted without finding the section.
    GaveUp,
}

#[derive(Debug)]
struct PendingScroll {
    section: SectionId,
    retry: RetryState,
}

/// Issues scroll commands and retries unresolved targets.
///
/// At most one retry is pending; a new request replaces it.
#[derive(Debug)]
pub struct ScrollToSection {
    sticky_offset: f64,
    behavior: ScrollBehavior,
    policy: RetryPolicy,
    pending: Option<PendingScroll>,
    timers: TimerQueue<()>,
    token: CancellationToken,
}

impl ScrollToSection {
    #[must_use]
    pub fn new(config: &NavigationConfig, token: CancellationToken) -> Self {
        Self {
            sticky_offset: config.sticky_offset,
            behavior: ScrollBehavior::Smooth,
            policy: config.scroll_retry_policy(),
            pending: None,
            timers: TimerQueue::new(),
            token,
        }
    }

    /// Scroll to `id`, or schedule a retry if it is not mounted.
    pub fn request<P>(&mut self, id: SectionId, now: Duration, platform: &mut P) -> ScrollOutcome
    where
        P: GeometryQuery + ScrollControl + ?Sized,
    {
        self.cancel();
        if self.token.is_cancelled() {
            return ScrollOutcome::GaveUp;
        }
        if let Some(outcome) = self.try_scroll(id, platform) {
            return outcome;
        }
        let mut retry = RetryState::new(self.policy.clone());
        match retry.next_delay() {
            Some(delay) => {
                self.timers.schedule((), now + delay);
                self.pending = Some(PendingScroll { section: id, retry });
                debug!(section = id.as_str(), "scroll target not mounted, retrying");
                ScrollOutcome::Pending { attempt: 1 }
            }
            None => {
                debug!(section = id.as_str(), "scroll target not mounted");
                ScrollOutcome::GaveUp
            }
        }
    }

    /// Run a due retry. Returns `None` when nothing was due.
    pub fn poll<P>(&mut self, now: Duration, platform: &mut P) -> Option<ScrollOutcome>
    where
        P: GeometryQuery + ScrollControl + ?Sized,
    {
        if self.token.is_cancelled() || self.timers.drain_due(now).is_empty() {
            return None;
        }
        let mut pending = self.pending.take()?;
        if let Some(outcome) = self.try_scroll(pending.section, platform) {
            return Some(outcome);
        }
        match pending.retry.next_delay() {
            Some(delay) => {
                let attempt = pending.retry.attempts();
                trace!(section = pending.section.as_str(), attempt, "scroll retry");
                self.timers.schedule((), now + delay);
                self.pending = Some(pending);
                Some(ScrollOutcome::Pending { attempt })
            }
            None => {
                debug!(
                    section = pending.section.as_str(),
                    attempts = pending.retry.attempts(),
                    "scroll target never mounted, giving up"
                );
                Some(ScrollOutcome::GaveUp)
            }
        }
    }

    fn try_scroll<P>(&self, id: SectionId, platform: &mut P) -> Option<ScrollOutcome>
    where
        P: GeometryQuery + ScrollControl + ?Sized,
    {
        let rect = resolve_target(platform, id)?;
        let current = platform.scroll_top();
        let top = clamp_scroll_offset(
            current,
            rect.top(),
            self.sticky_offset,
            platform.document_height(),
            platform.viewport().height,
        );
        // Targets are whole pixels; compare against the pixel we are on.
        if top == current.floor() {
            return Some(ScrollOutcome::AlreadyThere { top });
        }
        platform.scroll_to(top, self.behavior);
        trace!(section = id.as_str(), top, "scroll issued");
        Some(ScrollOutcome::Scrolled { top })
    }

    /// Drop any pending retry.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.timers.clear();
    }

    /// Section awaiting a retry, if any.
    #[must_use]
    pub fn pending_section(&self) -> Option<SectionId> {
        self.pending.as_ref().map(|p| p.section)
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        if self.token.is_cancelled() {
            return None;
        }
        self.timers.next_deadline()
    }
}
