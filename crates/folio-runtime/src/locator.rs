#![forbid(unsafe_code)]

//! Scroll-driven section locator.
//!
//! The active section is the one whose vertical midpoint is nearest the
//! viewport's vertical center. Scroll, resize, and DOM mutations only mark
//! the locator dirty; the measurement itself runs once per animation frame
//! through a [`FrameCoalescer`]. Two settle passes after mount catch layout
//! that lands late (fonts, images).
//!
//! # Selection rule
//!
//! For each section with positive height, `d = |top + height/2 - vh/2|`.
//! The section with the smallest `d` wins. Ties keep the earlier section in
//! document order (strict `<`). Zero-height or absent sections are skipped.

use core::time::Duration;

use folio_backend::GeometryQuery;
use folio_core::frame_coalescer::FrameCoalescer;
use folio_core::{LocateTrigger, SectionAnchor, SectionId};
use serde::Serialize;
use tracing::trace;

use crate::cancellation::CancellationToken;
use crate::config::NavigationConfig;
use crate::timer::TimerQueue;

/// A locator result: the section nearest the viewport center and whether
/// the sidebar should show for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocatorUpdate {
    pub section: SectionId,
    pub sidebar_visible: bool,
}

impl LocatorUpdate {
    #[must_use]
    pub const fn for_section(section: SectionId) -> Self {
        Self {
            section,
            sidebar_visible: section.shows_sidebar(),
        }
    }
}

/// Pick the anchor whose midpoint is nearest the viewport center.
#[must_use]
pub fn locate(anchors: &[SectionAnchor], viewport_height: f64) -> Option<SectionId> {
    let center = viewport_height / 2.0;
    let mut best: Option<(SectionId, f64)> = None;
    for anchor in anchors {
        if !anchor.rect.has_height() {
            continue;
        }
        let distance = (anchor.rect.mid_y() - center).abs();
        if !distance.is_finite() {
            continue;
        }
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((anchor.id, distance)),
        }
    }
    best.map(|(id, _)| id)
}

/// Measure every section in document order.
///
/// Prefers the registered element and falls back to the
/// `data-section` lookup for sections nobody registered.
#[must_use]
pub fn collect_anchors<G: GeometryQuery + ?Sized>(geometry: &G) -> Vec<SectionAnchor> {
    SectionId::ALL
        .iter()
        .filter_map(|&id| {
            geometry
                .registered_rect(id)
                .or_else(|| geometry.query_section_rect(id))
                .map(|rect| SectionAnchor::new(id, rect))
        })
        .collect()
}

/// Frame-coalesced locator with settle passes.
#[derive(Debug)]
pub struct SectionLocator {
    coalescer: FrameCoalescer,
    settle_delays: Vec<Duration>,
    timers: TimerQueue<usize>,
    mounted: bool,
    token: CancellationToken,
}

impl SectionLocator {
    #[must_use]
    pub fn new(config: &NavigationConfig, token: CancellationToken) -> Self {
        Self {
            coalescer: FrameCoalescer::new(),
            settle_delays: config.settle_delays(),
            timers: TimerQueue::new(),
            mounted: false,
            token,
        }
    }

    fn live(&self) -> bool {
        self.mounted && !self.token.is_cancelled()
    }

    /// Arm settle passes and queue the initial pass. Returns whether the
    /// host must be asked for an animation frame.
    pub fn mount(&mut self, now: Duration) -> bool {
        if self.mounted || self.token.is_cancelled() {
            return false;
        }
        self.mounted = true;
        for (i, delay) in self.settle_delays.iter().enumerate() {
            self.timers.schedule(i, now + *delay);
        }
        self.coalescer.request(LocateTrigger::Initial)
    }

    /// Mark the locator dirty. Returns whether a frame must be requested;
    /// `false` means one is already pending.
    pub fn request(&mut self, trigger: LocateTrigger) -> bool {
        if !self.live() {
            return false;
        }
        self.coalescer.request(trigger)
    }

    /// Fire due settle passes. Returns whether a frame must be requested.
    pub fn poll(&mut self, now: Duration) -> bool {
        if !self.live() {
            return false;
        }
        let mut needs_frame = false;
        for pass in self.timers.drain_due(now) {
            trace!(pass, "locator: settle pass");
            needs_frame |= self.coalescer.request(LocateTrigger::Settle);
        }
        needs_frame
    }

    /// Run the pending measurement, if any.
    pub fn on_frame<G: GeometryQuery + ?Sized>(&mut self, geometry: &G) -> Option<LocatorUpdate> {
        if !self.live() {
            return None;
        }
        let trigger = self.coalescer.begin_frame()?;
        let anchors = collect_anchors(geometry);
        let found = locate(&anchors, geometry.viewport().height);
        trace!(
            trigger = trigger.as_str(),
            anchors = anchors.len(),
            section = found.map(SectionId::as_str),
            "locator pass"
        );
        found.map(LocatorUpdate::for_section)
    }

    /// Stop and drop pending work. Returns whether a frame was outstanding.
    pub fn unmount(&mut self) -> bool {
        self.mounted = false;
        self.timers.clear();
        self.coalescer.reset()
    }

    #[must_use]
    pub fn is_frame_pending(&self) -> bool {
        self.coalescer.is_pending()
    }

    /// Measurements performed so far.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.coalescer.frames()
    }

    /// Requests absorbed into an already-pending frame.
    #[must_use]
    pub fn coalesced(&self) -> u64 {
        self.coalescer.coalesced()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        if !self.live() {
            return None;
        }
        self.timers.next_deadline()
    }
}
