#![forbid(unsafe_code)]

//! `folio-web` models the browser page the runtime talks to.
//!
//! Design goals:
//! - **Host-mirrored state**: the embedding environment (JS) pushes viewport
//!   size, scroll offset, and section layout; the runtime reads them back
//!   through the `folio-backend` traits.
//! - **Recorded effects**: scroll commands, listener changes, frame requests,
//!   and image loads are journaled as [`HostCommand`]s for the host to carry
//!   out.
//! - **Deterministic time**: the host advances a monotonic clock explicitly.
//!
//! The same [`WebPage`] doubles as the headless page in tests, driven by
//! [`page_session::PageSession`].

pub mod page_session;

use core::time::Duration;

use folio_backend::{
    AssetLoader, EventSubscription, GeometryQuery, MutationNotify, PlatformClock, ScrollBehavior,
    ScrollControl,
};
use folio_core::{ListenerKind, Rect, SectionId, Viewport};
use serde::Serialize;

pub use page_session::{PageSession, StepResult};

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time. Earlier values are ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }
}

impl PlatformClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// One page section in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSection {
    pub id: SectionId,
    /// Distance from the top of the document.
    pub offset_top: f64,
    pub height: f64,
    /// Whether the component registered an element reference.
    pub registered: bool,
    /// Whether the element carries `data-section`.
    pub attributed: bool,
}

impl PageSection {
    /// A registered section that also carries its attribute.
    #[must_use]
    pub const fn new(id: SectionId, offset_top: f64, height: f64) -> Self {
        Self {
            id,
            offset_top,
            height,
            registered: true,
            attributed: true,
        }
    }

    /// A section reachable only through `data-section`.
    #[must_use]
    pub const fn attribute_only(id: SectionId, offset_top: f64, height: f64) -> Self {
        Self {
            id,
            offset_top,
            height,
            registered: false,
            attributed: true,
        }
    }
}

/// An effect the host must perform.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HostCommand {
    Listen { kind: ListenerKind },
    Unlisten { kind: ListenerKind },
    ObserveMutations,
    DisconnectMutations,
    RequestFrame,
    CancelFrame,
    ScrollTo { top: f64, behavior: ScrollBehavior },
    LoadImage { url: String },
}

/// Whether scroll commands move the mirrored scroll offset right away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollApply {
    /// Jump immediately (headless tests).
    #[default]
    Immediate,
    /// Only record the command; the host reports the resulting scroll.
    Deferred,
}

/// Mirror of the browser page.
#[derive(Debug, Clone)]
pub struct WebPage {
    clock: DeterministicClock,
    viewport: Viewport,
    scroll_top: f64,
    document_height: f64,
    sections: Vec<PageSection>,
    listeners: Vec<ListenerKind>,
    observing: bool,
    frame_pending: bool,
    scroll_apply: ScrollApply,
    commands: Vec<HostCommand>,
}

impl WebPage {
    /// An empty page of the given viewport size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            clock: DeterministicClock::new(),
            viewport: Viewport::new(width, height),
            scroll_top: 0.0,
            document_height: height,
            sections: Vec::new(),
            listeners: Vec::new(),
            observing: false,
            frame_pending: false,
            scroll_apply: ScrollApply::default(),
            commands: Vec::new(),
        }
    }

    /// A page with `sections` stacked top to bottom, followed by `footer`
    /// pixels of non-section content.
    #[must_use]
    pub fn stacked(width: f64, height: f64, sections: &[(SectionId, f64)], footer: f64) -> Self {
        let mut page = Self::new(width, height);
        let mut top = 0.0;
        for &(id, h) in sections {
            page.sections.push(PageSection::new(id, top, h));
            top += h;
        }
        page.document_height = (top + footer).max(height);
        page
    }

    #[must_use]
    pub fn with_scroll_apply(mut self, apply: ScrollApply) -> Self {
        self.scroll_apply = apply;
        self
    }

    pub fn clock_mut(&mut self) -> &mut DeterministicClock {
        &mut self.clock
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }

    /// Largest valid scroll offset.
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport.height).max(0.0)
    }

    /// Move the scroll offset, clamped to the document. Returns the offset
    /// actually applied.
    pub fn set_scroll_top(&mut self, top: f64) -> f64 {
        self.scroll_top = if top.is_finite() {
            top.clamp(0.0, self.max_scroll())
        } else {
            0.0
        };
        self.scroll_top
    }

    pub fn set_document_height(&mut self, height: f64) {
        self.document_height = height.max(0.0);
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }

    /// Insert or replace the section with the same id. The document grows
    /// to contain it.
    pub fn upsert_section(&mut self, section: PageSection) {
        match self.sections.iter_mut().find(|s| s.id == section.id) {
            Some(slot) => *slot = section,
            None => self.sections.push(section),
        }
        self.document_height = self
            .document_height
            .max(section.offset_top + section.height);
    }

    pub fn remove_section(&mut self, id: SectionId) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.id != id);
        self.sections.len() != before
    }

    #[must_use]
    pub fn section(&self, id: SectionId) -> Option<&PageSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn sections(&self) -> &[PageSection] {
        &self.sections
    }

    #[must_use]
    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.listeners.contains(&kind)
    }

    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observing
    }

    #[must_use]
    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Consume an outstanding frame request. Returns whether one existed.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_pending)
    }

    /// Commands recorded since the last [`take_commands`](Self::take_commands).
    #[must_use]
    pub fn commands(&self) -> &[HostCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Scroll targets in issue order.
    #[must_use]
    pub fn scroll_commands(&self) -> Vec<f64> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                HostCommand::ScrollTo { top, .. } => Some(*top),
                _ => None,
            })
            .collect()
    }

    /// Image URLs requested, in issue order.
    #[must_use]
    pub fn load_requests(&self) -> Vec<String> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                HostCommand::LoadImage { url } => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    fn viewport_rect(&self, section: &PageSection) -> Rect {
        Rect::new(
            0.0,
            section.offset_top - self.scroll_top,
            self.viewport.width,
            section.height,
        )
    }
}

impl PlatformClock for WebPage {
    fn now_mono(&self) -> Duration {
        self.clock.now_mono()
    }
}

impl GeometryQuery for WebPage {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn document_height(&self) -> f64 {
        self.document_height
    }

    fn registered_rect(&self, id: SectionId) -> Option<Rect> {
        self.sections
            .iter()
            .find(|s| s.id == id && s.registered)
            .map(|s| self.viewport_rect(s))
    }

    fn query_section_rect(&self, id: SectionId) -> Option<Rect> {
        self.sections
            .iter()
            .find(|s| s.id == id && s.attributed)
            .map(|s| self.viewport_rect(s))
    }
}

impl ScrollControl for WebPage {
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.commands.push(HostCommand::ScrollTo { top, behavior });
        if self.scroll_apply == ScrollApply::Immediate {
            self.set_scroll_top(top);
        }
    }
}

impl EventSubscription for WebPage {
    fn listen(&mut self, kind: ListenerKind) {
        if !self.listeners.contains(&kind) {
            self.listeners.push(kind);
        }
        self.commands.push(HostCommand::Listen { kind });
    }

    fn unlisten(&mut self, kind: ListenerKind) {
        self.listeners.retain(|k| *k != kind);
        self.commands.push(HostCommand::Unlisten { kind });
    }

    fn request_frame(&mut self) {
        self.frame_pending = true;
        self.commands.push(HostCommand::RequestFrame);
    }

    fn cancel_frame(&mut self) {
        self.frame_pending = false;
        self.commands.push(HostCommand::CancelFrame);
    }
}

impl MutationNotify for WebPage {
    fn observe_mutations(&mut self) {
        self.observing = true;
        self.commands.push(HostCommand::ObserveMutations);
    }

    fn disconnect_mutations(&mut self) {
        self.observing = false;
        self.commands.push(HostCommand::DisconnectMutations);
    }
}

impl AssetLoader for WebPage {
    fn begin_load(&mut self, url: &str) {
        self.commands.push(HostCommand::LoadImage {
            url: url.to_owned(),
        });
    }
}
