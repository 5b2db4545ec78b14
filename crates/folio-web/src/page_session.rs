#![forbid(unsafe_code)]

//! Deterministic session driver.
//!
//! [`PageSession`] plays the browser's part around a
//! [`PortfolioApp`]: it moves the mirrored page, forwards the matching
//! events, fires animation frames, and advances time deadline by deadline
//! so every timer runs at its exact scheduled instant.

use core::time::Duration;

use folio_backend::GeometryQuery;
use folio_core::{PlatformEvent, SectionId};
use folio_runtime::app::{PortfolioApp, ShellState};
use folio_runtime::config::FolioConfig;
use folio_runtime::scroll::ScrollOutcome;
use serde::Serialize;
use tracing::trace;

use crate::{HostCommand, WebPage};

/// Upper bound on timer firings within one `advance` call.
const MAX_STEPS_PER_ADVANCE: usize = 4096;

/// Summary of one [`PageSession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepResult {
    pub now_ms: u64,
    /// Timer instants visited.
    pub ticks: u32,
    /// Animation frames run.
    pub frames: u32,
    pub active_section: SectionId,
    pub loading: bool,
}

/// A [`PortfolioApp`] on a [`WebPage`], driven step by step.
#[derive(Debug)]
pub struct PageSession {
    app: PortfolioApp<WebPage>,
    settled: usize,
}

impl PageSession {
    /// Session preloading the stock image list.
    #[must_use]
    pub fn new(page: WebPage, config: FolioConfig) -> Self {
        Self {
            app: PortfolioApp::new(page, config),
            settled: 0,
        }
    }

    /// Session preloading `urls`.
    #[must_use]
    pub fn with_preload(page: WebPage, config: FolioConfig, urls: Vec<String>) -> Self {
        Self {
            app: PortfolioApp::with_preload(page, config, urls),
            settled: 0,
        }
    }

    pub fn mount(&mut self) {
        self.app.mount();
    }

    pub fn unmount(&mut self) {
        self.app.unmount();
    }

    fn page_mut(&mut self) -> &mut WebPage {
        self.app.platform_mut()
    }

    #[must_use]
    pub fn page(&self) -> &WebPage {
        self.app.platform()
    }

    #[must_use]
    pub fn app(&self) -> &PortfolioApp<WebPage> {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut PortfolioApp<WebPage> {
        &mut self.app
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.page().now()
    }

    #[must_use]
    pub fn state(&self) -> ShellState {
        self.app.shell_state()
    }

    #[must_use]
    pub fn active_section(&self) -> SectionId {
        self.app.navigation().state().active_section
    }

    /// The user scrolled to `top`. Returns the clamped offset.
    pub fn scroll_to(&mut self, top: f64) -> f64 {
        let top = self.page_mut().set_scroll_top(top);
        self.app.handle_event(PlatformEvent::Scroll { top });
        top
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.page_mut().set_viewport(width, height);
        self.app.handle_event(PlatformEvent::Resize { width, height });
    }

    /// Change the DOM. A mutation is reported only while observed.
    pub fn mutate(&mut self, change: impl FnOnce(&mut WebPage)) {
        change(self.page_mut());
        if self.page().is_observing() {
            self.app.handle_event(PlatformEvent::Mutation);
        }
    }

    /// Fire the pending animation frame, if one was requested.
    pub fn run_frame(&mut self) -> bool {
        if !self.page_mut().take_frame_request() {
            return false;
        }
        self.app.on_animation_frame();
        true
    }

    /// Advance the clock by `dt`, stopping at every timer deadline on the
    /// way and running a pending frame after each stop.
    pub fn advance(&mut self, dt: Duration) -> StepResult {
        let target = self.now().saturating_add(dt);
        let mut ticks = 0_u32;
        let mut frames = 0_u32;
        for _ in 0..MAX_STEPS_PER_ADVANCE {
            match self.app.next_deadline() {
                Some(deadline) if deadline <= target => {
                    self.page_mut().clock_mut().set(deadline);
                    self.app.tick();
                    ticks += 1;
                    frames += u32::from(self.run_frame());
                }
                _ => break,
            }
        }
        self.page_mut().clock_mut().set(target);
        self.app.tick();
        frames += u32::from(self.run_frame());
        trace!(now_ms = target.as_millis() as u64, ticks, frames, "session advanced");
        StepResult {
            now_ms: target.as_millis() as u64,
            ticks,
            frames,
            active_section: self.active_section(),
            loading: self.app.is_loading(),
        }
    }

    /// Report one image settlement.
    pub fn settle_image(&mut self, url: &str, ok: bool) {
        self.app.on_image_settled(url, ok);
    }

    /// Settle every image requested so far and not yet settled by this
    /// helper. Returns how many were settled.
    pub fn settle_requested_images(&mut self, ok: bool) -> usize {
        let urls = self.page().load_requests();
        let fresh: Vec<String> = urls.into_iter().skip(self.settled).collect();
        self.settled += fresh.len();
        for url in &fresh {
            self.app.on_image_settled(url, ok);
        }
        fresh.len()
    }

    /// Click a navigation entry. With immediate scrolling, the resulting
    /// scroll event is forwarded like a browser would.
    pub fn navigate(&mut self, id: SectionId, manual: bool) -> Option<ScrollOutcome> {
        let before = self.page().scroll_top();
        let outcome = self.app.navigate_to(id, manual);
        self.forward_programmatic_scroll(before);
        outcome
    }

    /// Follow an in-page link such as `#resume`.
    pub fn follow_link(&mut self, href: &str) -> Option<ScrollOutcome> {
        let before = self.page().scroll_top();
        let outcome = self.app.navigate_to_name(href, true);
        self.forward_programmatic_scroll(before);
        outcome
    }

    fn forward_programmatic_scroll(&mut self, before: f64) {
        let after = self.page().scroll_top();
        if after != before {
            self.app.handle_event(PlatformEvent::Scroll { top: after });
        }
    }

    pub fn skip_loading(&mut self) {
        self.app.skip_loading();
    }

    /// Drain the host command journal.
    pub fn take_commands(&mut self) -> Vec<HostCommand> {
        self.settled = 0;
        self.page_mut().take_commands()
    }
}
