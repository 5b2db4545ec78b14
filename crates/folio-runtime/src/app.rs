#![forbid(unsafe_code)]

//! The portfolio app: one owner for every runtime component.
//!
//! [`PortfolioApp`] wires the preloader, section locator, scroll helper, and
//! navigation coordinator to a [`Platform`]. The host drives it:
//!
//! - forward window and mutation events to [`PortfolioApp::handle_event`],
//! - call [`PortfolioApp::on_animation_frame`] when a requested frame fires,
//! - report image settlements to [`PortfolioApp::on_image_settled`],
//! - call [`PortfolioApp::tick`] at or after [`PortfolioApp::next_deadline`].
//!
//! Unmounting releases every listener, observer, frame request, and timer,
//! and callbacks arriving afterwards are ignored.

use core::time::Duration;

use folio_backend::Platform;
use folio_core::content::preload_urls;
use folio_core::{ListenerKind, LocateTrigger, PlatformEvent, SectionId};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::boundary::{ErrorBoundary, RenderFault, Rendered};
use crate::cancellation::CancellationSource;
use crate::config::FolioConfig;
use crate::gallery::{GalleryView, PortfolioGallery};
use crate::locator::SectionLocator;
use crate::navigation::{NavigationCoordinator, NavigationState};
use crate::preload::{PreloadEvent, PreloadState, Preloader};
use crate::reactive::{Observable, ReadOnly};
use crate::scroll::{ScrollOutcome, ScrollToSection};

/// Lifecycle of a [`PortfolioApp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Created,
    Mounted,
    Unmounted,
}

/// Everything the shell needs to render one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShellState {
    pub lifecycle: Lifecycle,
    pub loading: bool,
    pub load_progress: u8,
    pub preload: PreloadState,
    #[serde(flatten)]
    pub navigation: NavigationState,
    pub is_desktop: bool,
    /// The sidebar exists in the layout only on desktop, and only while the
    /// active section calls for it.
    pub sidebar_rendered: bool,
    /// The splash screen and the lightbox both pin the page.
    pub body_scroll_locked: bool,
    pub gallery: GalleryView,
}

/// Host-driven portfolio runtime.
pub struct PortfolioApp<P: Platform> {
    platform: P,
    config: FolioConfig,
    lifecycle: Lifecycle,
    teardown: CancellationSource,
    preloader: Preloader,
    locator: SectionLocator,
    scroll: ScrollToSection,
    nav: NavigationCoordinator,
    gallery: PortfolioGallery,
    boundary: ErrorBoundary,
    loading: Observable<bool>,
    progress: Observable<u8>,
}

impl<P: Platform> std::fmt::Debug for PortfolioApp<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioApp")
            .field("lifecycle", &self.lifecycle)
            .field("navigation", &self.nav.state())
            .field("loading", &self.loading.get())
            .finish_non_exhaustive()
    }
}

impl<P: Platform> PortfolioApp<P> {
    /// Build an app that preloads the stock image list.
    #[must_use]
    pub fn new(platform: P, config: FolioConfig) -> Self {
        Self::with_preload(platform, config, preload_urls())
    }

    /// Build an app that preloads `urls`.
    #[must_use]
    pub fn with_preload(platform: P, config: FolioConfig, urls: Vec<String>) -> Self {
        let teardown = CancellationSource::new();
        Self {
            preloader: Preloader::new(urls, &config.preload, teardown.token()),
            locator: SectionLocator::new(&config.navigation, teardown.token()),
            scroll: ScrollToSection::new(&config.navigation, teardown.token()),
            nav: NavigationCoordinator::new(config.navigation.manual_override()),
            gallery: PortfolioGallery::default(),
            boundary: ErrorBoundary::new(),
            loading: Observable::new(true),
            progress: Observable::new(0),
            lifecycle: Lifecycle::Created,
            teardown,
            platform,
            config,
        }
    }

    fn now(&self) -> Duration {
        self.platform.now_mono()
    }

    fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    /// Attach listeners and observers, queue the first locator pass, and
    /// start the preload. Only the first call has an effect.
    pub fn mount(&mut self) {
        if self.lifecycle != Lifecycle::Created {
            return;
        }
        self.lifecycle = Lifecycle::Mounted;
        let now = self.now();
        self.platform.listen(ListenerKind::Scroll);
        self.platform.listen(ListenerKind::Resize);
        self.platform.observe_mutations();
        if self.locator.mount(now) {
            self.platform.request_frame();
        }
        let events = self.preloader.start(now);
        self.apply_preload(events);
        info!(
            images = self.preloader.urls().len(),
            "portfolio mounted"
        );
    }

    /// Release everything acquired by [`mount`](Self::mount). Idempotent.
    pub fn unmount(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.lifecycle = Lifecycle::Unmounted;
        self.teardown.cancel();
        self.platform.unlisten(ListenerKind::Scroll);
        self.platform.unlisten(ListenerKind::Resize);
        self.platform.disconnect_mutations();
        if self.locator.unmount() {
            self.platform.cancel_frame();
        }
        self.preloader.cancel();
        self.scroll.cancel();
        self.nav.release();
        info!("portfolio unmounted");
    }

    /// A window or document event from an attached listener.
    pub fn handle_event(&mut self, event: PlatformEvent) {
        if !self.is_mounted() {
            return;
        }
        self.request_locate(event.trigger());
    }

    fn request_locate(&mut self, trigger: LocateTrigger) {
        if self.locator.request(trigger) {
            self.platform.request_frame();
        }
    }

    /// The requested animation frame fired. Returns whether the active
    /// section was updated from geometry.
    pub fn on_animation_frame(&mut self) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let Some(update) = self.locator.on_frame(&self.platform) else {
            return false;
        };
        let now = self.now();
        self.nav.on_locator_update(update, now)
    }

    /// The host finished fetching `url`, successfully or not.
    pub fn on_image_settled(&mut self, url: &str, ok: bool) {
        if !self.is_mounted() {
            return;
        }
        let now = self.now();
        let events = self.preloader.on_settled(url, ok, now);
        self.apply_preload(events);
    }

    /// Fire every timer due at the platform's current time.
    pub fn tick(&mut self) {
        if !self.is_mounted() {
            return;
        }
        let now = self.now();
        let events = self.preloader.poll(now, &mut self.platform);
        self.apply_preload(events);
        if self.locator.poll(now) {
            self.platform.request_frame();
        }
        if let Some(outcome) = self.scroll.poll(now, &mut self.platform) {
            debug!(?outcome, "scroll retry");
        }
    }

    /// Earliest pending timer across all components.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        if !self.is_mounted() {
            return None;
        }
        [
            self.preloader.next_deadline(),
            self.locator.next_deadline(),
            self.scroll.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn apply_preload(&mut self, events: Vec<PreloadEvent>) {
        for event in events {
            match event {
                PreloadEvent::Progress(pct) => {
                    self.progress.set(pct);
                }
                PreloadEvent::Done(reason) => {
                    debug!(reason = reason.as_str(), "preload complete");
                }
                PreloadEvent::LoadingFinished => {
                    self.loading.set(false);
                    // Sections mount once the loading screen goes away.
                    self.request_locate(LocateTrigger::Mutation);
                }
            }
        }
    }

    /// Make `id` active and scroll it into view below the sticky header.
    pub fn navigate_to(&mut self, id: SectionId, manual: bool) -> Option<ScrollOutcome> {
        if !self.is_mounted() {
            return None;
        }
        let now = self.now();
        self.nav.navigate_to(id, manual, now);
        Some(self.scroll.request(id, now, &mut self.platform))
    }

    /// [`navigate_to`](Self::navigate_to) by hash or name. Unknown names are
    /// logged and ignored.
    pub fn navigate_to_name(&mut self, name: &str, manual: bool) -> Option<ScrollOutcome> {
        if !self.is_mounted() {
            return None;
        }
        let now = self.now();
        match self.nav.navigate_to_name(name, manual, now) {
            Ok(outcome) => Some(self.scroll.request(outcome.section, now, &mut self.platform)),
            Err(err) => {
                warn!(%err, "navigation ignored");
                None
            }
        }
    }

    pub fn set_mobile_menu_open(&mut self, open: bool) {
        self.nav.set_mobile_menu_open(open);
    }

    pub fn toggle_mobile_menu(&mut self) -> bool {
        self.nav.toggle_mobile_menu()
    }

    /// Hide the loading screen now.
    pub fn skip_loading(&mut self) {
        if !self.is_mounted() {
            return;
        }
        let now = self.now();
        let events = self.preloader.bypass(now);
        self.apply_preload(events);
    }

    /// Run the shell's render step behind the error boundary.
    pub fn render<T>(
        &mut self,
        render: impl FnOnce(&ShellState) -> Result<T, RenderFault>,
    ) -> Rendered<T> {
        let state = self.shell_state();
        self.boundary.render("App", || render(&state))
    }

    #[must_use]
    pub fn shell_state(&self) -> ShellState {
        let navigation = self.nav.state();
        let is_desktop = self.platform.viewport().width >= self.config.layout.desktop_min_width;
        let loading = self.loading.get();
        ShellState {
            lifecycle: self.lifecycle,
            loading,
            load_progress: self.progress.get(),
            preload: self.preloader.state(),
            navigation,
            is_desktop,
            sidebar_rendered: is_desktop && navigation.sidebar_visible,
            body_scroll_locked: loading || self.gallery.body_scroll_locked(),
            gallery: self.gallery.view(),
        }
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[must_use]
    pub fn navigation(&self) -> &NavigationCoordinator {
        &self.nav
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    #[must_use]
    pub fn loading(&self) -> ReadOnly<bool> {
        ReadOnly::from(&self.loading)
    }

    #[must_use]
    pub fn load_progress(&self) -> ReadOnly<u8> {
        ReadOnly::from(&self.progress)
    }

    #[must_use]
    pub fn preloader(&self) -> &Preloader {
        &self.preloader
    }

    #[must_use]
    pub fn locator(&self) -> &SectionLocator {
        &self.locator
    }

    #[must_use]
    pub fn gallery(&self) -> &PortfolioGallery {
        &self.gallery
    }

    pub fn gallery_mut(&mut self) -> &mut PortfolioGallery {
        &mut self.gallery
    }

    #[must_use]
    pub fn boundary(&self) -> &ErrorBoundary {
        &self.boundary
    }

    #[must_use]
    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    #[must_use]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}

impl<P: Platform> Drop for PortfolioApp<P> {
    fn drop(&mut self) {
        self.unmount();
    }
}
