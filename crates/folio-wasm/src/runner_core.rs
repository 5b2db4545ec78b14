#![forbid(unsafe_code)]

//! Platform-independent runner core wrapping [`PageSession`].
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and the native test harness. No JS/WASM types here.

use core::time::Duration;

use folio_core::SectionId;
use folio_runtime::app::ShellState;
use folio_runtime::config::{ConfigError, FolioConfig};
use folio_runtime::gallery::GalleryKey;
use folio_runtime::{RenderFault, Rendered};
use folio_web::{PageSection, PageSession, ScrollApply, WebPage};

/// Platform-independent portfolio runner.
///
/// The page runs in deferred-scroll mode: scroll commands are only
/// journaled, and the host reports the resulting scroll offsets back
/// through [`RunnerCore::scroll`].
pub struct RunnerCore {
    session: PageSession,
}

fn parse_section(name: &str) -> Option<SectionId> {
    name.strip_prefix('#').unwrap_or(name).parse().ok()
}

impl RunnerCore {
    /// Runner with the default configuration and the stock preload list.
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_config(width, height, FolioConfig::default())
    }

    /// Runner configured from a JSON document. Missing keys take defaults.
    pub fn from_config_json(width: f64, height: f64, json: &str) -> Result<Self, ConfigError> {
        let config = FolioConfig::from_json_str(json)?.validated()?;
        Ok(Self::with_config(width, height, config))
    }

    fn with_config(width: f64, height: f64, config: FolioConfig) -> Self {
        let (width, height) = sanitize_size(width, height);
        let page = WebPage::new(width, height).with_scroll_apply(ScrollApply::Deferred);
        Self {
            session: PageSession::new(page, config),
        }
    }

    /// Mount the app: attach listeners, start preloading, request the
    /// first locate pass.
    pub fn init(&mut self) {
        self.session.mount();
    }

    pub fn unmount(&mut self) {
        self.session.unmount();
    }

    fn page_mut(&mut self) -> &mut WebPage {
        self.session.app_mut().platform_mut()
    }

    /// Report a section's layout in document coordinates.
    ///
    /// Returns `false` for unknown names or non-finite geometry.
    pub fn set_section(
        &mut self,
        name: &str,
        offset_top: f64,
        height: f64,
        registered: bool,
    ) -> bool {
        let Some(id) = parse_section(name) else {
            return false;
        };
        if !offset_top.is_finite() || !height.is_finite() {
            return false;
        }
        let mut section = PageSection::new(id, offset_top, height.max(0.0));
        section.registered = registered;
        self.page_mut().upsert_section(section);
        true
    }

    pub fn remove_section(&mut self, name: &str) -> bool {
        match parse_section(name) {
            Some(id) => self.page_mut().remove_section(id),
            None => false,
        }
    }

    pub fn set_document_height(&mut self, height: f64) {
        if height.is_finite() {
            self.page_mut().set_document_height(height.max(0.0));
        }
    }

    /// Window scrolled to `top`. Returns the clamped offset.
    pub fn scroll(&mut self, top: f64) -> f64 {
        self.session.scroll_to(top)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if !width.is_finite() || !height.is_finite() {
            return;
        }
        let (width, height) = sanitize_size(width, height);
        self.session.resize(width, height);
    }

    /// The host's mutation observer fired.
    pub fn mutation(&mut self) {
        self.session.mutate(|_| {});
    }

    /// Run the requested animation frame. Returns `false` if none was pending.
    pub fn animation_frame(&mut self) -> bool {
        self.session.run_frame()
    }

    /// Advance the deterministic clock by `dt_ms` milliseconds.
    pub fn advance_time_ms(&mut self, dt_ms: f64) {
        // Host input can be noisy (NaN/inf/negative spikes).
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        self.session.advance(duration_from_ms(dt_ms));
    }

    /// Move the clock to absolute `ts_ms`. The clock never runs backwards.
    pub fn set_time_ms(&mut self, ts_ms: f64) {
        let target = duration_from_ms(ts_ms);
        let now = self.session.now();
        if target > now {
            self.session.advance(target - now);
        }
    }

    pub fn now_ms(&self) -> f64 {
        duration_to_ms(self.session.now())
    }

    /// Milliseconds until the next timer, if any is armed.
    pub fn next_deadline_ms(&self) -> Option<f64> {
        let deadline = self.session.app().next_deadline()?;
        let delay = deadline.saturating_sub(self.session.now());
        Some(duration_to_ms(delay))
    }

    pub fn image_settled(&mut self, url: &str, ok: bool) {
        self.session.settle_image(url, ok);
    }

    /// Navigate to a section by name (`"resume"` or `"#resume"`).
    ///
    /// Returns `true` if the navigation was accepted.
    pub fn navigate(&mut self, name: &str, manual: bool) -> bool {
        self.session.app_mut().navigate_to_name(name, manual).is_some()
    }

    pub fn set_menu_open(&mut self, open: bool) {
        self.session.app_mut().set_mobile_menu_open(open);
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.session.app_mut().toggle_mobile_menu()
    }

    pub fn skip_loading(&mut self) {
        self.session.skip_loading();
    }

    pub fn gallery_filter(&mut self, category: &str) -> bool {
        self.session.app_mut().gallery_mut().set_filter(category)
    }

    pub fn gallery_open(&mut self, id: u32) -> bool {
        self.session.app_mut().gallery_mut().open(id)
    }

    pub fn gallery_close(&mut self) -> bool {
        self.session.app_mut().gallery_mut().close()
    }

    /// Forward a `KeyboardEvent.key` to the lightbox.
    pub fn gallery_key(&mut self, key: &str) -> bool {
        GalleryKey::from_key(key)
            .is_some_and(|key| self.session.app_mut().gallery_mut().handle_key(key))
    }

    #[cfg(test)]
    pub fn state(&self) -> ShellState {
        self.session.state()
    }

    /// Current shell state as JSON.
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.session.state()).unwrap_or_else(|_| "{}".to_owned())
    }

    /// Drain pending host commands as a JSON array.
    pub fn take_commands_json(&mut self) -> String {
        let commands = self.session.take_commands();
        serde_json::to_string(&commands).unwrap_or_else(|_| "[]".to_owned())
    }

    /// Run the host's render step behind the app's error boundary.
    pub fn render_with<T>(
        &mut self,
        render: impl FnOnce(&ShellState) -> Result<T, RenderFault>,
    ) -> Rendered<T> {
        self.session.app_mut().render(render)
    }

    #[cfg(test)]
    pub fn session(&self) -> &PageSession {
        &self.session
    }
}

fn sanitize_size(width: f64, height: f64) -> (f64, f64) {
    let clean = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
    (clean(width), clean(height))
}

/// Non-finite and negative inputs map to zero.
fn duration_from_ms(ms: f64) -> Duration {
    let nanos = if !ms.is_finite() || ms <= 0.0 {
        0
    } else {
        (ms * 1_000_000.0).min(u64::MAX as f64) as u64
    };
    Duration::from_nanos(nanos)
}

fn duration_to_ms(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}
