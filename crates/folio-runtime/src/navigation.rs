#![forbid(unsafe_code)]

//! Navigation coordinator.
//!
//! Owns the active section, sidebar visibility, and the mobile menu, and
//! arbitrates between two writers of the active section: explicit clicks
//! and the scroll-driven locator. A click arms a [`ManualOverride`] that
//! suppresses locator updates for a short window, so a smooth scroll that
//! passes through intermediate sections does not flicker the highlight.
//!
//! # Invariants
//!
//! 1. `sidebar_visible == active_section.shows_sidebar()` after every
//!    change of the active section, whichever path changed it.
//! 2. While the override is active, locator updates change nothing.
//! 3. The override expires on its own; it is a deadline checked when read,
//!    never a timer that must fire.

use core::time::Duration;

use folio_core::{ParseSectionError, SectionId};
use serde::Serialize;
use tracing::{debug, trace};

use crate::locator::LocatorUpdate;
use crate::reactive::{Observable, ReadOnly, Subscription};

/// Expiring suppression of locator updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualOverride {
    until: Option<Duration>,
}

impl ManualOverride {
    /// Activate until `now + window`. Re-arming replaces the deadline.
    pub fn arm(&mut self, now: Duration, window: Duration) {
        self.until = Some(now + window);
    }

    #[must_use]
    pub fn is_active(&self, now: Duration) -> bool {
        matches!(self.until, Some(until) if now < until)
    }

    pub fn clear(&mut self) {
        self.until = None;
    }

    #[must_use]
    pub fn expires_at(&self) -> Option<Duration> {
        self.until
    }
}

/// Snapshot of navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub active_section: SectionId,
    pub sidebar_visible: bool,
    pub mobile_menu_open: bool,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            active_section: SectionId::Home,
            sidebar_visible: false,
            mobile_menu_open: false,
        }
    }
}

/// What a navigation request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationOutcome {
    pub section: SectionId,
    /// Whether the active section changed.
    pub changed: bool,
    /// Whether locator updates are now suppressed.
    pub suppressed: bool,
}

/// Arbitrates active-section writes and publishes navigation state.
pub struct NavigationCoordinator {
    active: Observable<SectionId>,
    sidebar: Observable<bool>,
    menu: Observable<bool>,
    manual: ManualOverride,
    window: Duration,
    _reconcile: Subscription,
}

impl std::fmt::Debug for NavigationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationCoordinator")
            .field("state", &self.state())
            .field("manual", &self.manual)
            .field("window", &self.window)
            .finish()
    }
}

impl NavigationCoordinator {
    /// Start at the home section with the sidebar hidden. `window` is the
    /// manual-override duration.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        let initial = NavigationState::default();
        let active = Observable::new(initial.active_section);
        let sidebar = Observable::new(initial.sidebar_visible);
        let menu = Observable::new(initial.mobile_menu_open);
        // Sidebar visibility follows the active section on every change.
        let follower = sidebar.clone();
        let reconcile = active.subscribe(move |id: &SectionId| {
            follower.set(id.shows_sidebar());
        });
        Self {
            active,
            sidebar,
            menu,
            manual: ManualOverride::default(),
            window,
            _reconcile: reconcile,
        }
    }

    /// Make `id` active and close the mobile menu. A manual navigation also
    /// suppresses locator updates for the override window.
    pub fn navigate_to(&mut self, id: SectionId, manual: bool, now: Duration) -> NavigationOutcome {
        if manual {
            self.manual.arm(now, self.window);
        }
        let changed = self.active.set(id);
        self.reconcile();
        self.menu.set(false);
        debug!(section = id.as_str(), manual, changed, "navigate");
        NavigationOutcome {
            section: id,
            changed,
            suppressed: self.manual.is_active(now),
        }
    }

    /// Navigate by hash or bare name. Unknown names change nothing.
    pub fn navigate_to_name(
        &mut self,
        name: &str,
        manual: bool,
        now: Duration,
    ) -> Result<NavigationOutcome, ParseSectionError> {
        let id: SectionId = name.strip_prefix('#').unwrap_or(name).parse()?;
        Ok(self.navigate_to(id, manual, now))
    }

    /// Apply a locator result unless a manual navigation is in effect.
    /// Returns whether it was applied.
    pub fn on_locator_update(&mut self, update: LocatorUpdate, now: Duration) -> bool {
        if self.manual.is_active(now) {
            trace!(section = update.section.as_str(), "locator update suppressed");
            return false;
        }
        self.active.set(update.section);
        self.sidebar.set(update.sidebar_visible);
        true
    }

    /// Force sidebar visibility to agree with the active section.
    pub fn reconcile(&mut self) {
        self.sidebar.set(self.active.get().shows_sidebar());
    }

    pub fn set_mobile_menu_open(&mut self, open: bool) -> bool {
        self.menu.set(open)
    }

    pub fn toggle_mobile_menu(&mut self) -> bool {
        self.menu.update(|open| *open = !*open);
        self.menu.get()
    }

    /// Drop the override. Used on teardown.
    pub fn release(&mut self) {
        self.manual.clear();
    }

    #[must_use]
    pub fn is_suppressed(&self, now: Duration) -> bool {
        self.manual.is_active(now)
    }

    #[must_use]
    pub fn manual_override(&self) -> ManualOverride {
        self.manual
    }

    #[must_use]
    pub fn state(&self) -> NavigationState {
        NavigationState {
            active_section: self.active.get(),
            sidebar_visible: self.sidebar.get(),
            mobile_menu_open: self.menu.get(),
        }
    }

    #[must_use]
    pub fn active_section(&self) -> ReadOnly<SectionId> {
        ReadOnly::from(&self.active)
    }

    #[must_use]
    pub fn sidebar_visible(&self) -> ReadOnly<bool> {
        ReadOnly::from(&self.sidebar)
    }

    #[must_use]
    pub fn mobile_menu_open(&self) -> ReadOnly<bool> {
        ReadOnly::from(&self.menu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn coordinator() -> NavigationCoordinator {
        NavigationCoordinator::new(ms(900))
    }

    #[test]
    fn starts_home_with_sidebar_hidden() {
        assert_eq!(coordinator().state(), NavigationState::default());
    }

    #[test]
    fn override_expires_at_deadline() {
        let mut o = ManualOverride::default();
        assert!(!o.is_active(ms(0)));
        o.arm(ms(100), ms(900));
        assert!(o.is_active(ms(100)));
        assert!(o.is_active(ms(999)));
        assert!(!o.is_active(ms(1000)));
        o.clear();
        assert_eq!(o.expires_at(), None);
    }

    #[test]
    fn manual_navigation_suppresses_locator() {
        let mut nav = coordinator();
        let out = nav.navigate_to(SectionId::Resume, true, ms(0));
        assert!(out.changed && out.suppressed);
        assert!(!nav.on_locator_update(LocatorUpdate::for_section(SectionId::About), ms(100)));
        assert_eq!(nav.state().active_section, SectionId::Resume);
        assert!(nav.on_locator_update(LocatorUpdate::for_section(SectionId::About), ms(900)));
        assert_eq!(nav.state().active_section, SectionId::About);
    }

    #[test]
    fn rearming_extends_window() {
        let mut nav = coordinator();
        nav.navigate_to(SectionId::About, true, ms(0));
        nav.navigate_to(SectionId::Portfolio, true, ms(500));
        assert!(nav.is_suppressed(ms(1300)));
        assert!(!nav.is_suppressed(ms(1400)));
    }

    #[test]
    fn non_manual_navigation_does_not_suppress() {
        let mut nav = coordinator();
        let out = nav.navigate_to(SectionId::About, false, ms(0));
        assert!(!out.suppressed);
        assert!(nav.on_locator_update(LocatorUpdate::for_section(SectionId::Home), ms(1)));
    }

    #[test]
    fn sidebar_follows_active_section() {
        let mut nav = coordinator();
        nav.navigate_to(SectionId::Testimonials, true, ms(0));
        assert!(nav.state().sidebar_visible);
        nav.navigate_to(SectionId::Cta, true, ms(10));
        assert!(!nav.state().sidebar_visible);
        nav.navigate_to(SectionId::Home, false, ms(20));
        assert!(!nav.state().sidebar_visible);
    }

    #[test]
    fn any_navigation_closes_menu() {
        let mut nav = coordinator();
        assert!(nav.toggle_mobile_menu());
        nav.navigate_to(SectionId::About, false, ms(0));
        assert!(!nav.state().mobile_menu_open);
        assert!(!nav.is_suppressed(ms(0)));
        assert!(nav.set_mobile_menu_open(true));
        nav.navigate_to(SectionId::Resume, true, ms(10));
        assert!(!nav.state().mobile_menu_open);
    }

    #[test]
    fn same_section_is_unchanged() {
        let mut nav = coordinator();
        let out = nav.navigate_to(SectionId::Home, true, ms(0));
        assert!(!out.changed);
        assert_eq!(nav.active_section().version(), 0);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let mut nav = coordinator();
        assert!(nav.navigate_to_name("#nowhere", true, ms(0)).is_err());
        assert_eq!(nav.state(), NavigationState::default());
        assert!(!nav.is_suppressed(ms(0)));
        let out = nav.navigate_to_name("#portfolio", true, ms(0)).unwrap();
        assert_eq!(out.section, SectionId::Portfolio);
    }

    #[test]
    fn read_only_views_observe_changes() {
        let mut nav = coordinator();
        let active = nav.active_section();
        let sidebar = nav.sidebar_visible();
        nav.on_locator_update(LocatorUpdate::for_section(SectionId::About), ms(0));
        assert_eq!(active.get(), SectionId::About);
        assert!(sidebar.get());
    }

    #[test]
    fn menu_setter_reports_change() {
        let mut nav = coordinator();
        assert!(nav.set_mobile_menu_open(true));
        assert!(!nav.set_mobile_menu_open(true));
        assert!(nav.mobile_menu_open().get());
        assert!(!nav.toggle_mobile_menu());
    }
}
