#![forbid(unsafe_code)]
#![doc = "Platform-services traits for Folio: the boundary between the runtime and the page."]
#![doc = ""]
#![doc = "The runtime never touches window- or document-level singletons. Everything it"]
#![doc = "needs from the page (geometry, scrolling, listener and observer lifetimes,"]
#![doc = "animation frames, image loads, and time) flows through these traits, so the"]
#![doc = "locator and navigation coordinator run headlessly against `folio-web`."]

use core::time::Duration;

use folio_core::event::ListenerKind;
use folio_core::geometry::{Rect, Viewport};
use folio_core::section::SectionId;
use serde::{Deserialize, Serialize};

/// How a scroll command is animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

/// Monotonic clock abstraction.
///
/// Browsers back this with `performance.now()`; tests advance it by hand.
/// The runtime never calls `Instant::now()` directly.
pub trait PlatformClock {
    /// Elapsed time since an unspecified epoch, monotonically non-decreasing.
    fn now_mono(&self) -> Duration;
}

/// Read-only layout queries.
pub trait GeometryQuery {
    /// Current viewport size.
    fn viewport(&self) -> Viewport;

    /// Current vertical scroll offset of the document.
    fn scroll_top(&self) -> f64;

    /// Total scrollable height of the document.
    fn document_height(&self) -> f64;

    /// Viewport-relative rectangle of the element registered for `id`, if it
    /// is mounted. This is the stable-reference lookup.
    fn registered_rect(&self, id: SectionId) -> Option<Rect>;

    /// Viewport-relative rectangle of the first element carrying
    /// `data-section="<id>"`, if any. This is the content-addressable lookup
    /// used when no reference is registered.
    fn query_section_rect(&self, id: SectionId) -> Option<Rect>;
}

/// Scroll position control.
pub trait ScrollControl {
    /// Scroll the document so its top edge sits at `top`.
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);
}

/// Window listener and animation-frame lifetimes.
///
/// The host forwards events for attached listeners back into the runtime.
/// Every `listen` is paired with an `unlisten` on teardown.
pub trait EventSubscription {
    fn listen(&mut self, kind: ListenerKind);

    fn unlisten(&mut self, kind: ListenerKind);

    /// Ask for one animation-frame callback.
    fn request_frame(&mut self);

    /// Withdraw an outstanding frame request.
    fn cancel_frame(&mut self);
}

/// DOM subtree mutation notifications.
pub trait MutationNotify {
    /// Start observing child-list changes across the whole document.
    fn observe_mutations(&mut self);

    /// Stop observing.
    fn disconnect_mutations(&mut self);
}

/// Image fetching.
///
/// Loads are fire-and-forget: the host reports each settlement (success or
/// failure) back to the runtime.
pub trait AssetLoader {
    fn begin_load(&mut self, url: &str);
}

/// Every service the runtime needs from the page.
pub trait Platform:
    PlatformClock + GeometryQuery + ScrollControl + EventSubscription + MutationNotify + AssetLoader
{
}

impl<T> Platform for T where
    T: PlatformClock
        + GeometryQuery
        + ScrollControl
        + EventSubscription
        + MutationNotify
        + AssetLoader
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_behavior_defaults_to_smooth() {
        assert_eq!(ScrollBehavior::default(), ScrollBehavior::Smooth);
    }

    // -----------------------------------------------------------------------
    // Mock implementation for trait testing
    // -----------------------------------------------------------------------

    #[derive(Default)]
    struct TestPage {
        now: Duration,
        scroll: f64,
        listeners: Vec<ListenerKind>,
        frames: u32,
        observing: bool,
        loads: Vec<String>,
    }

    impl PlatformClock for TestPage {
        fn now_mono(&self) -> Duration {
            self.now
        }
    }

    impl GeometryQuery for TestPage {
        fn viewport(&self) -> Viewport {
            Viewport::new(1024.0, 768.0)
        }

        fn scroll_top(&self) -> f64 {
            self.scroll
        }

        fn document_height(&self) -> f64 {
            4000.0
        }

        fn registered_rect(&self, id: SectionId) -> Option<Rect> {
            (id == SectionId::Home).then(|| Rect::band(-self.scroll, 768.0))
        }

        fn query_section_rect(&self, _id: SectionId) -> Option<Rect> {
            None
        }
    }

    impl ScrollControl for TestPage {
        fn scroll_to(&mut self, top: f64, _behavior: ScrollBehavior) {
            self.scroll = top;
        }
    }

    impl EventSubscription for TestPage {
        fn listen(&mut self, kind: ListenerKind) {
            self.listeners.push(kind);
        }

        fn unlisten(&mut self, kind: ListenerKind) {
            self.listeners.retain(|k| *k != kind);
        }

        fn request_frame(&mut self) {
            self.frames += 1;
        }

        fn cancel_frame(&mut self) {
            self.frames = 0;
        }
    }

    impl MutationNotify for TestPage {
        fn observe_mutations(&mut self) {
            self.observing = true;
        }

        fn disconnect_mutations(&mut self) {
            self.observing = false;
        }
    }

    impl AssetLoader for TestPage {
        fn begin_load(&mut self, url: &str) {
            self.loads.push(url.to_owned());
        }
    }

    fn exercise<P: Platform>(p: &mut P) -> Option<Rect> {
        p.listen(ListenerKind::Scroll);
        p.observe_mutations();
        p.request_frame();
        p.begin_load("/a.jpg");
        p.scroll_to(100.0, ScrollBehavior::Smooth);
        p.registered_rect(SectionId::Home)
    }

    #[test]
    fn blanket_platform_impl_covers_composite() {
        let mut page = TestPage::default();
        let rect = exercise(&mut page);
        assert_eq!(rect, Some(Rect::band(-100.0, 768.0)));
        assert_eq!(page.listeners, vec![ListenerKind::Scroll]);
        assert!(page.observing);
        assert_eq!(page.frames, 1);
        assert_eq!(page.loads, vec!["/a.jpg".to_owned()]);
    }

    #[test]
    fn unlisten_and_disconnect_release() {
        let mut page = TestPage::default();
        exercise(&mut page);
        page.unlisten(ListenerKind::Scroll);
        page.disconnect_mutations();
        page.cancel_frame();
        assert!(page.listeners.is_empty());
        assert!(!page.observing);
        assert_eq!(page.frames, 0);
        assert_eq!(page.now_mono(), Duration::ZERO);
    }
}
