#![forbid(unsafe_code)]

//! Folio Runtime
//!
//! The stateful half of the portfolio site: image preloading, scroll-driven
//! section location, manual-navigation arbitration, and scroll-to-section.
//!
//! # Key Components
//!
//! - [`PortfolioApp`] - Host-driven owner of every component below
//! - [`Preloader`] - Image warm-up with progress, timeout, and skip
//! - [`SectionLocator`] - Frame-coalesced nearest-to-center section finder
//! - [`NavigationCoordinator`] - Active section, sidebar, and mobile menu state
//! - [`ScrollToSection`] - Sticky-offset scrolling with bounded retries
//! - [`ErrorBoundary`] - Sticky render fault containment
//!
//! # Role in Folio
//! Nothing here touches a browser. All page access goes through the
//! `folio-backend` traits and all time comes from the platform clock, so the
//! same code runs under wasm and in headless tests (`folio-web`).

pub mod app;
pub mod boundary;
pub mod cancellation;
pub mod config;
pub mod gallery;
pub mod locator;
#[cfg(feature = "logging")]
pub mod logging;
pub mod navigation;
pub mod preload;
pub mod reactive;
pub mod retry;
pub mod scroll;
pub mod timer;

pub use app::{Lifecycle, PortfolioApp, ShellState};
pub use boundary::{ErrorBoundary, FaultPanel, RenderFault, Rendered};
pub use cancellation::{CancellationSource, CancellationToken};
pub use config::{ConfigError, FolioConfig, LayoutConfig, NavigationConfig, PreloadConfig};
pub use gallery::{GalleryKey, GalleryView, PortfolioGallery};
pub use locator::{LocatorUpdate, SectionLocator, collect_anchors, locate};
pub use navigation::{ManualOverride, NavigationCoordinator, NavigationOutcome, NavigationState};
pub use preload::{DoneReason, PreloadEvent, PreloadState, Preloader};
pub use reactive::{Observable, ReadOnly, Subscription};
pub use retry::{RetryPolicy, RetryState};
pub use scroll::{ScrollOutcome, ScrollToSection, clamp_scroll_offset, resolve_target};
pub use timer::TimerQueue;
