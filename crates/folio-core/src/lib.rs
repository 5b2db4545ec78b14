#![forbid(unsafe_code)]

//! Core: section identities, geometry, content, and host notifications.
//!
//! # Role in Folio
//! `folio-core` is the leaf layer. It owns the closed set of page sections,
//! the rectangles the locator measures, the static content the shell renders,
//! and the frame coalescer that bounds geometry recomputation.
//!
//! # How it fits in the system
//! `folio-backend` defines platform services in terms of these types, and
//! `folio-runtime` builds the preloader, locator, and navigation coordinator
//! on top of both.

pub mod content;
pub mod event;
pub mod frame_coalescer;
pub mod geometry;
pub mod section;

pub use event::{ListenerKind, LocateTrigger, PlatformEvent};
pub use geometry::{Rect, SectionAnchor, Viewport};
pub use section::{ParseSectionError, SectionId};
