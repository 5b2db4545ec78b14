#![forbid(unsafe_code)]

//! Folio public facade crate.
//!
//! This crate provides the stable surface for embedding the portfolio
//! runtime. It re-exports the common types from the internal crates and
//! offers a lightweight prelude.
//!
//! ```
//! use folio::prelude::*;
//!
//! let config = FolioConfig::from_toml_str("[navigation]\nsticky_offset = 64.0\n")?;
//! assert_eq!(config.navigation.sticky_offset, 64.0);
//! assert_eq!("resume".parse::<SectionId>()?, SectionId::Resume);
//! # Ok::<(), folio::Error>(())
//! ```

use std::path::Path;

// --- Core re-exports -------------------------------------------------------

pub use folio_core::content::{self, NAV, PORTFOLIO, TESTIMONIALS, preload_urls};
pub use folio_core::frame_coalescer::FrameCoalescer;
pub use folio_core::{
    ListenerKind, LocateTrigger, ParseSectionError, PlatformEvent, Rect, SectionAnchor,
    SectionId, Viewport,
};

// --- Backend re-exports ----------------------------------------------------

pub use folio_backend::{
    AssetLoader, EventSubscription, GeometryQuery, MutationNotify, Platform, PlatformClock,
    ScrollBehavior, ScrollControl,
};

// --- Runtime re-exports ----------------------------------------------------

pub use folio_runtime::{
    ConfigError, DoneReason, ErrorBoundary, FaultPanel, FolioConfig, GalleryKey, Lifecycle,
    NavigationState, Observable, PortfolioApp, PortfolioGallery, PreloadState, ReadOnly,
    RenderFault, Rendered, ScrollOutcome, ShellState,
};

// --- Web re-exports --------------------------------------------------------

#[cfg(feature = "web")]
pub use folio_web::{HostCommand, PageSection, PageSession, ScrollApply, StepResult, WebPage};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Folio embedders.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Section(#[from] ParseSectionError),
    #[cfg(feature = "logging")]
    #[error(transparent)]
    Logging(#[from] folio_runtime::logging::LoggingError),
}

/// Standard result type for Folio APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Load and validate a configuration file.
///
/// `.json` files are parsed as JSON; anything else as TOML.
pub fn load_config(path: impl AsRef<Path>) -> Result<FolioConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        FolioConfig::from_json_str(&text)?
    } else {
        FolioConfig::from_toml_str(&text)?
    };
    Ok(config.validated()?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, FolioConfig, PlatformEvent, PortfolioApp, RenderFault, Rendered, Result,
        SectionId, ShellState,
    };

    #[cfg(feature = "web")]
    pub use crate::{PageSession, WebPage};

    pub use crate::{backend, core, runtime};
}

pub use folio_backend as backend;
pub use folio_core as core;
pub use folio_runtime as runtime;
#[cfg(feature = "web")]
pub use folio_web as web;
