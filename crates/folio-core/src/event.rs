#![forbid(unsafe_code)]

//! Host notifications.
//!
//! The host (a browser shim or a headless page) forwards these to the
//! runtime. None of them carry geometry for individual sections; the runtime
//! re-queries geometry when it next computes.

use serde::{Deserialize, Serialize};

/// A geometry-affecting notification from the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PlatformEvent {
    /// The document scrolled; `top` is the new scroll offset.
    Scroll { top: f64 },
    /// The viewport was resized.
    Resize { width: f64, height: f64 },
    /// The DOM subtree changed (late-mounted content).
    Mutation,
}

impl PlatformEvent {
    /// The locator trigger this event maps to.
    #[must_use]
    pub const fn trigger(&self) -> LocateTrigger {
        match self {
            Self::Scroll { .. } => LocateTrigger::Scroll,
            Self::Resize { .. } => LocateTrigger::Resize,
            Self::Mutation => LocateTrigger::Mutation,
        }
    }
}

/// Why a locator pass was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocateTrigger {
    /// First pass on mount.
    Initial,
    Scroll,
    Resize,
    Mutation,
    /// Scheduled pass absorbing late layout shifts.
    Settle,
}

impl LocateTrigger {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Scroll => "scroll",
            Self::Resize => "resize",
            Self::Mutation => "mutation",
            Self::Settle => "settle",
        }
    }
}

/// Window-level listeners the runtime asks the host to attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListenerKind {
    /// Passive scroll listener.
    Scroll,
    Resize,
}
