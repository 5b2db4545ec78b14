#![forbid(unsafe_code)]

//! Geometric primitives.

use serde::{Deserialize, Serialize};

use crate::section::SectionId;

/// A layout rectangle in CSS pixels.
///
/// Rectangles reported by the host are viewport-relative, the same frame
/// `getBoundingClientRect` uses: `y == 0` is the top edge of the viewport and
/// negative values lie above it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A full-width band starting at `y`. Section geometry only needs the
    /// vertical extent.
    #[inline]
    pub const fn band(y: f64, height: f64) -> Self {
        Self::new(0.0, y, 0.0, height)
    }

    /// Top edge.
    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Vertical midpoint.
    #[inline]
    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Whether the rectangle has strictly positive height.
    ///
    /// NaN heights are treated as collapsed.
    #[inline]
    pub fn has_height(&self) -> bool {
        self.height > 0.0
    }

    /// Translate vertically.
    #[inline]
    #[must_use]
    pub fn offset_y(&self, dy: f64) -> Rect {
        Rect {
            y: self.y + dy,
            ..*self
        }
    }
}

/// Visible viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Vertical center line, the reference the locator measures against.
    #[inline]
    pub fn center_y(&self) -> f64 {
        self.height / 2.0
    }
}

/// A section paired with its current layout rectangle.
///
/// Anchors are rebuilt on every locator pass and never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionAnchor {
    pub id: SectionId,
    pub rect: Rect,
}

impl SectionAnchor {
    #[inline]
    pub const fn new(id: SectionId, rect: Rect) -> Self {
        Self { id, rect }
    }
}
