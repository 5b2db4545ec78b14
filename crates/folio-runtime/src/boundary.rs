#![forbid(unsafe_code)]

//! Render fault containment.
//!
//! [`ErrorBoundary`] wraps the shell's render step. A render that returns a
//! [`RenderFault`] or panics trips the boundary; from then on it yields a
//! [`FaultPanel`] describing the failure instead of calling the renderer.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// A failed render, with the chain of components it unwound through
/// (innermost first).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RenderFault {
    pub message: String,
    pub call_path: Vec<String>,
}

impl RenderFault {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            call_path: Vec::new(),
        }
    }

    /// Record that the fault passed through `component`.
    #[must_use]
    pub fn within(mut self, component: impl Into<String>) -> Self {
        self.call_path.push(component.into());
        self
    }

    fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "render panicked".to_owned());
        Self::new(message)
    }
}

/// What the shell shows after a fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaultPanel {
    pub title: &'static str,
    pub message: String,
    /// One `in <component>` line per frame, innermost first.
    pub call_path: String,
}

impl FaultPanel {
    fn from_fault(fault: &RenderFault) -> Self {
        let call_path = fault
            .call_path
            .iter()
            .map(|c| format!("    in {c}"))
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            title: "Runtime error (see console)",
            message: fault.message.clone(),
            call_path,
        }
    }
}

/// Outcome of a guarded render.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered<T> {
    View(T),
    Fallback(FaultPanel),
}

impl<T> Rendered<T> {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Sticky render guard.
#[derive(Debug, Default)]
pub struct ErrorBoundary {
    tripped: Option<FaultPanel>,
}

impl ErrorBoundary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `render` for `component` unless the boundary has already tripped.
    pub fn render<T>(
        &mut self,
        component: &str,
        render: impl FnOnce() -> Result<T, RenderFault>,
    ) -> Rendered<T> {
        if let Some(panel) = &self.tripped {
            return Rendered::Fallback(panel.clone());
        }
        let fault = match catch_unwind(AssertUnwindSafe(render)) {
            Ok(Ok(view)) => return Rendered::View(view),
            Ok(Err(fault)) => fault,
            Err(payload) => RenderFault::from_panic(payload.as_ref()),
        }
        .within(component);
        error!(
            fault = %fault.message,
            call_path = ?fault.call_path,
            "render fault"
        );
        let panel = FaultPanel::from_fault(&fault);
        self.tripped = Some(panel.clone());
        Rendered::Fallback(panel)
    }

    #[must_use]
    pub fn is_tripped(&self) -> bool {
        self.tripped.is_some()
    }

    #[must_use]
    pub fn fault(&self) -> Option<&FaultPanel> {
        self.tripped.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn healthy_render_passes_through() {
        let mut b = ErrorBoundary::new();
        assert_eq!(b.render("shell", || Ok::<_, RenderFault>(3)), Rendered::View(3));
        assert!(!b.is_tripped());
    }

    #[test]
    fn returned_fault_trips_with_call_path() {
        let mut b = ErrorBoundary::new();
        let out = b.render("shell", || {
            Err::<(), _>(RenderFault::new("bad rating").within("Testimonials"))
        });
        let Rendered::Fallback(panel) = out else {
            panic!("expected fallback");
        };
        assert_eq!(panel.message, "bad rating");
        assert_eq!(panel.call_path, "    in Testimonials\n    in shell");
        assert!(b.is_tripped());
    }

    #[test]
    fn panic_is_contained() {
        let mut b = ErrorBoundary::new();
        let out = b.render("shell", || -> Result<(), RenderFault> { panic!("boom") });
        assert!(out.is_fallback());
        assert_eq!(b.fault().map(|p| p.message.as_str()), Some("boom"));
    }

    #[test]
    fn tripped_boundary_is_sticky() {
        let mut b = ErrorBoundary::new();
        let _ = b.render("shell", || Err::<(), _>(RenderFault::new("first")));
        let mut called = false;
        let out = b.render("shell", || {
            called = true;
            Ok::<_, RenderFault>(())
        });
        assert!(!called);
        assert!(out.is_fallback());
    }

    #[test]
    fn formatted_panic_message_survives() {
        let mut b = ErrorBoundary::new();
        let n = 4;
        let _ = b.render("grid", || -> Result<(), RenderFault> { panic!("item {n} missing") });
        assert_eq!(b.fault().map(|p| p.message.clone()), Some("item 4 missing".into()));
    }
}
