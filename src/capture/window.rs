//! Capability traits the capture pipeline is built against.
//!
//! The pipeline itself is portable; everything that touches OS state (focus
//! queries, drawing contexts, pixel serialization) sits behind these traits
//! so tests can substitute deterministic fixtures. The real Windows
//! implementations live in [`super::gdi`].

use std::path::Path;

use crate::capture::types::{Bounds, CaptureError};

/// Source of the "currently focused window" plus its screen rectangle.
///
/// Focus is global OS state; it is queried exactly once per capture and not
/// re-validated if the window closes or moves mid-call.
pub trait FocusedWindowProvider {
    /// Opaque handle to a live window. Held only for the duration of one
    /// capture, never persisted.
    type Window;

    /// The window that currently has input focus, if any.
    fn focused_window(&self) -> Option<Self::Window>;

    /// Screen-coordinate bounding rectangle of `window`.
    fn window_bounds(&self, window: &Self::Window) -> Result<Bounds, CaptureError>;
}

/// An off-screen render target sized to one window, serializable to a bitmap
/// file once a strategy has drawn into it.
///
/// Implementations own whatever OS resources back the surface and must
/// release them in `Drop`, so every exit path of the pipeline cleans up.
pub trait RenderSurface {
    fn write_bitmap(&self, path: &Path) -> Result<(), CaptureError>;
}

/// Factory for scoped off-screen surfaces chained to a window's own drawing
/// context.
pub trait SurfaceProvider {
    type Window;
    type Surface: RenderSurface;

    fn acquire(
        &self,
        window: &Self::Window,
        bounds: Bounds,
    ) -> Result<Self::Surface, CaptureError>;
}
