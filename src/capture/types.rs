//! Data types for the active-window capture pipeline.

use thiserror::Error;

/// Screen-coordinate bounding box of a window, as reported by the OS.
///
/// Coordinates are signed: a window dragged past the left or top edge of the
/// primary monitor has negative `left`/`top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Both dimensions strictly positive. Minimized windows commonly report
    /// degenerate rectangles, which must not reach the GDI layer.
    pub fn is_valid(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }
}

/// Errors that can occur during a capture. All are terminal for the
/// invocation; nothing is retried.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("No active window found")]
    NoActiveWindow,

    #[error("Failed to query window rectangle: {0}")]
    RectQueryFailed(String),

    #[error("Invalid window size: {width}x{height}")]
    InvalidWindowSize { width: i32, height: i32 },

    #[error("Failed to acquire capture surface: {0}")]
    SurfaceAcquisition(String),

    #[error("All render strategies failed")]
    RenderFailed,

    #[error("Failed to write output image: {0}")]
    WriteFailed(String),
}

/// Summary of a successful capture, including which strategy rendered the
/// window (the fallback path is otherwise invisible to the caller).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureReport {
    pub strategy: &'static str,
    pub width: i32,
    pub height: i32,
}
