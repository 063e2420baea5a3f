//! Active-window snapshot pipeline.
//!
//! This module provides:
//! - Capability traits for focus lookup and off-screen surfaces ([`window`])
//! - An ordered render-strategy abstraction ([`strategy`])
//! - The portable capture pipeline ([`pipeline`])
//! - The GDI backend and `capture_active_window` entry point ([`gdi`],
//!   Windows only)

pub mod pipeline;
pub mod strategy;
pub mod types;
pub mod window;

#[cfg(windows)]
pub mod gdi;

pub use pipeline::capture_with;
pub use strategy::RenderStrategy;
pub use types::{Bounds, CaptureError, CaptureReport};
pub use window::{FocusedWindowProvider, RenderSurface, SurfaceProvider};

#[cfg(windows)]
pub use gdi::capture_active_window;
