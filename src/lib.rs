//! snapwin
//!
//! Two small utilities sharing one crate: a snapshot tool that captures the
//! currently focused window to a bitmap file (Windows, GDI-based, with a
//! compositor-aware primary render path and a raw-blit fallback), and a
//! compositor that pastes one image centered atop another preserving alpha.

pub mod capture;
pub mod compose;
