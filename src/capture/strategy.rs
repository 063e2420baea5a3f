//! Render strategies.
//!
//! A capture tries an ordered list of strategies and keeps the first one
//! that reports success. The list is data, not a hardcoded two-way branch,
//! so a new capture path (for example a DirectX-aware one) slots in without
//! touching the pipeline.

/// One way of drawing a window's content into an off-screen surface.
///
/// `render` returns `true` only on exact success; anything else makes the
/// pipeline move on to the next strategy in the list.
pub trait RenderStrategy<W, S> {
    /// Short identifier used in logs and in the capture report.
    fn name(&self) -> &'static str;

    fn render(&self, window: &W, surface: &mut S) -> bool;
}
