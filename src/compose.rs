//! Centered alpha compositing of two images.

use std::path::Path;

use anyhow::{Context, Result};
use image::imageops;

/// What a merge did: input dimensions and where the overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeReport {
    pub base_width: u32,
    pub base_height: u32,
    pub overlay_width: u32,
    pub overlay_height: u32,
    pub offset_x: i64,
    pub offset_y: i64,
}

/// Pastes `overlay` centered on `base`, blending by the overlay's alpha
/// channel, and writes the result to `output`.
///
/// An overlay larger than the base gets a negative offset and is clipped to
/// the base; the output always has the base's dimensions.
pub fn merge_centered(base: &Path, overlay: &Path, output: &Path) -> Result<MergeReport> {
    let mut canvas = image::open(base)
        .with_context(|| format!("failed to open base image {}", base.display()))?
        .to_rgba8();
    let overlay_img = image::open(overlay)
        .with_context(|| format!("failed to open overlay image {}", overlay.display()))?
        .to_rgba8();

    let (base_w, base_h) = canvas.dimensions();
    let (overlay_w, overlay_h) = overlay_img.dimensions();

    // Floor division keeps a one-pixel-larger overlay biased the same way
    // on both axes.
    let offset_x = (base_w as i64 - overlay_w as i64).div_euclid(2);
    let offset_y = (base_h as i64 - overlay_h as i64).div_euclid(2);

    imageops::overlay(&mut canvas, &overlay_img, offset_x, offset_y);

    canvas
        .save(output)
        .with_context(|| format!("failed to write merged image {}", output.display()))?;

    Ok(MergeReport {
        base_width: base_w,
        base_height: base_h,
        overlay_width: overlay_w,
        overlay_height: overlay_h,
        offset_x,
        offset_y,
    })
}
