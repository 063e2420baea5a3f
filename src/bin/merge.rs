//! snapwin-merge CLI: paste one image centered atop another, preserving
//! alpha.
//!
//! Usage: `snapwin-merge <base> <overlay> [output]` (output defaults to
//! `merged_output.png`).

use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args_os().skip(1);
    let (Some(base), Some(overlay)) = (args.next(), args.next()) else {
        eprintln!("Usage: snapwin-merge <base_image> <overlay_image> [output_path]");
        return ExitCode::FAILURE;
    };
    let base = PathBuf::from(base);
    let overlay = PathBuf::from(overlay);
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("merged_output.png"));

    match snapwin::compose::merge_centered(&base, &overlay, &output) {
        Ok(report) => {
            println!("Images merged successfully! Saved to: {}", output.display());
            println!("  Base image: {}x{}", report.base_width, report.base_height);
            println!(
                "  Overlay image: {}x{}",
                report.overlay_width, report.overlay_height
            );
            println!(
                "  Overlay position: ({}, {})",
                report.offset_x, report.offset_y
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
