//! snapwin CLI: capture the currently focused window to a bitmap file.
//!
//! Usage: `snapwin <output_path>`. Exits 0 with a confirmation on success,
//! 1 with a diagnostic on stderr on any failure.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args_os().skip(1);
    let Some(output) = args.next() else {
        eprintln!("Usage: snapwin <output_path>");
        return ExitCode::FAILURE;
    };
    let output = PathBuf::from(output);

    match run(&output) {
        Ok(()) => {
            println!("Screenshot saved to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(windows)]
fn run(output: &std::path::Path) -> Result<()> {
    let report = snapwin::capture::capture_active_window(output)?;
    log::debug!(
        "{}x{} rendered by '{}'",
        report.width,
        report.height,
        report.strategy
    );
    Ok(())
}

#[cfg(not(windows))]
fn run(_output: &std::path::Path) -> Result<()> {
    anyhow::bail!("active-window capture is only supported on Windows")
}
