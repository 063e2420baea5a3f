//! The capture pipeline: focus lookup, rectangle validation, strategy
//! selection, serialization.
//!
//! The pipeline is generic over the capability traits in [`super::window`]
//! and [`super::strategy`]; it contains no OS calls of its own and runs
//! unchanged against the GDI backend or against test doubles. Surfaces are
//! released by `Drop`, so every exit path (success, fallback, any error)
//! tears down in reverse acquisition order without bookkeeping here.

use std::path::Path;

use crate::capture::strategy::RenderStrategy;
use crate::capture::types::{CaptureError, CaptureReport};
use crate::capture::window::{FocusedWindowProvider, RenderSurface, SurfaceProvider};

/// Captures the currently focused window into a bitmap file at `output`.
///
/// Strategies are tried in order; the first to report success wins. The
/// report names the winning strategy, since a silent fallback is painful to
/// debug when composited windows come out blank.
pub fn capture_with<P, F>(
    provider: &P,
    surfaces: &F,
    strategies: &[&dyn RenderStrategy<P::Window, F::Surface>],
    output: &Path,
) -> Result<CaptureReport, CaptureError>
where
    P: FocusedWindowProvider,
    F: SurfaceProvider<Window = P::Window>,
{
    let window = provider.focused_window().ok_or(CaptureError::NoActiveWindow)?;

    let bounds = provider.window_bounds(&window)?;
    if !bounds.is_valid() {
        return Err(CaptureError::InvalidWindowSize {
            width: bounds.width(),
            height: bounds.height(),
        });
    }
    log::debug!(
        "capturing window at ({}, {}) size {}x{}",
        bounds.left,
        bounds.top,
        bounds.width(),
        bounds.height()
    );

    let mut surface = surfaces.acquire(&window, bounds)?;

    let mut rendered = None;
    for strategy in strategies {
        if strategy.render(&window, &mut surface) {
            rendered = Some(strategy.name());
            break;
        }
        log::warn!("render strategy '{}' failed, trying next", strategy.name());
    }
    let strategy = rendered.ok_or(CaptureError::RenderFailed)?;

    surface.write_bitmap(output)?;
    log::info!(
        "captured {}x{} via '{}' to {}",
        bounds.width(),
        bounds.height(),
        strategy,
        output.display()
    );

    Ok(CaptureReport {
        strategy,
        width: bounds.width(),
        height: bounds.height(),
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::capture::types::Bounds;

    /// Deterministic focus fixture: a fixed window id and rectangle.
    struct FakeProvider {
        window: Option<u32>,
        bounds: Result<Bounds, String>,
    }

    impl FakeProvider {
        fn with_bounds(bounds: Bounds) -> Self {
            Self {
                window: Some(7),
                bounds: Ok(bounds),
            }
        }
    }

    impl FocusedWindowProvider for FakeProvider {
        type Window = u32;

        fn focused_window(&self) -> Option<u32> {
            self.window
        }

        fn window_bounds(&self, _window: &u32) -> Result<Bounds, CaptureError> {
            self.bounds
                .clone()
                .map_err(CaptureError::RectQueryFailed)
        }
    }

    /// Counts acquisitions and (via `Drop`) releases, so tests can assert
    /// that no surface outlives a capture whatever the outcome.
    struct FakeSurfaces {
        acquired: Arc<AtomicUsize>,
        released: Arc<AtomicUsize>,
        fail_acquire: bool,
        fail_write: bool,
    }

    impl FakeSurfaces {
        fn new() -> Self {
            Self {
                acquired: Arc::new(AtomicUsize::new(0)),
                released: Arc::new(AtomicUsize::new(0)),
                fail_acquire: false,
                fail_write: false,
            }
        }

        fn assert_balanced(&self) {
            assert_eq!(
                self.acquired.load(Ordering::SeqCst),
                self.released.load(Ordering::SeqCst),
                "surface acquire/release counts diverged"
            );
        }
    }

    struct FakeSurface {
        bounds: Bounds,
        painted: bool,
        fail_write: bool,
        released: Arc<AtomicUsize>,
    }

    impl Drop for FakeSurface {
        fn drop(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl RenderSurface for FakeSurface {
        fn write_bitmap(&self, path: &Path) -> Result<(), CaptureError> {
            if self.fail_write {
                return Err(CaptureError::WriteFailed("disk full".into()));
            }
            assert!(self.painted, "serialized a surface nothing rendered into");
            let pixels = vec![0u8; (self.bounds.width() * self.bounds.height()) as usize];
            std::fs::write(path, pixels).map_err(|e| CaptureError::WriteFailed(e.to_string()))
        }
    }

    impl SurfaceProvider for FakeSurfaces {
        type Window = u32;
        type Surface = FakeSurface;

        fn acquire(&self, _window: &u32, bounds: Bounds) -> Result<FakeSurface, CaptureError> {
            if self.fail_acquire {
                return Err(CaptureError::SurfaceAcquisition("no memory dc".into()));
            }
            self.acquired.fetch_add(1, Ordering::SeqCst);
            Ok(FakeSurface {
                bounds,
                painted: false,
                fail_write: self.fail_write,
                released: self.released.clone(),
            })
        }
    }

    struct FixedStrategy {
        name: &'static str,
        succeeds: bool,
        calls: AtomicUsize,
    }

    impl FixedStrategy {
        fn new(name: &'static str, succeeds: bool) -> Self {
            Self {
                name,
                succeeds,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl RenderStrategy<u32, FakeSurface> for FixedStrategy {
        fn name(&self) -> &'static str {
            self.name
        }

        fn render(&self, _window: &u32, surface: &mut FakeSurface) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeeds {
                surface.painted = true;
            }
            self.succeeds
        }
    }

    fn sample_bounds() -> Bounds {
        Bounds {
            left: 100,
            top: 100,
            right: 500,
            bottom: 400,
        }
    }

    fn out_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("shot.bmp")
    }

    #[test]
    fn primary_strategy_wins() {
        let dir = tempfile::tempdir().unwrap();
        let output = out_path(&dir);
        let provider = FakeProvider::with_bounds(sample_bounds());
        let surfaces = FakeSurfaces::new();
        let primary = FixedStrategy::new("full-render", true);
        let fallback = FixedStrategy::new("block-copy", true);

        let report =
            capture_with(&provider, &surfaces, &[&primary, &fallback], &output).unwrap();

        assert_eq!(report.strategy, "full-render");
        assert_eq!((report.width, report.height), (400, 300));
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
        assert!(output.exists());
        surfaces.assert_balanced();
    }

    #[test]
    fn fallback_runs_when_primary_fails() {
        let dir = tempfile::tempdir().unwrap();
        let output = out_path(&dir);
        let provider = FakeProvider::with_bounds(sample_bounds());
        let surfaces = FakeSurfaces::new();
        let primary = FixedStrategy::new("full-render", false);
        let fallback = FixedStrategy::new("block-copy", true);

        let report =
            capture_with(&provider, &surfaces, &[&primary, &fallback], &output).unwrap();

        assert_eq!(report.strategy, "block-copy");
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert!(output.exists());
        surfaces.assert_balanced();
    }

    #[test]
    fn all_strategies_failing_is_render_failed() {
        let dir = tempfile::tempdir().unwrap();
        let output = out_path(&dir);
        let provider = FakeProvider::with_bounds(sample_bounds());
        let surfaces = FakeSurfaces::new();
        let primary = FixedStrategy::new("full-render", false);
        let fallback = FixedStrategy::new("block-copy", false);

        let err = capture_with(&provider, &surfaces, &[&primary, &fallback], &output)
            .unwrap_err();

        assert!(matches!(err, CaptureError::RenderFailed));
        assert!(!output.exists());
        surfaces.assert_balanced();
    }

    #[test]
    fn no_focused_window() {
        let dir = tempfile::tempdir().unwrap();
        let output = out_path(&dir);
        let provider = FakeProvider {
            window: None,
            bounds: Ok(sample_bounds()),
        };
        let surfaces = FakeSurfaces::new();
        let primary = FixedStrategy::new("full-render", true);

        let err = capture_with(&provider, &surfaces, &[&primary], &output).unwrap_err();

        assert!(matches!(err, CaptureError::NoActiveWindow));
        assert_eq!(err.to_string(), "No active window found");
        assert!(!output.exists());
        assert_eq!(surfaces.acquired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn rect_query_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let output = out_path(&dir);
        let provider = FakeProvider {
            window: Some(7),
            bounds: Err("query failed".into()),
        };
        let surfaces = FakeSurfaces::new();
        let primary = FixedStrategy::new("full-render", true);

        let err = capture_with(&provider, &surfaces, &[&primary], &output).unwrap_err();

        assert!(matches!(err, CaptureError::RectQueryFailed(_)));
        assert!(!output.exists());
        assert_eq!(surfaces.acquired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn degenerate_rectangle_is_rejected_before_acquisition() {
        let dir = tempfile::tempdir().unwrap();
        let output = out_path(&dir);
        let provider = FakeProvider::with_bounds(Bounds {
            left: 50,
            top: 50,
            right: 50,
            bottom: 400,
        });
        let surfaces = FakeSurfaces::new();
        let primary = FixedStrategy::new("full-render", true);

        let err = capture_with(&provider, &surfaces, &[&primary], &output).unwrap_err();

        match err {
            CaptureError::InvalidWindowSize { width, height } => {
                assert_eq!((width, height), (0, 350));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!output.exists());
        assert_eq!(surfaces.acquired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn surface_released_when_write_fails() {
        let dir = tempfile::tempdir().unwrap();
        let output = out_path(&dir);
        let provider = FakeProvider::with_bounds(sample_bounds());
        let mut surfaces = FakeSurfaces::new();
        surfaces.fail_write = true;
        let primary = FixedStrategy::new("full-render", true);

        let err = capture_with(&provider, &surfaces, &[&primary], &output).unwrap_err();

        assert!(matches!(err, CaptureError::WriteFailed(_)));
        assert_eq!(surfaces.acquired.load(Ordering::SeqCst), 1);
        surfaces.assert_balanced();
    }

    #[test]
    fn acquisition_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let output = out_path(&dir);
        let provider = FakeProvider::with_bounds(sample_bounds());
        let mut surfaces = FakeSurfaces::new();
        surfaces.fail_acquire = true;
        let primary = FixedStrategy::new("full-render", true);

        let err = capture_with(&provider, &surfaces, &[&primary], &output).unwrap_err();

        assert!(matches!(err, CaptureError::SurfaceAcquisition(_)));
        assert!(!output.exists());
        surfaces.assert_balanced();
    }
}
