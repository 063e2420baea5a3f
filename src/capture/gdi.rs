//! Windows implementation of the capture capabilities, built on classic GDI.
//!
//! The off-screen surface is a compatible bitmap selected into a memory DC
//! chained from the window's own DC. GDI handles live in shared OS tables;
//! leaking a DC or bitmap degrades the whole desktop session over repeated
//! calls, so [`GdiSurface`] owns all four handles and releases them in
//! `Drop`, strictly in reverse acquisition order.

use std::path::Path;

use image::{ImageBuffer, ImageFormat, Rgba};
use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::Graphics::Gdi::{
    BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BitBlt, CreateCompatibleBitmap, CreateCompatibleDC,
    DIB_RGB_COLORS, DeleteDC, DeleteObject, GetDIBits, GetWindowDC, HBITMAP, HDC, HGDIOBJ,
    ReleaseDC, SRCCOPY, SelectObject,
};
use windows::Win32::Storage::Xps::{PRINT_WINDOW_FLAGS, PrintWindow};
use windows::Win32::UI::WindowsAndMessaging::{GetForegroundWindow, GetWindowRect};

use crate::capture::pipeline::capture_with;
use crate::capture::strategy::RenderStrategy;
use crate::capture::types::{Bounds, CaptureError, CaptureReport};
use crate::capture::window::{FocusedWindowProvider, RenderSurface, SurfaceProvider};

/// Asks DWM to render the full window content, including layered and
/// GPU-composited parts. Not exposed through the Win32 metadata.
const PW_RENDERFULLCONTENT: PRINT_WINDOW_FLAGS = PRINT_WINDOW_FLAGS(0x0000_0002);

/// The window the user is currently working in, per `GetForegroundWindow`.
pub struct ForegroundWindow;

impl FocusedWindowProvider for ForegroundWindow {
    type Window = HWND;

    fn focused_window(&self) -> Option<HWND> {
        let hwnd = unsafe { GetForegroundWindow() };
        if hwnd.is_invalid() { None } else { Some(hwnd) }
    }

    fn window_bounds(&self, window: &HWND) -> Result<Bounds, CaptureError> {
        let mut rect = RECT::default();
        unsafe { GetWindowRect(*window, &mut rect) }
            .map_err(|e| CaptureError::RectQueryFailed(e.to_string()))?;
        Ok(Bounds {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
        })
    }
}

/// Off-screen GDI render target for one window.
pub struct GdiSurface {
    hwnd: HWND,
    window_dc: HDC,
    mem_dc: HDC,
    bitmap: HBITMAP,
    prev_bitmap: HGDIOBJ,
    bounds: Bounds,
}

impl GdiSurface {
    fn new(hwnd: HWND, bounds: Bounds) -> Result<Self, CaptureError> {
        unsafe {
            let window_dc = GetWindowDC(hwnd);
            if window_dc.is_invalid() {
                return Err(CaptureError::SurfaceAcquisition(
                    "GetWindowDC returned a null device context".into(),
                ));
            }

            let mem_dc = CreateCompatibleDC(window_dc);
            if mem_dc.is_invalid() {
                let _ = ReleaseDC(hwnd, window_dc);
                return Err(CaptureError::SurfaceAcquisition(
                    "CreateCompatibleDC failed".into(),
                ));
            }

            let bitmap = CreateCompatibleBitmap(window_dc, bounds.width(), bounds.height());
            if bitmap.is_invalid() {
                let _ = DeleteDC(mem_dc);
                let _ = ReleaseDC(hwnd, window_dc);
                return Err(CaptureError::SurfaceAcquisition(
                    "CreateCompatibleBitmap failed".into(),
                ));
            }

            let prev_bitmap = SelectObject(mem_dc, bitmap);

            Ok(Self {
                hwnd,
                window_dc,
                mem_dc,
                bitmap,
                prev_bitmap,
                bounds,
            })
        }
    }

    /// Reads the rendered pixels out as a top-down 32-bit DIB and converts
    /// BGRA to RGBA.
    fn pixels(&self) -> Result<ImageBuffer<Rgba<u8>, Vec<u8>>, CaptureError> {
        let width = self.bounds.width();
        let height = self.bounds.height();

        let mut info = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width,
                // Negative height requests top-down scan line order.
                biHeight: -height,
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut data = vec![0u8; width as usize * height as usize * 4];
        let lines = unsafe {
            GetDIBits(
                self.window_dc,
                self.bitmap,
                0,
                height as u32,
                Some(data.as_mut_ptr() as *mut core::ffi::c_void),
                &mut info,
                DIB_RGB_COLORS,
            )
        };
        if lines != height {
            return Err(CaptureError::WriteFailed(format!(
                "GetDIBits copied {lines} of {height} scan lines"
            )));
        }

        let mut img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::new(width as u32, height as u32);
        for y in 0..height as usize {
            for x in 0..width as usize {
                let offset = (y * width as usize + x) * 4;
                let b = data[offset];
                let g = data[offset + 1];
                let r = data[offset + 2];
                // GDI leaves the alpha channel undefined.
                img.put_pixel(x as u32, y as u32, Rgba([r, g, b, 255]));
            }
        }
        Ok(img)
    }
}

impl RenderSurface for GdiSurface {
    fn write_bitmap(&self, path: &Path) -> Result<(), CaptureError> {
        let img = self.pixels()?;
        img.save_with_format(path, ImageFormat::Bmp)
            .map_err(|e| CaptureError::WriteFailed(e.to_string()))
    }
}

impl Drop for GdiSurface {
    fn drop(&mut self) {
        // Reverse acquisition order: deselect, bitmap, memory DC, window DC.
        unsafe {
            let _ = SelectObject(self.mem_dc, self.prev_bitmap);
            let _ = DeleteObject(self.bitmap);
            let _ = DeleteDC(self.mem_dc);
            let _ = ReleaseDC(self.hwnd, self.window_dc);
        }
    }
}

/// Factory handing out [`GdiSurface`]s.
pub struct GdiSurfaces;

impl SurfaceProvider for GdiSurfaces {
    type Window = HWND;
    type Surface = GdiSurface;

    fn acquire(&self, window: &HWND, bounds: Bounds) -> Result<GdiSurface, CaptureError> {
        GdiSurface::new(*window, bounds)
    }
}

/// Primary strategy: `PrintWindow` with full-content rendering. Captures
/// layered and GPU-composited windows that a raw blit would leave blank.
pub struct PrintWindowFullContent;

impl RenderStrategy<HWND, GdiSurface> for PrintWindowFullContent {
    fn name(&self) -> &'static str {
        "print-window"
    }

    fn render(&self, window: &HWND, surface: &mut GdiSurface) -> bool {
        unsafe { PrintWindow(*window, surface.mem_dc, PW_RENDERFULLCONTENT) }.as_bool()
    }
}

/// Fallback strategy: SRCCOPY blit from the live window DC. No compositor
/// dependency, but stale or blank for composited content.
pub struct BitBltCopy;

impl RenderStrategy<HWND, GdiSurface> for BitBltCopy {
    fn name(&self) -> &'static str {
        "bit-blt"
    }

    fn render(&self, _window: &HWND, surface: &mut GdiSurface) -> bool {
        unsafe {
            BitBlt(
                surface.mem_dc,
                0,
                0,
                surface.bounds.width(),
                surface.bounds.height(),
                surface.window_dc,
                0,
                0,
                SRCCOPY,
            )
        }
        .is_ok()
    }
}

/// Captures the currently focused window to a bitmap file at `output`.
pub fn capture_active_window(output: &Path) -> Result<CaptureReport, CaptureError> {
    let strategies: [&dyn RenderStrategy<HWND, GdiSurface>; 2] =
        [&PrintWindowFullContent, &BitBltCopy];
    capture_with(&ForegroundWindow, &GdiSurfaces, &strategies, output)
}
