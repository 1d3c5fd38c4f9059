//! Win32 backend: GDI fonts and bitmaps, per-monitor DPI.
//!
//! A [`MonitorId`] other than [`MonitorId::PRIMARY`] carries the raw
//! `HMONITOR` value.

use std::ffi::c_void;
use std::mem::size_of;

use ::windows::Win32::Graphics::Gdi::{
    CreateBitmap, CreateFontIndirectW, DeleteObject, GetObjectType, HGDIOBJ, HMONITOR, LOGFONTW,
    OBJ_BITMAP, OBJ_FONT, OBJ_TYPE,
};
use ::windows::Win32::UI::HiDpi::{GetDpiForMonitor, GetDpiForSystem, MDT_EFFECTIVE_DPI};
use ::windows::Win32::UI::WindowsAndMessaging::{
    SystemParametersInfoForDpi, NONCLIENTMETRICSW, SPI_GETNONCLIENTMETRICS,
};
use tracing::{debug, warn};

use crate::display::Platform;
use crate::resources::{FontDescriptor, FontKey, ImageDescriptor, NativeHandle, ResourceFactory};
use crate::zoom::{MonitorId, ZoomLevel, ZoomSource};

const FW_NORMAL: i32 = 400;
const FW_BOLD: i32 = 700;

/// GDI-backed resource factory and zoom source.
#[derive(Debug, Default, Clone, Copy)]
pub struct GdiBackend;

impl GdiBackend {
    pub fn new() -> Self {
        Self
    }

    pub fn platform(&self) -> Platform {
        Platform {
            fonts: Box::new(*self),
            images: Box::new(*self),
            zoom_source: Box::new(*self),
        }
    }
}

fn gdi_object(handle: NativeHandle) -> HGDIOBJ {
    HGDIOBJ(handle.0 as *mut c_void)
}

/// True unless `handle` names a live GDI object of type `kind`.
fn is_gone(handle: NativeHandle, kind: OBJ_TYPE) -> bool {
    let actual = unsafe { GetObjectType(gdi_object(handle)) };
    actual != kind.0 as u32
}

fn custom_logfont(descriptor: &FontDescriptor, zoom: ZoomLevel) -> LOGFONTW {
    let mut logfont = LOGFONTW {
        // negative height selects by character height
        lfHeight: -descriptor.pixel_height(zoom),
        lfWeight: if descriptor.style.bold { FW_BOLD } else { FW_NORMAL },
        lfItalic: u8::from(descriptor.style.italic),
        ..Default::default()
    };
    let face: Vec<u16> = descriptor.family.encode_utf16().take(31).collect();
    logfont.lfFaceName[..face.len()].copy_from_slice(&face);
    logfont
}

/// The message font from the non-client metrics, sized for `zoom`.
fn system_logfont(zoom: ZoomLevel) -> Option<LOGFONTW> {
    let mut metrics = NONCLIENTMETRICSW {
        cbSize: size_of::<NONCLIENTMETRICSW>() as u32,
        ..Default::default()
    };
    let result = unsafe {
        SystemParametersInfoForDpi(
            SPI_GETNONCLIENTMETRICS.0,
            metrics.cbSize,
            Some(&mut metrics as *mut NONCLIENTMETRICSW as *mut c_void),
            0,
            zoom.to_dpi(),
        )
    };
    match result {
        Ok(()) => Some(metrics.lfMessageFont),
        Err(err) => {
            warn!(%zoom, error = %err, "SystemParametersInfoForDpi failed");
            None
        }
    }
}

impl ResourceFactory<FontKey> for GdiBackend {
    fn create(&mut self, key: &FontKey, zoom: ZoomLevel) -> Option<NativeHandle> {
        let logfont = match key {
            FontKey::System => system_logfont(zoom)?,
            FontKey::Custom(descriptor) => custom_logfont(descriptor, zoom),
        };
        let font = unsafe { CreateFontIndirectW(&logfont) };
        if font.0.is_null() {
            return None;
        }
        debug!(?key, %zoom, height = logfont.lfHeight, "created GDI font");
        Some(NativeHandle(font.0 as usize))
    }

    fn destroy(&mut self, handle: NativeHandle) {
        let _ = unsafe { DeleteObject(gdi_object(handle)) };
    }

    fn is_disposed(&self, handle: NativeHandle) -> bool {
        is_gone(handle, OBJ_FONT)
    }
}

impl ResourceFactory<ImageDescriptor> for GdiBackend {
    fn create(&mut self, key: &ImageDescriptor, zoom: ZoomLevel) -> Option<NativeHandle> {
        let data = key.data_at(zoom).ok()?;
        let width = i32::try_from(data.width).ok()?;
        let height = i32::try_from(data.height).ok()?;
        let bitmap = unsafe { CreateBitmap(width, height, 1, 32, None) };
        if bitmap.0.is_null() {
            return None;
        }
        Some(NativeHandle(bitmap.0 as usize))
    }

    fn destroy(&mut self, handle: NativeHandle) {
        let _ = unsafe { DeleteObject(gdi_object(handle)) };
    }

    fn is_disposed(&self, handle: NativeHandle) -> bool {
        is_gone(handle, OBJ_BITMAP)
    }
}

impl ZoomSource for GdiBackend {
    fn physical_zoom(&self, monitor: MonitorId) -> i32 {
        let dpi = if monitor == MonitorId::PRIMARY {
            unsafe { GetDpiForSystem() }
        } else {
            let (mut dpi_x, mut dpi_y) = (0u32, 0u32);
            let result = unsafe {
                GetDpiForMonitor(
                    HMONITOR(monitor.0 as *mut c_void),
                    MDT_EFFECTIVE_DPI,
                    &mut dpi_x,
                    &mut dpi_y,
                )
            };
            if result.is_err() {
                return 0;
            }
            dpi_x
        };
        ZoomLevel::from_dpi(dpi).map(ZoomLevel::percent).unwrap_or(0)
    }
}
