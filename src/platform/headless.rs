//! In-memory backend with synthetic handles.
//!
//! Used by the demo binary and the tests. Every clone shares the same state,
//! so a test can keep one clone for inspection while the registries own the
//! others.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::trace;

use crate::display::Platform;
use crate::resources::font::pixel_height;
use crate::resources::{FontKey, FontStyle, ImageData, ImageDescriptor, NativeHandle, ResourceFactory};
use crate::zoom::constants::REFERENCE_ZOOM;
use crate::zoom::{MonitorId, ZoomLevel, ZoomSource};

/// Point size of the headless system font.
pub const SYSTEM_FONT_POINTS: u32 = 9;

/// What a synthetic handle stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeObject {
    Font {
        family: String,
        pixel_height: i32,
        style: FontStyle,
    },
    Bitmap {
        key: String,
        data: ImageData,
    },
}

#[derive(Debug, Default)]
struct State {
    next_handle: usize,
    live: HashMap<NativeHandle, NativeObject>,
    created: usize,
    destroyed: Vec<NativeHandle>,
    disposed: HashSet<NativeHandle>,
    fail_allocations: bool,
    physical: HashMap<MonitorId, i32>,
}

/// Shared-state headless backend.
#[derive(Debug, Clone, Default)]
pub struct HeadlessBackend {
    state: Rc<RefCell<State>>,
}

impl HeadlessBackend {
    /// Backend whose primary monitor reports `physical_zoom`.
    pub fn new(physical_zoom: i32) -> Self {
        let backend = Self::default();
        backend.set_physical_zoom(MonitorId::PRIMARY, physical_zoom);
        backend
    }

    /// Collaborators for a [`Display`](crate::Display), all sharing this
    /// backend's state.
    pub fn platform(&self) -> Platform {
        Platform {
            fonts: Box::new(self.clone()),
            images: Box::new(self.clone()),
            zoom_source: Box::new(self.clone()),
        }
    }

    pub fn set_physical_zoom(&self, monitor: MonitorId, zoom: i32) {
        self.state.borrow_mut().physical.insert(monitor, zoom);
    }

    /// Make every following allocation fail.
    pub fn fail_allocations(&self, fail: bool) {
        self.state.borrow_mut().fail_allocations = fail;
    }

    /// Release a handle behind the registry's back.
    pub fn dispose_externally(&self, handle: NativeHandle) {
        let mut state = self.state.borrow_mut();
        state.live.remove(&handle);
        state.disposed.insert(handle);
    }

    /// The object behind a live handle.
    pub fn object(&self, handle: NativeHandle) -> Option<NativeObject> {
        self.state.borrow().live.get(&handle).cloned()
    }

    /// Pixel height of a live font handle.
    pub fn font_height(&self, handle: NativeHandle) -> Option<i32> {
        match self.object(handle)? {
            NativeObject::Font { pixel_height, .. } => Some(pixel_height),
            NativeObject::Bitmap { .. } => None,
        }
    }

    /// Dimensions of a live bitmap handle.
    pub fn bitmap_size(&self, handle: NativeHandle) -> Option<ImageData> {
        match self.object(handle)? {
            NativeObject::Bitmap { data, .. } => Some(data),
            NativeObject::Font { .. } => None,
        }
    }

    /// Total successful allocations.
    pub fn created(&self) -> usize {
        self.state.borrow().created
    }

    /// Handles released through the factory, in order.
    pub fn destroyed(&self) -> Vec<NativeHandle> {
        self.state.borrow().destroyed.clone()
    }

    /// Handles allocated and not yet released.
    pub fn live(&self) -> usize {
        self.state.borrow().live.len()
    }

    fn allocate(&self, object: NativeObject) -> Option<NativeHandle> {
        let mut state = self.state.borrow_mut();
        if state.fail_allocations {
            return None;
        }
        state.next_handle += 1;
        let handle = NativeHandle(state.next_handle);
        trace!(?handle, ?object, "headless allocation");
        state.live.insert(handle, object);
        state.created += 1;
        Some(handle)
    }

    fn release(&self, handle: NativeHandle) {
        let mut state = self.state.borrow_mut();
        state.live.remove(&handle);
        state.destroyed.push(handle);
    }
}

impl ResourceFactory<FontKey> for HeadlessBackend {
    fn create(&mut self, key: &FontKey, zoom: ZoomLevel) -> Option<NativeHandle> {
        let object = match key {
            FontKey::System => NativeObject::Font {
                family: "system".to_string(),
                pixel_height: pixel_height(SYSTEM_FONT_POINTS, zoom),
                style: FontStyle::NORMAL,
            },
            FontKey::Custom(descriptor) => NativeObject::Font {
                family: descriptor.family.clone(),
                pixel_height: descriptor.pixel_height(zoom),
                style: descriptor.style,
            },
        };
        self.allocate(object)
    }

    fn destroy(&mut self, handle: NativeHandle) {
        self.release(handle);
    }

    fn is_disposed(&self, handle: NativeHandle) -> bool {
        self.state.borrow().disposed.contains(&handle)
    }
}

impl ResourceFactory<ImageDescriptor> for HeadlessBackend {
    fn create(&mut self, key: &ImageDescriptor, zoom: ZoomLevel) -> Option<NativeHandle> {
        let data = key.data_at(zoom).ok()?;
        self.allocate(NativeObject::Bitmap {
            key: key.key().to_string(),
            data,
        })
    }

    fn destroy(&mut self, handle: NativeHandle) {
        self.release(handle);
    }

    fn is_disposed(&self, handle: NativeHandle) -> bool {
        self.state.borrow().disposed.contains(&handle)
    }
}

impl ZoomSource for HeadlessBackend {
    fn physical_zoom(&self, monitor: MonitorId) -> i32 {
        let state = self.state.borrow();
        state
            .physical
            .get(&monitor)
            .or_else(|| state.physical.get(&MonitorId::PRIMARY))
            .copied()
            .unwrap_or(REFERENCE_ZOOM)
    }
}
