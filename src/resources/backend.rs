//! Contract between the registry and the native layer.

use crate::zoom::ZoomLevel;

/// Opaque native resource handle (HFONT, HBITMAP, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeHandle(pub usize);

/// Creates and destroys native resources for keys of type `K`.
///
/// Implemented by the platform backends. The registry is the only caller;
/// it never asks for the same `(key, zoom)` twice while the first handle is
/// alive.
pub trait ResourceFactory<K> {
    /// Allocate a native resource for `key` at `zoom`. `None` means the
    /// platform could not allocate it.
    fn create(&mut self, key: &K, zoom: ZoomLevel) -> Option<NativeHandle>;

    /// Release a handle previously returned by [`create`](Self::create).
    fn destroy(&mut self, handle: NativeHandle);

    /// True if the handle was released behind the registry's back.
    ///
    /// Platforms recycle handle values, so a handle deleted externally may
    /// already name a different live object. Backends should check that the
    /// handle still refers to an object of the kind they created. A recycled
    /// value of the same kind is only caught when the registry sees it come
    /// back from [`create`](Self::create), which drops the stale entry.
    fn is_disposed(&self, _handle: NativeHandle) -> bool {
        false
    }
}
