//! Per-zoom cache of native resources keyed by their zoom-independent
//! description.
//!
//! # Layout
//!
//! ```text
//! by_key:     K ──────────────▶ container
//! containers: container ──────▶ { key, base slot, zoom ──▶ slot }
//! entries:    slot ───────────▶ { handle, zoom, owned, serial }
//! ```
//!
//! Entries live in a [`Slab`] arena. A [`Resource`] names its slot plus a
//! serial number, so a handle kept after its entry was invalidated can never
//! alias a newer entry that reused the slot.
//!
//! # Ownership
//!
//! Every entry the registry allocates itself is owned and released by
//! [`dispose_all`](ScaledResourceRegistry::dispose_all). A base resource
//! handed in through [`adopt`](ScaledResourceRegistry::adopt) stays owned by
//! the caller and is only referenced. Nothing is released on drop: disposal
//! is explicit.
//!
//! Each container's base resource sits in the zoom map at its own creation
//! zoom, so asking for that zoom returns the base itself.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use slab::Slab;
use tracing::{debug, trace, warn};

use super::backend::{NativeHandle, ResourceFactory};
use crate::error::{ZoomError, ZoomResult};
use crate::zoom::ZoomLevel;

/// A registry-managed resource at one zoom level.
///
/// Two lookups of the same `(key, zoom)` return equal `Resource`s as long as
/// the entry stays cached. Callers must not release the native handle
/// themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resource {
    slot: usize,
    serial: u64,
    handle: NativeHandle,
    zoom: ZoomLevel,
}

impl Resource {
    pub fn handle(&self) -> NativeHandle {
        self.handle
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }
}

struct Entry {
    handle: NativeHandle,
    zoom: ZoomLevel,
    container: usize,
    owned: bool,
    serial: u64,
}

struct Container<K> {
    key: K,
    base: Option<usize>,
    scaled: HashMap<ZoomLevel, usize>,
}

/// Cache of native resources per `(key, zoom)`.
pub struct ScaledResourceRegistry<K> {
    factory: Box<dyn ResourceFactory<K>>,
    base_zoom: ZoomLevel,
    entries: Slab<Entry>,
    containers: Slab<Container<K>>,
    by_key: HashMap<K, usize>,
    by_handle: HashMap<NativeHandle, usize>,
    next_serial: u64,
}

impl<K> ScaledResourceRegistry<K>
where
    K: Clone + Eq + Hash + Debug,
{
    /// New, empty registry. Base resources for keys first seen through
    /// [`get_or_create`](Self::get_or_create) are allocated at `base_zoom`.
    pub fn new(factory: Box<dyn ResourceFactory<K>>, base_zoom: ZoomLevel) -> Self {
        Self {
            factory,
            base_zoom,
            entries: Slab::new(),
            containers: Slab::new(),
            by_key: HashMap::new(),
            by_handle: HashMap::new(),
            next_serial: 0,
        }
    }

    /// Zoom at which new base resources are allocated.
    pub fn base_zoom(&self) -> ZoomLevel {
        self.base_zoom
    }

    /// The cached resource for `(key, zoom)`, deriving and caching it first
    /// if needed.
    ///
    /// On allocation failure nothing is cached and the error is returned.
    pub fn get_or_create(&mut self, key: &K, zoom: ZoomLevel) -> ZoomResult<Resource> {
        let container = match self.by_key.get(key) {
            Some(&container) => container,
            None => self.create_container(key)?,
        };
        if let Some(resource) = self.cached(container, zoom) {
            return Ok(resource);
        }
        self.derive(container, zoom)
    }

    /// Register a caller-owned base resource for `key`, created natively at
    /// `native_zoom`.
    ///
    /// The registry references the handle but never releases it. If the
    /// registry already holds a live resource for `(key, native_zoom)`, that
    /// one is returned and `handle` is left untouched.
    pub fn adopt(&mut self, key: &K, handle: NativeHandle, native_zoom: ZoomLevel) -> Resource {
        let container = match self.by_key.get(key) {
            Some(&container) => container,
            None => {
                let container = self.containers.insert(Container {
                    key: key.clone(),
                    base: None,
                    scaled: HashMap::new(),
                });
                self.by_key.insert(key.clone(), container);
                container
            }
        };
        if let Some(existing) = self.cached(container, native_zoom) {
            return existing;
        }
        let slot = self.insert_entry(handle, native_zoom, container, false);
        let c = &mut self.containers[container];
        c.scaled.insert(native_zoom, slot);
        if c.base.is_none() {
            c.base = Some(slot);
        }
        debug!(?key, zoom = %native_zoom, "adopted base resource");
        self.resource(slot)
    }

    /// The resource for the same key as `resource`, at `zoom`. Asking for the
    /// resource's own zoom returns it unchanged.
    pub fn scale_for(&mut self, resource: Resource, zoom: ZoomLevel) -> ZoomResult<Resource> {
        if !self.is_live(resource) {
            return Err(ZoomError::StaleResource);
        }
        if resource.zoom == zoom {
            return Ok(resource);
        }
        let container = self.entries[resource.slot].container;
        match self.cached(container, zoom) {
            Some(cached) => Ok(cached),
            None => self.derive(container, zoom),
        }
    }

    /// Drop a cached entry so the next lookup re-derives it.
    ///
    /// Intended for resources whose native handle was disposed externally.
    /// An owned handle that is still alive is released. Returns `false` if
    /// the resource was no longer cached.
    pub fn invalidate(&mut self, resource: Resource) -> bool {
        if !self.is_live(resource) {
            return false;
        }
        let entry = self.remove_entry(resource.slot);
        if entry.owned && !self.factory.is_disposed(entry.handle) {
            self.factory.destroy(entry.handle);
        }
        debug!(zoom = %entry.zoom, handle = ?entry.handle, "invalidated resource");
        true
    }

    /// Release every registry-owned resource and empty the cache.
    /// Adopted (caller-owned) base resources are forgotten, not released.
    pub fn dispose_all(&mut self) {
        let mut released = 0usize;
        for (_, entry) in self.entries.iter() {
            if entry.owned && !self.factory.is_disposed(entry.handle) {
                self.factory.destroy(entry.handle);
                released += 1;
            }
        }
        debug!(released, cached = self.entries.len(), "disposed resource registry");
        self.entries.clear();
        self.containers.clear();
        self.by_key.clear();
        self.by_handle.clear();
    }

    /// True if `resource` is still cached.
    pub fn is_live(&self, resource: Resource) -> bool {
        self.entries
            .get(resource.slot)
            .is_some_and(|entry| entry.serial == resource.serial)
    }

    /// True if the registry allocated `resource` itself and will release it.
    pub fn is_owned(&self, resource: Resource) -> bool {
        self.is_live(resource) && self.entries[resource.slot].owned
    }

    /// The key a native handle was created for.
    pub fn key_for(&self, handle: NativeHandle) -> Option<&K> {
        let slot = *self.by_handle.get(&handle)?;
        let container = self.entries.get(slot)?.container;
        Some(&self.containers[container].key)
    }

    /// The base resource of `key`'s container, if it is still cached.
    pub fn base_of(&self, key: &K) -> Option<Resource> {
        let container = *self.by_key.get(key)?;
        self.containers[container].base.map(|slot| self.resource(slot))
    }

    /// True if `(key, zoom)` is cached.
    pub fn contains(&self, key: &K, zoom: ZoomLevel) -> bool {
        self.by_key
            .get(key)
            .is_some_and(|&c| self.containers[c].scaled.contains_key(&zoom))
    }

    /// Cached zoom levels for `key`, ascending.
    pub fn zooms(&self, key: &K) -> Vec<ZoomLevel> {
        let mut zooms: Vec<ZoomLevel> = self
            .by_key
            .get(key)
            .map(|&c| self.containers[c].scaled.keys().copied().collect())
            .unwrap_or_default();
        zooms.sort();
        zooms
    }

    /// Number of cached resources across all keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn create_container(&mut self, key: &K) -> ZoomResult<usize> {
        let zoom = self.base_zoom;
        let handle = self.allocate(key, zoom)?;
        let container = self.containers.vacant_key();
        let slot = self.insert_entry(handle, zoom, container, true);
        let inserted = self.containers.insert(Container {
            key: key.clone(),
            base: Some(slot),
            scaled: HashMap::from([(zoom, slot)]),
        });
        debug_assert_eq!(inserted, container);
        self.by_key.insert(key.clone(), container);
        debug!(?key, %zoom, "created resource container");
        Ok(container)
    }

    /// Cached resource of `container` at `zoom`, dropping the entry if its
    /// native handle was disposed externally.
    fn cached(&mut self, container: usize, zoom: ZoomLevel) -> Option<Resource> {
        let slot = *self.containers[container].scaled.get(&zoom)?;
        if self.factory.is_disposed(self.entries[slot].handle) {
            trace!(%zoom, "cached resource was disposed externally");
            self.remove_entry(slot);
            return None;
        }
        Some(self.resource(slot))
    }

    fn derive(&mut self, container: usize, zoom: ZoomLevel) -> ZoomResult<Resource> {
        let key = self.containers[container].key.clone();
        let handle = self.allocate(&key, zoom)?;
        let slot = self.insert_entry(handle, zoom, container, true);
        let base_zoom = self.base_zoom;
        let c = &mut self.containers[container];
        c.scaled.insert(zoom, slot);
        if c.base.is_none() && zoom == base_zoom {
            c.base = Some(slot);
        }
        trace!(?key, %zoom, ?handle, "derived scaled resource");
        Ok(self.resource(slot))
    }

    fn allocate(&mut self, key: &K, zoom: ZoomLevel) -> ZoomResult<NativeHandle> {
        self.factory.create(key, zoom).ok_or_else(|| {
            warn!(?key, %zoom, "native allocation failed");
            ZoomError::NativeAllocation {
                resource: format!("{key:?}"),
                zoom: zoom.percent(),
            }
        })
    }

    fn insert_entry(
        &mut self,
        handle: NativeHandle,
        zoom: ZoomLevel,
        container: usize,
        owned: bool,
    ) -> usize {
        // The platform only hands out a live handle value again after the
        // old object is gone, so whatever entry still holds it is stale.
        if let Some(stale) = self.by_handle.remove(&handle) {
            trace!(?handle, "native handle value reused, dropping stale entry");
            self.remove_entry(stale);
        }
        let serial = self.next_serial;
        self.next_serial += 1;
        let slot = self.entries.insert(Entry {
            handle,
            zoom,
            container,
            owned,
            serial,
        });
        self.by_handle.insert(handle, slot);
        slot
    }

    fn remove_entry(&mut self, slot: usize) -> Entry {
        let entry = self.entries.remove(slot);
        if self.by_handle.get(&entry.handle) == Some(&slot) {
            self.by_handle.remove(&entry.handle);
        }
        let c = &mut self.containers[entry.container];
        if c.scaled.get(&entry.zoom) == Some(&slot) {
            c.scaled.remove(&entry.zoom);
        }
        if c.base == Some(slot) {
            c.base = None;
        }
        entry
    }

    fn resource(&self, slot: usize) -> Resource {
        let entry = &self.entries[slot];
        Resource {
            slot,
            serial: entry.serial,
            handle: entry.handle,
            zoom: entry.zoom,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    use super::*;

    #[derive(Default)]
    struct Log {
        next: usize,
        created: Vec<(String, i32)>,
        destroyed: Vec<NativeHandle>,
        disposed: HashSet<NativeHandle>,
        reuse: Vec<NativeHandle>,
        fail: bool,
    }

    #[derive(Clone, Default)]
    struct CountingFactory(Rc<RefCell<Log>>);

    impl ResourceFactory<String> for CountingFactory {
        fn create(&mut self, key: &String, zoom: ZoomLevel) -> Option<NativeHandle> {
            let mut log = self.0.borrow_mut();
            if log.fail {
                return None;
            }
            log.created.push((key.clone(), zoom.percent()));
            if let Some(handle) = log.reuse.pop() {
                return Some(handle);
            }
            log.next += 1;
            Some(NativeHandle(log.next))
        }

        fn destroy(&mut self, handle: NativeHandle) {
            self.0.borrow_mut().destroyed.push(handle);
        }

        fn is_disposed(&self, handle: NativeHandle) -> bool {
            self.0.borrow().disposed.contains(&handle)
        }
    }

    fn zoom(p: i32) -> ZoomLevel {
        ZoomLevel::new(p).unwrap()
    }

    fn registry() -> (ScaledResourceRegistry<String>, CountingFactory) {
        let factory = CountingFactory::default();
        (
            ScaledResourceRegistry::new(Box::new(factory.clone()), zoom(100)),
            factory,
        )
    }

    #[test]
    fn test_same_key_and_zoom_is_a_cache_hit() {
        let (mut reg, factory) = registry();
        let key = "Arial-12".to_string();

        let a = reg.get_or_create(&key, zoom(200)).unwrap();
        let b = reg.get_or_create(&key, zoom(200)).unwrap();
        assert_eq!(a, b);
        // base at 100% plus one derived at 200%
        assert_eq!(factory.0.borrow().created.len(), 2);
    }

    #[test]
    fn test_base_zoom_slot_is_the_base_resource() {
        let (mut reg, factory) = registry();
        let key = "Arial-12".to_string();

        let base = reg.get_or_create(&key, zoom(100)).unwrap();
        assert_eq!(factory.0.borrow().created, vec![(key.clone(), 100)]);
        assert_eq!(reg.base_of(&key), Some(base));
        assert_eq!(reg.zooms(&key), vec![zoom(100)]);
        assert_eq!(reg.scale_for(base, zoom(100)).unwrap(), base);
    }

    #[test]
    fn test_allocation_failure_caches_nothing() {
        let (mut reg, factory) = registry();
        factory.0.borrow_mut().fail = true;

        let err = reg.get_or_create(&"x".to_string(), zoom(150)).unwrap_err();
        assert!(matches!(err, ZoomError::NativeAllocation { zoom: 100, .. }));
        assert!(reg.is_empty());

        factory.0.borrow_mut().fail = false;
        reg.get_or_create(&"x".to_string(), zoom(100)).unwrap();
        factory.0.borrow_mut().fail = true;
        assert!(reg.get_or_create(&"x".to_string(), zoom(150)).is_err());
        assert!(!reg.contains(&"x".to_string(), zoom(150)));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_externally_disposed_entry_is_rederived() {
        let (mut reg, factory) = registry();
        let key = "k".to_string();

        let first = reg.get_or_create(&key, zoom(150)).unwrap();
        factory.0.borrow_mut().disposed.insert(first.handle());

        let second = reg.get_or_create(&key, zoom(150)).unwrap();
        assert_ne!(first, second);
        assert!(!reg.is_live(first));
        assert!(reg.is_live(second));
    }

    #[test]
    fn test_reused_handle_value_evicts_stale_entry() {
        let (mut reg, factory) = registry();
        let a = "a".to_string();
        let b = "b".to_string();

        let stale = reg.get_or_create(&a, zoom(150)).unwrap();
        // deleted outside the registry, then issued again for another key
        factory.0.borrow_mut().reuse.push(stale.handle());
        let other = reg.get_or_create(&b, zoom(100)).unwrap();
        assert_eq!(other.handle(), stale.handle());

        assert!(!reg.is_live(stale));
        assert!(!reg.contains(&a, zoom(150)));
        assert_eq!(reg.key_for(stale.handle()), Some(&b));

        let fresh = reg.get_or_create(&a, zoom(150)).unwrap();
        assert_ne!(fresh.handle(), other.handle());
        reg.dispose_all();
        // the reused value is destroyed once, for its current owner
        let destroyed = &factory.0.borrow().destroyed;
        assert_eq!(destroyed.iter().filter(|&&h| h == other.handle()).count(), 1);
    }

    #[test]
    fn test_invalidate_releases_live_owned_handle() {
        let (mut reg, factory) = registry();
        let key = "k".to_string();

        let scaled = reg.get_or_create(&key, zoom(150)).unwrap();
        assert!(reg.invalidate(scaled));
        assert!(!reg.invalidate(scaled));
        assert_eq!(factory.0.borrow().destroyed, vec![scaled.handle()]);
        assert!(!reg.contains(&key, zoom(150)));
        assert!(reg.contains(&key, zoom(100)));
    }

    #[test]
    fn test_stale_resource_does_not_alias_reused_slot() {
        let (mut reg, _factory) = registry();
        let a = reg.get_or_create(&"a".to_string(), zoom(100)).unwrap();
        reg.invalidate(a);
        let b = reg.get_or_create(&"b".to_string(), zoom(100)).unwrap();
        assert!(!reg.is_live(a));
        assert!(reg.is_live(b));
        assert!(matches!(reg.scale_for(a, zoom(200)), Err(ZoomError::StaleResource)));
    }

    #[test]
    fn test_dispose_all_skips_adopted_base() {
        let (mut reg, factory) = registry();
        let key = "caller".to_string();

        let adopted = reg.adopt(&key, NativeHandle(999), zoom(125));
        assert!(!reg.is_owned(adopted));
        assert_eq!(reg.get_or_create(&key, zoom(125)).unwrap(), adopted);

        let derived = reg.get_or_create(&key, zoom(250)).unwrap();
        assert!(reg.is_owned(derived));

        reg.dispose_all();
        assert_eq!(factory.0.borrow().destroyed, vec![derived.handle()]);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_key_for_handle() {
        let (mut reg, _factory) = registry();
        let key = "lookup".to_string();
        let res = reg.get_or_create(&key, zoom(175)).unwrap();
        assert_eq!(reg.key_for(res.handle()), Some(&key));
        assert_eq!(reg.key_for(NativeHandle(12345)), None);
    }
}
