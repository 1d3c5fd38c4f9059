//! The display session: one context object owning all zoom state.
//!
//! A [`Display`] bundles the device-zoom state, the resource registries, the
//! handler table and the notification queue. Several sessions can live in
//! one process; nothing here is global.
//!
//! A session is bound to the thread that created it. It is `!Send`, and in
//! debug builds every entry point asserts it runs on that thread.

use std::collections::HashMap;
use std::thread::{self, ThreadId};

use tracing::{debug, info, warn};

use crate::config::ScalingConfig;
use crate::error::ZoomResult;
use crate::events::{NotificationQueue, NotificationSender, ZoomChangeEvent};
use crate::handlers::{register_common_handlers, DispatchReport, ZoomChangeDispatcher};
use crate::resources::{FontDescriptor, FontKey, ImageDescriptor, Resource, ResourceFactory, Resources};
use crate::widget::Widget;
use crate::zoom::{DeviceZoom, MonitorId, ZoomLevel, ZoomSource};

/// Native collaborators a session is built from.
pub struct Platform {
    pub fonts: Box<dyn ResourceFactory<FontKey>>,
    pub images: Box<dyn ResourceFactory<ImageDescriptor>>,
    pub zoom_source: Box<dyn ZoomSource>,
}

/// One UI session.
pub struct Display {
    config: ScalingConfig,
    zoom: DeviceZoom,
    resources: Resources,
    dispatcher: ZoomChangeDispatcher,
    notifications: NotificationQueue,
    zoom_source: Box<dyn ZoomSource>,
    monitors: HashMap<MonitorId, ZoomLevel>,
    ui_thread: ThreadId,
}

impl Display {
    /// Start a session on the current thread.
    ///
    /// The primary monitor's physical zoom is queried once here; resource
    /// bases are created at the device zoom derived from it. The built-in
    /// handlers are installed.
    pub fn new(config: ScalingConfig, platform: Platform) -> Self {
        let Platform {
            fonts,
            images,
            zoom_source,
        } = platform;

        let native = query_zoom(zoom_source.as_ref(), MonitorId::PRIMARY);
        let zoom = DeviceZoom::new(native, config.auto_scale);
        info!(
            native = %zoom.native_zoom(),
            device = %zoom.device_zoom(),
            auto_scale = %config.auto_scale,
            "display session started"
        );

        let mut dispatcher = ZoomChangeDispatcher::new();
        register_common_handlers(&mut dispatcher);

        Self {
            resources: Resources::new(fonts, images, zoom.device_zoom()),
            monitors: HashMap::from([(MonitorId::PRIMARY, zoom.device_zoom())]),
            config,
            zoom,
            dispatcher,
            notifications: NotificationQueue::new(),
            zoom_source,
            ui_thread: thread::current().id(),
        }
    }

    pub fn config(&self) -> &ScalingConfig {
        &self.config
    }

    /// Zoom used by scaling operations.
    pub fn device_zoom(&self) -> ZoomLevel {
        self.zoom.device_zoom()
    }

    /// Physical zoom of the primary monitor.
    pub fn native_zoom(&self) -> ZoomLevel {
        self.zoom.native_zoom()
    }

    /// Device zoom last reported for `monitor`, or the session's device
    /// zoom if the monitor was never reported.
    pub fn monitor_zoom(&self, monitor: MonitorId) -> ZoomLevel {
        self.monitors
            .get(&monitor)
            .copied()
            .unwrap_or_else(|| self.zoom.device_zoom())
    }

    pub fn dispatcher(&self) -> &ZoomChangeDispatcher {
        &self.dispatcher
    }

    /// Handler table, for registering toolkit-specific handlers.
    pub fn dispatcher_mut(&mut self) -> &mut ZoomChangeDispatcher {
        self.assert_ui_thread();
        &mut self.dispatcher
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        self.assert_ui_thread();
        &mut self.resources
    }

    /// Handle for posting DPI notifications from other threads.
    pub fn notification_sender(&self) -> NotificationSender {
        self.notifications.sender()
    }

    /// Explicitly override the device zoom.
    pub fn set_device_zoom(&mut self, zoom: ZoomLevel) -> Option<ZoomChangeEvent> {
        self.assert_ui_thread();
        let event = self.zoom.set_device_zoom(zoom)?;
        self.monitors.insert(MonitorId::PRIMARY, zoom);
        Some(event)
    }

    /// Query the primary monitor again and apply the auto-scale policy.
    pub fn refresh_native_zoom(&mut self) -> Option<ZoomChangeEvent> {
        self.assert_ui_thread();
        let native = query_zoom(self.zoom_source.as_ref(), MonitorId::PRIMARY);
        self.apply_native_zoom(MonitorId::PRIMARY, native)
    }

    /// Drain queued DPI notifications and update zoom state.
    ///
    /// Returns one entry per monitor whose device zoom actually changed, in
    /// the order the notifications arrived. The windowing glue then calls
    /// [`on_zoom_changed`](Self::on_zoom_changed) for the widgets on those
    /// monitors.
    pub fn process_notifications(&mut self) -> Vec<(MonitorId, ZoomChangeEvent)> {
        self.assert_ui_thread();
        let mut changes = Vec::new();
        for note in self.notifications.drain() {
            let native = match ZoomLevel::from_dpi(note.dpi) {
                Ok(zoom) => zoom,
                Err(err) => {
                    warn!(monitor = note.monitor.0, dpi = note.dpi, error = %err, "ignoring DPI notification");
                    continue;
                }
            };
            if let Some(event) = self.apply_native_zoom(note.monitor, native) {
                changes.push((note.monitor, event));
            }
        }
        changes
    }

    /// Entry point for the windowing glue: `widget` now lives at `new_zoom`.
    ///
    /// With runtime auto-scaling disabled this does nothing.
    pub fn on_zoom_changed(&mut self, widget: &mut dyn Widget, new_zoom: ZoomLevel) -> DispatchReport {
        self.assert_ui_thread();
        if !self.config.auto_scale_on_runtime {
            debug!(%new_zoom, "runtime auto-scaling disabled, zoom change ignored");
            return DispatchReport::default();
        }
        self.dispatcher.dispatch(widget, new_zoom, &mut self.resources)
    }

    /// The application font `descriptor` at `zoom`.
    pub fn font(&mut self, descriptor: &FontDescriptor, zoom: ZoomLevel) -> ZoomResult<Resource> {
        self.assert_ui_thread();
        let zoom = self.effective_zoom(zoom);
        self.resources.fonts.font(descriptor, zoom)
    }

    /// The system font at `zoom`.
    pub fn system_font(&mut self, zoom: ZoomLevel) -> ZoomResult<Resource> {
        self.assert_ui_thread();
        let zoom = self.effective_zoom(zoom);
        self.resources.fonts.system_font(zoom)
    }

    /// The image `descriptor` at `zoom`.
    pub fn image(&mut self, descriptor: &ImageDescriptor, zoom: ZoomLevel) -> ZoomResult<Resource> {
        self.assert_ui_thread();
        self.resources.images.image(descriptor, zoom)
    }

    /// Release every registry-owned native resource. The session stays
    /// usable; later lookups allocate again.
    pub fn dispose(&mut self) {
        self.assert_ui_thread();
        debug!(cached = self.resources.len(), "disposing display resources");
        self.resources.dispose_all();
    }

    /// Fonts follow per-widget zoom only with runtime auto-scaling enabled.
    fn effective_zoom(&self, zoom: ZoomLevel) -> ZoomLevel {
        if self.config.auto_scale_on_runtime {
            zoom
        } else {
            self.zoom.device_zoom()
        }
    }

    fn apply_native_zoom(&mut self, monitor: MonitorId, native: ZoomLevel) -> Option<ZoomChangeEvent> {
        if monitor == MonitorId::PRIMARY {
            let event = self.zoom.set_native_zoom(native)?;
            self.monitors.insert(monitor, event.new_zoom());
            return Some(event);
        }
        let device = self.zoom.auto_scale().device_zoom_for(native);
        let old = self.monitor_zoom(monitor);
        self.monitors.insert(monitor, device);
        let event = ZoomChangeEvent::new(old, device);
        if event.is_change() {
            debug!(monitor = monitor.0, %event, "monitor zoom changed");
            Some(event)
        } else {
            None
        }
    }

    fn assert_ui_thread(&self) {
        debug_assert_eq!(
            thread::current().id(),
            self.ui_thread,
            "display session used off its UI thread"
        );
    }
}

fn query_zoom(source: &dyn ZoomSource, monitor: MonitorId) -> ZoomLevel {
    let physical = source.physical_zoom(monitor);
    ZoomLevel::new(physical).unwrap_or_else(|_| {
        warn!(monitor = monitor.0, physical, "platform reported no zoom, assuming 100%");
        ZoomLevel::REFERENCE
    })
}
