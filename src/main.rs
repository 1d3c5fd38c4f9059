//! Demo: walk a small widget tree through 100% -> 200% -> 100% on the
//! headless backend and log what gets rescaled.
//!
//! ```text
//! RUST_LOG=zoomscale=trace cargo run --bin zoomscale-demo
//! ```

use std::any::Any;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

use zoomscale::config::{config_path, ScalingConfig};
use zoomscale::handlers::ClassId;
use zoomscale::platform::HeadlessBackend;
use zoomscale::resources::{FontDescriptor, FontStyle, ImageData, ImageDescriptor};
use zoomscale::scaling::Rect;
use zoomscale::widget::{FontSlot, ImageSlot, Widget};
use zoomscale::{Display, ZoomLevel, ZoomResult};

struct Label {
    zoom: ZoomLevel,
    font: FontSlot,
    bounds: Rect,
}

impl Widget for Label {
    fn class(&self) -> ClassId {
        ClassId::CONTROL
    }

    fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: ZoomLevel) {
        self.zoom = zoom;
    }

    fn font_slot(&mut self) -> Option<&mut FontSlot> {
        Some(&mut self.font)
    }

    fn bounds(&mut self) -> Option<&mut Rect> {
        Some(&mut self.bounds)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct Icon {
    zoom: ZoomLevel,
    image: ImageSlot,
}

impl Widget for Icon {
    fn class(&self) -> ClassId {
        ClassId::ITEM
    }

    fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: ZoomLevel) {
        self.zoom = zoom;
    }

    fn image_slot(&mut self) -> Option<&mut ImageSlot> {
        Some(&mut self.image)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct Panel {
    zoom: ZoomLevel,
    font: FontSlot,
    bounds: Rect,
    children: Vec<Box<dyn Widget>>,
}

impl Widget for Panel {
    fn class(&self) -> ClassId {
        ClassId::COMPOSITE
    }

    fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: ZoomLevel) {
        self.zoom = zoom;
    }

    fn font_slot(&mut self) -> Option<&mut FontSlot> {
        Some(&mut self.font)
    }

    fn bounds(&mut self) -> Option<&mut Rect> {
        Some(&mut self.bounds)
    }

    fn for_each_child(&mut self, visit: &mut dyn FnMut(&mut dyn Widget)) {
        for child in &mut self.children {
            visit(child.as_mut());
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn main() {
    let stdout_log = fmt::layer().compact().with_target(false);
    let subscriber = Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(stdout_log);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("zoomscale-demo: log subscriber already installed");
    }

    if let Err(e) = run() {
        eprintln!("zoomscale-demo error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> ZoomResult<()> {
    let config = ScalingConfig::load(&config_path())?.with_env_overrides()?;
    let live = round_trip(config)?;
    info!(live, "disposed");
    Ok(())
}

/// Walk the demo tree to 200% and back, then dispose the session. Returns
/// the number of native objects still alive afterwards.
fn round_trip(config: ScalingConfig) -> ZoomResult<usize> {
    let backend = HeadlessBackend::new(100);
    let mut session = Display::new(config, backend.platform());
    let start = session.device_zoom();

    let body = FontDescriptor::new("Segoe UI", 12, FontStyle::NORMAL);
    let mut panel = Panel {
        zoom: start,
        font: FontSlot::system(),
        bounds: Rect::new(0, 0, 640, 480),
        children: vec![
            Box::new(Label {
                zoom: start,
                font: FontSlot::custom(body),
                bounds: Rect::new(10, 10, 200, 24),
            }),
            Box::new(Icon {
                zoom: start,
                image: ImageSlot::new(ImageDescriptor::fixed("app-icon", ImageData::new(16, 16))),
            }),
        ],
    };

    for percent in [200, 100] {
        let zoom = ZoomLevel::new(percent)?;
        let report = session.on_zoom_changed(&mut panel, zoom);
        info!(
            %zoom,
            handlers = report.handlers_run,
            widgets = report.widgets_updated,
            failures = report.failures.len(),
            bounds = ?panel.bounds,
            "zoom applied"
        );
        for failure in &report.failures {
            info!(%failure, "handler failure");
        }
    }

    let cached = session.resources().len();
    info!(
        cached,
        allocated = backend.created(),
        "resource cache after round trip"
    );
    session.dispose();
    Ok(backend.live())
}
