//! Tests for the resource registries through a headless session.

mod common;

use common::{body_font, icon, session, zoom, Button};
use zoomscale::platform::headless::HeadlessBackend;
use zoomscale::resources::{
    FontDescriptor, FontKey, FontStyle, ImageData, ImageDescriptor, NativeHandle,
    ScaledResourceRegistry,
};
use zoomscale::{ZoomError, ZoomLevel};

// === Cache Coherence ===

#[test]
fn same_descriptor_and_zoom_returns_same_resource() {
    let (mut display, backend) = session(100);
    let a = display.font(&body_font(), zoom(150)).unwrap();
    let b = display.font(&body_font(), zoom(150)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.handle(), b.handle());
    // base at 100% plus the 150% variant
    assert_eq!(backend.created(), 2);
}

#[test]
fn equal_descriptors_share_one_container() {
    let (mut display, backend) = session(100);
    let first = display.font(&body_font(), zoom(100)).unwrap();
    let again = display
        .font(&FontDescriptor::new("Segoe UI", 12, FontStyle::NORMAL), zoom(100))
        .unwrap();
    assert_eq!(first, again);
    assert_eq!(backend.created(), 1);
}

#[test]
fn lookup_at_own_zoom_is_the_resource_itself() {
    let (mut display, _backend) = session(100);
    let font = display.font(&body_font(), zoom(175)).unwrap();
    let same = display.resources_mut().fonts.scale_for(font, zoom(175)).unwrap();
    assert_eq!(font, same);
}

// === Font Scaling Scenario ===

#[test]
fn twelve_point_font_doubles_at_200_and_restores_at_100() {
    let (mut display, backend) = session(100);
    let mut button = Button::new(zoom(100), body_font());

    let original = button
        .font
        .refresh(&mut display.resources_mut().fonts, zoom(100))
        .unwrap();
    assert_eq!(backend.font_height(original.handle()), Some(16));

    let report = display.on_zoom_changed(&mut button, zoom(200));
    assert!(report.is_clean());
    let doubled = button.font.resource.unwrap();
    assert_eq!(backend.font_height(doubled.handle()), Some(32));

    display.on_zoom_changed(&mut button, zoom(100));
    assert_eq!(button.font.resource, Some(original));
    assert_eq!(backend.created(), 2);
}

// === System Font ===

#[test]
fn system_font_base_created_at_primary_zoom() {
    let (mut display, backend) = session(150);
    let scaled = display.system_font(zoom(200)).unwrap();

    let fonts = &display.resources().fonts;
    assert_eq!(fonts.zooms(&FontKey::System), vec![zoom(150), zoom(200)]);
    assert_eq!(backend.created(), 2);
    // 9pt system font: 12px at 100%, 24px at 200%
    assert_eq!(backend.font_height(scaled.handle()), Some(24));
}

// === Invalidation ===

#[test]
fn externally_disposed_font_is_rederived() {
    let (mut display, backend) = session(100);
    let first = display.font(&body_font(), zoom(200)).unwrap();
    backend.dispose_externally(first.handle());

    let second = display.font(&body_font(), zoom(200)).unwrap();
    assert_ne!(first.handle(), second.handle());
    assert_eq!(backend.font_height(second.handle()), Some(32));
}

#[test]
fn invalidate_then_lookup_allocates_fresh() {
    let (mut display, backend) = session(100);
    let font = display.font(&body_font(), zoom(125)).unwrap();
    assert!(display.resources_mut().fonts.invalidate(font));
    assert_eq!(backend.destroyed(), vec![font.handle()]);

    let fresh = display.font(&body_font(), zoom(125)).unwrap();
    assert_ne!(fresh, font);
}

// === Disposal ===

#[test]
fn dispose_releases_everything_owned() {
    let (mut display, backend) = session(100);
    display.font(&body_font(), zoom(200)).unwrap();
    display.system_font(zoom(150)).unwrap();
    display.image(&icon(), zoom(200)).unwrap();
    assert_eq!(backend.live(), 6);

    display.dispose();
    assert_eq!(backend.live(), 0);
    assert!(display.resources().is_empty());
}

#[test]
fn dispose_never_releases_adopted_base() {
    let backend = HeadlessBackend::new(100);
    let mut fonts: ScaledResourceRegistry<FontKey> =
        ScaledResourceRegistry::new(Box::new(backend.clone()), zoom(100));

    let caller_owned = NativeHandle(4242);
    let base = fonts.adopt(&FontKey::from(body_font()), caller_owned, zoom(100));
    let derived = fonts.get_or_create(&FontKey::from(body_font()), zoom(200)).unwrap();
    assert!(!fonts.is_owned(base));
    assert!(fonts.is_owned(derived));

    fonts.dispose_all();
    assert_eq!(backend.destroyed(), vec![derived.handle()]);
}

#[test]
fn disposed_externally_is_not_released_twice() {
    let (mut display, backend) = session(100);
    let font = display.font(&body_font(), zoom(200)).unwrap();
    backend.dispose_externally(font.handle());

    display.dispose();
    assert!(!backend.destroyed().contains(&font.handle()));
}

// === Allocation Failure ===

#[test]
fn failed_allocation_leaves_no_entry() {
    let (mut display, backend) = session(100);
    display.font(&body_font(), zoom(100)).unwrap();
    backend.fail_allocations(true);

    let err = display.font(&body_font(), zoom(300)).unwrap_err();
    assert!(matches!(err, ZoomError::NativeAllocation { zoom: 300, .. }));
    let key = FontKey::from(body_font());
    assert!(!display.resources().fonts.contains(&key, zoom(300)));

    backend.fail_allocations(false);
    assert!(display.font(&body_font(), zoom(300)).is_ok());
}

// === Images ===

#[test]
fn image_falls_back_to_scaled_reference_data() {
    let (mut display, backend) = session(100);
    let image = display.image(&icon(), zoom(150)).unwrap();
    assert_eq!(backend.bitmap_size(image.handle()), Some(ImageData::new(24, 24)));
}

#[test]
fn image_without_any_data_is_an_error() {
    let (mut display, backend) = session(100);
    let empty = ImageDescriptor::new("empty", std::rc::Rc::new(|_: ZoomLevel| None::<ImageData>));
    let err = display.image(&empty, zoom(200)).unwrap_err();
    assert!(matches!(err, ZoomError::MissingImageData { .. }));
    assert_eq!(backend.created(), 0);
}
