//! Handlers for the built-in capability classes.
//!
//! - `control`: rescale cached bounds, refresh the font
//! - `composite`: propagate to children
//! - `item`: refresh the image
//!
//! `widget` is the root and gets no handler of its own.

use super::dispatcher::{ZoomChangeDispatcher, ZoomScope};
use super::hierarchy::ClassId;
use crate::error::ZoomResult;
use crate::scaling::Scale;
use crate::widget::Widget;

/// Install the built-in handlers on `dispatcher`.
pub fn register_common_handlers(dispatcher: &mut ZoomChangeDispatcher) {
    dispatcher.register(ClassId::CONTROL, handle_control);
    dispatcher.register(ClassId::COMPOSITE, handle_composite);
    dispatcher.register(ClassId::ITEM, handle_item);
}

fn handle_control(widget: &mut dyn Widget, scope: &mut ZoomScope<'_>) -> ZoomResult<()> {
    let event = scope.event();
    if let Some(bounds) = widget.bounds() {
        *bounds = bounds.rescale(event.old_zoom(), event.new_zoom());
    }
    if let Some(font) = widget.font_slot() {
        font.refresh(scope.fonts(), event.new_zoom())?;
    }
    Ok(())
}

fn handle_composite(widget: &mut dyn Widget, scope: &mut ZoomScope<'_>) -> ZoomResult<()> {
    widget.for_each_child(&mut |child| scope.propagate(child));
    Ok(())
}

fn handle_item(widget: &mut dyn Widget, scope: &mut ZoomScope<'_>) -> ZoomResult<()> {
    let zoom = scope.event().new_zoom();
    if let Some(image) = widget.image_slot() {
        image.refresh(scope.images(), zoom)?;
    }
    Ok(())
}
