//! Zoom-change handlers and dispatching.
//!
//! - [`hierarchy`]: capability classes
//! - [`dispatcher`]: ordered handler table and `dispatch`
//! - [`common`]: handlers for the built-in classes

pub mod common;
pub mod dispatcher;
pub mod hierarchy;

pub use common::register_common_handlers;
pub use dispatcher::{DispatchReport, ZoomChangeDispatcher, ZoomHandler, ZoomScope};
pub use hierarchy::{ClassHierarchy, ClassId};
