//! Zoom-change dispatcher.
//!
//! Maps capability classes to handlers and applies them to a widget whose
//! zoom changed. Every handler whose class the widget's runtime class
//! satisfies runs, most specific first.
//!
//! # Architecture
//!
//! ```text
//! dispatch(widget, zoom)
//!   ├─ excluded class?        → no-op
//!   ├─ widget already at zoom → no-op
//!   ├─ plan_for(class)        → handler indices (cached per class)
//!   ├─ run each handler       → failures recorded, never abort the rest
//!   └─ widget.set_zoom(zoom)
//! ```
//!
//! Handlers are kept in one list sorted so that a handler for a subclass
//! always precedes a handler for any of its super classes. Classes that are
//! unrelated keep a stable order by name.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, debug_span, trace, warn};

use super::hierarchy::{ClassHierarchy, ClassId};
use crate::error::{ZoomError, ZoomResult};
use crate::events::ZoomChangeEvent;
use crate::resources::{FontRegistry, ImageRegistry, Resources};
use crate::widget::Widget;
use crate::zoom::ZoomLevel;

/// A zoom-change handler for one capability class.
pub type ZoomHandler = Box<dyn Fn(&mut dyn Widget, &mut ZoomScope<'_>) -> ZoomResult<()>>;

/// What one dispatch did, including recursive propagation.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Handler invocations, successful or not.
    pub handlers_run: usize,
    /// Widgets moved to the new zoom.
    pub widgets_updated: usize,
    /// Isolated handler failures, in the order they happened.
    pub failures: Vec<ZoomError>,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: DispatchReport) {
        self.handlers_run += other.handlers_run;
        self.widgets_updated += other.widgets_updated;
        self.failures.extend(other.failures);
    }
}

/// Everything a handler may touch while reacting to one zoom change.
pub struct ZoomScope<'a> {
    event: ZoomChangeEvent,
    dispatcher: &'a ZoomChangeDispatcher,
    resources: &'a mut Resources,
    report: &'a mut DispatchReport,
}

impl ZoomScope<'_> {
    /// The transition of the widget being handled.
    pub fn event(&self) -> ZoomChangeEvent {
        self.event
    }

    pub fn fonts(&mut self) -> &mut FontRegistry {
        &mut self.resources.fonts
    }

    pub fn images(&mut self) -> &mut ImageRegistry {
        &mut self.resources.images
    }

    pub fn resources(&mut self) -> &mut Resources {
        &mut *self.resources
    }

    /// Dispatch the same target zoom to an owned sub-widget. Its failures
    /// land in the same report.
    pub fn propagate(&mut self, child: &mut dyn Widget) {
        self.dispatcher
            .dispatch_into(child, self.event.new_zoom(), self.resources, self.report);
    }
}

/// Class-aware zoom-change dispatcher.
pub struct ZoomChangeDispatcher {
    hierarchy: ClassHierarchy,
    handlers: Vec<(ClassId, ZoomHandler)>,
    excluded: HashSet<ClassId>,
    plans: RefCell<HashMap<ClassId, Rc<[usize]>>>,
}

impl ZoomChangeDispatcher {
    pub fn new() -> Self {
        Self::with_hierarchy(ClassHierarchy::new())
    }

    pub fn with_hierarchy(hierarchy: ClassHierarchy) -> Self {
        Self {
            hierarchy,
            handlers: Vec::new(),
            excluded: HashSet::new(),
            plans: RefCell::new(HashMap::new()),
        }
    }

    pub fn hierarchy(&self) -> &ClassHierarchy {
        &self.hierarchy
    }

    /// Define a capability class, see [`ClassHierarchy::define`].
    pub fn define_class(&mut self, name: &str, supers: &[ClassId]) -> ZoomResult<ClassId> {
        let id = self.hierarchy.define(name, supers)?;
        self.plans.get_mut().clear();
        Ok(id)
    }

    /// Register `handler` for `class`, replacing any handler already
    /// registered for exactly that class.
    pub fn register<F>(&mut self, class: ClassId, handler: F)
    where
        F: Fn(&mut dyn Widget, &mut ZoomScope<'_>) -> ZoomResult<()> + 'static,
    {
        let handler: ZoomHandler = Box::new(handler);
        match self.handlers.iter_mut().find(|(c, _)| *c == class) {
            Some(slot) => slot.1 = handler,
            None => self.handlers.push((class, handler)),
        }
        self.sort_handlers();
        self.plans.get_mut().clear();
        debug!(class = self.hierarchy.name(class), "registered zoom handler");
    }

    /// Suppress dispatch for widgets whose runtime class is exactly `class`.
    /// Subclasses are not affected.
    pub fn exclude(&mut self, class: ClassId) {
        self.excluded.insert(class);
    }

    pub fn is_excluded(&self, class: ClassId) -> bool {
        self.excluded.contains(&class)
    }

    /// Registered classes in dispatch order.
    pub fn handler_order(&self) -> Vec<ClassId> {
        self.handlers.iter().map(|(c, _)| *c).collect()
    }

    /// Bring `widget` to `new_zoom`.
    ///
    /// A no-op for excluded classes and for widgets already at `new_zoom`.
    /// Otherwise every matching handler runs, then the widget's zoom is
    /// updated even if some handlers failed.
    pub fn dispatch(
        &self,
        widget: &mut dyn Widget,
        new_zoom: ZoomLevel,
        resources: &mut Resources,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        self.dispatch_into(widget, new_zoom, resources, &mut report);
        report
    }

    fn dispatch_into(
        &self,
        widget: &mut dyn Widget,
        new_zoom: ZoomLevel,
        resources: &mut Resources,
        report: &mut DispatchReport,
    ) {
        let class = widget.class();
        if self.is_excluded(class) {
            trace!(class = self.hierarchy.name(class), "class excluded from zoom dispatch");
            return;
        }
        let event = ZoomChangeEvent::new(widget.zoom(), new_zoom);
        if !event.is_change() {
            return;
        }

        let span = debug_span!("zoom_dispatch", class = self.hierarchy.name(class), %event);
        let _enter = span.enter();

        for &index in self.plan_for(class).iter() {
            let (handler_class, handler) = &self.handlers[index];
            report.handlers_run += 1;
            let mut scope = ZoomScope {
                event,
                dispatcher: self,
                resources: &mut *resources,
                report: &mut *report,
            };
            if let Err(err) = handler(&mut *widget, &mut scope) {
                let name = self.hierarchy.name(*handler_class);
                warn!(handler = name, error = %err, "zoom handler failed");
                report.failures.push(ZoomError::Handler {
                    class: name.to_string(),
                    message: err.to_string(),
                });
            }
        }

        widget.set_zoom(new_zoom);
        report.widgets_updated += 1;
    }

    /// Indices of the handlers matching `class`, in dispatch order.
    fn plan_for(&self, class: ClassId) -> Rc<[usize]> {
        if let Some(plan) = self.plans.borrow().get(&class) {
            return Rc::clone(plan);
        }
        let plan: Rc<[usize]> = self
            .handlers
            .iter()
            .enumerate()
            .filter(|(_, (c, _))| self.hierarchy.is_subclass_of(class, *c))
            .map(|(i, _)| i)
            .collect();
        self.plans.borrow_mut().insert(class, Rc::clone(&plan));
        plan
    }

    /// Topological sort: subclasses before super classes, ties by name.
    fn sort_handlers(&mut self) {
        let classes: Vec<ClassId> = self.handlers.iter().map(|(c, _)| *c).collect();
        let n = classes.len();

        // blockers[i] = number of registered strict subclasses of classes[i]
        let mut blockers = vec![0usize; n];
        for (i, &a) in classes.iter().enumerate() {
            for (j, &b) in classes.iter().enumerate() {
                if i != j && self.hierarchy.is_subclass_of(b, a) {
                    blockers[i] += 1;
                }
            }
        }

        let key = |i: usize| (self.hierarchy.name(classes[i]).to_string(), i);
        let mut ready: BTreeSet<(String, usize)> =
            (0..n).filter(|&i| blockers[i] == 0).map(key).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(next) = ready.pop_first() {
            let i = next.1;
            order.push(i);
            for j in 0..n {
                if j != i && self.hierarchy.is_subclass_of(classes[i], classes[j]) {
                    blockers[j] -= 1;
                    if blockers[j] == 0 {
                        ready.insert(key(j));
                    }
                }
            }
        }

        let mut slots: Vec<Option<(ClassId, ZoomHandler)>> =
            self.handlers.drain(..).map(Some).collect();
        self.handlers = order.into_iter().filter_map(|i| slots[i].take()).collect();
    }
}

impl Default for ZoomChangeDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ZoomChangeDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order: Vec<&str> = self
            .handlers
            .iter()
            .map(|(c, _)| self.hierarchy.name(*c))
            .collect();
        f.debug_struct("ZoomChangeDispatcher")
            .field("handlers", &order)
            .field("excluded", &self.excluded.len())
            .finish()
    }
}
