//! Capability classes that zoom handlers are registered for.
//!
//! Classes form a DAG rooted at [`ClassId::WIDGET`]. A class may have
//! several super classes, so an interface-like capability ("has an image")
//! can sit next to the structural chain.
//!
//! ```text
//!            widget
//!           /      \
//!      control     item
//!         |
//!     composite
//! ```
//!
//! Super classes must exist before a class naming them is defined, which
//! keeps the graph acyclic.

use std::collections::HashMap;

use crate::error::{ZoomError, ZoomResult};

/// Identifier of a capability class within one [`ClassHierarchy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(usize);

impl ClassId {
    /// Root of every hierarchy.
    pub const WIDGET: ClassId = ClassId(0);
    /// Anything with a font and cached bounds.
    pub const CONTROL: ClassId = ClassId(1);
    /// A control owning child widgets.
    pub const COMPOSITE: ClassId = ClassId(2);
    /// A non-control element of a control (tab, menu entry, ...), may carry
    /// an image.
    pub const ITEM: ClassId = ClassId(3);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct ClassInfo {
    name: String,
    supers: Vec<ClassId>,
}

/// Registry of capability classes and their super classes.
#[derive(Debug)]
pub struct ClassHierarchy {
    classes: Vec<ClassInfo>,
    by_name: HashMap<String, ClassId>,
}

impl ClassHierarchy {
    /// A hierarchy holding the four built-in classes.
    pub fn new() -> Self {
        let mut hierarchy = Self {
            classes: Vec::new(),
            by_name: HashMap::new(),
        };
        hierarchy.push("widget", Vec::new());
        hierarchy.push("control", vec![ClassId::WIDGET]);
        hierarchy.push("composite", vec![ClassId::CONTROL]);
        hierarchy.push("item", vec![ClassId::WIDGET]);
        hierarchy
    }

    /// Define a class below `supers` (below `widget` when empty).
    ///
    /// Defining an existing name again returns the existing id and leaves
    /// its super classes unchanged.
    pub fn define(&mut self, name: &str, supers: &[ClassId]) -> ZoomResult<ClassId> {
        if let Some(&id) = self.by_name.get(name) {
            return Ok(id);
        }
        if let Some(bad) = supers.iter().find(|id| id.0 >= self.classes.len()) {
            return Err(ZoomError::UnknownClass(format!("#{}", bad.0)));
        }
        let supers = if supers.is_empty() {
            vec![ClassId::WIDGET]
        } else {
            supers.to_vec()
        };
        Ok(self.push(name, supers))
    }

    /// Look a class up by name.
    pub fn lookup(&self, name: &str) -> ZoomResult<ClassId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| ZoomError::UnknownClass(name.to_string()))
    }

    pub fn name(&self, id: ClassId) -> &str {
        self.classes
            .get(id.0)
            .map(|c| c.name.as_str())
            .unwrap_or("<unknown>")
    }

    /// Direct super classes of `id`.
    pub fn supers(&self, id: ClassId) -> &[ClassId] {
        self.classes
            .get(id.0)
            .map(|c| c.supers.as_slice())
            .unwrap_or(&[])
    }

    /// True if `class` is `ancestor` or inherits from it.
    pub fn is_subclass_of(&self, class: ClassId, ancestor: ClassId) -> bool {
        if class == ancestor {
            return true;
        }
        let mut stack = vec![class];
        while let Some(current) = stack.pop() {
            for &parent in self.supers(current) {
                if parent == ancestor {
                    return true;
                }
                stack.push(parent);
            }
        }
        false
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn push(&mut self, name: &str, supers: Vec<ClassId>) -> ClassId {
        let id = ClassId(self.classes.len());
        self.classes.push(ClassInfo {
            name: name.to_string(),
            supers,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }
}

impl Default for ClassHierarchy {
    fn default() -> Self {
        Self::new()
    }
}
