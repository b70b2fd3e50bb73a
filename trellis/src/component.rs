//! The component tree.
//!
//! A [`Component`] is a recursively composed unit of view logic: a required
//! [`View`] plus optional [`Loader`], [`Action`] and [`Head`] capabilities,
//! and zero or more named children. Trees are assembled once at application
//! wiring time through [`ComponentBuilder`] and frozen behind `Arc` for the
//! life of the process.
//!
//! # Identifiers
//!
//! Every component carries an identifier that is unique among its siblings:
//! either an explicit string supplied with [`ComponentBuilder::id`], or the
//! next value from the [`IdSequence`] passed to [`ComponentBuilder::build`].
//! The chain of identifiers from a tree's root to a node, joined by `_`,
//! forms the [`ComponentPath`] a client echoes back to address that node.

use crate::error::BuildError;
use crate::view::{Action, Head, Loader, StaticLoader, View};
use std::collections::BTreeMap;
use std::sync::Arc;
use trellis_core::{AddressError, ComponentPath, COMPONENT_DELIMITER};

/// Generator for auto-assigned component identifiers.
///
/// One sequence is typically created per application wiring pass and
/// threaded through every [`ComponentBuilder::build`] call, making the
/// assignment deterministic without process-wide state.
#[derive(Debug, Default)]
pub struct IdSequence {
    next: usize,
}

impl IdSequence {
    /// Create a sequence starting at `"0"`.
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Produce the next identifier.
    pub fn next_id(&mut self) -> String {
        let id = self.next.to_string();
        self.next += 1;
        id
    }
}

/// A node in a component tree.
///
/// Cheap to clone: capabilities and children are shared behind `Arc`.
#[derive(Clone)]
pub struct Component {
    id: String,
    view: Arc<dyn View>,
    loader: Option<Arc<dyn Loader>>,
    action: Option<Arc<dyn Action>>,
    head: Option<Arc<dyn Head>>,
    children: BTreeMap<String, Arc<Component>>,
}

impl Component {
    /// Start building a component around its view.
    pub fn builder(view: impl View + 'static) -> ComponentBuilder {
        ComponentBuilder {
            id: None,
            view: Arc::new(view),
            loader: None,
            action: None,
            head: None,
            children: Vec::new(),
        }
    }

    /// The identifier unique among this component's siblings.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The view capability.
    pub fn view(&self) -> &Arc<dyn View> {
        &self.view
    }

    /// The loader capability, if any.
    pub fn loader(&self) -> Option<&Arc<dyn Loader>> {
        self.loader.as_ref()
    }

    /// The action capability, if any.
    pub fn action(&self) -> Option<&Arc<dyn Action>> {
        self.action.as_ref()
    }

    /// The head capability, if any.
    pub fn head(&self) -> Option<&Arc<dyn Head>> {
        self.head.as_ref()
    }

    /// Look up a direct child by identifier.
    pub fn child(&self, id: &str) -> Option<&Arc<Component>> {
        self.children.get(id)
    }

    /// Number of registered children.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Walk a component path starting at `root`.
    ///
    /// The path's first segment must match the root's own identifier; each
    /// following segment selects a child. Any mismatch is
    /// [`AddressError::ComponentNotFound`] - lookup never panics on
    /// client-supplied paths.
    pub fn find(root: &Arc<Component>, path: &ComponentPath) -> Result<Arc<Component>, AddressError> {
        let mut segments = path.segments();
        if segments.next() != Some(root.id()) {
            return Err(AddressError::ComponentNotFound(path.to_string()));
        }
        let mut current = root;
        for segment in segments {
            current = current
                .children
                .get(segment)
                .ok_or_else(|| AddressError::ComponentNotFound(path.to_string()))?;
        }
        Ok(current.clone())
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("has_loader", &self.loader.is_some())
            .field("has_action", &self.action.is_some())
            .field("has_head", &self.head.is_some())
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`Component`].
///
/// Children are registered explicitly with [`child`](Self::child); ownership
/// is exclusive and fixed at build time.
pub struct ComponentBuilder {
    id: Option<String>,
    view: Arc<dyn View>,
    loader: Option<Arc<dyn Loader>>,
    action: Option<Arc<dyn Action>>,
    head: Option<Arc<dyn Head>>,
    children: Vec<Component>,
}

impl ComponentBuilder {
    /// Assign an explicit identifier instead of drawing from the sequence.
    ///
    /// Must be non-empty and must not contain the path delimiter `_`.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attach a data loader.
    pub fn loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Attach a loader serving clones of a fixed value.
    pub fn data<T: Clone + Send + Sync + 'static>(self, value: T) -> Self {
        self.loader(StaticLoader::new(value))
    }

    /// Attach an action handler.
    pub fn action(mut self, action: impl Action + 'static) -> Self {
        self.action = Some(Arc::new(action));
        self
    }

    /// Attach a head producer.
    pub fn head(mut self, head: impl Head + 'static) -> Self {
        self.head = Some(Arc::new(head));
        self
    }

    /// Register a child component.
    pub fn child(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    /// Finish the component, drawing an identifier from `ids` if none was
    /// set explicitly.
    ///
    /// Fails if an explicit identifier is invalid or two children share an
    /// identifier.
    pub fn build(self, ids: &mut IdSequence) -> Result<Component, BuildError> {
        let id = match self.id {
            Some(id) => {
                if id.is_empty() || id.contains(COMPONENT_DELIMITER) {
                    return Err(BuildError::InvalidIdentifier(id));
                }
                id
            }
            None => ids.next_id(),
        };

        let mut children = BTreeMap::new();
        for child in self.children {
            let child_id = child.id().to_string();
            if children.insert(child_id.clone(), Arc::new(child)).is_some() {
                return Err(BuildError::DuplicateChildId(child_id));
            }
        }

        Ok(Component {
            id,
            view: self.view,
            loader: self.loader,
            action: self.action,
            head: self.head,
            children,
        })
    }
}
