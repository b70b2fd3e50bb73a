//! The route tree.
//!
//! Routes map URL path segments to components. They are declared with nested
//! [`RouteBuilder`]s and frozen into a [`RouteTree`] arena when the
//! application is built. Every node's position-derived digit id
//! ([`RoutePath`]) is assigned from registration order at build time and is
//! therefore stable for the life of the process, which is what makes
//! partial-update addressing reliable between requests.

use crate::component::Component;
use crate::error::BuildError;
use std::sync::Arc;
use trellis_core::{AddressError, RoutePath};

/// Declarative description of a route and its children.
///
/// Path segments concatenate down the tree: a child `"tab1"` under `"/"`
/// serves `/tab1`. Segments may use the mux's parameter syntax (e.g.
/// `"/user/{id}"`).
pub struct RouteBuilder {
    segment: String,
    component: Component,
    children: Vec<RouteBuilder>,
}

impl RouteBuilder {
    /// Describe a route serving `component` at `segment`.
    pub fn new(segment: impl Into<String>, component: Component) -> Self {
        Self {
            segment: segment.into(),
            component,
            children: Vec::new(),
        }
    }

    /// Add a child route. Registration order fixes the child's digit id; the
    /// first child is the default descent target.
    pub fn route(mut self, child: RouteBuilder) -> Self {
        self.children.push(child);
        self
    }
}

/// Index of a node within a [`RouteTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A built route node.
#[derive(Debug)]
pub struct RouteNode {
    segment: String,
    component: Arc<Component>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    path_id: RoutePath,
    full_path: String,
    depth: usize,
}

impl RouteNode {
    /// This node's own path segment.
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// The full URL path: this segment appended to all ancestor segments.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// The digit-path address of this node.
    pub fn path_id(&self) -> &RoutePath {
        &self.path_id
    }

    /// Tree depth; the root has depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The component rendered for this route.
    pub fn component(&self) -> &Arc<Component> {
        &self.component
    }

    /// The parent node, or `None` at the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in registration order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// DOM element id of this route's outlet placeholder.
    ///
    /// Derived from the digit path alone, so the placeholder emitted by a
    /// normal render and the out-of-band replacement emitted by a link
    /// render agree without further coordination.
    pub fn outlet_id(&self) -> String {
        format!("trellis-outlet-{}", self.path_id)
    }
}

/// Arena holding every built route node.
#[derive(Debug)]
pub struct RouteTree {
    nodes: Vec<RouteNode>,
}

impl RouteTree {
    /// Build the tree from the implicit root (serving `shell`) and the
    /// registered top-level routes.
    pub fn build(shell: Component, routes: Vec<RouteBuilder>) -> Result<Self, BuildError> {
        let mut tree = Self {
            nodes: vec![RouteNode {
                segment: String::new(),
                component: Arc::new(shell),
                parent: None,
                children: Vec::new(),
                path_id: RoutePath::root(),
                full_path: String::new(),
                depth: 0,
            }],
        };
        for route in routes {
            tree.insert(NodeId(0), route)?;
        }
        Ok(tree)
    }

    fn insert(&mut self, parent: NodeId, builder: RouteBuilder) -> Result<NodeId, BuildError> {
        let index = self.nodes[parent.0].children.len();
        let path_id = self.nodes[parent.0]
            .path_id
            .child(index)
            .map_err(|_| BuildError::TooManyChildren {
                path: self.nodes[parent.0].full_path.clone(),
            })?;
        let node = RouteNode {
            full_path: format!("{}{}", self.nodes[parent.0].full_path, builder.segment),
            segment: builder.segment,
            component: Arc::new(builder.component),
            parent: Some(parent),
            children: Vec::new(),
            path_id,
            depth: self.nodes[parent.0].depth + 1,
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        for child in builder.children {
            self.insert(id, child)?;
        }
        Ok(id)
    }

    /// The root node's id.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Borrow a node. `NodeId`s are only handed out by this tree, so lookup
    /// cannot fail.
    pub fn node(&self, id: NodeId) -> &RouteNode {
        &self.nodes[id.0]
    }

    /// Decode a digit path by walking from the root, one digit per level.
    ///
    /// Fails closed on any out-of-range digit; a stale or tampered path
    /// never resolves to a fallback node.
    pub fn decode(&self, path: &RoutePath) -> Result<NodeId, AddressError> {
        let mut current = self.root();
        for (depth, index) in path.indices().enumerate() {
            let node = self.node(current);
            match node.children.get(index) {
                Some(&child) => current = child,
                None => {
                    return Err(AddressError::OutOfRange {
                        path: path.to_string(),
                        depth,
                        index,
                        len: node.children.len(),
                    });
                }
            }
        }
        Ok(current)
    }

    /// The `index`-th child of `id`, if it exists.
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.node(id).children.get(index).copied()
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty. Never true: the root always exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every node id, root first.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }
}
