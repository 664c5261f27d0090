//! Arena nodes of the sphere tree.

use std::fmt;

use crate::sphere::Sphere;

/// Index of a node inside its [`SphereTree`](crate::SphereTree).
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in creation order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A sphere together with its place in the tree.
///
/// A node is never modified after creation except for appending children.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    sphere: Sphere,

    /// Distance from the root in edges.
    depth: usize,

    parent: Option<NodeId>,

    /// Children in the order they were attached.
    children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new_root(sphere: Sphere) -> Self {
        Self {
            sphere,
            depth: 0,
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn new_child(sphere: Sphere, parent: NodeId, depth: usize) -> Self {
        Self {
            sphere,
            depth,
            parent: Some(parent),
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn sphere(&self) -> &Sphere {
        &self.sphere
    }

    /// Distance from the root in edges.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this node's sphere overlaps or touches `other`.
    #[inline]
    pub fn collides_with(&self, other: &Sphere) -> bool {
        self.sphere.collides_with(other)
    }

    #[inline]
    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }
}
