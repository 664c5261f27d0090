//! Sphere tree container and layer-by-layer generation.

use std::fmt;

use rand::Rng;
use tracing::{info, warn};

use crate::config::{ExhaustionPolicy, GeneratorConfig};
use crate::error::{GenerateError, PlacementError};
use crate::index::SpatialIndex;
use crate::node::{Node, NodeId};
use crate::palette::Palette;
use crate::placement::generate_children_for;
use crate::sphere::Sphere;
use crate::visitor::SphereVisitor;

/// A tree of non-overlapping spheres.
///
/// Nodes live in a flat arena and refer to each other by [`NodeId`]; the
/// tree owns all of them and drops them together. Every sphere is also kept
/// in a spatial index, so checking a candidate against the whole tree does
/// not walk every node.
///
/// # Construction
///
/// ```ignore
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use sphere_tree::{GeneratorConfig, SphereTree};
///
/// let config = GeneratorConfig::default();
/// let mut tree = SphereTree::from_config(&config);
/// let mut rng = StdRng::seed_from_u64(42);
/// tree.generate(&config, &mut rng)?;
/// ```
///
/// # Traversal
///
/// [`SphereTree::render`] hands every sphere and parent-child edge to a
/// [`SphereVisitor`], siblings before their descendants.
#[derive(Default)]
pub struct SphereTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    palette: Palette,
    index: SpatialIndex,
}

impl SphereTree {
    /// Creates an empty tree with the default palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tree whose root is `sphere`.
    pub fn with_root(sphere: Sphere) -> Self {
        let mut tree = Self::new();
        tree.set_root(sphere);
        tree
    }

    /// Creates a tree with the root placement from `config`, colored with
    /// the first palette entry.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let mut tree = Self::new();
        let color = tree.palette.color_for_layer(0);
        tree.set_root(Sphere::new(config.root_center, config.root_radius, color));
        tree
    }

    /// Installs `sphere` as the root, discarding any previous contents.
    pub fn set_root(&mut self, sphere: Sphere) -> NodeId {
        self.nodes.clear();
        self.index.clear();

        let id = NodeId(0);
        self.nodes.push(Node::new_root(sphere));
        self.index.insert(id, sphere.center(), sphere.radius());
        self.root = Some(id);
        id
    }

    /// Returns the root id, if a root has been set.
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Returns the node for `id`, or `None` if `id` is out of range.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent()
    }

    /// Returns the total number of spheres in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the greatest node depth (0 for a lone root or an empty tree).
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Iterates over all nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    /// Appends `sphere` as the last child of `parent` and returns its id.
    ///
    /// Does not check for collisions; callers screen candidates first.
    ///
    /// # Panics
    /// Panics if `parent` was not issued by this tree.
    pub fn add_child(&mut self, parent: NodeId, sphere: Sphere) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = self.node(parent).depth() + 1;

        self.nodes.push(Node::new_child(sphere, parent, depth));
        self.nodes[parent.0].push_child(id);
        self.index.insert(id, sphere.center(), sphere.radius());
        id
    }

    /// Returns `true` if `candidate` collides with `subtree_root` or any of
    /// its descendants. Depth-first, stops at the first collision.
    pub fn collides_or_exists(&self, candidate: &Sphere, subtree_root: NodeId) -> bool {
        let node = self.node(subtree_root);
        node.collides_with(candidate)
            || node
                .children()
                .iter()
                .any(|&child| self.collides_or_exists(candidate, child))
    }

    /// Returns `true` if `candidate` collides with any sphere in the tree.
    ///
    /// Same answer as [`collides_or_exists`](Self::collides_or_exists) from
    /// the root, answered through the spatial index.
    pub fn collides_with_any(&self, candidate: &Sphere) -> bool {
        self.index
            .near(candidate.center(), candidate.radius())
            .any(|id| self.node(id).collides_with(candidate))
    }

    /// Populates one layer for every node in `frontier`, then recurses with
    /// the children just created until `layer` reaches `config.max_depth`.
    ///
    /// The next frontier lists the new children grouped by parent, in
    /// `frontier` order.
    pub fn grow_layer<R: Rng>(
        &mut self,
        layer: usize,
        frontier: &[NodeId],
        config: &GeneratorConfig,
        rng: &mut R,
    ) -> Result<(), GenerateError> {
        if layer >= config.max_depth {
            return Ok(());
        }

        let mut next = Vec::new();
        for &node in frontier {
            match generate_children_for(self, node, layer, config, rng) {
                Ok(children) => next.extend(children),
                Err(source) => self.recover(node, layer, source, config.on_exhaustion, &mut next)?,
            }
        }

        self.grow_layer(layer + 1, &next, config, rng)
    }

    /// Applies `policy` to a node that could not be fully populated.
    fn recover(
        &mut self,
        node: NodeId,
        layer: usize,
        source: PlacementError,
        policy: ExhaustionPolicy,
        next: &mut Vec<NodeId>,
    ) -> Result<(), GenerateError> {
        warn!(%node, layer, ?policy, "{source}");
        match (policy, source) {
            (ExhaustionPolicy::Abort, source) => {
                Err(GenerateError::Placement { node, layer, source })
            }
            (ExhaustionPolicy::SkipNode, _) => Ok(()),
            (ExhaustionPolicy::Truncate, PlacementError::Exhausted { accepted, .. }) => {
                next.extend(accepted.into_iter().map(|sphere| self.add_child(node, sphere)));
                Ok(())
            }
        }
    }

    /// Generates the whole tree below the root, starting at layer 1.
    ///
    /// Returns [`GenerateError::MissingRoot`] if no root was set and
    /// [`GenerateError::Config`] if `config` is invalid.
    pub fn generate<R: Rng>(
        &mut self,
        config: &GeneratorConfig,
        rng: &mut R,
    ) -> Result<(), GenerateError> {
        config.validate()?;
        let root = self.root.ok_or(GenerateError::MissingRoot)?;

        self.grow_layer(1, &[root], config, rng)?;
        info!(nodes = self.len(), depth = self.depth(), "sphere tree generated");
        Ok(())
    }

    /// Visits `node` and everything below it.
    ///
    /// If `parent` is given, `node` is drawn together with the edge from
    /// `parent`. Then all children of a node are drawn before any of them is
    /// descended into.
    pub fn visit<V: SphereVisitor>(&self, node: NodeId, parent: Option<NodeId>, visitor: &mut V) {
        if let Some(parent) = parent {
            self.emit(node, parent, visitor);
        }
        self.visit_children(node, visitor);
    }

    /// Draws the root sphere, then visits the whole tree.
    pub fn render<V: SphereVisitor>(&self, visitor: &mut V) {
        if let Some(root) = self.root {
            let sphere = self.node(root).sphere();
            visitor.render_sphere(sphere.center(), sphere.color(), sphere.radius());
            self.visit(root, None, visitor);
        }
    }

    fn visit_children<V: SphereVisitor>(&self, node: NodeId, visitor: &mut V) {
        let children = self.children(node);
        for &child in children {
            self.emit(child, node, visitor);
        }
        for &child in children {
            self.visit_children(child, visitor);
        }
    }

    fn emit<V: SphereVisitor>(&self, node: NodeId, parent: NodeId, visitor: &mut V) {
        let sphere = self.node(node).sphere();
        visitor.render_sphere(sphere.center(), sphere.color(), sphere.radius());
        visitor.render_edge(self.node(parent).sphere().center(), sphere.center());
    }
}

impl PartialEq for SphereTree {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root && self.palette == other.palette && self.nodes == other.nodes
    }
}

impl fmt::Debug for SphereTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SphereTree")
            .field("root", &self.root)
            .field("nodes", &self.nodes)
            .field("palette", &self.palette)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::palette::Rgb;
    use crate::visitor::{CollectingVisitor, DrawCommand};
    use nalgebra::Point3;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const GREY: Rgb = Rgb::new(127, 127, 127);

    fn sphere(x: f64, y: f64, z: f64) -> Sphere {
        Sphere::new(Point3::new(x, y, z), 0.5, GREY)
    }

    /// root -> (a -> (c), b)
    fn small_tree() -> (SphereTree, [NodeId; 4]) {
        let mut tree = SphereTree::with_root(sphere(0.0, 0.0, 0.0));
        let root = tree.root().unwrap();
        let a = tree.add_child(root, sphere(-2.0, -2.0, 0.0));
        let b = tree.add_child(root, sphere(2.0, -2.0, 0.0));
        let c = tree.add_child(a, sphere(-2.0, -4.0, 0.0));
        (tree, [root, a, b, c])
    }

    #[test]
    fn empty_tree() {
        let tree = SphereTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn add_child_links_parent_and_depth() {
        let (tree, [root, a, b, c]) = small_tree();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.children(a), &[c]);
        assert_eq!(tree.parent(c), Some(a));
        assert_eq!(tree.node(c).depth(), 2);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn set_root_discards_previous_contents() {
        let (mut tree, _) = small_tree();
        let root = tree.set_root(sphere(5.0, 5.0, 5.0));
        assert_eq!(tree.len(), 1);
        assert!(tree.children(root).is_empty());
        assert!(!tree.collides_with_any(&sphere(-2.0, -4.0, 0.0)));
    }

    #[test]
    fn collides_or_exists_searches_whole_subtree() {
        let (tree, [root, a, b, _]) = small_tree();
        let near_grandchild = sphere(-2.0, -4.5, 0.5);

        assert!(tree.collides_or_exists(&near_grandchild, root));
        assert!(tree.collides_or_exists(&near_grandchild, a));
        assert!(!tree.collides_or_exists(&near_grandchild, b));
        assert!(!tree.collides_or_exists(&sphere(10.0, 10.0, 10.0), root));
    }

    #[test]
    fn index_agrees_with_recursive_search() {
        let (tree, [root, ..]) = small_tree();
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..500 {
            let probe = sphere(
                rng.random_range(-4.0..4.0),
                rng.random_range(-6.0..2.0),
                rng.random_range(-2.0..2.0),
            );
            assert_eq!(
                tree.collides_with_any(&probe),
                tree.collides_or_exists(&probe, root)
            );
        }
    }

    #[test]
    fn visit_draws_siblings_before_descendants() {
        let (tree, [root, a, b, c]) = small_tree();
        let mut visitor = CollectingVisitor::new();
        tree.visit(root, None, &mut visitor);

        let centers: Vec<_> = visitor
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Sphere { center, .. } => Some(*center),
                DrawCommand::Edge { .. } => None,
            })
            .collect();
        let expected: Vec<_> = [a, b, c]
            .iter()
            .map(|&id| tree.node(id).sphere().center())
            .collect();
        assert_eq!(centers, expected);
        assert_eq!(visitor.edge_count(), 3);
    }

    #[test]
    fn visit_with_parent_draws_node_and_edge() {
        let (tree, [root, a, _, c]) = small_tree();
        let mut visitor = CollectingVisitor::new();
        tree.visit(a, Some(root), &mut visitor);

        let commands = visitor.into_commands();
        assert_eq!(commands.len(), 4);
        assert_eq!(
            commands[1],
            DrawCommand::Edge {
                from: tree.node(root).sphere().center(),
                to: tree.node(a).sphere().center(),
            }
        );
        assert_eq!(
            commands[3],
            DrawCommand::Edge {
                from: tree.node(a).sphere().center(),
                to: tree.node(c).sphere().center(),
            }
        );
    }

    #[test]
    fn render_includes_root() {
        let (tree, _) = small_tree();
        let mut visitor = CollectingVisitor::new();
        tree.render(&mut visitor);
        assert_eq!(visitor.sphere_count(), 4);
        assert_eq!(visitor.edge_count(), 3);
    }

    #[test]
    fn grow_layer_stops_at_max_depth() {
        let config = GeneratorConfig::default().with_max_depth(1);
        let mut tree = SphereTree::from_config(&config);
        let root = tree.root().unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        tree.grow_layer(1, &[root], &config, &mut rng).unwrap();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn generate_without_root_fails() {
        let mut tree = SphereTree::new();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            tree.generate(&GeneratorConfig::default(), &mut rng),
            Err(GenerateError::MissingRoot)
        );
    }

    #[test]
    fn generate_rejects_invalid_config() {
        let config = GeneratorConfig::default().with_branching(0, 3);
        let mut tree = SphereTree::from_config(&config);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            tree.generate(&config, &mut rng),
            Err(GenerateError::Config(_))
        ));
    }

    #[test]
    fn generate_rejects_radius_underflow_before_growing() {
        let config = GeneratorConfig::default().with_node_radius(0.2, 1e-200);
        let mut tree = SphereTree::from_config(&config);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            tree.generate(&config, &mut rng),
            Err(GenerateError::Config(ConfigError::LayerRadius {
                layer: 4,
                radius: 0.0
            }))
        );
        assert_eq!(tree.len(), 1);
    }

    /// Tree whose single-point sampling box below the root is already taken.
    fn blocked_tree(config: &GeneratorConfig) -> (SphereTree, NodeId) {
        let mut tree = SphereTree::from_config(config);
        let root = tree.root().unwrap();
        let obstacle = Sphere::new(Point3::new(0.0, -1.0, 0.0), 0.5, GREY);
        tree.add_child(root, obstacle);
        (tree, root)
    }

    fn single_point_box() -> GeneratorConfig {
        GeneratorConfig::default()
            .with_box(30.0, 25.0, 1e-12)
            .with_max_attempts(Some(5))
    }

    #[test]
    fn abort_policy_surfaces_error_without_partial_children() {
        let config = single_point_box();
        let (mut tree, root) = blocked_tree(&config);
        let mut rng = StdRng::seed_from_u64(0);

        match tree.generate(&config, &mut rng) {
            Err(GenerateError::Placement { node, layer, source }) => {
                assert_eq!(node, root);
                assert_eq!(layer, 1);
                let PlacementError::Exhausted {
                    attempts, accepted, ..
                } = source;
                assert_eq!(attempts, 5);
                assert!(accepted.is_empty());
            }
            other => panic!("expected placement failure, got {other:?}"),
        }
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn skip_policy_continues_past_failing_node() {
        let config = single_point_box().with_exhaustion_policy(ExhaustionPolicy::SkipNode);
        let (mut tree, root) = blocked_tree(&config);
        let mut rng = StdRng::seed_from_u64(0);

        tree.generate(&config, &mut rng).unwrap();
        assert_eq!(tree.children(root).len(), 1);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn truncate_policy_keeps_partial_children() {
        // Whatever count is drawn, exactly one child fits the single-point box.
        let config = single_point_box()
            .with_max_depth(2)
            .with_exhaustion_policy(ExhaustionPolicy::Truncate);
        let mut tree = SphereTree::from_config(&config);
        let mut rng = StdRng::seed_from_u64(0);

        tree.generate(&config, &mut rng).unwrap();
        let root = tree.root().unwrap();
        assert_eq!(tree.children(root).len(), 1);
    }
}
