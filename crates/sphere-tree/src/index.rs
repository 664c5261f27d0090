//! R-tree over placed sphere centers.
//!
//! Lets the global collision scan visit only spheres whose centers are close
//! enough to possibly touch a candidate, instead of every node in the tree.

use nalgebra::Point3;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::node::NodeId;

/// A sphere center in the index with its node id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CenterPoint {
    id: NodeId,
    center: [f64; 3],
}

impl RTreeObject for CenterPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.center)
    }
}

impl PointDistance for CenterPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.center[0] - point[0];
        let dy = self.center[1] - point[1];
        let dz = self.center[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }

    fn contains_point(&self, point: &[f64; 3]) -> bool {
        self.center == *point
    }
}

/// Spatial index of sphere centers, tracking the largest radius inserted.
#[derive(Debug, Clone)]
pub(crate) struct SpatialIndex {
    tree: RTree<CenterPoint>,
    max_radius: f64,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialIndex {
    pub(crate) fn new() -> Self {
        Self {
            tree: RTree::new(),
            max_radius: 0.0,
        }
    }

    pub(crate) fn insert(&mut self, id: NodeId, center: Point3<f64>, radius: f64) {
        self.tree.insert(CenterPoint {
            id,
            center: [center.x, center.y, center.z],
        });
        self.max_radius = self.max_radius.max(radius);
    }

    pub(crate) fn clear(&mut self) {
        self.tree = RTree::new();
        self.max_radius = 0.0;
    }

    /// Ids of every indexed sphere that could touch a sphere of `radius` at
    /// `center`. May include spheres that do not actually collide.
    pub(crate) fn near(
        &self,
        center: Point3<f64>,
        radius: f64,
    ) -> impl Iterator<Item = NodeId> + '_ {
        // Slightly widened so that exact touching survives rounding in distance_2.
        let reach = (radius + self.max_radius) * (1.0 + 1e-9) + 1e-12;
        self.tree
            .locate_within_distance([center.x, center.y, center.z], reach * reach)
            .map(|point| point.id)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.tree.size()
    }
}
