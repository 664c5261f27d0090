//! Child placement strategies.
//!
//! Populating a node draws a child count uniformly from `1..=max_children`
//! and hands it to one of two strategies:
//!
//! - [`FreeForm`]: counts up to `plane_size`, sampled independently in a box
//!   below the parent.
//! - [`Coplanar`]: larger counts, laid out on a plane fitted through three
//!   randomly sampled seed spheres.
//!
//! Every accepted candidate is screened against the whole tree and against
//! the siblings accepted before it, so a strategy only ever returns spheres
//! that can be attached as-is.

mod coplanar;
mod free_form;

pub use coplanar::Coplanar;
pub use free_form::FreeForm;

use nalgebra::{Point3, Vector3};
use rand::Rng;
use tracing::{debug, trace};

use crate::config::GeneratorConfig;
use crate::error::PlacementError;
use crate::geometry::{Axis, PlaneCoefficients};
use crate::node::NodeId;
use crate::palette::Rgb;
use crate::sphere::Sphere;
use crate::tree::SphereTree;

/// Strategy for placing the children of one node.
pub trait PlacementStrategy {
    /// Produces exactly `count` spheres that collide neither with each other
    /// nor with anything already in `ctx.tree`.
    ///
    /// Returns [`PlacementError::Exhausted`] if the retry limit is hit first.
    fn place<R: Rng>(
        &self,
        ctx: &PlacementContext<'_>,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Sphere>, PlacementError>;
}

/// Which strategy a child count selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    FreeForm,
    Coplanar,
}

impl StrategyKind {
    /// Coplanar placement is used when `count` exceeds `plane_size`.
    pub fn for_count(count: usize, plane_size: usize) -> Self {
        if count > plane_size {
            StrategyKind::Coplanar
        } else {
            StrategyKind::FreeForm
        }
    }
}

/// Everything a strategy needs to know about the node being populated.
#[derive(Debug, Clone, Copy)]
pub struct PlacementContext<'a> {
    pub tree: &'a SphereTree,
    pub parent: Sphere,
    /// Layer the new children belong to.
    pub layer: usize,
    pub config: &'a GeneratorConfig,
}

impl<'a> PlacementContext<'a> {
    /// Creates a context for populating `parent` at `layer`.
    ///
    /// # Panics
    /// Panics if `parent` does not belong to `tree`.
    pub fn new(
        tree: &'a SphereTree,
        parent: NodeId,
        layer: usize,
        config: &'a GeneratorConfig,
    ) -> Self {
        Self {
            tree,
            parent: *tree.node(parent).sphere(),
            layer,
            config,
        }
    }

    /// Radius given to every child created at this layer.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.config.radius_for_layer(self.layer)
    }

    /// Color given to every child created at this layer.
    #[inline]
    pub fn color(&self) -> Rgb {
        self.tree.palette().color_for_layer(self.layer)
    }

    /// Builds a child sphere at `center`.
    #[inline]
    pub fn candidate_at(&self, center: Point3<f64>) -> Sphere {
        Sphere::new(center, self.radius(), self.color())
    }

    /// Box used by free-form placement and coplanar seeding.
    pub fn sampling_box(&self) -> SamplingBox {
        SamplingBox::below(&self.parent, self.config.drop_factor, self.config.spread_factor)
    }

    /// Box used for the coplanar fill phase.
    pub fn fill_box(&self) -> SamplingBox {
        SamplingBox::below(
            &self.parent,
            self.config.fill_drop_factor,
            self.config.spread_factor,
        )
    }
}

/// An axis-aligned cube that candidate centers are drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingBox {
    center: Point3<f64>,
    half_extent: f64,
}

impl SamplingBox {
    pub fn new(center: Point3<f64>, half_extent: f64) -> Self {
        Self {
            center,
            half_extent,
        }
    }

    /// Cube centered `drop_factor * r` below the parent, with half-extent
    /// `spread_factor * r`, where `r` is the parent radius.
    pub fn below(parent: &Sphere, drop_factor: f64, spread_factor: f64) -> Self {
        let r = parent.radius();
        Self::new(
            parent.center() - Vector3::y() * (drop_factor * r),
            spread_factor * r,
        )
    }

    #[inline]
    pub fn center(&self) -> Point3<f64> {
        self.center
    }

    #[inline]
    pub fn half_extent(&self) -> f64 {
        self.half_extent
    }

    /// Returns `true` if `point` lies inside the box (boundary included).
    pub fn contains(&self, point: Point3<f64>) -> bool {
        (point - self.center)
            .iter()
            .all(|offset| offset.abs() <= self.half_extent)
    }

    /// Draws a point uniformly from the box, one axis at a time in x, y, z order.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Point3<f64> {
        Point3::new(
            self.sample_axis(Axis::X, rng),
            self.sample_axis(Axis::Y, rng),
            self.sample_axis(Axis::Z, rng),
        )
    }

    /// Draws the two coordinates other than `axis` from the box and solves
    /// `plane` for the remaining one.
    pub fn sample_on_plane<R: Rng>(
        &self,
        plane: &PlaneCoefficients,
        axis: Axis,
        rng: &mut R,
    ) -> Point3<f64> {
        let mut point = self.center;
        for free in [Axis::X, Axis::Y, Axis::Z] {
            if free != axis {
                point[free.index()] = self.sample_axis(free, rng);
            }
        }
        plane.solve(axis, point)
    }

    fn sample_axis<R: Rng>(&self, axis: Axis, rng: &mut R) -> f64 {
        let mid = self.center[axis.index()];
        rng.random_range((mid - self.half_extent)..=(mid + self.half_extent))
    }
}

/// Counts consecutive rejected candidates against an optional limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryBudget {
    limit: Option<u32>,
    rejected: u32,
}

impl RetryBudget {
    pub(crate) fn new(limit: Option<u32>) -> Self {
        Self { limit, rejected: 0 }
    }

    /// Records a rejection. Returns `false` once the limit is reached.
    pub(crate) fn reject(&mut self) -> bool {
        self.rejected = self.rejected.saturating_add(1);
        self.limit.is_none_or(|limit| self.rejected < limit)
    }

    pub(crate) fn reset(&mut self) {
        self.rejected = 0;
    }

    pub(crate) fn exhausted(&self, requested: usize, accepted: Candidates) -> PlacementError {
        PlacementError::Exhausted {
            requested,
            attempts: self.rejected,
            accepted: accepted.into_vec(),
        }
    }
}

/// Spheres accepted so far for the node being populated.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Candidates {
    spheres: Vec<Sphere>,
}

impl Candidates {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            spheres: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.spheres.len()
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[Sphere] {
        &self.spheres
    }

    /// A candidate is admitted if it collides with no accepted sibling and
    /// with no sphere anywhere in `tree`.
    pub(crate) fn admits(&self, tree: &SphereTree, candidate: &Sphere) -> bool {
        !self.spheres.iter().any(|s| s.collides_with(candidate))
            && !tree.collides_with_any(candidate)
    }

    pub(crate) fn push(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    pub(crate) fn into_vec(self) -> Vec<Sphere> {
        self.spheres
    }
}

/// Samples with `sample` until `accepted` holds `target` spheres.
///
/// Candidates with non-finite centers are rejected like colliding ones.
/// Returns `false` if `budget` runs out first.
pub(crate) fn accept_until<R: Rng>(
    ctx: &PlacementContext<'_>,
    accepted: &mut Candidates,
    target: usize,
    budget: &mut RetryBudget,
    rng: &mut R,
    mut sample: impl FnMut(&mut R) -> Point3<f64>,
) -> bool {
    while accepted.len() < target {
        let center = sample(rng);
        let finite = center.iter().all(|c| c.is_finite());
        if finite {
            let candidate = ctx.candidate_at(center);
            if accepted.admits(ctx.tree, &candidate) {
                accepted.push(candidate);
                budget.reset();
                continue;
            }
        }

        trace!(
            layer = ctx.layer,
            x = center.x,
            y = center.y,
            z = center.z,
            "candidate rejected"
        );
        if !budget.reject() {
            return false;
        }
    }
    true
}

/// Places exactly `count` children for `ctx.parent` with the strategy the
/// count selects.
pub fn place_children<R: Rng>(
    ctx: &PlacementContext<'_>,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Sphere>, PlacementError> {
    match StrategyKind::for_count(count, ctx.config.plane_size) {
        StrategyKind::Coplanar => Coplanar.place(ctx, count, rng),
        StrategyKind::FreeForm => FreeForm.place(ctx, count, rng),
    }
}

/// Draws a child count for `parent`, places that many children and attaches
/// them.
///
/// Returns the ids of the new children in placement order. On failure no
/// child is attached.
pub fn generate_children_for<R: Rng>(
    tree: &mut SphereTree,
    parent: NodeId,
    layer: usize,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Vec<NodeId>, PlacementError> {
    let count = rng.random_range(1..=config.max_children);
    debug!(
        %parent,
        layer,
        count,
        strategy = ?StrategyKind::for_count(count, config.plane_size),
        "populating node"
    );

    let spheres = {
        let ctx = PlacementContext::new(tree, parent, layer, config);
        place_children(&ctx, count, rng)?
    };

    Ok(spheres
        .into_iter()
        .map(|sphere| tree.add_child(parent, sphere))
        .collect())
}
