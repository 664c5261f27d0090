use nalgebra::Point3;
use rand::Rng;
use tracing::trace;

use super::{
    accept_until, Candidates, FreeForm, PlacementContext, PlacementStrategy, RetryBudget,
};
use crate::error::PlacementError;
use crate::geometry::{plane_coefficients, Axis, PlaneCoefficients};
use crate::sphere::Sphere;

/// Number of seed spheres that define the plane.
pub const SEED_COUNT: usize = 3;

/// Lays children out on one plane, giving a flat disk of siblings.
///
/// Three seed spheres are sampled from the free-form box. If their centers
/// are collinear the whole triple is discarded and sampled again. The
/// remaining children are drawn from the fill box on two random axes and
/// the plane equation is solved for the third.
#[derive(Debug, Clone, Copy, Default)]
pub struct Coplanar;

impl PlacementStrategy for Coplanar {
    fn place<R: Rng>(
        &self,
        ctx: &PlacementContext<'_>,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Sphere>, PlacementError> {
        // Fewer than three points are always coplanar.
        if count < SEED_COUNT {
            return FreeForm.place(ctx, count, rng);
        }

        let seed_box = ctx.sampling_box();
        let mut budget = RetryBudget::new(ctx.config.max_attempts);
        let (mut accepted, plane, axis) =
            seed_plane(ctx, count, &mut budget, rng, |rng| seed_box.sample(rng))?;

        let fill_box = ctx.fill_box();
        if !accept_until(ctx, &mut accepted, count, &mut budget, rng, |rng| {
            fill_box.sample_on_plane(&plane, axis, rng)
        }) {
            return Err(budget.exhausted(count, accepted));
        }
        Ok(accepted.into_vec())
    }
}

/// Accepts seed triples from `sample` until one spans a plane.
///
/// A collinear triple is dropped as a whole and the next one starts from
/// scratch. Degenerate triples count against their own retry limit, apart
/// from rejected candidates.
fn seed_plane<R: Rng>(
    ctx: &PlacementContext<'_>,
    count: usize,
    budget: &mut RetryBudget,
    rng: &mut R,
    mut sample: impl FnMut(&mut R) -> Point3<f64>,
) -> Result<(Candidates, PlaneCoefficients, Axis), PlacementError> {
    let mut reseeds = RetryBudget::new(ctx.config.max_attempts);
    loop {
        let mut seeds = Candidates::with_capacity(count);
        if !accept_until(ctx, &mut seeds, SEED_COUNT, budget, rng, &mut sample) {
            return Err(budget.exhausted(count, seeds));
        }

        let [a, b, c] = [0, 1, 2].map(|i| seeds.as_slice()[i].center());
        let plane = plane_coefficients(a, b, c);
        if let Some(axis) = plane.solve_axis() {
            return Ok((seeds, plane, axis));
        }

        trace!(layer = ctx.layer, "collinear seed triple, resampling");
        if !reseeds.reject() {
            return Err(reseeds.exhausted(count, seeds));
        }
    }
}
