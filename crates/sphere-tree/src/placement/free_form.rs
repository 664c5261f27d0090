use rand::Rng;

use super::{accept_until, Candidates, PlacementContext, PlacementStrategy, RetryBudget};
use crate::error::PlacementError;
use crate::sphere::Sphere;

/// Samples every child independently and uniformly from the box below the
/// parent, giving a loose 3D cluster.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeForm;

impl PlacementStrategy for FreeForm {
    fn place<R: Rng>(
        &self,
        ctx: &PlacementContext<'_>,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Sphere>, PlacementError> {
        let bounds = ctx.sampling_box();
        let mut accepted = Candidates::with_capacity(count);
        let mut budget = RetryBudget::new(ctx.config.max_attempts);

        if !accept_until(ctx, &mut accepted, count, &mut budget, rng, |rng| {
            bounds.sample(rng)
        }) {
            return Err(budget.exhausted(count, accepted));
        }
        Ok(accepted.into_vec())
    }
}
