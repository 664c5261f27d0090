//! Recoverable generation errors.
//!
//! Precondition violations (non-positive radius, empty palette) panic at
//! construction instead of appearing here.

use thiserror::Error;

use crate::node::NodeId;
use crate::sphere::Sphere;

/// A placement strategy ran out of attempts before placing every sphere.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    #[error(
        "placement exhausted after {attempts} rejected candidates: \
         {} of {requested} spheres placed",
        .accepted.len()
    )]
    Exhausted {
        /// Number of spheres the strategy was asked to place.
        requested: usize,
        /// Consecutive rejections that hit the retry limit.
        attempts: u32,
        /// Spheres accepted before the limit was hit, in acceptance order.
        accepted: Vec<Sphere>,
    },
}

/// An invalid [`GeneratorConfig`](crate::GeneratorConfig) value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("max_children must be at least 1")]
    ZeroMaxChildren,

    #[error("plane_size must be at least 2 so that coplanar groups hold three seeds, got {0}")]
    PlaneSizeTooSmall(usize),

    #[error("{name} must be a positive finite number, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("max_attempts must be at least 1 when set")]
    ZeroAttempts,

    #[error("radius at layer {layer} must be a positive finite number, got {radius}")]
    LayerRadius { layer: usize, radius: f64 },
}

/// Failure of a whole generation run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    #[error("tree has no root to grow from")]
    MissingRoot,

    #[error("could not populate node {node} at layer {layer}")]
    Placement {
        node: NodeId,
        layer: usize,
        #[source]
        source: PlacementError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Rgb;
    use nalgebra::Point3;

    #[test]
    fn exhausted_message_reports_progress() {
        let placed = Sphere::new(Point3::origin(), 1.0, Rgb::new(0, 0, 0));
        let err = PlacementError::Exhausted {
            requested: 4,
            attempts: 100,
            accepted: vec![placed],
        };
        assert_eq!(
            err.to_string(),
            "placement exhausted after 100 rejected candidates: 1 of 4 spheres placed"
        );
    }

    #[test]
    fn config_error_converts_into_generate_error() {
        let err: GenerateError = ConfigError::ZeroMaxChildren.into();
        assert_eq!(err.to_string(), "max_children must be at least 1");
    }
}
