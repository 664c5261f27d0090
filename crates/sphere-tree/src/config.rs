//! Generation parameters.

use nalgebra::Point3;

use crate::error::ConfigError;

/// What [`SphereTree::grow_layer`](crate::SphereTree::grow_layer) does when a
/// node cannot be fully populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExhaustionPolicy {
    /// Stop generation and return the error. The failing node gets no children.
    #[default]
    Abort,
    /// Leave the failing node as a leaf and continue.
    SkipNode,
    /// Attach whatever was placed before the limit and continue.
    Truncate,
}

/// Parameters controlling tree generation.
///
/// Box geometry is expressed as multiples of the parent radius: candidates
/// for a parent of radius `r` centered at `p` are drawn from the cube centered
/// at `p - (0, drop_factor * r, 0)` with half-extent `spread_factor * r`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Upper bound of the uniform child count draw (NMAX).
    pub max_children: usize,
    /// Counts strictly above this use coplanar placement (PLANESIZE).
    pub plane_size: usize,
    /// Layer at which growth stops (L). The root is layer 0.
    pub max_depth: usize,
    pub root_center: Point3<f64>,
    pub root_radius: f64,
    /// Radius of spheres created at layer 1.
    pub node_radius: f64,
    /// Per-layer radius multiplier applied after layer 1.
    pub radius_falloff: f64,
    pub drop_factor: f64,
    /// Downward offset of the coplanar fill box.
    pub fill_drop_factor: f64,
    pub spread_factor: f64,
    /// Consecutive rejected candidates tolerated before giving up.
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
    pub on_exhaustion: ExhaustionPolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_children: 5,
            plane_size: 3,
            max_depth: 5,
            root_center: Point3::new(0.0, 8.0, 0.0),
            root_radius: 0.3,
            node_radius: 0.2,
            radius_falloff: 1.0,
            drop_factor: 30.0,
            fill_drop_factor: 25.0,
            spread_factor: 20.0,
            max_attempts: Some(10_000),
            on_exhaustion: ExhaustionPolicy::Abort,
        }
    }
}

impl GeneratorConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets NMAX and PLANESIZE.
    pub fn with_branching(mut self, max_children: usize, plane_size: usize) -> Self {
        self.max_children = max_children;
        self.plane_size = plane_size;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the root placement.
    pub fn with_root(mut self, center: Point3<f64>, radius: f64) -> Self {
        self.root_center = center;
        self.root_radius = radius;
        self
    }

    /// Sets the layer-1 radius and the per-layer falloff.
    pub fn with_node_radius(mut self, radius: f64, falloff: f64) -> Self {
        self.node_radius = radius;
        self.radius_falloff = falloff;
        self
    }

    /// Sets the sampling box geometry.
    pub fn with_box(mut self, drop_factor: f64, fill_drop_factor: f64, spread_factor: f64) -> Self {
        self.drop_factor = drop_factor;
        self.fill_drop_factor = fill_drop_factor;
        self.spread_factor = spread_factor;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_exhaustion_policy(mut self, policy: ExhaustionPolicy) -> Self {
        self.on_exhaustion = policy;
        self
    }

    /// Radius of spheres created at `layer` (layer 1 and deeper).
    pub fn radius_for_layer(&self, layer: usize) -> f64 {
        let steps = layer.saturating_sub(1);
        self.node_radius * self.radius_falloff.powi(steps.min(i32::MAX as usize) as i32)
    }

    /// Checks every value generation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_children == 0 {
            return Err(ConfigError::ZeroMaxChildren);
        }
        if self.plane_size < 2 {
            return Err(ConfigError::PlaneSizeTooSmall(self.plane_size));
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigError::ZeroAttempts);
        }

        let positives = [
            ("root_radius", self.root_radius),
            ("node_radius", self.node_radius),
            ("radius_falloff", self.radius_falloff),
            ("spread_factor", self.spread_factor),
        ];
        for (name, value) in positives {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        for (name, value) in [
            ("drop_factor", self.drop_factor),
            ("fill_drop_factor", self.fill_drop_factor),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }

        // Radius is monotonic in the layer, so the first and last grown
        // layers bound every other one.
        if self.max_depth > 1 {
            for layer in [1, self.max_depth - 1] {
                let radius = self.radius_for_layer(layer);
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(ConfigError::LayerRadius { layer, radius });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GeneratorConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.max_children, 5);
        assert_eq!(config.plane_size, 3);
        assert_eq!(config.root_center, Point3::new(0.0, 8.0, 0.0));
    }

    #[test]
    fn radius_shrinks_with_falloff() {
        let config = GeneratorConfig::default().with_node_radius(0.2, 0.5);
        assert_eq!(config.radius_for_layer(1), 0.2);
        assert_eq!(config.radius_for_layer(2), 0.1);
        assert_eq!(config.radius_for_layer(3), 0.05);
    }

    #[test]
    fn constant_radius_by_default() {
        let config = GeneratorConfig::default();
        assert_eq!(config.radius_for_layer(1), config.radius_for_layer(4));
    }

    #[test]
    fn rejects_invalid_values() {
        let zero_children = GeneratorConfig::default().with_branching(0, 3);
        assert_eq!(zero_children.validate(), Err(ConfigError::ZeroMaxChildren));

        let tiny_plane = GeneratorConfig::default().with_branching(5, 1);
        assert_eq!(tiny_plane.validate(), Err(ConfigError::PlaneSizeTooSmall(1)));

        let no_attempts = GeneratorConfig::default().with_max_attempts(Some(0));
        assert_eq!(no_attempts.validate(), Err(ConfigError::ZeroAttempts));

        let bad_root = GeneratorConfig::default().with_root(Point3::origin(), -1.0);
        assert_eq!(
            bad_root.validate(),
            Err(ConfigError::NonPositive {
                name: "root_radius",
                value: -1.0
            })
        );
    }

    #[test]
    fn rejects_falloff_that_underflows_deep_layers() {
        let config = GeneratorConfig::default().with_node_radius(0.2, 1e-200);
        assert_eq!(
            config.validate(),
            Err(ConfigError::LayerRadius {
                layer: 4,
                radius: 0.0
            })
        );
    }

    #[test]
    fn rejects_falloff_that_overflows_deep_layers() {
        let config = GeneratorConfig::default()
            .with_node_radius(0.2, 1e200)
            .with_max_depth(4);
        assert_eq!(
            config.validate(),
            Err(ConfigError::LayerRadius {
                layer: 3,
                radius: f64::INFINITY
            })
        );
    }

    #[test]
    fn falloff_is_unchecked_when_no_layer_grows() {
        let config = GeneratorConfig::default()
            .with_node_radius(0.2, 1e-200)
            .with_max_depth(1);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn unbounded_attempts_are_valid() {
        let config = GeneratorConfig::default().with_max_attempts(None);
        assert!(config.validate().is_ok());
    }
}
