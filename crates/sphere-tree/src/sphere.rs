//! The sphere value stored at every tree node.

use nalgebra::Point3;

use crate::geometry::collide;
use crate::palette::Rgb;

/// A colored sphere in 3D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Point3<f64>,
    radius: f64,
    color: Rgb,
}

impl Sphere {
    /// Creates a new sphere.
    ///
    /// # Panics
    /// Panics if `radius` is not a positive finite number.
    pub fn new(center: Point3<f64>, radius: f64, color: Rgb) -> Self {
        assert!(
            radius.is_finite() && radius > 0.0,
            "Sphere radius must be positive, got {radius}"
        );
        Self {
            center,
            radius,
            color,
        }
    }

    #[inline]
    pub fn center(&self) -> Point3<f64> {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Returns `true` if this sphere overlaps or touches `other`.
    #[inline]
    pub fn collides_with(&self, other: &Sphere) -> bool {
        collide(self.center, self.radius, other.center, other.radius)
    }
}
