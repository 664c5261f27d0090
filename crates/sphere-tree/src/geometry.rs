//! Point and plane primitives used by sphere placement.
//!
//! Plane coefficients are kept in the implicit form `a*x + b*y + c*z + d = 0`
//! rather than as a unit normal, because coplanar placement solves that
//! equation directly for one coordinate.

use nalgebra::{Point3, Vector3};

/// Euclidean distance between two points.
#[inline]
pub fn distance(p: Point3<f64>, q: Point3<f64>) -> f64 {
    nalgebra::distance(&p, &q)
}

/// Returns `true` if two spheres overlap. Touching spheres count as colliding.
#[inline]
pub fn collide(
    a_center: Point3<f64>,
    a_radius: f64,
    b_center: Point3<f64>,
    b_radius: f64,
) -> bool {
    distance(a_center, b_center) <= a_radius + b_radius
}

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Index of this axis into a point's coordinates.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Coefficients of the plane `a*x + b*y + c*z + d = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

/// Computes the plane through three points.
///
/// `(a, b, c)` is the cross product `(B - A) × (C - A)` and `d` follows from
/// substituting `A` into the plane equation. Collinear or coincident points
/// yield all-zero `(a, b, c)`; see [`PlaneCoefficients::is_degenerate`].
pub fn plane_coefficients(
    a: Point3<f64>,
    b: Point3<f64>,
    c: Point3<f64>,
) -> PlaneCoefficients {
    let normal = (b - a).cross(&(c - a));
    PlaneCoefficients {
        a: normal.x,
        b: normal.y,
        c: normal.z,
        d: -normal.dot(&a.coords),
    }
}

impl PlaneCoefficients {
    /// Returns the (unnormalized) normal vector `(a, b, c)`.
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        Vector3::new(self.a, self.b, self.c)
    }

    /// Returns `true` if no plane is defined, i.e. `a`, `b` and `c` are all
    /// exactly zero.
    ///
    /// Exact comparison is deliberate: any nonzero coefficient still admits
    /// solving the plane equation for one coordinate.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.a == 0.0 && self.b == 0.0 && self.c == 0.0
    }

    /// Chooses the coordinate to solve for: `x` if `a != 0`, else `z` if
    /// `c != 0`, else `y` if `b != 0`.
    ///
    /// Returns `None` exactly when the plane is degenerate.
    pub fn solve_axis(&self) -> Option<Axis> {
        if self.a != 0.0 {
            Some(Axis::X)
        } else if self.c != 0.0 {
            Some(Axis::Z)
        } else if self.b != 0.0 {
            Some(Axis::Y)
        } else {
            None
        }
    }

    /// Replaces the `axis` coordinate of `point` with the value that puts the
    /// point on the plane, keeping the other two coordinates.
    ///
    /// The coefficient belonging to `axis` must be nonzero; otherwise the
    /// result is not finite.
    pub fn solve(&self, axis: Axis, point: Point3<f64>) -> Point3<f64> {
        let (x, y, z) = (point.x, point.y, point.z);
        match axis {
            Axis::X => Point3::new((-self.d - self.b * y - self.c * z) / self.a, y, z),
            Axis::Y => Point3::new(x, (-self.d - self.a * x - self.c * z) / self.b, z),
            Axis::Z => Point3::new(x, y, (-self.d - self.a * x - self.b * y) / self.c),
        }
    }

    /// Evaluates `a*x + b*y + c*z + d` at `point`.
    #[inline]
    pub fn evaluate(&self, point: Point3<f64>) -> f64 {
        self.normal().dot(&point.coords) + self.d
    }

    /// Signed distance from `point` to the plane.
    ///
    /// Not finite for a degenerate plane.
    #[inline]
    pub fn distance_to(&self, point: Point3<f64>) -> f64 {
        self.evaluate(point) / self.normal().norm()
    }
}
