//! Macroquad renderer for generated sphere trees.

use macroquad::prelude::*;
use nalgebra::Point3;
use sphere_tree::{Rgb, SphereTree, SphereVisitor};

pub mod cli;
pub use cli::Cli;

/// Color of the segments joining parents to children.
pub const EDGE_COLOR: Color = Color::new(220.0 / 255.0, 220.0 / 255.0, 220.0 / 255.0, 1.0);

/// Converts a palette color to a macroquad color.
pub fn to_color(rgb: Rgb) -> Color {
    Color::from_rgba(rgb.r, rgb.g, rgb.b, 255)
}

/// Converts a tree point to a macroquad vector.
pub fn to_vec3(point: Point3<f64>) -> Vec3 {
    vec3(point.x as f32, point.y as f32, point.z as f32)
}

/// Visitor that draws spheres and edges with macroquad's 3D primitives.
pub struct RenderVisitor;

impl SphereVisitor for RenderVisitor {
    fn render_sphere(&mut self, center: Point3<f64>, color: Rgb, radius: f64) {
        draw_sphere(to_vec3(center), radius as f32, None, to_color(color));
    }

    fn render_edge(&mut self, from: Point3<f64>, to: Point3<f64>) {
        draw_line_3d(to_vec3(from), to_vec3(to), EDGE_COLOR);
    }
}

/// Axis-aligned bounds of every sphere in `tree`, radii included.
pub fn tree_bounds(tree: &SphereTree) -> Option<(Vec3, Vec3)> {
    tree.iter().fold(None, |bounds, (_, node)| {
        let sphere = node.sphere();
        let center = to_vec3(sphere.center());
        let reach = Vec3::splat(sphere.radius() as f32);
        let (lo, hi) = (center - reach, center + reach);
        Some(match bounds {
            None => (lo, hi),
            Some((min, max)) => (min.min(lo), max.max(hi)),
        })
    })
}

/// Distance from the target, in multiples of the bounds diagonal.
const FRAME_MARGIN: f32 = 1.5;
/// Distance factor applied per scroll notch.
const ZOOM_STEP: f32 = 0.9;

/// Camera orbiting the middle of a generated tree.
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitCamera {
    /// Aims at the center of the tree's bounds from far enough away that the
    /// whole tree is in view.
    pub fn framing(tree: &SphereTree) -> Self {
        let (target, extent) = match tree_bounds(tree) {
            Some((min, max)) => ((min + max) * 0.5, (max - min).length().max(1.0)),
            None => (Vec3::ZERO, 1.0),
        };
        Self {
            target,
            distance: extent * FRAME_MARGIN,
            yaw: 0.4,
            pitch: 0.3,
            min_distance: extent * 0.05,
            max_distance: extent * 4.0,
        }
    }

    /// Frames a freshly generated tree, keeping the current viewing angle.
    pub fn reframe(&mut self, tree: &SphereTree) {
        *self = Self {
            yaw: self.yaw,
            pitch: self.pitch,
            ..Self::framing(tree)
        };
    }

    /// Left drag rotates, the scroll wheel zooms.
    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch = (self.pitch - delta.y * 2.0).clamp(-1.5, 1.5);
        }

        let scroll = mouse_wheel().1;
        if scroll != 0.0 {
            self.distance *= ZOOM_STEP.powf(scroll.signum());
            self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        }
    }

    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + vec3(x, y, z)
    }

    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: vec3(0.0, 1.0, 0.0),
            target: self.target,
            ..Default::default()
        }
    }
}
