//! Visitor pattern for handing a finished tree to a renderer.
//!
//! The tree knows nothing about how spheres and edges end up on screen; it
//! only issues the two draw requests below in traversal order.

use nalgebra::Point3;

use crate::palette::Rgb;

/// Receives draw requests during [`SphereTree::visit`](crate::SphereTree::visit).
pub trait SphereVisitor {
    /// Draw one sphere.
    fn render_sphere(&mut self, center: Point3<f64>, color: Rgb, radius: f64);

    /// Draw the segment connecting a parent center to a child center.
    fn render_edge(&mut self, from: Point3<f64>, to: Point3<f64>);
}

/// A single recorded draw request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Sphere {
        center: Point3<f64>,
        color: Rgb,
        radius: f64,
    },
    Edge {
        from: Point3<f64>,
        to: Point3<f64>,
    },
}

/// A visitor that records every request in order.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    commands: Vec<DrawCommand>,
}

impl CollectingVisitor {
    /// Creates a new empty collecting visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded commands.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    pub fn sphere_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sphere { .. }))
            .count()
    }

    pub fn edge_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Edge { .. }))
            .count()
    }
}

impl SphereVisitor for CollectingVisitor {
    fn render_sphere(&mut self, center: Point3<f64>, color: Rgb, radius: f64) {
        self.commands.push(DrawCommand::Sphere {
            center,
            color,
            radius,
        });
    }

    fn render_edge(&mut self, from: Point3<f64>, to: Point3<f64>) {
        self.commands.push(DrawCommand::Edge { from, to });
    }
}

/// A visitor that forwards every request to a closure.
pub struct FnVisitor<F>
where
    F: FnMut(DrawCommand),
{
    func: F,
}

impl<F> FnVisitor<F>
where
    F: FnMut(DrawCommand),
{
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> SphereVisitor for FnVisitor<F>
where
    F: FnMut(DrawCommand),
{
    fn render_sphere(&mut self, center: Point3<f64>, color: Rgb, radius: f64) {
        (self.func)(DrawCommand::Sphere {
            center,
            color,
            radius,
        });
    }

    fn render_edge(&mut self, from: Point3<f64>, to: Point3<f64>) {
        (self.func)(DrawCommand::Edge { from, to });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    #[test]
    fn collecting_visitor_empty() {
        let visitor = CollectingVisitor::new();
        assert!(visitor.commands().is_empty());
    }

    #[test]
    fn collecting_visitor_records_in_order() {
        let mut visitor = CollectingVisitor::new();
        let a = Point3::new(0.0, 1.0, 0.0);
        let b = Point3::new(0.0, -1.0, 0.0);

        visitor.render_sphere(b, RED, 0.5);
        visitor.render_edge(a, b);

        assert_eq!(visitor.sphere_count(), 1);
        assert_eq!(visitor.edge_count(), 1);
        let commands = visitor.into_commands();
        assert_eq!(
            commands[0],
            DrawCommand::Sphere {
                center: b,
                color: RED,
                radius: 0.5
            }
        );
        assert_eq!(commands[1], DrawCommand::Edge { from: a, to: b });
    }

    #[test]
    fn fn_visitor_calls_closure() {
        let mut edges = 0;
        let mut spheres = 0;
        {
            let mut visitor = FnVisitor::new(|command| match command {
                DrawCommand::Sphere { .. } => spheres += 1,
                DrawCommand::Edge { .. } => edges += 1,
            });
            visitor.render_sphere(Point3::origin(), RED, 1.0);
            visitor.render_sphere(Point3::origin(), RED, 1.0);
            visitor.render_edge(Point3::origin(), Point3::new(1.0, 0.0, 0.0));
        }
        assert_eq!(spheres, 2);
        assert_eq!(edges, 1);
    }
}
