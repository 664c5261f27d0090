//! Procedural generation of bounded-depth trees of non-overlapping spheres.
//!
//! Starting from a root sphere, every node of the previous layer receives a
//! random number of children placed below it, until a fixed depth is
//! reached. No sphere ever overlaps any other sphere in the tree.
//!
//! # Example
//!
//! ```ignore
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use sphere_tree::{CollectingVisitor, GeneratorConfig, SphereTree};
//!
//! let config = GeneratorConfig::default();
//! let mut tree = SphereTree::from_config(&config);
//! tree.generate(&config, &mut StdRng::seed_from_u64(7))?;
//!
//! // Draw requests arrive root first, then siblings before descendants
//! let mut visitor = CollectingVisitor::new();
//! tree.render(&mut visitor);
//! ```
//!
//! # Architecture
//!
//! - [`SphereTree`]: arena of [`Node`]s, the collision queries and the
//!   layer-by-layer growth
//! - [`placement`]: the [`FreeForm`] and [`Coplanar`] strategies behind
//!   [`PlacementStrategy`]
//! - [`geometry`]: distances, collision tests and plane fitting
//! - [`SphereVisitor`]: boundary to whatever draws the result

mod config;
mod error;
pub mod geometry;
mod index;
mod node;
mod palette;
pub mod placement;
mod sphere;
mod tree;
mod visitor;

pub use config::{ExhaustionPolicy, GeneratorConfig};
pub use error::{ConfigError, GenerateError, PlacementError};
pub use geometry::{plane_coefficients, Axis, PlaneCoefficients};
pub use node::{Node, NodeId};
pub use palette::{Palette, Rgb, DEFAULT_COLORS};
pub use placement::{
    generate_children_for, place_children, Coplanar, FreeForm, PlacementContext,
    PlacementStrategy, SamplingBox, StrategyKind,
};
pub use sphere::Sphere;
pub use tree::SphereTree;
pub use visitor::{CollectingVisitor, DrawCommand, FnVisitor, SphereVisitor};
