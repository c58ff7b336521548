//! Core data structures and traits for shapebake
//!
//! This crate provides the fundamental types shared by the baking algorithms:
//! vector aliases, world transforms, object identities, the shape-key data
//! model, an in-memory scene and the `MeshHost` trait that the bake
//! operations read from and write to.

pub mod point;
pub mod mesh;
pub mod scene;
pub mod traits;
pub mod transform;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use scene::*;
pub use traits::*;
pub use transform::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix3, Matrix4, UnitQuaternion};
