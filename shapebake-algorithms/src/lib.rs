//! # shapebake algorithms
//!
//! Rest-pose capture and delta baking.
//!
//! A rest pose is a world-space snapshot of a mesh's evaluated vertices. A
//! bake measures how far every vertex has moved since that snapshot, maps the
//! movement into the object's local frame and writes `basis + delta` as a new
//! shape key, turning any pose-driven deformation into a reusable blend
//! target.
//!
//! ```rust
//! use shapebake_algorithms::ExpressionBaker;
//! use shapebake_core::{DeformableMesh, Point3f, Scene, Vector3f};
//!
//! let mut scene = Scene::new();
//! let face = scene.add_object(DeformableMesh::from_vertices_and_faces(
//!     "Face",
//!     vec![
//!         Point3f::new(0.0, 0.0, 0.0),
//!         Point3f::new(1.0, 0.0, 0.0),
//!         Point3f::new(0.0, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2]],
//! ));
//!
//! let mut baker = ExpressionBaker::default();
//! baker.capture(&scene, face).unwrap();
//!
//! let mut offsets = vec![Vector3f::zeros(); 3];
//! offsets[1] = Vector3f::new(0.0, 0.0, 0.5);
//! scene.object_mut(face).unwrap().set_deformation(offsets);
//!
//! let report = baker.bake(&mut scene, face, "Smile").unwrap();
//! assert_eq!(report.displaced_vertices, 1);
//! ```

pub mod config;
pub mod delta;
pub mod snapshot;
pub mod baker;

// Re-export commonly used items
pub use config::*;
pub use delta::*;
pub use snapshot::*;
pub use baker::*;
