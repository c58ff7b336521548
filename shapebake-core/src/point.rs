//! Point and vector types and related functionality

use nalgebra::{Matrix3, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A 3x3 matrix with floating point components
pub type Matrix3f = Matrix3<f32>;

/// Stable opaque identity of a mesh-bearing object.
///
/// Identities are handed out by the host and never reused while the host is
/// alive. Object names are display-only and are never used as keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Build a point from a `[x, y, z]` array
pub fn point_from_array(xyz: [f32; 3]) -> Point3f {
    Point3f::new(xyz[0], xyz[1], xyz[2])
}

/// Build a vector from a `[x, y, z]` array
pub fn vector_from_array(xyz: [f32; 3]) -> Vector3f {
    Vector3f::new(xyz[0], xyz[1], xyz[2])
}
