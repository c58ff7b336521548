//! 3D transformation utilities

use crate::error::{Error, Result};
use crate::point::{Matrix3f, Point3f, Vector3f};
use nalgebra::{Isometry3, Matrix4, UnitQuaternion};
use serde::{Deserialize, Serialize};

/// An object-to-world transformation stored as a homogeneous 4x4 matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub matrix: Matrix4<f32>,
}

impl Transform3D {
    /// Create an identity transformation
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a translation transformation
    pub fn translation(translation: Vector3f) -> Self {
        Self {
            matrix: Matrix4::new_translation(&translation),
        }
    }

    /// Create a scaling transformation
    pub fn scaling(scale: Vector3f) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&scale),
        }
    }

    /// Create a uniform scaling transformation
    pub fn uniform_scaling(scale: f32) -> Self {
        Self {
            matrix: Matrix4::new_scaling(scale),
        }
    }

    /// Compose translation, rotation and scale in the usual T * R * S order
    pub fn from_parts(
        translation: Vector3f,
        rotation: UnitQuaternion<f32>,
        scale: Vector3f,
    ) -> Self {
        let isometry = Isometry3::from_parts(translation.into(), rotation);
        Self {
            matrix: isometry.to_homogeneous() * Matrix4::new_nonuniform_scaling(&scale),
        }
    }

    /// Apply the transformation to a point
    pub fn transform_point(&self, point: &Point3f) -> Point3f {
        let homogeneous = self.matrix * point.to_homogeneous();
        Point3f::from_homogeneous(homogeneous).unwrap_or(*point)
    }

    /// Upper-left 3x3 block: rotation and scale without translation
    pub fn linear_part(&self) -> Matrix3f {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Get the inverse transformation
    pub fn inverse(self) -> Option<Self> {
        self.matrix.try_inverse().map(|inv_matrix| Self {
            matrix: inv_matrix,
        })
    }

    /// Linear block of the inverse, mapping world-space vectors to local space.
    ///
    /// Deltas are free vectors, so the inverse translation is dropped.
    pub fn world_to_local_linear(&self) -> Result<Matrix3f> {
        self.inverse()
            .map(|inverse| inverse.linear_part())
            .ok_or(Error::SingularTransform)
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_part_drops_translation() {
        let transform = Transform3D::translation(Vector3f::new(5.0, -2.0, 1.0));
        assert_relative_eq!(transform.linear_part(), Matrix3f::identity());
    }

    #[test]
    fn test_from_parts_applies_scale_before_rotation() {
        let rotation = UnitQuaternion::from_axis_angle(&Vector3f::z_axis(), std::f32::consts::FRAC_PI_2);
        let transform = Transform3D::from_parts(
            Vector3f::new(0.0, 0.0, 10.0),
            rotation,
            Vector3f::new(2.0, 1.0, 1.0),
        );

        // x is scaled to 2, then rotated onto +y, then lifted by the translation
        let p = transform.transform_point(&Point3f::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3f::new(0.0, 2.0, 10.0), epsilon = 1e-5);
    }

    #[test]
    fn test_world_to_local_linear_inverts_rotation_and_scale() {
        let rotation = UnitQuaternion::from_euler_angles(0.3, -0.7, 1.1);
        let transform = Transform3D::from_parts(
            Vector3f::new(3.0, 4.0, 5.0),
            rotation,
            Vector3f::new(0.5, 2.0, 3.0),
        );

        let to_local = transform.world_to_local_linear().unwrap();
        let product = transform.linear_part() * to_local;
        assert_relative_eq!(product, Matrix3f::identity(), epsilon = 1e-5);
    }

    #[test]
    fn test_singular_transform_is_rejected() {
        let flat = Transform3D::scaling(Vector3f::new(1.0, 1.0, 0.0));
        assert!(matches!(flat.world_to_local_linear(), Err(Error::SingularTransform)));
    }
}
