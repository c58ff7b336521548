//! World-to-local delta field computation
//!
//! All functions here are pure. Deltas are free vectors, so only the linear
//! (rotation and scale) block of the inverse world transform is applied to
//! them; translation never enters the result.

use itertools::izip;
use rayon::prelude::*;
use shapebake_core::{Error, Matrix3f, Point3f, Result, Transform3D, Vector3f};

/// Per-vertex world-space displacement `current - rest`
pub fn world_deltas(rest: &[Point3f], current: &[Point3f]) -> Result<Vec<Vector3f>> {
    if rest.len() != current.len() {
        return Err(Error::InvalidData(format!(
            "rest pose has {} vertices, current pose has {}",
            rest.len(),
            current.len()
        )));
    }

    Ok(current.iter().zip(rest).map(|(c, r)| c - r).collect())
}

/// Linear block of the inverse world transform
pub fn world_to_local_linear(world_transform: &Transform3D) -> Result<Matrix3f> {
    world_transform.world_to_local_linear()
}

/// Map world-space deltas into local space.
///
/// Batches of at least `parallel_threshold` vectors are split across the rayon
/// pool. Each vector is independent, so both paths give identical results.
pub fn localize_deltas(
    world_deltas: &[Vector3f],
    world_to_local: &Matrix3f,
    parallel_threshold: usize,
) -> Vec<Vector3f> {
    if world_deltas.len() >= parallel_threshold {
        world_deltas
            .par_iter()
            .map(|delta| world_to_local * delta)
            .collect()
    } else {
        world_deltas
            .iter()
            .map(|delta| world_to_local * delta)
            .collect()
    }
}

/// `base[i] + local_deltas[i]` for every vertex
pub fn compose_onto_base(base: &[Point3f], local_deltas: &[Vector3f]) -> Result<Vec<Point3f>> {
    if base.len() != local_deltas.len() {
        return Err(Error::InvalidData(format!(
            "basis has {} vertices, delta field has {}",
            base.len(),
            local_deltas.len()
        )));
    }

    Ok(base.iter().zip(local_deltas).map(|(p, d)| p + d).collect())
}

/// Displacement between two world-space snapshots, in both frames
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaField {
    pub world: Vec<Vector3f>,
    pub local: Vec<Vector3f>,
}

impl DeltaField {
    /// Compute the world delta and its local-space image under `world_transform`
    pub fn compute(
        rest: &[Point3f],
        current: &[Point3f],
        world_transform: &Transform3D,
        parallel_threshold: usize,
    ) -> Result<Self> {
        let world = world_deltas(rest, current)?;
        let to_local = world_to_local_linear(world_transform)?;
        let local = localize_deltas(&world, &to_local, parallel_threshold);
        Ok(Self { world, local })
    }

    pub fn len(&self) -> usize {
        self.local.len()
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty()
    }

    /// Largest local delta magnitude, `0.0` for an empty field
    pub fn max_magnitude(&self) -> f32 {
        self.local
            .iter()
            .map(|d| d.magnitude())
            .fold(0.0, f32::max)
    }

    /// Number of vertices whose local delta exceeds `epsilon`
    pub fn displaced_count(&self, epsilon: f32) -> usize {
        self.local.iter().filter(|d| d.magnitude() > epsilon).count()
    }

    /// Apply the local field to a basis
    pub fn apply_to(&self, base: &[Point3f]) -> Result<Vec<Point3f>> {
        compose_onto_base(base, &self.local)
    }

    /// Largest distance between `world_transform.linear * local` and the world
    /// delta; near zero whenever the field was computed under that transform
    pub fn reconstruction_error(&self, world_transform: &Transform3D) -> f32 {
        let linear = world_transform.linear_part();
        izip!(&self.world, &self.local)
            .map(|(world, local)| (linear * local - world).magnitude())
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use shapebake_core::UnitQuaternion;

    fn unit_tetra() -> Vec<Point3f> {
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
            Point3f::new(0.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn test_identity_transform_example() {
        let rest = unit_tetra();
        let mut current = rest.clone();
        current[1] = Point3f::new(1.0, 0.0, 0.5);

        let field = DeltaField::compute(&rest, &current, &Transform3D::identity(), usize::MAX).unwrap();
        assert_relative_eq!(field.world[1], Vector3f::new(0.0, 0.0, 0.5));
        assert_eq!(field.world, field.local);

        let baked = field.apply_to(&rest).unwrap();
        assert_relative_eq!(baked[0], Point3f::new(0.0, 0.0, 0.0));
        assert_relative_eq!(baked[1], Point3f::new(1.0, 0.0, 0.5));
        assert_relative_eq!(baked[2], Point3f::new(0.0, 1.0, 0.0));
        assert_relative_eq!(baked[3], Point3f::new(0.0, 0.0, 1.0));
        assert_eq!(field.displaced_count(1e-6), 1);
        assert_relative_eq!(field.max_magnitude(), 0.5);
    }

    #[test]
    fn test_translation_does_not_affect_deltas() {
        let transform = Transform3D::translation(Vector3f::new(10.0, -4.0, 2.0));
        let to_local = world_to_local_linear(&transform).unwrap();
        let deltas = vec![Vector3f::new(0.1, 0.2, 0.3)];

        let local = localize_deltas(&deltas, &to_local, usize::MAX);
        assert_relative_eq!(local[0], deltas[0], epsilon = 1e-6);
    }

    #[test]
    fn test_scale_and_rotation_are_undone() {
        let rotation = UnitQuaternion::from_axis_angle(&Vector3f::z_axis(), std::f32::consts::FRAC_PI_2);
        let transform = Transform3D::from_parts(Vector3f::zeros(), rotation, Vector3f::new(2.0, 2.0, 2.0));

        // Object-local +x maps to world +y with length 2
        let world = vec![Vector3f::new(0.0, 2.0, 0.0)];
        let local = localize_deltas(&world, &world_to_local_linear(&transform).unwrap(), usize::MAX);
        assert_relative_eq!(local[0], Vector3f::new(1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let transform = Transform3D::from_parts(
            Vector3f::new(1.0, 2.0, 3.0),
            UnitQuaternion::from_euler_angles(0.4, 0.1, -0.9),
            Vector3f::new(1.5, 0.5, 2.0),
        );
        let to_local = world_to_local_linear(&transform).unwrap();
        let deltas: Vec<Vector3f> = (0..1000)
            .map(|i| {
                let t = i as f32 * 0.01;
                Vector3f::new(t.sin(), t.cos(), t * 0.1)
            })
            .collect();

        let sequential = localize_deltas(&deltas, &to_local, usize::MAX);
        let parallel = localize_deltas(&deltas, &to_local, 0);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let rest = unit_tetra();
        assert!(matches!(world_deltas(&rest, &rest[..3]), Err(Error::InvalidData(_))));
        assert!(matches!(
            compose_onto_base(&rest, &[Vector3f::zeros()]),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_reconstruction_error_is_small() {
        let transform = Transform3D::from_parts(
            Vector3f::new(-3.0, 0.0, 7.0),
            UnitQuaternion::from_euler_angles(1.0, 0.5, 0.25),
            Vector3f::new(0.75, 1.25, 3.0),
        );
        let rest = unit_tetra();
        let current: Vec<Point3f> = rest.iter().map(|p| p + Vector3f::new(0.2, -0.1, 0.3)).collect();

        let field = DeltaField::compute(&rest, &current, &transform, usize::MAX).unwrap();
        assert!(field.reconstruction_error(&transform) < 1e-5);
    }

    #[test]
    fn test_empty_field() {
        let field = DeltaField::compute(&[], &[], &Transform3D::identity(), 0).unwrap();
        assert!(field.is_empty());
        assert_eq!(field.max_magnitude(), 0.0);
    }
}
