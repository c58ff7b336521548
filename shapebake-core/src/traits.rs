//! Core traits for shapebake

use crate::error::Result;
use crate::mesh::ShapeKeyHandle;
use crate::point::{ObjectId, Point3f};
use crate::transform::Transform3D;

/// The host scene as seen by the capture and bake operations.
///
/// The host owns the vertex arrays, transforms and shape-key storage and
/// resolves deformation into evaluated coordinates. Every call names its
/// object by a stable `ObjectId`; unknown ids yield `Error::ObjectNotFound`.
pub trait MeshHost {
    /// Display name of the object, used only in messages
    fn display_name(&self, object: ObjectId) -> Result<String>;

    /// Live vertex count of the object's mesh
    fn vertex_count(&self, object: ObjectId) -> Result<usize>;

    /// World-space positions after all deformation has been applied
    fn evaluated_world_positions(&self, object: ObjectId) -> Result<Vec<Point3f>>;

    /// Object-to-world transform
    fn world_transform(&self, object: ObjectId) -> Result<Transform3D>;

    /// Whether the object already has a basis shape key
    fn has_base_configuration(&self, object: ObjectId) -> Result<bool>;

    /// Return the basis handle, creating the basis from the object's local
    /// positions when the object has no shape keys yet. The basis is always
    /// the first shape key.
    fn get_or_create_base_configuration(
        &mut self,
        object: ObjectId,
        basis_name: &str,
    ) -> Result<ShapeKeyHandle>;

    /// Local-space positions stored in a shape key
    fn configuration_positions(
        &self,
        object: ObjectId,
        handle: ShapeKeyHandle,
    ) -> Result<Vec<Point3f>>;

    /// Append a new shape key holding `positions` after the existing ones.
    ///
    /// The key is committed only if `positions` matches the basis length, so a
    /// failed call leaves the object's shape keys unchanged. Duplicate names
    /// are allowed.
    fn create_alternate_configuration(
        &mut self,
        object: ObjectId,
        name: &str,
        positions: &[Point3f],
    ) -> Result<ShapeKeyHandle>;
}
