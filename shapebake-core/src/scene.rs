//! In-memory scene implementing `MeshHost`

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::mesh::{DeformableMesh, ShapeKey, ShapeKeyHandle, ShapeKeySet};
use crate::point::{ObjectId, Point3f};
use crate::traits::MeshHost;
use crate::transform::Transform3D;

/// A set of deformable mesh objects keyed by stable identity
#[derive(Debug, Default)]
pub struct Scene {
    objects: HashMap<ObjectId, DeformableMesh>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object and hand out a fresh identity for it
    pub fn add_object(&mut self, mesh: DeformableMesh) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, mesh);
        id
    }

    pub fn remove_object(&mut self, object: ObjectId) -> Option<DeformableMesh> {
        self.objects.remove(&object)
    }

    pub fn object(&self, object: ObjectId) -> Result<&DeformableMesh> {
        self.objects.get(&object).ok_or(Error::ObjectNotFound(object))
    }

    pub fn object_mut(&mut self, object: ObjectId) -> Result<&mut DeformableMesh> {
        self.objects.get_mut(&object).ok_or(Error::ObjectNotFound(object))
    }

    fn shape_keys_mut(&mut self, object: ObjectId) -> Result<&mut ShapeKeySet> {
        self.object_mut(object)?
            .shape_keys
            .as_mut()
            .ok_or_else(|| Error::InvalidData(format!("object {} has no shape keys", object)))
    }
}

impl MeshHost for Scene {
    fn display_name(&self, object: ObjectId) -> Result<String> {
        Ok(self.object(object)?.name.clone())
    }

    fn vertex_count(&self, object: ObjectId) -> Result<usize> {
        Ok(self.object(object)?.vertex_count())
    }

    fn evaluated_world_positions(&self, object: ObjectId) -> Result<Vec<Point3f>> {
        Ok(self.object(object)?.evaluated_world_positions())
    }

    fn world_transform(&self, object: ObjectId) -> Result<Transform3D> {
        Ok(self.object(object)?.world_transform)
    }

    fn has_base_configuration(&self, object: ObjectId) -> Result<bool> {
        Ok(self
            .object(object)?
            .shape_keys
            .as_ref()
            .is_some_and(|keys| !keys.is_empty()))
    }

    fn get_or_create_base_configuration(
        &mut self,
        object: ObjectId,
        basis_name: &str,
    ) -> Result<ShapeKeyHandle> {
        let mesh = self.object_mut(object)?;
        let has_basis = mesh.shape_keys.as_ref().is_some_and(|keys| !keys.is_empty());
        if !has_basis {
            tracing::debug!(target: "scene", "Creating basis '{}' on '{}'", basis_name, mesh.name);
            mesh.shape_keys = Some(ShapeKeySet::with_basis(basis_name, mesh.vertices.clone()));
        }
        Ok(ShapeKeyHandle::BASIS)
    }

    fn configuration_positions(
        &self,
        object: ObjectId,
        handle: ShapeKeyHandle,
    ) -> Result<Vec<Point3f>> {
        self.object(object)?
            .shape_keys
            .as_ref()
            .and_then(|keys| keys.get(handle))
            .map(|key| key.positions.clone())
            .ok_or_else(|| {
                Error::InvalidData(format!("object {} has no shape key {}", object, handle.index()))
            })
    }

    fn create_alternate_configuration(
        &mut self,
        object: ObjectId,
        name: &str,
        positions: &[Point3f],
    ) -> Result<ShapeKeyHandle> {
        let keys = self.shape_keys_mut(object)?;
        let expected = keys.basis().map_or(0, |basis| basis.positions.len());
        if positions.len() != expected {
            return Err(Error::InvalidData(format!(
                "shape key '{}' needs {} positions, got {}",
                name,
                expected,
                positions.len()
            )));
        }
        Ok(keys.push(ShapeKey::new(name, positions.to_vec())))
    }
}
