//! Mesh and shape-key data structures

use crate::point::*;
use crate::transform::Transform3D;
use serde::{Deserialize, Serialize};

/// Index of a shape key inside its object's `ShapeKeySet`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeKeyHandle(pub usize);

impl ShapeKeyHandle {
    /// The basis is always the first key
    pub const BASIS: ShapeKeyHandle = ShapeKeyHandle(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// A named alternate vertex configuration, in local object space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeKey {
    pub name: String,
    /// Blend weight in `[0, 1]`
    pub value: f32,
    pub positions: Vec<Point3f>,
}

impl ShapeKey {
    pub fn new(name: impl Into<String>, positions: Vec<Point3f>) -> Self {
        Self {
            name: name.into(),
            value: 0.0,
            positions,
        }
    }

    /// Set the blend weight, clamped to `[0, 1]`
    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(0.0, 1.0);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Ordered shape keys of one mesh.
///
/// Element 0 is the basis, regardless of its name. Every other key is an
/// alternate configuration expressed as absolute local positions and blended
/// relative to the basis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeKeySet {
    keys: Vec<ShapeKey>,
}

impl ShapeKeySet {
    /// Start a set whose basis holds `positions`
    pub fn with_basis(name: impl Into<String>, positions: Vec<Point3f>) -> Self {
        Self {
            keys: vec![ShapeKey::new(name, positions)],
        }
    }

    /// The basis key (element 0)
    pub fn basis(&self) -> Option<&ShapeKey> {
        self.keys.first()
    }

    /// Append a key and return its handle. Names are not required to be unique.
    pub fn push(&mut self, key: ShapeKey) -> ShapeKeyHandle {
        let handle = ShapeKeyHandle(self.keys.len());
        self.keys.push(key);
        handle
    }

    pub fn get(&self, handle: ShapeKeyHandle) -> Option<&ShapeKey> {
        self.keys.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: ShapeKeyHandle) -> Option<&mut ShapeKey> {
        self.keys.get_mut(handle.0)
    }

    /// First key carrying `name`
    pub fn find_by_name(&self, name: &str) -> Option<ShapeKeyHandle> {
        self.keys.iter().position(|k| k.name == name).map(ShapeKeyHandle)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ShapeKey> {
        self.keys.iter()
    }

    /// Basis plus every weighted key offset relative to the basis
    pub fn mix(&self) -> Option<Vec<Point3f>> {
        let basis = self.basis()?;
        let mut mixed = basis.positions.clone();

        for key in self.iter().skip(1) {
            if key.value <= 0.0 || key.positions.len() != mixed.len() {
                continue;
            }
            for ((out, target), base) in mixed.iter_mut().zip(&key.positions).zip(&basis.positions) {
                *out += (target - base) * key.value;
            }
        }

        Some(mixed)
    }
}

/// A deformable triangle mesh object as the in-memory host sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeformableMesh {
    /// Display name; never used as an identity
    pub name: String,
    /// Authored local-space vertex positions
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    /// Object-to-world transform
    pub world_transform: Transform3D,
    pub shape_keys: Option<ShapeKeySet>,
    /// Per-vertex local offsets applied on top of the shape-key mix, standing
    /// in for modifier or armature deformation
    pub deformation: Option<Vec<Vector3f>>,
}

impl DeformableMesh {
    /// Create a mesh from vertices and faces with an identity transform
    pub fn from_vertices_and_faces(
        name: impl Into<String>,
        vertices: Vec<Point3f>,
        faces: Vec<[usize; 3]>,
    ) -> Self {
        Self {
            name: name.into(),
            vertices,
            faces,
            world_transform: Transform3D::identity(),
            shape_keys: None,
            deformation: None,
        }
    }

    pub fn with_transform(mut self, transform: Transform3D) -> Self {
        self.world_transform = transform;
        self
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Replace the deformation layer
    pub fn set_deformation(&mut self, offsets: Vec<Vector3f>) {
        self.deformation = Some(offsets);
    }

    pub fn clear_deformation(&mut self) {
        self.deformation = None;
    }

    /// Local-space positions after shape keys and deformation are applied
    pub fn evaluated_local_positions(&self) -> Vec<Point3f> {
        let mut positions = self
            .shape_keys
            .as_ref()
            .and_then(ShapeKeySet::mix)
            .filter(|mixed| mixed.len() == self.vertices.len())
            .unwrap_or_else(|| self.vertices.clone());

        if let Some(offsets) = self.deformation.as_ref().filter(|d| d.len() == positions.len()) {
            for (p, offset) in positions.iter_mut().zip(offsets) {
                *p += *offset;
            }
        }

        positions
    }

    /// Evaluated positions mapped into world space
    pub fn evaluated_world_positions(&self) -> Vec<Point3f> {
        self.evaluated_local_positions()
            .iter()
            .map(|p| self.world_transform.transform_point(p))
            .collect()
    }

    /// Add a vertex (and with it change topology); shape keys are extended too
    pub fn add_vertex(&mut self, vertex: Point3f) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        if let Some(keys) = self.shape_keys.as_mut() {
            for key in keys.keys.iter_mut() {
                key.positions.push(vertex);
            }
        }
        self.deformation = None;
        index
    }
}
