//! TOML scene descriptions consumed by the `bake` command

use anyhow::{bail, Context, Result};
use nalgebra::Unit;
use serde::Deserialize;
use shapebake_core::{
    point_from_array, vector_from_array, DeformableMesh, Transform3D, UnitQuaternion, Vector3f,
};
use std::fs;
use std::path::Path;

/// One object and the poses to bake on it
#[derive(Debug, Clone, Deserialize)]
pub struct SceneFile {
    pub object: ObjectSpec,
    #[serde(default)]
    pub poses: Vec<PoseSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectSpec {
    pub name: String,
    pub vertices: Vec<[f32; 3]>,
    #[serde(default)]
    pub faces: Vec<[usize; 3]>,
    #[serde(default)]
    pub transform: TransformSpec,
}

/// Object-to-world transform as translation, axis-angle rotation and scale
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransformSpec {
    pub translation: [f32; 3],
    pub rotation_axis: [f32; 3],
    /// Radians
    pub rotation_angle: f32,
    pub scale: [f32; 3],
}

impl Default for TransformSpec {
    fn default() -> Self {
        Self {
            translation: [0.0, 0.0, 0.0],
            rotation_axis: [0.0, 0.0, 1.0],
            rotation_angle: 0.0,
            scale: [1.0, 1.0, 1.0],
        }
    }
}

/// A named deformation: sparse per-vertex local offsets
#[derive(Debug, Clone, Deserialize)]
pub struct PoseSpec {
    pub name: String,
    #[serde(default)]
    pub offsets: Vec<OffsetSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OffsetSpec {
    pub vertex: usize,
    pub offset: [f32; 3],
}

impl SceneFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading scene file {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing scene file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl ObjectSpec {
    /// Build the in-memory mesh, checking face indices
    pub fn to_mesh(&self) -> Result<DeformableMesh> {
        let vertex_count = self.vertices.len();
        if let Some(face) = self.faces.iter().find(|f| f.iter().any(|&i| i >= vertex_count)) {
            bail!(
                "face {:?} of '{}' references a vertex outside 0..{}",
                face,
                self.name,
                vertex_count
            );
        }

        let vertices = self.vertices.iter().copied().map(point_from_array).collect();
        let mesh = DeformableMesh::from_vertices_and_faces(self.name.clone(), vertices, self.faces.clone())
            .with_transform(self.transform.to_transform()?);
        Ok(mesh)
    }
}

impl TransformSpec {
    pub fn to_transform(&self) -> Result<Transform3D> {
        let rotation = if self.rotation_angle == 0.0 {
            UnitQuaternion::identity()
        } else {
            let Some(axis) = Unit::try_new(vector_from_array(self.rotation_axis), 1e-6) else {
                bail!("rotation_axis must be non-zero when rotation_angle is set");
            };
            UnitQuaternion::from_axis_angle(&axis, self.rotation_angle)
        };

        Ok(Transform3D::from_parts(
            vector_from_array(self.translation),
            rotation,
            vector_from_array(self.scale),
        ))
    }
}

impl PoseSpec {
    /// Dense offset layer for a mesh of `vertex_count` vertices
    pub fn offsets(&self, vertex_count: usize) -> Result<Vec<Vector3f>> {
        let mut dense = vec![Vector3f::zeros(); vertex_count];
        for entry in &self.offsets {
            let Some(slot) = dense.get_mut(entry.vertex) else {
                bail!(
                    "pose '{}' moves vertex {} but the mesh has {} vertices",
                    self.name,
                    entry.vertex,
                    vertex_count
                );
            };
            *slot += vector_from_array(entry.offset);
        }
        Ok(dense)
    }
}
