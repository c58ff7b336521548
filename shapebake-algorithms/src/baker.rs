//! Rest-pose capture and expression baking

use serde::Serialize;
use shapebake_core::{Error, MeshHost, ObjectId, Result, ShapeKeyHandle};

use crate::config::BakeConfig;
use crate::delta::DeltaField;
use crate::snapshot::{SnapshotStore, VertexSnapshot};

/// Outcome of a successful capture
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureReport {
    pub object: ObjectId,
    pub vertex_count: usize,
    /// Whether an earlier rest pose of the same object was overwritten
    pub replaced: bool,
}

/// Outcome of a successful bake
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BakeReport {
    pub object: ObjectId,
    pub key_name: String,
    pub key_index: usize,
    pub vertex_count: usize,
    /// Vertices whose local delta exceeded the configured epsilon
    pub displaced_vertices: usize,
    pub max_displacement: f32,
    /// Whether this bake had to create the basis first
    pub created_basis: bool,
}

/// Snapshot the evaluated world-space vertices of `object` as its rest pose.
///
/// Replaces any earlier rest pose of the same object. A mesh without vertices
/// fails with `Error::EmptyMesh` and leaves the store untouched.
pub fn capture_rest_pose<H: MeshHost + ?Sized>(
    store: &mut SnapshotStore,
    host: &H,
    object: ObjectId,
) -> Result<CaptureReport> {
    let name = host.display_name(object)?;

    let positions = if host.vertex_count(object)? == 0 {
        Vec::new()
    } else {
        host.evaluated_world_positions(object)?
    };
    if positions.is_empty() {
        tracing::warn!(target: "capture", "Object '{}' has no vertices to capture", name);
        return Err(Error::EmptyMesh { object });
    }

    let vertex_count = positions.len();
    let replaced = store.insert(VertexSnapshot::new(object, positions)).is_some();

    tracing::info!(
        target: "capture",
        "Rest pose captured for '{}' ({} vertices{})",
        name,
        vertex_count,
        if replaced { ", replaced previous" } else { "" }
    );

    Ok(CaptureReport {
        object,
        vertex_count,
        replaced,
    })
}

/// Bake the deformation since the rest pose into a new shape key.
///
/// Steps:
/// 1. read the evaluated world positions and diff them against the rest pose
/// 2. map the world deltas to local space through the inverse world transform
/// 3. add them to the basis (shape key 0, created if missing)
/// 4. write the sum into a new key named after `name`
///
/// Fails with `Error::NoRestPose` when nothing was captured, and with
/// `Error::TopologyChanged` when the vertex count no longer matches; the
/// latter also evicts the stale rest pose. The rest pose itself is never
/// modified, so any number of bakes can share it.
pub fn bake_expression<H: MeshHost + ?Sized>(
    store: &mut SnapshotStore,
    host: &mut H,
    object: ObjectId,
    name: &str,
    config: &BakeConfig,
) -> Result<BakeReport> {
    let display_name = host.display_name(object)?;

    let Some(rest) = store.get(object) else {
        tracing::warn!(target: "bake", "No rest pose captured for '{}'", display_name);
        return Err(Error::NoRestPose { object });
    };

    let current = host.evaluated_world_positions(object)?;
    if !rest.matches_count(current.len()) {
        let captured = rest.count();
        store.evict(object);
        tracing::warn!(
            target: "bake",
            "Vertex count of '{}' changed since capture ({} -> {}); rest pose discarded",
            display_name,
            captured,
            current.len()
        );
        return Err(Error::TopologyChanged {
            object,
            captured,
            current: current.len(),
        });
    }

    let transform = host.world_transform(object)?;
    let field = DeltaField::compute(&rest.positions, &current, &transform, config.parallel_threshold)
        .inspect_err(|e| tracing::warn!(target: "bake", "Cannot bake '{}': {}", display_name, e))?;

    let created_basis = !host.has_base_configuration(object)?;
    let basis = host.get_or_create_base_configuration(object, &config.basis_name)?;
    let final_positions = field.apply_to(&host.configuration_positions(object, basis)?)?;

    let key_name = config.resolve_key_name(name);
    let handle: ShapeKeyHandle =
        host.create_alternate_configuration(object, &key_name, &final_positions)?;

    let report = BakeReport {
        object,
        key_name,
        key_index: handle.index(),
        vertex_count: field.len(),
        displaced_vertices: field.displaced_count(config.displacement_epsilon),
        max_displacement: field.max_magnitude(),
        created_basis,
    };

    tracing::debug!(
        target: "bake",
        "'{}': {} of {} vertices displaced, max {:.6}",
        display_name,
        report.displaced_vertices,
        report.vertex_count,
        report.max_displacement
    );
    tracing::info!(target: "bake", "Created shape key '{}' on '{}'", report.key_name, display_name);

    Ok(report)
}

/// A baking session owning its rest poses for its whole lifetime.
///
/// Created when the tool is attached to a host and consumed by `detach`,
/// which drops every stored rest pose.
#[derive(Debug, Default)]
pub struct ExpressionBaker {
    store: SnapshotStore,
    config: BakeConfig,
}

impl ExpressionBaker {
    /// Create a session with an empty store
    pub fn new(config: BakeConfig) -> Result<Self> {
        Self::with_store(SnapshotStore::new(), config)
    }

    /// Create a session around an existing store
    pub fn with_store(store: SnapshotStore, config: BakeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    /// Capture the rest pose of `object`
    pub fn capture<H: MeshHost + ?Sized>(&mut self, host: &H, object: ObjectId) -> Result<CaptureReport> {
        capture_rest_pose(&mut self.store, host, object)
    }

    /// Bake the current deformation of `object` into a key named `name`
    pub fn bake<H: MeshHost + ?Sized>(
        &mut self,
        host: &mut H,
        object: ObjectId,
        name: &str,
    ) -> Result<BakeReport> {
        bake_expression(&mut self.store, host, object, name, &self.config)
    }

    pub fn has_rest_pose(&self, object: ObjectId) -> bool {
        self.store.contains(object)
    }

    /// Discard the rest pose of `object`; returns whether one existed
    pub fn forget(&mut self, object: ObjectId) -> bool {
        self.store.evict(object).is_some()
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn config(&self) -> &BakeConfig {
        &self.config
    }

    /// End the session, discarding every rest pose. Returns how many were dropped.
    pub fn detach(mut self) -> usize {
        let dropped = self.store.clear();
        tracing::info!(target: "snapshot", "Baker detached, {} rest pose(s) discarded", dropped);
        dropped
    }
}
