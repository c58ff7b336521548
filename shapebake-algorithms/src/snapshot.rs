//! Rest-pose snapshots and their store

use std::collections::HashMap;

use shapebake_core::{ObjectId, Point3f};

/// World-space vertex positions of one object, frozen at capture time
#[derive(Debug, Clone, PartialEq)]
pub struct VertexSnapshot {
    pub owner: ObjectId,
    pub positions: Vec<Point3f>,
}

impl VertexSnapshot {
    pub fn new(owner: ObjectId, positions: Vec<Point3f>) -> Self {
        Self { owner, positions }
    }

    /// Number of captured vertices
    pub fn count(&self) -> usize {
        self.positions.len()
    }

    /// A snapshot is only usable while its owner keeps the same vertex count
    pub fn matches_count(&self, live_count: usize) -> bool {
        self.count() == live_count
    }
}

/// Rest poses keyed by object identity, at most one per object.
///
/// The store owns its snapshots; readers only borrow them. Entries are
/// independent of each other, so clearing has no ordering concerns.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    entries: HashMap<ObjectId, VertexSnapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a snapshot under its owner, returning the one it replaced
    pub fn insert(&mut self, snapshot: VertexSnapshot) -> Option<VertexSnapshot> {
        self.entries.insert(snapshot.owner, snapshot)
    }

    pub fn get(&self, object: ObjectId) -> Option<&VertexSnapshot> {
        self.entries.get(&object)
    }

    pub fn contains(&self, object: ObjectId) -> bool {
        self.entries.contains_key(&object)
    }

    /// Remove the snapshot for `object`
    pub fn evict(&mut self, object: ObjectId) -> Option<VertexSnapshot> {
        let evicted = self.entries.remove(&object);
        if evicted.is_some() {
            tracing::debug!(target: "snapshot", "Evicted rest pose of object {}", object);
        }
        evicted
    }

    /// Drop every snapshot and return how many were held
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        if dropped > 0 {
            tracing::debug!(target: "snapshot", "Cleared {} rest pose(s)", dropped);
        }
        dropped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identities that currently have a rest pose, in ascending order
    pub fn objects(&self) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self.entries.keys().copied().collect();
        ids.sort();
        ids
    }
}
