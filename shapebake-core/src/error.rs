//! Error types for shapebake

use crate::point::ObjectId;
use thiserror::Error;

/// Main error type for shapebake operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Object {object} has no vertices to capture")]
    EmptyMesh { object: ObjectId },

    #[error("No rest pose captured for object {object}; capture a rest pose first")]
    NoRestPose { object: ObjectId },

    #[error("Vertex count of object {object} changed since capturing the rest pose ({captured} -> {current}); re-capture required")]
    TopologyChanged {
        object: ObjectId,
        captured: usize,
        current: usize,
    },

    #[error("World transform is not invertible")]
    SingularTransform,

    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for shapebake operations
pub type Result<T> = std::result::Result<T, Error>;
