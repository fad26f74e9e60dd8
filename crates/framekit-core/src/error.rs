//! Error types for frame-graph editing.

use serde::{Deserialize, Serialize};

/// Comprehensive error type for frame-graph operations.
///
/// Every variant is recoverable: the editor and graph remain usable after any
/// single failed operation, and validation always happens before mutation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FrameError {
    /// A required request field was missing or empty
    #[error("Missing required field: {field}")]
    InvalidArgument { field: String },

    /// Named frame absent from the graph
    #[error("Frame not found: {name}")]
    NotFound { name: String },

    /// Frame name already taken (or reserved by the root sentinel)
    #[error("Frame already exists: {name}")]
    AlreadyExists { name: String },

    /// Parent name is neither a known frame nor the root sentinel
    #[error("Invalid parent '{parent}' for frame '{name}'")]
    InvalidParent { name: String, parent: String },

    /// Reparenting would make a frame its own ancestor
    #[error("Reparenting '{name}' under '{parent}' would create a cycle")]
    CycleDetected { name: String, parent: String },

    /// Frame still referenced as parent by other frames
    #[error("Frame '{name}' still has dependent frames: {children:?}")]
    HasDependents { name: String, children: Vec<String> },

    /// Transform could not be resolved within the oracle's timeout.
    /// The field is `source_frame`, not `source`, because thiserror reserves
    /// that name for the error cause.
    #[error("Transform oracle could not resolve {source_frame} relative to {target}")]
    OracleUnavailable {
        target: String,
        source_frame: String,
    },

    /// Partial-axis orientation overwrite hit a decomposition singularity
    #[error("Orientation of '{name}' is too close to gimbal lock for a partial-axis overwrite")]
    DegenerateOrientation { name: String },

    /// Undo requested with nothing left to undo
    #[error("Undo history is empty")]
    EmptyHistory,

    /// A precondition observed during the resolve phase no longer held when
    /// the command went to mutate the graph
    #[error("Command precondition invalidated: {reason}")]
    PreconditionInvalidated { reason: String },
}

impl FrameError {
    /// Numeric response code used by the service boundary.
    ///
    /// Codes 0..=4 are the wire contract (0 = success, 1 = no name,
    /// 2 = frame not found, 3 = no source name, 4 = oracle unavailable);
    /// codes from 5 up are supplementary and only reachable through
    /// operations whose table does not already name the condition.
    #[inline]
    pub fn code(&self) -> u8 {
        match self {
            Self::InvalidArgument { .. } => 1,
            Self::NotFound { .. } => 2,
            Self::OracleUnavailable { .. } | Self::DegenerateOrientation { .. } => 4,
            Self::AlreadyExists { .. } => 5,
            Self::InvalidParent { .. } => 6,
            Self::CycleDetected { .. } => 7,
            Self::HasDependents { .. } => 8,
            Self::EmptyHistory => 9,
            Self::PreconditionInvalidated { .. } => 10,
        }
    }

    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "validation",
            Self::NotFound { .. } | Self::AlreadyExists { .. } => "lookup",
            Self::InvalidParent { .. } | Self::CycleDetected { .. } | Self::HasDependents { .. } => {
                "structure"
            }
            Self::OracleUnavailable { .. } | Self::DegenerateOrientation { .. } => "oracle",
            Self::EmptyHistory | Self::PreconditionInvalidated { .. } => "history",
        }
    }
}
