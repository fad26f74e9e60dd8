//! Frame and pose value types.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Default root sentinel: the fixed frame every parent chain terminates at.
pub const DEFAULT_ROOT: &str = "world";

/// Local pose of a frame relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vector3<f64>,
    pub orientation: UnitQuaternion<f64>,
}

impl Pose {
    pub fn new(position: Vector3<f64>, orientation: UnitQuaternion<f64>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
        }
    }

    /// Translation-only pose with identity orientation.
    pub fn from_position(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            orientation: UnitQuaternion::identity(),
        }
    }

    /// True if every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|c| c.is_finite())
            && self.orientation.coords.iter().all(|c| c.is_finite())
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

/// A named node in the frame tree: a local pose relative to a named parent.
///
/// `name` is immutable once the frame is in a graph (the graph API offers no
/// rename). `Clone` is the explicit deep copy used for frame duplication: the
/// copy shares no backing storage with the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub name: String,
    pub parent: String,
    pub pose: Pose,
}

impl Frame {
    /// New frame at the identity pose under `parent`.
    pub fn new(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: parent.into(),
            pose: Pose::identity(),
        }
    }

    pub fn with_pose(name: impl Into<String>, parent: impl Into<String>, pose: Pose) -> Self {
        Self {
            name: name.into(),
            parent: parent.into(),
            pose,
        }
    }
}
