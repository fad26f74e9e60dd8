//! Wire-level request and response types.
//!
//! Optional string fields follow the wire convention of the original service
//! surface: an empty string means "not given". Quaternions travel as
//! `[x, y, z, w]`.

use serde::{Deserialize, Serialize};

use framekit_core::{Axis, AxisSet, Frame, Pose};

/// Success.
pub const ERR_OK: u8 = 0;
/// Required `name` missing.
pub const ERR_NO_NAME: u8 = 1;
/// Named frame not found (and, for set_parent, `parent` missing).
pub const ERR_NOT_FOUND: u8 = 2;
/// Required `source_name` missing.
pub const ERR_NO_SOURCE: u8 = 3;
/// Transform oracle could not resolve in time.
pub const ERR_ORACLE: u8 = 4;
/// Alias for the set_parent table, where code 2 means "no parent given".
pub const ERR_NO_PARENT: u8 = 2;

/// Pose on the wire: position `[x, y, z]`, orientation `[x, y, z, w]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseMsg {
    pub position: [f64; 3],
    pub orientation: [f64; 4],
}

impl Default for PoseMsg {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            orientation: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl PoseMsg {
    /// Convert to a core pose, renormalizing the quaternion.
    pub fn to_pose(&self) -> Pose {
        let [x, y, z, w] = self.orientation;
        Pose::new(
            nalgebra::Vector3::new(self.position[0], self.position[1], self.position[2]),
            nalgebra::UnitQuaternion::new_normalize(nalgebra::Quaternion::new(w, x, y, z)),
        )
    }
}

impl From<&Pose> for PoseMsg {
    fn from(pose: &Pose) -> Self {
        let q = &pose.orientation;
        Self {
            position: [pose.position.x, pose.position.y, pose.position.z],
            orientation: [q.i, q.j, q.k, q.w],
        }
    }
}

/// Shared acknowledgement for operations without a payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ack {
    pub error_code: u8,
    /// Advisory diagnostic; the numeric code is the contract.
    pub message: String,
}

impl Ack {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn err(error_code: u8, message: impl Into<String>) -> Self {
        Self {
            error_code,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error_code == ERR_OK
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlignFrameRequest {
    pub name: String,
    pub source_name: String,
    /// Bitmask bit0..bit5 → x, y, z, a, b, c.
    pub mode: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditFrameRequest {
    /// Empty resets the selection.
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetFrameRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetFrameResponse {
    pub error_code: u8,
    pub message: String,
    pub name: String,
    pub parent: String,
    pub pose: Option<PoseMsg>,
}

impl GetFrameResponse {
    pub fn err(error_code: u8, message: impl Into<String>) -> Self {
        Self {
            error_code,
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn found(frame: &Frame) -> Self {
        Self {
            error_code: ERR_OK,
            message: String::new(),
            name: frame.name.clone(),
            parent: frame.parent.clone(),
            pose: Some(PoseMsg::from(&frame.pose)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoveFrameRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetFrameRequest {
    pub name: String,
    /// Empty defaults to the editor's root frame.
    pub parent: String,
    pub pose: PoseMsg,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetParentFrameRequest {
    pub name: String,
    pub parent: String,
    pub keep_absolute: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CopyFrameRequest {
    pub name: String,
    pub source_name: String,
    /// Empty leaves the parent unchanged.
    pub parent: String,
}

/// Decode the wire alignment bitmask into an axis set.
pub fn decode_mode(mode: u8) -> AxisSet {
    Axis::ALL
        .into_iter()
        .enumerate()
        .filter(|(bit, _)| mode & (1 << bit) != 0)
        .map(|(_, axis)| axis)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_mode_maps_bits_to_axes() {
        assert!(decode_mode(0).is_empty());
        assert_eq!(decode_mode(0x3f), AxisSet::all());

        let xz = decode_mode(0b000101);
        assert!(xz.contains(Axis::X));
        assert!(!xz.contains(Axis::Y));
        assert!(xz.contains(Axis::Z));
        assert!(!xz.contains(Axis::A));

        let rot = decode_mode(0b111000);
        assert!(rot.contains(Axis::A));
        assert!(rot.contains(Axis::B));
        assert!(rot.contains(Axis::C));
        assert!(!rot.has_partial_rotation());
    }

    #[test]
    fn pose_msg_round_trips_and_renormalizes() {
        let msg = PoseMsg {
            position: [1.0, 2.0, 3.0],
            // Deliberately unnormalized.
            orientation: [0.0, 0.0, 0.0, 2.0],
        };
        let pose = msg.to_pose();
        assert_eq!(pose.orientation.w, 1.0);
        assert_eq!(PoseMsg::from(&pose).position, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn ack_serializes_with_numeric_code() {
        let ack = Ack::err(ERR_NOT_FOUND, "Frame not found: tool");
        let json = serde_json::to_string(&ack).unwrap();
        assert!(json.contains("\"error_code\":2"));
    }
}
