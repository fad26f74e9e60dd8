//! Partial-axis pose alignment.
//!
//! An alignment overwrites a selected subset of a frame's local pose
//! components with those of an externally observed pose. Translation axes are
//! independent scalars; rotation axes require decomposing both orientations
//! into the same roll/pitch/yaw triple, splicing, and recomposing to a unit
//! quaternion, which is the numerically delicate step guarded here.

use nalgebra::UnitQuaternion;

use crate::error::FrameError;
use crate::frame::Pose;
use crate::Result;

/// How close |sin(pitch)| may get to 1 before a partial rotation splice is
/// rejected as degenerate.
const GIMBAL_EPS: f64 = 1e-6;

/// One alignable pose component: x,y,z translation, a,b,c = roll,pitch,yaw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    A,
    B,
    C,
}

impl Axis {
    pub const ALL: [Axis; 6] = [Axis::X, Axis::Y, Axis::Z, Axis::A, Axis::B, Axis::C];

    fn bit(self) -> u8 {
        match self {
            Axis::X => 1 << 0,
            Axis::Y => 1 << 1,
            Axis::Z => 1 << 2,
            Axis::A => 1 << 3,
            Axis::B => 1 << 4,
            Axis::C => 1 << 5,
        }
    }
}

/// Set of axes selected for an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisSet {
    bits: u8,
}

impl AxisSet {
    pub fn empty() -> Self {
        Self { bits: 0 }
    }

    /// All six axes: a full pose copy.
    pub fn all() -> Self {
        Self { bits: 0x3f }
    }

    pub fn insert(&mut self, axis: Axis) {
        self.bits |= axis.bit();
    }

    pub fn contains(&self, axis: Axis) -> bool {
        self.bits & axis.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    fn rotation_bits(&self) -> u8 {
        self.bits >> 3
    }

    /// True when some but not all rotation axes are selected, forcing an
    /// euler splice instead of a wholesale quaternion copy.
    pub fn has_partial_rotation(&self) -> bool {
        !matches!(self.rotation_bits(), 0 | 0b111)
    }
}

impl FromIterator<Axis> for AxisSet {
    fn from_iter<I: IntoIterator<Item = Axis>>(iter: I) -> Self {
        let mut set = AxisSet::empty();
        for axis in iter {
            set.insert(axis);
        }
        set
    }
}

/// Sine of the pitch angle of a roll-pitch-yaw (ZYX) decomposition, read
/// straight off the quaternion so the singularity check never goes through
/// an asin round-trip.
fn pitch_sine(q: &UnitQuaternion<f64>) -> f64 {
    2.0 * (q.w * q.j - q.k * q.i)
}

/// Overwrite the selected components of `current` with those of `observed`,
/// leaving unselected components exactly as they were.
///
/// `name` only labels the error when a partial rotation splice lands in the
/// gimbal-lock band of either orientation.
pub fn apply_alignment(
    name: &str,
    current: &Pose,
    observed: &Pose,
    axes: AxisSet,
) -> Result<Pose> {
    let mut result = *current;

    if axes.contains(Axis::X) {
        result.position.x = observed.position.x;
    }
    if axes.contains(Axis::Y) {
        result.position.y = observed.position.y;
    }
    if axes.contains(Axis::Z) {
        result.position.z = observed.position.z;
    }

    if axes.has_partial_rotation() {
        result.orientation = splice_orientation(name, &current.orientation, &observed.orientation, axes)?;
    } else if axes.contains(Axis::A) {
        // All three rotation axes selected: take the observed quaternion
        // wholesale, no decomposition and no singularity exposure.
        result.orientation = observed.orientation;
    }

    if !result.is_finite() {
        return Err(FrameError::DegenerateOrientation {
            name: name.to_string(),
        });
    }
    Ok(result)
}

fn splice_orientation(
    name: &str,
    current: &UnitQuaternion<f64>,
    observed: &UnitQuaternion<f64>,
    axes: AxisSet,
) -> Result<UnitQuaternion<f64>> {
    for q in [current, observed] {
        if pitch_sine(q).abs() >= 1.0 - GIMBAL_EPS {
            return Err(FrameError::DegenerateOrientation {
                name: name.to_string(),
            });
        }
    }

    let (cur_roll, cur_pitch, cur_yaw) = current.euler_angles();
    let (obs_roll, obs_pitch, obs_yaw) = observed.euler_angles();

    let roll = if axes.contains(Axis::A) { obs_roll } else { cur_roll };
    let pitch = if axes.contains(Axis::B) { obs_pitch } else { cur_pitch };
    let yaw = if axes.contains(Axis::C) { obs_yaw } else { cur_yaw };

    let spliced = UnitQuaternion::from_euler_angles(roll, pitch, yaw);
    if spliced.coords.iter().any(|c| !c.is_finite()) {
        return Err(FrameError::DegenerateOrientation {
            name: name.to_string(),
        });
    }
    Ok(spliced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn pose_rpy(x: f64, y: f64, z: f64, roll: f64, pitch: f64, yaw: f64) -> Pose {
        Pose::new(
            nalgebra::Vector3::new(x, y, z),
            UnitQuaternion::from_euler_angles(roll, pitch, yaw),
        )
    }

    #[test]
    fn translation_only_axis_leaves_everything_else_bit_identical() {
        let current = pose_rpy(1.0, 2.0, 3.0, 0.1, 0.2, 0.3);
        let observed = pose_rpy(9.0, 8.0, 7.0, 0.9, 0.8, 0.7);
        let axes: AxisSet = [Axis::X].into_iter().collect();

        let out = apply_alignment("f", &current, &observed, axes).unwrap();
        assert_eq!(out.position.x, observed.position.x);
        assert_eq!(out.position.y.to_bits(), current.position.y.to_bits());
        assert_eq!(out.position.z.to_bits(), current.position.z.to_bits());
        assert_eq!(out.orientation, current.orientation);
    }

    #[test]
    fn full_rotation_copies_quaternion_without_decomposition() {
        // Pitch exactly at the singularity: fine because no splice happens.
        let current = pose_rpy(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let observed = pose_rpy(0.0, 0.0, 0.0, 0.3, FRAC_PI_2, -0.2);
        let out = apply_alignment("f", &current, &observed, AxisSet::all()).unwrap();
        assert_eq!(out.orientation, observed.orientation);
    }

    #[test]
    fn partial_rotation_splices_selected_angles() {
        let current = pose_rpy(0.0, 0.0, 0.0, 0.1, 0.2, 0.3);
        let observed = pose_rpy(0.0, 0.0, 0.0, 0.9, 0.8, 0.7);
        let axes: AxisSet = [Axis::A].into_iter().collect();

        let out = apply_alignment("f", &current, &observed, axes).unwrap();
        let (roll, pitch, yaw) = out.orientation.euler_angles();
        assert_relative_eq!(roll, 0.9, epsilon = 1e-9);
        assert_relative_eq!(pitch, 0.2, epsilon = 1e-9);
        assert_relative_eq!(yaw, 0.3, epsilon = 1e-9);
    }

    #[test]
    fn partial_rotation_near_gimbal_lock_is_rejected() {
        let current = pose_rpy(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let observed = pose_rpy(0.0, 0.0, 0.0, 0.0, FRAC_PI_2, 0.0);
        let axes: AxisSet = [Axis::C].into_iter().collect();

        let err = apply_alignment("f", &current, &observed, axes).unwrap_err();
        assert!(matches!(err, FrameError::DegenerateOrientation { .. }));
    }

    #[test]
    fn empty_axis_set_is_a_no_op() {
        let current = pose_rpy(1.0, 2.0, 3.0, 0.1, 0.2, 0.3);
        let observed = pose_rpy(9.0, 8.0, 7.0, 0.9, 0.8, 0.7);
        let out = apply_alignment("f", &current, &observed, AxisSet::empty()).unwrap();
        assert_eq!(out, current);
    }
}
