//! Named property bindings and the scene-graph sink trait.
//!
//! Curve names are parsed once into a `Binding` when a clip set is attached to
//! a player. The host implements `PropertySink` and receives composed values
//! through `Outputs::apply`.

use std::sync::Arc;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::clip::Clip;
use crate::ids::PlayerId;

pub const LOCAL_POSITION: &str = "LocalPosition";
pub const LOCAL_EULER_ANGLES_RAW: &str = "LocalEulerAnglesRaw";
pub const LOCAL_ROTATION: &str = "LocalRotation";
pub const TRANSFORM_MOVE: &str = "Transform:move";
pub const CAMERA_FOV: &str = "Camera:fov";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            "z" => Some(Axis::Z),
            _ => None,
        }
    }
}

/// Where an evaluated curve value goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    /// One component of the local position.
    Position(Axis),
    /// One Euler angle (radians) of the local rotation.
    Euler(Axis),
    /// Forward distance applied after position and rotation.
    Move,
    /// Camera field of view.
    Fov,
    /// Weight of the morph target with this name.
    Morph(Arc<str>),
}

impl Binding {
    /// Map a property name to its binding. Names outside the fixed vocabulary
    /// are morph-target names.
    pub fn parse(name: &str) -> Self {
        match name {
            TRANSFORM_MOVE => return Binding::Move,
            CAMERA_FOV => return Binding::Fov,
            _ => {}
        }
        if let Some((head, tail)) = name.split_once('.') {
            if let Some(axis) = Axis::parse(tail) {
                match head {
                    LOCAL_POSITION => return Binding::Position(axis),
                    LOCAL_EULER_ANGLES_RAW | LOCAL_ROTATION => return Binding::Euler(axis),
                    _ => {}
                }
            }
        }
        Binding::Morph(Arc::from(name))
    }
}

/// A curve of a clip paired with its parsed binding.
#[derive(Clone, Debug)]
pub struct BoundCurve {
    pub binding: Binding,
    /// Position of the curve inside its clip.
    pub curve_idx: usize,
}

/// Parse every curve name of a clip.
pub fn bind_clip<T>(clip: &Clip<T>) -> Vec<BoundCurve> {
    clip.curves()
        .enumerate()
        .map(|(curve_idx, (name, _))| BoundCurve {
            binding: Binding::parse(name),
            curve_idx,
        })
        .collect()
}

/// Identifies the animated object a change belongs to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetRef {
    pub player: PlayerId,
    /// Index of the clip set within the player.
    pub set: u32,
    /// Index of the clip within the set (bone, morph or camera slot).
    pub target: u32,
}

/// Scene-graph boundary. Each setter returns `false` when the target has no
/// such property; the change is then skipped.
pub trait PropertySink {
    fn set_local_position(&mut self, _target: TargetRef, _value: Vec3) -> bool {
        false
    }

    fn set_local_rotation(&mut self, _target: TargetRef, _value: Quat) -> bool {
        false
    }

    fn set_local_scale(&mut self, _target: TargetRef, _value: Vec3) -> bool {
        false
    }

    fn move_forward(&mut self, _target: TargetRef, _distance: f32) -> bool {
        false
    }

    fn set_fov(&mut self, _target: TargetRef, _fov: f32) -> bool {
        false
    }

    fn set_morph_weight(&mut self, _target: TargetRef, _name: &str, _weight: f32) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixed_vocabulary() {
        assert_eq!(Binding::parse("LocalPosition.y"), Binding::Position(Axis::Y));
        assert_eq!(Binding::parse("LocalEulerAnglesRaw.z"), Binding::Euler(Axis::Z));
        assert_eq!(Binding::parse("LocalRotation.x"), Binding::Euler(Axis::X));
        assert_eq!(Binding::parse("Transform:move"), Binding::Move);
        assert_eq!(Binding::parse("Camera:fov"), Binding::Fov);
    }

    #[test]
    fn unknown_names_are_morphs() {
        assert_eq!(Binding::parse("まばたき"), Binding::Morph(Arc::from("まばたき")));
        assert_eq!(
            Binding::parse("LocalPosition.w"),
            Binding::Morph(Arc::from("LocalPosition.w"))
        );
    }
}
