//! Vector-curve transform animation (translation, scale, rotation, anchor point).
//!
//! Unlike bone clips, translation and scale are `Curve<Vec3>` and rotation is
//! the sum of three scalar axis curves plus an orientation vector curve. Empty
//! curves contribute nothing.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::binding::TargetRef;
use crate::curve::Curve;
use crate::outputs::{Outputs, PropertyUpdate};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformAnimation {
    pub translation: Curve<Vec3>,
    pub scale: Curve<Vec3>,
    /// Euler angles (radians) added to the per-axis rotation curves.
    pub orientation: Curve<Vec3>,
    /// Pivot point; the node is offset so that rotation and scale happen around it.
    pub anchor: Curve<Vec3>,
    pub rotation_x: Curve<f32>,
    pub rotation_y: Curve<f32>,
    pub rotation_z: Curve<f32>,
}

/// Transform values at one time. `None` fields were not animated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransformSample {
    pub translation: Option<Vec3>,
    pub scale: Option<Vec3>,
    pub rotation: Quat,
}

impl TransformAnimation {
    pub fn is_empty(&self) -> bool {
        self.translation.is_empty()
            && self.scale.is_empty()
            && self.orientation.is_empty()
            && self.anchor.is_empty()
            && self.rotation_x.is_empty()
            && self.rotation_y.is_empty()
            && self.rotation_z.is_empty()
    }

    /// Latest keyframe time over all curves.
    pub fn duration(&self) -> f32 {
        [
            self.translation.end_time(),
            self.scale.end_time(),
            self.orientation.end_time(),
            self.anchor.end_time(),
            self.rotation_x.end_time(),
            self.rotation_y.end_time(),
            self.rotation_z.end_time(),
        ]
        .into_iter()
        .flatten()
        .fold(0.0, f32::max)
    }

    /// Summed Euler angles at `time`.
    pub fn euler(&self, time: f32) -> Vec3 {
        let axis = |c: &Curve<f32>| c.try_evaluate(time).unwrap_or(0.0);
        let mut euler = Vec3::new(
            axis(&self.rotation_x),
            axis(&self.rotation_y),
            axis(&self.rotation_z),
        );
        if let Some(o) = self.orientation.try_evaluate(time) {
            euler += o;
        }
        euler
    }

    /// Evaluate at `time`. Rotation composes X, then Y, then Z; zero angles are skipped.
    /// With an anchor the translation gains `rotation * -anchor * scale`, where a
    /// missing scale counts as one.
    pub fn evaluate(&self, time: f32) -> TransformSample {
        let euler = self.euler(time);
        let mut rotation = Quat::IDENTITY;
        if euler.x != 0.0 {
            rotation *= Quat::from_rotation_x(euler.x);
        }
        if euler.y != 0.0 {
            rotation *= Quat::from_rotation_y(euler.y);
        }
        if euler.z != 0.0 {
            rotation *= Quat::from_rotation_z(euler.z);
        }

        let scale = self.scale.try_evaluate(time);
        let mut translation = self.translation.try_evaluate(time);
        if let Some(anchor) = self.anchor.try_evaluate(time) {
            let offset = rotation * -anchor * scale.unwrap_or(Vec3::ONE);
            translation = Some(translation.unwrap_or(Vec3::ZERO) + offset);
        }

        TransformSample {
            translation,
            scale,
            rotation,
        }
    }

    /// Append the evaluated transform for `target`: position, rotation, then scale.
    pub fn sample_into(&self, time: f32, target: TargetRef, out: &mut Outputs) {
        let sample = self.evaluate(time);
        if let Some(t) = sample.translation {
            out.push_change(target, PropertyUpdate::LocalPosition(t));
        }
        out.push_change(target, PropertyUpdate::LocalRotation(sample.rotation));
        if let Some(s) = sample.scale {
            out.push_change(target, PropertyUpdate::LocalScale(s));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Keyframe;
    use std::f32::consts::FRAC_PI_2;

    fn vec_curve(points: &[(f32, Vec3)]) -> Curve<Vec3> {
        points.iter().map(|(t, v)| Keyframe::new(*t, *v)).collect()
    }

    #[test]
    fn translation_interpolates_componentwise() {
        let anim = TransformAnimation {
            translation: vec_curve(&[(0.0, Vec3::ZERO), (2.0, Vec3::new(2.0, 4.0, -2.0))]),
            ..Default::default()
        };
        let s = anim.evaluate(1.0);
        assert_eq!(s.translation, Some(Vec3::new(1.0, 2.0, -1.0)));
        assert_eq!(s.scale, None);
        assert_eq!(s.rotation, Quat::IDENTITY);
        assert_eq!(anim.duration(), 2.0);
    }

    #[test]
    fn orientation_adds_to_axis_curves() {
        let anim = TransformAnimation {
            rotation_z: [Keyframe::new(0.0, 0.25)].into_iter().collect(),
            orientation: vec_curve(&[(0.0, Vec3::new(0.0, 0.0, 0.5))]),
            ..Default::default()
        };
        assert_eq!(anim.euler(3.0), Vec3::new(0.0, 0.0, 0.75));
    }

    #[test]
    fn anchor_offsets_by_rotated_scaled_pivot() {
        let anim = TransformAnimation {
            anchor: vec_curve(&[(0.0, Vec3::new(1.0, 0.0, 0.0))]),
            scale: vec_curve(&[(0.0, Vec3::splat(2.0))]),
            rotation_z: [Keyframe::new(0.0, FRAC_PI_2)].into_iter().collect(),
            ..Default::default()
        };
        let t = anim.evaluate(0.0).translation.unwrap();
        // -X rotated a quarter turn about Z is -Y, then scaled by 2
        assert!((t - Vec3::new(0.0, -2.0, 0.0)).length() < 1e-5);
    }
}
