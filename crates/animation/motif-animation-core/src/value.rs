//! Value domains that curves can interpolate.

use glam::Vec3;

use crate::interp::functions::{lerp_f32, lerp_vec3};

/// A keyframe value type with a blend between two samples.
///
/// Rotations are not animatable as a whole: each Euler axis is its own `f32`
/// curve and composition into a quaternion happens at playback.
pub trait Animatable: Copy {
    fn interpolate(a: Self, b: Self, t: f32) -> Self;
}

impl Animatable for f32 {
    #[inline]
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        lerp_f32(a, b, t)
    }
}

impl Animatable for Vec3 {
    #[inline]
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        lerp_vec3(a, b, t)
    }
}

impl Animatable for [f32; 3] {
    #[inline]
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        [
            lerp_f32(a[0], b[0], t),
            lerp_f32(a[1], b[1], t),
            lerp_f32(a[2], b[2], t),
        ]
    }
}
