//! Interpolation helpers:
//! - lerp_f32 / lerp_vec3 (component-wise blends)
//! - cubic bezier basis and its inversion over x (path easing)
//! - quaternion slerp followed by Euler decomposition

use glam::{EulerRot, Quat, Vec3};

/// Euler order shared by rotation densification and rotation composition.
pub const EULER_ORDER: EulerRot = EulerRot::XYZ;

/// Fixed bisection depth; 32 halvings exhaust f32 precision on [0,1].
const BEZIER_BISECT_STEPS: u32 = 32;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    Vec3::new(
        lerp_f32(a.x, b.x, t),
        lerp_f32(a.y, b.y, t),
        lerp_f32(a.z, b.z, t),
    )
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Given control points (x0, y0) and (x1, y1) of a curve anchored at (0,0) and
/// (1,1), compute the eased y for progress `u` by inverting x via bisection.
///
/// The bisection runs a fixed number of steps with no early exit, which keeps
/// the result deterministic and monotonic in `u`.
#[inline]
pub fn bezier_ease(u: f32, x0: f32, y0: f32, x1: f32, y1: f32) -> f32 {
    if u.is_nan() || u <= 0.0 {
        return 0.0;
    }
    if u >= 1.0 {
        return 1.0;
    }
    // (x0 == y0, x1 == y1) puts both controls on the diagonal: exactly linear.
    if x0 == y0 && x1 == y1 {
        return u;
    }
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    for _ in 0..BEZIER_BISECT_STEPS {
        let mid = 0.5 * (lo + hi);
        if cubic_bezier(0.0, x0, x1, 1.0, mid) < u {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let s = 0.5 * (lo + hi);
    let y = cubic_bezier(0.0, y0, y1, 1.0, s);
    if y.is_finite() {
        y.clamp(0.0, 1.0)
    } else {
        u
    }
}

/// Spherical interpolation between two rotations, decomposed into Euler angles.
#[inline]
pub fn slerp_euler(a: Quat, b: Quat, t: f32) -> Vec3 {
    quat_to_euler(a.slerp(b, t))
}

#[inline]
pub fn quat_to_euler(q: Quat) -> Vec3 {
    let (x, y, z) = q.to_euler(EULER_ORDER);
    Vec3::new(x, y, z)
}

#[inline]
pub fn euler_to_quat(euler: Vec3) -> Quat {
    Quat::from_euler(EULER_ORDER, euler.x, euler.y, euler.z)
}
