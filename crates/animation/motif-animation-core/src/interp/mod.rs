//! Easing interpolators attached to keyframes.
//!
//! Interpolators are small immutable values (at most four floats), so keyframes
//! hold them by value and many keyframes may carry identical copies.

pub mod functions;

use serde::{Deserialize, Serialize};

use functions::bezier_ease;

/// Largest control byte value in the motion file encoding.
pub const CONTROL_BYTE_MAX: f32 = 127.0;

/// Cubic easing curve through (0,0), (x0,y0), (x1,y1), (1,1).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathInterpolator {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl PathInterpolator {
    /// Build from control points; each coordinate is clamped into [0,1].
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        let c = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            x0: c(x0),
            y0: c(y0),
            x1: c(x1),
            y1: c(y1),
        }
    }

    /// Build from the four control bytes of one axis as stored in motion files.
    ///
    /// The byte layout is `[x0, x1, y0, y1]`, so bytes 1 and 2 swap places
    /// relative to the `(x0, y0, x1, y1)` parameter order.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        let f = |b: u8| f32::from(b) / CONTROL_BYTE_MAX;
        Self::new(f(bytes[0]), f(bytes[2]), f(bytes[1]), f(bytes[3]))
    }

    #[inline]
    pub fn ease(&self, u: f32) -> f32 {
        bezier_ease(u, self.x0, self.y0, self.x1, self.y1)
    }
}

/// Easing applied to a keyframe segment. A keyframe without an interpolator
/// behaves as `Linear`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Interpolator {
    #[default]
    Linear,
    /// Hold the previous value until the segment end.
    Step,
    Path(PathInterpolator),
}

impl Interpolator {
    #[inline]
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Interpolator::Path(PathInterpolator::from_bytes(bytes))
    }

    /// Map normalized progress in [0,1] to eased progress in [0,1].
    #[inline]
    pub fn ease(&self, u: f32) -> f32 {
        match self {
            Interpolator::Linear => {
                if u.is_nan() {
                    0.0
                } else {
                    u.clamp(0.0, 1.0)
                }
            }
            Interpolator::Step => {
                if u >= 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Interpolator::Path(p) => p.ease(u),
        }
    }
}

impl From<PathInterpolator> for Interpolator {
    fn from(p: PathInterpolator) -> Self {
        Interpolator::Path(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_map_with_axis_swap() {
        let p = PathInterpolator::from_bytes([127, 0, 64, 32]);
        assert_eq!(p.x0, 1.0);
        assert_eq!(p.y0, 64.0 / 127.0);
        assert_eq!(p.x1, 0.0);
        assert_eq!(p.y1, 32.0 / 127.0);
    }

    #[test]
    fn degenerate_bytes_stay_in_range() {
        for bytes in [[0, 0, 0, 0], [127, 127, 127, 127], [127, 0, 0, 127], [0, 127, 127, 0]] {
            let interp = Interpolator::from_bytes(bytes);
            let mut last = 0.0f32;
            for i in 0..=100 {
                let u = i as f32 / 100.0;
                let e = interp.ease(u);
                assert!(e.is_finite() && (0.0..=1.0).contains(&e), "{bytes:?} u={u} e={e}");
                assert!(e + 1e-6 >= last, "{bytes:?} not monotonic at u={u}");
                last = e;
            }
        }
    }

    #[test]
    fn step_holds_until_end() {
        assert_eq!(Interpolator::Step.ease(0.0), 0.0);
        assert_eq!(Interpolator::Step.ease(0.99), 0.0);
        assert_eq!(Interpolator::Step.ease(1.0), 1.0);
    }
}
