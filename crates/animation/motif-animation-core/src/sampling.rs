//! Keyframe segment lookup and sampling.
//!
//! Model:
//! - Keyframes are sorted by time (non-decreasing); equal times keep insertion order.
//! - Queries at or before the first time hold the first value; at or after the
//!   last time they hold the last value.
//! - Between keyframes k0 and k1 the progress is eased by k1's interpolator
//!   (the destination keyframe), then blended with `Animatable::interpolate`.
//! - At an interior time shared by several keyframes, the last one inserted wins.

use crate::curve::Keyframe;
use crate::value::Animatable;

/// Bracketing keyframes for a query time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Segment {
    /// Hold the value of the keyframe at this index.
    Hold(usize),
    /// Blend from `from` to `to` with local progress in [0,1).
    Between { from: usize, to: usize, u: f32 },
}

/// Find the segment containing `time` with a binary search. `keys` must be non-empty.
pub fn find_segment<T>(keys: &[Keyframe<T>], time: f32) -> Segment {
    let n = keys.len();
    debug_assert!(n > 0);
    if n == 1 || time.is_nan() || time <= keys[0].time {
        return Segment::Hold(0);
    }
    if time >= keys[n - 1].time {
        return Segment::Hold(n - 1);
    }
    // Number of keys with key.time <= time; 1 <= idx < n here.
    let idx = keys.partition_point(|k| k.time <= time);
    let from = idx - 1;
    let to = idx;
    let t0 = keys[from].time;
    let t1 = keys[to].time;
    // t0 <= time < t1, so the span is positive.
    let u = ((time - t0) / (t1 - t0)).clamp(0.0, 1.0);
    Segment::Between { from, to, u }
}

/// Sample sorted keyframes at `time`. Returns `None` when `keys` is empty.
pub fn sample_keyframes<T: Animatable>(keys: &[Keyframe<T>], time: f32) -> Option<T> {
    if keys.is_empty() {
        return None;
    }
    let value = match find_segment(keys, time) {
        Segment::Hold(i) => keys[i].value,
        Segment::Between { from, to, u } => {
            let left = &keys[from];
            let right = &keys[to];
            let eased = right.interpolator.unwrap_or_default().ease(u);
            T::interpolate(left.value, right.value, eased)
        }
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(times: &[f32]) -> Vec<Keyframe<f32>> {
        times
            .iter()
            .enumerate()
            .map(|(i, t)| Keyframe::new(*t, i as f32))
            .collect()
    }

    #[test]
    fn segment_lookup_brackets_query() {
        let k = keys(&[0.0, 1.0, 2.0, 4.0]);
        assert_eq!(find_segment(&k, -1.0), Segment::Hold(0));
        assert_eq!(find_segment(&k, 9.0), Segment::Hold(3));
        assert_eq!(
            find_segment(&k, 3.0),
            Segment::Between {
                from: 2,
                to: 3,
                u: 0.5
            }
        );
        assert_eq!(
            find_segment(&k, 1.0),
            Segment::Between {
                from: 1,
                to: 2,
                u: 0.0
            }
        );
    }

    #[test]
    fn interior_duplicate_time_picks_last_inserted() {
        let k = keys(&[0.0, 1.0, 1.0, 2.0]);
        assert_eq!(sample_keyframes(&k, 1.0), Some(2.0));
        // Approaching from below blends toward the first key of the run.
        assert_eq!(sample_keyframes(&k, 0.5), Some(0.5));
        // Leaving the run blends from the last key of the run.
        assert_eq!(sample_keyframes(&k, 1.5), Some(2.5));
    }

    #[test]
    fn nan_time_holds_first() {
        let k = keys(&[0.0, 1.0]);
        assert_eq!(sample_keyframes(&k, f32::NAN), Some(0.0));
    }
}
