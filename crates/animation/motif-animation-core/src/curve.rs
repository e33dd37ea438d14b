//! Keyframes and time-sorted curves.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::interp::Interpolator;
use crate::sampling::sample_keyframes;
use crate::value::Animatable;

/// A single sample: time in seconds, value, and the easing used to arrive at it.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe<T> {
    pub time: f32,
    pub value: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolator: Option<Interpolator>,
}

impl<T> Keyframe<T> {
    /// Keyframe with linear arrival.
    #[inline]
    pub fn new(time: f32, value: T) -> Self {
        Self {
            time,
            value,
            interpolator: None,
        }
    }

    #[inline]
    pub fn with_interpolator(time: f32, value: T, interpolator: Interpolator) -> Self {
        Self {
            time,
            value,
            interpolator: Some(interpolator),
        }
    }
}

/// Keyframes of one property, kept sorted by time.
///
/// Sorting is stable, so keyframes sharing a time stay in insertion order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Keyframe<T>>", into = "Vec<Keyframe<T>>")]
#[serde(bound(
    serialize = "T: Serialize + Clone",
    deserialize = "T: Deserialize<'de>"
))]
pub struct Curve<T> {
    keys: Vec<Keyframe<T>>,
}

impl<T> Curve<T> {
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
        }
    }

    /// Insert a keyframe after any existing keyframes with the same time.
    pub fn insert(&mut self, time: f32, value: T, interpolator: Option<Interpolator>) {
        self.push(Keyframe {
            time,
            value,
            interpolator,
        });
    }

    /// Insert a keyframe in time order. Keyframes with a non-finite time are dropped.
    pub fn push(&mut self, key: Keyframe<T>) {
        if !key.time.is_finite() {
            log::warn!("dropping keyframe with non-finite time {}", key.time);
            return;
        }
        let at = self.keys.partition_point(|k| k.time <= key.time);
        self.keys.insert(at, key);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn keyframes(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    pub fn start_time(&self) -> Option<f32> {
        self.keys.first().map(|k| k.time)
    }

    pub fn end_time(&self) -> Option<f32> {
        self.keys.last().map(|k| k.time)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

impl<T: Animatable> Curve<T> {
    /// Sample the curve at `time` (seconds).
    ///
    /// # Panics
    /// Panics if the curve has no keyframes; guard with [`Curve::is_empty`] or
    /// use [`Curve::try_evaluate`].
    #[inline]
    pub fn evaluate(&self, time: f32) -> T {
        match sample_keyframes(&self.keys, time) {
            Some(v) => v,
            None => panic!("Curve::evaluate called on an empty curve (time = {time})"),
        }
    }

    /// Sample the curve at `time`, or `None` when it has no keyframes.
    #[inline]
    pub fn try_evaluate(&self, time: f32) -> Option<T> {
        sample_keyframes(&self.keys, time)
    }
}

impl<T> Default for Curve<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<Keyframe<T>>> for Curve<T> {
    fn from(mut keys: Vec<Keyframe<T>>) -> Self {
        let before = keys.len();
        keys.retain(|k| k.time.is_finite());
        if keys.len() != before {
            log::warn!("dropped {} keyframes with non-finite time", before - keys.len());
        }
        keys.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(Ordering::Equal));
        Self { keys }
    }
}

impl<T> From<Curve<T>> for Vec<Keyframe<T>> {
    fn from(curve: Curve<T>) -> Self {
        curve.keys
    }
}

impl<T> FromIterator<Keyframe<T>> for Curve<T> {
    fn from_iter<I: IntoIterator<Item = Keyframe<T>>>(iter: I) -> Self {
        Curve::from(iter.into_iter().collect::<Vec<_>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_time_order_and_tie_order() {
        let mut c = Curve::new();
        c.insert(2.0, 20.0f32, None);
        c.insert(0.0, 0.0, None);
        c.insert(2.0, 21.0, None);
        c.insert(1.0, 10.0, None);
        let values: Vec<f32> = c.keyframes().iter().map(|k| k.value).collect();
        assert_eq!(values, vec![0.0, 10.0, 20.0, 21.0]);
    }

    #[test]
    fn non_finite_times_are_dropped() {
        let mut c = Curve::new();
        c.insert(1.0, 1.0f32, None);
        c.insert(f32::NAN, 5.0, None);
        c.insert(f32::INFINITY, 6.0, None);
        c.insert(0.0, 0.0, None);
        assert_eq!(c.len(), 2);
        assert_eq!(c.end_time(), Some(1.0));

        let c: Curve<f32> = Curve::from(vec![
            Keyframe::new(2.0, 2.0),
            Keyframe::new(f32::NAN, 9.0),
            Keyframe::new(-0.0, 0.0),
            Keyframe::new(0.0, 1.0),
        ]);
        let times: Vec<f32> = c.keyframes().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 0.0, 2.0]);
        // equal zeros keep their input order
        assert_eq!(c.keyframes()[0].value, 0.0);
        assert_eq!(c.keyframes()[1].value, 1.0);
        assert_eq!(c.evaluate(1.0), 1.5);
    }

    #[test]
    fn from_vec_sorts_stably() {
        let c: Curve<f32> = Curve::from(vec![
            Keyframe::new(1.0, 1.0),
            Keyframe::new(0.0, 0.0),
            Keyframe::new(1.0, 2.0),
        ]);
        let values: Vec<f32> = c.keyframes().iter().map(|k| k.value).collect();
        assert_eq!(values, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    #[should_panic(expected = "empty curve")]
    fn evaluate_empty_fails_fast() {
        let c: Curve<f32> = Curve::new();
        let _ = c.evaluate(0.0);
    }

    #[test]
    fn deserialize_restores_order() {
        let json = r#"[{"time":1.0,"value":5.0},{"time":0.0,"value":1.0,"interpolator":{"kind":"step"}}]"#;
        let c: Curve<f32> = serde_json::from_str(json).unwrap();
        assert_eq!(c.start_time(), Some(0.0));
        assert_eq!(c.keyframes()[0].interpolator, Some(Interpolator::Step));
        assert_eq!(c.evaluate(0.5), 3.0);
    }
}
