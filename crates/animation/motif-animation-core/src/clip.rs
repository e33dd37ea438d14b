//! Clips (named curve bundles for one target) and clip sets (index-correlated clips).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::curve::Curve;

/// All curves animating one target for one take, looked up by property name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize + Clone",
    deserialize = "T: Deserialize<'de>"
))]
pub struct Clip<T> {
    pub name: String,
    curves: IndexMap<String, Curve<T>>,
}

impl<T> Clip<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            curves: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Store `curve` under `property`, replacing any existing curve of that name.
    pub fn set_curve(&mut self, property: impl Into<String>, curve: Curve<T>) {
        self.curves.insert(property.into(), curve);
    }

    pub fn curve(&self, property: &str) -> Option<&Curve<T>> {
        self.curves.get(property)
    }

    pub fn curve_mut(&mut self, property: &str) -> Option<&mut Curve<T>> {
        self.curves.get_mut(property)
    }

    pub fn remove_curve(&mut self, property: &str) -> Option<Curve<T>> {
        self.curves.shift_remove(property)
    }

    /// Curve by insertion position; positions are stable until a removal.
    pub fn curve_at(&self, index: usize) -> Option<(&str, &Curve<T>)> {
        self.curves.get_index(index).map(|(k, v)| (k.as_str(), v))
    }

    pub fn curves(&self) -> impl Iterator<Item = (&str, &Curve<T>)> {
        self.curves.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of curves (including empty ones).
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Latest keyframe time over all curves; 0 for a clip without keyframes.
    pub fn duration(&self) -> f32 {
        self.curves
            .values()
            .filter_map(Curve::end_time)
            .fold(0.0, f32::max)
    }
}

impl<T> Default for Clip<T> {
    fn default() -> Self {
        Self::new("")
    }
}

/// Clips correlated by position with an external target list (bone i <-> clip i).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "T: Serialize + Clone",
    deserialize = "T: Deserialize<'de>"
))]
pub struct ClipSet<T> {
    clips: Vec<Clip<T>>,
}

impl<T> ClipSet<T> {
    pub fn new() -> Self {
        Self { clips: Vec::new() }
    }

    /// `len` empty, unnamed clips.
    pub fn with_len(len: usize) -> Self {
        let mut set = Self::new();
        set.resize(len);
        set
    }

    pub fn push(&mut self, clip: Clip<T>) -> usize {
        self.clips.push(clip);
        self.clips.len() - 1
    }

    /// Grow with empty clips or truncate at the tail; existing indices keep their clips.
    pub fn resize(&mut self, len: usize) {
        if len < self.clips.len() {
            self.clips.truncate(len);
        } else {
            self.clips.reserve(len - self.clips.len());
            while self.clips.len() < len {
                self.clips.push(Clip::default());
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&Clip<T>> {
        self.clips.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Clip<T>> {
        self.clips.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Clip<T>> {
        self.clips.iter()
    }

    pub fn as_slice(&self) -> &[Clip<T>] {
        &self.clips
    }

    pub fn duration(&self) -> f32 {
        self.clips.iter().map(Clip::duration).fold(0.0, f32::max)
    }
}

impl<T> Default for ClipSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Clip<T>> for ClipSet<T> {
    fn from(clip: Clip<T>) -> Self {
        Self { clips: vec![clip] }
    }
}

impl<T> From<Vec<Clip<T>>> for ClipSet<T> {
    fn from(clips: Vec<Clip<T>>) -> Self {
        Self { clips }
    }
}

impl<'a, T> IntoIterator for &'a ClipSet<T> {
    type Item = &'a Clip<T>;
    type IntoIter = std::slice::Iter<'a, Clip<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.clips.iter()
    }
}
