//! Output contracts from the core engine.
//!
//! Outputs carry the composed property values for this tick, addressed by
//! `TargetRef`, and a separate list of semantic events. Hosts either read the
//! batch directly or forward it to a `PropertySink` with `Outputs::apply`.

use std::sync::Arc;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::binding::{PropertySink, TargetRef};
use crate::ids::PlayerId;

/// A composed value for one property of one target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "property", content = "value")]
pub enum PropertyUpdate {
    LocalPosition(Vec3),
    LocalRotation(Quat),
    LocalScale(Vec3),
    Move(f32),
    Fov(f32),
    MorphWeight { name: Arc<str>, weight: f32 },
}

/// One changed target value this tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub target: TargetRef,
    pub update: PropertyUpdate,
}

/// Discrete semantic signals emitted during stepping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CoreEvent {
    PlaybackStarted { player: PlayerId },
    PlaybackResumed { player: PlayerId },
    PlaybackPaused { player: PlayerId },
    PlaybackStopped { player: PlayerId },
    /// A `LoopMode::Once` player reached the end of its clips.
    PlaybackEnded { player: PlayerId, animation_time: f32 },
}

/// Outputs returned by Engine::update().
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<CoreEvent>,
}

impl Outputs {
    pub fn with_capacity(changes: usize, events: usize) -> Self {
        Self {
            changes: Vec::with_capacity(changes),
            events: Vec::with_capacity(events),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, target: TargetRef, update: PropertyUpdate) {
        self.changes.push(Change { target, update });
    }

    #[inline]
    pub fn push_event(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }

    /// Forward every change to `sink` in order; returns how many the sink accepted.
    pub fn apply(&self, sink: &mut dyn PropertySink) -> usize {
        let mut applied = 0;
        for change in &self.changes {
            let target = change.target;
            let accepted = match &change.update {
                PropertyUpdate::LocalPosition(v) => sink.set_local_position(target, *v),
                PropertyUpdate::LocalRotation(q) => sink.set_local_rotation(target, *q),
                PropertyUpdate::LocalScale(v) => sink.set_local_scale(target, *v),
                PropertyUpdate::Move(d) => sink.move_forward(target, *d),
                PropertyUpdate::Fov(f) => sink.set_fov(target, *f),
                PropertyUpdate::MorphWeight { name, weight } => {
                    sink.set_morph_weight(target, name, *weight)
                }
            };
            if accepted {
                applied += 1;
            } else {
                log::trace!("no setter for {:?} on {:?}; skipped", change.update, target);
            }
        }
        applied
    }
}
