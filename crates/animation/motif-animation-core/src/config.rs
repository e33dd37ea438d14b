//! Core configuration for motif-animation-core.

use serde::{Deserialize, Serialize};

/// Configuration for motion resolution, playback defaults and buffer sizing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Frame rate of the source motion data. Record frames are divided by this
    /// to obtain keyframe times in seconds.
    pub source_fps: f32,

    /// Playback rate assigned to newly created players. A rate of 1.0 advances
    /// one animation second per second of `dt`.
    pub playback_rate: f32,

    /// Number of rotation sub-samples synthesized per frame of gap between two
    /// chained rotation keyframes.
    pub rotation_substeps: u32,

    /// Upper bound on rotation sub-samples synthesized for one chained segment.
    /// Longer segments fail resolution with `ResolveError::FrameGap`.
    pub max_segment_samples: usize,

    /// Initial capacity hint for the per-tick change list.
    pub output_capacity: usize,

    /// Maximum events to retain per tick; extra events are dropped.
    pub max_events_per_tick: usize,
}

impl Config {
    pub const DEFAULT_SOURCE_FPS: f32 = 30.0;
    pub const DEFAULT_ROTATION_SUBSTEPS: u32 = 20;
    pub const DEFAULT_MAX_SEGMENT_SAMPLES: usize = 1 << 20;

    /// `source_fps` when it is finite and positive, otherwise the default.
    #[inline]
    pub fn effective_source_fps(&self) -> f32 {
        if self.source_fps.is_finite() && self.source_fps > 0.0 {
            self.source_fps
        } else {
            Self::DEFAULT_SOURCE_FPS
        }
    }

    /// Seconds for a frame index in source frame units.
    #[inline]
    pub fn frame_to_seconds(&self, frame: f32) -> f32 {
        frame / self.effective_source_fps()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_fps: Self::DEFAULT_SOURCE_FPS,
            playback_rate: 1.0,
            rotation_substeps: Self::DEFAULT_ROTATION_SUBSTEPS,
            max_segment_samples: Self::DEFAULT_MAX_SEGMENT_SAMPLES,
            output_capacity: 256,
            max_events_per_tick: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: Config = serde_json::from_str(r#"{ "source_fps": 60.0 }"#).unwrap();
        assert_eq!(cfg.source_fps, 60.0);
        assert_eq!(cfg.rotation_substeps, 20);
        assert_eq!(cfg.playback_rate, 1.0);
        assert_eq!(cfg.frame_to_seconds(30.0), 0.5);
    }

    #[test]
    fn unusable_source_fps_falls_back_to_default() {
        for fps in [0.0, -24.0, f32::NAN, f32::INFINITY] {
            let cfg = Config {
                source_fps: fps,
                ..Config::default()
            };
            assert_eq!(cfg.effective_source_fps(), Config::DEFAULT_SOURCE_FPS);
            assert_eq!(cfg.frame_to_seconds(0.0), 0.0);
            assert_eq!(cfg.frame_to_seconds(15.0), 0.5);
        }
    }
}
