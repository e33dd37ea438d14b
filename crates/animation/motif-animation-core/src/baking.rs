//! Baking API: resample every curve of a clip set at a fixed frame rate.

use serde::{Deserialize, Serialize};

use crate::clip::ClipSet;

/// Upper bound on frames per baked curve; longer windows are truncated.
pub const MAX_BAKED_FRAMES: usize = 1 << 20;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BakingConfig {
    /// Target frame rate (Hz) for baked samples.
    pub frame_rate: f32,
    /// Start time (seconds) in clip space.
    pub start_time: f32,
    /// End time (seconds) in clip space; if None, uses the clip set duration.
    pub end_time: Option<f32>,
}

impl Default for BakingConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            start_time: 0.0,
            end_time: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BakedCurve {
    /// Index of the clip inside the set.
    pub clip: u32,
    pub clip_name: String,
    pub property: String,
    /// Sampled values at each frame.
    pub values: Vec<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BakedClipSet {
    pub frame_rate: f32,
    pub start_time: f32,
    pub end_time: f32,
    pub curves: Vec<BakedCurve>,
}

impl BakedClipSet {
    pub fn frame_count(&self) -> usize {
        self.curves.first().map_or(0, |c| c.values.len())
    }
}

/// Bake every non-empty curve of `set`. Frames are inclusive of the window end.
pub fn bake_clip_set(set: &ClipSet<f32>, cfg: &BakingConfig) -> BakedClipSet {
    let sr = if cfg.frame_rate.is_finite() && cfg.frame_rate > 0.0 {
        cfg.frame_rate
    } else {
        60.0
    };
    let duration = set.duration();
    let start = if cfg.start_time.is_finite() {
        cfg.start_time.clamp(0.0, duration)
    } else {
        0.0
    };
    let end = cfg
        .end_time
        .filter(|e| e.is_finite())
        .unwrap_or(duration)
        .clamp(start, duration);
    let frames = (f64::from(end - start) * f64::from(sr)).ceil();
    let (frame_count, end) = if frames < MAX_BAKED_FRAMES as f64 {
        (frames as usize + 1, end)
    } else {
        log::warn!(
            "bake of [{start}, {end}] at {sr} Hz truncated to {MAX_BAKED_FRAMES} frames"
        );
        let last = (MAX_BAKED_FRAMES - 1) as f32 / sr;
        (MAX_BAKED_FRAMES, end.min(start + last))
    };

    let mut curves = Vec::new();
    for (clip_idx, clip) in set.iter().enumerate() {
        for (property, curve) in clip.curves() {
            if curve.is_empty() {
                continue;
            }
            let values = (0..frame_count)
                .map(|f| curve.evaluate((start + f as f32 / sr).min(end)))
                .collect();
            curves.push(BakedCurve {
                clip: clip_idx as u32,
                clip_name: clip.name().to_string(),
                property: property.to_string(),
                values,
            });
        }
    }

    log::debug!(
        "baked {} curves x {} frames over [{start}, {end}]",
        curves.len(),
        frame_count
    );
    BakedClipSet {
        frame_rate: sr,
        start_time: start,
        end_time: end,
        curves,
    }
}

/// Export baked data as serde_json::Value (stable schema for serialization).
pub fn export_baked_json(baked: &BakedClipSet) -> serde_json::Value {
    serde_json::to_value(baked).unwrap_or(serde_json::Value::Null)
}
