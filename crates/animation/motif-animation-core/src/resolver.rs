//! Keyframe-chain resolution: flat, cross-referencing motion records into clip sets.
//!
//! Motion files store every keyframe after the first as a record pointing at
//! its predecessor through `pre_index`. A `pre_index` below the target count
//! names the target's initial frame; anything else is the `data_index` of
//! another record, which may appear later in the list. Resolution runs in two
//! passes: index records by `data_index`, then walk each chain down to its
//! initial frame to learn which target the record animates.

use glam::{Quat, Vec3, Vec4};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::binding::{CAMERA_FOV, TRANSFORM_MOVE};
use crate::clip::{Clip, ClipSet};
use crate::config::Config;
use crate::curve::{Curve, Keyframe};
use crate::error::ResolveError;
use crate::interp::functions::{quat_to_euler, slerp_euler};
use crate::interp::Interpolator;

pub const POSITION_CURVES: [&str; 3] = ["LocalPosition.x", "LocalPosition.y", "LocalPosition.z"];
pub const EULER_CURVES: [&str; 3] = [
    "LocalEulerAnglesRaw.x",
    "LocalEulerAnglesRaw.y",
    "LocalEulerAnglesRaw.z",
];

/// A record that links to its predecessor.
pub trait ChainRecord {
    fn data_index(&self) -> u32;
    fn pre_index(&self) -> u32;
}

/// One bone keyframe. Initial frames use the same layout; their chain indices are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneKeyframe {
    pub frame: i32,
    pub data_index: u32,
    pub pre_index: u32,
    pub translation: Vec3,
    pub rotation: Quat,
    pub interpolation_x: [u8; 4],
    pub interpolation_y: [u8; 4],
    pub interpolation_z: [u8; 4],
    pub interpolation_rotation: [u8; 4],
}

impl ChainRecord for BoneKeyframe {
    fn data_index(&self) -> u32 {
        self.data_index
    }
    fn pre_index(&self) -> u32 {
        self.pre_index
    }
}

/// All bone keyframes of one model. `init_frames[i]` belongs to `names[i]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoneMotion {
    pub names: Vec<String>,
    pub init_frames: Vec<BoneKeyframe>,
    pub key_frames: Vec<BoneKeyframe>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MorphKeyframe {
    pub frame: i32,
    pub data_index: u32,
    pub pre_index: u32,
    pub value: f32,
}

impl ChainRecord for MorphKeyframe {
    fn data_index(&self) -> u32 {
        self.data_index
    }
    fn pre_index(&self) -> u32 {
        self.pre_index
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MorphMotion {
    pub names: Vec<String>,
    pub init_frames: Vec<MorphKeyframe>,
    pub key_frames: Vec<MorphKeyframe>,
}

/// Camera keyframes are a flat list without chain links.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraKeyframe {
    pub frame: i32,
    pub eye: Vec3,
    /// Euler angles in radians.
    pub rotation: Vec3,
    pub distance: f32,
    pub fov: f32,
    pub interpolation_x: [u8; 4],
    pub interpolation_y: [u8; 4],
    pub interpolation_z: [u8; 4],
    pub interpolation_rotation: [u8; 4],
    pub interpolation_distance: [u8; 4],
    pub interpolation_angleview: [u8; 4],
}

/// Predecessor of a chained record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Predecessor {
    /// Initial frame of this target.
    Initial(usize),
    /// Record at this position in the key frame list.
    Key(usize),
}

/// Result of the two resolution passes over one record list.
#[derive(Clone, Debug)]
pub struct ChainIndex {
    targets: usize,
    positions: HashMap<u32, usize>,
    owners: Vec<usize>,
}

impl ChainIndex {
    /// Index `records` by `data_index` and find the target each record animates.
    ///
    /// Walks are bounded by the record count; a longer walk means the chain
    /// loops and is reported as `UnterminatedChain`.
    pub fn build<R: ChainRecord>(records: &[R], targets: usize) -> Result<Self, ResolveError> {
        let mut positions = HashMap::with_capacity(records.len());
        for (pos, rec) in records.iter().enumerate() {
            if positions.insert(rec.data_index(), pos).is_some() {
                return Err(ResolveError::DuplicateDataIndex {
                    data_index: rec.data_index(),
                });
            }
        }

        let limit = records.len();
        let mut owners: Vec<Option<usize>> = vec![None; records.len()];
        let mut path = Vec::new();
        for start in 0..records.len() {
            if owners[start].is_some() {
                continue;
            }
            path.clear();
            let mut cur = start;
            let owner = loop {
                if path.len() >= limit {
                    return Err(ResolveError::UnterminatedChain {
                        data_index: records[start].data_index(),
                        limit,
                    });
                }
                path.push(cur);
                let pre = records[cur].pre_index();
                if (pre as usize) < targets {
                    break pre as usize;
                }
                let Some(&next) = positions.get(&pre) else {
                    return Err(ResolveError::DanglingPreIndex {
                        data_index: records[cur].data_index(),
                        pre_index: pre,
                    });
                };
                if let Some(owner) = owners[next] {
                    break owner;
                }
                cur = next;
            };
            for &pos in &path {
                owners[pos] = Some(owner);
            }
        }

        Ok(Self {
            targets,
            positions,
            owners: owners.into_iter().flatten().collect(),
        })
    }

    /// Target animated by the record at `pos`.
    #[inline]
    pub fn owner(&self, pos: usize) -> usize {
        self.owners[pos]
    }

    /// Direct predecessor of the record at `pos` (one link, not the chain root).
    pub fn predecessor<R: ChainRecord>(&self, records: &[R], pos: usize) -> Predecessor {
        let pre = records[pos].pre_index();
        if (pre as usize) < self.targets {
            return Predecessor::Initial(pre as usize);
        }
        // build() proved every non-initial pre_index is present
        Predecessor::Key(self.positions.get(&pre).copied().unwrap_or(pos))
    }

    /// Number of records owned by each target.
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.targets];
        for &owner in &self.owners {
            counts[owner] += 1;
        }
        counts
    }
}

/// Converts decoded motion records into clip sets.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyframeResolver {
    pub fps: f32,
    pub rotation_substeps: u32,
    pub max_segment_samples: usize,
}

impl Default for KeyframeResolver {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[derive(Default)]
struct BoneChannels {
    position: [Vec<Keyframe<f32>>; 3],
    euler: [Vec<Keyframe<f32>>; 3],
}

impl BoneChannels {
    fn with_capacity(keys: usize, substeps: usize, cap: usize) -> Self {
        let mut ch = Self::default();
        let euler = (keys + 1).saturating_mul(substeps.max(1)).min(cap);
        for axis in 0..3 {
            ch.position[axis].reserve(keys + 1);
            ch.euler[axis].reserve(euler);
        }
        ch
    }

    fn push_position(&mut self, time: f32, key: &BoneKeyframe) {
        let bytes = [key.interpolation_x, key.interpolation_y, key.interpolation_z];
        for (axis, curve) in self.position.iter_mut().enumerate() {
            curve.push(Keyframe::with_interpolator(
                time,
                key.translation[axis],
                Interpolator::from_bytes(bytes[axis]),
            ));
        }
    }

    fn push_euler(&mut self, time: f32, euler: Vec3, interpolator: Option<Interpolator>) {
        for (axis, curve) in self.euler.iter_mut().enumerate() {
            curve.push(Keyframe {
                time,
                value: euler[axis],
                interpolator,
            });
        }
    }

    fn into_clip(self, name: &str) -> Clip<f32> {
        let mut clip = Clip::new(name);
        for (property, keys) in POSITION_CURVES.into_iter().zip(self.position) {
            clip.set_curve(property, Curve::from(keys));
        }
        for (property, keys) in EULER_CURVES.into_iter().zip(self.euler) {
            clip.set_curve(property, Curve::from(keys));
        }
        clip
    }
}

fn unit(q: Quat) -> Quat {
    Quat::from_vec4(Vec4::from(q).try_normalize().unwrap_or(Vec4::W))
}

impl KeyframeResolver {
    pub fn new(cfg: &Config) -> Self {
        Self {
            fps: cfg.effective_source_fps(),
            rotation_substeps: cfg.rotation_substeps,
            max_segment_samples: cfg.max_segment_samples,
        }
    }

    #[inline]
    fn seconds(&self, frame: f32) -> f32 {
        frame / self.fps
    }

    /// One clip per bone, named after it, with `LocalPosition.*` and
    /// `LocalEulerAnglesRaw.*` curves.
    ///
    /// Translation keyframes carry the interpolator of their own record.
    /// Rotation between a record and its predecessor is slerped in
    /// `frame_gap * rotation_substeps` samples eased by the predecessor's
    /// rotation interpolator; the last sample lands on the record's frame.
    /// A segment needing more than `max_segment_samples` fails with
    /// [`ResolveError::FrameGap`].
    pub fn resolve_bones(&self, motion: &BoneMotion) -> Result<ClipSet<f32>, ResolveError> {
        let targets = motion.names.len();
        if motion.init_frames.len() != targets {
            return Err(ResolveError::InitialFrameCount {
                expected: targets,
                found: motion.init_frames.len(),
            });
        }
        let keys = &motion.key_frames;
        let chains = ChainIndex::build(keys, targets)?;
        let substeps = self.rotation_substeps as usize;

        let mut channels: Vec<BoneChannels> = chains
            .counts()
            .into_iter()
            .map(|n| BoneChannels::with_capacity(n, substeps, self.max_segment_samples))
            .collect();

        for (ch, init) in channels.iter_mut().zip(&motion.init_frames) {
            let time = self.seconds(init.frame as f32);
            ch.push_position(time, init);
            ch.push_euler(
                time,
                quat_to_euler(unit(init.rotation)),
                Some(Interpolator::from_bytes(init.interpolation_rotation)),
            );
        }

        for (pos, key) in keys.iter().enumerate() {
            let prev = match chains.predecessor(keys, pos) {
                Predecessor::Initial(target) => &motion.init_frames[target],
                Predecessor::Key(p) => &keys[p],
            };
            let ch = &mut channels[chains.owner(pos)];

            let gap = i64::from(key.frame) - i64::from(prev.frame);
            let samples = self.segment_samples(key.data_index, gap)?;
            let ease = Interpolator::from_bytes(prev.interpolation_rotation);
            if samples == 0 {
                ch.push_euler(
                    self.seconds(key.frame as f32),
                    quat_to_euler(unit(key.rotation)),
                    Some(ease),
                );
            } else {
                let (from, to) = (unit(prev.rotation), unit(key.rotation));
                for j in 1..=samples {
                    let t = j as f32 / samples as f32;
                    let euler = slerp_euler(from, to, ease.ease(t));
                    let frame = prev.frame as f32 + gap as f32 * t;
                    ch.push_euler(self.seconds(frame), euler, None);
                }
            }

            ch.push_position(self.seconds(key.frame as f32), key);
        }

        let clips: Vec<Clip<f32>> = channels
            .into_iter()
            .zip(&motion.names)
            .map(|(ch, name)| ch.into_clip(name))
            .collect();
        log::debug!(
            "resolved {} bone keyframes into {} clips",
            keys.len(),
            clips.len()
        );
        Ok(ClipSet::from(clips))
    }

    /// Rotation sub-samples between two records `gap` frames apart; 0 for a
    /// zero or negative gap.
    fn segment_samples(&self, data_index: u32, gap: i64) -> Result<usize, ResolveError> {
        let frames = u64::try_from(gap).unwrap_or(0);
        frames
            .checked_mul(u64::from(self.rotation_substeps))
            .and_then(|n| usize::try_from(n).ok())
            .filter(|&n| n <= self.max_segment_samples)
            .ok_or(ResolveError::FrameGap {
                data_index,
                gap,
                limit: self.max_segment_samples,
            })
    }

    /// One clip per morph target, named after it, holding a single linear curve
    /// keyed by the same name.
    pub fn resolve_morphs(&self, motion: &MorphMotion) -> Result<ClipSet<f32>, ResolveError> {
        let targets = motion.names.len();
        if motion.init_frames.len() != targets {
            return Err(ResolveError::InitialFrameCount {
                expected: targets,
                found: motion.init_frames.len(),
            });
        }
        let keys = &motion.key_frames;
        let chains = ChainIndex::build(keys, targets)?;

        let mut curves: Vec<Vec<Keyframe<f32>>> = chains
            .counts()
            .into_iter()
            .map(|n| Vec::with_capacity(n + 1))
            .collect();
        for (curve, init) in curves.iter_mut().zip(&motion.init_frames) {
            curve.push(Keyframe::new(self.seconds(init.frame as f32), init.value));
        }
        for (pos, key) in keys.iter().enumerate() {
            curves[chains.owner(pos)].push(Keyframe::new(self.seconds(key.frame as f32), key.value));
        }

        let clips: Vec<Clip<f32>> = curves
            .into_iter()
            .zip(&motion.names)
            .map(|(keys, name)| {
                let mut clip = Clip::new(name.as_str());
                clip.set_curve(name.as_str(), Curve::from(keys));
                clip
            })
            .collect();
        log::debug!(
            "resolved {} morph keyframes into {} clips",
            keys.len(),
            clips.len()
        );
        Ok(ClipSet::from(clips))
    }

    /// Camera clip: eye position, Euler rotation, forward distance and fov.
    /// Each keyframe carries path interpolators from its own control bytes;
    /// the three rotation axes share one set.
    pub fn build_camera_clip(&self, frames: &[CameraKeyframe]) -> Clip<f32> {
        let mut position: [Vec<Keyframe<f32>>; 3] = Default::default();
        let mut euler: [Vec<Keyframe<f32>>; 3] = Default::default();
        let mut distance = Vec::with_capacity(frames.len());
        let mut fov = Vec::with_capacity(frames.len());

        for key in frames {
            let time = self.seconds(key.frame as f32);
            let eye_bytes = [key.interpolation_x, key.interpolation_y, key.interpolation_z];
            let rotation = Interpolator::from_bytes(key.interpolation_rotation);
            for axis in 0..3 {
                position[axis].push(Keyframe::with_interpolator(
                    time,
                    key.eye[axis],
                    Interpolator::from_bytes(eye_bytes[axis]),
                ));
                euler[axis].push(Keyframe::with_interpolator(time, key.rotation[axis], rotation));
            }
            distance.push(Keyframe::with_interpolator(
                time,
                key.distance,
                Interpolator::from_bytes(key.interpolation_distance),
            ));
            fov.push(Keyframe::with_interpolator(
                time,
                key.fov,
                Interpolator::from_bytes(key.interpolation_angleview),
            ));
        }

        let mut clip = Clip::new("camera");
        for (property, keys) in POSITION_CURVES.into_iter().zip(position) {
            clip.set_curve(property, Curve::from(keys));
        }
        for (property, keys) in EULER_CURVES.into_iter().zip(euler) {
            clip.set_curve(property, Curve::from(keys));
        }
        clip.set_curve(TRANSFORM_MOVE, Curve::from(distance));
        clip.set_curve(CAMERA_FOV, Curve::from(fov));
        log::debug!("built camera clip from {} keyframes", frames.len());
        clip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Link(u32, u32);

    impl ChainRecord for Link {
        fn data_index(&self) -> u32 {
            self.0
        }
        fn pre_index(&self) -> u32 {
            self.1
        }
    }

    #[test]
    fn forward_references_reach_initial_frame() {
        // targets 0..2; record 11 -> 12 -> 10 -> target 1
        let records = [Link(11, 12), Link(10, 1), Link(12, 10), Link(13, 0)];
        let chains = ChainIndex::build(&records, 2).unwrap();
        assert_eq!(chains.owner(0), 1);
        assert_eq!(chains.owner(1), 1);
        assert_eq!(chains.owner(2), 1);
        assert_eq!(chains.owner(3), 0);
        assert_eq!(chains.counts(), vec![1, 3]);
        assert_eq!(chains.predecessor(&records, 0), Predecessor::Key(2));
        assert_eq!(chains.predecessor(&records, 1), Predecessor::Initial(1));
    }

    #[test]
    fn cycle_is_reported() {
        let records = [Link(5, 6), Link(6, 5)];
        let err = ChainIndex::build(&records, 2).unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnterminatedChain {
                data_index: 5,
                limit: 2
            }
        );
    }

    #[test]
    fn self_reference_is_reported() {
        let records = [Link(3, 3)];
        assert!(matches!(
            ChainIndex::build(&records, 1),
            Err(ResolveError::UnterminatedChain { .. })
        ));
    }

    #[test]
    fn dangling_and_duplicate_indices() {
        assert_eq!(
            ChainIndex::build(&[Link(4, 9)], 1).unwrap_err(),
            ResolveError::DanglingPreIndex {
                data_index: 4,
                pre_index: 9
            }
        );
        assert_eq!(
            ChainIndex::build(&[Link(4, 0), Link(4, 0)], 1).unwrap_err(),
            ResolveError::DuplicateDataIndex { data_index: 4 }
        );
    }
}
