//! JSON intake for already-decoded motion records.
//!
//! Binary motion files are decoded elsewhere; this module reads the decoded
//! keyframe lists from a camelCase JSON document, validates them and hands
//! them to the resolver.

use glam::{Quat, Vec3, Vec4};
use serde::Deserialize;

use crate::clip::{Clip, ClipSet};
use crate::config::Config;
use crate::error::MotionError;
use crate::resolver::{
    BoneKeyframe, BoneMotion, CameraKeyframe, KeyframeResolver, MorphKeyframe, MorphMotion,
};

/// Control bytes used when a record omits them; they decode to a linear ease.
pub const LINEAR_CONTROL_BYTES: [u8; 4] = [0, 127, 0, 127];

/// Validated records of one motion document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoredMotion {
    pub name: String,
    pub bones: BoneMotion,
    pub morphs: MorphMotion,
    pub camera: Vec<CameraKeyframe>,
}

/// A motion document resolved into playable clips.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadedMotion {
    pub name: String,
    /// One clip per bone, in bone-name order.
    pub bones: ClipSet<f32>,
    /// One clip per morph target, in morph-name order.
    pub morphs: ClipSet<f32>,
    pub camera: Option<Clip<f32>>,
}

/// Parse and validate a motion document without resolving it.
pub fn parse_stored_motion_json(s: &str) -> Result<StoredMotion, MotionError> {
    let doc: SmDocument = serde_json::from_str(s)?;

    let bones = match doc.bones {
        Some(b) => BoneMotion {
            init_frames: convert_all("boneInitFrames", b.init_frames, to_bone)?,
            key_frames: convert_all("boneKeyFrames", b.key_frames, to_bone)?,
            names: b.names,
        },
        None => BoneMotion::default(),
    };
    let morphs = match doc.morphs {
        Some(m) => MorphMotion {
            init_frames: convert_all("morphInitFrames", m.init_frames, to_morph)?,
            key_frames: convert_all("morphKeyFrames", m.key_frames, to_morph)?,
            names: m.names,
        },
        None => MorphMotion::default(),
    };
    let camera = convert_all("camera", doc.camera, to_camera)?;

    Ok(StoredMotion {
        name: doc.name,
        bones,
        morphs,
        camera,
    })
}

/// Parse a motion document and resolve it into clip sets.
pub fn load_motion_json(s: &str, cfg: &Config) -> Result<LoadedMotion, MotionError> {
    let stored = parse_stored_motion_json(s)?;
    let resolver = KeyframeResolver::new(cfg);
    let bones = resolver.resolve_bones(&stored.bones)?;
    let morphs = resolver.resolve_morphs(&stored.morphs)?;
    let camera =
        (!stored.camera.is_empty()).then(|| resolver.build_camera_clip(&stored.camera));
    log::debug!(
        "loaded motion '{}': {} bones, {} morphs, camera: {}",
        stored.name,
        bones.len(),
        morphs.len(),
        camera.is_some()
    );
    Ok(LoadedMotion {
        name: stored.name,
        bones,
        morphs,
        camera,
    })
}

fn convert_all<S, T>(
    section: &'static str,
    raw: Vec<S>,
    f: fn(S) -> Result<T, (&'static str, &'static str)>,
) -> Result<Vec<T>, MotionError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, r)| {
            f(r).map_err(|(field, reason)| MotionError::Invalid {
                section,
                index,
                field,
                reason,
            })
        })
        .collect()
}

type FieldResult<T> = Result<T, (&'static str, &'static str)>;

fn finite(field: &'static str, v: f32) -> FieldResult<f32> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err((field, "not a finite number"))
    }
}

fn vec3(field: &'static str, v: [f32; 3]) -> FieldResult<Vec3> {
    let v = Vec3::from_array(v);
    if v.is_finite() {
        Ok(v)
    } else {
        Err((field, "not a finite vector"))
    }
}

fn quat(field: &'static str, v: [f32; 4]) -> FieldResult<Quat> {
    match Vec4::from_array(v).try_normalize() {
        Some(n) => Ok(Quat::from_vec4(n)),
        None => Err((field, "zero-length or non-finite quaternion")),
    }
}

fn to_bone(r: SmBoneKey) -> FieldResult<BoneKeyframe> {
    let ip = r.interpolation.unwrap_or_default();
    Ok(BoneKeyframe {
        frame: r.frame,
        data_index: r.data_index,
        pre_index: r.pre_index,
        translation: vec3("translation", r.translation)?,
        rotation: quat("rotation", r.rotation)?,
        interpolation_x: ip.x,
        interpolation_y: ip.y,
        interpolation_z: ip.z,
        interpolation_rotation: ip.rotation,
    })
}

fn to_morph(r: SmMorphKey) -> FieldResult<MorphKeyframe> {
    Ok(MorphKeyframe {
        frame: r.frame,
        data_index: r.data_index,
        pre_index: r.pre_index,
        value: finite("value", r.value)?,
    })
}

fn to_camera(r: SmCameraKey) -> FieldResult<CameraKeyframe> {
    let ip = r.interpolation.unwrap_or_default();
    Ok(CameraKeyframe {
        frame: r.frame,
        eye: vec3("eye", r.eye)?,
        rotation: vec3("rotation", r.rotation)?,
        distance: finite("distance", r.distance)?,
        fov: finite("fov", r.fov)?,
        interpolation_x: ip.x,
        interpolation_y: ip.y,
        interpolation_z: ip.z,
        interpolation_rotation: ip.rotation,
        interpolation_distance: ip.distance,
        interpolation_angleview: ip.angle_view,
    })
}

// ----- JSON schema (serde) -----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SmDocument {
    #[serde(default)]
    name: String,
    #[serde(default)]
    bones: Option<SmBones>,
    #[serde(default)]
    morphs: Option<SmMorphs>,
    #[serde(default)]
    camera: Vec<SmCameraKey>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SmBones {
    names: Vec<String>,
    init_frames: Vec<SmBoneKey>,
    #[serde(default)]
    key_frames: Vec<SmBoneKey>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SmMorphs {
    names: Vec<String>,
    init_frames: Vec<SmMorphKey>,
    #[serde(default)]
    key_frames: Vec<SmMorphKey>,
}

fn linear_bytes() -> [u8; 4] {
    LINEAR_CONTROL_BYTES
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SmInterpolation {
    #[serde(default = "linear_bytes")]
    x: [u8; 4],
    #[serde(default = "linear_bytes")]
    y: [u8; 4],
    #[serde(default = "linear_bytes")]
    z: [u8; 4],
    #[serde(default = "linear_bytes")]
    rotation: [u8; 4],
    #[serde(default = "linear_bytes")]
    distance: [u8; 4],
    #[serde(default = "linear_bytes")]
    angle_view: [u8; 4],
}

impl Default for SmInterpolation {
    fn default() -> Self {
        Self {
            x: LINEAR_CONTROL_BYTES,
            y: LINEAR_CONTROL_BYTES,
            z: LINEAR_CONTROL_BYTES,
            rotation: LINEAR_CONTROL_BYTES,
            distance: LINEAR_CONTROL_BYTES,
            angle_view: LINEAR_CONTROL_BYTES,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SmBoneKey {
    frame: i32,
    #[serde(default)]
    data_index: u32,
    #[serde(default)]
    pre_index: u32,
    #[serde(default)]
    translation: [f32; 3],
    #[serde(default = "identity_quat")]
    rotation: [f32; 4],
    #[serde(default)]
    interpolation: Option<SmInterpolation>,
}

fn identity_quat() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SmMorphKey {
    frame: i32,
    #[serde(default)]
    data_index: u32,
    #[serde(default)]
    pre_index: u32,
    value: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SmCameraKey {
    frame: i32,
    eye: [f32; 3],
    #[serde(default)]
    rotation: [f32; 3],
    #[serde(default)]
    distance: f32,
    fov: f32,
    #[serde(default)]
    interpolation: Option<SmInterpolation>,
}
