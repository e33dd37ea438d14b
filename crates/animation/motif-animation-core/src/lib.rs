//! Motif Animation Core (engine-agnostic)
//!
//! Keyframe curves, clips and clip sets, the motion-record resolver that builds
//! them from decoded files, and an engine that plays them back. Hosts push a
//! delta time and player commands in and receive a batch of property updates
//! addressed by `TargetRef`, which they can forward to a `PropertySink`.

pub mod accumulate;
pub mod baking;
pub mod binding;
pub mod clip;
pub mod config;
pub mod curve;
pub mod engine;
pub mod error;
pub mod ids;
pub mod inputs;
pub mod interp;
pub mod outputs;
pub mod resolver;
pub mod sampling;
pub mod stored_motion;
pub mod transform_anim;
pub mod value;

// Re-exports for consumers (adapters)
pub use baking::{
    bake_clip_set, export_baked_json, BakedClipSet, BakedCurve, BakingConfig, MAX_BAKED_FRAMES,
};
pub use binding::{Axis, Binding, PropertySink, TargetRef};
pub use clip::{Clip, ClipSet};
pub use config::Config;
pub use curve::{Curve, Keyframe};
pub use engine::{Engine, PlaybackState, Player};
pub use error::{MotionError, ResolveError};
pub use ids::PlayerId;
pub use inputs::{Inputs, LoopMode, PlayerCommand};
pub use interp::{Interpolator, PathInterpolator};
pub use outputs::{Change, CoreEvent, Outputs, PropertyUpdate};
pub use resolver::{
    BoneKeyframe, BoneMotion, CameraKeyframe, KeyframeResolver, MorphKeyframe, MorphMotion,
};
pub use stored_motion::{load_motion_json, parse_stored_motion_json, LoadedMotion, StoredMotion};
pub use transform_anim::{TransformAnimation, TransformSample};
pub use value::Animatable;
