//! Load-time error types. Playback itself cannot fail once motion is resolved.

use thiserror::Error;

/// Failures while flattening keyframe chains into clip sets.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Initial frames and target names differ in length
    #[error("expected {expected} initial frames (one per target), found {found}")]
    InitialFrameCount { expected: usize, found: usize },

    /// Two records share a data_index
    #[error("data_index {data_index} appears on more than one keyframe")]
    DuplicateDataIndex { data_index: u32 },

    /// pre_index names neither a target nor a record
    #[error("keyframe {data_index} references pre_index {pre_index}, which is neither a target nor a keyframe")]
    DanglingPreIndex { data_index: u32, pre_index: u32 },

    /// Chain walk exceeded the record count (a cycle)
    #[error("pre_index chain starting at keyframe {data_index} did not reach an initial frame within {limit} steps")]
    UnterminatedChain { data_index: u32, limit: usize },

    /// Frame gap to the predecessor needs more rotation samples than allowed
    #[error("keyframe {data_index} is {gap} frames after its predecessor, more than {limit} rotation samples")]
    FrameGap {
        data_index: u32,
        gap: i64,
        limit: usize,
    },
}

/// Failures while reading motion records from JSON.
#[derive(Debug, Error)]
pub enum MotionError {
    #[error("motion json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid {field} in {section} record {index}: {reason}")]
    Invalid {
        section: &'static str,
        index: usize,
        field: &'static str,
        reason: &'static str,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
