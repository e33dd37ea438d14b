//! Input contracts for the core engine.
//!
//! Hosts build and pass these into Engine::update() each tick. Commands apply
//! before time advances, so they take effect on the same tick.

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Inputs {
    /// Player-level commands applied before stepping.
    #[serde(default)]
    pub player_cmds: Vec<PlayerCommand>,
}

impl Inputs {
    pub fn with_command(cmd: PlayerCommand) -> Self {
        Self {
            player_cmds: vec![cmd],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum PlayerCommand {
    Play { player: PlayerId },
    Pause { player: PlayerId },
    Stop { player: PlayerId },
    Seek { player: PlayerId, time: f32 },
    SetRate { player: PlayerId, rate: f32 },
    SetLoopMode { player: PlayerId, mode: LoopMode },
}

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum LoopMode {
    /// Play to the end and hold the last pose.
    #[default]
    Once,
    Loop,
    PingPong,
}
