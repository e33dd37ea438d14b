//! Engine: player ownership, command application, time math and sampling.
//!
//! Methods:
//! - new, add_player / insert_player, update (commands → advance → sample → outputs)
//!
//! A `Player` can also be driven on its own with `advance` + `sample_into`.

use serde::{Deserialize, Serialize};

use crate::accumulate::PoseAccumulator;
use crate::binding::{bind_clip, BoundCurve, TargetRef};
use crate::clip::ClipSet;
use crate::config::Config;
use crate::ids::{IdAllocator, PlayerId};
use crate::inputs::{Inputs, LoopMode, PlayerCommand};
use crate::outputs::{CoreEvent, Outputs};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// A clip set plus the parsed binding of each of its curves.
#[derive(Debug)]
struct BoundSet {
    clips: ClipSet<f32>,
    bindings: Vec<Vec<BoundCurve>>,
}

impl BoundSet {
    fn new(clips: ClipSet<f32>) -> Self {
        let bindings = clips.iter().map(bind_clip).collect();
        Self { clips, bindings }
    }
}

/// Per-frame driver: clip sets, playback state and a time cursor.
#[derive(Debug)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    sets: Vec<BoundSet>,
    state: PlaybackState,
    cursor: f32,
    rate: f32,
    mode: LoopMode,
    duration: f32,
    seek_pending: bool,
}

fn fmod(a: f32, b: f32) -> f32 {
    if b == 0.0 {
        return 0.0;
    }
    let m = a % b;
    if (m < 0.0 && b > 0.0) || (m > 0.0 && b < 0.0) {
        m + b
    } else {
        m
    }
}

/// Reflect t into [0, span] with ping-pong behavior, where period = 2 * span.
fn ping_pong(t: f32, span: f32) -> f32 {
    if span <= 0.0 {
        return 0.0;
    }
    let period = 2.0 * span;
    let m = fmod(t, period);
    if m <= span {
        m
    } else {
        period - m
    }
}

impl Player {
    /// Create a stopped player at time 0 with rate 1.
    pub fn new(name: impl Into<String>, clip_set: ClipSet<f32>) -> Self {
        let mut player = Self {
            id: PlayerId::default(),
            name: name.into(),
            sets: Vec::new(),
            state: PlaybackState::Stopped,
            cursor: 0.0,
            rate: 1.0,
            mode: LoopMode::Once,
            duration: 0.0,
            seek_pending: false,
        };
        player.add_clip_set(clip_set);
        player
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.set_rate(rate);
        self
    }

    /// Attach another clip set; returns its index used in `TargetRef::set`.
    pub fn add_clip_set(&mut self, clip_set: ClipSet<f32>) -> u32 {
        self.duration = self.duration.max(clip_set.duration());
        self.sets.push(BoundSet::new(clip_set));
        (self.sets.len() - 1) as u32
    }

    pub fn clip_set(&self, index: usize) -> Option<&ClipSet<f32>> {
        self.sets.get(index).map(|s| &s.clips)
    }

    pub fn clip_set_count(&self) -> usize {
        self.sets.len()
    }

    /// Start or resume. The cursor is kept.
    pub fn play(&mut self) {
        if self.state != PlaybackState::Playing {
            log::debug!("player {:?} '{}' playing at {}", self.id, self.name, self.cursor);
            self.state = PlaybackState::Playing;
        }
    }

    /// Suspend advancing. The cursor is kept.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            log::debug!("player {:?} '{}' paused at {}", self.id, self.name, self.cursor);
            self.state = PlaybackState::Paused;
        }
    }

    /// Stop and rewind to 0.
    pub fn stop(&mut self) {
        if self.state != PlaybackState::Stopped {
            log::debug!("player {:?} '{}' stopped", self.id, self.name);
        }
        self.state = PlaybackState::Stopped;
        self.cursor = 0.0;
        self.seek_pending = false;
    }

    /// Move the cursor. The next engine tick samples the player even when it is not playing.
    pub fn seek(&mut self, time: f32) {
        self.cursor = if time.is_finite() { time } else { 0.0 };
        if self.mode == LoopMode::Once && self.duration > 0.0 {
            self.cursor = self.cursor.clamp(0.0, self.duration);
        }
        self.seek_pending = true;
    }

    pub fn set_rate(&mut self, rate: f32) {
        if rate.is_finite() {
            self.rate = rate;
        }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.mode = mode;
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.mode
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    /// Latest keyframe time over all attached clip sets.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Cursor mapped into clip time under the loop mode.
    pub fn local_time(&self) -> f32 {
        match self.mode {
            LoopMode::Once => self.cursor,
            LoopMode::Loop => fmod(self.cursor, self.duration),
            LoopMode::PingPong => ping_pong(self.cursor, self.duration),
        }
    }

    /// Advance the cursor by `dt * rate` when playing. Returns true on the tick a
    /// `Once` player reaches an end of its range.
    ///
    /// A `Once` player with zero duration has no range to clamp into: its
    /// cursor keeps advancing and it never reports an end.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.state != PlaybackState::Playing || !dt.is_finite() {
            return false;
        }
        let prev = self.cursor;
        self.cursor += dt * self.rate;
        if self.mode != LoopMode::Once || self.duration <= 0.0 {
            return false;
        }
        self.cursor = self.cursor.clamp(0.0, self.duration);
        let hit_end = self.rate > 0.0 && prev < self.duration && self.cursor >= self.duration;
        let hit_start = self.rate < 0.0 && prev > 0.0 && self.cursor <= 0.0;
        hit_end || hit_start
    }

    /// Evaluate every non-empty curve at the current time and append composed
    /// updates. Curves whose name has no matching property are still emitted;
    /// hosts skip what they cannot set.
    pub fn sample_into(&self, out: &mut Outputs) {
        let t = self.local_time();
        for (set_idx, set) in self.sets.iter().enumerate() {
            for (clip_idx, (clip, bound)) in set.clips.iter().zip(&set.bindings).enumerate() {
                let target = TargetRef {
                    player: self.id,
                    set: set_idx as u32,
                    target: clip_idx as u32,
                };
                let mut acc = PoseAccumulator::new();
                for bc in bound {
                    let Some((_, curve)) = clip.curve_at(bc.curve_idx) else {
                        continue;
                    };
                    if curve.is_empty() {
                        continue;
                    }
                    if let Some(update) = acc.add(&bc.binding, curve.evaluate(t)) {
                        out.push_change(target, update);
                    }
                }
                acc.finalize(|update| out.push_change(target, update));
            }
        }
    }
}

/// Host for many players; one `update` per scheduler tick.
#[derive(Debug)]
pub struct Engine {
    cfg: Config,
    ids: IdAllocator,
    players: Vec<Player>,

    // Per-tick outputs
    outputs: Outputs,
}

impl Engine {
    /// Create a new engine with the given config.
    pub fn new(cfg: Config) -> Self {
        Self {
            outputs: Outputs::with_capacity(cfg.output_capacity, cfg.max_events_per_tick),
            cfg,
            ids: IdAllocator::new(),
            players: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Create a stopped player over `clip_set` using the configured playback rate.
    pub fn add_player(&mut self, name: &str, clip_set: ClipSet<f32>) -> PlayerId {
        let player = Player::new(name, clip_set).with_rate(self.cfg.playback_rate);
        self.insert_player(player)
    }

    /// Take ownership of a prepared player and assign it a fresh id.
    pub fn insert_player(&mut self, mut player: Player) -> PlayerId {
        let pid = self.ids.alloc_player();
        player.id = pid;
        self.players.push(player);
        pid
    }

    pub fn remove_player(&mut self, player: PlayerId) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.id == player)?;
        Some(self.players.remove(idx))
    }

    pub fn player(&self, player: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player)
    }

    pub fn player_mut(&mut self, player: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    fn push_event(&mut self, event: CoreEvent) {
        if self.outputs.events.len() < self.cfg.max_events_per_tick {
            self.outputs.push_event(event);
        } else {
            log::warn!("event budget of {} exceeded; dropped {:?}", self.cfg.max_events_per_tick, event);
        }
    }

    /// Apply player commands, emitting an event for each state transition.
    fn apply_inputs(&mut self, inputs: Inputs) {
        for cmd in inputs.player_cmds {
            let (pid, event) = match cmd {
                PlayerCommand::Play { player } => {
                    let Some(p) = self.player_mut(player) else {
                        continue;
                    };
                    let before = p.state();
                    p.play();
                    let event = match before {
                        PlaybackState::Stopped => Some(CoreEvent::PlaybackStarted { player }),
                        PlaybackState::Paused => Some(CoreEvent::PlaybackResumed { player }),
                        PlaybackState::Playing => None,
                    };
                    (player, event)
                }
                PlayerCommand::Pause { player } => {
                    let Some(p) = self.player_mut(player) else {
                        continue;
                    };
                    let was_playing = p.is_playing();
                    p.pause();
                    (player, was_playing.then_some(CoreEvent::PlaybackPaused { player }))
                }
                PlayerCommand::Stop { player } => {
                    let Some(p) = self.player_mut(player) else {
                        continue;
                    };
                    let was_stopped = p.state() == PlaybackState::Stopped;
                    p.stop();
                    (player, (!was_stopped).then_some(CoreEvent::PlaybackStopped { player }))
                }
                PlayerCommand::Seek { player, time } => {
                    if let Some(p) = self.player_mut(player) {
                        p.seek(time);
                    }
                    (player, None)
                }
                PlayerCommand::SetRate { player, rate } => {
                    if let Some(p) = self.player_mut(player) {
                        p.set_rate(rate);
                    }
                    (player, None)
                }
                PlayerCommand::SetLoopMode { player, mode } => {
                    if let Some(p) = self.player_mut(player) {
                        p.set_loop_mode(mode);
                    }
                    (player, None)
                }
            };
            if let Some(event) = event {
                log::trace!("player {pid:?}: {event:?}");
                self.push_event(event);
            }
        }
    }

    /// Step every player by `dt` seconds with the given inputs and return this
    /// tick's changes and events.
    ///
    /// Playing players are advanced and sampled; a player that was sought this
    /// tick is sampled once even when paused or stopped.
    pub fn update(&mut self, dt: f32, inputs: Inputs) -> &Outputs {
        self.outputs.clear();

        // 1) Apply player commands
        self.apply_inputs(inputs);

        // 2) Advance player cursors
        let mut ended = Vec::new();
        for p in &mut self.players {
            if p.advance(dt) {
                ended.push(CoreEvent::PlaybackEnded {
                    player: p.id,
                    animation_time: p.cursor(),
                });
            }
        }
        for event in ended {
            self.push_event(event);
        }

        // 3) Sample into the shared change list
        for p in &mut self.players {
            if p.is_playing() || p.seek_pending {
                p.sample_into(&mut self.outputs);
                p.seek_pending = false;
            }
        }

        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_pong_reflects() {
        assert_eq!(ping_pong(0.5, 2.0), 0.5);
        assert_eq!(ping_pong(3.0, 2.0), 1.0);
        assert_eq!(ping_pong(4.5, 2.0), 0.5);
        assert_eq!(ping_pong(-0.5, 2.0), 0.5);
    }

    #[test]
    fn fmod_wraps_negative() {
        assert_eq!(fmod(-0.5, 2.0), 1.5);
        assert_eq!(fmod(5.0, 2.0), 1.0);
        assert_eq!(fmod(1.0, 0.0), 0.0);
    }
}
