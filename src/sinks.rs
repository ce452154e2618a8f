//! Collaborator interfaces
//!
//! The simulation never draws, plays sound or reads the keyboard itself. It
//! talks to four collaborators:
//!
//! - [`RenderSink`]: receives one draw call per visible entity each frame
//! - [`AudioSink`]: fire-and-forget sound cues
//! - [`UiSink`]: discrete signals for the presentation layer (game over,
//!   victory, restart controls, status bar percentages)
//! - [`InputState`]: four booleans sampled by the player and the throw logic
//!
//! The recording sinks at the bottom of this module share their log through
//! an `Rc`, so a headless driver (or a test) can keep a handle while the world
//! owns the sink.

use crate::sprite::SpriteKey;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// One sprite to draw, in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub sprite: SpriteKey,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Draw flipped about the sprite's own width
    pub mirrored: bool,
}

/// Status bar values, each a percentage in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub health: u8,
    pub bottles: u8,
    pub coins: u8,
    pub boss_health: u8,
}

impl Default for Hud {
    fn default() -> Self {
        Hud {
            health: 100,
            bottles: 0,
            coins: 0,
            boss_health: 100,
        }
    }
}

pub trait RenderSink {
    /// Starts a frame. World draw calls are offset by `camera_x`.
    fn begin_frame(&mut self, camera_x: f32);
    fn draw(&mut self, call: &DrawCall);
    /// Screen-space status overlays, drawn after every entity.
    fn draw_hud(&mut self, hud: &Hud);
    fn end_frame(&mut self);
}

/// Every sound the game can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Walking,
    Jump,
    Snore,
    Hurt,
    Lose,
    LoseJingle,
    Throw,
    Splash,
    Squeeze,
    Coin,
    BottlePickup,
    BossHurt,
    BossMusic,
    MainMusic,
    Win,
}

impl Cue {
    /// Volume the cue is played at.
    pub fn volume(self) -> f32 {
        match self {
            Cue::Walking => 1.0,
            Cue::BottlePickup => 0.5,
            _ => 0.1,
        }
    }

    /// Asset path of the sound file.
    pub fn asset(self) -> &'static str {
        match self {
            Cue::Walking => "audio/walking.mp3",
            Cue::Jump => "audio/jump.mp3",
            Cue::Snore => "audio/snore.mp3",
            Cue::Hurt => "audio/hurtSound.mp3",
            Cue::Lose => "audio/loseSound.mp3",
            Cue::LoseJingle => "audio/loseSound2.mp3",
            Cue::Throw => "audio/throwBottle.mp3",
            Cue::Splash => "audio/brokenBottle.mp3",
            Cue::Squeeze => "audio/squeeze.mp3",
            Cue::Coin => "audio/coin.mp3",
            Cue::BottlePickup => "audio/collectBottleSound2.mp3",
            Cue::BossHurt => "audio/endbossHurtSound.mp3",
            Cue::BossMusic => "audio/endbossTimeSound.mp3",
            Cue::MainMusic => "audio/mainMusik.mp3",
            Cue::Win => "audio/winningSound2.mp3",
        }
    }
}

pub trait AudioSink {
    /// Plays a cue once. Never waits for completion.
    fn play(&mut self, cue: Cue, volume: f32);
    /// Starts a cue looping until `stop()`.
    fn play_looped(&mut self, cue: Cue, volume: f32);
    fn stop(&mut self, cue: Cue);
}

/// Which status bar a percentage update is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusBar {
    Health,
    Bottles,
    Coins,
    BossHealth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiSignal {
    GameOver,
    Victory,
    RestartControls,
    /// Status bar percentage, always 0..=100
    Status(StatusBar, u8),
}

pub trait UiSink {
    fn signal(&mut self, signal: UiSignal);
}

/// Input flags sampled each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Throw
    pub up: bool,
}

/// Maps a percentage to one of the six bar images (0, 20, ..., 100).
pub fn status_step(percentage: u8) -> usize {
    match percentage {
        100.. => 5,
        80..=99 => 4,
        60..=79 => 3,
        40..=59 => 2,
        20..=39 => 1,
        _ => 0,
    }
}

/// Audio sink that only logs. Used when no audio device is wired up.
///
/// Clones share one mute flag, so a front-end can keep a handle and toggle it
/// while the world owns the sink.
#[derive(Debug, Clone, Default)]
pub struct LogAudio {
    muted: Rc<Cell<bool>>,
}

impl LogAudio {
    pub fn is_muted(&self) -> bool {
        self.muted.get()
    }

    /// Flips the mute flag and returns the new value.
    pub fn toggle_mute(&self) -> bool {
        self.muted.set(!self.muted.get());
        self.muted.get()
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: Cue, volume: f32) {
        if !self.is_muted() {
            log::trace!("play {:?} at {:.2}", cue, volume);
        }
    }

    fn play_looped(&mut self, cue: Cue, volume: f32) {
        if !self.is_muted() {
            log::debug!("loop {:?} at {:.2}", cue, volume);
        }
    }

    fn stop(&mut self, cue: Cue) {
        log::debug!("stop {:?}", cue);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioEvent {
    Play(Cue),
    Loop(Cue),
    Stop(Cue),
}

/// Audio sink that records every request.
#[derive(Debug, Clone, Default)]
pub struct AudioLog {
    events: Rc<RefCell<Vec<AudioEvent>>>,
}

impl AudioLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AudioEvent> {
        self.events.borrow().clone()
    }

    /// Number of one-shot plays of `cue`.
    pub fn plays(&self, cue: Cue) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| **event == AudioEvent::Play(cue))
            .count()
    }
}

impl AudioSink for AudioLog {
    fn play(&mut self, cue: Cue, _volume: f32) {
        self.events.borrow_mut().push(AudioEvent::Play(cue));
    }

    fn play_looped(&mut self, cue: Cue, _volume: f32) {
        self.events.borrow_mut().push(AudioEvent::Loop(cue));
    }

    fn stop(&mut self, cue: Cue) {
        self.events.borrow_mut().push(AudioEvent::Stop(cue));
    }
}

/// UI sink that records every signal; the SDL front-end drains it each frame.
#[derive(Debug, Clone, Default)]
pub struct SignalLog {
    signals: Rc<RefCell<Vec<UiSignal>>>,
}

impl SignalLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> Vec<UiSignal> {
        self.signals.borrow().clone()
    }

    pub fn drain(&self) -> Vec<UiSignal> {
        self.signals.borrow_mut().drain(..).collect()
    }

    pub fn count(&self, signal: UiSignal) -> usize {
        self.signals.borrow().iter().filter(|s| **s == signal).count()
    }

    /// Every percentage reported for one status bar, in order.
    pub fn status_history(&self, bar: StatusBar) -> Vec<u8> {
        self.signals
            .borrow()
            .iter()
            .filter_map(|signal| match signal {
                UiSignal::Status(b, value) if *b == bar => Some(*value),
                _ => None,
            })
            .collect()
    }
}

impl UiSink for SignalLog {
    fn signal(&mut self, signal: UiSignal) {
        log::debug!("ui signal {:?}", signal);
        self.signals.borrow_mut().push(signal);
    }
}

/// Render sink that keeps the draw calls of the last frame.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    pub camera_x: f32,
    pub calls: Vec<DrawCall>,
    pub hud: Option<Hud>,
    pub frames: usize,
}

impl RenderSink for FrameRecorder {
    fn begin_frame(&mut self, camera_x: f32) {
        self.camera_x = camera_x;
        self.calls.clear();
        self.hud = None;
    }

    fn draw(&mut self, call: &DrawCall) {
        self.calls.push(call.clone());
    }

    fn draw_hud(&mut self, hud: &Hud) {
        self.hud = Some(*hud);
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mute_flag_is_shared() {
        let audio = LogAudio::default();
        let handle = audio.clone();
        assert!(handle.toggle_mute());
        assert!(audio.is_muted());
    }

    #[test]
    fn test_status_step_thresholds() {
        assert_eq!(status_step(0), 0);
        assert_eq!(status_step(19), 0);
        assert_eq!(status_step(20), 1);
        assert_eq!(status_step(59), 2);
        assert_eq!(status_step(80), 4);
        assert_eq!(status_step(100), 5);
    }

    #[test]
    fn test_audio_log_counts_plays_only() {
        let log = AudioLog::new();
        let mut sink = log.clone();
        sink.play(Cue::Squeeze, 0.1);
        sink.play_looped(Cue::BossMusic, 0.1);
        sink.stop(Cue::BossMusic);

        assert_eq!(log.plays(Cue::Squeeze), 1);
        assert_eq!(log.plays(Cue::BossMusic), 0);
        assert_eq!(log.events().len(), 3);
    }

    #[test]
    fn test_signal_log_status_history() {
        let log = SignalLog::new();
        let mut sink = log.clone();
        sink.signal(UiSignal::Status(StatusBar::BossHealth, 80));
        sink.signal(UiSignal::Status(StatusBar::Health, 95));
        sink.signal(UiSignal::Status(StatusBar::BossHealth, 60));

        assert_eq!(log.status_history(StatusBar::BossHealth), vec![80, 60]);
        assert_eq!(log.drain().len(), 3);
        assert!(log.signals().is_empty());
    }

    #[test]
    fn test_cue_volumes() {
        assert_eq!(Cue::Walking.volume(), 1.0);
        assert_eq!(Cue::BottlePickup.volume(), 0.5);
        assert_eq!(Cue::Squeeze.volume(), 0.1);
    }
}
