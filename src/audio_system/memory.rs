/// Headless playback backend
///
/// Clip and media player implementations that keep their state in memory
/// and advance on demand instead of on an output device. Cloned values share
/// state, so the caller can keep a copy to drive or inspect the playback
/// while a [`Sound`] or [`Music`] handle owns the other.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::assets::AssetProvider;
use super::handle::{AudioClip, MediaPlayer, Music, Sound};

/// Directive received by a memory backend object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Play,
    Pause,
    Stop,
}

#[derive(Debug)]
struct ClipState {
    length: Duration,
    elapsed: Duration,
    playing: bool,
    volume: f64,
    directives: Vec<Directive>,
}

/// One-shot clip that stops on its own once `length` has elapsed
#[derive(Debug, Clone)]
pub struct MemoryClip {
    state: Arc<Mutex<ClipState>>,
}

impl MemoryClip {
    pub fn new(length: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(ClipState {
                length,
                elapsed: Duration::ZERO,
                playing: false,
                volume: 1.0,
                directives: Vec::new(),
            })),
        }
    }

    /// Move playback forward; the clip stops when it runs out
    pub fn advance(&self, delta: Duration) {
        let mut state = self.state.lock();
        if !state.playing {
            return;
        }
        state.elapsed = (state.elapsed + delta).min(state.length);
        if state.elapsed == state.length {
            state.playing = false;
        }
    }

    /// Jump straight to the end of the clip
    pub fn finish(&self) {
        let mut state = self.state.lock();
        state.elapsed = state.length;
        state.playing = false;
    }

    pub fn volume(&self) -> f64 {
        self.state.lock().volume
    }

    pub fn directives(&self) -> Vec<Directive> {
        self.state.lock().directives.clone()
    }
}

impl AudioClip for MemoryClip {
    fn play(&self) {
        let mut state = self.state.lock();
        state.directives.push(Directive::Play);
        // clips restart from the top on every play
        state.elapsed = Duration::ZERO;
        state.playing = !state.length.is_zero();
    }

    fn stop(&self) {
        let mut state = self.state.lock();
        state.directives.push(Directive::Stop);
        state.elapsed = Duration::ZERO;
        state.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    fn set_volume(&self, volume: f64) {
        self.state.lock().volume = volume;
    }
}

/// Status reported by a [`MemoryPlayer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    Ready,
    Playing,
    Paused,
    Stopped,
}

#[derive(Debug)]
struct PlayerState {
    duration: Duration,
    position: Duration,
    status: PlayerStatus,
    volume: f64,
    directives: Vec<Directive>,
}

/// Media player that stays at the end of media once reached.
///
/// Like a real media player it keeps reporting `Playing` with the position
/// pinned at the total duration; detecting that is up to the caller.
#[derive(Debug, Clone)]
pub struct MemoryPlayer {
    state: Arc<Mutex<PlayerState>>,
}

impl MemoryPlayer {
    pub fn new(duration: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(PlayerState {
                duration,
                position: Duration::ZERO,
                status: PlayerStatus::Ready,
                volume: 1.0,
                directives: Vec::new(),
            })),
        }
    }

    /// Move playback forward while playing, clamped to the media length
    pub fn advance(&self, delta: Duration) {
        let mut state = self.state.lock();
        if state.status == PlayerStatus::Playing {
            state.position = (state.position + delta).min(state.duration);
        }
    }

    pub fn seek(&self, position: Duration) {
        let mut state = self.state.lock();
        state.position = position.min(state.duration);
    }

    pub fn status(&self) -> PlayerStatus {
        self.state.lock().status
    }

    pub fn volume(&self) -> f64 {
        self.state.lock().volume
    }

    pub fn directives(&self) -> Vec<Directive> {
        self.state.lock().directives.clone()
    }
}

impl MediaPlayer for MemoryPlayer {
    fn play(&self) {
        let mut state = self.state.lock();
        state.directives.push(Directive::Play);
        if state.position == state.duration {
            state.position = Duration::ZERO;
        }
        state.status = PlayerStatus::Playing;
    }

    fn pause(&self) {
        let mut state = self.state.lock();
        state.directives.push(Directive::Pause);
        if state.status == PlayerStatus::Playing {
            state.status = PlayerStatus::Paused;
        }
    }

    fn stop(&self) {
        let mut state = self.state.lock();
        state.directives.push(Directive::Stop);
        state.position = Duration::ZERO;
        state.status = PlayerStatus::Stopped;
    }

    fn current_time(&self) -> Duration {
        self.state.lock().position
    }

    fn total_duration(&self) -> Duration {
        self.state.lock().duration
    }

    fn set_volume(&self, volume: f64) {
        self.state.lock().volume = volume;
    }
}

/// Asset provider over memory clips
#[derive(Debug, Clone)]
pub struct MemoryAssets {
    notification_clip: MemoryClip,
    notification: Sound,
}

impl MemoryAssets {
    /// Length given to the built-in notification clip
    pub const NOTIFICATION_LENGTH: Duration = Duration::from_millis(500);

    pub fn new() -> Self {
        let clip = MemoryClip::new(Self::NOTIFICATION_LENGTH);
        Self {
            notification: Sound::new("notification", clip.clone()),
            notification_clip: clip,
        }
    }

    /// The clip behind the notification sound
    pub fn notification_clip(&self) -> &MemoryClip {
        &self.notification_clip
    }

    pub fn sound(name: &str, length: Duration) -> (Sound, MemoryClip) {
        let clip = MemoryClip::new(length);
        (Sound::new(name, clip.clone()), clip)
    }

    pub fn music(name: &str, duration: Duration) -> (Music, MemoryPlayer) {
        let player = MemoryPlayer::new(duration);
        (Music::new(name, player.clone()), player)
    }
}

impl Default for MemoryAssets {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetProvider for MemoryAssets {
    fn notification_sound(&self) -> Sound {
        self.notification.clone()
    }
}
