/// Playback handles
///
/// [`Sound`] and [`Music`] wrap a playback capability supplied by a backend.
/// Both are cheap to clone; clones share identity, so a registry can hold a
/// handle while the caller keeps using its own copy.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use super::volume::VolumeSink;

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a playback handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl HandleId {
    fn next() -> Self {
        HandleId(NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Build an id from a raw value (ids handed out by handles start at 1)
    pub fn from_raw(raw: u64) -> Self {
        HandleId(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Playback capability behind a [`Sound`]
pub trait AudioClip: Send + Sync {
    fn play(&self);
    fn stop(&self);
    fn is_playing(&self) -> bool;
    /// Set output level (0.0-1.0)
    fn set_volume(&self, volume: f64);
}

/// Playback capability behind a [`Music`] track
pub trait MediaPlayer: Send + Sync {
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    /// Current playback position
    fn current_time(&self) -> Duration;
    /// Length of the media. Once playback reaches the end, `current_time`
    /// reports exactly this value.
    fn total_duration(&self) -> Duration;
    /// Set output level (0.0-1.0)
    fn set_volume(&self, volume: f64);
}

struct SoundInner {
    id: HandleId,
    name: String,
    clip: Box<dyn AudioClip>,
}

impl VolumeSink for SoundInner {
    fn apply_volume(&self, volume: f64) {
        self.clip.set_volume(volume);
    }
}

/// Short one-shot clip
#[derive(Clone)]
pub struct Sound {
    inner: Arc<SoundInner>,
}

impl Sound {
    pub fn new<C>(name: impl Into<String>, clip: C) -> Self
    where
        C: AudioClip + 'static,
    {
        Self::from_boxed(name, Box::new(clip))
    }

    pub fn from_boxed(name: impl Into<String>, clip: Box<dyn AudioClip>) -> Self {
        Self {
            inner: Arc::new(SoundInner {
                id: HandleId::next(),
                name: name.into(),
                clip,
            }),
        }
    }

    pub fn id(&self) -> HandleId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn clip(&self) -> &dyn AudioClip {
        self.inner.clip.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.inner.clip.is_playing()
    }

    pub(crate) fn volume_sink(&self) -> Weak<dyn VolumeSink> {
        let weak: Weak<SoundInner> = Arc::downgrade(&self.inner);
        weak
    }
}

impl PartialEq for Sound {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Sound {}

impl fmt::Debug for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sound")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .finish()
    }
}

struct MusicInner {
    id: HandleId,
    name: String,
    player: Box<dyn MediaPlayer>,
    stopped: AtomicBool,
    paused: AtomicBool,
}

impl VolumeSink for MusicInner {
    fn apply_volume(&self, volume: f64) {
        self.player.set_volume(volume);
    }
}

/// Long-form track with an explicit stopped flag.
///
/// Paused and stopped both report as not playing on most players, so the
/// flag is kept here rather than derived. A new track starts out stopped.
#[derive(Clone)]
pub struct Music {
    inner: Arc<MusicInner>,
}

impl Music {
    pub fn new<P>(name: impl Into<String>, player: P) -> Self
    where
        P: MediaPlayer + 'static,
    {
        Self::from_boxed(name, Box::new(player))
    }

    pub fn from_boxed(name: impl Into<String>, player: Box<dyn MediaPlayer>) -> Self {
        Self {
            inner: Arc::new(MusicInner {
                id: HandleId::next(),
                name: name.into(),
                player,
                stopped: AtomicBool::new(true),
                paused: AtomicBool::new(false),
            }),
        }
    }

    pub fn id(&self) -> HandleId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn player(&self) -> &dyn MediaPlayer {
        self.inner.player.as_ref()
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::Acquire)
    }

    pub fn is_paused(&self) -> bool {
        self.inner.paused.load(Ordering::Acquire)
    }

    /// Whether the player sits at end of media (exact comparison)
    pub fn has_reached_end(&self) -> bool {
        self.inner.player.current_time() == self.inner.player.total_duration()
    }

    pub(crate) fn set_stopped(&self, stopped: bool) {
        self.inner.stopped.store(stopped, Ordering::Release);
    }

    pub(crate) fn set_paused(&self, paused: bool) {
        self.inner.paused.store(paused, Ordering::Release);
    }

    pub(crate) fn volume_sink(&self) -> Weak<dyn VolumeSink> {
        let weak: Weak<MusicInner> = Arc::downgrade(&self.inner);
        weak
    }
}

impl PartialEq for Music {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Music {}

impl fmt::Debug for Music {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Music")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("stopped", &self.is_stopped())
            .field("paused", &self.is_paused())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::memory::{MemoryClip, MemoryPlayer};

    #[test]
    fn test_handle_identity_is_per_handle() {
        let clip = MemoryClip::new(Duration::from_millis(100));
        let a = Sound::new("click", clip.clone());
        let b = Sound::new("click", clip);

        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.id(), a.clone().id());
    }

    #[test]
    fn test_music_starts_stopped() {
        let music = Music::new("theme", MemoryPlayer::new(Duration::from_secs(3)));
        assert!(music.is_stopped());
        assert!(!music.is_paused());
        assert_eq!(music.name(), "theme");
    }

    #[test]
    fn test_has_reached_end() {
        let player = MemoryPlayer::new(Duration::from_secs(2));
        let music = Music::new("theme", player.clone());
        assert!(!music.has_reached_end());

        player.play();
        player.advance(Duration::from_secs(5));
        assert!(music.has_reached_end());
    }

    #[test]
    fn test_volume_sink_forwards_to_clip() {
        let clip = MemoryClip::new(Duration::from_millis(100));
        let sound = Sound::new("click", clip.clone());

        let sink = sound.volume_sink().upgrade().unwrap();
        sink.apply_volume(0.25);
        assert_eq!(clip.volume(), 0.25);
    }

    #[test]
    fn test_handle_id_display() {
        assert_eq!(HandleId::from_raw(42).to_string(), "#42");
        assert_eq!(HandleId::from_raw(42).raw(), 42);
    }
}
