pub mod assets;
pub mod handle;
pub mod manager;
pub mod memory;
pub mod persistence;
pub mod reconcile;
pub mod registry;
#[cfg(feature = "rodio-backend")]
pub mod rodio_backend;
pub mod state;
/// Audio system module
///
/// Tracks what is currently playing:
/// - Active one-shot sounds and music tracks, each kept at most once
/// - Global music and sound volumes, bound live to everything active
/// - Per-tick eviction of sounds and tracks that finished on their own
/// - Volume persistence in the user profile
///
/// ## Architecture
///
/// ```text
/// AudioManager
///   ├── PlaybackRegistry<Sound> ──── bound to ── VolumeParameter (sound)
///   ├── PlaybackRegistry<Music> ──── bound to ── VolumeParameter (music)
///   └── EventBus handlers
///       ├── Update       -> reconcile
///       ├── Notification -> play notification sound
///       ├── Save         -> write "audio" bundle
///       └── Load         -> read "audio" bundle
///
/// Sound -> AudioClip   (memory / rodio backend)
/// Music -> MediaPlayer (memory / rodio backend)
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// use audio_system::{AudioManager, MemoryAssets};
///
/// let bus = EventBus::new();
/// let assets = MemoryAssets::new();
/// let manager = AudioManager::attach(&bus, &assets, &AudioSettings::default());
///
/// let (theme, _player) = MemoryAssets::music("theme", Duration::from_secs(90));
/// manager.play_music(&theme);
/// manager.set_music_volume(0.8);
///
/// // Once per frame
/// bus.publish(Event::Update { tpf: 1.0 / 60.0 })?;
/// ```
pub mod volume;

// Re-export commonly used types
pub use assets::AssetProvider;
pub use handle::{AudioClip, HandleId, MediaPlayer, Music, Sound};
pub use manager::AudioManager;
pub use memory::{MemoryAssets, MemoryClip, MemoryPlayer};
pub use persistence::{ProfileSavable, VolumeSettings};
pub use reconcile::ReconcileReport;
pub use registry::{PlaybackRegistry, Playable};
pub use state::{MusicState, SoundState};
pub use volume::{ObserverId, VolumeParameter, VolumeSink, DEFAULT_VOLUME};

#[cfg(feature = "rodio-backend")]
pub use rodio_backend::{RodioAssets, RodioClip, RodioMediaPlayer, RodioOutput};
