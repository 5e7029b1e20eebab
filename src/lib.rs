//! In-process audio playback manager.
//!
//! Tracks which sounds and music tracks are active, owns the global music
//! and sound volumes, evicts finished playback once per update event and
//! saves the volumes to the user profile.

pub mod audio_system;
pub mod config;
pub mod error;
pub mod logging;
pub mod messaging;
pub mod profile;

pub use audio_system::{
    AssetProvider, AudioClip, AudioManager, MediaPlayer, Music, MusicState, ProfileSavable,
    Sound, SoundState, VolumeParameter,
};
pub use config::Config;
pub use error::{AudioError, ConfigError, ProfileError};
pub use messaging::{Event, EventBus, EventKind};
pub use profile::{Bundle, SharedProfile, UserProfile};
