/// Volume persistence
///
/// Saves and loads the two global volumes to the "audio" profile bundle.
/// Only the volumes persist; active playback is never saved.

use crate::error::ProfileError;
use crate::profile::{Bundle, UserProfile};

use super::volume::VolumeParameter;

/// Bundle holding the audio settings
pub const AUDIO_BUNDLE: &str = "audio";
pub const MUSIC_VOLUME_KEY: &str = "musicVolume";
pub const SOUND_VOLUME_KEY: &str = "soundVolume";

/// A service that keeps settings in the user profile
pub trait ProfileSavable {
    fn save(&self, profile: &mut UserProfile);

    /// Restore settings; on error nothing is changed
    fn load(&self, profile: &UserProfile) -> Result<(), ProfileError>;
}

/// Persisted volume levels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeSettings {
    pub music_volume: f64,
    pub sound_volume: f64,
}

impl VolumeSettings {
    /// Read the current levels of both parameters
    pub fn capture(music: &VolumeParameter, sound: &VolumeParameter) -> Self {
        Self {
            music_volume: music.get(),
            sound_volume: sound.get(),
        }
    }

    /// Set both parameters
    pub fn apply(&self, music: &VolumeParameter, sound: &VolumeParameter) {
        music.set(self.music_volume);
        sound.set(self.sound_volume);
    }

    pub fn to_bundle(&self) -> Bundle {
        let mut bundle = Bundle::new(AUDIO_BUNDLE);
        bundle.put(MUSIC_VOLUME_KEY, self.music_volume);
        bundle.put(SOUND_VOLUME_KEY, self.sound_volume);
        bundle
    }

    /// Read both levels; fails if the bundle or either key is missing
    pub fn from_profile(profile: &UserProfile) -> Result<Self, ProfileError> {
        let bundle = profile.get_bundle(AUDIO_BUNDLE)?;
        bundle.log();

        Ok(Self {
            music_volume: bundle.get(MUSIC_VOLUME_KEY)?,
            sound_volume: bundle.get(SOUND_VOLUME_KEY)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_layout() {
        let settings = VolumeSettings {
            music_volume: 0.73,
            sound_volume: 0.1,
        };
        let bundle = settings.to_bundle();

        assert_eq!(bundle.name(), "audio");
        assert_eq!(bundle.get::<f64>("musicVolume").unwrap(), 0.73);
        assert_eq!(bundle.get::<f64>("soundVolume").unwrap(), 0.1);
        assert_eq!(bundle.len(), 2);
    }

    #[test]
    fn test_from_profile_exact() {
        let mut profile = UserProfile::new("demo", "1.0");
        let settings = VolumeSettings {
            music_volume: 0.73,
            sound_volume: 0.1,
        };
        profile.put_bundle(settings.to_bundle());

        assert_eq!(VolumeSettings::from_profile(&profile).unwrap(), settings);
    }

    #[test]
    fn test_from_profile_missing_key() {
        let mut profile = UserProfile::new("demo", "1.0");
        let mut bundle = Bundle::new(AUDIO_BUNDLE);
        bundle.put(MUSIC_VOLUME_KEY, 0.2);
        profile.put_bundle(bundle);

        let err = VolumeSettings::from_profile(&profile).unwrap_err();
        assert!(matches!(err, ProfileError::MissingKey { ref key, .. } if key == SOUND_VOLUME_KEY));
    }

    #[test]
    fn test_capture_and_apply() {
        let music = VolumeParameter::new("music", 0.5);
        let sound = VolumeParameter::new("sound", 0.5);
        VolumeSettings {
            music_volume: 0.9,
            sound_volume: 0.3,
        }
        .apply(&music, &sound);

        let captured = VolumeSettings::capture(&music, &sound);
        assert_eq!(captured.music_volume, 0.9);
        assert_eq!(captured.sound_volume, 0.3);
    }
}
