/// Playback states as seen by the audio manager
///
/// Music moves Inactive -> Playing <-> Paused -> Inactive. Sounds are only
/// ever Active or Inactive.

/// State of a music track
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum MusicState {
    /// Not in the active set
    #[default]
    Inactive,

    /// Active and playing
    Playing,

    /// Active but paused; reconciliation leaves it alone
    Paused,
}

impl MusicState {
    /// Check if the track is tracked as active (playing or paused)
    pub fn is_active(&self) -> bool {
        !matches!(self, MusicState::Inactive)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, MusicState::Paused)
    }

    /// Get a human-readable description of the state
    pub fn description(&self) -> &'static str {
        match self {
            MusicState::Inactive => "Inactive",
            MusicState::Playing => "Playing",
            MusicState::Paused => "Paused",
        }
    }
}

/// State of a sound
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SoundState {
    #[default]
    Inactive,
    Active,
}

impl SoundState {
    pub fn is_active(&self) -> bool {
        matches!(self, SoundState::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_music_state_helpers() {
        assert!(!MusicState::Inactive.is_active());
        assert!(MusicState::Playing.is_active());
        assert!(MusicState::Paused.is_active());
        assert!(MusicState::Paused.is_paused());
        assert_eq!(MusicState::default(), MusicState::Inactive);
        assert_eq!(MusicState::Paused.description(), "Paused");
    }

    #[test]
    fn test_sound_state_helpers() {
        assert!(SoundState::Active.is_active());
        assert!(!SoundState::default().is_active());
    }
}
