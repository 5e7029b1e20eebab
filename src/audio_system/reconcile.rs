/// Per-tick reconciliation
///
/// Evicts handles that finished on their own. This is the only path by which
/// naturally finished tracks and one-shot sounds leave their registries
/// without an explicit stop.

use super::handle::{HandleId, Music, Sound};
use super::registry::{PlaybackRegistry, Playable};
use super::volume::VolumeParameter;

/// What one reconciliation pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Tracks flagged stopped because they sat at end of media
    pub finished_music: usize,
    pub evicted_sounds: Vec<HandleId>,
    pub evicted_music: Vec<HandleId>,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.finished_music == 0 && self.evicted_sounds.is_empty() && self.evicted_music.is_empty()
    }
}

/// Run both reconciliation passes.
///
/// End-of-media detection must run before eviction so a track that finished
/// since the last tick leaves in this same tick. Paused tracks are never
/// stopped here and so stay active.
pub fn reconcile(
    sounds: &mut PlaybackRegistry<Sound>,
    music: &mut PlaybackRegistry<Music>,
    sound_volume: &VolumeParameter,
    music_volume: &VolumeParameter,
) -> ReconcileReport {
    let finished_music = music.mark_finished();

    let evicted_sounds = sounds
        .evict_done(sound_volume)
        .iter()
        .map(Playable::id)
        .collect();
    let evicted_music = music
        .evict_done(music_volume)
        .iter()
        .map(Playable::id)
        .collect();

    ReconcileReport {
        finished_music,
        evicted_sounds,
        evicted_music,
    }
}
