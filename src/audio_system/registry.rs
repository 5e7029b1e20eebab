/// Playback registry
///
/// Tracks the set of active handles of one kind. Membership checks come
/// first in every operation, so stop/pause/resume on a handle that is not
/// active are silent no-ops.

use std::sync::Weak;

use super::handle::{HandleId, Music, Sound};
use super::volume::{VolumeParameter, VolumeSink};

/// A handle the registry can start, stop and reconcile
pub trait Playable: Clone + Send + Sync {
    /// Used in log lines
    const KIND: &'static str;

    fn id(&self) -> HandleId;

    fn volume_sink(&self) -> Weak<dyn VolumeSink>;

    /// Issue the play directive and update handle state
    fn start(&self);

    /// Issue the stop directive and update handle state
    fn halt(&self);

    /// Whether reconciliation should evict this handle
    fn is_done(&self) -> bool;
}

impl Playable for Sound {
    const KIND: &'static str = "sound";

    fn id(&self) -> HandleId {
        Sound::id(self)
    }

    fn volume_sink(&self) -> Weak<dyn VolumeSink> {
        Sound::volume_sink(self)
    }

    fn start(&self) {
        self.clip().play();
    }

    fn halt(&self) {
        self.clip().stop();
    }

    fn is_done(&self) -> bool {
        !self.clip().is_playing()
    }
}

impl Playable for Music {
    const KIND: &'static str = "music";

    fn id(&self) -> HandleId {
        Music::id(self)
    }

    fn volume_sink(&self) -> Weak<dyn VolumeSink> {
        Music::volume_sink(self)
    }

    fn start(&self) {
        self.player().play();
        self.set_paused(false);
        self.set_stopped(false);
    }

    fn halt(&self) {
        self.player().stop();
        self.set_paused(false);
        self.set_stopped(true);
    }

    fn is_done(&self) -> bool {
        self.is_stopped()
    }
}

/// Ordered set of active handles, unique by [`HandleId`]
pub struct PlaybackRegistry<H: Playable> {
    active: Vec<H>,
}

impl<H: Playable> PlaybackRegistry<H> {
    pub fn new() -> Self {
        Self { active: Vec::new() }
    }

    pub fn contains(&self, handle: &H) -> bool {
        self.position(handle.id()).is_some()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &H> {
        self.active.iter()
    }

    /// Snapshot of the active handles in insertion order
    pub fn handles(&self) -> Vec<H> {
        self.active.clone()
    }

    /// Add the handle if absent, then (re)bind its volume and start it
    pub fn play(&mut self, handle: &H, volume: &VolumeParameter) {
        if !self.contains(handle) {
            self.active.push(handle.clone());
            tracing::debug!(
                "Activated {} {} ({} active)",
                H::KIND,
                handle.id(),
                self.active.len()
            );
        }
        volume.bind(handle.id(), handle.volume_sink());
        handle.start();
    }

    /// Remove and stop the handle; returns false if it was not active
    pub fn stop(&mut self, handle: &H, volume: &VolumeParameter) -> bool {
        match self.position(handle.id()) {
            Some(index) => {
                self.active.remove(index);
                volume.unbind(handle.id());
                handle.halt();
                tracing::debug!("Stopped {} {}", H::KIND, handle.id());
                true
            }
            None => false,
        }
    }

    /// Stop every active handle and clear the registry
    pub fn stop_all(&mut self, volume: &VolumeParameter) -> usize {
        let drained: Vec<H> = self.active.drain(..).collect();
        for handle in &drained {
            handle.halt();
            volume.unbind(handle.id());
        }
        drained.len()
    }

    /// Remove every handle reporting done and return them
    pub fn evict_done(&mut self, volume: &VolumeParameter) -> Vec<H> {
        let (done, kept): (Vec<H>, Vec<H>) =
            self.active.drain(..).partition(|handle| handle.is_done());
        self.active = kept;

        for handle in &done {
            volume.unbind(handle.id());
        }
        done
    }

    fn position(&self, id: HandleId) -> Option<usize> {
        self.active.iter().position(|handle| handle.id() == id)
    }
}

impl PlaybackRegistry<Music> {
    /// Pause an active track; returns false if it was not active
    pub fn pause(&self, music: &Music) -> bool {
        if !self.contains(music) {
            return false;
        }
        music.player().pause();
        music.set_paused(true);
        true
    }

    /// Resume an active track; returns false if it was not active
    pub fn resume(&self, music: &Music) -> bool {
        if !self.contains(music) {
            return false;
        }
        music.player().play();
        music.set_paused(false);
        true
    }

    pub fn pause_all(&self) -> usize {
        for music in self.iter() {
            music.player().pause();
            music.set_paused(true);
        }
        self.active.len()
    }

    pub fn resume_all(&self) -> usize {
        for music in self.iter() {
            music.player().play();
            music.set_paused(false);
        }
        self.active.len()
    }

    /// Flag every active track sitting at end of media as stopped
    pub fn mark_finished(&self) -> usize {
        let mut finished = 0;
        for music in self.iter().filter(|music| music.has_reached_end()) {
            music.set_stopped(true);
            finished += 1;
        }
        finished
    }
}

impl<H: Playable> Default for PlaybackRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::memory::{Directive, MemoryAssets, PlayerStatus};
    use std::time::Duration;

    fn volume() -> VolumeParameter {
        VolumeParameter::new("test", 0.5)
    }

    #[test]
    fn test_play_is_idempotent_for_membership() {
        let volume = volume();
        let mut sounds = PlaybackRegistry::new();
        let (sound, clip) = MemoryAssets::sound("hit", Duration::from_secs(1));

        sounds.play(&sound, &volume);
        sounds.play(&sound, &volume);

        assert_eq!(sounds.len(), 1);
        assert_eq!(clip.directives(), vec![Directive::Play, Directive::Play]);
        assert!(volume.is_bound(sound.id()));
    }

    #[test]
    fn test_play_binds_volume() {
        let volume = VolumeParameter::new("sound", 0.4);
        let mut sounds = PlaybackRegistry::new();
        let (sound, clip) = MemoryAssets::sound("hit", Duration::from_secs(1));

        sounds.play(&sound, &volume);
        assert_eq!(clip.volume(), 0.4);

        volume.set(0.9);
        assert_eq!(clip.volume(), 0.9);
    }

    #[test]
    fn test_stop_removes_and_unbinds() {
        let volume = volume();
        let mut sounds = PlaybackRegistry::new();
        let (sound, clip) = MemoryAssets::sound("hit", Duration::from_secs(1));

        sounds.play(&sound, &volume);
        assert!(sounds.stop(&sound, &volume));
        assert!(sounds.is_empty());
        assert!(!volume.is_bound(sound.id()));
        assert_eq!(clip.directives(), vec![Directive::Play, Directive::Stop]);

        // second stop is a no-op
        assert!(!sounds.stop(&sound, &volume));
        assert_eq!(clip.directives().len(), 2);
    }

    #[test]
    fn test_stop_non_member_music_keeps_flag() {
        let volume = volume();
        let mut music = PlaybackRegistry::new();
        let (track, player) = MemoryAssets::music("theme", Duration::from_secs(60));

        music.play(&track, &volume);
        music.stop(&track, &volume);
        assert!(track.is_stopped());

        let (other, other_player) = MemoryAssets::music("other", Duration::from_secs(60));
        assert!(!music.stop(&other, &volume));
        assert!(other.is_stopped());
        assert!(other_player.directives().is_empty());
        assert_eq!(player.status(), PlayerStatus::Stopped);
    }

    #[test]
    fn test_play_music_clears_stopped() {
        let volume = volume();
        let mut music = PlaybackRegistry::new();
        let (track, _player) = MemoryAssets::music("theme", Duration::from_secs(60));

        assert!(track.is_stopped());
        music.play(&track, &volume);
        assert!(!track.is_stopped());
        assert!(music.contains(&track));
    }

    #[test]
    fn test_stop_all_drains() {
        let volume = volume();
        let mut music = PlaybackRegistry::new();
        let tracks: Vec<_> = (0..3)
            .map(|i| MemoryAssets::music(&format!("track-{}", i), Duration::from_secs(60)))
            .collect();
        for (track, _) in &tracks {
            music.play(track, &volume);
        }

        assert_eq!(music.stop_all(&volume), 3);
        assert!(music.is_empty());
        assert_eq!(volume.bound_count(), 0);
        for (track, player) in &tracks {
            assert!(track.is_stopped());
            assert_eq!(player.status(), PlayerStatus::Stopped);
        }
    }

    #[test]
    fn test_pause_resume_keep_membership() {
        let volume = volume();
        let mut music = PlaybackRegistry::new();
        let (track, player) = MemoryAssets::music("theme", Duration::from_secs(60));
        music.play(&track, &volume);

        assert!(music.pause(&track));
        assert!(track.is_paused());
        assert!(!track.is_stopped());
        assert!(music.resume(&track));
        assert!(!track.is_paused());

        assert_eq!(music.len(), 1);
        assert_eq!(
            player.directives(),
            vec![Directive::Play, Directive::Pause, Directive::Play]
        );
    }

    #[test]
    fn test_pause_inactive_is_noop() {
        let music: PlaybackRegistry<Music> = PlaybackRegistry::new();
        let (track, player) = MemoryAssets::music("theme", Duration::from_secs(60));

        assert!(!music.pause(&track));
        assert!(!music.resume(&track));
        assert!(player.directives().is_empty());
        assert!(!track.is_paused());
    }

    #[test]
    fn test_pause_all_and_resume_all() {
        let volume = volume();
        let mut music = PlaybackRegistry::new();
        let (a, pa) = MemoryAssets::music("a", Duration::from_secs(60));
        let (b, pb) = MemoryAssets::music("b", Duration::from_secs(60));
        music.play(&a, &volume);
        music.play(&b, &volume);

        assert_eq!(music.pause_all(), 2);
        assert_eq!(pa.status(), PlayerStatus::Paused);
        assert_eq!(pb.status(), PlayerStatus::Paused);

        assert_eq!(music.resume_all(), 2);
        assert_eq!(pa.status(), PlayerStatus::Playing);
        assert_eq!(music.len(), 2);
    }

    #[test]
    fn test_mark_finished_uses_exact_end() {
        let volume = volume();
        let mut music = PlaybackRegistry::new();
        let (done, done_player) = MemoryAssets::music("done", Duration::from_secs(10));
        let (almost, almost_player) = MemoryAssets::music("almost", Duration::from_secs(10));
        music.play(&done, &volume);
        music.play(&almost, &volume);

        done_player.advance(Duration::from_secs(10));
        almost_player.advance(Duration::from_millis(9_999));

        assert_eq!(music.mark_finished(), 1);
        assert!(done.is_stopped());
        assert!(!almost.is_stopped());
    }

    #[test]
    fn test_evict_done_keeps_order() {
        let volume = volume();
        let mut sounds = PlaybackRegistry::new();
        let (a, _) = MemoryAssets::sound("a", Duration::from_secs(1));
        let (b, clip_b) = MemoryAssets::sound("b", Duration::from_secs(1));
        let (c, _) = MemoryAssets::sound("c", Duration::from_secs(1));
        for sound in [&a, &b, &c] {
            sounds.play(sound, &volume);
        }

        clip_b.finish();
        let evicted = sounds.evict_done(&volume);

        assert_eq!(evicted, vec![b.clone()]);
        let names: Vec<_> = sounds.iter().map(Sound::name).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(sounds.handles(), vec![a, c]);
        assert!(!volume.is_bound(b.id()));
    }
}
