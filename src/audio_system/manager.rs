/// Audio manager
///
/// Tracks active sounds and music, owns the two global volumes and saves
/// them to the user profile.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::AudioSettings;
use crate::error::ProfileError;
use crate::messaging::{Event, EventBus, EventKind, SubscriberId};
use crate::profile::UserProfile;

use super::assets::AssetProvider;
use super::handle::{Music, Sound};
use super::persistence::{ProfileSavable, VolumeSettings};
use super::reconcile::{reconcile, ReconcileReport};
use super::registry::PlaybackRegistry;
use super::state::{MusicState, SoundState};
use super::volume::VolumeParameter;

/// Bus handlers registered by [`AudioManager::attach`]
struct Attachment {
    bus: EventBus,
    subscriptions: Vec<SubscriberId>,
}

/// Audio manager
///
/// All operations take `&self`; the registries are guarded so the manager
/// can be shared between the thread publishing update events and callers
/// requesting playback.
pub struct AudioManager {
    sounds: Mutex<PlaybackRegistry<Sound>>,
    music: Mutex<PlaybackRegistry<Music>>,
    music_volume: VolumeParameter,
    sound_volume: VolumeParameter,
    notifications_enabled: AtomicBool,
    attachment: Mutex<Option<Attachment>>,
}

impl AudioManager {
    /// Create a detached manager with default volumes
    pub fn new() -> Self {
        Self::with_settings(&AudioSettings::default())
    }

    /// Create a detached manager with the configured initial volumes
    pub fn with_settings(settings: &AudioSettings) -> Self {
        Self {
            sounds: Mutex::new(PlaybackRegistry::new()),
            music: Mutex::new(PlaybackRegistry::new()),
            music_volume: VolumeParameter::new("music", settings.music_volume),
            sound_volume: VolumeParameter::new("sound", settings.sound_volume),
            notifications_enabled: AtomicBool::new(settings.play_notification_sound),
            attachment: Mutex::new(None),
        }
    }

    /// Create a manager and register one handler per event kind on `bus`.
    ///
    /// Handlers hold a weak reference, so dropping the returned `Arc` both
    /// stops event processing and removes the handlers.
    pub fn attach(
        bus: &EventBus,
        assets: &dyn AssetProvider,
        settings: &AudioSettings,
    ) -> Arc<Self> {
        let manager = Arc::new(Self::with_settings(settings));
        let notification = assets.notification_sound();

        let weak = Arc::downgrade(&manager);
        let update = bus.add_handler(EventKind::Update, move |_| {
            if let Some(manager) = weak.upgrade() {
                manager.on_update();
            }
            Ok(())
        });

        let weak = Arc::downgrade(&manager);
        let notify = bus.add_handler(EventKind::Notification, move |_| {
            if let Some(manager) = weak.upgrade() {
                manager.on_notification(&notification);
            }
            Ok(())
        });

        let weak = Arc::downgrade(&manager);
        let save = bus.add_handler(EventKind::Save, move |event| {
            if let (Some(manager), Event::Save { profile }) = (weak.upgrade(), event) {
                manager.save(&mut profile.write());
            }
            Ok(())
        });

        let weak = Arc::downgrade(&manager);
        let load = bus.add_handler(EventKind::Load, move |event| {
            if let (Some(manager), Event::Load { profile }) = (weak.upgrade(), event) {
                manager.load(&profile.read())?;
            }
            Ok(())
        });

        *manager.attachment.lock() = Some(Attachment {
            bus: bus.clone(),
            subscriptions: vec![update, notify, save, load],
        });

        tracing::info!("Service [AudioManager] initialized");
        manager
    }

    /// Remove the bus handlers registered by [`attach`](Self::attach)
    pub fn detach(&self) {
        if let Some(attachment) = self.attachment.lock().take() {
            for id in attachment.subscriptions {
                attachment.bus.unsubscribe(id);
            }
            tracing::info!("Service [AudioManager] detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.lock().is_some()
    }

    // Volume

    pub fn music_volume(&self) -> f64 {
        self.music_volume.get()
    }

    pub fn set_music_volume(&self, volume: f64) {
        self.music_volume.set(volume);
    }

    pub fn sound_volume(&self) -> f64 {
        self.sound_volume.get()
    }

    pub fn set_sound_volume(&self, volume: f64) {
        self.sound_volume.set(volume);
    }

    /// Global music volume parameter
    pub fn music_volume_parameter(&self) -> &VolumeParameter {
        &self.music_volume
    }

    /// Global sound volume parameter
    pub fn sound_volume_parameter(&self) -> &VolumeParameter {
        &self.sound_volume
    }

    // Sounds

    /// Play a sound, adding it to the active set if needed
    pub fn play_sound(&self, sound: &Sound) {
        tracing::debug!("Playing sound {} ({})", sound.name(), sound.id());
        self.sounds.lock().play(sound, &self.sound_volume);
    }

    /// Stop an active sound; inactive sounds are ignored
    pub fn stop_sound(&self, sound: &Sound) {
        self.sounds.lock().stop(sound, &self.sound_volume);
    }

    pub fn stop_all_sounds(&self) {
        let stopped = self.sounds.lock().stop_all(&self.sound_volume);
        tracing::debug!("Stopped all sounds ({})", stopped);
    }

    // Music

    /// Play a track from its current position, adding it to the active set
    pub fn play_music(&self, music: &Music) {
        tracing::debug!("Playing music {} ({})", music.name(), music.id());
        self.music.lock().play(music, &self.music_volume);
    }

    /// Pause an active track. It can then be restarted by [`resume_music`](Self::resume_music).
    pub fn pause_music(&self, music: &Music) {
        self.music.lock().pause(music);
    }

    /// Resume a paused active track
    pub fn resume_music(&self, music: &Music) {
        self.music.lock().resume(music);
    }

    /// Stop an active track. It cannot be resumed; it needs
    /// [`play_music`](Self::play_music) again.
    pub fn stop_music(&self, music: &Music) {
        self.music.lock().stop(music, &self.music_volume);
    }

    pub fn pause_all_music(&self) {
        let paused = self.music.lock().pause_all();
        tracing::debug!("Paused all music ({})", paused);
    }

    pub fn resume_all_music(&self) {
        let resumed = self.music.lock().resume_all();
        tracing::debug!("Resumed all music ({})", resumed);
    }

    /// Stop every active track
    pub fn stop_all_music(&self) {
        let mut music = self.music.lock();
        tracing::debug!("Stopping all music. Active music size: {}", music.len());
        music.stop_all(&self.music_volume);
    }

    // Events

    /// Reconcile the active sets; called once per update event
    pub fn on_update(&self) -> ReconcileReport {
        let mut sounds = self.sounds.lock();
        let mut music = self.music.lock();
        let report = reconcile(&mut sounds, &mut music, &self.sound_volume, &self.music_volume);

        if !report.is_empty() {
            tracing::debug!(
                "Reconciled: {} finished, {} sounds and {} music evicted",
                report.finished_music,
                report.evicted_sounds.len(),
                report.evicted_music.len()
            );
        }
        report
    }

    /// Play the notification sound unless notifications are muted
    pub fn on_notification(&self, notification: &Sound) {
        if self.notifications_enabled() {
            self.play_sound(notification);
        }
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled.load(Ordering::Relaxed)
    }

    pub fn set_notifications_enabled(&self, enabled: bool) {
        self.notifications_enabled.store(enabled, Ordering::Relaxed);
    }

    // Queries

    pub fn active_sound_count(&self) -> usize {
        self.sounds.lock().len()
    }

    pub fn active_music_count(&self) -> usize {
        self.music.lock().len()
    }

    pub fn is_sound_active(&self, sound: &Sound) -> bool {
        self.sounds.lock().contains(sound)
    }

    pub fn is_music_active(&self, music: &Music) -> bool {
        self.music.lock().contains(music)
    }

    pub fn active_sounds(&self) -> Vec<Sound> {
        self.sounds.lock().handles()
    }

    pub fn active_music(&self) -> Vec<Music> {
        self.music.lock().handles()
    }

    pub fn sound_state(&self, sound: &Sound) -> SoundState {
        if self.is_sound_active(sound) {
            SoundState::Active
        } else {
            SoundState::Inactive
        }
    }

    pub fn music_state(&self, music: &Music) -> MusicState {
        if !self.is_music_active(music) {
            MusicState::Inactive
        } else if music.is_paused() {
            MusicState::Paused
        } else {
            MusicState::Playing
        }
    }
}

impl ProfileSavable for AudioManager {
    fn save(&self, profile: &mut UserProfile) {
        tracing::debug!("Saving data to profile");

        let bundle = VolumeSettings::capture(&self.music_volume, &self.sound_volume).to_bundle();
        bundle.log();
        profile.put_bundle(bundle);
    }

    fn load(&self, profile: &UserProfile) -> Result<(), ProfileError> {
        tracing::debug!("Loading data from profile");

        let settings = VolumeSettings::from_profile(profile)?;
        settings.apply(&self.music_volume, &self.sound_volume);
        Ok(())
    }
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AudioManager {
    fn drop(&mut self) {
        self.detach();
    }
}
