/// Output-device playback backend
///
/// Clip and media player implementations over rodio sinks. Audio data is
/// preloaded into memory and decoded again on every play.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::error::AudioError;

use super::assets::AssetProvider;
use super::handle::{AudioClip, MediaPlayer, Music, Sound};

/// Default output device. Must stay alive (and on its thread) while
/// anything created from it plays.
pub struct RodioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioOutput {
    pub fn try_default() -> Result<Self, AudioError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| AudioError::StreamInitFailed(Box::new(e)))?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    pub fn handle(&self) -> &OutputStreamHandle {
        &self.handle
    }
}

fn read_file(path: &Path) -> Result<Arc<Vec<u8>>, AudioError> {
    if !path.exists() {
        return Err(AudioError::LoadFailed {
            path: path.display().to_string(),
            source: "file not found".into(),
        });
    }

    let data = std::fs::read(path).map_err(|e| AudioError::LoadFailed {
        path: path.display().to_string(),
        source: Box::new(e),
    })?;
    tracing::info!("Preloaded audio file: {} ({} bytes)", path.display(), data.len());
    Ok(Arc::new(data))
}

// Note: We must clone here as rodio's Decoder requires owned data with 'static lifetime
fn decode(data: &Arc<Vec<u8>>) -> Result<Decoder<Cursor<Vec<u8>>>, AudioError> {
    Decoder::new(Cursor::new((**data).clone())).map_err(|e| AudioError::DecodeFailed(Box::new(e)))
}

fn new_sink(handle: &OutputStreamHandle) -> Result<Sink, AudioError> {
    Sink::try_new(handle).map_err(|e| AudioError::StreamInitFailed(Box::new(e)))
}

/// One-shot clip; every play restarts it from the top
pub struct RodioClip {
    handle: OutputStreamHandle,
    data: Arc<Vec<u8>>,
    sink: Mutex<Sink>,
    volume: Mutex<f32>,
}

impl RodioClip {
    pub fn from_file(handle: &OutputStreamHandle, path: &Path) -> Result<Self, AudioError> {
        Self::from_memory(handle, read_file(path)?)
    }

    pub fn from_memory(handle: &OutputStreamHandle, data: Arc<Vec<u8>>) -> Result<Self, AudioError> {
        // Verify the audio can be decoded
        decode(&data)?;

        Ok(Self {
            handle: handle.clone(),
            sink: Mutex::new(new_sink(handle)?),
            data,
            volume: Mutex::new(1.0),
        })
    }
}

impl AudioClip for RodioClip {
    fn play(&self) {
        let source = match decode(&self.data) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Cannot play clip: {}", e);
                return;
            }
        };

        let mut sink = self.sink.lock();
        sink.stop();
        // Clear any queued audio
        if let Ok(fresh) = new_sink(&self.handle) {
            *sink = fresh;
        }
        sink.set_volume(*self.volume.lock());
        sink.append(source);
        sink.play();
    }

    fn stop(&self) {
        self.sink.lock().stop();
    }

    fn is_playing(&self) -> bool {
        !self.sink.lock().empty()
    }

    fn set_volume(&self, volume: f64) {
        let volume = volume as f32;
        *self.volume.lock() = volume;
        self.sink.lock().set_volume(volume);
    }
}

/// Whether `play` must queue the track again instead of unpausing.
///
/// After a stop the old queue is gone even if the sink has not drained yet;
/// after a natural end the sink is empty.
fn needs_fresh_queue(started: bool, empty: bool) -> bool {
    !started || empty
}

/// Long-form track.
///
/// Once the sink drains, the reported position is pinned to the total
/// duration until the track is stopped or played again.
pub struct RodioMediaPlayer {
    handle: OutputStreamHandle,
    data: Arc<Vec<u8>>,
    sink: Mutex<Sink>,
    volume: Mutex<f32>,
    total: Duration,
    started: AtomicBool,
}

impl RodioMediaPlayer {
    pub fn from_file(handle: &OutputStreamHandle, path: &Path) -> Result<Self, AudioError> {
        Self::from_memory(handle, read_file(path)?)
    }

    pub fn from_memory(handle: &OutputStreamHandle, data: Arc<Vec<u8>>) -> Result<Self, AudioError> {
        let decoder = decode(&data)?;
        let total = match decoder.total_duration() {
            Some(total) => total,
            None => {
                // Count samples when the container does not say
                let channels = decoder.channels().max(1) as f64;
                let rate = decoder.sample_rate().max(1) as f64;
                let samples = decoder.count() as f64;
                Duration::from_secs_f64(samples / (channels * rate))
            }
        };

        tracing::debug!("Media player ready ({:.1}s)", total.as_secs_f64());
        Ok(Self {
            handle: handle.clone(),
            sink: Mutex::new(new_sink(handle)?),
            data,
            volume: Mutex::new(1.0),
            total,
            started: AtomicBool::new(false),
        })
    }
}

impl MediaPlayer for RodioMediaPlayer {
    fn play(&self) {
        let mut sink = self.sink.lock();
        if needs_fresh_queue(self.started.load(Ordering::Acquire), sink.empty()) {
            let source = match decode(&self.data) {
                Ok(source) => source,
                Err(e) => {
                    tracing::warn!("Cannot play media: {}", e);
                    return;
                }
            };
            if let Ok(fresh) = new_sink(&self.handle) {
                *sink = fresh;
            }
            sink.set_volume(*self.volume.lock());
            sink.append(source);
        }
        sink.play();
        self.started.store(true, Ordering::Release);
    }

    fn pause(&self) {
        self.sink.lock().pause();
    }

    fn stop(&self) {
        let mut sink = self.sink.lock();
        sink.stop();
        // A stopped sink reports non-empty until the mixer catches up
        if let Ok(fresh) = new_sink(&self.handle) {
            fresh.set_volume(*self.volume.lock());
            *sink = fresh;
        }
        self.started.store(false, Ordering::Release);
    }

    fn current_time(&self) -> Duration {
        if !self.started.load(Ordering::Acquire) {
            return Duration::ZERO;
        }
        let sink = self.sink.lock();
        if sink.empty() {
            self.total
        } else {
            sink.get_pos().min(self.total)
        }
    }

    fn total_duration(&self) -> Duration {
        self.total
    }

    fn set_volume(&self, volume: f64) {
        let volume = volume as f32;
        *self.volume.lock() = volume;
        self.sink.lock().set_volume(volume);
    }
}

/// Asset provider loading files relative to an asset directory
pub struct RodioAssets {
    handle: OutputStreamHandle,
    root: PathBuf,
    notification: Sound,
}

impl RodioAssets {
    pub fn new(
        output: &RodioOutput,
        root: impl Into<PathBuf>,
        notification_file: &str,
    ) -> Result<Self, AudioError> {
        let root = root.into();
        let clip = RodioClip::from_file(output.handle(), &root.join(notification_file))?;
        Ok(Self {
            handle: output.handle().clone(),
            notification: Sound::new("notification", clip),
            root,
        })
    }

    pub fn load_sound(&self, file: &str) -> Result<Sound, AudioError> {
        let clip = RodioClip::from_file(&self.handle, &self.root.join(file))?;
        Ok(Sound::new(file, clip))
    }

    pub fn load_music(&self, file: &str) -> Result<Music, AudioError> {
        let player = RodioMediaPlayer::from_file(&self.handle, &self.root.join(file))?;
        Ok(Music::new(file, player))
    }
}

impl AssetProvider for RodioAssets {
    fn notification_sound(&self) -> Sound {
        self.notification.clone()
    }
}
