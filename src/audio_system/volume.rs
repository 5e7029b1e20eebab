/// Global volume parameter
///
/// An observable scalar in 0.0-1.0 that active playback handles are bound to.
/// Changing the level pushes the new value to every bound handle immediately.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use super::handle::HandleId;

/// Level every parameter starts at unless configured otherwise
pub const DEFAULT_VOLUME: f64 = 0.5;

/// Something whose output level follows a [`VolumeParameter`]
pub trait VolumeSink: Send + Sync {
    fn apply_volume(&self, volume: f64);
}

/// Identifies a callback registered with [`VolumeParameter::observe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Arc<dyn Fn(f64) + Send + Sync>;

struct VolumeState {
    level: f64,
    bindings: Vec<(HandleId, Weak<dyn VolumeSink>)>,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

/// Shared volume level with live bindings
pub struct VolumeParameter {
    name: &'static str,
    state: RwLock<VolumeState>,
    // Held across a level change and its push to sinks, so pushes land in
    // the order the levels were set. Always taken before `state`.
    apply: Mutex<()>,
}

impl VolumeParameter {
    /// Create a new parameter; the level is clamped to 0.0-1.0
    pub fn new(name: &'static str, level: f64) -> Self {
        Self {
            name,
            state: RwLock::new(VolumeState {
                level: clamp_level(level).unwrap_or(DEFAULT_VOLUME),
                bindings: Vec::new(),
                observers: Vec::new(),
                next_observer: 0,
            }),
            apply: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the volume level
    pub fn get(&self) -> f64 {
        self.state.read().level
    }

    /// Set the volume level and push it to every bound handle.
    ///
    /// Values are clamped to 0.0-1.0; NaN is ignored.
    pub fn set(&self, level: f64) {
        let Some(level) = clamp_level(level) else {
            tracing::warn!("Ignoring NaN level for {} volume", self.name);
            return;
        };

        let applying = self.apply.lock();
        let (sinks, observers) = {
            let mut state = self.state.write();
            if state.level == level {
                return;
            }
            state.level = level;
            state.bindings.retain(|(_, sink)| sink.strong_count() > 0);

            let sinks: Vec<Arc<dyn VolumeSink>> = state
                .bindings
                .iter()
                .filter_map(|(_, sink)| sink.upgrade())
                .collect();
            let observers: Vec<Observer> =
                state.observers.iter().map(|(_, o)| Arc::clone(o)).collect();
            (sinks, observers)
        };

        tracing::debug!(
            "{} volume set to {:.2} ({} bound)",
            self.name,
            level,
            sinks.len()
        );

        for sink in sinks {
            sink.apply_volume(level);
        }
        drop(applying);

        for observer in observers {
            observer(level);
        }
    }

    /// Bind a handle so it follows this parameter.
    ///
    /// Rebinding an already bound handle replaces its previous binding. The
    /// current level is applied right away.
    pub fn bind(&self, id: HandleId, sink: Weak<dyn VolumeSink>) {
        let _applying = self.apply.lock();
        let level = {
            let mut state = self.state.write();
            state.bindings.retain(|(bound, _)| *bound != id);
            state.bindings.push((id, sink.clone()));
            state.level
        };

        if let Some(sink) = sink.upgrade() {
            sink.apply_volume(level);
        }
    }

    /// Remove a handle's binding; unknown ids are ignored
    pub fn unbind(&self, id: HandleId) {
        self.state.write().bindings.retain(|(bound, _)| *bound != id);
    }

    pub fn is_bound(&self, id: HandleId) -> bool {
        self.state.read().bindings.iter().any(|(bound, _)| *bound == id)
    }

    /// Number of live bindings
    pub fn bound_count(&self) -> usize {
        self.state
            .read()
            .bindings
            .iter()
            .filter(|(_, sink)| sink.strong_count() > 0)
            .count()
    }

    /// Register a callback invoked with the new level on every change
    pub fn observe<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        let mut state = self.state.write();
        let id = ObserverId(state.next_observer);
        state.next_observer += 1;
        state.observers.push((id, Arc::new(observer)));
        id
    }

    pub fn unobserve(&self, id: ObserverId) {
        self.state.write().observers.retain(|(observer, _)| *observer != id);
    }
}

impl Default for VolumeParameter {
    fn default() -> Self {
        Self::new("global", DEFAULT_VOLUME)
    }
}

impl fmt::Debug for VolumeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("VolumeParameter")
            .field("name", &self.name)
            .field("level", &state.level)
            .field("bindings", &state.bindings.len())
            .field("observers", &state.observers.len())
            .finish()
    }
}

fn clamp_level(level: f64) -> Option<f64> {
    if level.is_nan() {
        None
    } else {
        Some(level.clamp(0.0, 1.0))
    }
}
