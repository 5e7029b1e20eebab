/// Event types delivered to the audio player
///
/// Events represent things that have happened (past tense).
/// They are broadcast to all subscribers.
use std::fmt;

use crate::profile::SharedProfile;

/// Application events
#[derive(Debug, Clone)]
pub enum Event {
    /// One frame of the main loop has passed
    Update {
        /// Time per frame in seconds
        tpf: f64,
    },

    /// A notification was shown to the user
    Notification { message: String },

    /// Services should write their settings into the profile
    Save { profile: SharedProfile },

    /// Services should restore their settings from the profile
    Load { profile: SharedProfile },
}

/// Discriminant used to register handlers for one kind of event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Update,
    Notification,
    Save,
    Load,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Update,
        EventKind::Notification,
        EventKind::Save,
        EventKind::Load,
    ];
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Update => write!(f, "Update"),
            EventKind::Notification => write!(f, "Notification"),
            EventKind::Save => write!(f, "Save"),
            EventKind::Load => write!(f, "Load"),
        }
    }
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Update { .. } => EventKind::Update,
            Event::Notification { .. } => EventKind::Notification,
            Event::Save { .. } => EventKind::Save,
            Event::Load { .. } => EventKind::Load,
        }
    }

    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            Event::Update { tpf } => format!("Update ({:.4}s)", tpf),
            Event::Notification { message } => format!("Notification: {}", message),
            Event::Save { profile } => format!("Save profile: {}", profile.read().app_title),
            Event::Load { profile } => format!("Load profile: {}", profile.read().app_title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::UserProfile;

    #[test]
    fn test_event_kind() {
        assert_eq!(Event::Update { tpf: 0.016 }.kind(), EventKind::Update);

        let profile = UserProfile::new("demo", "1.0").into_shared();
        assert_eq!(Event::Load { profile }.kind(), EventKind::Load);
    }

    #[test]
    fn test_event_description() {
        let event = Event::Notification {
            message: "Achievement unlocked".to_string(),
        };
        assert_eq!(event.description(), "Notification: Achievement unlocked");

        let profile = UserProfile::new("demo", "1.0").into_shared();
        assert_eq!(Event::Save { profile }.description(), "Save profile: demo");
    }
}
