/// Asset provider seam
///
/// The player does not resolve assets itself; it asks a provider for the
/// handles it needs on its own (currently only the notification sound).

use super::handle::Sound;

pub trait AssetProvider: Send + Sync {
    /// Sound played whenever a notification event is published.
    ///
    /// Must return the same handle on every call so repeated notifications
    /// do not pile up in the active-sound set.
    fn notification_sound(&self) -> Sound;
}
