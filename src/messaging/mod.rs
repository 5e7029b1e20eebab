/// Messaging module for the event-driven audio service
///
/// The host application publishes events; services react to them through
/// handlers registered on the bus.
///
/// ## Architecture
///
/// ```text
/// ┌─────────────┐    publish     ┌─────────────┐   kind match   ┌──────────────┐
/// │  Main loop  │ ─────────────> │  Event Bus  │ ─────────────> │   Handlers   │
/// │  (host app) │                │             │                │(AudioManager)│
/// └─────────────┘                └─────────────┘                └──────────────┘
///                                       │
///                                       │ every event
///                                       ▼
///                                 ┌────────────┐
///                                 │  Channel   │
///                                 │ subscribers│
///                                 └────────────┘
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// let bus = EventBus::new();
///
/// let id = bus.add_handler(EventKind::Update, |event| {
///     tracing::trace!("{}", event.description());
///     Ok(())
/// });
///
/// bus.publish(Event::Update { tpf: 1.0 / 60.0 })?;
/// bus.unsubscribe(id);
/// ```

pub mod bus;
pub mod events;

// Re-export commonly used types
pub use bus::{EventBus, EventHandler, SubscriberId};
pub use events::{Event, EventKind};
