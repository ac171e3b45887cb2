//! Messaging module for Event/Command architecture
//!
//! This module implements the Event/Command segregation pattern:
//! - **Commands**: Requests to perform actions (imperative, queued)
//! - **Events**: Notifications of things that happened (past tense, broadcast)
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   Command    ┌──────────────┐  tick()   ┌─────────────┐
//! │ Gameplay │ ───────────> │ CommandQueue │ ────────> │ AudioSystem │
//! │ (any     │              └──────────────┘           └─────────────┘
//! │  thread) │                                                │
//! └──────────┘                                                │ Event
//!                                                             ▼
//!                                                      ┌─────────────┐
//!                                                      │  Event Bus  │
//!                                                      └─────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let sender = system.command_sender();
//! let (events, _id) = system.event_bus().subscribe();
//!
//! sender.send(Command::SetRainState(RainState::Static))?;
//!
//! // Engine thread, once per frame
//! system.tick(delta);
//!
//! for event in events.try_iter() {
//!     tracing::info!("{}", event.description());
//! }
//! ```

pub mod bus;
pub mod commands;
pub mod events;
pub mod queue;

// Re-export commonly used types
pub use bus::{EventBus, SubscriberId};
pub use commands::{Command, CommandResult};
pub use events::Event;
pub use queue::CommandQueue;
