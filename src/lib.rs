//! Layered game audio engine with a scripted ambiance state machine
//!
//! ```text
//! ┌──────────────┐ Command ┌─────────────────────────────────────────────┐ Event ┌──────────┐
//! │ game / other │ ──────> │ AudioSystem                                 │ ────> │ EventBus │
//! │ threads      │         │   AmbianceCoordinator ──> AudioEngine       │       └──────────┘
//! └──────────────┘         │   (zone, baby, rain,      (directory, fades, │
//!                          │    tides, generators)      loader, random)   │
//!                          └─────────────────────────────────────────────┘
//! ```
//!
//! Everything advances from a single `AudioSystem::tick(delta)` call per frame.

pub mod ambiance;
pub mod audio_system;
pub mod config;
pub mod error;
pub mod messaging;
pub mod system;

pub use ambiance::{AmbianceCoordinator, AmbianceTuning, BabyMood, RainState, TidesState, Zone};
pub use audio_system::{AudioCategory, AudioEngine, CatalogEntry, EngineSettings};
pub use config::Config;
pub use error::{AppResult, AudioError, ConfigError};
pub use messaging::{Command, CommandResult, Event, EventBus};
pub use system::AudioSystem;
