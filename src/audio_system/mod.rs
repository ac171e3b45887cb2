//! Audio system module
//!
//! Layered sound playback driven by a per-frame tick:
//! - Named sounds made of one or more interchangeable layers
//! - Lazy loading from a static catalog
//! - Per-sound linear fades evaluated every tick
//! - Category-wide bulk operations
//!
//! ## Architecture
//!
//! ```text
//! AudioEngine
//!   └── PlaybackDirectory
//!         ├── catalog: name -> CatalogEntry (declared at startup)
//!         └── active:  name -> SoundAsset   (loaded on first play)
//!
//! Each SoundAsset has:
//!   ├── Layer 0..n (clip, cursor, VolumeEffect, loop flag)
//!   └── FadeEffect (shared by all layers)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ambiance_engine::audio_system::{AudioEngine, CatalogEntry, AudioCategory};
//!
//! let mut engine = AudioEngine::new(loader, random, EngineSettings::default());
//! engine.declare(CatalogEntry::new("Rain", AudioCategory::Rain, &["rain.ogg"]))?;
//!
//! engine.loop_play("Rain")?;
//! engine.fade_in_to_volume("Rain", 4.0, 0.15)?;
//!
//! // Once per frame
//! engine.tick(delta);
//! ```
pub mod asset;
pub mod directory;
pub mod effects;
pub mod layer;
pub mod loader;
pub mod manager;
pub mod random;
pub mod source;

// Re-export commonly used types
pub use asset::{LayerSelection, PlayRequest, SoundAsset};
pub use directory::{CatalogEntry, PlaybackDirectory};
pub use effects::{
    FadeEffect, FadeMode, FadeOutcome, FadeRamp, FadeReference, FadeSettings, VolumeEffect,
};
pub use layer::{Layer, PlaybackStatus};
pub use loader::{AudioClip, AudioLoader, MemoryLoader, RodioLoader, SilentClipLoader};
pub use manager::{AudioEngine, EngineSettings, FadeCompletion};
pub use random::{RandomSource, SeededRandom};
pub use source::{AudioCategory, CategoryFilter};
