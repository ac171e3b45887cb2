//! Event types for the audio system
//!
//! Events represent things that have happened (past tense).
//! They are broadcast to all subscribers after each tick.
use crate::ambiance::{BabyMood, GeneratorKind, RainState, TidesState, Zone};
use crate::audio_system::FadeOutcome;

/// Audio system events
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A zone transition began fading the old zone out
    ZoneTransitionStarted { from: Zone, to: Zone },

    /// The transition countdown elapsed and the zone changed
    ZoneChanged { from: Zone, to: Zone },

    BabyMoodChanged { old: BabyMood, new: BabyMood },

    RainChanged { old: RainState, new: RainState },

    TidesChanged { old: TidesState, new: TidesState },

    /// Thunder generator switched on or off
    ThunderChanged { active: bool },

    /// An ambient generator started its cue
    AmbientTriggered { kind: GeneratorKind, asset: String },

    /// A sound's fade reached its target
    FadeCompleted { name: String, outcome: FadeOutcome },

    /// Audio was switched on or off as a whole
    AudioEnabledChanged { enabled: bool },

    /// A command could not be applied
    ErrorOccurred { message: String, context: String },

    /// The audio system is shutting down
    Shutdown,
}

impl Event {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            Event::ZoneTransitionStarted { from, to } => {
                format!("Zone transition started: {} -> {}", from, to)
            }
            Event::ZoneChanged { from, to } => format!("Zone changed: {} -> {}", from, to),
            Event::BabyMoodChanged { new, .. } => format!("Baby mood: {}", new),
            Event::RainChanged { new, .. } => format!("Rain: {}", new),
            Event::TidesChanged { new, .. } => format!("Heavenward Tides: {}", new),
            Event::ThunderChanged { active } => {
                if *active {
                    "Thunder started".to_string()
                } else {
                    "Thunder stopped".to_string()
                }
            }
            Event::AmbientTriggered { kind, asset } => {
                format!("Ambient {} triggered ({})", kind, asset)
            }
            Event::FadeCompleted { name, outcome } => match outcome {
                FadeOutcome::FadedIn { volume } => format!("{} faded in to {:.2}", name, volume),
                FadeOutcome::FadedOut { volume, stopped: true } => {
                    format!("{} faded out to {:.2} and stopped", name, volume)
                }
                FadeOutcome::FadedOut { volume, stopped: false } => {
                    format!("{} faded out to {:.2}", name, volume)
                }
            },
            Event::AudioEnabledChanged { enabled } => {
                if *enabled {
                    "Audio enabled".to_string()
                } else {
                    "Audio disabled".to_string()
                }
            }
            Event::ErrorOccurred { message, .. } => format!("Error: {}", message),
            Event::Shutdown => "Shutting down".to_string(),
        }
    }
}
