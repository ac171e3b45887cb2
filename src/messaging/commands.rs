//! Command types for the audio system
//!
//! Commands represent requests to perform actions (imperative).
//! Any thread may send them; they are applied on the engine thread at the
//! start of the next tick.
use crate::ambiance::{BabyMood, RainState, TidesState, Zone};

/// Audio system commands
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Fade the current zone out and the target zone in
    StartZoneTransition {
        zone: Zone,
        fade_out: f32,
        fade_in: f32,
    },

    SetBabyMood(BabyMood),

    /// Normalized 0..1 crying intensity
    SetBabyCryVolume(f32),

    /// Fade baby sounds out over `interval` on the next switch to HAPPY
    RequestBabyFadeOut { interval: f32 },

    SetRainState(RainState),

    SetTidesState {
        state: TidesState,
        volume: Option<f32>,
        duration: Option<f32>,
    },

    SetTidesVolume(f32),

    StartThunder,
    StopThunder,

    /// Play a sound by name
    Play { name: String, volume: Option<f32> },

    /// Loop-play a sound by name
    LoopPlay { name: String, volume: Option<f32> },

    Stop { name: String },

    FadeIn { name: String, duration: f32 },

    FadeOut {
        name: String,
        duration: f32,
        min_volume: f32,
        stop: bool,
    },

    SetVolume { name: String, volume: f32 },

    Mute { name: String },
    Unmute { name: String },

    FadeOutSounds { duration: f32, min_volume: f32 },
    FadeInMusic { duration: f32 },
    FadeOutMusic { duration: f32, min_volume: f32 },
    StopSounds,
    StopMusic,

    EnableAudio,
    DisableAudio,

    /// Stop and unload everything
    Shutdown,
}

/// Result of applying a command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Command applied
    Success,

    /// Command dropped because audio is disabled
    Ignored,

    /// Command failed with an error
    Error(String),
}

impl Command {
    /// Get a human-readable description of the command
    pub fn description(&self) -> String {
        match self {
            Command::StartZoneTransition { zone, fade_out, fade_in } => {
                format!("Transition to {} (out {:.1}s, in {:.1}s)", zone, fade_out, fade_in)
            }
            Command::SetBabyMood(mood) => format!("Set baby mood: {}", mood),
            Command::SetBabyCryVolume(level) => format!("Set baby cry volume: {:.2}", level),
            Command::RequestBabyFadeOut { interval } => {
                format!("Request baby fade-out over {:.1}s", interval)
            }
            Command::SetRainState(state) => format!("Set rain: {}", state),
            Command::SetTidesState { state, .. } => format!("Set Heavenward Tides: {}", state),
            Command::SetTidesVolume(volume) => {
                format!("Set Heavenward Tides volume: {:.2}", volume)
            }
            Command::StartThunder => "Start thunder".to_string(),
            Command::StopThunder => "Stop thunder".to_string(),
            Command::Play { name, .. } => format!("Play {}", name),
            Command::LoopPlay { name, .. } => format!("Loop {}", name),
            Command::Stop { name } => format!("Stop {}", name),
            Command::FadeIn { name, duration } => format!("Fade in {} over {:.1}s", name, duration),
            Command::FadeOut { name, duration, .. } => {
                format!("Fade out {} over {:.1}s", name, duration)
            }
            Command::SetVolume { name, volume } => format!("Set {} volume: {:.2}", name, volume),
            Command::Mute { name } => format!("Mute {}", name),
            Command::Unmute { name } => format!("Unmute {}", name),
            Command::FadeOutSounds { .. } => "Fade out sounds".to_string(),
            Command::FadeInMusic { .. } => "Fade in music".to_string(),
            Command::FadeOutMusic { .. } => "Fade out music".to_string(),
            Command::StopSounds => "Stop sounds".to_string(),
            Command::StopMusic => "Stop music".to_string(),
            Command::EnableAudio => "Enable audio".to_string(),
            Command::DisableAudio => "Disable audio".to_string(),
            Command::Shutdown => "Shut down audio".to_string(),
        }
    }

    /// Commands still honoured while audio is disabled
    pub fn bypasses_disable(&self) -> bool {
        matches!(self, Command::EnableAudio | Command::DisableAudio | Command::Shutdown)
    }
}
