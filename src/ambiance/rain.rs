//! Rain/weather state machine
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::audio_system::AudioEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RainState {
    Static,
    Crying,
    #[default]
    None,
}

impl fmt::Display for RainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RainState::Static => "STATIC",
            RainState::Crying => "CRYING",
            RainState::None => "NONE",
        };
        f.write_str(name)
    }
}

/// Rain loop and its volume levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainTuning {
    pub loop_asset: String,
    pub static_volume: f32,
    pub crying_volume: f32,
    pub static_fade: f32,
    pub crying_fade: f32,
    pub stop_fade: f32,
}

impl Default for RainTuning {
    fn default() -> Self {
        Self {
            loop_asset: "RainMedium".to_string(),
            static_volume: 0.15,
            crying_volume: 0.8,
            static_fade: 4.0,
            crying_fade: 5.0,
            stop_fade: 2.0,
        }
    }
}

/// Current and previous rain state
///
/// Entering a state always re-applies it, even when already there.
#[derive(Debug, Clone)]
pub struct RainMachine {
    tuning: RainTuning,
    state: RainState,
    previous: RainState,
}

impl RainMachine {
    pub fn new(tuning: RainTuning) -> Self {
        Self {
            tuning,
            state: RainState::None,
            previous: RainState::None,
        }
    }

    pub fn state(&self) -> RainState {
        self.state
    }

    pub fn previous(&self) -> RainState {
        self.previous
    }

    pub fn tuning(&self) -> &RainTuning {
        &self.tuning
    }

    /// Enter `state`, returning the state it replaced
    pub fn enter(&mut self, state: RainState, engine: &mut AudioEngine) -> RainState {
        let replaced = self.state;
        self.state = state;
        tracing::info!("Rain: {} -> {}", replaced, state);

        let RainTuning {
            loop_asset,
            static_volume,
            crying_volume,
            static_fade,
            crying_fade,
            stop_fade,
        } = &self.tuning;
        let name = loop_asset.as_str();

        match state {
            RainState::Static => {
                if !engine.is_playing(name) {
                    let result = engine.load(name).and_then(|_| {
                        engine.set_volume(name, 0.0)?;
                        engine.loop_play(name)?;
                        engine.fade_in_to_volume(name, *static_fade, *static_volume)
                    });
                    engine.recover("rain static", result);
                }

                if engine.is_playing(name) && self.previous == RainState::Crying {
                    let result = engine.fade_out(name, *static_fade, *static_volume);
                    engine.recover("rain static", result);
                }
            }
            RainState::Crying => {
                let result = if engine.is_playing(name) {
                    engine.fade_in_to_volume(name, *crying_fade, *crying_volume)
                } else {
                    engine.loop_play(name).and_then(|_| {
                        engine.fade_in_to_volume(name, *crying_fade, *crying_volume)
                    })
                };
                engine.recover("rain crying", result);
            }
            RainState::None => {
                if engine.is_playing(name) {
                    let result = engine.fade_out_to_stop(name, *stop_fade, 0.0);
                    engine.recover("rain stop", result);
                }
            }
        }

        self.previous = state;
        replaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::{
        AudioCategory, CatalogEntry, EngineSettings, FadeMode, SeededRandom, SilentClipLoader,
    };

    fn engine() -> AudioEngine {
        let mut engine = AudioEngine::new(
            Box::new(SilentClipLoader::new(8.0)),
            Box::new(SeededRandom::new(1)),
            EngineSettings::default(),
        );
        engine
            .declare(
                CatalogEntry::new("RainMedium", AudioCategory::Rain, &["rain_medium.ogg"])
                    .with_volumes(1.0, 0.5),
            )
            .unwrap();
        engine
    }

    fn run(engine: &mut AudioEngine, seconds: f32) {
        let ticks = (seconds / 0.1).round() as usize;
        for _ in 0..ticks {
            engine.tick(0.1);
        }
    }

    #[test]
    fn test_static_starts_silent_loop() {
        let mut engine = engine();
        let mut rain = RainMachine::new(RainTuning::default());
        rain.enter(RainState::Static, &mut engine);

        assert!(engine.is_playing("RainMedium"));
        assert_eq!(engine.get_volume("RainMedium").unwrap(), 0.0);
        run(&mut engine, 10.0);
        assert!((engine.get_volume("RainMedium").unwrap() - 0.15).abs() < 1e-6);
        assert!(engine.is_playing("RainMedium"));
    }

    #[test]
    fn test_crying_then_static_fades_down() {
        let mut engine = engine();
        let mut rain = RainMachine::new(RainTuning::default());
        rain.enter(RainState::Crying, &mut engine);
        run(&mut engine, 10.0);
        assert!((engine.get_volume("RainMedium").unwrap() - 0.8).abs() < 1e-6);

        assert_eq!(rain.enter(RainState::Static, &mut engine), RainState::Crying);
        assert_eq!(
            engine.directory().get("RainMedium").unwrap().fade_mode(),
            FadeMode::FadeOut
        );
        run(&mut engine, 10.0);
        assert!((engine.get_volume("RainMedium").unwrap() - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_none_fades_to_stop() {
        let mut engine = engine();
        let mut rain = RainMachine::new(RainTuning::default());
        rain.enter(RainState::Crying, &mut engine);
        run(&mut engine, 2.0);
        rain.enter(RainState::None, &mut engine);
        run(&mut engine, 6.0);
        assert!(!engine.is_playing("RainMedium"));
        assert_eq!(rain.previous(), RainState::None);
    }

    #[test]
    fn test_missing_loop_is_recoverable() {
        let mut engine = engine();
        let tuning = RainTuning {
            loop_asset: "RainHeavy".to_string(),
            ..RainTuning::default()
        };
        let mut rain = RainMachine::new(tuning);
        rain.enter(RainState::Static, &mut engine);
        assert_eq!(rain.state(), RainState::Static);
        assert!(!engine.is_playing("RainHeavy"));
    }
}
