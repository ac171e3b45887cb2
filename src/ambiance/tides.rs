//! Heavenward Tides motif
//!
//! Three mutually exclusive musical beds: a static loop, an attack loop and a
//! countdown cue. Entering a state cross-fades out whichever bed was audible.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::audio_system::{AudioCategory, AudioEngine, CategoryFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TidesState {
    FadeIn,
    Static,
    Attack,
    #[default]
    None,
}

impl fmt::Display for TidesState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TidesState::FadeIn => "FADE_IN",
            TidesState::Static => "STATIC",
            TidesState::Attack => "ATTACK",
            TidesState::None => "NONE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TidesTuning {
    pub static_loop: String,
    pub attack_loop: String,
    pub countdown: String,
    pub fade_interval: f32,
}

impl Default for TidesTuning {
    fn default() -> Self {
        Self {
            static_loop: "HeavenwardTidesStaticLoop".to_string(),
            attack_loop: "HeavenwardTidesAttackLoop".to_string(),
            countdown: "HeavenwardTidesCountdown".to_string(),
            fade_interval: 4.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TidesMotif {
    tuning: TidesTuning,
    state: TidesState,
    volume: f32,
    fade_interval: f32,
    fade_in_timer: f32,
}

impl TidesMotif {
    pub fn new(tuning: TidesTuning) -> Self {
        let fade_interval = tuning.fade_interval;
        Self {
            tuning,
            state: TidesState::None,
            volume: 0.0,
            fade_interval,
            fade_in_timer: 0.0,
        }
    }

    pub fn state(&self) -> TidesState {
        self.state
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn fade_interval(&self) -> f32 {
        self.fade_interval
    }

    pub fn tuning(&self) -> &TidesTuning {
        &self.tuning
    }

    /// Change the static bed's level; ignored outside STATIC
    pub fn set_volume(&mut self, volume: f32) -> bool {
        if self.state != TidesState::Static {
            return false;
        }
        self.volume = volume;
        true
    }

    /// Enter `state`; returns the previous state, or `None` when already there
    ///
    /// `volume` and `interval` only matter for FADE_IN, where they default to
    /// the current motif volume and fade interval.
    pub fn enter(
        &mut self,
        state: TidesState,
        volume: Option<f32>,
        interval: Option<f32>,
        engine: &mut AudioEngine,
    ) -> Option<TidesState> {
        if self.state == state {
            return None;
        }

        let previous = std::mem::replace(&mut self.state, state);
        tracing::info!("Heavenward Tides: {} -> {}", previous, state);

        let TidesTuning {
            static_loop,
            attack_loop,
            countdown,
            ..
        } = &self.tuning;

        match state {
            TidesState::FadeIn => {
                if engine.is_playing(attack_loop) {
                    let result = engine.fade_out_to_stop(attack_loop, self.fade_interval, 0.0);
                    engine.recover("tides fade in", result);
                }

                self.fade_interval = interval.unwrap_or(self.fade_interval);
                self.volume = volume.unwrap_or(self.volume);
                self.fade_in_timer = 0.0;

                let (interval, volume) = (self.fade_interval, self.volume);
                let result = engine
                    .loop_play(static_loop)
                    .and_then(|_| engine.fade_in_to_volume(static_loop, interval, volume));
                engine.recover("tides fade in", result);
            }
            TidesState::Static => {
                if !engine.is_playing(static_loop) {
                    let result = engine.loop_play(static_loop);
                    engine.recover("tides static", result);
                }
                for name in [attack_loop, countdown] {
                    if engine.is_playing(name) {
                        let result = engine.fade_out_to_stop(name, self.fade_interval, 0.0);
                        engine.recover("tides static", result);
                    }
                }
            }
            TidesState::Attack => {
                if engine.is_playing(static_loop) {
                    let result = engine.fade_out_to_stop(static_loop, self.fade_interval, 0.0);
                    engine.recover("tides attack", result);
                }
                if !engine.is_playing(attack_loop) {
                    let interval = self.fade_interval;
                    let result = engine
                        .loop_play(attack_loop)
                        .and_then(|_| engine.fade_in(attack_loop, interval));
                    engine.recover("tides attack", result);
                }
            }
            TidesState::None => {
                engine.stop_where(CategoryFilter::Only(AudioCategory::HeavenwardTides));
            }
        }

        Some(previous)
    }

    /// Per-tick motif behaviour
    ///
    /// Returns true when FADE_IN has lingered long enough and moved to STATIC.
    pub fn tick(&mut self, delta: f32, engine: &mut AudioEngine) -> bool {
        match self.state {
            TidesState::Static => {
                let name = self.tuning.static_loop.as_str();
                if engine.is_loaded(name) {
                    let result = engine.set_volume(name, self.volume);
                    engine.recover("tides volume", result);
                }
                false
            }
            TidesState::FadeIn => {
                self.fade_in_timer += delta;
                if self.fade_in_timer < self.fade_interval {
                    return false;
                }
                self.fade_in_timer = 0.0;
                self.state = TidesState::Static;
                tracing::info!(
                    "Heavenward Tides: {} -> {}",
                    TidesState::FadeIn,
                    TidesState::Static
                );
                true
            }
            TidesState::Attack | TidesState::None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::{CatalogEntry, EngineSettings, SeededRandom, SilentClipLoader};

    fn engine() -> AudioEngine {
        let mut engine = AudioEngine::new(
            Box::new(SilentClipLoader::new(30.0)),
            Box::new(SeededRandom::new(1)),
            EngineSettings::default(),
        );
        for name in [
            "HeavenwardTidesStaticLoop",
            "HeavenwardTidesAttackLoop",
            "HeavenwardTidesCountdown",
        ] {
            engine
                .declare(
                    CatalogEntry::new(name, AudioCategory::HeavenwardTides, &[name])
                        .with_volumes(1.0, 0.0),
                )
                .unwrap();
        }
        engine
    }

    #[test]
    fn test_fade_in_advances_to_static() {
        let mut engine = engine();
        let mut tides = TidesMotif::new(TidesTuning::default());
        tides.enter(TidesState::FadeIn, Some(0.7), Some(2.0), &mut engine);
        assert!(engine.is_playing("HeavenwardTidesStaticLoop"));
        assert_eq!(tides.volume(), 0.7);
        assert_eq!(tides.fade_interval(), 2.0);

        let mut advanced = false;
        for _ in 0..25 {
            advanced |= tides.tick(0.1, &mut engine);
        }
        assert!(advanced);
        assert_eq!(tides.state(), TidesState::Static);
    }

    #[test]
    fn test_volume_setter_only_in_static() {
        let mut engine = engine();
        let mut tides = TidesMotif::new(TidesTuning::default());
        assert!(!tides.set_volume(0.5));

        tides.enter(TidesState::Static, None, None, &mut engine);
        assert!(tides.set_volume(0.5));
        tides.tick(0.1, &mut engine);
        assert_eq!(engine.get_volume("HeavenwardTidesStaticLoop").unwrap(), 0.5);
    }

    #[test]
    fn test_attack_crossfades_static_out() {
        let mut engine = engine();
        let mut tides = TidesMotif::new(TidesTuning::default());
        tides.enter(TidesState::Static, None, None, &mut engine);
        tides.set_volume(0.6);
        tides.tick(0.1, &mut engine);

        tides.enter(TidesState::Attack, None, None, &mut engine);
        assert!(engine.is_playing("HeavenwardTidesAttackLoop"));
        for _ in 0..60 {
            engine.tick(0.1);
        }
        assert!(!engine.is_playing("HeavenwardTidesStaticLoop"));
        assert_eq!(engine.get_volume("HeavenwardTidesAttackLoop").unwrap(), 1.0);
    }

    #[test]
    fn test_static_fades_countdown() {
        let mut engine = engine();
        let mut tides = TidesMotif::new(TidesTuning::default());
        engine.play_at("HeavenwardTidesCountdown", 1.0).unwrap();
        tides.enter(TidesState::Static, None, None, &mut engine);
        for _ in 0..60 {
            engine.tick(0.1);
        }
        assert!(!engine.is_playing("HeavenwardTidesCountdown"));
    }

    #[test]
    fn test_none_stops_every_bed() {
        let mut engine = engine();
        let mut tides = TidesMotif::new(TidesTuning::default());
        tides.enter(TidesState::Attack, None, None, &mut engine);
        tides.enter(TidesState::None, None, None, &mut engine);
        assert!(!engine.is_playing("HeavenwardTidesAttackLoop"));
        assert_eq!(tides.enter(TidesState::None, None, None, &mut engine), None);
    }
}
