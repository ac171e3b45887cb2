//! Baby mood state machine
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::audio_system::{AudioCategory, AudioEngine, CategoryFilter};

/// The baby's mood, driven by gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BabyMood {
    Happy,
    Upset,
    Crying,
    Calming,
    #[default]
    NoBaby,
}

impl fmt::Display for BabyMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BabyMood::Happy => "HAPPY",
            BabyMood::Upset => "UPSET",
            BabyMood::Crying => "CRYING",
            BabyMood::Calming => "CALMING",
            BabyMood::NoBaby => "NONE",
        };
        f.write_str(name)
    }
}

/// Cue names and cry volume range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BabyTuning {
    pub cry: String,
    pub cry_loop: String,
    pub cry_start: String,
    pub set_down: String,
    pub min_cry_volume: f32,
    pub max_cry_volume: f32,
}

impl Default for BabyTuning {
    fn default() -> Self {
        Self {
            cry: "BabyCry".to_string(),
            cry_loop: "BabyCryLoop".to_string(),
            cry_start: "BabyCryStart".to_string(),
            set_down: "BabySetDown".to_string(),
            min_cry_volume: 0.1,
            max_cry_volume: 0.6,
        }
    }
}

/// Mood plus the cry volume and pending fade-out request
#[derive(Debug, Clone)]
pub struct BabyState {
    tuning: BabyTuning,
    mood: BabyMood,
    cry_volume: f32,
    fade_out_pending: bool,
    fade_out_interval: f32,
}

impl BabyState {
    pub fn new(tuning: BabyTuning) -> Self {
        let cry_volume = tuning.min_cry_volume;
        Self {
            tuning,
            mood: BabyMood::NoBaby,
            cry_volume,
            fade_out_pending: false,
            fade_out_interval: 0.0,
        }
    }

    pub fn mood(&self) -> BabyMood {
        self.mood
    }

    pub fn cry_volume(&self) -> f32 {
        self.cry_volume
    }

    pub fn is_fade_out_pending(&self) -> bool {
        self.fade_out_pending
    }

    /// Map a 0..1 level onto the configured cry volume range
    pub fn set_cry_volume(&mut self, level: f32) {
        let t = level.clamp(0.0, 1.0);
        self.cry_volume = self.tuning.min_cry_volume
            + (self.tuning.max_cry_volume - self.tuning.min_cry_volume) * t;
    }

    /// Ask the next switch to HAPPY to fade every baby sound out over `interval`
    ///
    /// A request already pending keeps its interval.
    pub fn request_fade_out(&mut self, interval: f32) {
        if !self.fade_out_pending {
            self.fade_out_pending = true;
            self.fade_out_interval = interval;
        }
    }

    /// Enter `mood`; returns the previous mood, or `None` when already there
    pub fn enter(&mut self, mood: BabyMood, engine: &mut AudioEngine) -> Option<BabyMood> {
        if self.mood == mood {
            return None;
        }

        let previous = std::mem::replace(&mut self.mood, mood);
        tracing::info!("Baby mood: {} -> {}", previous, mood);

        let baby = CategoryFilter::Only(AudioCategory::Baby);
        match mood {
            BabyMood::Happy => {
                if self.fade_out_pending {
                    let interval = self.fade_out_interval;
                    engine.fade_out_to_stop_where(baby, interval, 0.0);
                    self.fade_out_pending = false;
                } else {
                    for name in [&self.tuning.cry, &self.tuning.cry_loop] {
                        if engine.is_playing(name) {
                            let result = engine.stop(name);
                            engine.recover("baby happy", result);
                        }
                    }
                }
            }
            BabyMood::Upset => {
                let result = engine.play_at(&self.tuning.set_down, self.tuning.min_cry_volume);
                engine.recover("baby upset", result);
            }
            BabyMood::Crying => {
                let result = engine.play_at(&self.tuning.cry_start, self.tuning.min_cry_volume);
                engine.recover("baby crying", result);
            }
            BabyMood::Calming => {}
            BabyMood::NoBaby => {
                engine.stop_where(baby);
            }
        }

        Some(previous)
    }

    /// Per-tick crying behaviour: follow the cry volume and keep exactly one
    /// crying cue going
    pub fn tick(&mut self, engine: &mut AudioEngine) {
        if self.mood != BabyMood::Crying {
            return;
        }

        let volume = self.cry_volume;
        let BabyTuning {
            cry,
            cry_loop,
            cry_start,
            max_cry_volume,
            ..
        } = &self.tuning;

        for name in [cry, cry_loop] {
            if engine.is_loaded(name) {
                let result = engine.set_volume(name, volume);
                engine.recover("baby cry volume", result);
            }
        }

        let starting = engine.is_playing(cry_start);
        let crying = engine.is_playing(cry);
        let next = if volume <= max_cry_volume * 0.5 {
            (!starting && !crying).then_some(cry)
        } else {
            (!starting && !crying && !engine.is_playing(cry_loop)).then_some(cry_loop)
        };

        if let Some(name) = next {
            let result = engine.play(name);
            engine.recover("baby cry", result);
        }
    }
}
