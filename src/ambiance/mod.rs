//! Ambiance coordination
//!
//! Keeps the ambient beds and one-shot cues in line with what the game says
//! is happening: the current zone, the baby's mood, the weather and the
//! Heavenward Tides motif. The coordinator never owns sounds; it drives the
//! [`AudioEngine`] by name.
//!
//! ## Tick order
//!
//! ```text
//! zone countdown ──> generators ──> tides ──> baby (+ rain link) ──> fades ──> zone fade-in
//!      │                 ▲                                                       ▲
//!      └── commit opens ─┘                                                       │
//!          the new zone's generators              same tick as the commit ───────┘
//! ```
//!
//! Later stages read flags set earlier in the same tick, so the order is fixed.

pub mod baby;
pub mod generators;
pub mod rain;
pub mod tides;
pub mod zone;

pub use baby::{BabyMood, BabyState, BabyTuning};
pub use generators::{
    Generator, GeneratorConfig, GeneratorGate, GeneratorKind, GeneratorSet, TriggerMode,
};
pub use rain::{RainMachine, RainState, RainTuning};
pub use tides::{TidesMotif, TidesState, TidesTuning};
pub use zone::{PendingTransition, Zone, ZoneState, ZoneStep};

use serde::{Deserialize, Serialize};

use crate::audio_system::{AudioEngine, CategoryFilter, RandomSource};
use crate::messaging::Event;

/// Everything tunable about the ambiance, as stored in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbianceTuning {
    pub generators: Vec<GeneratorConfig>,
    pub rain: RainTuning,
    pub baby: BabyTuning,
    pub tides: TidesTuning,
}

impl Default for AmbianceTuning {
    fn default() -> Self {
        Self {
            generators: GeneratorConfig::defaults(),
            rain: RainTuning::default(),
            baby: BabyTuning::default(),
            tides: TidesTuning::default(),
        }
    }
}

/// Zone, mood, weather and motif state machines driving the engine
pub struct AmbianceCoordinator {
    zone: ZoneState,
    generators: GeneratorSet,
    baby: BabyState,
    rain: RainMachine,
    tides: TidesMotif,
    thunder: bool,
    events: Vec<Event>,
}

impl AmbianceCoordinator {
    /// Build the coordinator; generator first intervals are drawn from `random`
    pub fn new(tuning: AmbianceTuning, random: &mut dyn RandomSource) -> Self {
        let AmbianceTuning {
            generators,
            rain,
            baby,
            tides,
        } = tuning;

        Self {
            zone: ZoneState::default(),
            generators: GeneratorSet::new(generators, random),
            baby: BabyState::new(baby),
            rain: RainMachine::new(rain),
            tides: TidesMotif::new(tides),
            thunder: false,
            events: Vec::new(),
        }
    }

    pub fn zone(&self) -> Zone {
        self.zone.current()
    }

    pub fn zone_state(&self) -> &ZoneState {
        &self.zone
    }

    pub fn generators(&self) -> &GeneratorSet {
        &self.generators
    }

    pub fn baby(&self) -> &BabyState {
        &self.baby
    }

    pub fn baby_mood(&self) -> BabyMood {
        self.baby.mood()
    }

    pub fn rain_state(&self) -> RainState {
        self.rain.state()
    }

    pub fn tides(&self) -> &TidesMotif {
        &self.tides
    }

    pub fn tides_state(&self) -> TidesState {
        self.tides.state()
    }

    pub fn is_thunder_active(&self) -> bool {
        self.thunder
    }

    /// Take the events raised since the last call, oldest first
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // -- zones -----------------------------------------------------------

    /// Fade the current zone's beds out now and switch to `zone` once
    /// `fade_out` seconds have passed
    pub fn start_zone_transition(
        &mut self,
        zone: Zone,
        fade_out: f32,
        fade_in: f32,
        engine: &mut AudioEngine,
    ) {
        let from = self.zone.current();
        self.zone.begin(zone, fade_out, fade_in);

        let category = from.category();
        let fading = if category.is_zone_ambiance() {
            engine.fade_out_to_stop_where(CategoryFilter::Only(category), fade_out, 0.0)
        } else {
            0
        };

        tracing::info!(
            "Zone transition {} -> {} (out {:.1}s, in {:.1}s, {} beds fading)",
            from,
            zone,
            fade_out,
            fade_in,
            fading
        );
        self.events.push(Event::ZoneTransitionStarted { from, to: zone });
    }

    /// Fade the zone's beds in: playing ones ramp up, silent ones restart
    fn fade_in_zone(zone: Zone, duration: f32, engine: &mut AudioEngine) {
        let category = zone.category();
        if !category.is_zone_ambiance() {
            return;
        }

        let names: Vec<String> = engine
            .directory()
            .declared_in(category)
            .into_iter()
            .map(|entry| entry.name.clone())
            .collect();

        for name in &names {
            let result = if engine.is_playing(name) {
                engine.fade_in(name, duration).map(|_| ())
            } else {
                engine.play_with_fade_in(name, duration).map(|_| ())
            };
            engine.recover("zone fade in", result);
        }
        tracing::debug!("Faded in {} {} beds over {:.1}s", names.len(), zone, duration);
    }

    // -- baby ------------------------------------------------------------

    pub fn set_baby_mood(&mut self, mood: BabyMood, engine: &mut AudioEngine) {
        if let Some(old) = self.baby.enter(mood, engine) {
            self.generators.set_baby_happy(mood == BabyMood::Happy);
            self.events.push(Event::BabyMoodChanged { old, new: mood });
        }
    }

    /// Normalized 0..1 crying intensity
    pub fn set_baby_cry_volume(&mut self, level: f32) {
        self.baby.set_cry_volume(level);
    }

    pub fn request_baby_fade_out(&mut self, interval: f32) {
        self.baby.request_fade_out(interval);
    }

    // -- weather ---------------------------------------------------------

    /// Enter a rain state; STATIC starts thunder and NONE stops it
    pub fn set_rain_state(&mut self, state: RainState, engine: &mut AudioEngine) {
        match state {
            RainState::Static => self.start_thunder(),
            RainState::None => self.stop_thunder(engine),
            RainState::Crying => {}
        }

        let old = self.rain.enter(state, engine);
        self.events.push(Event::RainChanged { old, new: state });
    }

    pub fn start_thunder(&mut self) {
        if self.thunder {
            return;
        }
        self.thunder = true;
        self.generators.set_thunder(true);
        tracing::info!("Thunder started");
        self.events.push(Event::ThunderChanged { active: true });
    }

    /// Close the thunder generators and silence any thunder still rolling
    pub fn stop_thunder(&mut self, engine: &mut AudioEngine) {
        if !self.thunder {
            return;
        }
        self.thunder = false;
        self.generators.set_thunder(false);

        for name in self.generators.assets_for(&GeneratorGate::Thunder) {
            if engine.is_playing(&name) {
                let result = engine.stop(&name);
                engine.recover("stop thunder", result);
            }
        }
        tracing::info!("Thunder stopped");
        self.events.push(Event::ThunderChanged { active: false });
    }

    // -- Heavenward Tides ------------------------------------------------

    pub fn set_tides_state(
        &mut self,
        state: TidesState,
        volume: Option<f32>,
        duration: Option<f32>,
        engine: &mut AudioEngine,
    ) {
        if let Some(old) = self.tides.enter(state, volume, duration, engine) {
            self.events.push(Event::TidesChanged { old, new: state });
        }
    }

    /// Returns false outside STATIC, where the level is left alone
    pub fn set_tides_volume(&mut self, volume: f32) -> bool {
        self.tides.set_volume(volume)
    }

    // -- tick ------------------------------------------------------------

    /// Advance every state machine and the engine's fades by `delta` seconds
    pub fn tick(&mut self, delta: f32, engine: &mut AudioEngine) {
        if let ZoneStep::Committed { from, to } = self.zone.advance(delta) {
            self.generators.apply_zone(to);
            tracing::info!("Zone changed: {} -> {}", from, to);
            self.events.push(Event::ZoneChanged { from, to });
        }

        self.run_generators(delta, engine);

        if self.tides.tick(delta, engine) {
            self.events.push(Event::TidesChanged {
                old: TidesState::FadeIn,
                new: TidesState::Static,
            });
        }

        if self.baby.mood() == BabyMood::Happy && self.rain.state() == RainState::Crying {
            self.set_rain_state(RainState::Static, engine);
        }
        self.baby.tick(engine);

        for completion in engine.tick(delta) {
            self.events.push(Event::FadeCompleted {
                name: completion.name,
                outcome: completion.outcome,
            });
        }

        if let Some(ZoneStep::FadeIn { zone, duration }) = self.zone.take_fade_in() {
            Self::fade_in_zone(zone, duration, engine);
        }
    }

    fn run_generators(&mut self, delta: f32, engine: &mut AudioEngine) {
        for generator in self.generators.iter_mut() {
            let playing = engine.is_playing(generator.asset());
            if !generator.advance(delta, playing, engine.random()) {
                continue;
            }

            let result = engine.play(generator.asset());
            if engine.recover("ambient trigger", result).is_some() {
                tracing::debug!(
                    "Ambient {} triggered, next in {:.0}s",
                    generator.kind(),
                    generator.interval()
                );
                self.events.push(Event::AmbientTriggered {
                    kind: generator.kind(),
                    asset: generator.asset().to_string(),
                });
            }
        }
    }
}
