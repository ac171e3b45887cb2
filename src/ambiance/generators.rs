//! Randomized ambient one-shot generators
//!
//! Each generator owns a timer and a random interval. While its gate is open
//! the timer accumulates; when it passes the interval the timer resets, a new
//! interval is drawn from the reschedule bounds, and the cue is triggered if
//! it is not already playing. Ensure-playing beds (wind, torch) skip the timer
//! and simply restart their loop whenever it falls silent.
use std::fmt;

use serde::{Deserialize, Serialize};

use super::zone::Zone;
use crate::audio_system::RandomSource;

/// Which ambient cue a generator drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    Crickets1,
    Crickets2,
    Flies,
    WrenChirp,
    WrenSong,
    Wind,
    Torch,
    WaterDrop,
    WoodCreak,
    Thunder,
    HowlingMonkey1,
    HowlingMonkey2,
    BabyAmbiance,
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeneratorKind::Crickets1 => "crickets 1",
            GeneratorKind::Crickets2 => "crickets 2",
            GeneratorKind::Flies => "flies",
            GeneratorKind::WrenChirp => "wren chirp",
            GeneratorKind::WrenSong => "wren song",
            GeneratorKind::Wind => "wind",
            GeneratorKind::Torch => "torch",
            GeneratorKind::WaterDrop => "water drop",
            GeneratorKind::WoodCreak => "wood creak",
            GeneratorKind::Thunder => "thunder",
            GeneratorKind::HowlingMonkey1 => "howling monkey 1",
            GeneratorKind::HowlingMonkey2 => "howling monkey 2",
            GeneratorKind::BabyAmbiance => "baby ambiance",
        };
        f.write_str(name)
    }
}

/// What opens a generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorGate {
    /// Open while the current zone is one of these
    Zones(Vec<Zone>),
    /// Open while thunder is running
    Thunder,
    /// Open while the baby is happy
    BabyHappy,
}

/// How a generator triggers its cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Play once per elapsed interval, unless still playing
    #[default]
    OneShot,
    /// Keep the cue playing for as long as the gate is open
    EnsurePlaying,
}

/// Static description of one generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub kind: GeneratorKind,
    pub asset: String,
    pub gate: GeneratorGate,
    /// Whole-second bounds for the first interval, inclusive
    pub initial: [i32; 2],
    /// Whole-second bounds for every following interval, inclusive
    pub reschedule: [i32; 2],
    #[serde(default)]
    pub mode: TriggerMode,
}

impl GeneratorConfig {
    pub fn one_shot(
        kind: GeneratorKind,
        asset: &str,
        gate: GeneratorGate,
        initial: [i32; 2],
        reschedule: [i32; 2],
    ) -> Self {
        Self {
            kind,
            asset: asset.to_string(),
            gate,
            initial,
            reschedule,
            mode: TriggerMode::OneShot,
        }
    }

    pub fn ensure_playing(kind: GeneratorKind, asset: &str, gate: GeneratorGate) -> Self {
        Self {
            kind,
            asset: asset.to_string(),
            gate,
            initial: [0, 0],
            reschedule: [0, 0],
            mode: TriggerMode::EnsurePlaying,
        }
    }

    /// The built-in generator table
    pub fn defaults() -> Vec<Self> {
        use GeneratorKind::*;
        let zones = |zones: &[Zone]| GeneratorGate::Zones(zones.to_vec());

        vec![
            Self::one_shot(Crickets1, "CricketsLoop1", zones(&[Zone::Jungle]), [0, 2], [10, 11]),
            Self::one_shot(Crickets2, "CricketsLoop2", zones(&[Zone::Jungle]), [1, 3], [10, 11]),
            Self::one_shot(Flies, "FliesLoop", zones(&[Zone::Plantation]), [2, 4], [2, 4]),
            Self::one_shot(WrenChirp, "WrenChirp", zones(&[Zone::Jungle]), [20, 25], [25, 30]),
            Self::one_shot(WrenSong, "WrenSong", zones(&[Zone::Jungle]), [15, 20], [15, 20]),
            Self::ensure_playing(Wind, "WindForestLightLoop", zones(&[Zone::Jungle])),
            Self::ensure_playing(Torch, "TorchLoop", zones(&[Zone::Dungeon])),
            Self::one_shot(
                WaterDrop,
                "WaterDropAmbiance",
                zones(&[Zone::Cave, Zone::SlaveShip]),
                [7, 9],
                [7, 9],
            ),
            Self::one_shot(
                WoodCreak,
                "WoodCreakAmbiance",
                zones(&[Zone::Senzala, Zone::MastersHouse, Zone::SlaveShip]),
                [15, 15],
                [12, 25],
            ),
            Self::one_shot(Thunder, "ThunderAmbiance", GeneratorGate::Thunder, [25, 25], [20, 30]),
            Self::one_shot(
                HowlingMonkey1,
                "HowlingMonkey1",
                zones(&[Zone::Jungle]),
                [20, 30],
                [40, 60],
            ),
            Self::one_shot(
                HowlingMonkey2,
                "HowlingMonkey2",
                zones(&[Zone::Jungle]),
                [13, 23],
                [40, 60],
            ),
            Self::one_shot(
                BabyAmbiance,
                "BabyAmbiance",
                GeneratorGate::BabyHappy,
                [20, 40],
                [20, 40],
            ),
        ]
    }
}

/// Runtime state of one generator
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    timer: f32,
    interval: f32,
    active: bool,
}

impl Generator {
    pub fn new(config: GeneratorConfig, random: &mut dyn RandomSource) -> Self {
        let interval = random.interval(config.initial[0], config.initial[1]);
        Self {
            config,
            timer: 0.0,
            interval,
            active: false,
        }
    }

    pub fn kind(&self) -> GeneratorKind {
        self.config.kind
    }

    pub fn asset(&self) -> &str {
        &self.config.asset
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Open or close the gate; timers keep their value while closed
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Advance the timer and report whether the cue should be triggered now
    ///
    /// `is_playing` tells whether the cue is currently audible.
    pub fn advance(&mut self, delta: f32, is_playing: bool, random: &mut dyn RandomSource) -> bool {
        if !self.active {
            return false;
        }

        match self.config.mode {
            TriggerMode::EnsurePlaying => !is_playing,
            TriggerMode::OneShot => {
                self.timer += delta;
                if self.timer < self.interval {
                    return false;
                }

                self.timer = 0.0;
                let [low, high] = self.config.reschedule;
                self.interval = random.interval(low, high);
                !is_playing
            }
        }
    }
}

/// All generators, gated together
#[derive(Debug, Clone, Default)]
pub struct GeneratorSet {
    generators: Vec<Generator>,
}

impl GeneratorSet {
    pub fn new(configs: Vec<GeneratorConfig>, random: &mut dyn RandomSource) -> Self {
        Self {
            generators: configs
                .into_iter()
                .map(|config| Generator::new(config, random))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Generator> {
        self.generators.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Generator> {
        self.generators.iter_mut()
    }

    pub fn get(&self, kind: GeneratorKind) -> Option<&Generator> {
        self.generators.iter().find(|g| g.kind() == kind)
    }

    /// Open exactly the zone-gated generators listing `zone`
    pub fn apply_zone(&mut self, zone: Zone) {
        for generator in self.generators.iter_mut() {
            if let GeneratorGate::Zones(zones) = &generator.config.gate {
                let open = zones.contains(&zone);
                generator.set_active(open);
            }
        }
    }

    pub fn set_thunder(&mut self, active: bool) {
        self.set_gate(&GeneratorGate::Thunder, active);
    }

    pub fn set_baby_happy(&mut self, active: bool) {
        self.set_gate(&GeneratorGate::BabyHappy, active);
    }

    fn set_gate(&mut self, gate: &GeneratorGate, active: bool) {
        for generator in self.generators.iter_mut() {
            if &generator.config.gate == gate {
                generator.set_active(active);
            }
        }
    }

    /// Assets of every generator behind `gate`
    pub fn assets_for(&self, gate: &GeneratorGate) -> Vec<String> {
        self.generators
            .iter()
            .filter(|g| &g.config.gate == gate)
            .map(|g| g.asset().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::SeededRandom;

    /// Always answers the low bound
    struct LowBound;

    impl RandomSource for LowBound {
        fn range_inclusive(&mut self, low: i32, high: i32) -> i32 {
            low.min(high)
        }

        fn pick_index(&mut self, _len: usize) -> usize {
            0
        }
    }

    #[test]
    fn test_default_table_covers_every_kind() {
        let configs = GeneratorConfig::defaults();
        assert_eq!(configs.len(), 13);
        let wood = configs
            .iter()
            .find(|c| c.kind == GeneratorKind::WoodCreak)
            .unwrap();
        assert_eq!(wood.initial, [15, 15]);
        assert_eq!(wood.reschedule, [12, 25]);
    }

    #[test]
    fn test_inactive_generator_never_fires() {
        let mut rng = LowBound;
        let config = GeneratorConfig::one_shot(
            GeneratorKind::WrenSong,
            "WrenSong",
            GeneratorGate::Zones(vec![Zone::Jungle]),
            [1, 1],
            [1, 1],
        );
        let mut generator = Generator::new(config, &mut rng);
        for _ in 0..100 {
            assert!(!generator.advance(0.5, false, &mut rng));
        }
        assert_eq!(generator.timer(), 0.0);
    }

    #[test]
    fn test_one_shot_fires_and_reschedules() {
        let mut rng = LowBound;
        let config = GeneratorConfig::one_shot(
            GeneratorKind::WrenChirp,
            "WrenChirp",
            GeneratorGate::Zones(vec![Zone::Jungle]),
            [2, 3],
            [5, 6],
        );
        let mut generator = Generator::new(config, &mut rng);
        generator.set_active(true);
        assert_eq!(generator.interval(), 2.0);

        assert!(!generator.advance(1.0, false, &mut rng));
        assert!(generator.advance(1.0, false, &mut rng));
        assert_eq!(generator.timer(), 0.0);
        assert_eq!(generator.interval(), 5.0);
    }

    #[test]
    fn test_one_shot_skips_when_still_playing() {
        let mut rng = LowBound;
        let config = GeneratorConfig::one_shot(
            GeneratorKind::WaterDrop,
            "WaterDropAmbiance",
            GeneratorGate::Zones(vec![Zone::Cave]),
            [1, 1],
            [1, 1],
        );
        let mut generator = Generator::new(config, &mut rng);
        generator.set_active(true);
        assert!(!generator.advance(1.0, true, &mut rng));
        // Rescheduled anyway
        assert_eq!(generator.timer(), 0.0);
    }

    #[test]
    fn test_ensure_playing_restarts_silent_bed() {
        let mut rng = LowBound;
        let config = GeneratorConfig::ensure_playing(
            GeneratorKind::Wind,
            "WindForestLightLoop",
            GeneratorGate::Zones(vec![Zone::Jungle]),
        );
        let mut generator = Generator::new(config, &mut rng);
        generator.set_active(true);
        assert!(generator.advance(0.016, false, &mut rng));
        assert!(!generator.advance(0.016, true, &mut rng));
    }

    #[test]
    fn test_apply_zone_opens_union_of_gates() {
        let mut rng = SeededRandom::new(2);
        let mut set = GeneratorSet::new(GeneratorConfig::defaults(), &mut rng);

        set.apply_zone(Zone::SlaveShip);
        let active: Vec<_> = set.iter().filter(|g| g.is_active()).map(Generator::kind).collect();
        assert_eq!(active, vec![GeneratorKind::WaterDrop, GeneratorKind::WoodCreak]);

        set.apply_zone(Zone::Senzala);
        assert!(set.get(GeneratorKind::WoodCreak).unwrap().is_active());
        assert!(!set.get(GeneratorKind::WaterDrop).unwrap().is_active());

        set.apply_zone(Zone::None);
        assert_eq!(set.iter().filter(|g| g.is_active()).count(), 0);
    }

    #[test]
    fn test_zone_changes_leave_other_gates_alone() {
        let mut rng = SeededRandom::new(2);
        let mut set = GeneratorSet::new(GeneratorConfig::defaults(), &mut rng);
        set.set_thunder(true);
        set.apply_zone(Zone::Cave);
        assert!(set.get(GeneratorKind::Thunder).unwrap().is_active());
        set.set_thunder(false);
        assert!(!set.get(GeneratorKind::Thunder).unwrap().is_active());
    }

    #[test]
    fn test_initial_intervals_within_bounds() {
        let mut rng = SeededRandom::new(99);
        let set = GeneratorSet::new(GeneratorConfig::defaults(), &mut rng);
        for generator in set.iter() {
            let [low, high] = generator.config().initial;
            assert!(generator.interval() >= low as f32);
            assert!(generator.interval() <= high as f32);
        }
    }

    #[test]
    fn test_config_json_shape() {
        let json = r#"{
            "kind": "water_drop",
            "asset": "WaterDropAmbiance",
            "gate": { "zones": ["cave", "slave_ship"] },
            "initial": [7, 9],
            "reschedule": [7, 9]
        }"#;
        let config: GeneratorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.mode, TriggerMode::OneShot);
        assert_eq!(config.gate, GeneratorGate::Zones(vec![Zone::Cave, Zone::SlaveShip]));
    }
}
