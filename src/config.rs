use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ambiance::AmbianceTuning;
use crate::audio_system::{
    AudioCategory, CatalogEntry, EngineSettings, FadeRamp, FadeReference, FadeSettings,
};
use crate::error::ConfigError;

/// Engine behaviour switches as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// `padded` keeps the legacy `duration + 1` ramp, `exact` honours the duration
    pub fade_ramp: FadeRamp,

    /// `shared_first_layer` scales every layer by layer 0's start volume
    pub fade_reference: FadeReference,

    /// Log missing sounds at warn level instead of debug
    pub report_missing: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fade_ramp: FadeRamp::Padded,
            fade_reference: FadeReference::SharedFirstLayer,
            report_missing: true,
        }
    }
}

impl EngineConfig {
    pub fn settings(&self) -> EngineSettings {
        EngineSettings {
            fade: FadeSettings::default()
                .with_ramp(self.fade_ramp)
                .with_reference(self.fade_reference),
            report_missing: self.report_missing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory layer paths are resolved against (relative to the config directory)
    pub asset_root: String,

    /// Fixed RNG seed for reproducible runs; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub engine: EngineConfig,

    /// Every sound the game can play
    #[serde(default = "default_catalog")]
    pub catalog: Vec<CatalogEntry>,

    /// Sounds loaded eagerly at startup
    #[serde(default = "default_preload")]
    pub preload: Vec<String>,

    #[serde(default)]
    pub ambiance: AmbianceTuning,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_root: "sounds".to_string(),
            seed: None,
            engine: EngineConfig::default(),
            catalog: default_catalog(),
            preload: default_preload(),
            ambiance: AmbianceTuning::default(),
        }
    }
}

fn default_preload() -> Vec<String> {
    vec!["HeavenwardTidesCountdown".to_string()]
}

/// The game's built-in sound catalog
pub fn default_catalog() -> Vec<CatalogEntry> {
    use AudioCategory::*;

    let sound = |name: &str, category: AudioCategory, folder: &str| {
        let path = format!("{}/{}.ogg", folder, name);
        CatalogEntry::new(name, category, &[path.as_str()])
    };

    let mut catalog = vec![
        // Footsteps carry one layer per variation
        CatalogEntry::new(
            "FootstepGrass",
            Player,
            &[
                "player/FootstepGrass1.ogg",
                "player/FootstepGrass2.ogg",
                "player/FootstepGrass3.ogg",
            ],
        )
        .with_volumes(0.5, 0.5),
        CatalogEntry::new(
            "FootstepStone",
            Player,
            &["player/FootstepStone1.ogg", "player/FootstepStone2.ogg"],
        )
        .with_volumes(0.5, 0.5),
        CatalogEntry::new(
            "FootstepWood",
            Player,
            &["player/FootstepWood1.ogg", "player/FootstepWood2.ogg"],
        )
        .with_volumes(0.5, 0.5),
    ];

    for name in [
        "GrabChain",
        "GrabLedge",
        "GrabRope",
        "HeartbeatLoop",
        "LandingGrass",
        "LandingWood",
        "SlidingLoop",
    ] {
        catalog.push(sound(name, Player, "player"));
    }

    for name in [
        "BabyAmbiance",
        "BabyCry",
        "BabyCryLoop",
        "BabyCryStart",
        "BabyCryStop",
        "BabySetDown",
        "BabyHug",
    ] {
        catalog.push(sound(name, Baby, "baby"));
    }

    // One-shot cues are objects so zone fades leave them to their generators
    for name in [
        "CricketsLoop1",
        "CricketsLoop2",
        "FliesLoop",
        "WrenChirp",
        "WrenSong",
        "WaterDropAmbiance",
        "WoodCreakAmbiance",
        "ThunderAmbiance",
        "ThunderClap",
        "HowlingMonkey1",
        "HowlingMonkey2",
    ] {
        catalog.push(sound(name, Object, "ambiance"));
    }

    catalog.push(sound("WindForestLightLoop", Jungle, "ambiance").with_volumes(0.7, 0.7));
    catalog.push(sound("TorchLoop", Dungeon, "ambiance").with_volumes(0.6, 0.6));

    for name in [
        "HeavenwardTidesStaticLoop",
        "HeavenwardTidesAttackLoop",
        "HeavenwardTidesCountdown",
        "HeavenwardTidesSplashdown",
    ] {
        catalog.push(sound(name, HeavenwardTides, "tides"));
    }

    for name in ["RainLight", "RainMedium", "RainHeavy"] {
        catalog.push(sound(name, Rain, "ambiance").with_volumes(0.8, 0.0));
    }

    for name in [
        "DoorWoodOpen",
        "DoorWoodClose",
        "DoorMetalSlam",
        "KeyGrab",
        "KeyUnlock",
        "GateSlam",
        "GearsLoop",
    ] {
        catalog.push(sound(name, Object, "objects"));
    }

    for name in ["MusicCh1Ambiance1", "MusicCh1Ambiance2", "MusicCh2Intro", "MusicCh2Ending"] {
        catalog.push(sound(name, Music, "music"));
    }

    catalog
}

impl Config {
    /// Load configuration from the config directory next to the executable.
    /// Creates default config if file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let config = Self::load_from(&config_path)?;
            tracing::info!("Loaded config from: {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(&config_path)?;
            tracing::info!("Created default config at: {}", config_path.display());
            Ok(config)
        }
    }

    /// Load and validate a config file at an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::LoadFailed {
                path: path.display().to_string(),
                source,
            }
        };

        let content = fs::read_to_string(path).map_err(|e| load_failed(Box::new(e)))?;
        let config: Config = serde_json::from_str(&content).map_err(|e| load_failed(Box::new(e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to disk, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::DirectoryCreationFailed {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let save_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::SaveFailed {
                path: path.display().to_string(),
                source,
            }
        };

        let json = serde_json::to_string_pretty(self).map_err(|e| save_failed(Box::new(e)))?;
        fs::write(path, json).map_err(|e| save_failed(Box::new(e)))?;

        Ok(())
    }

    /// Get the config file path (in app's base directory)
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let exe_path = env::current_exe().map_err(|e| ConfigError::LoadFailed {
            path: "<current exe>".to_string(),
            source: Box::new(e),
        })?;
        let exe_dir = exe_path
            .parent()
            .ok_or_else(|| {
                ConfigError::Invalid("Could not determine executable directory".to_string())
            })?;

        Ok(exe_dir.join("config").join("config.json"))
    }

    /// Resolve `asset_root` against the directory holding `config_path`
    pub fn asset_root_path(&self, config_path: &Path) -> PathBuf {
        let root = Path::new(&self.asset_root);
        if root.is_absolute() {
            return root.to_path_buf();
        }
        config_path
            .parent()
            .map(|dir| dir.join(root))
            .unwrap_or_else(|| root.to_path_buf())
    }

    /// Reject catalogs and tables the engine could not run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for entry in &self.catalog {
            if !names.insert(entry.name.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate sound name: {}", entry.name)));
            }
            if entry.layers.is_empty() {
                return Err(ConfigError::Invalid(format!("sound {} has no layers", entry.name)));
            }
            let volumes = 0.0..=1.0;
            if !volumes.contains(&entry.default_volume)
                || !volumes.contains(&entry.initial_volume)
            {
                return Err(ConfigError::Invalid(format!(
                    "sound {} has a volume outside [0, 1]",
                    entry.name
                )));
            }
        }

        for name in &self.preload {
            if !names.contains(name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "preloaded sound {} is not in the catalog",
                    name
                )));
            }
        }

        for generator in &self.ambiance.generators {
            for [low, high] in [generator.initial, generator.reschedule] {
                if low > high || low < 0 {
                    return Err(ConfigError::Invalid(format!(
                        "{} generator has invalid bounds [{}, {}]",
                        generator.kind, low, high
                    )));
                }
            }
        }

        let baby = &self.ambiance.baby;
        if baby.min_cry_volume < 0.0
            || baby.max_cry_volume > 1.0
            || baby.min_cry_volume > baby.max_cry_volume
        {
            return Err(ConfigError::Invalid(format!(
                "baby cry volume range [{}, {}] is inverted or outside [0, 1]",
                baby.min_cry_volume, baby.max_cry_volume
            )));
        }

        let rain = &self.ambiance.rain;
        let volumes = 0.0..=1.0;
        if !volumes.contains(&rain.static_volume) || !volumes.contains(&rain.crying_volume) {
            return Err(ConfigError::Invalid("rain volumes must be within [0, 1]".to_string()));
        }

        Ok(())
    }
}
