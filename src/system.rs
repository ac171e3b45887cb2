//! Composition root
//!
//! `AudioSystem` owns the engine, the ambiance coordinator, the command queue
//! and the event bus. It is driven by one `tick(delta)` per frame; commands
//! sent from other threads are applied at the start of the next tick, so
//! every mutation happens on the ticking thread.

use crossbeam_channel::Sender;

use crate::ambiance::{AmbianceCoordinator, AmbianceTuning};
use crate::audio_system::{AudioEngine, AudioLoader, RandomSource, SeededRandom};
use crate::config::Config;
use crate::error::AudioError;
use crate::messaging::{Command, CommandQueue, CommandResult, Event, EventBus};

pub struct AudioSystem {
    engine: AudioEngine,
    ambiance: AmbianceCoordinator,
    commands: CommandQueue,
    events: EventBus,
    enabled: bool,
}

impl AudioSystem {
    /// Wrap an engine whose catalog is already declared
    pub fn new(mut engine: AudioEngine, tuning: AmbianceTuning) -> Self {
        let ambiance = AmbianceCoordinator::new(tuning, engine.random());

        Self {
            engine,
            ambiance,
            commands: CommandQueue::new(),
            events: EventBus::new(),
            enabled: true,
        }
    }

    /// Build the engine from a config: declare the catalog, then preload
    ///
    /// A duplicate catalog name is the one startup error treated as fatal.
    pub fn from_config(
        config: &Config,
        loader: Box<dyn AudioLoader + Send>,
    ) -> Result<Self, AudioError> {
        let random: Box<dyn RandomSource + Send> = match config.seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(SeededRandom::from_entropy()),
        };

        let mut engine = AudioEngine::new(loader, random, config.engine.settings());
        for entry in &config.catalog {
            engine.declare(entry.clone())?;
        }
        tracing::info!("Declared {} sounds", engine.directory().declared_count());

        let mut system = Self::new(engine, config.ambiance.clone());
        system.preload(&config.preload);
        Ok(system)
    }

    pub fn engine(&self) -> &AudioEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut AudioEngine {
        &mut self.engine
    }

    pub fn ambiance(&self) -> &AmbianceCoordinator {
        &self.ambiance
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }

    /// Get a sender for submitting commands from another thread
    pub fn command_sender(&self) -> Sender<Command> {
        self.commands.sender()
    }

    /// Queue a command for the next tick
    pub fn submit(&self, command: Command) {
        self.commands.submit(command);
    }

    /// Load sounds ahead of their first use; returns how many are loaded
    pub fn preload(&mut self, names: &[String]) -> usize {
        let mut loaded = 0;
        for name in names {
            let result = self.engine.load(name);
            if self.engine.recover("preload", result).is_some() {
                loaded += 1;
            }
        }
        tracing::debug!("Preloaded {}/{} sounds", loaded, names.len());
        loaded
    }

    pub fn is_audio_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable_audio(&mut self) {
        self.set_enabled(true);
    }

    /// Stop reacting to commands and stop ticking the ambiance
    ///
    /// Fades already running keep advancing.
    pub fn disable_audio(&mut self) {
        self.set_enabled(false);
    }

    fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        tracing::info!("Audio {}", if enabled { "enabled" } else { "disabled" });
        self.events.publish(Event::AudioEnabledChanged { enabled });
    }

    /// Apply one command immediately
    pub fn execute(&mut self, command: Command) -> CommandResult {
        if !self.enabled && !command.bypasses_disable() {
            tracing::debug!("Audio disabled, ignoring: {}", command.description());
            return CommandResult::Ignored;
        }

        tracing::debug!("Executing command: {}", command.description());
        let context = command.description();

        let engine = &mut self.engine;
        let ambiance = &mut self.ambiance;

        let result: Result<(), AudioError> = match command {
            Command::StartZoneTransition { zone, fade_out, fade_in } => {
                ambiance.start_zone_transition(zone, fade_out, fade_in, engine);
                Ok(())
            }
            Command::SetBabyMood(mood) => {
                ambiance.set_baby_mood(mood, engine);
                Ok(())
            }
            Command::SetBabyCryVolume(level) => {
                ambiance.set_baby_cry_volume(level);
                Ok(())
            }
            Command::RequestBabyFadeOut { interval } => {
                ambiance.request_baby_fade_out(interval);
                Ok(())
            }
            Command::SetRainState(state) => {
                ambiance.set_rain_state(state, engine);
                Ok(())
            }
            Command::SetTidesState { state, volume, duration } => {
                ambiance.set_tides_state(state, volume, duration, engine);
                Ok(())
            }
            Command::SetTidesVolume(volume) => {
                ambiance.set_tides_volume(volume);
                Ok(())
            }
            Command::StartThunder => {
                ambiance.start_thunder();
                Ok(())
            }
            Command::StopThunder => {
                ambiance.stop_thunder(engine);
                Ok(())
            }
            Command::Play { name, volume } => match volume {
                Some(volume) => engine.play_at(&name, volume).map(|_| ()),
                None => engine.play(&name).map(|_| ()),
            },
            Command::LoopPlay { name, volume } => match volume {
                Some(volume) => engine.loop_play_at(&name, volume).map(|_| ()),
                None => engine.loop_play(&name).map(|_| ()),
            },
            Command::Stop { name } => engine.stop(&name),
            Command::FadeIn { name, duration } => engine.fade_in(&name, duration).map(|_| ()),
            Command::FadeOut {
                name,
                duration,
                min_volume,
                stop,
            } => {
                if stop {
                    engine.fade_out_to_stop(&name, duration, min_volume).map(|_| ())
                } else {
                    engine.fade_out(&name, duration, min_volume).map(|_| ())
                }
            }
            Command::SetVolume { name, volume } => engine.set_volume(&name, volume).map(|_| ()),
            Command::Mute { name } => engine.mute(&name),
            Command::Unmute { name } => engine.unmute(&name),
            Command::FadeOutSounds { duration, min_volume } => {
                engine.fade_out_sounds(duration, min_volume);
                Ok(())
            }
            Command::FadeInMusic { duration } => {
                engine.fade_in_music(duration);
                Ok(())
            }
            Command::FadeOutMusic { duration, min_volume } => {
                engine.fade_out_music(duration, min_volume);
                Ok(())
            }
            Command::StopSounds => {
                engine.stop_sounds();
                Ok(())
            }
            Command::StopMusic => {
                engine.stop_music();
                Ok(())
            }
            Command::EnableAudio => {
                self.set_enabled(true);
                Ok(())
            }
            Command::DisableAudio => {
                self.set_enabled(false);
                Ok(())
            }
            Command::Shutdown => {
                self.shutdown();
                Ok(())
            }
        };

        self.publish_pending();

        match result {
            Ok(()) => CommandResult::Success,
            Err(e) => {
                let message = e.to_string();
                self.engine.recover(&context, Err::<(), _>(e));
                self.events.publish(Event::ErrorOccurred {
                    message: message.clone(),
                    context,
                });
                CommandResult::Error(message)
            }
        }
    }

    /// Advance one frame
    ///
    /// Applies queued commands, runs the ambiance state machines (or only the
    /// fades while audio is disabled) and broadcasts what happened.
    pub fn tick(&mut self, delta: f32) {
        for command in self.commands.drain() {
            self.execute(command);
        }

        if self.enabled {
            self.ambiance.tick(delta, &mut self.engine);
            self.publish_pending();
        } else {
            for completion in self.engine.tick(delta) {
                self.events.publish(Event::FadeCompleted {
                    name: completion.name,
                    outcome: completion.outcome,
                });
            }
        }
    }

    /// Stop and unload everything
    pub fn shutdown(&mut self) {
        self.engine.shutdown();
        self.events.publish(Event::Shutdown);
    }

    fn publish_pending(&mut self) {
        self.events.publish_all(self.ambiance.drain_events());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambiance::{BabyMood, RainState, Zone};
    use crate::audio_system::{AudioCategory, CatalogEntry, EngineSettings, SilentClipLoader};

    fn system() -> AudioSystem {
        let mut engine = AudioEngine::new(
            Box::new(SilentClipLoader::new(30.0)),
            Box::new(SeededRandom::new(3)),
            EngineSettings::default(),
        );
        engine
            .declare(
                CatalogEntry::new("RainMedium", AudioCategory::Rain, &["rain.ogg"])
                    .with_volumes(0.8, 0.0),
            )
            .unwrap();
        engine
            .declare(CatalogEntry::new("MusicTheme", AudioCategory::Music, &["theme.ogg"]))
            .unwrap();
        engine
            .declare(CatalogEntry::new("DoorWoodOpen", AudioCategory::Object, &["door.ogg"]))
            .unwrap();
        AudioSystem::new(engine, AmbianceTuning::default())
    }

    #[test]
    fn test_commands_apply_on_tick() {
        let mut system = system();
        system.submit(Command::SetRainState(RainState::Static));
        assert_eq!(system.ambiance().rain_state(), RainState::None);

        system.tick(0.016);
        assert_eq!(system.ambiance().rain_state(), RainState::Static);
        assert!(system.engine().is_playing("RainMedium"));
    }

    #[test]
    fn test_events_are_broadcast() {
        let mut system = system();
        let (rx, _id) = system.event_bus().subscribe();

        system.submit(Command::SetBabyMood(BabyMood::Upset));
        system.tick(0.016);

        let events: Vec<_> = rx.try_iter().collect();
        assert!(events.contains(&Event::BabyMoodChanged {
            old: BabyMood::NoBaby,
            new: BabyMood::Upset
        }));
    }

    #[test]
    fn test_unknown_sound_reports_error() {
        let mut system = system();
        let (rx, _id) = system.event_bus().subscribe();

        let result = system.execute(Command::Play {
            name: "Nope".to_string(),
            volume: None,
        });
        assert_eq!(result, CommandResult::Error("Sound not found in catalog: Nope".to_string()));
        assert!(matches!(rx.try_recv().unwrap(), Event::ErrorOccurred { .. }));
    }

    #[test]
    fn test_disabled_audio_ignores_commands() {
        let mut system = system();
        system.disable_audio();
        assert!(!system.is_audio_enabled());

        let result = system.execute(Command::StartZoneTransition {
            zone: Zone::Cave,
            fade_out: 0.0,
            fade_in: 1.0,
        });
        assert_eq!(result, CommandResult::Ignored);

        for _ in 0..10 {
            system.tick(0.1);
        }
        assert_eq!(system.ambiance().zone(), Zone::None);

        assert_eq!(system.execute(Command::EnableAudio), CommandResult::Success);
        assert!(system.is_audio_enabled());
    }

    #[test]
    fn test_fades_continue_while_disabled() {
        let mut system = system();
        system.engine_mut().loop_play("MusicTheme").unwrap();
        system.execute(Command::FadeOutMusic {
            duration: 0.5,
            min_volume: 0.0,
        });
        system.disable_audio();

        for _ in 0..30 {
            system.tick(0.1);
        }
        assert!(!system.engine().is_playing("MusicTheme"));
    }

    #[test]
    fn test_bulk_commands() {
        let mut system = system();
        system.engine_mut().play("DoorWoodOpen").unwrap();
        system.engine_mut().play("MusicTheme").unwrap();

        system.execute(Command::StopSounds);
        assert!(!system.engine().is_playing("DoorWoodOpen"));
        assert!(system.engine().is_playing("MusicTheme"));

        system.execute(Command::StopMusic);
        assert!(!system.engine().is_playing("MusicTheme"));
    }

    #[test]
    fn test_preload_counts_known_sounds() {
        let mut system = system();
        let loaded = system.preload(&["MusicTheme".to_string(), "Missing".to_string()]);
        assert_eq!(loaded, 1);
        assert!(system.engine().is_loaded("MusicTheme"));
    }

    #[test]
    fn test_shutdown_unloads_and_announces() {
        let mut system = system();
        let (rx, _id) = system.event_bus().subscribe();
        system.engine_mut().play("MusicTheme").unwrap();

        system.submit(Command::Shutdown);
        system.tick(0.016);
        assert_eq!(system.engine().loaded_count(), 0);
        assert!(rx.try_iter().any(|e| e == Event::Shutdown));
    }

    #[test]
    fn test_from_config_declares_and_preloads() {
        let config = Config::default();
        let system =
            AudioSystem::from_config(&config, Box::new(SilentClipLoader::default())).unwrap();
        assert_eq!(system.engine().directory().declared_count(), config.catalog.len());
        assert!(system.engine().is_loaded("HeavenwardTidesCountdown"));
    }

    #[test]
    fn test_from_config_rejects_duplicates() {
        let mut config = Config::default();
        config.catalog.push(config.catalog[0].clone());
        let result = AudioSystem::from_config(&config, Box::new(SilentClipLoader::default()));
        assert!(matches!(result, Err(AudioError::DuplicateName(_))));
    }
}
