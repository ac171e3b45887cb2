use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use ambiance_engine::ambiance::{BabyMood, RainState, TidesState, Zone};
use ambiance_engine::audio_system::{AudioLoader, RodioLoader, SilentClipLoader};
use ambiance_engine::{AppResult, AudioSystem, Command, Config};

/// Simulated frame rate of the headless run
const FRAME_RATE: f32 = 60.0;

/// Initialize tracing with a daily rolling log file
fn initialize_tracing() {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Get log directory in user config folder
    let log_dir = dirs::config_dir()
        .map(|dir| dir.join("AmbianceEngine").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "ambiance-engine.log");

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(cfg!(debug_assertions))
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!("Logging to {}", log_dir.display());
}

/// Command line switches
struct Options {
    config: Option<PathBuf>,
    seconds: f32,
    realtime: bool,
}

impl Options {
    fn parse() -> AppResult<Self> {
        let mut options = Self {
            config: None,
            seconds: 75.0,
            realtime: false,
        };

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args.next().context("--config needs a path")?;
                    options.config = Some(PathBuf::from(path));
                }
                "--seconds" => {
                    let value = args.next().context("--seconds needs a value")?;
                    options.seconds = value
                        .parse()
                        .with_context(|| format!("invalid --seconds value: {}", value))?;
                }
                "--realtime" => options.realtime = true,
                other => anyhow::bail!("unknown argument: {}", other),
            }
        }

        Ok(options)
    }
}

/// Scripted gameplay: what the game would send, and when
fn script() -> Vec<(f32, Command)> {
    vec![
        (
            0.0,
            Command::StartZoneTransition {
                zone: Zone::Jungle,
                fade_out: 0.0,
                fade_in: 3.0,
            },
        ),
        (5.0, Command::SetRainState(RainState::Static)),
        (10.0, Command::SetBabyMood(BabyMood::Happy)),
        (15.0, Command::SetRainState(RainState::Crying)),
        (20.0, Command::SetBabyMood(BabyMood::Crying)),
        (20.0, Command::SetBabyCryVolume(0.8)),
        (28.0, Command::RequestBabyFadeOut { interval: 3.0 }),
        (30.0, Command::SetBabyMood(BabyMood::Happy)),
        (
            35.0,
            Command::StartZoneTransition {
                zone: Zone::Cave,
                fade_out: 2.0,
                fade_in: 3.0,
            },
        ),
        (
            45.0,
            Command::SetTidesState {
                state: TidesState::FadeIn,
                volume: Some(0.6),
                duration: Some(4.0),
            },
        ),
        (55.0, Command::SetTidesState {
            state: TidesState::Attack,
            volume: None,
            duration: None,
        }),
        (65.0, Command::SetTidesState {
            state: TidesState::None,
            volume: None,
            duration: None,
        }),
        (65.0, Command::SetRainState(RainState::None)),
    ]
}

fn main() -> AppResult<()> {
    initialize_tracing();

    let options = Options::parse()?;

    let (config, config_path) = match &options.config {
        Some(path) => (Config::load_from(path)?, path.clone()),
        None => (Config::load()?, Config::config_path()?),
    };

    let asset_root = config.asset_root_path(&config_path);
    let loader: Box<dyn AudioLoader + Send> = if asset_root.is_dir() {
        tracing::info!("Loading sounds from {}", asset_root.display());
        Box::new(RodioLoader::new(&asset_root))
    } else {
        tracing::warn!(
            "Asset root {} not found, using silent clips",
            asset_root.display()
        );
        Box::new(SilentClipLoader::default())
    };

    let mut system =
        AudioSystem::from_config(&config, loader).context("Failed to build the audio system")?;

    let (events, _subscription) = system.event_bus().subscribe();
    let sender = system.command_sender();

    let mut script = script().into_iter().peekable();
    let delta = 1.0 / FRAME_RATE;
    let frames = (options.seconds * FRAME_RATE).ceil() as u64;

    tracing::info!(
        "Running {:.0}s of scripted gameplay at {} fps{}",
        options.seconds,
        FRAME_RATE,
        if options.realtime { " (realtime)" } else { "" }
    );

    for frame in 0..frames {
        let now = frame as f32 * delta;

        while let Some((_, command)) = script.next_if(|(at, _)| *at <= now) {
            sender
                .send(command)
                .context("Command queue closed")?;
        }

        system.tick(delta);

        for event in events.try_iter() {
            tracing::info!("[{:6.2}s] {}", now, event.description());
        }

        if options.realtime {
            thread::sleep(Duration::from_secs_f32(delta));
        }
    }

    system.submit(Command::Shutdown);
    system.tick(delta);
    for event in events.try_iter() {
        tracing::info!("{}", event.description());
    }

    Ok(())
}
