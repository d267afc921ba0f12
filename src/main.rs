//! Asteroids entry point
//!
//! Headless session: settings from defaults or a JSON file, the demo pilot
//! on the controls, and a log line now and then in place of a window.

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use asteroids::autopilot::Autopilot;
use asteroids::game_loop::StatusLog;
use asteroids::sim::{ControlInput, Entity, ExitReason, GameState, Groups};
use asteroids::{FixedStep, Frame, FrameClock, FramePacer, RenderSink, Settings, run};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "asteroids")]
#[command(about = "Asteroid field simulation flown by a demo pilot")]
struct Cli {
    /// JSON settings file; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// RNG seed (defaults to one derived from the system time)
    #[arg(long)]
    seed: Option<u64>,
    /// Quit after this many ticks
    #[arg(long)]
    max_frames: Option<u64>,
    /// Step at exactly 1/fps without sleeping
    #[arg(long)]
    unpaced: bool,
    /// Log a status line every N ticks (0 disables)
    #[arg(long, default_value_t = 60)]
    status_every: u64,
    /// Print the default settings as JSON and exit
    #[arg(long)]
    print_config: bool,
    /// Print the final drawable set as JSON on exit
    #[arg(long)]
    dump_final: bool,
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let cli = Cli::parse();

    if cli.print_config {
        return match Settings::default().to_json() {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Failed to serialize settings: {e}");
                ExitCode::from(2)
            }
        };
    }

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            eprintln!("Invalid configuration: {e}");
            return ExitCode::from(2);
        }
    };

    let seed = cli.seed.unwrap_or_else(seed_from_time);
    log::info!("Asteroids starting (seed {seed})");

    let mut state = GameState::new(&settings, seed);
    let pilot = RefCell::new(Autopilot::new(&settings));
    let mut status = StatusLog {
        every: cli.status_every,
    };
    let mut polls = 0u64;

    let mut input = || {
        polls += 1;
        match cli.max_frames {
            Some(max) if polls > max => ControlInput::quit(),
            _ => pilot.borrow().next_input(),
        }
    };
    let mut sink = |frame: &Frame<'_>| {
        pilot.borrow_mut().observe(frame);
        status.render(frame);
    };
    let mut pacer: Box<dyn FramePacer> = if cli.unpaced {
        Box::new(FixedStep)
    } else {
        Box::new(FrameClock::new())
    };

    let summary = run(&mut state, &settings, &mut input, &mut sink, pacer.as_mut());
    log::info!(
        "{} ticks: {} shots, {} spawned, {} split, {} destroyed",
        summary.ticks,
        summary.totals.projectiles_fired,
        summary.totals.asteroids_spawned,
        summary.totals.asteroids_split,
        summary.totals.asteroids_destroyed
    );

    if cli.dump_final {
        let drawables: Vec<&Entity> = state.registry.iter(Groups::DRAWABLE).collect();
        match serde_json::to_string_pretty(&drawables) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize final state: {e}"),
        }
    }

    println!("{}", summary.reason.message());
    match summary.reason {
        ExitReason::Quit => ExitCode::SUCCESS,
        ExitReason::Collision => ExitCode::from(1),
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, asteroids::ConfigError> {
    match &cli.config {
        Some(path) => Settings::load(path),
        None => {
            let settings = Settings::default();
            settings.validate()?;
            Ok(settings)
        }
    }
}

fn seed_from_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
