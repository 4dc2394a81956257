/* 3rd party libraries */
use clap::Parser;
use crossbeam_channel as cbc;
use log::info;
use std::path::PathBuf;
use std::thread::Builder;

/* Custom libraries */
use config::RenderFormat;
use elevator::ElevatorFSM;
use presentation::ElevatorConsole;
use shared::{Intent, SimulationStatus};

/* Modules */
mod config;
mod elevator;
mod passenger;
mod presentation;
mod shared;

/// Headless single-elevator simulation.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Path to the configuration file
    #[clap(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Number of floors
    #[clap(long)]
    floors: Option<u8>,

    /// Cabin capacity
    #[clap(long)]
    capacity: Option<usize>,

    /// Duration of one cabin movement in milliseconds
    #[clap(long)]
    speed: Option<u64>,

    /// Passengers waiting at startup
    #[clap(long)]
    passengers: Option<usize>,

    /// Start with continuous auto-dispatch enabled
    #[clap(long)]
    auto_dispatch: bool,

    /// Start with automatic passenger spawning enabled
    #[clap(long)]
    auto_spawn: bool,

    /// Seed for the passenger generator
    #[clap(long)]
    seed: Option<u64>,

    /// Print status snapshots as JSON
    #[clap(long)]
    json: bool,
}

/* Main */
fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // Load the configuration
    let mut config = unwrap_or_exit!(
        config::load_config(&args.config),
        "Failed to load configuration"
    );
    apply_overrides(&mut config, &args);
    unwrap_or_exit!(config.validate(), "Invalid configuration");
    info!(
        "Starting simulation: {} floors, capacity {}",
        config.building.floors, config.building.capacity
    );

    // Initialize channels
    let (intent_tx, intent_rx) = cbc::unbounded::<Intent>();
    let (status_tx, status_rx) = cbc::unbounded::<SimulationStatus>();
    let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();

    // Start the renderer
    let render_format = config.render.format;
    let renderer_thread = Builder::new()
        .name("renderer".into())
        .spawn(move || presentation::run_renderer(status_rx, render_format, std::io::stdout()))?;

    // Start the console
    let console = ElevatorConsole::new(config.spawn, intent_tx, terminate_tx);
    Builder::new()
        .name("console".into())
        .spawn(move || console.run(std::io::stdin().lock()))?;

    // Start the simulation
    let elevator_fsm = ElevatorFSM::new(&config, intent_rx, status_tx, terminate_rx);
    let elevator_fsm_thread = Builder::new()
        .name("elevator_fsm".into())
        .spawn(move || elevator_fsm.run())?;

    let _ = elevator_fsm_thread.join();
    let _ = renderer_thread.join();

    Ok(())
}

fn apply_overrides(config: &mut config::Config, args: &Args) {
    if let Some(floors) = args.floors {
        config.building.floors = floors;
    }
    if let Some(capacity) = args.capacity {
        config.building.capacity = capacity;
    }
    if let Some(speed) = args.speed {
        config.building.move_duration_ms = speed;
    }
    if let Some(passengers) = args.passengers {
        config.spawn.initial_passengers = passengers;
    }
    if let Some(seed) = args.seed {
        config.spawn.seed = Some(seed);
    }
    if args.auto_dispatch {
        config.dispatch.auto_dispatch = true;
    }
    if args.auto_spawn {
        config.spawn.auto_spawn = true;
    }
    if args.json {
        config.render.format = RenderFormat::Json;
    }
}
