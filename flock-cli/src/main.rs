use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use flock_cli::{
    apply_attractor_update, load_attractor_updates, load_settings, parse_point, snapshot, status,
    SimulationPlan,
};
use flock_core::Flock;
use flock_shared::{AttractorUpdate, Boundary, Preset, SimulationSettings};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    Canvas,
    Scene,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BoundaryArg {
    Wrap,
    Clamp,
    Bounce,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless boid flocking simulation", long_about = None)]
struct Args {
    /// JSON settings file; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Starting parameter set
    #[arg(short, long, value_enum)]
    preset: Option<PresetArg>,

    /// Number of agents
    #[arg(short = 'n', long)]
    agents: Option<usize>,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Spatial dimensions (2 or 3)
    #[arg(long)]
    dims: Option<usize>,

    /// Seed for reproducible initial placement
    #[arg(short, long)]
    seed: Option<u64>,

    /// Attractor position as x,y or x,y,z
    #[arg(short, long)]
    attractor: Option<String>,

    /// JSON lines of attractor updates, one applied before each tick
    #[arg(long)]
    attractor_file: Option<PathBuf>,

    /// What happens at the world edges
    #[arg(short, long, value_enum)]
    boundary: Option<BoundaryArg>,

    /// Log flock status every N ticks (0 disables)
    #[arg(short, long, default_value_t = 60)]
    report_every: u64,

    /// Frames per second to pace the loop at (0 runs unpaced)
    #[arg(long, default_value_t = 0)]
    fps: u32,

    /// Print the final flock snapshot as JSON on stdout
    #[arg(long)]
    dump: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn settings(&self) -> Result<SimulationSettings> {
        let file = match &self.config {
            Some(path) => load_settings(path)?,
            None => SimulationSettings::default(),
        };

        let flags = SimulationSettings {
            preset: self.preset.map(|p| match p {
                PresetArg::Canvas => Preset::Canvas,
                PresetArg::Scene => Preset::Scene,
            }),
            dimensions: self.dims,
            agents: self.agents,
            seed: self.seed,
            boundary: self.boundary.map(|b| match b {
                BoundaryArg::Wrap => Boundary::Wrap,
                BoundaryArg::Clamp => Boundary::Clamp,
                BoundaryArg::Bounce => Boundary::Bounce,
            }),
            attractor: self.attractor.as_deref().map(parse_point).transpose()?,
            ..Default::default()
        };

        Ok(file.merged_with(flags))
    }
}

fn run(flock: &mut Flock, args: &Args, updates: &[AttractorUpdate]) {
    log::info!("Starting simulation loop for {} ticks...", args.ticks);

    let frame = (args.fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(args.fps)));
    let started = Instant::now();
    let mut updates = updates.iter();

    for _ in 0..args.ticks {
        let frame_start = Instant::now();
        // an exhausted trace leaves the attractor where the last update put it
        if let Some(update) = updates.next() {
            apply_attractor_update(flock, update);
        }
        flock.step();

        if args.report_every > 0 && flock.tick() % args.report_every == 0 {
            let s = status(flock);
            log::info!(
                "tick {}: mean speed {:.3}, polarization {:.3}, centroid ({:.1}, {:.1}, {:.1})",
                s.tick,
                s.mean_speed,
                s.polarization,
                s.centroid.x,
                s.centroid.y,
                s.centroid.z
            );
        }

        if let Some(frame) = frame {
            if let Some(rest) = frame.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    let elapsed = started.elapsed().as_secs_f64();
    if elapsed > 0.0 {
        log::debug!("{:.1} ticks per second", args.ticks as f64 / elapsed);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Flock simulation starting...");

    let settings = args.settings().context("Failed to load settings")?;
    let plan = SimulationPlan::resolve(&settings)?;
    log::info!(
        "{} agents, {} dimensions, {:?} boundary",
        plan.agents,
        plan.dims.axes(),
        plan.boundary
    );
    log::debug!("Parameters: {:?}", plan.params);

    let updates = match &args.attractor_file {
        Some(path) => load_attractor_updates(path)?,
        None => Vec::new(),
    };
    if !updates.is_empty() {
        log::info!("Replaying {} attractor updates", updates.len());
        if !plan.params.attraction_enabled {
            log::warn!("Attraction is disabled; attractor updates will have no effect");
        }
    }

    let mut flock = plan.build()?;
    run(&mut flock, &args, &updates);

    if args.dump {
        let json = serde_json::to_string_pretty(&snapshot(&flock))
            .context("Failed to serialize snapshot")?;
        println!("{}", json);
    }

    Ok(())
}
