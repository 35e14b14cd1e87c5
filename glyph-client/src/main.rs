use anyhow::{Context, Result};
use clap::Parser;
use glyph_client::{load_settings, AsciiSurface, Session, SessionOptions};
use glyph_core::{SimConfig, Simulation};
use glyph_shared::RunSettings;
use std::io::Read;
use std::path::PathBuf;

/// Surface units per terminal cell.
const CELL_WIDTH: f32 = 8.0;
const CELL_HEIGHT: f32 = 16.0;

#[derive(Parser, Debug)]
#[command(author, version, about = "Watch your code run away from the bugs", long_about = None)]
struct Args {
    /// Source file to run (reads stdin when omitted)
    file: Option<PathBuf>,

    /// Terminal columns to simulate on
    #[arg(long, default_value_t = 80)]
    cols: usize,

    /// Terminal rows to simulate on
    #[arg(long, default_value_t = 24)]
    rows: usize,

    /// Number of bugs to release
    #[arg(short, long, default_value_t = 3)]
    predators: usize,

    /// Frames between bug releases
    #[arg(long, default_value_t = 30)]
    predator_every: u64,

    /// Stop after this many frames
    #[arg(short = 'n', long, default_value_t = 3000)]
    frames: u64,

    /// Frames per second of simulated time
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON settings file overriding the simulation constants
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Draw glyphs without arms and legs
    #[arg(long)]
    no_limbs: bool,

    /// Animate in the terminal instead of only printing the final status
    #[arg(short, long)]
    watch: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn read_source(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
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

    anyhow::ensure!(args.fps > 0.0, "--fps must be positive");

    let settings = match &args.config {
        Some(path) => load_settings(path)?,
        None => RunSettings::default(),
    };
    log::debug!("Settings: {:?}", settings);

    let config = SimConfig::from(&settings);
    let mut sim = match args.seed {
        Some(seed) => Simulation::with_seed(config, seed),
        None => Simulation::new(config),
    }
    .context("Invalid simulation settings")?;
    sim.set_limb_rendering_enabled(settings.show_limbs && !args.no_limbs);

    let text = read_source(args.file.as_ref())?;
    let surface = AsciiSurface::new(args.cols, args.rows, CELL_WIDTH, CELL_HEIGHT);
    let options = SessionOptions {
        predators: args.predators,
        predator_every: args.predator_every,
        max_frames: args.frames,
        frame_ms: 1000.0 / args.fps,
        realtime: args.watch,
        draw: args.watch,
    };

    let mut session = Session::new(sim, surface, options);
    let status = session
        .run(&text, &mut std::io::stdout().lock())
        .context("Run failed")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&status).context("Failed to encode status")?
    );

    Ok(())
}
