//! Synth CLI - lay out a score fixture and print the placed glyphs.
//!
//! Reads a JSON score fixture, synthesizes it as one staff system with the
//! rectangle synthesizer, and writes every placed glyph and sprite as JSON.

mod fixture;
mod logger;

use anyhow::{Context, Result};
use clap::Parser;
use fixture::ScoreFixture;
use layout::{synthesize_staff_system, LayoutConfig, RectangleSynthesizer};
use logger::{level_from_verbosity, SynthLogger};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scene_graph::{collect_placements, Placements, Scene};
use serde::Serialize;
use std::path::PathBuf;

/// Synth CLI - synthesize notation layouts from score fixtures
#[derive(Parser)]
#[command(name = "synth")]
#[command(about = "Lay out a music score fixture and print glyph placements")]
struct Cli {
    /// Score fixture (JSON)
    score: PathBuf,

    /// Layout config (JSON); missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for every random choice of the layout
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Draw flags as composed glyphs (overrides the config)
    #[arg(long)]
    composed_flags: bool,

    /// Write placements here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also append log records to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Output {
    run_id: String,
    seed: u64,
    content_width: f32,
    placements: Placements,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let run_id = SynthLogger::init(level_from_verbosity(cli.verbose), cli.log_file.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            LayoutConfig::from_json(&json).with_context(|| format!("Invalid config: {}", path.display()))?
        }
        None => LayoutConfig::default(),
    };
    config.composed_flags |= cli.composed_flags;

    let json = std::fs::read_to_string(&cli.score)
        .with_context(|| format!("Failed to read score: {}", cli.score.display()))?;
    let fixture = ScoreFixture::from_json(&json)?;

    let mut scene = Scene::new();
    let score = fixture.build(&mut scene)?;

    let synthesizer = RectangleSynthesizer::new(config.staff_space).with_composed_flags(config.composed_flags);
    let mut rng = StdRng::seed_from_u64(cli.seed);
    let system = synthesize_staff_system(&mut scene, score, &synthesizer, &synthesizer, &config, &mut rng)
        .context("Layout failed")?;
    let placements = collect_placements(&scene, system.page)?;
    log::info!(
        "placed {} glyphs and {} sprites",
        placements.glyphs.len(),
        placements.sprites.len()
    );

    let output = Output {
        run_id,
        seed: cli.seed,
        content_width: system.content_width,
        placements,
    };
    let json = serde_json::to_string_pretty(&output)?;
    match &cli.output {
        Some(path) => std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}
