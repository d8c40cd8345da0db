//! kickabout — a rust_hb soccer team on a toy pitch.
//!
//! Runs the four-player team from `hb-soccer` against random opponents,
//! loads the striker and defender definitions from `config/`, and writes the
//! activation trace of every player to `output/activation_trace.csv` plus
//! the last activation graph of player 0 to `output/last_graph.json`.
//!
//! ```bash
//! RUST_LOG=hb_engine=debug cargo run -p kickabout
//! ```

mod pitch;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use hb_defs::DirSource;
use hb_engine::CycleObserver;
use hb_output::{CsvTraceWriter, TraceObserver};
use hb_soccer::Team;

use pitch::Pitch;

// ── Constants ─────────────────────────────────────────────────────────────────

const STEPS:      u64  = 600;
const SEED:       u64  = 7;
const OUTPUT_DIR: &str = "output";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();

    println!("=== kickabout — rust_hb soccer ===");
    println!("Steps: {STEPS}  |  Seed: {SEED}");

    // 1. Team with definitions from the config directory.
    let config_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("config");
    let mut team = Team::new(Arc::new(DirSource::new(&config_dir)))?;
    println!("Definitions: {}", config_dir.display());

    // 2. Trace output.
    let out_dir = Path::new(OUTPUT_DIR);
    std::fs::create_dir_all(out_dir).context("creating output directory")?;
    let mut trace = TraceObserver::new(CsvTraceWriter::new(out_dir)?);

    // 3. Play.
    let mut pitch = Pitch::new(SEED);
    let t0 = Instant::now();
    for step in 0..STEPS {
        let actions = team
            .step(&pitch.snapshots())
            .with_context(|| format!("team step {step}"))?;
        for player in team.players() {
            let b = player.behavior();
            if let Some(now) = b.last_cycle() {
                trace.on_cycle_end(b.id(), now, b.activation_graph());
            }
        }
        pitch.apply(&actions);
    }
    let elapsed = t0.elapsed();

    trace.finish();
    if let Some(err) = trace.take_error() {
        return Err(err).context("writing activation trace");
    }

    // 4. Last graph of player 0, for viewers that read JSON.
    if let Some(player) = team.player(0) {
        let json = serde_json::to_string_pretty(player.activation_graph())?;
        std::fs::write(out_dir.join("last_graph.json"), json).context("writing last_graph.json")?;
    }

    println!();
    println!("Score      home {} : {} away", pitch.home_goals, pitch.away_goals);
    println!("Kicks      {}", pitch.kicks);
    println!("Cycles     {} traced", trace.cycles());
    println!("Elapsed    {:.1} ms", elapsed.as_secs_f64() * 1e3);
    println!("Output     {}/", out_dir.display());
    Ok(())
}
