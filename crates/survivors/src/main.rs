//! Headless survivors driver
//!
//! Plays one autopilot run at a fixed 60 Hz step until death or the time
//! limit, records the result in the high score file and prints a summary.
//!
//! Usage:
//!   survivors --seed 7 --minutes 5
//!   survivors --config tuning.toml --data-dir saves --json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use survivor_engine::foundation::logging;
use survivor_engine::foundation::time::format_mm_ss;
use survivors::prelude::*;

#[derive(Parser)]
#[command(name = "survivors")]
#[command(about = "Run a headless survivors simulation")]
struct Cli {
    /// RNG seed; the same seed replays the same run
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stop after this many in-game minutes if still alive
    #[arg(long, default_value_t = 10.0)]
    minutes: f32,

    /// Gameplay tunables (.toml, .ron or .json); unusable files fall back to defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding highscore.json and options.json
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let config = match &cli.config {
        Some(path) => GameConfig::load_or_fallback(path),
        None => GameConfig::default(),
    };
    let step = config.timing.fixed_step;
    let storage = Storage::new(&cli.data_dir);

    let mut run = Run::new(config, cli.seed).context("Failed to start run")?;
    let pilot = Autopilot::default();
    let limit = cli.minutes.max(0.0) * 60.0;

    while !run.is_over() && run.elapsed() < limit {
        let input = pilot.decide(&run);
        run.step(step, &input);

        for event in run.drain_events() {
            match event {
                GameEvent::BossSpawned { position } => {
                    log::info!("Boss at ({:.0}, {:.0})", position.x, position.y);
                }
                GameEvent::UpgradeApplied { choice } => log::debug!("Took {}", choice.title()),
                _ => {}
            }
        }
    }

    if !run.is_over() {
        run.quit();
    }

    // Reaching the time limit counts as a finished run
    let summary = run.summary();
    let best = storage
        .record_run(summary.kills, summary.survival_time)
        .context("Failed to record high score")?;
    log::info!("Best so far: {} kills, {}", best.high_score, format_mm_ss(best.best_time));

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Survived {} | level {} | {} kills | {:.0} damage dealt",
            format_mm_ss(summary.survival_time),
            summary.level,
            summary.kills,
            summary.damage_dealt
        );
    }
    Ok(())
}
