//! Headless replay runner (default binary).
//!
//! Loads a level, applies a scripted list of swaps and prints the final snapshot as JSON.
//! Logs go to stderr and are controlled by `RUST_LOG` (default `warn`).

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tile_cascade::core::LevelConfig;
use tile_cascade::engine::{BossHealth, Engine, EngineOptions, EngineSnapshot};
use tile_cascade::types::{Pos, SwapRequest};

/// Replay swaps against a tile-matching board.
#[derive(Debug, Parser)]
#[command(
    name = "tile-cascade",
    version,
    about = "Replay swaps against a deterministic tile-matching board and print the result."
)]
struct Args {
    /// Level description (JSON). Missing fields take their defaults.
    #[arg(short, long, value_name = "FILE")]
    level: Option<PathBuf>,

    /// Seed for the tile factory.
    #[arg(short, long, default_value = "1", value_name = "N")]
    seed: u32,

    /// Swap to apply, written `r1,c1:r2,c2`. Repeat for more swaps.
    #[arg(long = "swap", value_name = "SWAP", value_parser = parse_swap)]
    swaps: Vec<SwapRequest>,

    /// Print every engine event as a JSON line before the snapshot.
    #[arg(long)]
    events: bool,

    /// Attach a boss with this much health; defeating it wins the level.
    #[arg(long, value_name = "HP")]
    boss_hp: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplayOutput {
    accepted: usize,
    rejected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    boss_hp: Option<u32>,
    snapshot: EngineSnapshot,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_level(args.level.as_deref())?;

    let boss = args
        .boss_hp
        .map(|hp| Rc::new(RefCell::new(BossHealth::new("boss", hp, config.damage_per_tile))));

    let mut builder = Engine::builder(config).seed(args.seed).options(EngineOptions {
        record_timeline: false,
        ..EngineOptions::default()
    });
    if let Some(boss) = &boss {
        builder = builder.subscribe(boss.clone());
    }
    let mut engine = builder.build().context("failed to start level")?;
    emit_events(&mut engine, args.events)?;

    let (mut accepted, mut rejected) = (0, 0);
    for (index, swap) in args.swaps.iter().enumerate() {
        match engine.try_swap(*swap) {
            Ok(report) => {
                accepted += 1;
                info!(
                    index,
                    cleared = report.cleared_total,
                    steps = report.steps,
                    moves_left = report.moves_left,
                    "swap resolved"
                );
            }
            Err(reason) => {
                rejected += 1;
                warn!(index, reason = reason.code(), "swap rejected: {}", reason);
            }
        }
        emit_events(&mut engine, args.events)?;
    }

    let output = ReplayOutput {
        accepted,
        rejected,
        boss_hp: boss.as_ref().map(|b| b.borrow().hp()),
        snapshot: engine.snapshot(),
    };
    let json = serde_json::to_string_pretty(&output).context("failed to serialize snapshot")?;
    println!("{json}");
    Ok(())
}

fn load_level(path: Option<&Path>) -> Result<LevelConfig> {
    let Some(path) = path else {
        return Ok(LevelConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read level {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse level {}", path.display()))?;
    Ok(config)
}

fn emit_events(engine: &mut Engine, print: bool) -> Result<()> {
    for event in engine.take_events() {
        if print {
            let line = serde_json::to_string(&event).context("failed to serialize event")?;
            println!("{line}");
        }
    }
    Ok(())
}

fn parse_swap(s: &str) -> Result<SwapRequest, String> {
    fn parse_cell(s: &str) -> Result<Pos, String> {
        let (row, col) = s
            .split_once(',')
            .ok_or_else(|| format!("expected `row,col`, got `{s}`"))?;
        let row = row.trim().parse().map_err(|_| format!("bad row `{row}`"))?;
        let col = col.trim().parse().map_err(|_| format!("bad col `{col}`"))?;
        Ok(Pos::new(row, col))
    }

    let (a, b) = s
        .split_once(':')
        .ok_or_else(|| format!("expected `r1,c1:r2,c2`, got `{s}`"))?;
    Ok(SwapRequest::new(parse_cell(a)?, parse_cell(b)?))
}
