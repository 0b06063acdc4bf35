//! Headless demo battle.
//!
//! Loads the bundled skirmish encounter, hands every unit to the computer,
//! and plays the battle out, streaming each event as a JSON line on stdout.
//! Logs go to stderr. An optional argument fixes the seed; `--paced` plays
//! at presentation speed instead of full speed.
//!
//! `BATTLE_DATA_DIR` overrides where content is loaded from.

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use tracing_subscriber::EnvFilter;

use battle_content::{ContentFactory, build_setup};
use battle_core::{BattleEvent, BattleFlow, Driver, Pcg32};
use runtime::{BattleSession, InstantClock, NearestFoePlanner, PresentationSink, ScriptedInput};

/// Prints each drained event as one JSON line.
struct JsonLines;

#[async_trait]
impl PresentationSink for JsonLines {
    async fn present(&mut self, event: &BattleEvent) {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(error) => tracing::warn!(%error, "event not serializable"),
        }
    }
}

fn data_dir() -> PathBuf {
    env::var_os("BATTLE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("crates/battle/content/data"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut seed = None;
    let mut paced = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--paced" => paced = true,
            other => seed = Some(other.parse::<u64>().context("seed must be a u64")?),
        }
    }
    let seed = seed.unwrap_or_else(rand::random);

    let factory = ContentFactory::new(data_dir());
    let registry = factory.load_registry()?;
    let encounter = factory.load_encounter("skirmish")?;

    let mut rng = Pcg32::new(seed);
    let (board, mut setup) = build_setup(&encounter, &registry, &mut rng)?;
    // The demo has no player; the computer drives the hero party too.
    for spawn in &mut setup.spawns {
        spawn.unit.driver = Driver::Computer;
    }

    tracing::info!(seed, encounter = %encounter.name, "starting demo battle");

    let flow = BattleFlow::new(
        Box::new(board),
        setup,
        Box::new(rng),
        Box::new(NearestFoePlanner),
    )?;

    let mut session = BattleSession::new(flow).with_sink(JsonLines);
    if !paced {
        session = session.with_clock(InstantClock);
    }

    let report = session.run(ScriptedInput::default()).await?;
    tracing::info!(
        victor = ?report.victor,
        rounds = report.rounds,
        survivors = report.survivors.len(),
        "demo battle finished"
    );
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
