#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line driver for Push Knight.
//!
//! Runs a level frame by frame, feeds a scripted move sequence to the player
//! and prints every drained event followed by a short summary.

mod script;

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use push_knight_core::{Event, LevelSelection, SimulationConfig, WavePhase};
use push_knight_world::{query, Layout, World};

/// Runs a headless Push Knight session and prints the event stream.
#[derive(Debug, Parser)]
#[command(name = "push-knight", version)]
struct Args {
    /// Level to play: 1, 2, 3, or 0 for endless waves.
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Seed for the generated arena and the wave director.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    /// Length of a frame in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Player input, one character per frame: w, a, s, d, or `.` to idle.
    #[arg(long, default_value = "")]
    moves: String,
    /// ASCII map to play on instead of the generated arena.
    #[arg(long)]
    layout: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let level = LevelSelection::from_number(args.level).context("invalid --level")?;
    let moves = script::parse(&args.moves).context("invalid --moves")?;

    let mut config = SimulationConfig::default();
    if let Some(seed) = args.seed {
        config.layout.seed = seed;
        config.spawning.rng_seed = seed;
    }

    let mut world = match &args.layout {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read layout {}", path.display()))?;
            let layout = Layout::from_ascii(&text)
                .with_context(|| format!("failed to parse layout {}", path.display()))?;
            World::with_layout(config, level, &layout)
        }
        None => World::new(config, level).context("failed to generate the arena")?,
    };

    let frame = Duration::from_millis(args.frame_ms);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut moves = moves.into_iter();

    for frame_index in 0..args.ticks {
        if let Some(Some(direction)) = moves.next() {
            let _ = world.attempt_move(direction);
        }
        world.tick(frame);

        for event in world.drain_events() {
            writeln!(out, "{frame_index:>6}  {}", describe(&event))?;
        }

        if query::is_game_over(&world) {
            info!("run ended by player death on frame {frame_index}");
            break;
        }
        if query::is_level_complete(&world) {
            info!("run ended by level completion on frame {frame_index}");
            break;
        }
    }

    let player = query::player(&world);
    let wave = query::wave_status(&world);
    let total = wave
        .total_waves
        .map_or_else(|| "endless".to_owned(), |total| total.to_string());
    let phase = match wave.phase {
        WavePhase::Active => "active",
        WavePhase::Resting => "resting",
    };
    let outcome = if !player.alive {
        "defeat"
    } else if query::is_level_complete(&world) {
        "victory"
    } else {
        "in progress"
    };

    writeln!(out, "---")?;
    writeln!(out, "outcome: {outcome}")?;
    writeln!(
        out,
        "player: {}/{} hp at ({}, {})",
        player.health.get(),
        player.max_health.get(),
        player.cell.column(),
        player.cell.row()
    )?;
    writeln!(
        out,
        "wave: {} of {total} ({phase}), {}/{} spawned, {} defeated",
        wave.wave, wave.spawned, wave.per_wave, wave.defeated
    )?;
    writeln!(out, "enemies alive: {}", query::enemy_view(&world).len())?;
    Ok(())
}

fn describe(event: &Event) -> String {
    match *event {
        Event::EnemySpawned { cell, kind, health } => format!(
            "spawn    {kind:?} at ({}, {}) with {} hp",
            cell.column(),
            cell.row(),
            health.get()
        ),
        Event::EnemyMoved { from, to, health } => format!(
            "move     enemy ({}, {}) -> ({}, {}), {} hp",
            from.column(),
            from.row(),
            to.column(),
            to.row(),
            health.get()
        ),
        Event::EnemyDamaged { cell, health } => format!(
            "damage   enemy at ({}, {}), {} hp left",
            cell.column(),
            cell.row(),
            health.get()
        ),
        Event::EntityRemoved { cell } => {
            format!("remove   enemy at ({}, {})", cell.column(), cell.row())
        }
        Event::Impact { cell } => format!("impact   at ({}, {})", cell.column(), cell.row()),
        Event::PlayerDamaged { cell, health } => format!(
            "hurt     player at ({}, {}), {} hp left",
            cell.column(),
            cell.row(),
            health.get()
        ),
        Event::PlayerMoved { from, to } => format!(
            "step     player ({}, {}) -> ({}, {})",
            from.column(),
            from.row(),
            to.column(),
            to.row()
        ),
    }
}
