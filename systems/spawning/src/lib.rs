#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave director deciding when, where and what enemies spawn.
//!
//! The director owns no grid state. The world passes the number of live
//! enemies and a predicate describing which cells are free, and receives at
//! most one [`SpawnOrder`] per update.

use std::time::Duration;

use log::{info, warn};
use push_knight_core::{
    CellCoord, EnemyKind, Escalation, LevelSelection, SpawnTuning, WavePhase, WaveStatus,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the director.
#[derive(Clone, Debug)]
pub struct Config {
    level: LevelSelection,
    wave_delay: Duration,
    spawn_attempts: u32,
    spawn_points: Vec<CellCoord>,
    rng_seed: u64,
    escalation: Escalation,
}

impl Config {
    /// Creates a configuration for `level` using the provided spawn tuning.
    #[must_use]
    pub fn new(level: LevelSelection, tuning: &SpawnTuning) -> Self {
        Self {
            level,
            wave_delay: tuning.wave_delay,
            spawn_attempts: tuning.spawn_attempts,
            spawn_points: tuning.spawn_points.clone(),
            rng_seed: tuning.rng_seed,
            escalation: tuning.escalation,
        }
    }

    /// Replaces the candidate spawn cells.
    #[must_use]
    pub fn with_spawn_points(mut self, spawn_points: Vec<CellCoord>) -> Self {
        self.spawn_points = spawn_points;
        self
    }
}

/// Request emitted by the director for the world to fulfil.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnOrder {
    /// Variant to create.
    pub kind: EnemyKind,
    /// Free cell chosen for the enemy.
    pub cell: CellCoord,
}

/// Probability of each enemy variant for a wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnWeights {
    /// Chance of a goblin.
    pub goblin: f64,
    /// Chance of a skeleton.
    pub skeleton: f64,
    /// Chance of a boomer.
    pub boomer: f64,
    /// Chance of a brute; the remainder of the unit interval.
    pub brute: f64,
}

impl SpawnWeights {
    /// Weights used while `wave` is active.
    #[must_use]
    pub const fn for_wave(wave: u32) -> Self {
        let (goblin, skeleton, boomer, brute) = match wave {
            0..=2 => (0.6, 0.3, 0.1, 0.0),
            3..=5 => (0.4, 0.35, 0.15, 0.1),
            6..=10 => (0.3, 0.3, 0.2, 0.2),
            _ => (0.2, 0.25, 0.25, 0.3),
        };
        Self {
            goblin,
            skeleton,
            boomer,
            brute,
        }
    }

    /// Maps a uniform sample in `[0, 1)` onto a variant.
    #[must_use]
    pub fn roll(&self, sample: f64) -> EnemyKind {
        let mut threshold = self.goblin;
        if sample < threshold {
            return EnemyKind::Goblin;
        }
        threshold += self.skeleton;
        if sample < threshold {
            return EnemyKind::Skeleton;
        }
        threshold += self.boomer;
        if sample < threshold || self.brute <= 0.0 {
            return EnemyKind::Boomer;
        }
        EnemyKind::Brute
    }
}

/// Wave state machine.
#[derive(Debug)]
pub struct SpawnDirector {
    level: LevelSelection,
    total_waves: Option<u32>,
    current_wave: u32,
    phase: WavePhase,
    enemies_per_wave: u32,
    enemies_spawned: u32,
    enemies_defeated: u32,
    spawn_interval: Duration,
    spawn_timer: Duration,
    wave_delay: Duration,
    rest_remaining: Duration,
    weights: SpawnWeights,
    spawn_attempts: u32,
    spawn_points: Vec<CellCoord>,
    escalation: Escalation,
    rng: ChaCha8Rng,
}

impl SpawnDirector {
    /// Creates a director positioned at the start of wave one.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let plan = config.level.wave_plan();
        info!(
            "wave 1 of level {} begins: {} enemies every {:?}",
            config.level.number(),
            plan.enemies_per_wave,
            plan.spawn_interval
        );
        Self {
            level: config.level,
            total_waves: plan.total_waves,
            current_wave: 1,
            phase: WavePhase::Active,
            enemies_per_wave: plan.enemies_per_wave,
            enemies_spawned: 0,
            enemies_defeated: 0,
            spawn_interval: plan.spawn_interval,
            spawn_timer: Duration::ZERO,
            wave_delay: config.wave_delay,
            rest_remaining: Duration::ZERO,
            weights: SpawnWeights::for_wave(1),
            spawn_attempts: config.spawn_attempts,
            spawn_points: config.spawn_points,
            escalation: config.escalation,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Advances the director by `dt`.
    ///
    /// `live_enemies` is the number of enemies currently on the grid and
    /// `is_free` reports whether a candidate cell may receive a new enemy.
    pub fn update<F>(&mut self, dt: Duration, live_enemies: usize, is_free: F) -> Option<SpawnOrder>
    where
        F: Fn(CellCoord) -> bool,
    {
        if self.phase == WavePhase::Active
            && self.enemies_spawned >= self.enemies_per_wave
            && live_enemies == 0
        {
            self.phase = WavePhase::Resting;
            self.rest_remaining = self.wave_delay;
            info!("wave {} cleared", self.current_wave);
        }

        if self.phase == WavePhase::Resting {
            if self.is_level_complete() {
                return None;
            }
            self.rest_remaining = self.rest_remaining.saturating_sub(dt);
            if self.rest_remaining.is_zero() {
                self.start_next_wave();
            }
            return None;
        }

        if self.enemies_spawned >= self.enemies_per_wave {
            return None;
        }

        self.spawn_timer = self.spawn_timer.saturating_add(dt);
        if self.spawn_timer < self.spawn_interval {
            return None;
        }
        self.spawn_timer = Duration::ZERO;
        self.spawn(is_free)
    }

    /// Counts an enemy removed from the grid.
    pub fn record_defeat(&mut self) {
        self.enemies_defeated = self.enemies_defeated.saturating_add(1);
    }

    /// Whether a finite level ran past its last wave.
    #[must_use]
    pub fn is_level_complete(&self) -> bool {
        match self.total_waves {
            Some(total) => self.current_wave > total && self.phase != WavePhase::Active,
            None => false,
        }
    }

    /// Snapshot of the director's progress.
    #[must_use]
    pub fn status(&self) -> WaveStatus {
        WaveStatus {
            wave: self.current_wave,
            total_waves: self.total_waves,
            phase: self.phase,
            spawned: self.enemies_spawned,
            per_wave: self.enemies_per_wave,
            defeated: self.enemies_defeated,
        }
    }

    /// One-based number of the current wave.
    #[must_use]
    pub const fn current_wave(&self) -> u32 {
        self.current_wave
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Enemies produced by the current wave in total.
    #[must_use]
    pub const fn enemies_per_wave(&self) -> u32 {
        self.enemies_per_wave
    }

    /// Time between spawns during the current wave.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        self.spawn_interval
    }

    /// Variant weights of the current wave.
    #[must_use]
    pub const fn weights(&self) -> SpawnWeights {
        self.weights
    }

    fn start_next_wave(&mut self) {
        self.current_wave = self.current_wave.saturating_add(1);
        if let Some(total) = self.total_waves {
            if self.current_wave > total {
                info!("level {} complete", self.level.number());
                return;
            }
        }

        self.escalate();
        self.weights = SpawnWeights::for_wave(self.current_wave);
        self.enemies_spawned = 0;
        self.spawn_timer = Duration::ZERO;
        self.phase = WavePhase::Active;
        info!(
            "wave {} begins: {} enemies every {:?}",
            self.current_wave, self.enemies_per_wave, self.spawn_interval
        );
    }

    fn escalate(&mut self) {
        let curve = self.escalation;
        let wave = f64::from(self.current_wave);
        let (enemies, interval) = if self.level.is_endless() {
            (
                curve.endless_base_enemies + wave * curve.endless_enemy_growth,
                (curve.endless_interval_start - wave * curve.endless_interval_step)
                    .max(curve.endless_interval_floor),
            )
        } else {
            (
                f64::from(self.enemies_per_wave) * curve.level_enemy_growth,
                (self.spawn_interval.as_secs_f64() * curve.level_interval_factor)
                    .max(curve.level_interval_floor),
            )
        };
        self.enemies_per_wave = enemies.floor().max(0.0) as u32;
        self.spawn_interval = Duration::from_secs_f64(interval.max(0.0));
    }

    fn spawn<F>(&mut self, is_free: F) -> Option<SpawnOrder>
    where
        F: Fn(CellCoord) -> bool,
    {
        if self.spawn_points.is_empty() {
            warn!("no spawn points configured; spawn skipped");
            return None;
        }

        let mut chosen = None;
        for _ in 0..self.spawn_attempts {
            let index = self.rng.gen_range(0..self.spawn_points.len());
            let candidate = self.spawn_points[index];
            if is_free(candidate) {
                chosen = Some(candidate);
                break;
            }
        }

        let Some(cell) = chosen else {
            warn!(
                "no free spawn point after {} attempts; spawn skipped",
                self.spawn_attempts
            );
            return None;
        };

        let sample: f64 = self.rng.gen();
        let kind = self.weights.roll(sample);
        self.enemies_spawned += 1;
        info!(
            "spawning {:?} at {:?} ({}/{} of wave {})",
            kind, cell, self.enemies_spawned, self.enemies_per_wave, self.current_wave
        );
        Some(SpawnOrder { kind, cell })
    }
}
