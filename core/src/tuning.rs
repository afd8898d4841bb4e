//! Immutable tuning threaded into the world and its systems at construction.

use std::time::Duration;

use crate::{CellCoord, Health};

/// Aggregated tuning knobs for a simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Number of grid columns.
    pub columns: u32,
    /// Number of grid rows.
    pub rows: u32,
    /// Cell the player starts on in generated layouts.
    pub player_start: CellCoord,
    /// Player hit points at the start of a run.
    pub player_max_health: Health,
    /// Cooldown armed after the player pushes an enemy.
    pub push_cooldown: Duration,
    /// Largest delta a single tick may advance; longer frames are clamped.
    pub max_tick: Duration,
    /// Node expansions the pathfinder may perform per query.
    pub path_expansion_cap: usize,
    /// Trap behaviour.
    pub traps: TrapTuning,
    /// Death blast of self-destructing enemies.
    pub blast: BlastTuning,
    /// Procedural layout parameters.
    pub layout: LayoutTuning,
    /// Wave director parameters.
    pub spawning: SpawnTuning,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 14,
            player_start: CellCoord::new(10, 7),
            player_max_health: Health::new(3),
            push_cooldown: Duration::from_millis(500),
            max_tick: Duration::from_millis(100),
            path_expansion_cap: 500,
            traps: TrapTuning::default(),
            blast: BlastTuning::default(),
            layout: LayoutTuning::default(),
            spawning: SpawnTuning::default(),
        }
    }
}

/// Trap parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrapTuning {
    /// Damage dealt to an enemy stepping onto an armed trap.
    pub damage: u32,
    /// Time a persistent trap needs to re-arm after firing.
    pub rearm: Duration,
}

impl Default for TrapTuning {
    fn default() -> Self {
        Self {
            damage: 1,
            rearm: Duration::from_secs(1),
        }
    }
}

/// Blast released when a self-destructing enemy dies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlastTuning {
    /// Damage dealt to every entity caught in the blast.
    pub damage: u32,
    /// Chebyshev radius of the blast.
    pub radius: u32,
}

impl Default for BlastTuning {
    fn default() -> Self {
        Self {
            damage: 2,
            radius: 1,
        }
    }
}

/// Procedural layout parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutTuning {
    /// Seed for obstacle placement.
    pub seed: u64,
    /// Chance, in percent, that an interior cell receives an obstacle.
    pub obstacle_density_percent: u32,
    /// Upper-left corner of the zone kept clear around the player start.
    pub clear_zone_min: CellCoord,
    /// Lower-right corner (inclusive) of the clear zone.
    pub clear_zone_max: CellCoord,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            seed: 0x5eed_0f_c0ffee,
            obstacle_density_percent: 12,
            clear_zone_min: CellCoord::new(8, 5),
            clear_zone_max: CellCoord::new(11, 8),
        }
    }
}

/// Wave director parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnTuning {
    /// Rest between clearing a wave and starting the next one.
    pub wave_delay: Duration,
    /// Spawn point draws attempted before a spawn is skipped.
    pub spawn_attempts: u32,
    /// Candidate cells enemies may appear on.
    pub spawn_points: Vec<CellCoord>,
    /// Seed for spawn point choice and type rolls.
    pub rng_seed: u64,
    /// Difficulty curves applied at each wave boundary.
    pub escalation: Escalation,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            wave_delay: Duration::from_secs(3),
            spawn_attempts: 20,
            spawn_points: vec![
                CellCoord::new(5, 2),
                CellCoord::new(15, 2),
                CellCoord::new(5, 11),
                CellCoord::new(15, 11),
                CellCoord::new(2, 7),
                CellCoord::new(17, 7),
                CellCoord::new(10, 2),
                CellCoord::new(10, 11),
            ],
            rng_seed: 0x4d59_5df4_d0f3_3173,
            escalation: Escalation::default(),
        }
    }
}

/// Difficulty curves.
///
/// Endless waves use `enemies = floor(base + wave * growth)` and
/// `interval = max(floor, start - wave * step)`; level waves multiply the
/// previous values instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Escalation {
    /// Endless enemy count intercept.
    pub endless_base_enemies: f64,
    /// Endless enemies added per wave.
    pub endless_enemy_growth: f64,
    /// Endless spawn interval intercept, in seconds.
    pub endless_interval_start: f64,
    /// Endless interval reduction per wave, in seconds.
    pub endless_interval_step: f64,
    /// Endless interval lower bound, in seconds.
    pub endless_interval_floor: f64,
    /// Level enemy count multiplier per wave.
    pub level_enemy_growth: f64,
    /// Level spawn interval multiplier per wave.
    pub level_interval_factor: f64,
    /// Level interval lower bound, in seconds.
    pub level_interval_floor: f64,
}

impl Default for Escalation {
    fn default() -> Self {
        Self {
            endless_base_enemies: 5.0,
            endless_enemy_growth: 2.5,
            endless_interval_start: 2.0,
            endless_interval_step: 0.08,
            endless_interval_floor: 0.3,
            level_enemy_growth: 1.3,
            level_interval_factor: 0.9,
            level_interval_floor: 0.5,
        }
    }
}
