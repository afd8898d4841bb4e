#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Push Knight simulation.
//!
//! This crate defines the vocabulary that connects the authoritative world,
//! the pure systems it drives, and the adapters that consume it. Adapters
//! submit [`Command`] values (or call the world's entry points directly), the
//! world resolves them deterministically, and then exposes an ordered stream
//! of [`Event`] values together with read-only snapshots. Nothing in this
//! crate mutates simulation state.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod level;
mod tuning;

pub use level::{LevelError, LevelSelection, WavePlan};
pub use tuning::{BlastTuning, Escalation, LayoutTuning, SimulationConfig, SpawnTuning, TrapTuning};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the player step or push in the provided direction.
    MovePlayer {
        /// Cardinal direction of the attempted step.
        direction: Direction,
    },
    /// Places an enemy directly, bypassing the wave director.
    SpawnEnemy {
        /// Variant of enemy to create.
        kind: EnemyKind,
        /// Cell the enemy should occupy. Must be empty.
        cell: CellCoord,
    },
}

/// State changes published by the world, drained once per frame by renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// An enemy entered the grid.
    EnemySpawned {
        /// Cell the enemy occupies after spawning.
        cell: CellCoord,
        /// Variant of the spawned enemy.
        kind: EnemyKind,
        /// Health the enemy spawned with.
        health: Health,
    },
    /// An enemy moved between two cells, either on its own or by being pushed.
    EnemyMoved {
        /// Cell the enemy occupied before moving.
        from: CellCoord,
        /// Cell the enemy occupies after moving.
        to: CellCoord,
        /// Remaining health after the move.
        health: Health,
    },
    /// An enemy lost health.
    EnemyDamaged {
        /// Cell of the damaged enemy.
        cell: CellCoord,
        /// Remaining health after the hit.
        health: Health,
    },
    /// A dead enemy was removed from the grid.
    EntityRemoved {
        /// Cell that was vacated.
        cell: CellCoord,
    },
    /// Something struck a cell: a collision against an obstacle or a blast.
    Impact {
        /// Cell where the impact is drawn.
        cell: CellCoord,
    },
    /// The player lost health.
    PlayerDamaged {
        /// Cell the player occupied when hit.
        cell: CellCoord,
        /// Remaining player health.
        health: Health,
    },
    /// The player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
    },
}

impl Event {
    /// Discriminant used for ordering and de-duplication.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::EnemySpawned { .. } => EventKind::EnemySpawn,
            Self::EnemyMoved { .. } => EventKind::EnemyMove,
            Self::EnemyDamaged { .. } => EventKind::Damage,
            Self::EntityRemoved { .. } => EventKind::RemoveEntity,
            Self::Impact { .. } => EventKind::Impact,
            Self::PlayerDamaged { .. } => EventKind::PlayerDamage,
            Self::PlayerMoved { .. } => EventKind::PlayerMove,
        }
    }

    /// Cell the event is about. Movement events report their destination.
    #[must_use]
    pub const fn target(&self) -> CellCoord {
        match *self {
            Self::EnemySpawned { cell, .. }
            | Self::EnemyDamaged { cell, .. }
            | Self::EntityRemoved { cell }
            | Self::Impact { cell }
            | Self::PlayerDamaged { cell, .. } => cell,
            Self::EnemyMoved { to, .. } | Self::PlayerMoved { to, .. } => to,
        }
    }
}

/// Event discriminant, declared in drain priority order.
///
/// Renderers draw spawns before moves, moves before damage flashes, and the
/// player-affecting events last.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum EventKind {
    /// [`Event::EnemySpawned`].
    EnemySpawn,
    /// [`Event::EnemyMoved`].
    EnemyMove,
    /// [`Event::EnemyDamaged`].
    Damage,
    /// [`Event::EntityRemoved`].
    RemoveEntity,
    /// [`Event::Impact`].
    Impact,
    /// [`Event::PlayerDamaged`].
    PlayerDamage,
    /// [`Event::PlayerMoved`].
    PlayerMove,
}

impl EventKind {
    /// Numeric drain priority; lower values drain first.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::EnemySpawn => 0,
            Self::EnemyMove => 1,
            Self::Damage => 2,
            Self::RemoveEntity => 3,
            Self::Impact => 4,
            Self::PlayerDamage => 5,
            Self::PlayerMove => 6,
        }
    }
}

/// Cardinal directions available to the player and to enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Expansion order used by the pathfinder: up, down, left, right.
    pub const SEARCH_ORDER: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Unit vector as `(dx, dy)` with rows growing downward.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Validates a raw `(dx, dy)` intent coming from an input layer.
    pub fn from_delta(dx: i32, dy: i32) -> Result<Self, DirectionError> {
        match (dx, dy) {
            (0, -1) => Ok(Self::North),
            (1, 0) => Ok(Self::East),
            (0, 1) => Ok(Self::South),
            (-1, 0) => Ok(Self::West),
            _ => Err(DirectionError::NotCardinal { dx, dy }),
        }
    }

    /// Direction that leads from `from` into the adjacent cell `to`.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());
        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Self::East)
            } else {
                Some(Self::West)
            }
        } else if to.row() > from.row() {
            Some(Self::South)
        } else {
            Some(Self::North)
        }
    }
}

impl TryFrom<(i32, i32)> for Direction {
    type Error = DirectionError;

    fn try_from((dx, dy): (i32, i32)) -> Result<Self, Self::Error> {
        Self::from_delta(dx, dy)
    }
}

/// Rejected movement intents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DirectionError {
    /// The delta was not one of the four cardinal unit vectors.
    #[error("move delta ({dx}, {dy}) is not a cardinal unit vector")]
    NotCardinal {
        /// Requested column delta.
        dx: i32,
        /// Requested row delta.
        dy: i32,
    },
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Computes the Chebyshev (king-move) distance between two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column()
            .abs_diff(other.column())
            .max(self.row().abs_diff(other.row()))
    }

    /// Offsets the cell by a signed delta. Returns `None` below zero.
    ///
    /// Upper bounds are not known here; grids reject cells past their edge.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<CellCoord> {
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(CellCoord::new(column, row))
    }

    /// Neighbouring cell one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }
}

/// Occupancy code stored per grid cell.
///
/// The numeric values are a wire contract relied upon by every consumer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OccupancyCode {
    /// Nothing stands here.
    #[default]
    Empty = 0,
    /// Impassable wall.
    Wall = 1,
    /// A live enemy stands here.
    Enemy = 2,
    /// Impassable hazard such as spikes.
    Hazard = 3,
    /// Hazard that may be entered at a cost, such as a campfire.
    PassableHazard = 4,
}

impl OccupancyCode {
    /// Bit-exact numeric code.
    #[must_use]
    pub const fn get(self) -> u8 {
        self as u8
    }

    /// Whether a mover may commit a step into a cell carrying this code.
    #[must_use]
    pub const fn admits_movement(self) -> bool {
        matches!(self, Self::Empty | Self::PassableHazard)
    }

    /// Whether the planner may route through a cell carrying this code.
    ///
    /// Other enemies do not block planning; the world rejects the step later.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        !matches!(self, Self::Wall | Self::Hazard)
    }
}

/// Read-only view into the dense occupancy grid, stored in row-major order.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    cells: &'a [OccupancyCode],
    columns: u32,
    rows: u32,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [OccupancyCode], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Code stored at the provided cell, or `None` when out of range.
    #[must_use]
    pub fn code(&self, cell: CellCoord) -> Option<OccupancyCode> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = OccupancyCode> + 'a {
        self.cells.iter().copied()
    }

    /// Provides the dimensions of the underlying occupancy grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Static obstacle variants placed when the grid is initialised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Impassable wall.
    Wall,
    /// Impassable spikes.
    Spikes,
    /// Passable fire that burns whoever steps in.
    Campfire,
}

impl ObstacleKind {
    /// Immutable stat record for the obstacle.
    #[must_use]
    pub const fn descriptor(self) -> ObstacleDescriptor {
        match self {
            Self::Wall => ObstacleDescriptor {
                code: OccupancyCode::Wall,
                collision_damage: 1,
                pass_damage: 0,
                passable: false,
            },
            Self::Spikes => ObstacleDescriptor {
                code: OccupancyCode::Hazard,
                collision_damage: 1,
                pass_damage: 0,
                passable: false,
            },
            Self::Campfire => ObstacleDescriptor {
                code: OccupancyCode::PassableHazard,
                collision_damage: 0,
                pass_damage: 1,
                passable: true,
            },
        }
    }
}

/// Immutable obstacle record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObstacleDescriptor {
    /// Occupancy code the obstacle writes into its cell.
    pub code: OccupancyCode,
    /// Damage dealt to an entity pushed into the obstacle.
    pub collision_damage: u32,
    /// Damage dealt to an entity stepping onto the obstacle.
    pub pass_damage: u32,
    /// Whether entities may stand on the obstacle.
    pub passable: bool,
}

/// Hit points of an entity.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Health(u32);

impl Health {
    /// Wraps a raw hit point value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw hit point value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether no hit points remain.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Health left after taking `damage`, floored at zero.
    #[must_use]
    pub const fn saturating_sub(self, damage: u32) -> Self {
        Self(self.0.saturating_sub(damage))
    }
}

/// Unique identifier assigned to an enemy, increasing in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Enemy variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fast, fragile chaser.
    Goblin,
    /// Steady chaser.
    Skeleton,
    /// Slow, heavy chaser that behaves like a moving obstacle.
    Brute,
    /// Fast chaser with no contact damage that explodes when it dies.
    Boomer,
}

impl EnemyKind {
    /// Every variant, in the order the spawn roll considers them.
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Goblin,
        EnemyKind::Skeleton,
        EnemyKind::Boomer,
        EnemyKind::Brute,
    ];

    /// Stat table for the variant.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        match self {
            Self::Goblin => EnemyStats {
                max_health: Health::new(2),
                contact_damage: 1,
                step_interval: Duration::from_millis(400),
                behavior: EnemyBehavior::Chaser,
            },
            Self::Skeleton => EnemyStats {
                max_health: Health::new(3),
                contact_damage: 1,
                step_interval: Duration::from_millis(600),
                behavior: EnemyBehavior::Chaser,
            },
            Self::Brute => EnemyStats {
                max_health: Health::new(6),
                contact_damage: 2,
                step_interval: Duration::from_millis(1200),
                behavior: EnemyBehavior::Bulwark,
            },
            Self::Boomer => EnemyStats {
                max_health: Health::new(1),
                contact_damage: 0,
                step_interval: Duration::from_millis(300),
                behavior: EnemyBehavior::Fuse,
            },
        }
    }
}

/// Per-variant stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyStats {
    /// Hit points on spawn.
    pub max_health: Health,
    /// Damage dealt to an adjacent player when the enemy acts.
    pub contact_damage: u32,
    /// Cooldown between successive actions.
    pub step_interval: Duration,
    /// Behaviour tag dispatched on by the world.
    pub behavior: EnemyBehavior,
}

/// Behaviour tags that distinguish enemy variants beyond raw stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyBehavior {
    /// Chases the player and strikes on contact.
    Chaser,
    /// Chases slowly; flagged as obstacle-like for AI consumers.
    Bulwark,
    /// Chases and detonates on death instead of striking.
    Fuse,
}

impl EnemyBehavior {
    /// Whether AI consumers should treat the enemy as a moving obstacle.
    #[must_use]
    pub const fn is_obstacle_like(self) -> bool {
        matches!(self, Self::Bulwark)
    }

    /// Whether the enemy detonates when it dies.
    #[must_use]
    pub const fn explodes_on_death(self) -> bool {
        matches!(self, Self::Fuse)
    }
}

/// Phase of the wave director.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WavePhase {
    /// Enemies of the current wave are being spawned or are still alive.
    Active,
    /// The wave was cleared and the director waits before the next one.
    Resting,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Variant of the enemy.
    pub kind: EnemyKind,
    /// Grid cell currently occupied by the enemy.
    pub cell: CellCoord,
    /// Remaining hit points.
    pub health: Health,
    /// Hit points on spawn.
    pub max_health: Health,
    /// Remaining cooldown before the enemy acts again.
    pub ready_in: Duration,
    /// Whether AI consumers should treat the enemy as a moving obstacle.
    pub obstacle_like: bool,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of live enemies captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether no enemies were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Cell the player stands on.
    pub cell: CellCoord,
    /// Remaining hit points.
    pub health: Health,
    /// Maximum hit points.
    pub max_health: Health,
    /// Whether the run is still going.
    pub alive: bool,
    /// Time left before the push is considered ready again.
    pub push_cooldown: Duration,
}

/// Progress of the wave director.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveStatus {
    /// One-based wave counter.
    pub wave: u32,
    /// Number of waves in the level; `None` in endless mode.
    pub total_waves: Option<u32>,
    /// Current phase.
    pub phase: WavePhase,
    /// Enemies produced so far in the current wave.
    pub spawned: u32,
    /// Enemies the current wave produces in total.
    pub per_wave: u32,
    /// Enemies removed since the run began.
    pub defeated: u32,
}
