//! Map descriptions the world is initialised from.
//!
//! A [`Layout`] is either generated procedurally from the configured seed or
//! parsed from an ASCII picture:
//!
//! | glyph | meaning                 |
//! |-------|-------------------------|
//! | `.`   | floor                   |
//! | `#`   | wall                    |
//! | `^`   | spikes                  |
//! | `f`   | campfire                |
//! | `T`   | persistent trap         |
//! | `t`   | single-use trap         |
//! | `P`   | player start            |
//! | `S`   | enemy spawn point       |

use log::debug;
use push_knight_core::{CellCoord, ObstacleKind, SimulationConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Trap location and kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrapPlacement {
    /// Cell holding the trap.
    pub cell: CellCoord,
    /// Whether the trap re-arms after firing.
    pub persistent: bool,
}

/// Validated map description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    columns: u32,
    rows: u32,
    cells: usize,
    obstacles: Vec<(CellCoord, ObstacleKind)>,
    traps: Vec<TrapPlacement>,
    player_start: CellCoord,
    spawn_points: Vec<CellCoord>,
}

impl Layout {
    /// Builds the default arena: a border wall plus seeded interior obstacles
    /// outside the clear zone around the player start.
    pub fn generate(config: &SimulationConfig) -> Result<Self, LayoutError> {
        let (columns, rows) = (config.columns, config.rows);
        if columns == 0 || rows == 0 {
            return Err(LayoutError::Empty);
        }
        let cells = cell_count(columns, rows)?;
        let player_start = config.player_start;
        if player_start.column() >= columns || player_start.row() >= rows {
            return Err(LayoutError::PlayerOutOfBounds(player_start));
        }

        let tuning = config.layout;
        let is_border = |cell: CellCoord| {
            cell.column() == 0
                || cell.row() == 0
                || cell.column() == columns - 1
                || cell.row() == rows - 1
        };
        let in_clear_zone = |cell: CellCoord| {
            (tuning.clear_zone_min.column()..=tuning.clear_zone_max.column())
                .contains(&cell.column())
                && (tuning.clear_zone_min.row()..=tuning.clear_zone_max.row())
                    .contains(&cell.row())
        };

        let spawn_points: Vec<CellCoord> = config
            .spawning
            .spawn_points
            .iter()
            .copied()
            .filter(|cell| cell.column() < columns && cell.row() < rows && !is_border(*cell))
            .collect();

        let mut rng = ChaCha8Rng::seed_from_u64(tuning.seed);
        let mut obstacles = Vec::new();
        for column in 0..columns {
            for row in 0..rows {
                let cell = CellCoord::new(column, row);
                if is_border(cell) {
                    obstacles.push((cell, ObstacleKind::Wall));
                    continue;
                }
                if in_clear_zone(cell) || cell == player_start || spawn_points.contains(&cell) {
                    continue;
                }
                if rng.gen_range(0..100) < tuning.obstacle_density_percent {
                    let kind = match rng.gen_range(0..3) {
                        0 => ObstacleKind::Wall,
                        1 => ObstacleKind::Spikes,
                        _ => ObstacleKind::Campfire,
                    };
                    obstacles.push((cell, kind));
                }
            }
        }
        debug!(
            "generated {}x{} layout with {} obstacles",
            columns,
            rows,
            obstacles.len()
        );

        Ok(Self {
            columns,
            rows,
            cells,
            obstacles,
            traps: Vec::new(),
            player_start,
            spawn_points,
        })
    }

    /// Parses an ASCII map. Blank lines and surrounding whitespace are ignored.
    pub fn from_ascii(text: &str) -> Result<Self, LayoutError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let Some(first) = lines.first() else {
            return Err(LayoutError::Empty);
        };
        let expected = first.chars().count();
        let columns = to_coord(expected)?;
        let rows = to_coord(lines.len())?;
        let cells = cell_count(columns, rows)?;

        let mut obstacles = Vec::new();
        let mut traps = Vec::new();
        let mut spawn_points = Vec::new();
        let mut player_start = None;

        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(LayoutError::RaggedRow {
                    row,
                    expected,
                    found,
                });
            }
            for (column, glyph) in line.chars().enumerate() {
                let cell = CellCoord::new(to_coord(column)?, to_coord(row)?);
                match glyph {
                    '.' => {}
                    '#' => obstacles.push((cell, ObstacleKind::Wall)),
                    '^' => obstacles.push((cell, ObstacleKind::Spikes)),
                    'f' => obstacles.push((cell, ObstacleKind::Campfire)),
                    'T' | 't' => traps.push(TrapPlacement {
                        cell,
                        persistent: glyph == 'T',
                    }),
                    'S' => spawn_points.push(cell),
                    'P' => {
                        if player_start.replace(cell).is_some() {
                            return Err(LayoutError::DuplicatePlayer(cell));
                        }
                    }
                    other => {
                        return Err(LayoutError::UnknownGlyph {
                            glyph: other,
                            column,
                            row,
                        })
                    }
                }
            }
        }

        let player_start = player_start.ok_or(LayoutError::MissingPlayer)?;
        Ok(Self {
            columns,
            rows,
            cells,
            obstacles,
            traps,
            player_start,
            spawn_points,
        })
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells, `columns * rows`.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.cells
    }

    /// Static obstacles and their cells.
    #[must_use]
    pub fn obstacles(&self) -> &[(CellCoord, ObstacleKind)] {
        &self.obstacles
    }

    /// Trap placements.
    #[must_use]
    pub fn traps(&self) -> &[TrapPlacement] {
        &self.traps
    }

    /// Cell the player starts on.
    #[must_use]
    pub const fn player_start(&self) -> CellCoord {
        self.player_start
    }

    /// Cells enemies may spawn on. Empty when the map names none.
    #[must_use]
    pub fn spawn_points(&self) -> &[CellCoord] {
        &self.spawn_points
    }
}

fn to_coord(value: usize) -> Result<u32, LayoutError> {
    u32::try_from(value).map_err(|_| LayoutError::TooLarge)
}

/// Cell indices must stay addressable by a `u32` coordinate.
fn cell_count(columns: u32, rows: u32) -> Result<usize, LayoutError> {
    let cells = u32::try_from(u64::from(columns) * u64::from(rows))
        .map_err(|_| LayoutError::TooLarge)?;
    usize::try_from(cells).map_err(|_| LayoutError::TooLarge)
}

/// Reasons a layout cannot be built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The map has no cells.
    #[error("layout has no cells")]
    Empty,
    /// The map exceeds the addressable coordinate range.
    #[error("layout exceeds the addressable grid size")]
    TooLarge,
    /// A row differs in width from the first one.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A glyph outside the legend.
    #[error("unknown glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Zero-based column index.
        column: usize,
        /// Zero-based row index.
        row: usize,
    },
    /// No `P` marker.
    #[error("layout has no player start marker")]
    MissingPlayer,
    /// More than one `P` marker.
    #[error("second player start marker at {0:?}")]
    DuplicatePlayer(CellCoord),
    /// The configured player start lies outside the grid.
    #[error("player start {0:?} lies outside the grid")]
    PlayerOutOfBounds(CellCoord),
}
