#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stateless A* search used by enemy AI to chase the player.
//!
//! The planner works on a read-only [`OccupancyView`] snapshot. Walls and
//! impassable hazards block the search; campfires and other enemies do not,
//! since the world decides whether a planned step may actually be committed.

use std::{cmp::Reverse, collections::BinaryHeap};

use push_knight_core::{CellCoord, Direction, OccupancyView};

/// Node expansions allowed per query unless configured otherwise.
pub const DEFAULT_EXPANSION_CAP: usize = 500;

/// A* planner with a hard expansion budget.
#[derive(Clone, Copy, Debug)]
pub struct Pathfinder {
    expansion_cap: usize,
}

impl Pathfinder {
    /// Creates a planner that gives up after `expansion_cap` expansions.
    #[must_use]
    pub const fn new(expansion_cap: usize) -> Self {
        Self { expansion_cap }
    }

    /// Maximum node expansions per query.
    #[must_use]
    pub const fn expansion_cap(&self) -> usize {
        self.expansion_cap
    }

    /// Direction of the first step on a shortest path from `from` to `to`.
    ///
    /// Returns `None` when no path exists, when the budget runs out, or when
    /// `from` already equals `to`.
    #[must_use]
    pub fn next_step(
        &self,
        from: CellCoord,
        to: CellCoord,
        grid: OccupancyView<'_>,
    ) -> Option<Direction> {
        let path = self.find_path(from, to, grid)?;
        let (start, next) = match path.as_slice() {
            [start, next, ..] => (*start, *next),
            _ => return None,
        };
        Direction::between(start, next)
    }

    /// Shortest 4-connected path from `from` to `to`, both ends included.
    #[must_use]
    pub fn find_path(
        &self,
        from: CellCoord,
        to: CellCoord,
        grid: OccupancyView<'_>,
    ) -> Option<Vec<CellCoord>> {
        if !grid.contains(from) || !grid.contains(to) {
            return None;
        }

        let (columns, rows) = grid.dimensions();
        let mut search = SearchSpace::new(columns, rows)?;
        let start = search.index(from)?;
        let goal = search.index(to)?;

        let mut open = BinaryHeap::new();
        let mut sequence: u64 = 0;
        search.cost[start] = 0;
        open.push(Reverse(OpenEntry {
            estimate: from.manhattan_distance(to),
            sequence,
            index: start,
        }));

        let mut expansions = 0;
        while let Some(Reverse(entry)) = open.pop() {
            if search.closed[entry.index] {
                continue;
            }
            if expansions >= self.expansion_cap {
                return None;
            }
            expansions += 1;
            search.closed[entry.index] = true;

            if entry.index == goal {
                return search.reconstruct(goal);
            }

            let current = search.cell(entry.index)?;
            let next_cost = search.cost[entry.index].saturating_add(1);
            for direction in Direction::SEARCH_ORDER {
                let Some(neighbor) = current.step(direction) else {
                    continue;
                };
                let Some(code) = grid.code(neighbor) else {
                    continue;
                };
                if !code.is_traversable() {
                    continue;
                }
                let Some(neighbor_index) = search.index(neighbor) else {
                    continue;
                };
                if search.closed[neighbor_index] || next_cost >= search.cost[neighbor_index] {
                    continue;
                }

                search.cost[neighbor_index] = next_cost;
                search.parent[neighbor_index] = Some(entry.index);
                sequence += 1;
                open.push(Reverse(OpenEntry {
                    estimate: next_cost.saturating_add(neighbor.manhattan_distance(to)),
                    sequence,
                    index: neighbor_index,
                }));
            }
        }

        None
    }
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new(DEFAULT_EXPANSION_CAP)
    }
}

/// Frontier entry ordered by estimate, then by insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenEntry {
    estimate: u32,
    sequence: u64,
    index: usize,
}

#[derive(Debug)]
struct SearchSpace {
    columns: u32,
    cost: Vec<u32>,
    parent: Vec<Option<usize>>,
    closed: Vec<bool>,
}

impl SearchSpace {
    fn new(columns: u32, rows: u32) -> Option<Self> {
        let width = usize::try_from(columns).ok()?;
        let height = usize::try_from(rows).ok()?;
        let node_count = width.checked_mul(height)?;
        Some(Self {
            columns,
            cost: vec![u32::MAX; node_count],
            parent: vec![None; node_count],
            closed: vec![false; node_count],
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.columns {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        let index = row.checked_mul(width)?.checked_add(column)?;
        (index < self.cost.len()).then_some(index)
    }

    fn cell(&self, index: usize) -> Option<CellCoord> {
        if index >= self.cost.len() {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let column = u32::try_from(index % width).ok()?;
        let row = u32::try_from(index / width).ok()?;
        Some(CellCoord::new(column, row))
    }

    fn reconstruct(&self, goal: usize) -> Option<Vec<CellCoord>> {
        let mut path = vec![self.cell(goal)?];
        let mut cursor = goal;
        while let Some(parent) = self.parent[cursor] {
            path.push(self.cell(parent)?);
            cursor = parent;
        }
        path.reverse();
        Some(path)
    }
}
