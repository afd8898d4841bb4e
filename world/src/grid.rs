use push_knight_core::{CellCoord, ObstacleKind, OccupancyCode, OccupancyView};

use crate::layout::Layout;

/// Dense occupancy codes plus the static obstacle layer beneath them.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    columns: u32,
    rows: u32,
    codes: Vec<OccupancyCode>,
    obstacles: Vec<Option<ObstacleKind>>,
}

impl Grid {
    /// Builds an empty grid sized for a validated layout.
    pub(crate) fn for_layout(layout: &Layout) -> Self {
        let cells = layout.cell_count();
        Self {
            columns: layout.columns(),
            rows: layout.rows(),
            codes: vec![OccupancyCode::Empty; cells],
            obstacles: vec![None; cells],
        }
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    pub(crate) fn code(&self, cell: CellCoord) -> Option<OccupancyCode> {
        self.index(cell)
            .and_then(|index| self.codes.get(index).copied())
    }

    pub(crate) fn obstacle(&self, cell: CellCoord) -> Option<ObstacleKind> {
        self.index(cell)
            .and_then(|index| self.obstacles.get(index).copied().flatten())
    }

    pub(crate) fn place_obstacle(&mut self, cell: CellCoord, kind: ObstacleKind) {
        if let Some(index) = self.index(cell) {
            self.obstacles[index] = Some(kind);
            self.codes[index] = kind.descriptor().code;
        }
    }

    pub(crate) fn occupy_enemy(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            self.codes[index] = OccupancyCode::Enemy;
        }
    }

    /// Clears an enemy from `cell`, restoring whatever obstacle lies beneath.
    pub(crate) fn vacate(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            self.codes[index] = self.obstacles[index]
                .map_or(OccupancyCode::Empty, |kind| kind.descriptor().code);
        }
    }

    pub(crate) fn view(&self) -> OccupancyView<'_> {
        OccupancyView::new(&self.codes, self.columns, self.rows)
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
