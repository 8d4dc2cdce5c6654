use crate::error::PuzzleError;
use crate::geometry::{Point, Size};

pub const DEFAULT_ROWS: u32 = 3;
pub const DEFAULT_COLUMNS: u32 = 4;
/// Per-axis distance from the correct slot, as a fraction of the container,
/// at which a dropped tile still counts as placed.
pub const SOLVE_TOLERANCE: f64 = 0.028;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSpec {
    pub rows: u32,
    pub columns: u32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
        }
    }
}

impl GridSpec {
    pub fn new(rows: u32, columns: u32) -> Result<Self, PuzzleError> {
        if rows == 0 || columns == 0 {
            return Err(PuzzleError::EmptyGrid { rows, columns });
        }
        Ok(Self { rows, columns })
    }

    pub fn tile_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    pub fn column_of(&self, position: usize) -> usize {
        position % self.columns as usize
    }

    pub fn row_of(&self, position: usize) -> usize {
        position / self.columns as usize
    }

    /// Top-left of the tile's slot as a fraction of the container.
    pub fn target_fraction(&self, position: usize) -> Point {
        Point::new(
            self.column_of(position) as f64 / self.columns as f64,
            self.row_of(position) as f64 / self.rows as f64,
        )
    }

    pub fn tile_fraction(&self) -> Size {
        Size::new(1.0 / self.columns as f64, 1.0 / self.rows as f64)
    }

    /// Largest start fraction per axis that keeps a tile box inside the container.
    pub fn scatter_bounds(&self) -> Size {
        let tile = self.tile_fraction();
        Size::new(1.0 - tile.width, 1.0 - tile.height)
    }

    /// Sprite-sheet crop offset in percent. A single row or column has one
    /// crop position on that axis, so the divisor never drops below one.
    pub fn background_position_percent(&self, position: usize) -> Point {
        let col_span = self.columns.saturating_sub(1).max(1) as f64;
        let row_span = self.rows.saturating_sub(1).max(1) as f64;
        Point::new(
            self.column_of(position) as f64 / col_span * 100.0,
            self.row_of(position) as f64 / row_span * 100.0,
        )
    }

    pub fn label(&self) -> String {
        format!(
            "{} pieces ({}x{})",
            self.tile_count(),
            self.columns,
            self.rows
        )
    }
}

pub fn within_tolerance(target: Point, dropped: Point) -> bool {
    (target.x - dropped.x).abs() <= SOLVE_TOLERANCE
        && (target.y - dropped.y).abs() <= SOLVE_TOLERANCE
}
