use crate::geometry::{Point, Size};
use crate::grid::GridSpec;
use crate::scramble::scatter_positions;

pub const PIECE_CLASS: &str = "jigsaw-puzzle__piece";
pub const PIECE_SOLVED_CLASS: &str = "jigsaw-puzzle__piece--solved";
pub const PIECE_DRAGGING_CLASS: &str = "jigsaw-puzzle__piece--dragging";

/// Row-major slot index; doubles as the tile's identity.
pub type TilePosition = usize;

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub correct_position: TilePosition,
    /// Source-image pixel extents of this piece.
    pub tile_width: f64,
    pub tile_height: f64,
    /// Source-image pixel offset of this piece's crop window.
    pub tile_offset_x: f64,
    pub tile_offset_y: f64,
    /// Top-left as a fraction of the container.
    pub current: Point,
    pub solved: bool,
}

impl Tile {
    pub fn pixel_position(&self, container: Size) -> Point {
        container.scale(self.current)
    }

    pub fn class_name(&self) -> String {
        if self.solved {
            format!("{PIECE_CLASS} {PIECE_SOLVED_CLASS}")
        } else {
            PIECE_CLASS.to_string()
        }
    }
}

pub fn build_tiles(grid: GridSpec, image: Size, seed: u32) -> Vec<Tile> {
    let tile_width = image.width / grid.columns as f64;
    let tile_height = image.height / grid.rows as f64;
    scatter_positions(seed, grid)
        .into_iter()
        .enumerate()
        .map(|(position, current)| Tile {
            correct_position: position,
            tile_width,
            tile_height,
            tile_offset_x: grid.column_of(position) as f64 * tile_width,
            tile_offset_y: grid.row_of(position) as f64 * tile_height,
            current,
            solved: false,
        })
        .collect()
}
