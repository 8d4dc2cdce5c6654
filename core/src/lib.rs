pub mod drag;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod scramble;
pub mod session;
pub mod tile;

pub use drag::{ActiveDrag, DragState};
pub use error::PuzzleError;
pub use geometry::{clamp, Point, Size};
pub use grid::{GridSpec, DEFAULT_COLUMNS, DEFAULT_ROWS, SOLVE_TOLERANCE};
pub use scramble::{scramble_seed, splitmix32, SCRAMBLE_BASE};
pub use session::{PuzzleSession, ReleaseOutcome};
pub use tile::{
    build_tiles, Tile, TilePosition, PIECE_CLASS, PIECE_DRAGGING_CLASS, PIECE_SOLVED_CLASS,
};

pub const ROOT_CLASS: &str = "jigsaw-puzzle";
