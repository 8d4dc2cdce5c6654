//! Image jigsaw puzzle widget for Yew.
//!
//! [`JigsawPuzzle`] splits an image into a grid of draggable tiles; a tile
//! dropped close enough to its slot snaps into place, and `on_solved` fires
//! once every tile is placed. The puzzle logic itself lives in
//! [`jigsaw_puzzle_core`] and is re-exported here.

mod input;
mod puzzle;
mod puzzle_image;
mod resize;

pub use jigsaw_puzzle_core::{
    GridSpec, PuzzleError, DEFAULT_COLUMNS, DEFAULT_ROWS, PIECE_CLASS, PIECE_DRAGGING_CLASS,
    PIECE_SOLVED_CLASS, ROOT_CLASS, SOLVE_TOLERANCE,
};
pub use puzzle::{JigsawPuzzle, JigsawPuzzleProps};
