#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PuzzleError {
    #[error("puzzle grid needs at least one row and one column (got {rows}x{columns})")]
    EmptyGrid { rows: u32, columns: u32 },
    #[error("image has no area ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("failed to load image {src}: {reason}")]
    ImageLoad { src: String, reason: String },
}
