use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("grid size {0} is too small, need at least 2")]
    GridTooSmall(usize),
    #[error("a {size}x{size} grid needs {expected} tiles, got {actual}")]
    TileCountMismatch {
        size: usize,
        expected: usize,
        actual: usize,
    },
    #[error("no grid choice for size {0}")]
    UnsupportedGrid(usize),
}
