use clap::ValueEnum;

use crate::drag::TileMetrics;
use crate::error::PuzzleError;

/// Legal slides performed when scrambling a fresh board.
pub const DEFAULT_SHUFFLE_SWAPS: usize = 1000;
pub const DEFAULT_TILE_GAP: f32 = 2.0;
pub const DEFAULT_BOARD_EXTENT: f32 = 350.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GridSize {
    #[default]
    Small,
    Medium,
    Large,
    Epic,
    Evil,
}

impl GridSize {
    pub const ALL: [GridSize; 5] = [
        GridSize::Small,
        GridSize::Medium,
        GridSize::Large,
        GridSize::Epic,
        GridSize::Evil,
    ];

    pub fn dimension(self) -> usize {
        match self {
            GridSize::Small => 3,
            GridSize::Medium => 4,
            GridSize::Large => 5,
            GridSize::Epic => 6,
            GridSize::Evil => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GridSize::Small => "Small",
            GridSize::Medium => "Medium",
            GridSize::Large => "Large",
            GridSize::Epic => "Epic",
            GridSize::Evil => "Evil",
        }
    }

    /// A raw `--size` wins over the named choice but must be one of the
    /// offered dimensions.
    pub fn resolve(size: Option<usize>, fallback: GridSize) -> Result<GridSize, PuzzleError> {
        match size {
            Some(size) => GridSize::try_from(size),
            None => Ok(fallback),
        }
    }
}

impl TryFrom<usize> for GridSize {
    type Error = PuzzleError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        GridSize::ALL
            .into_iter()
            .find(|grid| grid.dimension() == size)
            .ok_or(PuzzleError::UnsupportedGrid(size))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub grid: GridSize,
    pub shuffle_swaps: usize,
    pub gap: f32,
    pub extent: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid: GridSize::default(),
            shuffle_swaps: DEFAULT_SHUFFLE_SWAPS,
            gap: DEFAULT_TILE_GAP,
            extent: DEFAULT_BOARD_EXTENT,
        }
    }
}

impl Settings {
    pub fn metrics(&self) -> TileMetrics {
        TileMetrics {
            tile_length: self.extent / self.grid.dimension() as f32,
            gap: self.gap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_choices_cover_three_to_seven() {
        let dims: Vec<usize> = GridSize::ALL.iter().map(|g| g.dimension()).collect();
        assert_eq!(dims, vec![3, 4, 5, 6, 7]);
        assert_eq!(GridSize::try_from(5usize), Ok(GridSize::Large));
        assert_eq!(GridSize::try_from(8usize), Err(PuzzleError::UnsupportedGrid(8)));
    }

    #[test]
    fn raw_size_overrides_the_named_grid() {
        assert_eq!(GridSize::resolve(None, GridSize::Epic), Ok(GridSize::Epic));
        assert_eq!(GridSize::resolve(Some(7), GridSize::Small), Ok(GridSize::Evil));
        assert_eq!(
            GridSize::resolve(Some(2), GridSize::Small),
            Err(PuzzleError::UnsupportedGrid(2))
        );
    }

    #[test]
    fn default_metrics_split_the_extent() {
        let settings = Settings {
            grid: GridSize::Medium,
            ..Settings::default()
        };
        let metrics = settings.metrics();
        assert_eq!(metrics.tile_length, 87.5);
        assert_eq!(metrics.gap, 2.0);
        assert_eq!(settings.shuffle_swaps, 1000);
    }
}
