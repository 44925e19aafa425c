use tracing::trace;

use crate::puzzle::{Direction, Puzzle};

/// Fraction of a tile length a drag must exceed to commit.
pub const COMMIT_FRACTION: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileMetrics {
    pub tile_length: f32,
    pub gap: f32,
}

impl TileMetrics {
    pub fn pitch(&self) -> f32 {
        self.tile_length + self.gap
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    Commit,
    Cancel,
}

fn clamp(value: f32, lo: f32, hi: f32) -> f32 {
    lo.max(value.min(hi))
}

pub fn constrained_offset<T: Clone + PartialEq>(
    puzzle: &Puzzle<T>,
    index: usize,
    translation: Offset,
    metrics: TileMetrics,
) -> Offset {
    let Some(direction) = puzzle.valid_direction(index) else {
        return Offset::ZERO;
    };

    let reach = metrics.pitch();

    match direction {
        Direction::Up => Offset::new(0.0, clamp(translation.y, -reach, 0.0)),
        Direction::Down => Offset::new(0.0, clamp(translation.y, 0.0, reach)),
        Direction::Left => Offset::new(clamp(translation.x, -reach, 0.0), 0.0),
        Direction::Right => Offset::new(clamp(translation.x, 0.0, reach), 0.0),
    }
}

pub fn release_decision<T: Clone + PartialEq>(
    puzzle: &Puzzle<T>,
    index: usize,
    offset: Offset,
    tile_length: f32,
) -> Release {
    let Some(direction) = puzzle.valid_direction(index) else {
        return Release::Cancel;
    };

    let magnitude = if direction.is_vertical() {
        offset.y.abs()
    } else {
        offset.x.abs()
    };

    if magnitude > tile_length * COMMIT_FRACTION {
        Release::Commit
    } else {
        Release::Cancel
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragSession {
    #[default]
    Idle,
    Dragging { index: usize, offset: Offset },
}

impl DragSession {
    pub fn press(index: usize) -> Self {
        DragSession::Dragging {
            index,
            offset: Offset::ZERO,
        }
    }

    pub fn drag<T: Clone + PartialEq>(
        self,
        puzzle: &Puzzle<T>,
        translation: Offset,
        metrics: TileMetrics,
    ) -> Self {
        match self {
            DragSession::Idle => DragSession::Idle,
            DragSession::Dragging { index, .. } => {
                let offset = constrained_offset(puzzle, index, translation, metrics);
                trace!(index, x = offset.x, y = offset.y, "drag");
                DragSession::Dragging { index, offset }
            }
        }
    }

    pub fn release<T: Clone + PartialEq>(
        self,
        puzzle: &mut Puzzle<T>,
        metrics: TileMetrics,
    ) -> (Self, Release) {
        let DragSession::Dragging { index, offset } = self else {
            return (DragSession::Idle, Release::Cancel);
        };

        let decision = release_decision(puzzle, index, offset, metrics.tile_length);
        if decision == Release::Commit {
            puzzle.commit_move(index);
        }

        (DragSession::Idle, decision)
    }

    pub fn active_index(&self) -> Option<usize> {
        match self {
            DragSession::Idle => None,
            DragSession::Dragging { index, .. } => Some(*index),
        }
    }

    pub fn offset_for(&self, index: usize) -> Offset {
        match self {
            DragSession::Dragging { index: active, offset } if *active == index => *offset,
            _ => Offset::ZERO,
        }
    }
}
