use crate::drag::{DragSession, Offset};
use crate::puzzle::Puzzle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotView<'a, T> {
    pub tile: Option<&'a T>,
    pub offset: Offset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardView<'a, T> {
    pub size: usize,
    pub slots: Vec<SlotView<'a, T>>,
    pub move_count: u32,
    pub solved: bool,
}

impl<'a, T: Clone + PartialEq> BoardView<'a, T> {
    pub fn new(puzzle: &'a Puzzle<T>, session: &DragSession) -> Self {
        let slots = puzzle
            .slots()
            .iter()
            .enumerate()
            .map(|(index, slot)| SlotView {
                tile: slot.as_ref(),
                offset: session.offset_for(index),
            })
            .collect();

        Self {
            size: puzzle.size(),
            slots,
            move_count: puzzle.move_count(),
            solved: puzzle.is_solved(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::TileMetrics;

    #[test]
    fn only_the_dragged_slot_carries_an_offset() {
        let puzzle = Puzzle::new(2, vec!['a', 'b', 'c']).unwrap();
        let metrics = TileMetrics {
            tile_length: 10.0,
            gap: 2.0,
        };
        let session = DragSession::press(2).drag(&puzzle, Offset::new(4.0, 0.0), metrics);
        let view = BoardView::new(&puzzle, &session);

        assert_eq!(view.size, 2);
        assert!(view.solved);
        assert_eq!(view.move_count, 0);
        assert_eq!(view.slots[2].tile, Some(&'c'));
        assert_eq!(view.slots[2].offset, Offset::new(4.0, 0.0));
        assert_eq!(view.slots[3].tile, None);
        assert!(view.slots[..2].iter().all(|slot| slot.offset == Offset::ZERO));
    }
}
