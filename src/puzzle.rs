use rand::{seq::SliceRandom, thread_rng, Rng};
use std::fmt;
use tracing::{debug, info};

use crate::config::DEFAULT_SHUFFLE_SWAPS;
use crate::error::PuzzleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

#[derive(Debug, Clone)]
pub struct Puzzle<T> {
    size: usize,
    board: Vec<Option<T>>,
    solved: Vec<Option<T>>,
    empty: usize,
    home: usize,
    moves: u32,
}

impl<T: Clone + PartialEq> Puzzle<T> {
    pub fn new(size: usize, tiles: Vec<T>) -> Result<Self, PuzzleError> {
        if size < 2 {
            return Err(PuzzleError::GridTooSmall(size));
        }

        let expected = size * size - 1;
        if tiles.len() != expected {
            return Err(PuzzleError::TileCountMismatch {
                size,
                expected,
                actual: tiles.len(),
            });
        }

        let board: Vec<Option<T>> = tiles.into_iter().map(Some).chain([None]).collect();

        Ok(Self {
            size,
            solved: board.clone(),
            board,
            empty: expected,
            home: expected,
            moves: 0,
        })
    }

    pub fn shuffled<R: Rng + ?Sized>(
        size: usize,
        tiles: Vec<T>,
        swaps: usize,
        rng: &mut R,
    ) -> Result<Self, PuzzleError> {
        let mut puzzle = Self::new(size, tiles)?;
        puzzle.shuffle_with(rng, swaps);
        Ok(puzzle)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.board.len()
    }

    pub fn empty_index(&self) -> usize {
        self.empty
    }

    pub fn move_count(&self) -> u32 {
        self.moves
    }

    pub fn slots(&self) -> &[Option<T>] {
        &self.board
    }

    pub fn tile(&self, index: usize) -> Option<&T> {
        self.check_index(index);
        self.board[index].as_ref()
    }

    pub fn adjacent_slots(&self, index: usize) -> Vec<usize> {
        self.check_index(index);

        let row = index / self.size;
        let col = index % self.size;
        let mut adjacent = Vec::with_capacity(4);

        if row > 0 {
            adjacent.push(index - self.size);
        }
        if row < self.size - 1 {
            adjacent.push(index + self.size);
        }
        if col > 0 {
            adjacent.push(index - 1);
        }
        if col < self.size - 1 {
            adjacent.push(index + 1);
        }

        adjacent
    }

    pub fn shuffle(&mut self) {
        let mut rng = thread_rng();
        self.shuffle_with(&mut rng, DEFAULT_SHUFFLE_SWAPS);
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R, swaps: usize) {
        for _ in 0..swaps {
            let neighbours = self.adjacent_slots(self.empty);
            if let Some(&slot) = neighbours.choose(rng) {
                self.swap_with_empty(slot);
            }
        }

        info!(size = self.size, swaps, empty = self.empty, "shuffled board");
    }

    pub fn valid_direction(&self, index: usize) -> Option<Direction> {
        if !self.adjacent_slots(self.empty).contains(&index) {
            return None;
        }

        let tile_row = index / self.size;
        let tile_col = index % self.size;
        let empty_row = self.empty / self.size;
        let empty_col = self.empty % self.size;

        if tile_row == empty_row {
            Some(if tile_col < empty_col {
                Direction::Right
            } else {
                Direction::Left
            })
        } else if tile_row < empty_row {
            Some(Direction::Down)
        } else {
            Some(Direction::Up)
        }
    }

    pub fn commit_move(&mut self, index: usize) -> bool {
        let Some(direction) = self.valid_direction(index) else {
            return false;
        };

        self.swap_with_empty(index);
        self.moves += 1;
        debug!(index, ?direction, moves = self.moves, "committed move");
        true
    }

    pub fn is_solved(&self) -> bool {
        self.board == self.solved
    }

    /// Whether legal slides can bring the board back to the solved layout.
    ///
    /// Each slide is a transposition that also moves the empty slot one step,
    /// so the permutation parity must match the parity of the empty slot's
    /// distance from home. A repeated tile can swap places with its twin
    /// for free, which makes either parity reachable.
    pub fn is_solvable(&self) -> bool {
        let Some(ranks) = self.solved_ranks() else {
            return false;
        };
        if self.has_repeated_tile() {
            return true;
        }

        let (row, col) = (self.empty / self.size, self.empty % self.size);
        let (home_row, home_col) = (self.home / self.size, self.home % self.size);
        let distance = row.abs_diff(home_row) + col.abs_diff(home_col);

        Self::count_inversions(&ranks) % 2 == distance % 2
    }

    fn solved_ranks(&self) -> Option<Vec<usize>> {
        let mut taken = vec![false; self.solved.len()];

        self.board
            .iter()
            .map(|slot| {
                let rank = (0..self.solved.len())
                    .find(|&i| !taken[i] && self.solved[i] == *slot)?;
                taken[rank] = true;
                Some(rank)
            })
            .collect()
    }

    fn has_repeated_tile(&self) -> bool {
        self.solved
            .iter()
            .enumerate()
            .any(|(i, slot)| self.solved[i + 1..].contains(slot))
    }

    fn count_inversions(ranks: &[usize]) -> usize {
        ranks
            .iter()
            .enumerate()
            .map(|(i, &rank)| ranks[i + 1..].iter().filter(|&&next| next < rank).count())
            .sum()
    }

    fn swap_with_empty(&mut self, index: usize) {
        self.board.swap(index, self.empty);
        self.empty = index;
        debug_assert!(self.board[self.empty].is_none());
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.board.len(),
            "slot {} is outside the {}x{} grid",
            index,
            self.size,
            self.size
        );
    }
}

impl<T: fmt::Display> fmt::Display for Puzzle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.board.chunks(self.size) {
            for slot in row {
                match slot {
                    Some(tile) => write!(f, "{:>2} ", tile)?,
                    None => write!(f, "   ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn letters(size: usize) -> Puzzle<char> {
        let tiles = ('A'..='Z').take(size * size - 1).collect();
        Puzzle::new(size, tiles).unwrap()
    }

    #[test]
    fn new_puzzle_is_solved_with_empty_last() {
        let puzzle = letters(3);
        assert!(puzzle.is_solved());
        assert_eq!(puzzle.empty_index(), 8);
        assert_eq!(puzzle.move_count(), 0);
        assert_eq!(puzzle.tile(0), Some(&'A'));
        assert_eq!(puzzle.tile(8), None);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert_eq!(
            Puzzle::new(1, Vec::<u32>::new()).unwrap_err(),
            PuzzleError::GridTooSmall(1)
        );
        assert_eq!(
            Puzzle::new(3, vec![1u32; 9]).unwrap_err(),
            PuzzleError::TileCountMismatch {
                size: 3,
                expected: 8,
                actual: 9
            }
        );
    }

    #[test]
    fn adjacency_counts_for_corners_edges_and_interior() {
        let puzzle = letters(3);
        assert_eq!(puzzle.adjacent_slots(0), vec![3, 1]);
        assert_eq!(puzzle.adjacent_slots(1), vec![4, 0, 2]);
        assert_eq!(puzzle.adjacent_slots(4), vec![1, 7, 3, 5]);
        assert_eq!(puzzle.adjacent_slots(8), vec![5, 7]);
    }

    #[test]
    fn two_by_two_slots_are_all_corners() {
        let puzzle = letters(2);
        for index in 0..4 {
            assert_eq!(puzzle.adjacent_slots(index).len(), 2);
        }
    }

    #[test]
    fn directions_follow_the_empty_slot() {
        let puzzle = letters(3);
        // Empty at 8: the tile above slides down, the tile on the left slides right.
        assert_eq!(puzzle.valid_direction(5), Some(Direction::Down));
        assert_eq!(puzzle.valid_direction(7), Some(Direction::Right));
        assert_eq!(puzzle.valid_direction(0), None);
        assert_eq!(puzzle.valid_direction(8), None);

        let mut puzzle = letters(3);
        puzzle.board.swap(4, 8);
        puzzle.empty = 4;
        assert_eq!(puzzle.valid_direction(1), Some(Direction::Down));
        assert_eq!(puzzle.valid_direction(7), Some(Direction::Up));
        assert_eq!(puzzle.valid_direction(3), Some(Direction::Right));
        assert_eq!(puzzle.valid_direction(5), Some(Direction::Left));
    }

    #[test]
    fn committing_the_single_swap_restores_the_solution() {
        let mut puzzle = letters(3);
        puzzle.swap_with_empty(5);
        assert_eq!(
            puzzle.slots(),
            &[
                Some('A'),
                Some('B'),
                Some('C'),
                Some('D'),
                Some('E'),
                None,
                Some('G'),
                Some('H'),
                Some('F')
            ]
        );
        assert!(!puzzle.is_solved());

        assert!(puzzle.commit_move(8));
        assert_eq!(puzzle.move_count(), 1);
        assert_eq!(puzzle.empty_index(), 8);
        assert!(puzzle.is_solved());
    }

    #[test]
    fn illegal_commit_is_a_no_op() {
        let mut puzzle = letters(3);
        let before = puzzle.slots().to_vec();
        assert!(!puzzle.commit_move(0));
        assert!(!puzzle.commit_move(8));
        assert_eq!(puzzle.slots(), before.as_slice());
        assert_eq!(puzzle.move_count(), 0);
    }

    #[test]
    fn shuffle_keeps_counter_and_solvability() {
        let mut puzzle = letters(4);
        puzzle.shuffle();
        assert_eq!(puzzle.move_count(), 0);
        assert!(puzzle.is_solvable());
        assert!(puzzle.board[puzzle.empty_index()].is_none());
    }

    #[test]
    fn seeded_shuffles_repeat() {
        let tiles: Vec<u32> = (0..15).collect();
        let a = Puzzle::shuffled(4, tiles.clone(), 1000, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = Puzzle::shuffled(4, tiles, 1000, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a.slots(), b.slots());
    }

    #[test]
    fn transposed_tiles_are_unsolvable() {
        for size in [2, 3, 4] {
            let mut puzzle = letters(size);
            assert!(puzzle.is_solvable());
            puzzle.board.swap(0, 1);
            assert!(!puzzle.is_solvable(), "size {size}");
        }
    }

    #[test]
    fn repeated_tiles_stay_solvable_after_legal_slides() {
        let mut puzzle = Puzzle::new(2, vec![1u32, 1, 2]).unwrap();
        for index in [2, 0, 1, 3] {
            assert!(puzzle.commit_move(index));
        }
        assert_eq!(puzzle.slots(), &[Some(1), Some(2), Some(1), None]);
        assert!(!puzzle.is_solved());
        assert!(puzzle.is_solvable());

        let mut tampered = Puzzle::new(2, vec![1u32, 1, 2]).unwrap();
        tampered.board[0] = Some(3);
        assert!(!tampered.is_solvable());
    }

    #[test]
    fn display_leaves_the_empty_slot_blank() {
        let puzzle = Puzzle::new(2, vec![1u32, 2, 3]).unwrap();
        assert_eq!(puzzle.to_string(), " 1  2 \n 3    \n");
    }

    #[test]
    #[should_panic(expected = "outside the 3x3 grid")]
    fn out_of_range_index_panics() {
        letters(3).adjacent_slots(9);
    }
}
