// Move generation: the four orthogonal moves available from the head

use crate::types::{Coord, Direction};

/// One of the four moves considered on a turn, with the cell it leads to.
///
/// Every candidate starts out safe. The safety passes may only ever clear the
/// flag, so there is no way to set it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub direction: Direction,
    pub target: Coord,
    safe: bool,
}

impl Candidate {
    pub fn new(direction: Direction, target: Coord) -> Self {
        Candidate {
            direction,
            target,
            safe: true,
        }
    }

    pub fn is_safe(&self) -> bool {
        self.safe
    }

    pub fn mark_unsafe(&mut self) {
        self.safe = false;
    }
}

/// Builds the up, down, left and right candidates for `head`, in that order
pub fn generate_candidates(head: Coord) -> [Candidate; 4] {
    Direction::all().map(|dir| Candidate::new(dir, dir.apply(&head)))
}
