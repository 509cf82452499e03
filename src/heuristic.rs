use arrayvec::ArrayVec;

use crate::{Board, State, Vec2, MAX_CELLS};

/// Sum of the Manhattan distances between every tile and its goal cell.
///
/// Admissible and consistent for unit-cost slides. The goal cell of every label is looked up once
/// on construction.
#[derive(Debug, Clone)]
pub struct Manhattan {
    blank: u8,
    targets: ArrayVec<Vec2, MAX_CELLS>,
}

impl Manhattan {
    pub fn new(goal: &Board) -> Self {
        let mut targets = goal
            .cells()
            .map(|_| Vec2(0, 0))
            .collect::<ArrayVec<_, MAX_CELLS>>();
        for (pos, label) in goal.cells() {
            targets[label as usize] = pos;
        }
        Self {
            blank: goal.blank(),
            targets,
        }
    }

    pub fn estimate(&self, state: &State) -> u32 {
        state
            .board()
            .cells()
            .filter(|&(_, label)| label != self.blank)
            .map(|(pos, label)| pos.distance(self.targets[label as usize]))
            .sum()
    }
}
