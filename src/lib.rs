use std::ops::Index;

use arrayvec::ArrayVec;

mod fmt;
pub mod heuristic;
mod parse;
pub mod solve;

pub use fmt::SideBySide;

/// Largest supported side length. Every label must fit in one nibble of a [`Fingerprint`].
pub const MAX_SIZE: u8 = 4;
pub(crate) const MAX_CELLS: usize = MAX_SIZE as usize * MAX_SIZE as usize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InvalidBoard {
    Size(u8),
    CellCount { expected: usize, got: usize },
    LabelOutOfRange(u8),
    DuplicateLabel(u8),
    BlankOutOfRange(u8),
    BlankOutOfBounds(Vec2),
    BlankMismatch { given: Vec2, actual: Vec2 },
    GoalMismatch,
}

impl std::error::Error for InvalidBoard {}

/// `(row, column)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vec2(pub u8, pub u8);

impl Vec2 {
    pub fn distance(self, other: Self) -> u32 {
        self.0.abs_diff(other.0) as u32 + self.1.abs_diff(other.1) as u32
    }
}

/// The direction the blank slides in. The declaration order is the order moves are generated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Down = 0,
    Up,
    Right,
    Left,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Down, Self::Up, Self::Right, Self::Left];

    pub fn reversed(self) -> Self {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Direction::Down => 'D',
            Direction::Up => 'U',
            Direction::Right => 'R',
            Direction::Left => 'L',
        }
    }
}

/// A square grid holding every label of `0..size*size` exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: u8,
    blank: u8,
    grid: ArrayVec<u8, MAX_CELLS>,
}

impl Index<Vec2> for Board {
    type Output = u8;
    fn index(&self, pos: Vec2) -> &Self::Output {
        &self.grid[self.offset(pos)]
    }
}

impl Board {
    pub const DEFAULT_BLANK: u8 = 0;

    /// Builds a board from row-major `cells`, with `blank` as the label of the empty cell.
    pub fn new(
        size: u8,
        blank: u8,
        cells: impl IntoIterator<Item = u8>,
    ) -> Result<Self, InvalidBoard> {
        if !(2..=MAX_SIZE).contains(&size) {
            return Err(InvalidBoard::Size(size));
        }
        let cell_cnt = size as usize * size as usize;
        if blank as usize >= cell_cnt {
            return Err(InvalidBoard::BlankOutOfRange(blank));
        }

        let mut grid = ArrayVec::new();
        let mut seen = 0u16;
        let mut got = 0;
        for label in cells {
            got += 1;
            if got > cell_cnt {
                continue;
            }
            if label as usize >= cell_cnt {
                return Err(InvalidBoard::LabelOutOfRange(label));
            }
            if seen & (1 << label) != 0 {
                return Err(InvalidBoard::DuplicateLabel(label));
            }
            seen |= 1 << label;
            grid.push(label);
        }
        if got != cell_cnt {
            return Err(InvalidBoard::CellCount {
                expected: cell_cnt,
                got,
            });
        }

        Ok(Self { size, blank, grid })
    }

    /// Tiles `1..size*size` in row-major order with the blank in the last cell.
    pub fn solved(size: u8) -> Result<Self, InvalidBoard> {
        let cell_cnt = size as usize * size as usize;
        let tiles = (1..cell_cnt).map(|label| label as u8);
        Self::new(size, Self::DEFAULT_BLANK, tiles.chain([Self::DEFAULT_BLANK]))
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    /// The label of the empty cell.
    pub fn blank(&self) -> u8 {
        self.blank
    }

    pub fn cells(&self) -> impl Iterator<Item = (Vec2, u8)> + '_ {
        let idx_iter = std::iter::successors(Some(Vec2(0, 0)), |&Vec2(x, y)| {
            Some(if y + 1 < self.size {
                Vec2(x, y + 1)
            } else {
                Vec2(x + 1, 0)
            })
        });
        idx_iter.zip(self.grid.iter().copied())
    }

    pub fn position_of(&self, label: u8) -> Option<Vec2> {
        self.cells()
            .find_map(|(pos, cell)| (cell == label).then_some(pos))
    }

    pub fn blank_pos(&self) -> Vec2 {
        self.position_of(self.blank)
            .expect("Board holds every label")
    }

    /// Packs the labels row-major, one nibble each.
    ///
    /// Lossless for every supported size, so equal fingerprints of equally sized boards imply
    /// equal contents.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint(
            self.grid
                .iter()
                .fold(0, |acc, &label| acc << 4 | label as u64),
        )
    }

    fn offset(&self, pos: Vec2) -> usize {
        pos.0 as usize * self.size as usize + pos.1 as usize
    }

    fn contains(&self, pos: Vec2) -> bool {
        pos.0 < self.size && pos.1 < self.size
    }

    fn sibling_pos(&self, pos: Vec2, dir: Direction) -> Option<Vec2> {
        const DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
        let x = pos.0.checked_add_signed(DIRECTIONS[dir as usize].0)?;
        let y = pos.1.checked_add_signed(DIRECTIONS[dir as usize].1)?;
        let pos = Vec2(x, y);
        self.contains(pos).then_some(pos)
    }

    fn swapped(&self, a: Vec2, b: Vec2) -> Self {
        let mut board = self.clone();
        board.grid.swap(self.offset(a), self.offset(b));
        board
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(pub u64);

/// A board together with the position of its blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    board: Board,
    blank: Vec2,
}

impl State {
    pub fn new(board: Board, blank: Vec2) -> Result<Self, InvalidBoard> {
        if !board.contains(blank) {
            return Err(InvalidBoard::BlankOutOfBounds(blank));
        }
        let actual = board.blank_pos();
        if actual != blank {
            return Err(InvalidBoard::BlankMismatch {
                given: blank,
                actual,
            });
        }
        Ok(Self { board, blank })
    }

    pub fn from_board(board: Board) -> Self {
        let blank = board.blank_pos();
        Self { board, blank }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn blank(&self) -> Vec2 {
        self.blank
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.board.fingerprint()
    }

    pub fn is_goal(&self, goal: &Board) -> bool {
        self.board == *goal
    }

    /// Slides the blank one cell towards `dir`, or `None` if that leaves the grid.
    pub fn step(&self, dir: Direction) -> Option<Self> {
        let pos = self.board.sibling_pos(self.blank, dir)?;
        Some(Self {
            board: self.board.swapped(self.blank, pos),
            blank: pos,
        })
    }

    pub fn successors(&self) -> impl Iterator<Item = (Direction, Self)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| Some((dir, self.step(dir)?)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    initial: State,
    goal: Board,
}

impl Puzzle {
    pub fn new(initial: State, goal: Board) -> Result<Self, InvalidBoard> {
        if initial.board.size != goal.size || initial.board.blank != goal.blank {
            return Err(InvalidBoard::GoalMismatch);
        }
        Ok(Self { initial, goal })
    }

    pub fn initial(&self) -> &State {
        &self.initial
    }

    pub fn goal(&self) -> &Board {
        &self.goal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(cells: [u8; 9]) -> Board {
        Board::new(3, 0, cells).unwrap()
    }

    #[test]
    fn rejects_malformed_boards() {
        assert_eq!(Board::new(1, 0, [0]), Err(InvalidBoard::Size(1)));
        assert_eq!(Board::new(5, 0, 0..25), Err(InvalidBoard::Size(5)));
        assert_eq!(
            Board::new(3, 0, [1, 2, 3, 4, 0, 5, 6, 7]),
            Err(InvalidBoard::CellCount {
                expected: 9,
                got: 8
            }),
        );
        assert_eq!(
            Board::new(3, 0, [1, 2, 3, 4, 0, 5, 6, 7, 8, 9]),
            Err(InvalidBoard::CellCount {
                expected: 9,
                got: 10
            }),
        );
        assert_eq!(
            Board::new(3, 0, [1, 2, 3, 4, 0, 5, 6, 7, 9]),
            Err(InvalidBoard::LabelOutOfRange(9)),
        );
        assert_eq!(
            Board::new(3, 0, [1, 2, 3, 4, 0, 5, 6, 7, 7]),
            Err(InvalidBoard::DuplicateLabel(7)),
        );
        assert_eq!(
            Board::new(2, 4, [0, 1, 2, 3]),
            Err(InvalidBoard::BlankOutOfRange(4)),
        );
    }

    #[test]
    fn blank_must_match_sentinel() {
        let b = board([1, 2, 3, 4, 0, 5, 6, 7, 8]);
        assert_eq!(State::new(b.clone(), Vec2(1, 1)).unwrap().blank(), Vec2(1, 1));
        assert_eq!(
            State::new(b.clone(), Vec2(0, 0)),
            Err(InvalidBoard::BlankMismatch {
                given: Vec2(0, 0),
                actual: Vec2(1, 1)
            }),
        );
        assert_eq!(
            State::new(b.clone(), Vec2(3, 0)),
            Err(InvalidBoard::BlankOutOfBounds(Vec2(3, 0))),
        );
        assert_eq!(State::from_board(b).blank(), Vec2(1, 1));
    }

    #[test]
    fn custom_sentinel() {
        let b = Board::new(2, 3, [1, 3, 0, 2]).unwrap();
        let state = State::from_board(b);
        assert_eq!(state.blank(), Vec2(0, 1));
        let moved = state.step(Direction::Down).unwrap();
        assert_eq!(moved.board().cells().map(|(_, l)| l).collect::<Vec<_>>(), [1, 2, 0, 3]);
    }

    #[test]
    fn solved_board() {
        let b = Board::solved(3).unwrap();
        assert_eq!(b, board([1, 2, 3, 4, 5, 6, 7, 8, 0]));
        assert_eq!(b.blank_pos(), Vec2(2, 2));
        assert_eq!(b[Vec2(1, 2)], 6);
    }

    #[test]
    fn fingerprint_is_row_major_concatenation() {
        let a = board([1, 2, 3, 4, 0, 5, 6, 7, 8]);
        let b = board([1, 2, 3, 4, 5, 0, 6, 7, 8]);
        assert_eq!(a.fingerprint(), Fingerprint(0x1234_0567_8));
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());

        let c = Board::new(4, 0, (0..16).rev()).unwrap();
        assert_eq!(c.fingerprint(), Fingerprint(0xfedc_ba98_7654_3210));
    }

    #[test]
    fn successors_in_generation_order() {
        let center = State::from_board(board([1, 2, 3, 4, 0, 5, 6, 7, 8]));
        let dirs = center.successors().map(|(dir, _)| dir).collect::<Vec<_>>();
        assert_eq!(dirs, Direction::ALL);

        let (_, down) = center.successors().next().unwrap();
        assert_eq!(down.board(), &board([1, 2, 3, 4, 7, 5, 6, 0, 8]));
        assert_eq!(down.blank(), Vec2(2, 1));
        // The parent is untouched.
        assert_eq!(center.board(), &board([1, 2, 3, 4, 0, 5, 6, 7, 8]));

        let corner = State::from_board(Board::solved(3).unwrap());
        let dirs = corner.successors().map(|(dir, _)| dir).collect::<Vec<_>>();
        assert_eq!(dirs, [Direction::Up, Direction::Left]);
    }

    #[test]
    fn step_and_back() {
        let state = State::from_board(board([1, 2, 3, 4, 0, 5, 6, 7, 8]));
        for dir in Direction::ALL {
            let moved = state.step(dir).unwrap();
            assert_eq!(moved.step(dir.reversed()).unwrap(), state);
        }
    }

    #[test]
    fn goal_test() {
        let goal = Board::solved(3).unwrap();
        assert!(State::from_board(goal.clone()).is_goal(&goal));
        assert!(!State::from_board(board([1, 2, 3, 4, 0, 5, 6, 7, 8])).is_goal(&goal));
    }

    #[test]
    fn puzzle_requires_matching_goal() {
        let initial = State::from_board(board([1, 2, 3, 4, 0, 5, 6, 7, 8]));
        assert!(Puzzle::new(initial.clone(), Board::solved(3).unwrap()).is_ok());
        assert_eq!(
            Puzzle::new(initial.clone(), Board::solved(2).unwrap()),
            Err(InvalidBoard::GoalMismatch),
        );
        let other_blank = Board::new(3, 8, [1, 2, 3, 4, 5, 6, 7, 0, 8]).unwrap();
        assert_eq!(
            Puzzle::new(initial, other_blank),
            Err(InvalidBoard::GoalMismatch),
        );
    }
}
