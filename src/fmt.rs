use std::fmt::{self, Display};

use crate::solve::{Solution, Strategy};
use crate::{Board, Direction, InvalidBoard, Puzzle, State, Vec2};

/// Renders a sequence of states left to right, one board per column.
#[derive(Debug, Clone, Copy)]
pub struct SideBySide<'a>(pub &'a [State]);

const COLUMN_GAP: &str = "   ";

impl Board {
    fn label_width(&self) -> usize {
        let max_label = self.size as usize * self.size as usize - 1;
        max_label.to_string().len()
    }

    fn fmt_row(&self, f: &mut fmt::Formatter<'_>, row: u8) -> fmt::Result {
        let width = self.label_width();
        for col in 0..self.size {
            if col != 0 {
                " ".fmt(f)?;
            }
            let label = self[Vec2(row, col)];
            if label == self.blank {
                write!(f, "{:>width$}", "_")?;
            } else {
                write!(f, "{label:>width$}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            self.fmt_row(f, row)?;
            "\n".fmt(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.board().fmt(f)
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.initial(), self.goal())
    }
}

impl fmt::Display for SideBySide<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.0.first() else {
            return Ok(());
        };
        for row in 0..first.board().size() {
            for (i, state) in self.0.iter().enumerate() {
                if i != 0 {
                    COLUMN_GAP.fmt(f)?;
                }
                state.board().fmt_row(f, row)?;
            }
            "\n".fmt(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} moves", self.depth)?;
        SideBySide(&self.states).fmt(f)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Down => "Down".fmt(f),
            Direction::Up => "Up".fmt(f),
            Direction::Right => "Right".fmt(f),
            Direction::Left => "Left".fmt(f),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Bfs => "bfs".fmt(f),
            Strategy::AStar => "astar".fmt(f),
        }
    }
}

impl fmt::Display for InvalidBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidBoard::Size(size) => write!(f, "Unsupported board size {size}"),
            InvalidBoard::CellCount { expected, got } => {
                write!(f, "Expecting {expected} cells, got {got}")
            }
            InvalidBoard::LabelOutOfRange(label) => write!(f, "Tile {label} out of range"),
            InvalidBoard::DuplicateLabel(label) => write!(f, "Duplicate tile {label}"),
            InvalidBoard::BlankOutOfRange(label) => write!(f, "Blank label {label} out of range"),
            InvalidBoard::BlankOutOfBounds(pos) => {
                write!(f, "Blank position ({}, {}) outside the board", pos.0, pos.1)
            }
            InvalidBoard::BlankMismatch { given, actual } => write!(
                f,
                "Blank given at ({}, {}) but found at ({}, {})",
                given.0, given.1, actual.0, actual.1,
            ),
            InvalidBoard::GoalMismatch => {
                "Goal differs from the initial board in size or blank".fmt(f)
            }
        }
    }
}
