use std::mem;
use std::str::FromStr;

use anyhow::{anyhow, bail, ensure, Context, Result};

use crate::solve::Strategy;
use crate::{Board, Direction, Puzzle, State};

/// Written in place of the blank label.
const BLANK: &str = "_";

impl FromStr for Board {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        let size = u8::try_from(rows.len()).context("Too many rows")?;

        let mut cells = Vec::new();
        for (line, i) in rows.iter().zip(1..) {
            let width = cells.len();
            for tile in line.split_whitespace() {
                let label = match tile {
                    BLANK => Board::DEFAULT_BLANK,
                    _ => tile
                        .parse::<u8>()
                        .with_context(|| format!("Invalid tile {tile:?} on row {i}"))?,
                };
                cells.push(label);
            }
            ensure!(
                cells.len() - width == size as usize,
                "Width mismatch on row {i}, expecting {size} tiles",
            );
        }

        Ok(Board::new(size, Board::DEFAULT_BLANK, cells)?)
    }
}

/// The initial board, an empty line, then the goal board.
impl FromStr for Puzzle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut blocks = Vec::new();
        let mut block = String::new();
        for line in s.lines().map(|line| line.trim()) {
            if !line.is_empty() {
                block.push_str(line);
                block.push('\n');
            } else if !block.is_empty() {
                blocks.push(mem::take(&mut block));
            }
        }
        if !block.is_empty() {
            blocks.push(block);
        }

        let [initial, goal] = <[String; 2]>::try_from(blocks)
            .map_err(|blocks| anyhow!("Expecting 2 boards, found {}", blocks.len()))?;
        let initial = initial
            .parse::<Board>()
            .context("Invalid initial board")?;
        let goal = goal.parse::<Board>().context("Invalid goal board")?;
        Ok(Puzzle::new(State::from_board(initial), goal)?)
    }
}

impl TryFrom<char> for Direction {
    type Error = anyhow::Error;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        Ok(match ch {
            'D' => Direction::Down,
            'U' => Direction::Up,
            'R' => Direction::Right,
            'L' => Direction::Left,
            _ => bail!("Invalid direction: {ch:?}"),
        })
    }
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "bfs" => Strategy::Bfs,
            "astar" | "a*" => Strategy::AStar,
            _ => bail!("Unknown strategy {s:?}, expecting `bfs` or `astar`"),
        })
    }
}
