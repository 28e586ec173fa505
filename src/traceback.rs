use std::{fmt, str::FromStr};

use crate::{
    grid::{Direction, Grid, GAP},
    Alignment, Mode, ParseOptionError,
};

/// Where a local traceback begins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TracebackStart {
    /// The highest scoring cell (standard Smith-Waterman).
    #[default]
    Best,
    /// The bottom-right cell, whatever its score.
    Corner,
}

impl fmt::Display for TracebackStart {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TracebackStart::Best => f.write_str("best"),
            TracebackStart::Corner => f.write_str("corner"),
        }
    }
}

impl FromStr for TracebackStart {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "best" => Ok(TracebackStart::Best),
            "corner" => Ok(TracebackStart::Corner),
            _ => Err(ParseOptionError {
                kind: "traceback start",
                value: s.to_string(),
                expected: "best, corner",
            }),
        }
    }
}

/// Highest value in the grid and where it was first seen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BestCell {
    pub value: i32,
    pub row: usize,
    pub col: usize,
}

/// Scan the grid in row-major order for its maximum. Ties keep the first
/// maximum; a grid with no positive cell yields `(0, 0, 0)`.
pub fn locate_best(grid: &Grid) -> BestCell {
    grid.row_major()
        .fold(BestCell::default(), |best, ((row, col), cell)| {
            if cell.value > best.value {
                BestCell {
                    value: cell.value,
                    row,
                    col,
                }
            } else {
                best
            }
        })
}

/// Follow direction pointers from `start` back to an origin.
///
/// A global walk ends at `(0, 0)`, crossing the border as gaps. A local walk
/// ends at the first cell missing a symbol: the border or a floored cell.
pub fn traceback(grid: &Grid, mode: Mode, start: (usize, usize), score: i32) -> Alignment {
    let (mut i, mut j) = start;
    let mut top = Vec::new();
    let mut markers = Vec::new();
    let mut bottom = Vec::new();

    loop {
        let cell = grid.get(i, j);
        let done = match mode {
            Mode::Global => (i, j) == (0, 0),
            Mode::Local => cell.top.is_none() || cell.left.is_none(),
        };
        if done {
            break;
        }
        let t = cell.top.unwrap_or(GAP);
        let b = cell.left.unwrap_or(GAP);
        let marker = match cell.direction {
            Direction::Up => {
                i -= 1;
                b' '
            }
            Direction::Left => {
                j -= 1;
                b' '
            }
            Direction::Diagonal => {
                i -= 1;
                j -= 1;
                if t == b {
                    b'|'
                } else {
                    b':'
                }
            }
            Direction::None => break,
        };
        top.push(t);
        markers.push(marker);
        bottom.push(b);
    }

    top.reverse();
    markers.reverse();
    bottom.reverse();
    Alignment {
        score,
        top,
        markers,
        bottom,
        top_range: j..start.1,
        bottom_range: i..start.0,
    }
}
