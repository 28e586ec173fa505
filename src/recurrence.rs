use crate::{
    grid::{Cell, Direction, GridView, GAP},
    Mode, ScoringContext,
};

/// Pick the move for a cell from its three candidate scores.
///
/// Diagonal wins only when strictly greater than both gap moves; otherwise
/// Up wins only when strictly greater than Left. In local mode a cell whose
/// three candidates are all negative floors to `(None, 0)`.
pub fn choose(mode: Mode, diag: i32, up: i32, left: i32) -> (Direction, i32) {
    if mode == Mode::Local && diag < 0 && up < 0 && left < 0 {
        (Direction::None, 0)
    } else if diag > up && diag > left {
        (Direction::Diagonal, diag)
    } else if up > left {
        (Direction::Up, up)
    } else {
        (Direction::Left, left)
    }
}

/// The per-cell recurrence, bound to one pair of sequences and a scoring
/// context. Shared by every worker of a fill.
#[derive(Clone, Copy, Debug)]
pub struct Recurrence<'a> {
    top: &'a [u8],
    left: &'a [u8],
    scoring: &'a ScoringContext,
    mode: Mode,
}

impl<'a> Recurrence<'a> {
    pub fn new(top: &'a [u8], left: &'a [u8], scoring: &'a ScoringContext, mode: Mode) -> Self {
        Recurrence {
            top,
            left,
            scoring,
            mode,
        }
    }

    /// Compute cell `(i, j)` from its up, left and diagonal neighbours.
    ///
    /// Requires `1 <= i <= R`, `1 <= j <= C` and all three neighbours
    /// finalized in `view`.
    pub fn evaluate(&self, view: GridView<'_>, i: usize, j: usize) -> Cell {
        let gap = self.scoring.gap();
        let a = self.top[j - 1];
        let b = self.left[i - 1];

        let up = view.get(i - 1, j).value + gap;
        let across = view.get(i, j - 1).value + gap;
        let diag = view.get(i - 1, j - 1).value + self.scoring.substitution(a, b);

        let (direction, value) = choose(self.mode, diag, up, across);
        let (top, left) = match direction {
            Direction::Diagonal => (Some(a), Some(b)),
            Direction::Up => (Some(GAP), Some(b)),
            Direction::Left => (Some(a), Some(GAP)),
            Direction::None => (None, None),
        };
        Cell {
            value,
            direction,
            top,
            left,
        }
    }

    /// Evaluate `cells`, the run of a wave starting at `(i, j)` and walking
    /// down-left one cell per entry.
    pub fn evaluate_run(&self, view: GridView<'_>, (i, j): (usize, usize), cells: &mut [Cell]) {
        for (k, cell) in cells.iter_mut().enumerate() {
            *cell = self.evaluate(view, i + k, j - k);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn diagonal_needs_a_strict_double_majority() {
        assert_eq!(choose(Mode::Global, 5, 4, 4), (Direction::Diagonal, 5));
        // Equal to one competitor: falls through to up vs left.
        assert_eq!(choose(Mode::Global, 5, 5, 1), (Direction::Up, 5));
        assert_eq!(choose(Mode::Global, 5, 1, 5), (Direction::Left, 5));
        assert_eq!(choose(Mode::Global, 5, 5, 5), (Direction::Left, 5));
    }

    #[test]
    fn up_left_ties_go_left() {
        assert_eq!(choose(Mode::Global, -9, 2, 2), (Direction::Left, 2));
        assert_eq!(choose(Mode::Global, -9, 3, 2), (Direction::Up, 3));
    }

    #[test]
    fn local_floor_only_when_all_negative() {
        assert_eq!(choose(Mode::Local, -1, -2, -3), (Direction::None, 0));
        assert_eq!(choose(Mode::Local, 0, -2, -3), (Direction::Diagonal, 0));
        assert_eq!(choose(Mode::Local, -1, 0, -3), (Direction::Up, 0));
        // Global mode never floors.
        assert_eq!(choose(Mode::Global, -1, -2, -3), (Direction::Diagonal, -1));
    }

    #[test]
    fn evaluates_a_match_cell() {
        let scoring = ScoringContext::constants(5, -3, -4);
        let grid = Grid::seeded(Mode::Global, -4, b"GA", b"GC");
        let rec = Recurrence::new(b"GA", b"GC", &scoring, Mode::Global);

        let cell = rec.evaluate(grid.view(), 1, 1);
        assert_eq!(
            cell,
            Cell {
                value: 5,
                direction: Direction::Diagonal,
                top: Some(b'G'),
                left: Some(b'G'),
            }
        );
    }

    #[test]
    fn gap_moves_record_the_gap_symbol() {
        let scoring = ScoringContext::constants(5, -3, -4);
        let mut grid = Grid::seeded(Mode::Global, -4, b"GA", b"GC");
        let rec = Recurrence::new(b"GA", b"GC", &scoring, Mode::Global);
        grid[(1, 1)] = rec.evaluate(grid.view(), 1, 1);

        // (1, 2): up = -8 - 4, left = 5 - 4, diag = -4 - 3.
        let cell = rec.evaluate(grid.view(), 1, 2);
        assert_eq!((cell.direction, cell.value), (Direction::Left, 1));
        assert_eq!((cell.top, cell.left), (Some(b'A'), Some(GAP)));

        // (2, 1): up = 5 - 4, left = -8 - 4, diag = -4 - 3.
        let cell = rec.evaluate(grid.view(), 2, 1);
        assert_eq!((cell.direction, cell.value), (Direction::Up, 1));
        assert_eq!((cell.top, cell.left), (Some(GAP), Some(b'C')));
    }

    #[test]
    fn local_floor_clears_symbols() {
        let scoring = ScoringContext::constants(1, -5, -5);
        let grid = Grid::seeded(Mode::Local, -5, b"A", b"T");
        let rec = Recurrence::new(b"A", b"T", &scoring, Mode::Local);
        let cell = rec.evaluate(grid.view(), 1, 1);
        assert_eq!(cell, Cell::default());
    }
}
