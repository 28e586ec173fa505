//! The score matrix.
//!
//! Cells are stored anti-diagonal by anti-diagonal rather than row by row.
//! Every cell of diagonal `d = i + j` depends only on diagonals `d - 1` and
//! `d - 2`, so splitting the backing vector at the first cell of a wave
//! yields an immutable view of everything the wave reads and a mutable slice
//! of exactly the cells it writes.

use std::ops::{Index, IndexMut, Range};

use crate::Mode;

/// Symbol written in place of a consumed residue when a move is a gap.
pub const GAP: u8 = b'-';

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Left,
    Diagonal,
    /// Origin, or a local-mode cell floored to zero.
    #[default]
    None,
}

/// One position of the matrix: the best score reaching it, the move that
/// produced that score and the symbols consumed by the move.
///
/// `top` is taken from the first sequence, `left` from the second. A gap is
/// `Some(GAP)`; `None` marks a cell no traceback may pass through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    pub value: i32,
    pub direction: Direction,
    pub top: Option<u8>,
    pub left: Option<u8>,
}

/// Maps `(row, col)` coordinates to positions in diagonal-major storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    rows: usize,
    cols: usize,
    offsets: Vec<usize>,
}

impl Layout {
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "a grid has at least the origin cell");
        let diagonals = rows + cols - 1;
        let mut offsets = Vec::with_capacity(diagonals + 1);
        let mut total = 0;
        offsets.push(0);
        for d in 0..diagonals {
            let (lo, hi) = Self::bounds(rows, cols, d);
            total += hi - lo + 1;
            offsets.push(total);
        }
        Layout {
            rows,
            cols,
            offsets,
        }
    }

    fn bounds(rows: usize, cols: usize, d: usize) -> (usize, usize) {
        (d.saturating_sub(cols - 1), d.min(rows - 1))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// First and last row touched by anti-diagonal `d`.
    pub fn diagonal_rows(&self, d: usize) -> (usize, usize) {
        Self::bounds(self.rows, self.cols, d)
    }

    /// Storage position of `(i, j)`.
    pub fn index(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.rows && j < self.cols,
            "cell ({i}, {j}) outside {}x{} grid",
            self.rows,
            self.cols
        );
        let d = i + j;
        let (lo, _) = self.diagonal_rows(d);
        self.offsets[d] + (i - lo)
    }

    /// Storage range of `len` cells walking down-left from `(i, j)`.
    pub fn run(&self, (i, j): (usize, usize), len: usize) -> Range<usize> {
        let start = self.index(i, j);
        if len > 0 {
            // Last cell must stay on the same diagonal and inside the grid.
            self.index(i + len - 1, j + 1 - len);
        }
        start..start + len
    }
}

/// The `(R + 1) x (C + 1)` matrix of an alignment run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    layout: Layout,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        let layout = Layout::new(rows, cols);
        let cells = vec![Cell::default(); layout.cell_count()];
        Grid { layout, cells }
    }

    /// Allocate the grid for aligning `top` (columns) against `left` (rows)
    /// and seed its border.
    pub fn seeded(mode: Mode, gap: i32, top: &[u8], left: &[u8]) -> Self {
        let mut grid = Grid::new(left.len() + 1, top.len() + 1);
        grid.initialize(mode, gap, top, left);
        grid
    }

    /// Seed row 0 and column 0.
    ///
    /// Global borders carry the cumulative gap penalty; local borders are
    /// zero. Both record the border symbol so a global traceback can walk
    /// the border back to the origin.
    pub fn initialize(&mut self, mode: Mode, gap: i32, top: &[u8], left: &[u8]) {
        assert_eq!(self.cols(), top.len() + 1, "column count must be len(top) + 1");
        assert_eq!(self.rows(), left.len() + 1, "row count must be len(left) + 1");
        let border = |k: usize| match mode {
            Mode::Global => gap * k as i32,
            Mode::Local => 0,
        };

        self[(0, 0)] = Cell::default();
        for (j, &symbol) in top.iter().enumerate().map(|(k, s)| (k + 1, s)) {
            self[(0, j)] = Cell {
                value: border(j),
                direction: Direction::Left,
                top: Some(symbol),
                left: None,
            };
        }
        for (i, &symbol) in left.iter().enumerate().map(|(k, s)| (k + 1, s)) {
            self[(i, 0)] = Cell {
                value: border(i),
                direction: Direction::Up,
                top: None,
                left: Some(symbol),
            };
        }
    }

    pub fn rows(&self) -> usize {
        self.layout.rows()
    }

    pub fn cols(&self) -> usize {
        self.layout.cols()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn get(&self, i: usize, j: usize) -> &Cell {
        &self.cells[self.layout.index(i, j)]
    }

    pub fn view(&self) -> GridView<'_> {
        GridView {
            layout: &self.layout,
            cells: &self.cells,
        }
    }

    /// Split storage at `run.start`: everything before it is returned as a
    /// read-only view, the run itself as a mutable slice.
    pub fn split_run(&mut self, run: Range<usize>) -> (GridView<'_>, &mut [Cell]) {
        let (done, rest) = self.cells.split_at_mut(run.start);
        let view = GridView {
            layout: &self.layout,
            cells: done,
        };
        (view, &mut rest[..run.len()])
    }

    /// Cells in row-major order with their coordinates.
    pub fn row_major(&self) -> impl Iterator<Item = ((usize, usize), &Cell)> + '_ {
        let cols = self.cols();
        (0..self.rows() * cols).map(move |k| {
            let (i, j) = (k / cols, k % cols);
            ((i, j), self.get(i, j))
        })
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = Cell;

    fn index(&self, (i, j): (usize, usize)) -> &Cell {
        self.get(i, j)
    }
}

impl IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Cell {
        let k = self.layout.index(i, j);
        &mut self.cells[k]
    }
}

/// Read-only access to a prefix of the grid's storage.
///
/// Reading a cell outside the prefix panics: it means a wave read a cell
/// that has not been finalized yet.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'g> {
    layout: &'g Layout,
    cells: &'g [Cell],
}

impl<'g> GridView<'g> {
    pub fn get(&self, i: usize, j: usize) -> &'g Cell {
        let k = self.layout.index(i, j);
        match self.cells.get(k) {
            Some(cell) => cell,
            None => panic!("cell ({i}, {j}) read before its wave completed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_a_bijection() {
        for (rows, cols) in [(1, 1), (1, 5), (5, 1), (3, 3), (4, 7), (7, 4)] {
            let layout = Layout::new(rows, cols);
            let mut seen = vec![false; layout.cell_count()];
            for i in 0..rows {
                for j in 0..cols {
                    let k = layout.index(i, j);
                    assert!(!seen[k], "({i}, {j}) collides in {rows}x{cols}");
                    seen[k] = true;
                }
            }
            assert!(seen.into_iter().all(|s| s));
        }
    }

    #[test]
    fn earlier_diagonals_come_first() {
        let layout = Layout::new(4, 6);
        for i in 1..4 {
            for j in 1..6 {
                let here = layout.index(i, j);
                assert!(layout.index(i - 1, j) < here);
                assert!(layout.index(i, j - 1) < here);
                assert!(layout.index(i - 1, j - 1) < here);
            }
        }
    }

    #[test]
    fn run_covers_consecutive_cells_of_a_diagonal() {
        let layout = Layout::new(4, 6);
        let run = layout.run((1, 4), 3);
        assert_eq!(run.len(), 3);
        assert_eq!(layout.index(2, 3), run.start + 1);
        assert_eq!(layout.index(3, 2), run.start + 2);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn run_past_the_grid_panics() {
        Layout::new(3, 3).run((1, 2), 3);
    }

    #[test]
    fn global_border_is_cumulative_gap() {
        let grid = Grid::seeded(Mode::Global, -4, b"GAT", b"GC");
        assert_eq!((grid.rows(), grid.cols()), (3, 4));
        assert_eq!(grid[(0, 0)], Cell::default());
        assert_eq!(grid[(0, 3)].value, -12);
        assert_eq!(grid[(0, 3)].direction, Direction::Left);
        assert_eq!(grid[(0, 3)].top, Some(b'T'));
        assert_eq!(grid[(0, 3)].left, None);
        assert_eq!(grid[(2, 0)].value, -8);
        assert_eq!(grid[(2, 0)].direction, Direction::Up);
        assert_eq!(grid[(2, 0)].left, Some(b'C'));
    }

    #[test]
    fn local_border_is_zero() {
        let grid = Grid::seeded(Mode::Local, -4, b"GAT", b"GC");
        assert!((0..4).all(|j| grid[(0, j)].value == 0));
        assert!((0..3).all(|i| grid[(i, 0)].value == 0));
        assert_eq!(grid[(1, 0)].left, Some(b'G'));
        assert_eq!(grid[(0, 2)].top, Some(b'A'));
    }

    #[test]
    fn empty_sequences_give_degenerate_grids() {
        let grid = Grid::seeded(Mode::Global, -2, b"", b"ACG");
        assert_eq!((grid.rows(), grid.cols()), (4, 1));
        assert_eq!(grid[(3, 0)].value, -6);

        let grid = Grid::seeded(Mode::Global, -2, b"", b"");
        assert_eq!((grid.rows(), grid.cols()), (1, 1));
    }

    #[test]
    fn split_run_hides_the_run_and_later_cells() {
        let mut grid = Grid::seeded(Mode::Global, -1, b"AC", b"AC");
        let run = grid.layout().run((1, 1), 1);
        let (view, cells) = grid.split_run(run);
        assert_eq!(cells.len(), 1);
        assert_eq!(view.get(0, 1).value, -1);
        assert_eq!(view.get(1, 0).value, -1);
        let result = std::panic::catch_unwind(|| view.get(2, 2).value);
        assert!(result.is_err());
    }

    #[test]
    fn row_major_walks_rows_first() {
        let grid = Grid::new(2, 3);
        let coords: Vec<_> = grid.row_major().map(|(ij, _)| ij).collect();
        assert_eq!(coords, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    }
}
