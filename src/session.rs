use crate::{
    grid::Grid,
    recurrence::Recurrence,
    traceback::{self, BestCell, TracebackStart},
    AlignError, Alignment, Mode, ScoringContext,
};

/// State of one alignment run: the two sequences, the scoring context and
/// the grid being filled.
///
/// `top` is the first sequence (grid columns), `left` the second (rows).
#[derive(Debug)]
pub struct AlignmentSession<'a> {
    top: &'a [u8],
    left: &'a [u8],
    scoring: &'a ScoringContext,
    mode: Mode,
    grid: Grid,
}

impl<'a> AlignmentSession<'a> {
    /// Check both sequences against the scoring context, then allocate and
    /// seed the grid.
    pub fn new(
        top: &'a [u8],
        left: &'a [u8],
        scoring: &'a ScoringContext,
        mode: Mode,
    ) -> Result<Self, AlignError> {
        scoring.validate(top, "sequence 1")?;
        scoring.validate(left, "sequence 2")?;
        let grid = Grid::seeded(mode, scoring.gap(), top, left);
        Ok(AlignmentSession {
            top,
            left,
            scoring,
            mode,
            grid,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    pub fn recurrence(&self) -> Recurrence<'a> {
        Recurrence::new(self.top, self.left, self.scoring, self.mode)
    }

    /// The recurrence together with mutable access to the grid, for fills.
    pub fn parts_mut(&mut self) -> (Recurrence<'a>, &mut Grid) {
        (self.recurrence(), &mut self.grid)
    }

    /// Fill every interior cell strictly in row-major order on the calling
    /// thread.
    pub fn fill_row_major(&mut self) {
        let (rec, grid) = self.parts_mut();
        for i in 1..grid.rows() {
            for j in 1..grid.cols() {
                grid[(i, j)] = rec.evaluate(grid.view(), i, j);
            }
        }
    }

    pub fn best_cell(&self) -> BestCell {
        traceback::locate_best(&self.grid)
    }

    /// Reconstruct the alignment from a filled grid.
    ///
    /// Global alignments always start at the bottom-right cell and score its
    /// value. Local alignments score the grid maximum and start where `start`
    /// says.
    pub fn finish(&self, start: TracebackStart) -> Alignment {
        let corner = (self.grid.rows() - 1, self.grid.cols() - 1);
        match self.mode {
            Mode::Global => {
                let score = self.grid.get(corner.0, corner.1).value;
                traceback::traceback(&self.grid, Mode::Global, corner, score)
            }
            Mode::Local => {
                let best = self.best_cell();
                let from = match start {
                    TracebackStart::Best => (best.row, best.col),
                    TracebackStart::Corner => corner,
                };
                traceback::traceback(&self.grid, Mode::Local, from, best.value)
            }
        }
    }
}
