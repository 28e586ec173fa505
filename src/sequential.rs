use crate::{
    session::AlignmentSession, traceback::TracebackStart, AlignError, Aligner, Alignment, Mode,
    ScoringContext,
};

/// Single-threaded aligner filling the matrix row by row. Serves as the
/// reference the wavefront fill must reproduce cell for cell.
#[derive(Clone, Debug)]
pub struct SequentialAligner<'a> {
    a: &'a [u8],
    b: &'a [u8],
    scoring: &'a ScoringContext,
    mode: Mode,
    start: TracebackStart,
}

impl<'a> Aligner<'a> for SequentialAligner<'a> {
    fn with(a: &'a [u8], b: &'a [u8], scoring: &'a ScoringContext) -> Self {
        SequentialAligner {
            a,
            b,
            scoring,
            mode: Mode::Global,
            start: TracebackStart::Best,
        }
    }

    fn align(&self) -> Result<Alignment, AlignError> {
        let mut session = AlignmentSession::new(self.a, self.b, self.scoring, self.mode)?;
        session.fill_row_major();
        Ok(session.finish(self.start))
    }
}

impl<'a> SequentialAligner<'a> {
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_traceback(mut self, start: TracebackStart) -> Self {
        self.start = start;
        self
    }
}
