pub mod error;
pub mod grid;
pub mod input;
pub mod recurrence;
pub mod report;
pub mod scoring;
pub mod sequential;
pub mod session;
pub mod traceback;
pub mod wavefront;

use std::{fmt, ops::Range, str::FromStr};

pub use error::{AlignError, InputError, ParseOptionError, ScoringError};
pub use scoring::{BuiltinMatrix, Scheme, ScoringContext, SubstitutionMatrix};
pub use session::AlignmentSession;
pub use traceback::TracebackStart;
pub use wavefront::{CancelToken, Scheduler, Strategy, WavefrontAligner};

/// Needleman-Wunsch (global) or Smith-Waterman (local) alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Global,
    Local,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mode::Global => f.write_str("global"),
            Mode::Local => f.write_str("local"),
        }
    }
}

impl FromStr for Mode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "global" => Ok(Mode::Global),
            "local" => Ok(Mode::Local),
            _ => Err(ParseOptionError {
                kind: "alignment type",
                value: s.to_string(),
                expected: "global, local",
            }),
        }
    }
}

/// A finished pairwise alignment.
///
/// `top`, `markers` and `bottom` always have the same length. Markers are
/// `|` for an exact match, `:` for a mismatch and a space for a gap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Alignment {
    pub score: i32,
    pub top: Vec<u8>,
    pub markers: Vec<u8>,
    pub bottom: Vec<u8>,
    /// Span of the first sequence covered by the alignment.
    pub top_range: Range<usize>,
    /// Span of the second sequence covered by the alignment.
    pub bottom_range: Range<usize>,
}

impl Alignment {
    pub fn len(&self) -> usize {
        self.top.len()
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty()
    }

    /// Aligned columns as `(top, marker, bottom)` triples.
    pub fn columns(&self) -> impl Iterator<Item = (u8, u8, u8)> + '_ {
        self.top
            .iter()
            .zip(&self.markers)
            .zip(&self.bottom)
            .map(|((&t, &m), &b)| (t, m, b))
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let s1 = String::from_utf8_lossy(&self.top);
        let m = String::from_utf8_lossy(&self.markers);
        let s2 = String::from_utf8_lossy(&self.bottom);
        writeln!(f, "{s1}\n{m}\n{s2}\nScore: {}", self.score)?;
        Ok(())
    }
}

pub trait Aligner<'a> {
    fn with(a: &'a [u8], b: &'a [u8], scoring: &'a ScoringContext) -> Self;
    fn align(&self) -> Result<Alignment, AlignError>;
}

/// Align `a` (columns) against `b` (rows) on `workers` threads using the
/// static batch strategy.
pub fn align(
    a: &[u8],
    b: &[u8],
    scoring: &ScoringContext,
    mode: Mode,
    workers: usize,
) -> Result<Alignment, AlignError> {
    WavefrontAligner::with(a, b, scoring)
        .with_mode(mode)
        .with_workers(workers)
        .align()
}
