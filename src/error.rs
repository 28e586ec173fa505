use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or running an alignment.
#[derive(Debug, Error)]
pub enum AlignError {
    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("queue chunk size must be at least 1")]
    EmptyQueueChunk,

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("alignment cancelled after {completed} of {total} waves")]
    Cancelled { completed: usize, total: usize },

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Errors raised while building a scoring context.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("could not read scoring table {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed scoring table at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("scoring table has no header line")]
    MissingHeader,

    #[error("unknown scoring matrix '{0}' (expected PAM250, PAM30, BLOSUM62, BLOSUM45 or BLOSUM80)")]
    UnknownMatrix(String),

    #[error("symbol '{symbol}' at position {position} of {sequence} is not in the scoring table")]
    UnknownSymbol {
        symbol: char,
        position: usize,
        sequence: &'static str,
    },
}

/// Errors raised while resolving a sequence source.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("FASTA file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("could not read FASTA file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A value that could not be parsed from a command-line style string.
#[derive(Debug, Error)]
#[error("unsupported {kind} '{value}' (expected one of: {expected})")]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}
