use std::{fmt, path::Path, str::FromStr};

use crate::error::ScoringError;

const PAM250: &str = include_str!("../scoring_matrices/PAM250.txt");
const PAM30: &str = include_str!("../scoring_matrices/PAM30.txt");
const BLOSUM62: &str = include_str!("../scoring_matrices/BLOSUM62.txt");
const BLOSUM45: &str = include_str!("../scoring_matrices/BLOSUM45.txt");
const BLOSUM80: &str = include_str!("../scoring_matrices/BLOSUM80.txt");

/// Substitution tables shipped with the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinMatrix {
    Pam250,
    Pam30,
    Blosum62,
    Blosum45,
    Blosum80,
}

impl BuiltinMatrix {
    pub const ALL: [BuiltinMatrix; 5] = [
        BuiltinMatrix::Pam250,
        BuiltinMatrix::Pam30,
        BuiltinMatrix::Blosum62,
        BuiltinMatrix::Blosum45,
        BuiltinMatrix::Blosum80,
    ];

    fn source(self) -> &'static str {
        match self {
            BuiltinMatrix::Pam250 => PAM250,
            BuiltinMatrix::Pam30 => PAM30,
            BuiltinMatrix::Blosum62 => BLOSUM62,
            BuiltinMatrix::Blosum45 => BLOSUM45,
            BuiltinMatrix::Blosum80 => BLOSUM80,
        }
    }
}

impl fmt::Display for BuiltinMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BuiltinMatrix::Pam250 => f.write_str("PAM250"),
            BuiltinMatrix::Pam30 => f.write_str("PAM30"),
            BuiltinMatrix::Blosum62 => f.write_str("BLOSUM62"),
            BuiltinMatrix::Blosum45 => f.write_str("BLOSUM45"),
            BuiltinMatrix::Blosum80 => f.write_str("BLOSUM80"),
        }
    }
}

impl FromStr for BuiltinMatrix {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PAM250" => Ok(BuiltinMatrix::Pam250),
            "PAM30" => Ok(BuiltinMatrix::Pam30),
            "BLOSUM62" => Ok(BuiltinMatrix::Blosum62),
            "BLOSUM45" => Ok(BuiltinMatrix::Blosum45),
            "BLOSUM80" => Ok(BuiltinMatrix::Blosum80),
            _ => Err(ScoringError::UnknownMatrix(s.to_string())),
        }
    }
}

/// A square table of pairwise symbol scores.
///
/// Symbol lookup is ASCII case-insensitive unless the table lists both cases.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubstitutionMatrix {
    symbols: Vec<u8>,
    index: [Option<u8>; 256],
    scores: Vec<i32>,
}

impl SubstitutionMatrix {
    pub fn builtin(matrix: BuiltinMatrix) -> Result<Self, ScoringError> {
        Self::parse(matrix.source())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScoringError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScoringError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse a whitespace separated table: a header line of symbols, then
    /// one row of integers per symbol, each row optionally led by its symbol.
    pub fn parse(text: &str) -> Result<Self, ScoringError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(n, line)| (n + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let (header_line, header) = lines.next().ok_or(ScoringError::MissingHeader)?;
        let mut symbols = Vec::new();
        for token in header.split_whitespace() {
            match token.as_bytes() {
                [symbol] => symbols.push(*symbol),
                _ => {
                    return Err(ScoringError::Malformed {
                        line: header_line,
                        reason: format!("header entry '{token}' is not a single symbol"),
                    })
                }
            }
        }
        if symbols.len() > u8::MAX as usize {
            return Err(ScoringError::Malformed {
                line: header_line,
                reason: format!("{} symbols exceed the table limit", symbols.len()),
            });
        }

        let n = symbols.len();
        let mut scores = Vec::with_capacity(n * n);
        let mut rows = 0;
        for (line, row) in lines {
            if rows == n {
                return Err(ScoringError::Malformed {
                    line,
                    reason: format!("more than {n} rows"),
                });
            }
            let mut tokens: Vec<&str> = row.split_whitespace().collect();
            if tokens.len() == n + 1 {
                let label = tokens.remove(0);
                if label.as_bytes() != [symbols[rows]] {
                    return Err(ScoringError::Malformed {
                        line,
                        reason: format!(
                            "row label '{label}' does not match header symbol '{}'",
                            symbols[rows] as char
                        ),
                    });
                }
            }
            if tokens.len() != n {
                return Err(ScoringError::Malformed {
                    line,
                    reason: format!("expected {n} scores, found {}", tokens.len()),
                });
            }
            for token in tokens {
                let score = token.parse::<i32>().map_err(|_| ScoringError::Malformed {
                    line,
                    reason: format!("'{token}' is not an integer"),
                })?;
                scores.push(score);
            }
            rows += 1;
        }
        if rows != n {
            return Err(ScoringError::Malformed {
                line: header_line,
                reason: format!("header lists {n} symbols but the table has {rows} rows"),
            });
        }

        let mut index = [None; 256];
        for (slot, &symbol) in symbols.iter().enumerate() {
            index[symbol as usize] = Some(slot as u8);
        }
        for (slot, &symbol) in symbols.iter().enumerate() {
            for alias in [symbol.to_ascii_lowercase(), symbol.to_ascii_uppercase()] {
                index[alias as usize].get_or_insert(slot as u8);
            }
        }

        Ok(SubstitutionMatrix {
            symbols,
            index,
            scores,
        })
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn contains(&self, symbol: u8) -> bool {
        self.index[symbol as usize].is_some()
    }

    pub fn get(&self, a: u8, b: u8) -> Option<i32> {
        let row = self.index[a as usize]? as usize;
        let col = self.index[b as usize]? as usize;
        Some(self.scores[row * self.symbols.len() + col])
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.symbols.len();
        (0..n).all(|i| (0..i).all(|j| self.scores[i * n + j] == self.scores[j * n + i]))
    }
}

/// How a pair of aligned symbols is scored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scheme {
    Constants { matched: i32, mismatched: i32 },
    Matrix(SubstitutionMatrix),
}

/// Everything the recurrence needs to score a cell. Read-only once built and
/// shared by every worker of an alignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoringContext {
    scheme: Scheme,
    gap: i32,
}

impl ScoringContext {
    pub fn constants(matched: i32, mismatched: i32, gap: i32) -> Self {
        ScoringContext {
            scheme: Scheme::Constants {
                matched,
                mismatched,
            },
            gap,
        }
    }

    pub fn matrix(matrix: SubstitutionMatrix, gap: i32) -> Self {
        ScoringContext {
            scheme: Scheme::Matrix(matrix),
            gap,
        }
    }

    pub fn gap(&self) -> i32 {
        self.gap
    }

    /// Score of aligning `a` (from the first sequence) against `b`.
    ///
    /// Panics if a substitution table does not know either symbol; callers
    /// check sequences with [`ScoringContext::validate`] first.
    pub fn substitution(&self, a: u8, b: u8) -> i32 {
        match &self.scheme {
            Scheme::Constants {
                matched,
                mismatched,
            } => {
                if a == b {
                    *matched
                } else {
                    *mismatched
                }
            }
            Scheme::Matrix(matrix) => match matrix.get(a, b) {
                Some(score) => score,
                None => panic!(
                    "pair ({}, {}) missing from a validated scoring table",
                    a as char, b as char
                ),
            },
        }
    }

    /// Check that every symbol of `sequence` can be scored.
    pub fn validate(&self, sequence: &[u8], name: &'static str) -> Result<(), ScoringError> {
        let Scheme::Matrix(matrix) = &self.scheme else {
            return Ok(());
        };
        match sequence.iter().position(|&symbol| !matrix.contains(symbol)) {
            Some(position) => Err(ScoringError::UnknownSymbol {
                symbol: sequence[position] as char,
                position,
                sequence: name,
            }),
            None => Ok(()),
        }
    }

    pub fn is_symmetric(&self) -> bool {
        match &self.scheme {
            Scheme::Constants { .. } => true,
            Scheme::Matrix(matrix) => matrix.is_symmetric(),
        }
    }
}
