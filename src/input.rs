use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::InputError;

/// Whether `source` names a FASTA file rather than a literal sequence.
pub fn is_fasta_path(source: &str) -> bool {
    source.contains(".fa") || source.contains(".fasta")
}

/// Resolve a command-line sequence argument.
///
/// Arguments that look like FASTA paths must exist; their sequence is every
/// non-header line concatenated. Anything else is the sequence itself.
pub fn load_sequence(source: &str) -> Result<Vec<u8>, InputError> {
    if !is_fasta_path(source) {
        return Ok(source.trim().as_bytes().to_vec());
    }
    let path = Path::new(source);
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }
    let io_err = |source: std::io::Error| InputError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(io_err)?);
    let mut sequence = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(io_err)?;
        if !line.contains('>') {
            sequence.extend_from_slice(line.trim().as_bytes());
        }
    }
    tracing::debug!(path = %path.display(), len = sequence.len(), "loaded FASTA sequence");
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("wavealign-input-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn literals_pass_through() {
        assert_eq!(load_sequence("GATTACA").unwrap(), b"GATTACA");
        assert_eq!(load_sequence("").unwrap(), b"");
    }

    #[test]
    fn fasta_lines_are_concatenated() {
        let path = scratch("two_lines.fasta", ">seq1 description\nGATT\nACA\r\n\n");
        let seq = load_sequence(path.to_str().unwrap()).unwrap();
        assert_eq!(seq, b"GATTACA");
    }

    #[test]
    fn every_header_line_is_skipped() {
        let path = scratch("multi.fa", ">a\nAC\n>b\nGT\n");
        assert_eq!(load_sequence(path.to_str().unwrap()).unwrap(), b"ACGT");
    }

    #[test]
    fn missing_fasta_is_an_error() {
        let err = load_sequence("/definitely/not/here.fasta").unwrap_err();
        assert!(matches!(err, InputError::NotFound(_)));
        assert!(err.to_string().contains("does not exist"));
    }
}
