use std::path::Path;

/// Read a benchmark input: sequence 1 on the first line, sequence 2 on the second.
pub fn read_sequences(file: &str) -> (Vec<u8>, Vec<u8>) {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("benches").join(file);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("cannot read {}: {err}", path.display()));
    let mut lines = text.lines().map(|line| line.trim().as_bytes().to_vec());
    let seq1 = lines.next().unwrap_or_default();
    let seq2 = lines.next().unwrap_or_default();
    (seq1, seq2)
}
