use std::fmt;

use crate::Alignment;

pub const DEFAULT_WIDTH: usize = 50;

/// One wrapped slice of an alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub top: &'a [u8],
    pub markers: &'a [u8],
    pub bottom: &'a [u8],
}

/// Split an alignment into chunks of at most `width` columns.
pub fn chunks(aln: &Alignment, width: usize) -> impl Iterator<Item = Chunk<'_>> {
    let width = width.max(1);
    aln.top
        .chunks(width)
        .zip(aln.markers.chunks(width))
        .zip(aln.bottom.chunks(width))
        .map(|((top, markers), bottom)| Chunk {
            top,
            markers,
            bottom,
        })
}

fn spaced(symbols: &[u8]) -> String {
    let mut line = String::with_capacity(symbols.len() * 2);
    for (n, &symbol) in symbols.iter().enumerate() {
        if n > 0 {
            line.push(' ');
        }
        line.push(symbol as char);
    }
    line
}

/// The score line followed by the alignment, `width` columns per block,
/// blocks separated by a blank line.
#[derive(Clone, Copy, Debug)]
pub struct Report<'a> {
    aln: &'a Alignment,
    width: usize,
}

impl<'a> Report<'a> {
    pub fn new(aln: &'a Alignment, width: usize) -> Self {
        Report { aln, width }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "The Total Score is {}", self.aln.score)?;
        for (n, chunk) in chunks(self.aln, self.width).enumerate() {
            if n > 0 {
                writeln!(f)?;
            }
            writeln!(f, "s1: {}", spaced(chunk.top))?;
            writeln!(f, "    {}", spaced(chunk.markers))?;
            writeln!(f, "s2: {}", spaced(chunk.bottom))?;
        }
        Ok(())
    }
}

pub fn render(aln: &Alignment, width: usize) -> String {
    Report::new(aln, width).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Alignment {
        Alignment {
            score: 6,
            top: b"G-ATTACA".to_vec(),
            markers: b"| ||: |:".to_vec(),
            bottom: b"GCATG-CU".to_vec(),
            top_range: 0..7,
            bottom_range: 0..7,
        }
    }

    #[test]
    fn renders_a_single_block() {
        assert_eq!(
            render(&sample(), DEFAULT_WIDTH),
            "The Total Score is 6\n\
             s1: G - A T T A C A\n    \
             |   | | :   | :\n\
             s2: G C A T G - C U\n"
        );
    }

    #[test]
    fn wraps_at_width() {
        let aln = sample();
        let blocks: Vec<_> = chunks(&aln, 3).collect();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[2].top, b"CA");
        assert_eq!(blocks[2].bottom, b"CU");

        let text = render(&aln, 5);
        assert_eq!(text.lines().count(), 1 + 3 + 1 + 3);
        assert!(text.contains("s2: G C A T G\n\ns1: A C A\n"));
    }

    #[test]
    fn report_streams_into_any_writer() {
        use std::fmt::Write;

        let aln = sample();
        let mut out = String::new();
        write!(out, "{}", Report::new(&aln, 4)).unwrap();
        assert_eq!(out, render(&aln, 4));
        assert!(out.starts_with("The Total Score is 6\ns1: G - A T\n"));
    }

    #[test]
    fn empty_alignment_renders_only_the_score() {
        let aln = Alignment::default();
        assert_eq!(render(&aln, 10), "The Total Score is 0\n");
    }
}
