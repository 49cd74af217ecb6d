//! Byte-offset to line/column conversion for diagnostics.

/// Precomputed table of line start offsets for one source text.
///
/// Lines and columns are 0-based here; diagnostic emission converts the
/// line to 1-based at the reporting boundary.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Returns the 0-based (line, column) of a byte offset.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next_line) => next_line - 1,
        };
        (line, offset - self.line_starts[line])
    }

    /// Returns the byte offset of a 0-based (line, column) position.
    ///
    /// Positions past the last line start clamp to the final line.
    pub fn offset(&self, line: usize, col: usize) -> usize {
        let line = line.min(self.line_starts.len() - 1);
        self.line_starts[line] + col
    }
}
