//! Shared helpers: byte-offset to line/column mapping and pragma handling.

use ruff_text_size::TextSize;
use rustc_hash::FxHashSet;

/// A utility struct to convert byte offsets to line numbers.
///
/// The AST parser works with byte offsets, but findings are reported with
/// line numbers which are more human-readable.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new `LineIndex` by scanning the source code for newlines.
    /// Uses byte iteration since '\n' is always a single byte in UTF-8.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a `TextSize` (byte offset) to a 1-indexed line number.
    #[must_use]
    pub fn line_index(&self, offset: TextSize) -> usize {
        let offset = offset.to_usize();
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// Converts a `TextSize` to a 0-indexed byte column within its line.
    #[must_use]
    pub fn column_index(&self, offset: TextSize) -> usize {
        let offset = offset.to_usize();
        let line_start = match self.line_starts.binary_search(&offset) {
            Ok(line) => self.line_starts[line],
            Err(line) => self.line_starts[line - 1],
        };
        offset - line_start
    }
}

/// Detects lines with a `# pragma: no pyident` comment.
///
/// Returns a set of 1-indexed line numbers whose findings should be
/// suppressed, so users can silence an intentional identity comparison.
#[must_use]
pub fn get_ignored_lines(source: &str) -> FxHashSet<usize> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| line.contains("pragma: no pyident"))
        .map(|(i, _)| i + 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_and_column_mapping() {
        let source = "a = 1\nbb = 2\n";
        let index = LineIndex::new(source);
        assert_eq!(index.line_index(TextSize::new(0)), 1);
        assert_eq!(index.line_index(TextSize::new(6)), 2);
        assert_eq!(index.line_index(TextSize::new(11)), 2);
        assert_eq!(index.column_index(TextSize::new(0)), 0);
        assert_eq!(index.column_index(TextSize::new(11)), 5);
    }

    #[test]
    fn pragma_lines_are_collected() {
        let source = "x is 1\ny is 2  # pragma: no pyident\n";
        let ignored = get_ignored_lines(source);
        assert!(!ignored.contains(&1));
        assert!(ignored.contains(&2));
    }
}
