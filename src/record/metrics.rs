//! Line-oriented metric extraction.
//!
//! Lines are split on `\n` only. The terminator is not part of the line and a
//! final `\n` does not start an extra empty line; a `\r` before the `\n` is
//! kept and counted. Content is handled as bytes, so files that are not
//! valid UTF-8 are still measured.

use std::io::{self, BufRead};

/// Counts extracted from a text file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextMetrics {
    /// Number of lines
    pub lines: usize,
    /// Spaces per line plus one, summed over all lines
    pub words: usize,
    /// Bytes per line excluding the terminator, summed over all lines
    pub characters: usize,
}

/// Counts extracted from a source file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgramMetrics {
    /// Number of lines
    pub lines: usize,
    /// Lines that look like class declarations
    pub classes: usize,
    /// Lines that look like method declarations
    pub methods: usize,
}

/// Calls `f` with every line of `reader`, terminator stripped.
///
/// # Errors
///
/// Returns the first read error; lines before it have already been passed
/// to `f`, so callers must discard partial results.
pub fn for_each_line<F>(reader: &mut dyn BufRead, mut f: F) -> io::Result<()>
where
    F: FnMut(&[u8]),
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = buf.strip_suffix(b"\n").unwrap_or(buf.as_slice());
        f(line);
    }
}

/// Computes line, word and character counts.
///
/// A line contributes `spaces + 1` words, so an empty line counts as one
/// word and runs of spaces count every space.
///
/// # Errors
///
/// Returns an error if reading fails.
pub fn analyze_text(reader: &mut dyn BufRead) -> io::Result<TextMetrics> {
    let mut metrics = TextMetrics::default();
    for_each_line(reader, |line| {
        metrics.lines += 1;
        metrics.words += line.iter().filter(|&&b| b == b' ').count() + 1;
        metrics.characters += line.len();
    })?;
    Ok(metrics)
}

/// Byte substring search
#[must_use]
pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn text(content: &str) -> TextMetrics {
        analyze_text(&mut Cursor::new(content.as_bytes())).unwrap()
    }

    #[test]
    fn test_text_metrics_reference_content() {
        assert_eq!(
            text("a b\n\nc\n"),
            TextMetrics {
                lines: 3,
                words: 4,
                characters: 4,
            }
        );
    }

    #[test]
    fn test_empty_file() {
        assert_eq!(text(""), TextMetrics::default());
    }

    #[test]
    fn test_last_line_without_newline() {
        let metrics = text("hello world\nbye");
        assert_eq!(metrics.lines, 2);
        assert_eq!(metrics.words, 3);
        assert_eq!(metrics.characters, 14);
    }

    #[test]
    fn test_consecutive_spaces_overcount_words() {
        let metrics = text("  a  b ");
        assert_eq!(metrics.lines, 1);
        assert_eq!(metrics.words, 6);
        assert_eq!(metrics.characters, 7);
    }

    #[test]
    fn test_carriage_return_is_part_of_line() {
        let metrics = text("ab\r\ncd\r\n");
        assert_eq!(metrics.lines, 2);
        assert_eq!(metrics.characters, 6);
    }

    #[test]
    fn test_non_utf8_content() {
        let bytes: &[u8] = &[0xff, 0xfe, b' ', 0x80, b'\n'];
        let metrics = analyze_text(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(metrics.lines, 1);
        assert_eq!(metrics.words, 2);
        assert_eq!(metrics.characters, 4);
    }

    #[test]
    fn test_contains() {
        assert!(contains(b"public class Foo", b"class "));
        assert!(!contains(b"classic", b"class "));
        assert!(contains(b"anything", b""));
        assert!(!contains(b"", b"("));
    }
}
