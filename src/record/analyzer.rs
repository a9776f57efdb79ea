//! Source code analysis.
//!
//! Counting is done by a [`CodeAnalyzer`]. The default [`HeuristicAnalyzer`]
//! only looks for substrings, it does not parse anything. It overcounts
//! methods (every line with a `(` is one, including calls and control flow)
//! and misses classes declared without a following space.

use super::metrics::{ProgramMetrics, contains, for_each_line};
use std::fmt;
use std::io::{self, BufRead};

/// Extracts [`ProgramMetrics`] from source code.
pub trait CodeAnalyzer: fmt::Debug + Send + Sync {
    /// Analyzes the full content of `reader`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    fn analyze(&self, reader: &mut dyn BufRead) -> io::Result<ProgramMetrics>;
}

/// Line-based substring heuristic.
///
/// - a line containing `"class "` is a class
/// - a line containing `"void "` or `"("` is a method
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAnalyzer;

impl CodeAnalyzer for HeuristicAnalyzer {
    fn analyze(&self, reader: &mut dyn BufRead) -> io::Result<ProgramMetrics> {
        let mut metrics = ProgramMetrics::default();
        for_each_line(reader, |line| {
            metrics.lines += 1;
            if contains(line, b"class ") {
                metrics.classes += 1;
            }
            if contains(line, b"void ") || line.contains(&b'(') {
                metrics.methods += 1;
            }
        })?;
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn analyze(source: &str) -> ProgramMetrics {
        HeuristicAnalyzer
            .analyze(&mut Cursor::new(source.as_bytes()))
            .unwrap()
    }

    #[test]
    fn test_cpp_source() {
        let source = "\
#include <iostream>
class Shape {
public:
    virtual void draw() const = 0;
};
int main() {
    if (true) { return 0; }
}
";
        assert_eq!(
            analyze(source),
            ProgramMetrics {
                lines: 8,
                classes: 1,
                methods: 3,
            }
        );
    }

    #[test]
    fn test_void_without_parenthesis_counts_as_method() {
        let metrics = analyze("void \n");
        assert_eq!(metrics.methods, 1);
    }

    #[test]
    fn test_one_count_per_line() {
        let metrics = analyze("class A { void f() {} }; class B {};\n");
        assert_eq!(metrics.lines, 1);
        assert_eq!(metrics.classes, 1);
        assert_eq!(metrics.methods, 1);
    }

    #[test]
    fn test_class_needs_trailing_space() {
        let metrics = analyze("classify\nsubclass\tFoo\n");
        assert_eq!(metrics.classes, 0);
        assert_eq!(metrics.methods, 0);
    }
}
