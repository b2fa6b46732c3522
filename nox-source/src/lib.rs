//! Source code representation and error reporting.

use console::style;
use std::fmt;

/// Represents source code.
#[derive(Debug, Clone, Copy)]
pub struct Source<'a> {
    /// Name used when reporting locations (usually a file path).
    pub name: &'a str,
    /// Original source code.
    pub content: &'a str,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `content`.
    pub fn new(content: &'a str) -> Self {
        Self {
            name: "<input>",
            content,
        }
    }

    /// Create a new `Source` that reports locations under `name`.
    pub fn with_name(name: &'a str, content: &'a str) -> Self {
        Self { name, content }
    }

    /// Converts a byte `offset` into a 1-based `(line, column)` pair.
    /// Offsets past the end of the content are clamped to the end.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.content.len());
        let before = self.content.get(..offset).unwrap_or(self.content);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let col = before[line_start..].chars().count() + 1;
        (line, col)
    }

    /// Returns the text of the 1-based `line`, without its line terminator.
    pub fn line_text(&self, line: usize) -> &'a str {
        self.content
            .lines()
            .nth(line.saturating_sub(1))
            .unwrap_or("")
    }

    /// Pairs `error` with this source so that it can be displayed with its location.
    pub fn report<'r, E: Diagnostic>(&'r self, error: &'r E) -> Report<'r, 'a, E> {
        Report {
            source: self,
            error,
        }
    }
}

/// An error that may point at a position in the source code.
pub trait Diagnostic: fmt::Display {
    /// Byte offset of the offending input, if the error has one.
    fn offset(&self) -> Option<usize> {
        None
    }
}

/// A [`Diagnostic`] rendered against the [`Source`] it came from.
pub struct Report<'r, 'a, E> {
    source: &'r Source<'a>,
    error: &'r E,
}

impl<'r, 'a, E: Diagnostic> fmt::Display for Report<'r, 'a, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {}",
            style("error").red().bold(),
            style(self.error).bold()
        )?;

        let offset = match self.error.offset() {
            Some(offset) => offset,
            None => return Ok(()),
        };
        let (line, col) = self.source.line_col(offset);
        let gutter = " ".repeat(line.to_string().len());

        writeln!(
            f,
            "{}{} {}:{}:{}",
            gutter,
            style("-->").blue().bold(),
            self.source.name,
            line,
            col
        )?;
        writeln!(f, "{} {}", gutter, style("|").blue().bold())?;
        writeln!(
            f,
            "{} {} {}",
            style(line).blue().bold(),
            style("|").blue().bold(),
            self.source.line_text(line)
        )?;
        writeln!(
            f,
            "{} {} {}{}",
            gutter,
            style("|").blue().bold(),
            " ".repeat(col - 1),
            style("^").red().bold()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AtOffset(usize);

    impl fmt::Display for AtOffset {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "bad thing")
        }
    }

    impl Diagnostic for AtOffset {
        fn offset(&self) -> Option<usize> {
            Some(self.0)
        }
    }

    #[test]
    fn line_col_first_line() {
        let source = Source::new("var x = 1;");
        assert_eq!(source.line_col(0), (1, 1));
        assert_eq!(source.line_col(4), (1, 5));
    }

    #[test]
    fn line_col_after_newlines() {
        let source = Source::new("var x = 1;\nvar y = 2;\n  z");
        assert_eq!(source.line_col(11), (2, 1));
        assert_eq!(source.line_col(24), (3, 3));
    }

    #[test]
    fn line_col_clamps_past_end() {
        let source = Source::new("ab\ncd");
        assert_eq!(source.line_col(100), (2, 3));
    }

    #[test]
    fn report_points_at_offset() {
        console::set_colors_enabled(false);
        let source = Source::with_name("main.nox", "var x = 1;\nvar y = $;");
        let report = source.report(&AtOffset(19)).to_string();
        assert_eq!(
            report,
            "error: bad thing\n --> main.nox:2:9\n  |\n2 | var y = $;\n  |         ^\n"
        );
    }
}
