//! Error rendering for the terminal.
//!
//! The driver contract is `[ErrorName] message` followed by the position
//! stack, innermost first. When the offending source is at hand we also
//! show the line itself with a caret under the failing column.

use bmath_core::error::EvalError;

use crate::{gray, red};

/// Print a diagnostic to stderr.
pub fn report(err: &EvalError, source: Option<&str>) {
    eprint!("{}", render(err, source, true));
}

/// Render a diagnostic; `color` off yields plain text (used by tests).
pub fn render(err: &EvalError, source: Option<&str>, color: bool) -> String {
    let paint_red = |s: &str| if color { red(s) } else { s.to_string() };
    let paint_gray = |s: &str| if color { gray(s) } else { s.to_string() };

    let mut out = String::new();
    out.push_str(&paint_red(&err.to_string()));
    out.push('\n');

    if let (Some(source), Some(position)) = (source, err.origin()) {
        if let Some(line_text) = source.lines().nth(position.line as usize - 1) {
            let line_label = position.line.to_string();
            out.push_str(&format!("  {} | {}\n", paint_gray(&line_label), line_text));
            let caret_offset = caret_column(line_text, position.column as usize);
            out.push_str(&format!(
                "  {} | {}{}\n",
                " ".repeat(line_label.len()),
                " ".repeat(caret_offset),
                paint_red("^")
            ));
        }
    }

    for position in &err.stack {
        out.push_str(&format!(
            "  at line {}, column {}\n",
            position.line, position.column
        ));
    }
    out
}

/// Character offset of the caret; columns are 1-based and count
/// characters, not bytes.
fn caret_column(line: &str, column: usize) -> usize {
    let width = line.chars().count();
    (column - 1).min(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmath_core::error::{ErrorKind, EvalError};
    use bmath_core::position::Position;

    #[test]
    fn test_render_has_header_snippet_and_stack() {
        let mut err = EvalError::at(
            ErrorKind::ZeroDivision,
            "division by zero",
            Position::new(1, 5),
        );
        err.push_position(Position::new(1, 1));
        let text = render(&err, Some("x = 1 / 0"), false);
        assert!(text.starts_with("[ZeroDivision] division by zero\n"));
        assert!(text.contains("  1 | x = 1 / 0\n"));
        assert!(text.contains("    |     ^\n"));
        assert!(text.contains("  at line 1, column 5\n"));
        assert!(text.contains("  at line 1, column 1\n"));
    }

    #[test]
    fn test_render_without_source_still_lists_positions() {
        let err = EvalError::at(
            ErrorKind::UndefinedVariable,
            "undefined variable 'x'",
            Position::new(3, 2),
        );
        let text = render(&err, None, false);
        assert!(text.contains("[UndefinedVariable]"));
        assert!(text.contains("at line 3, column 2"));
        assert!(!text.contains(" | "));
    }

    #[test]
    fn test_caret_survives_short_lines() {
        // A stale position past the end of the line must not panic.
        let err = EvalError::at(ErrorKind::UnexpectedToken, "boom", Position::new(1, 40));
        let text = render(&err, Some("ab"), false);
        assert!(text.contains("^"));
    }
}
