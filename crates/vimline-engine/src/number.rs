//! `Ctrl-A` / `Ctrl-X`: add to the number on the cursor line.
//!
//! The target is the first decimal number (optionally negative) on the
//! line that ends at or after the cursor column; if every number ends
//! before the cursor, the first number on the line is used instead.

use std::sync::LazyLock;

use regex::Regex;

/// `None` only if the pattern failed to compile, which disables the command.
static NUMBER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"-?\d+").ok());

/// A rewrite of one number within a line. Offsets are char columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberEdit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl NumberEdit {
    /// Column of the last char of the rewritten number.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.start + self.replacement.chars().count().saturating_sub(1)
    }
}

/// Find the number for a cursor at char column `col` of `line` and add
/// `delta`. `None` if the line has no number or the result overflows.
#[must_use]
pub fn adjust(line: &str, col: usize, delta: i64) -> Option<NumberEdit> {
    let number = NUMBER.as_ref()?;
    let to_col = |byte: usize| line[..byte].chars().count();
    let mut first = None;
    let mut chosen = None;
    for m in number.find_iter(line) {
        let span = (to_col(m.start()), to_col(m.end()), m.as_str());
        if first.is_none() {
            first = Some(span);
        }
        if span.1 > col {
            chosen = Some(span);
            break;
        }
    }
    let (start, end, digits) = chosen.or(first)?;
    let value: i64 = digits.parse().ok()?;
    let replacement = value.checked_add(delta)?.to_string();
    Some(NumberEdit {
        start,
        end,
        replacement,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(line: &str, col: usize, delta: i64) -> Option<(String, usize)> {
        let edit = adjust(line, col, delta)?;
        let chars: Vec<char> = line.chars().collect();
        let mut out: String = chars[..edit.start].iter().collect();
        out.push_str(&edit.replacement);
        out.extend(&chars[edit.end..]);
        Some((out, edit.cursor()))
    }

    #[test]
    fn increment_under_cursor() {
        assert_eq!(apply("x = 41;", 5, 1), Some(("x = 42;".into(), 5)));
    }

    #[test]
    fn increment_after_cursor() {
        assert_eq!(apply("x = 9;", 0, 1), Some(("x = 10;".into(), 5)));
    }

    #[test]
    fn decrement_through_zero() {
        assert_eq!(apply("n 0", 0, -1), Some(("n -1".into(), 3)));
        assert_eq!(apply("n -1", 2, 1), Some(("n 0".into(), 2)));
    }

    #[test]
    fn count_as_delta() {
        assert_eq!(apply("10", 0, 5), Some(("15".into(), 1)));
    }

    #[test]
    fn picks_number_ending_after_cursor() {
        assert_eq!(apply("1 22 333", 3, 1), Some(("1 23 333".into(), 3)));
        assert_eq!(apply("1 22 333", 4, 1), Some(("1 22 334".into(), 7)));
    }

    #[test]
    fn cursor_past_all_numbers_uses_first() {
        assert_eq!(apply("7 and more", 8, 1), Some(("8 and more".into(), 0)));
    }

    #[test]
    fn unicode_columns() {
        assert_eq!(apply("é 5", 0, 1), Some(("é 6".into(), 2)));
    }

    #[test]
    fn no_number() {
        assert_eq!(adjust("abc", 0, 1), None);
    }

    #[test]
    fn overflow_is_none() {
        assert_eq!(adjust("9223372036854775807", 0, 1), None);
    }
}
