//! Canonical text storage.
//!
//! [`Text`] wraps a [`ropey::Rope`] and exposes only what the motion and
//! operator code needs: char-indexed reads, one replace primitive, and
//! `\n`-delimited line lookups.
//!
//! # Offsets
//!
//! Every offset is a char index, never a byte index. Out-of-range offsets
//! are clamped to `len()` rather than panicking, so callers can compute
//! `pos + 1` at the buffer end without a bounds check first.
//!
//! # Lines
//!
//! Only `\n` separates lines. Rope's own line index also breaks on `\r`,
//! `\u{2028}` and friends, so line queries here scan for `\n` instead.
//! A line's *end* is the offset of its `\n` (or `len()` for the last line);
//! an empty line therefore has `line_start == line_end`.

use std::fmt;

use ropey::Rope;

/// The engine's copy of the buffer text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    rope: Rope,
}

impl Text {
    /// Create an empty text.
    #[must_use]
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Length in chars.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    /// True if the text has no chars.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The char at `pos`, or `None` past the end.
    #[inline]
    #[must_use]
    pub fn char_at(&self, pos: usize) -> Option<char> {
        (pos < self.len()).then(|| self.rope.char(pos))
    }

    /// The chars in `[start, end)`, clamped to the text.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.len());
        let start = start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// Replace `[start, end)` with `with`. Returns the clamped range that
    /// was actually replaced.
    pub fn replace(&mut self, start: usize, end: usize, with: &str) -> (usize, usize) {
        let end = end.min(self.len());
        let start = start.min(end);
        if start < end {
            self.rope.remove(start..end);
        }
        if !with.is_empty() {
            self.rope.insert(start, with);
        }
        (start, end)
    }

    /// Iterate chars forward from `pos`.
    pub fn chars_from(&self, pos: usize) -> impl Iterator<Item = char> + '_ {
        self.rope.chars_at(pos.min(self.len()))
    }

    /// Iterate chars backward from just before `pos`.
    pub fn chars_before(&self, pos: usize) -> impl Iterator<Item = char> + '_ {
        let mut chars = self.rope.chars_at(pos.min(self.len()));
        std::iter::from_fn(move || chars.prev())
    }

    // -----------------------------------------------------------------------
    // Lines
    // -----------------------------------------------------------------------

    /// Offset of the first char of the line containing `pos`.
    #[must_use]
    pub fn line_start(&self, pos: usize) -> usize {
        let pos = pos.min(self.len());
        pos - self.chars_before(pos).take_while(|&c| c != '\n').count()
    }

    /// Offset of the `\n` ending the line containing `pos`, or `len()`.
    #[must_use]
    pub fn line_end(&self, pos: usize) -> usize {
        let pos = pos.min(self.len());
        pos + self.chars_from(pos).take_while(|&c| c != '\n').count()
    }

    /// Start of the line after the one containing `pos`, if any.
    #[must_use]
    pub fn next_line_start(&self, pos: usize) -> Option<usize> {
        let end = self.line_end(pos);
        (end < self.len()).then_some(end + 1)
    }

    /// Start of the line before the one containing `pos`, if any.
    #[must_use]
    pub fn prev_line_start(&self, pos: usize) -> Option<usize> {
        let start = self.line_start(pos);
        (start > 0).then(|| self.line_start(start - 1))
    }

    /// True if the line containing `pos` has no chars.
    #[must_use]
    pub fn is_line_empty(&self, pos: usize) -> bool {
        self.line_start(pos) == self.line_end(pos)
    }

    /// 0-based index of the line containing `pos`.
    #[must_use]
    pub fn line_index(&self, pos: usize) -> usize {
        let pos = pos.min(self.len());
        self.chars_before(pos).filter(|&c| c == '\n').count()
    }

    /// Number of lines (an empty text has one empty line).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.chars_from(0).filter(|&c| c == '\n').count() + 1
    }

    /// Start offset of line `index`, or `None` past the last line.
    #[must_use]
    pub fn line_to_offset(&self, index: usize) -> Option<usize> {
        if index == 0 {
            return Some(0);
        }
        self.chars_from(0)
            .enumerate()
            .filter(|&(_, c)| c == '\n')
            .nth(index - 1)
            .map(|(i, _)| i + 1)
    }

    /// Column of `pos` within its line, in chars.
    #[must_use]
    pub fn column(&self, pos: usize) -> usize {
        pos.min(self.len()) - self.line_start(pos)
    }

    /// First non-blank char of the line containing `pos` (or the line end
    /// if the line is all blanks).
    #[must_use]
    pub fn first_non_blank(&self, pos: usize) -> usize {
        let start = self.line_start(pos);
        start
            + self
                .chars_from(start)
                .take_while(|&c| c == ' ' || c == '\t')
                .count()
    }

    /// Clamp `pos` so it rests on a char, the way Normal mode requires: on
    /// the last char of a non-empty line at most, at the start of an empty
    /// one.
    #[must_use]
    pub fn clamp_to_char(&self, pos: usize) -> usize {
        let pos = pos.min(self.len());
        let start = self.line_start(pos);
        let end = self.line_end(pos);
        if start == end { start } else { pos.min(end - 1) }
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
        }
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Text {
        Text::from(s)
    }

    // -- basics -----------------------------------------------------------

    #[test]
    fn len_and_chars() {
        let text = t("héllo");
        assert_eq!(text.len(), 5);
        assert_eq!(text.char_at(1), Some('é'));
        assert_eq!(text.char_at(5), None);
        assert!(Text::new().is_empty());
    }

    #[test]
    fn slice_clamps() {
        let text = t("abc");
        assert_eq!(text.slice(1, 10), "bc");
        assert_eq!(text.slice(5, 2), "");
    }

    #[test]
    fn replace_insert_delete() {
        let mut text = t("hello world");
        text.replace(5, 11, "");
        assert_eq!(text.to_string(), "hello");
        text.replace(0, 0, ">> ");
        assert_eq!(text.to_string(), ">> hello");
        assert_eq!(text.replace(3, 99, "bye"), (3, 8));
        assert_eq!(text.to_string(), ">> bye");
    }

    #[test]
    fn chars_before_walks_backward() {
        let text = t("abc");
        assert_eq!(text.chars_before(2).collect::<String>(), "ba");
    }

    // -- lines ------------------------------------------------------------

    #[test]
    fn line_bounds() {
        let text = t("one\ntwo\n\nfour");
        assert_eq!(text.line_start(5), 4);
        assert_eq!(text.line_end(5), 7);
        assert_eq!(text.line_start(8), 8);
        assert_eq!(text.line_end(8), 8);
        assert!(text.is_line_empty(8));
        assert_eq!(text.line_end(10), 13);
    }

    #[test]
    fn line_bounds_on_newline_char() {
        let text = t("ab\ncd");
        // The '\n' belongs to the line it ends.
        assert_eq!(text.line_start(2), 0);
        assert_eq!(text.line_end(2), 2);
    }

    #[test]
    fn carriage_return_is_not_a_line_break() {
        let text = t("a\rb\nc");
        assert_eq!(text.line_start(2), 0);
        assert_eq!(text.line_end(0), 3);
    }

    #[test]
    fn neighbour_lines() {
        let text = t("one\ntwo\nthree");
        assert_eq!(text.next_line_start(1), Some(4));
        assert_eq!(text.next_line_start(9), None);
        assert_eq!(text.prev_line_start(9), Some(4));
        assert_eq!(text.prev_line_start(1), None);
    }

    #[test]
    fn line_index_and_offset() {
        let text = t("one\ntwo\nthree");
        assert_eq!(text.line_index(0), 0);
        assert_eq!(text.line_index(9), 2);
        assert_eq!(text.line_count(), 3);
        assert_eq!(text.line_to_offset(2), Some(8));
        assert_eq!(text.line_to_offset(3), None);
        assert_eq!(text.column(10), 2);
    }

    #[test]
    fn first_non_blank() {
        let text = t("x\n  \tfoo");
        assert_eq!(text.first_non_blank(4), 5);
        assert_eq!(t("   ").first_non_blank(1), 3);
    }

    #[test]
    fn clamp_to_char() {
        let text = t("abc\n\nxy");
        assert_eq!(text.clamp_to_char(3), 2);
        assert_eq!(text.clamp_to_char(4), 4);
        assert_eq!(text.clamp_to_char(99), 6);
        assert_eq!(Text::new().clamp_to_char(0), 0);
    }

    #[test]
    fn clamp_on_trailing_empty_line() {
        let text = t("abc\n");
        assert_eq!(text.clamp_to_char(4), 4);
    }
}
