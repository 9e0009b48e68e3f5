//! Cursor motions over a [`Text`].
//!
//! Every function here is pure: `(text, offset, …) -> offset`. Stateful
//! parts of a motion (the desired column of a vertical run, the last `f`
//! target, the host's screen layout) are owned by the engine and passed
//! in. Word motions live in [`crate::word`].
//!
//! | Function | Vim key | Notes |
//! |----------|---------|-------|
//! | [`find_char`] | `f` `F` `t` `T` | current line only |
//! | [`line_start`], [`line_end`] | `0`, `$` | `$` lands on the last char |
//! | [`vertical`] | `j` `k` | keeps a desired column |
//! | [`paragraph_forward`], [`paragraph_backward`] | `}` `{` | blank-line boundaries |
//! | [`matching_bracket`] | `%` | first counterpart, no nesting |
//! | [`goto_line`] | `gg` `G` | first non-blank of the line |

use crate::text::Text;

// ---------------------------------------------------------------------------
// Character find
// ---------------------------------------------------------------------------

/// The four single-character find motions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindKind {
    /// `f`: forward, land on the char.
    Forward,
    /// `F`: backward, land on the char.
    Backward,
    /// `t`: forward, land just before the char.
    TillForward,
    /// `T`: backward, land just after the char.
    TillBackward,
}

impl FindKind {
    /// The same motion in the other direction (`,` repeats this way).
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
            Self::TillForward => Self::TillBackward,
            Self::TillBackward => Self::TillForward,
        }
    }

    /// True for `f` and `t`.
    #[inline]
    #[must_use]
    pub const fn is_forward(self) -> bool {
        matches!(self, Self::Forward | Self::TillForward)
    }

    /// True for `f` / `t`: an operator includes the landing char.
    #[inline]
    #[must_use]
    pub const fn is_inclusive(self) -> bool {
        self.is_forward()
    }
}

/// `f` / `F` / `t` / `T`: find `target` on the current line.
///
/// `f` looks from the char after the cursor; `t` from two chars after, so
/// that repeating `t` with `;` never gets stuck in front of the same match.
/// Backward finds look from the char before the cursor. Returns `pos`
/// unchanged when there is no match.
#[must_use]
pub fn find_char(text: &Text, pos: usize, kind: FindKind, target: char) -> usize {
    let start = text.line_start(pos);
    let end = text.line_end(pos);

    match kind {
        FindKind::Forward | FindKind::TillForward => {
            let from = pos + if kind == FindKind::Forward { 1 } else { 2 };
            let found = (from..end).find(|&i| text.char_at(i) == Some(target));
            match (found, kind) {
                (Some(i), FindKind::Forward) => i,
                (Some(i), _) => i - 1,
                (None, _) => pos,
            }
        }
        FindKind::Backward | FindKind::TillBackward => {
            if pos <= start {
                return pos;
            }
            let found = (start..pos).rev().find(|&i| text.char_at(i) == Some(target));
            match (found, kind) {
                (Some(i), FindKind::Backward) => i,
                (Some(i), _) => i + 1,
                (None, _) => pos,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Line motions
// ---------------------------------------------------------------------------

/// `0`: first char of the line.
#[inline]
#[must_use]
pub fn line_start(text: &Text, pos: usize) -> usize {
    text.line_start(pos)
}

/// `^` / `_`: first non-blank char of the line.
#[inline]
#[must_use]
pub fn first_non_blank(text: &Text, pos: usize) -> usize {
    text.first_non_blank(pos)
}

/// `$`: last char of the line (the line start if the line is empty).
#[must_use]
pub fn line_end(text: &Text, pos: usize) -> usize {
    let start = text.line_start(pos);
    let end = text.line_end(pos);
    if end > start { end - 1 } else { start }
}

/// `j` / `k`: move `delta` lines, landing on `column` or the line's last
/// position if it is shorter. Stops at the first / last line.
#[must_use]
pub fn vertical(text: &Text, pos: usize, delta: isize, column: usize) -> usize {
    let mut line = text.line_start(pos);
    for _ in 0..delta.unsigned_abs() {
        let next = if delta > 0 {
            text.next_line_start(line)
        } else {
            text.prev_line_start(line)
        };
        match next {
            Some(n) => line = n,
            None => break,
        }
    }
    let len = text.line_end(line) - line;
    line + column.min(len)
}

/// `gg` / `G`: first non-blank of 0-based line `index`, clamped to the
/// last line.
#[must_use]
pub fn goto_line(text: &Text, index: usize) -> usize {
    let last = text.line_count() - 1;
    let start = text.line_to_offset(index.min(last)).unwrap_or(0);
    text.first_non_blank(start)
}

// ---------------------------------------------------------------------------
// Paragraphs
// ---------------------------------------------------------------------------

/// True if `pos` is the start of an empty line.
fn is_blank_line(text: &Text, pos: usize) -> bool {
    text.line_start(pos) == pos && text.is_line_empty(pos)
}

/// `}`: the next empty line after the current paragraph, or the last char
/// of the buffer.
#[must_use]
pub fn paragraph_forward(text: &Text, pos: usize) -> usize {
    let mut line = text.line_start(pos);
    // Leave any run of blank lines we start in.
    while is_blank_line(text, line) {
        match text.next_line_start(line) {
            Some(n) => line = n,
            None => return line,
        }
    }
    while let Some(next) = text.next_line_start(line) {
        if is_blank_line(text, next) {
            return next;
        }
        line = next;
    }
    line_end(text, line)
}

/// `{`: the previous empty line before the current paragraph, or 0.
#[must_use]
pub fn paragraph_backward(text: &Text, pos: usize) -> usize {
    let mut line = text.line_start(pos);
    while is_blank_line(text, line) {
        match text.prev_line_start(line) {
            Some(p) => line = p,
            None => return 0,
        }
    }
    while let Some(prev) = text.prev_line_start(line) {
        if is_blank_line(text, prev) {
            return prev;
        }
        line = prev;
    }
    0
}

// ---------------------------------------------------------------------------
// Brackets
// ---------------------------------------------------------------------------

const BRACKET_PAIRS: [(char, char); 4] = [('(', ')'), ('[', ']'), ('{', '}'), ('<', '>')];

/// `%`: jump from a bracket to its counterpart.
///
/// Scans forward from an opener (backward from a closer) for the first
/// counterpart char. Nesting is not tracked: from the outer `(` of
/// `(a(b)c)` this lands on the inner `)`. Off a bracket, or with no
/// counterpart, the cursor stays.
#[must_use]
pub fn matching_bracket(text: &Text, pos: usize) -> usize {
    let Some(ch) = text.char_at(pos) else {
        return pos;
    };
    for (open, close) in BRACKET_PAIRS {
        if ch == open {
            return text
                .chars_from(pos + 1)
                .position(|c| c == close)
                .map_or(pos, |i| pos + 1 + i);
        }
        if ch == close {
            return text
                .chars_before(pos)
                .position(|c| c == open)
                .map_or(pos, |i| pos - 1 - i);
        }
    }
    pos
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Text {
        Text::from(s)
    }

    // -- find -------------------------------------------------------------

    #[test]
    fn f_lands_on_char() {
        let text = t("a,b,c");
        assert_eq!(find_char(&text, 0, FindKind::Forward, ','), 1);
        assert_eq!(find_char(&text, 1, FindKind::Forward, ','), 3);
    }

    #[test]
    fn t_lands_before_char() {
        let text = t("abc,d");
        assert_eq!(find_char(&text, 0, FindKind::TillForward, ','), 2);
    }

    #[test]
    fn t_skips_adjacent_match() {
        let text = t("a,b,c");
        // Repeating `t,` from just before the first comma reaches the second.
        assert_eq!(find_char(&text, 0, FindKind::TillForward, ','), 2);
    }

    #[test]
    fn backward_finds() {
        let text = t("a,b,c");
        assert_eq!(find_char(&text, 4, FindKind::Backward, ','), 3);
        assert_eq!(find_char(&text, 4, FindKind::TillBackward, ','), 4);
        assert_eq!(find_char(&text, 2, FindKind::TillBackward, 'a'), 1);
    }

    #[test]
    fn find_missing_stays() {
        let text = t("abc");
        assert_eq!(find_char(&text, 1, FindKind::Forward, 'z'), 1);
        assert_eq!(find_char(&text, 0, FindKind::Backward, 'a'), 0);
    }

    #[test]
    fn find_stays_on_line() {
        let text = t("ab\nxb");
        assert_eq!(find_char(&text, 1, FindKind::Forward, 'x'), 1);
        assert_eq!(find_char(&text, 3, FindKind::Backward, 'a'), 3);
    }

    #[test]
    fn find_kind_opposite() {
        assert_eq!(FindKind::Forward.opposite(), FindKind::Backward);
        assert_eq!(FindKind::TillBackward.opposite(), FindKind::TillForward);
        assert!(FindKind::TillForward.is_inclusive());
        assert!(!FindKind::Backward.is_inclusive());
    }

    // -- lines ------------------------------------------------------------

    #[test]
    fn line_end_lands_on_last_char() {
        let text = t("abc\n\nxy");
        assert_eq!(line_end(&text, 0), 2);
        assert_eq!(line_end(&text, 4), 4);
        assert_eq!(line_end(&text, 5), 6);
    }

    #[test]
    fn line_start_and_non_blank() {
        let text = t("x\n  foo");
        assert_eq!(line_start(&text, 5), 2);
        assert_eq!(first_non_blank(&text, 6), 4);
    }

    #[test]
    fn vertical_keeps_column() {
        let text = t("hello\nhi\nworld");
        assert_eq!(vertical(&text, 4, 1, 4), 8);
        assert_eq!(vertical(&text, 8, 1, 4), 13);
        assert_eq!(vertical(&text, 13, -2, 4), 4);
    }

    #[test]
    fn vertical_stops_at_edges() {
        let text = t("ab\ncd");
        assert_eq!(vertical(&text, 1, -1, 1), 1);
        assert_eq!(vertical(&text, 4, 5, 1), 4);
    }

    #[test]
    fn goto_line_clamps() {
        let text = t("one\n  two\nthree");
        assert_eq!(goto_line(&text, 0), 0);
        assert_eq!(goto_line(&text, 1), 6);
        assert_eq!(goto_line(&text, 99), 10);
    }

    // -- paragraphs -------------------------------------------------------

    #[test]
    fn paragraph_forward_to_blank_line() {
        let text = t("a\nb\n\nc\nd");
        assert_eq!(paragraph_forward(&text, 0), 4);
        assert_eq!(paragraph_forward(&text, 4), 7);
    }

    #[test]
    fn paragraph_backward_to_blank_line() {
        let text = t("a\nb\n\nc\nd");
        assert_eq!(paragraph_backward(&text, 7), 4);
        assert_eq!(paragraph_backward(&text, 4), 0);
    }

    #[test]
    fn paragraph_skips_blank_runs() {
        let text = t("a\n\n\nb\n\nc");
        assert_eq!(paragraph_forward(&text, 2), 6);
    }

    // -- brackets ---------------------------------------------------------

    #[test]
    fn matching_simple() {
        let text = t("f(x)");
        assert_eq!(matching_bracket(&text, 1), 3);
        assert_eq!(matching_bracket(&text, 3), 1);
    }

    #[test]
    fn matching_nested_takes_first_counterpart() {
        // Known limitation: nesting depth is not tracked.
        let text = t("(a(b)c)");
        assert_eq!(matching_bracket(&text, 0), 4);
        assert_eq!(matching_bracket(&text, 6), 2);
    }

    #[test]
    fn matching_off_bracket_stays() {
        let text = t("a[b]");
        assert_eq!(matching_bracket(&text, 0), 0);
        assert_eq!(matching_bracket(&t("(abc"), 0), 0);
    }
}
