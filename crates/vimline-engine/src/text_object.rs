//! Text objects: Vim-style text selection by structure.
//!
//! Combined with an operator (`d`, `c`, `y`) or visual mode, a text object
//! names a span by what surrounds the cursor rather than by a motion:
//!
//! ```text
//! operator + scope + kind = action
//! d        + i     + w    = delete inner word
//! c        + i     + (    = change inside parentheses
//! y        + a     + "    = yank around quotes
//! ```
//!
//! [`resolve`] returns the half-open `[start, end)` span, or `None` when
//! the delimiters can't be found. The caller treats `None` as a silent
//! no-op.
//!
//! | Keys | Kind |
//! |------|------|
//! | `w` / `W` | word / WORD |
//! | `(` `)` `b` | parentheses |
//! | `[` `]` | square brackets |
//! | `{` `}` `B` | curly braces |
//! | `<` `>` | angle brackets |
//! | `'` `"` `` ` `` | quotes |

use std::ops::Range;

use crate::text::Text;
use crate::word::{CharClass, classify, classify_big};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// `i` or `a`: whether the delimiters (or trailing blanks) are included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Inside,
    Around,
}

/// What delimits the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Word,
    BigWord,
    Parens,
    Brackets,
    Braces,
    Angles,
    SingleQuote,
    DoubleQuote,
    Backtick,
}

impl ObjectKind {
    /// The object named by the key typed after `i` / `a`.
    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        Some(match ch {
            'w' => Self::Word,
            'W' => Self::BigWord,
            '(' | ')' | 'b' => Self::Parens,
            '[' | ']' => Self::Brackets,
            '{' | '}' | 'B' => Self::Braces,
            '<' | '>' => Self::Angles,
            '\'' => Self::SingleQuote,
            '"' => Self::DoubleQuote,
            '`' => Self::Backtick,
            _ => return None,
        })
    }

    const fn delimiters(self) -> Option<(char, char)> {
        match self {
            Self::Word | Self::BigWord => None,
            Self::Parens => Some(('(', ')')),
            Self::Brackets => Some(('[', ']')),
            Self::Braces => Some(('{', '}')),
            Self::Angles => Some(('<', '>')),
            Self::SingleQuote => Some(('\'', '\'')),
            Self::DoubleQuote => Some(('"', '"')),
            Self::Backtick => Some(('`', '`')),
        }
    }
}

/// Resolve a text object around `pos`.
#[must_use]
pub fn resolve(text: &Text, pos: usize, scope: Scope, kind: ObjectKind) -> Option<Range<usize>> {
    let (begin, end) = match kind.delimiters() {
        None => {
            let class = if kind == ObjectKind::BigWord {
                classify_big
            } else {
                classify
            };
            return word(text, pos, scope, class);
        }
        Some((open, close)) if open == close => quote_pair(text, pos, open)?,
        Some((open, close)) => bracket_pair(text, pos, open, close)?,
    };

    Some(match scope {
        Scope::Inside => begin + 1..end,
        Scope::Around => begin..end + 1,
    })
}

// ---------------------------------------------------------------------------
// Words
// ---------------------------------------------------------------------------

/// The run of same-class chars under the cursor. `Around` adds trailing
/// blanks, or leading blanks when nothing trails. Blanks never cross a line.
fn word(
    text: &Text,
    pos: usize,
    scope: Scope,
    class_fn: fn(char) -> CharClass,
) -> Option<Range<usize>> {
    let ch = text.char_at(pos)?;
    if ch == '\n' {
        return None;
    }
    let class = class_fn(ch);
    let same = |c: char| c != '\n' && class_fn(c) == class;
    let is_blank = |c: char| c == ' ' || c == '\t';

    let mut start = pos;
    while start > 0 && text.char_at(start - 1).is_some_and(same) {
        start -= 1;
    }
    let mut end = pos + 1;
    while text.char_at(end).is_some_and(same) {
        end += 1;
    }

    if scope == Scope::Around && class != CharClass::Blank {
        let trailing = text.chars_from(end).take_while(|&c| is_blank(c)).count();
        if trailing > 0 {
            end += trailing;
        } else {
            start -= text.chars_before(start).take_while(|&c| is_blank(c)).count();
        }
    }
    Some(start..end)
}

// ---------------------------------------------------------------------------
// Delimited pairs
// ---------------------------------------------------------------------------

/// Nearest unmatched `open` before the cursor and unmatched `close` after
/// it. On an opener the pair starts there; on a closer it ends there.
fn bracket_pair(text: &Text, pos: usize, open: char, close: char) -> Option<(usize, usize)> {
    let here = text.char_at(pos)?;
    let begin = if here == open {
        pos
    } else {
        find_opening(text, pos, open, close)?
    };
    let end = if here == close {
        pos
    } else {
        find_closing(text, begin, open, close)?
    };
    (begin < end).then_some((begin, end))
}

/// Search backward from `start` (exclusive) for an unmatched opener.
fn find_opening(text: &Text, start: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in text.chars_before(start).enumerate() {
        if ch == close {
            depth += 1;
        } else if ch == open {
            if depth == 0 {
                return Some(start - 1 - i);
            }
            depth -= 1;
        }
    }
    None
}

/// Search forward from `start` (exclusive) for the matching closer.
fn find_closing(text: &Text, start: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in text.chars_from(start + 1).enumerate() {
        if ch == open {
            depth += 1;
        } else if ch == close {
            if depth == 0 {
                return Some(start + 1 + i);
            }
            depth -= 1;
        }
    }
    None
}

/// Quotes don't nest: the first quote to the left is the opener and the
/// first at or after the cursor is the closer. A cursor on an opening
/// quote (nothing to its left) pairs with the next quote to the right.
fn quote_pair(text: &Text, pos: usize, quote: char) -> Option<(usize, usize)> {
    text.char_at(pos)?;
    let left = text
        .chars_before(pos)
        .position(|c| c == quote)
        .map(|i| pos - 1 - i);
    match left {
        Some(begin) => {
            let end = pos + text.chars_from(pos).position(|c| c == quote)?;
            Some((begin, end))
        }
        None if text.char_at(pos) == Some(quote) => {
            let end = pos + 1 + text.chars_from(pos + 1).position(|c| c == quote)?;
            Some((pos, end))
        }
        None => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(s: &str, pos: usize, scope: Scope, kind: ObjectKind) -> Option<String> {
        let text = Text::from(s);
        resolve(&text, pos, scope, kind).map(|r| text.slice(r.start, r.end))
    }

    // -- keys -------------------------------------------------------------

    #[test]
    fn kind_from_char() {
        assert_eq!(ObjectKind::from_char('('), Some(ObjectKind::Parens));
        assert_eq!(ObjectKind::from_char('b'), Some(ObjectKind::Parens));
        assert_eq!(ObjectKind::from_char('B'), Some(ObjectKind::Braces));
        assert_eq!(ObjectKind::from_char('`'), Some(ObjectKind::Backtick));
        assert_eq!(ObjectKind::from_char('x'), None);
    }

    // -- words ------------------------------------------------------------

    #[test]
    fn inner_word() {
        assert_eq!(
            obj("foo bar baz", 5, Scope::Inside, ObjectKind::Word).as_deref(),
            Some("bar")
        );
    }

    #[test]
    fn around_word_takes_trailing_blanks() {
        assert_eq!(
            obj("foo bar  baz", 5, Scope::Around, ObjectKind::Word).as_deref(),
            Some("bar  ")
        );
    }

    #[test]
    fn around_word_at_end_takes_leading_blanks() {
        assert_eq!(
            obj("foo bar", 5, Scope::Around, ObjectKind::Word).as_deref(),
            Some(" bar")
        );
    }

    #[test]
    fn word_stops_at_punctuation() {
        assert_eq!(
            obj("a.foo_1.b", 3, Scope::Inside, ObjectKind::Word).as_deref(),
            Some("foo_1")
        );
        assert_eq!(
            obj("a.foo_1.b", 3, Scope::Inside, ObjectKind::BigWord).as_deref(),
            Some("a.foo_1.b")
        );
    }

    #[test]
    fn inner_word_on_blanks_selects_blanks() {
        assert_eq!(
            obj("a   b", 2, Scope::Inside, ObjectKind::Word).as_deref(),
            Some("   ")
        );
    }

    #[test]
    fn word_does_not_cross_lines() {
        assert_eq!(
            obj("foo\nbar", 5, Scope::Around, ObjectKind::Word).as_deref(),
            Some("bar")
        );
        assert_eq!(obj("foo\nbar", 3, Scope::Inside, ObjectKind::Word), None);
    }

    // -- brackets ---------------------------------------------------------

    #[test]
    fn inner_parens() {
        assert_eq!(
            obj("call(x, y)", 6, Scope::Inside, ObjectKind::Parens).as_deref(),
            Some("x, y")
        );
    }

    #[test]
    fn around_parens() {
        assert_eq!(
            obj("call(x, y)", 6, Scope::Around, ObjectKind::Parens).as_deref(),
            Some("(x, y)")
        );
    }

    #[test]
    fn nested_brackets_pick_enclosing_pair() {
        assert_eq!(
            obj("f(a, g(b), c)", 11, Scope::Inside, ObjectKind::Parens).as_deref(),
            Some("a, g(b), c")
        );
        assert_eq!(
            obj("f(a, g(b), c)", 7, Scope::Inside, ObjectKind::Parens).as_deref(),
            Some("b")
        );
    }

    #[test]
    fn cursor_on_delimiters() {
        assert_eq!(
            obj("[abc]", 0, Scope::Inside, ObjectKind::Brackets).as_deref(),
            Some("abc")
        );
        assert_eq!(
            obj("[abc]", 4, Scope::Inside, ObjectKind::Brackets).as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn empty_pair() {
        assert_eq!(
            obj("f()", 1, Scope::Inside, ObjectKind::Parens).as_deref(),
            Some("")
        );
    }

    #[test]
    fn braces_span_lines() {
        assert_eq!(
            obj("{\n  x\n}", 4, Scope::Inside, ObjectKind::Braces).as_deref(),
            Some("\n  x\n")
        );
    }

    #[test]
    fn unmatched_bracket_is_none() {
        assert_eq!(obj("(abc", 2, Scope::Inside, ObjectKind::Parens), None);
        assert_eq!(obj("abc)", 1, Scope::Inside, ObjectKind::Parens), None);
        assert_eq!(obj("", 0, Scope::Inside, ObjectKind::Parens), None);
    }

    // -- quotes -----------------------------------------------------------

    #[test]
    fn inner_quotes() {
        assert_eq!(
            obj("say \"hi there\" ok", 7, Scope::Inside, ObjectKind::DoubleQuote).as_deref(),
            Some("hi there")
        );
    }

    #[test]
    fn around_quotes() {
        assert_eq!(
            obj("x = 'a b';", 6, Scope::Around, ObjectKind::SingleQuote).as_deref(),
            Some("'a b'")
        );
    }

    #[test]
    fn cursor_on_closing_quote() {
        assert_eq!(
            obj("`cmd`", 4, Scope::Inside, ObjectKind::Backtick).as_deref(),
            Some("cmd")
        );
    }

    #[test]
    fn cursor_on_opening_quote() {
        assert_eq!(
            obj("\"abc\" x", 0, Scope::Inside, ObjectKind::DoubleQuote).as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn missing_quote_is_none() {
        assert_eq!(obj("say \"hi", 6, Scope::Inside, ObjectKind::DoubleQuote), None);
    }
}
