//! Search: literal substring search with wraparound.
//!
//! `/` and `?` store a [`SearchState`]; `n` / `N` repeat it in the same or
//! the opposite direction. `*` / `#` search for the word under the cursor.
//!
//! # Matching
//!
//! [`find_all`] collects every non-overlapping match start once per query
//! (case folded per char when `ignore_case` is set, so offsets stay char
//! indices). [`nearest`] then picks the first match strictly after (or
//! strictly before) the cursor, wrapping to the other end of the list when
//! nothing qualifies.

use crate::text::Text;
use crate::text_object::{self, ObjectKind, Scope};
use crate::word::{CharClass, classify};

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Search direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SearchDirection {
    Forward,
    Backward,
}

impl SearchDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// The last confirmed search, replayed by `n` / `N`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub direction: SearchDirection,
}

impl SearchState {
    /// Direction for a repeat: `n` keeps it, `N` flips it.
    #[must_use]
    pub const fn effective_direction(&self, reverse: bool) -> SearchDirection {
        if reverse {
            self.direction.opposite()
        } else {
            self.direction
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

fn fold(ch: char, ignore_case: bool) -> char {
    if ignore_case {
        ch.to_lowercase().next().unwrap_or(ch)
    } else {
        ch
    }
}

/// Start offsets of every non-overlapping occurrence of `query`.
#[must_use]
pub fn find_all(text: &Text, query: &str, ignore_case: bool) -> Vec<usize> {
    let needle: Vec<char> = query.chars().map(|c| fold(c, ignore_case)).collect();
    if needle.is_empty() {
        return Vec::new();
    }
    let hay: Vec<char> = text.chars_from(0).map(|c| fold(c, ignore_case)).collect();

    let mut matches = Vec::new();
    let mut i = 0;
    while i + needle.len() <= hay.len() {
        if hay[i..i + needle.len()] == needle[..] {
            matches.push(i);
            i += needle.len();
        } else {
            i += 1;
        }
    }
    matches
}

/// The match nearest to `from` in `direction`, excluding `from` itself.
/// With `wrap`, falls back to the first (forward) or last (backward) match.
#[must_use]
pub fn nearest(
    matches: &[usize],
    from: usize,
    direction: SearchDirection,
    wrap: bool,
) -> Option<usize> {
    let found = match direction {
        SearchDirection::Forward => matches.iter().copied().find(|&m| m > from),
        SearchDirection::Backward => matches.iter().rev().copied().find(|&m| m < from),
    };
    match (found, wrap, direction) {
        (Some(m), _, _) => Some(m),
        (None, false, _) => None,
        (None, true, SearchDirection::Forward) => matches.first().copied(),
        (None, true, SearchDirection::Backward) => matches.last().copied(),
    }
}

/// Search for `query` from `from`. `None` when the query is empty or has
/// no matches (or none in range without `wrap`).
#[must_use]
pub fn search(
    text: &Text,
    query: &str,
    from: usize,
    direction: SearchDirection,
    ignore_case: bool,
    wrap: bool,
) -> Option<usize> {
    nearest(&find_all(text, query, ignore_case), from, direction, wrap)
}

/// The word under the cursor for `*` / `#`, via the inner-word object.
/// `None` on whitespace or an empty buffer.
#[must_use]
pub fn word_under_cursor(text: &Text, pos: usize) -> Option<String> {
    let ch = text.char_at(pos)?;
    if classify(ch) == CharClass::Blank {
        return None;
    }
    let span = text_object::resolve(text, pos, Scope::Inside, ObjectKind::Word)?;
    Some(text.slice(span.start, span.end))
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

    // -- find_all ---------------------------------------------------------

    #[test]
    fn find_all_case_insensitive() {
        assert_eq!(find_all(&t("Foo foo FOO"), "foo", true), vec![0, 4, 8]);
        assert_eq!(find_all(&t("Foo foo FOO"), "foo", false), vec![4]);
    }

    #[test]
    fn find_all_non_overlapping() {
        assert_eq!(find_all(&t("aaaa"), "aa", true), vec![0, 2]);
    }

    #[test]
    fn find_all_empty_query() {
        assert!(find_all(&t("abc"), "", true).is_empty());
    }

    #[test]
    fn find_all_unicode_offsets_are_chars() {
        assert_eq!(find_all(&t("éa éa"), "a", true), vec![1, 4]);
    }

    // -- nearest ----------------------------------------------------------

    #[test]
    fn forward_strictly_after() {
        assert_eq!(nearest(&[0, 4, 8], 4, SearchDirection::Forward, true), Some(8));
    }

    #[test]
    fn forward_wraps() {
        assert_eq!(nearest(&[0, 4, 8], 8, SearchDirection::Forward, true), Some(0));
        assert_eq!(nearest(&[0, 4, 8], 8, SearchDirection::Forward, false), None);
    }

    #[test]
    fn backward_strictly_before() {
        assert_eq!(nearest(&[0, 4, 8], 4, SearchDirection::Backward, true), Some(0));
    }

    #[test]
    fn backward_wraps() {
        assert_eq!(nearest(&[0, 4, 8], 0, SearchDirection::Backward, true), Some(8));
    }

    #[test]
    fn no_matches() {
        assert_eq!(nearest(&[], 0, SearchDirection::Forward, true), None);
        assert_eq!(search(&t("abc"), "z", 0, SearchDirection::Forward, true, true), None);
    }

    #[test]
    fn single_match_at_cursor_wraps_to_itself() {
        assert_eq!(
            search(&t("x foo y"), "foo", 2, SearchDirection::Forward, true, true),
            Some(2)
        );
    }

    #[test]
    fn repeat_direction() {
        let state = SearchState {
            query: "x".into(),
            direction: SearchDirection::Backward,
        };
        assert_eq!(state.effective_direction(false), SearchDirection::Backward);
        assert_eq!(state.effective_direction(true), SearchDirection::Forward);
    }

    // -- word under cursor ------------------------------------------------

    #[test]
    fn word_under_cursor_basic() {
        assert_eq!(word_under_cursor(&t("let foo_1 = 2"), 5).as_deref(), Some("foo_1"));
    }

    #[test]
    fn word_under_cursor_on_blank() {
        assert_eq!(word_under_cursor(&t("a b"), 1), None);
        assert_eq!(word_under_cursor(&t(""), 0), None);
    }
}
