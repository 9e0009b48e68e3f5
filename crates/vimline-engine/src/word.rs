//! Word motions: Vim-style word and WORD navigation.
//!
//! | Function | Vim key | Lands on |
//! |----------|---------|----------|
//! | [`word_forward`] | `w` / `W` | first char of the next token |
//! | [`word_end`] | `e` / `E` | last char of the current or next token |
//! | [`word_backward`] | `b` / `B` | first char of the current or previous token |
//!
//! # Words vs WORDs
//!
//! A **word** is a run of word characters (letters, digits, underscore) or
//! a run of other non-blank characters. `hello.world` is three words.
//! A **WORD** is any run of non-blank characters: `hello.world` is one.
//! Newlines count as whitespace for both.

use crate::text::Text;

// ---------------------------------------------------------------------------
// Character classification
// ---------------------------------------------------------------------------

/// Character class for word boundary detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Letters, digits, underscore.
    Word,
    /// Non-blank, non-word characters (operators, brackets, etc.).
    Punctuation,
    /// Whitespace, including line breaks.
    Blank,
}

/// Classify a character for small-word motions (`w`/`b`/`e`).
#[must_use]
pub fn classify(ch: char) -> CharClass {
    if ch.is_whitespace() {
        CharClass::Blank
    } else if is_word_char(ch) {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

/// Classify a character for WORD motions (`W`/`B`/`E`).
/// Only blank vs non-blank matters.
#[must_use]
pub fn classify_big(ch: char) -> CharClass {
    if ch.is_whitespace() {
        CharClass::Blank
    } else {
        CharClass::Word
    }
}

/// Letters, digits and `_`.
#[inline]
#[must_use]
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

const fn classifier(big: bool) -> fn(char) -> CharClass {
    if big { classify_big } else { classify }
}

// ---------------------------------------------------------------------------
// Motions
// ---------------------------------------------------------------------------

/// `w` / `W`: forward to the start of the next token.
///
/// Skips the rest of the token under the cursor, then any whitespace. If
/// that runs off the end of the buffer the cursor stays put.
#[must_use]
pub fn word_forward(text: &Text, pos: usize, big: bool) -> usize {
    let class = classifier(big);
    let len = text.len();
    if len == 0 || pos + 1 >= len {
        return pos;
    }

    let mut next = pos;
    if let Some(start) = text.char_at(pos).map(class) {
        if start != CharClass::Blank {
            while text.char_at(next).map(class) == Some(start) {
                next += 1;
            }
        }
    }
    while text.char_at(next).map(class) == Some(CharClass::Blank) {
        next += 1;
    }

    if next < len { next } else { pos }
}

/// `e` / `E`: forward to the last char of the current or next token.
///
/// From inside a token this is that token's end. From a token's last char
/// (or from whitespace) it is the end of the following token.
#[must_use]
pub fn word_end(text: &Text, pos: usize, big: bool) -> usize {
    let class = classifier(big);
    let len = text.len();
    if len == 0 || pos + 1 >= len {
        return pos;
    }

    // Step at least one char, then skip whitespace.
    let mut next = pos + 1;
    while text.char_at(next).map(class) == Some(CharClass::Blank) {
        next += 1;
    }
    if next >= len {
        return len - 1;
    }

    let Some(token) = text.char_at(next).map(class) else {
        return pos;
    };
    while text.char_at(next + 1).map(class) == Some(token) {
        next += 1;
    }
    next
}

/// `b` / `B`: backward to the start of the current or previous token.
#[must_use]
pub fn word_backward(text: &Text, pos: usize, big: bool) -> usize {
    let class = classifier(big);
    let pos = pos.min(text.len());
    if pos == 0 {
        return 0;
    }

    let mut prev = pos - 1;
    while prev > 0 && text.char_at(prev).map(class) == Some(CharClass::Blank) {
        prev -= 1;
    }

    let Some(token) = text.char_at(prev).map(class) else {
        return pos;
    };
    if token == CharClass::Blank {
        return prev;
    }
    while prev > 0 && text.char_at(prev - 1).map(class) == Some(token) {
        prev -= 1;
    }
    prev
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

    fn repeat(n: usize, mut pos: usize, f: impl Fn(usize) -> usize) -> usize {
        for _ in 0..n {
            pos = f(pos);
        }
        pos
    }

    // -- classification ---------------------------------------------------

    #[test]
    fn classes() {
        assert_eq!(classify('a'), CharClass::Word);
        assert_eq!(classify('_'), CharClass::Word);
        assert_eq!(classify('7'), CharClass::Word);
        assert_eq!(classify('.'), CharClass::Punctuation);
        assert_eq!(classify(' '), CharClass::Blank);
        assert_eq!(classify('\n'), CharClass::Blank);
        assert_eq!(classify_big('.'), CharClass::Word);
    }

    // -- w ----------------------------------------------------------------

    #[test]
    fn w_three_times() {
        let text = t("foo bar baz");
        assert_eq!(repeat(3, 0, |p| word_forward(&text, p, false)), 8);
    }

    #[test]
    fn w_stops_at_punctuation() {
        let text = t("foo.bar");
        assert_eq!(word_forward(&text, 0, false), 3);
        assert_eq!(word_forward(&text, 3, false), 4);
    }

    #[test]
    fn big_w_skips_punctuation() {
        let text = t("foo.bar baz");
        assert_eq!(word_forward(&text, 0, true), 8);
    }

    #[test]
    fn w_crosses_lines() {
        let text = t("foo\n  bar");
        assert_eq!(word_forward(&text, 1, false), 6);
    }

    #[test]
    fn w_from_blank() {
        let text = t("a   b");
        assert_eq!(word_forward(&text, 2, false), 4);
    }

    #[test]
    fn w_at_last_token_stays() {
        let text = t("foo bar");
        assert_eq!(word_forward(&text, 5, false), 5);
        assert_eq!(word_forward(&text, 6, false), 6);
        assert_eq!(word_forward(&t("foo  "), 0, false), 0);
    }

    #[test]
    fn w_empty() {
        assert_eq!(word_forward(&Text::new(), 0, false), 0);
    }

    // -- e ----------------------------------------------------------------

    #[test]
    fn e_inside_word() {
        let text = t("hello world");
        assert_eq!(word_end(&text, 1, false), 4);
    }

    #[test]
    fn e_at_word_end_goes_to_next() {
        let text = t("hello world");
        assert_eq!(word_end(&text, 4, false), 10);
    }

    #[test]
    fn e_from_blank() {
        let text = t("a   bcd");
        assert_eq!(word_end(&text, 1, false), 6);
    }

    #[test]
    fn e_punctuation_boundary() {
        let text = t("foo.bar");
        assert_eq!(word_end(&text, 0, false), 2);
        assert_eq!(word_end(&text, 2, false), 3);
        assert_eq!(word_end(&text, 0, true), 6);
    }

    #[test]
    fn e_trailing_blanks_lands_on_last_char() {
        let text = t("ab   ");
        assert_eq!(word_end(&text, 1, false), 4);
    }

    // -- b ----------------------------------------------------------------

    #[test]
    fn b_three_times() {
        let text = t("foo bar baz");
        assert_eq!(repeat(3, 11, |p| word_backward(&text, p, false)), 0);
    }

    #[test]
    fn b_inside_word_goes_to_start() {
        let text = t("foo bar");
        assert_eq!(word_backward(&text, 6, false), 4);
    }

    #[test]
    fn b_punctuation() {
        let text = t("foo.bar");
        assert_eq!(word_backward(&text, 4, false), 3);
        assert_eq!(word_backward(&text, 4, true), 0);
    }

    #[test]
    fn b_across_lines() {
        let text = t("foo\n  bar");
        assert_eq!(word_backward(&text, 6, false), 0);
    }

    #[test]
    fn b_at_start() {
        assert_eq!(word_backward(&t("abc"), 0, false), 0);
    }
}
