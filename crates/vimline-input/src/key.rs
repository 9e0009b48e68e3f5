// SPDX-License-Identifier: MIT
//
// Key event model.
//
// A key event is a key identity plus the modifiers held with it. The
// engine matches printable Vim commands by the character they produce
// (so `G` is its own key, not `g` + Shift) and control chords by code
// and exact modifiers. `KeyEvent::text` is the bridge between the two.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A single key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys (Shift, Alt, Ctrl, etc.).
    pub modifiers: Modifiers,
}

/// Identity of a key.
///
/// Named keys have dedicated variants; printable characters use
/// [`Char`](KeyCode::Char).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A Unicode character (printable).
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

bitflags! {
    /// Keyboard modifier flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
        const SUPER = 0b0000_1000;
    }
}

// ─── Constructors ───────────────────────────────────────────────────────────

impl KeyEvent {
    /// A key event with explicit modifiers.
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A plain press of `code` with no modifiers.
    #[must_use]
    pub const fn key(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    /// A printable character with no modifiers.
    #[must_use]
    pub const fn char(ch: char) -> Self {
        Self::key(KeyCode::Char(ch))
    }

    /// `Ctrl` + `ch`. The character is stored lowercase so `<C-R>` and
    /// `<C-r>` are the same chord.
    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self::new(KeyCode::Char(ch.to_ascii_lowercase()), Modifiers::CTRL)
    }

    /// The Escape key.
    #[must_use]
    pub const fn escape() -> Self {
        Self::key(KeyCode::Escape)
    }

    /// The text this key types, if any.
    ///
    /// Characters held with Ctrl, Alt or Super don't produce text; Shift
    /// is ignored because the character's case already encodes it.
    /// Enter and Tab produce their control characters.
    #[must_use]
    pub const fn text(&self) -> Option<char> {
        if self
            .modifiers
            .intersects(Modifiers::CTRL.union(Modifiers::ALT).union(Modifiers::SUPER))
        {
            return None;
        }
        match self.code {
            KeyCode::Char(ch) => Some(ch),
            KeyCode::Enter => Some('\n'),
            KeyCode::Tab => Some('\t'),
            _ => None,
        }
    }

    /// True for a plain (unmodified) Escape press.
    #[inline]
    #[must_use]
    pub const fn is_escape(&self) -> bool {
        matches!(self.code, KeyCode::Escape)
    }
}

impl From<char> for KeyEvent {
    fn from(ch: char) -> Self {
        Self::char(ch)
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::key(code)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_char_has_text() {
        assert_eq!(KeyEvent::char('x').text(), Some('x'));
    }

    #[test]
    fn shifted_char_keeps_text() {
        let ev = KeyEvent::new(KeyCode::Char('G'), Modifiers::SHIFT);
        assert_eq!(ev.text(), Some('G'));
    }

    #[test]
    fn ctrl_char_has_no_text() {
        assert_eq!(KeyEvent::ctrl('r').text(), None);
    }

    #[test]
    fn ctrl_is_case_folded() {
        assert_eq!(KeyEvent::ctrl('R'), KeyEvent::ctrl('r'));
    }

    #[test]
    fn enter_and_tab_type_control_chars() {
        assert_eq!(KeyEvent::key(KeyCode::Enter).text(), Some('\n'));
        assert_eq!(KeyEvent::key(KeyCode::Tab).text(), Some('\t'));
    }

    #[test]
    fn named_keys_have_no_text() {
        assert_eq!(KeyEvent::escape().text(), None);
        assert_eq!(KeyEvent::key(KeyCode::Left).text(), None);
        assert_eq!(KeyEvent::key(KeyCode::Backspace).text(), None);
    }

    #[test]
    fn from_char() {
        let ev: KeyEvent = 'a'.into();
        assert_eq!(ev, KeyEvent::char('a'));
        assert!(!ev.is_escape());
        assert!(KeyEvent::escape().is_escape());
    }
}
