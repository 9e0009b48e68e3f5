//! Key-sequence dispatch tries.
//!
//! Each mode owns a [`KeyTrie`] mapping chord sequences to [`Command`]s.
//! The engine keeps a cursor into the active trie while a multi-key
//! sequence (`gg`, `gj`) is being typed and feeds each chord to
//! [`KeyTrie::resolve`]:
//!
//! | Outcome | Meaning | Engine action |
//! |---------|---------|---------------|
//! | `Resolved(cmd)` | a bound sequence finished | run `cmd`, cursor → root |
//! | `Partial(node)` | a prefix of some binding | cursor → `node` |
//! | `NoMatch` | not a prefix of anything | drop the prefix, cursor → root |
//!
//! # Chords
//!
//! Printable commands are bound as [`KeyChord::Literal`] and match by the
//! character typed, so Shift is carried by case (`G` is not `g` + Shift).
//! Control chords and named keys are bound as [`KeyChord::Key`] and
//! compare code and modifiers exactly.
//!
//! The Visual trie is a clone of the Normal trie with a few overrides;
//! the Insert trie only holds control chords, anything it doesn't match is
//! typed text.

use vimline_input::{KeyCode, KeyEvent, Modifiers};

use crate::command::Command;
use crate::mode::Mode;

// ---------------------------------------------------------------------------
// Chords
// ---------------------------------------------------------------------------

/// One element of a bound key sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyChord {
    /// The character the key types, Shift ignored.
    Literal(char),
    /// A key code with an exact modifier set.
    Key { code: KeyCode, modifiers: Modifiers },
}

impl KeyChord {
    /// `Ctrl` + `ch`.
    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self::Key {
            code: KeyCode::Char(ch),
            modifiers: Modifiers::CTRL,
        }
    }

    /// A named key with no modifiers.
    #[must_use]
    pub const fn named(code: KeyCode) -> Self {
        Self::Key {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// True if `key` is this chord.
    #[must_use]
    pub fn matches(&self, key: &KeyEvent) -> bool {
        match *self {
            Self::Literal(ch) => key.text() == Some(ch),
            Self::Key { code, modifiers } => key.code == code && key.modifiers == modifiers,
        }
    }
}

/// A literal sequence, one chord per char: `lit("gg")`.
fn lit(seq: &str) -> Vec<KeyChord> {
    seq.chars().map(KeyChord::Literal).collect()
}

// ---------------------------------------------------------------------------
// Trie
// ---------------------------------------------------------------------------

/// Position in a [`KeyTrie`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root of every trie.
    pub const ROOT: Self = Self(0);

    /// True at the root (no sequence in progress).
    #[inline]
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

/// Result of feeding one chord to a trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Command),
    Partial(NodeId),
    NoMatch,
}

#[derive(Debug, Clone, Default)]
struct Node {
    children: Vec<(KeyChord, usize)>,
    command: Option<Command>,
}

/// Arena-backed chord trie.
#[derive(Debug, Clone)]
pub struct KeyTrie {
    nodes: Vec<Node>,
}

impl KeyTrie {
    /// A trie with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// Bind `seq` to `command`, replacing any existing binding of `seq`.
    /// An empty sequence is ignored.
    pub fn bind(&mut self, seq: &[KeyChord], command: Command) {
        if seq.is_empty() {
            return;
        }
        let mut node = 0;
        for chord in seq {
            let existing = self.nodes[node]
                .children
                .iter()
                .find(|(c, _)| c == chord)
                .map(|&(_, child)| child);
            node = existing.unwrap_or_else(|| {
                self.nodes.push(Node::default());
                let child = self.nodes.len() - 1;
                self.nodes[node].children.push((*chord, child));
                child
            });
        }
        self.nodes[node].command = Some(command);
    }

    /// Feed `key` at trie position `at`.
    ///
    /// A node that carries a command resolves immediately even if longer
    /// sequences share its prefix.
    #[must_use]
    pub fn resolve(&self, key: &KeyEvent, at: NodeId) -> Resolution {
        let Some(node) = self.nodes.get(at.0) else {
            return Resolution::NoMatch;
        };
        let Some(&(_, child)) = node.children.iter().find(|(c, _)| c.matches(key)) else {
            return Resolution::NoMatch;
        };
        match self.nodes[child].command {
            Some(command) => Resolution::Resolved(command),
            None => Resolution::Partial(NodeId(child)),
        }
    }
}

impl Default for KeyTrie {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Default bindings
// ---------------------------------------------------------------------------

/// The three per-mode tries.
#[derive(Debug, Clone)]
pub struct Keymaps {
    normal: KeyTrie,
    visual: KeyTrie,
    insert: KeyTrie,
}

impl Keymaps {
    /// The Vim bindings.
    #[must_use]
    pub fn vim() -> Self {
        let normal = normal_trie();

        let mut visual = normal.clone();
        visual.bind(&lit("o"), Command::ToggleVisualCursor);
        visual.bind(&lit("O"), Command::ToggleVisualCursor);
        visual.bind(&lit("i"), Command::VisualInner);
        visual.bind(&lit("a"), Command::VisualAround);

        let mut insert = KeyTrie::new();
        insert.bind(&[KeyChord::ctrl('w')], Command::DeletePreviousWord);
        insert.bind(&[KeyChord::ctrl('a')], Command::InsertLastInserted);

        Self {
            normal,
            visual,
            insert,
        }
    }

    /// The trie consulted in `mode`.
    #[must_use]
    pub const fn for_mode(&self, mode: Mode) -> &KeyTrie {
        match mode {
            Mode::Normal => &self.normal,
            Mode::Visual | Mode::VisualLine => &self.visual,
            Mode::Insert => &self.insert,
        }
    }
}

impl Default for Keymaps {
    fn default() -> Self {
        Self::vim()
    }
}

fn normal_trie() -> KeyTrie {
    use Command as C;

    let literal: &[(&str, Command)] = &[
        ("h", C::MoveLeft),
        ("j", C::MoveDown),
        ("k", C::MoveUp),
        ("l", C::MoveRight),
        (" ", C::MoveRight),
        ("gk", C::MoveUpOnScreen),
        ("gj", C::MoveDownOnScreen),
        ("w", C::WordForward),
        ("W", C::BigWordForward),
        ("e", C::WordEnd),
        ("E", C::BigWordEnd),
        ("b", C::WordBackward),
        ("B", C::BigWordBackward),
        ("0", C::LineStart),
        ("^", C::FirstNonBlank),
        ("_", C::FirstNonBlank),
        ("$", C::LineEnd),
        ("gg", C::GotoBegin),
        ("G", C::GotoEnd),
        ("f", C::FindForward),
        ("F", C::FindBackward),
        ("t", C::TillForward),
        ("T", C::TillBackward),
        (";", C::RepeatFind),
        (",", C::RepeatFindReverse),
        ("n", C::SearchNext),
        ("N", C::SearchPrevious),
        ("*", C::SearchWordForward),
        ("#", C::SearchWordBackward),
        ("%", C::MatchingBracket),
        ("}", C::ParagraphForward),
        ("{", C::ParagraphBackward),
        ("`", C::GotoMark),
        ("i", C::EnterInsert),
        ("a", C::EnterInsertAfter),
        ("I", C::EnterInsertLineStart),
        ("A", C::EnterInsertLineEnd),
        ("o", C::InsertLineBelow),
        ("O", C::InsertLineAbove),
        ("v", C::EnterVisual),
        ("V", C::EnterVisualLine),
        ("d", C::Delete),
        ("c", C::Change),
        ("y", C::Yank),
        ("x", C::DeleteChar),
        ("s", C::DeleteCharAndInsert),
        ("D", C::DeleteToLineEnd),
        ("C", C::ChangeToLineEnd),
        ("p", C::PasteForward),
        ("P", C::PasteBackward),
        ("~", C::ToggleCase),
        ("u", C::Undo),
        ("m", C::SetMark),
        ("q", C::RecordMacro),
        ("@", C::ReplayMacro),
        (":", C::CommandPrompt),
        ("/", C::SearchPrompt),
        ("?", C::ReverseSearchPrompt),
    ];

    let keyed: &[(KeyChord, Command)] = &[
        (KeyChord::named(KeyCode::Left), C::MoveLeft),
        (KeyChord::named(KeyCode::Down), C::MoveDown),
        (KeyChord::named(KeyCode::Up), C::MoveUp),
        (KeyChord::named(KeyCode::Right), C::MoveRight),
        (KeyChord::named(KeyCode::Backspace), C::MoveLeft),
        (KeyChord::named(KeyCode::Home), C::LineStart),
        (KeyChord::named(KeyCode::End), C::LineEnd),
        (KeyChord::named(KeyCode::Delete), C::DeleteChar),
        (KeyChord::ctrl('r'), C::Redo),
        (KeyChord::ctrl('a'), C::IncrementNumber),
        (KeyChord::ctrl('x'), C::DecrementNumber),
    ];

    let mut trie = KeyTrie::new();
    for (seq, command) in literal {
        trie.bind(&lit(seq), *command);
    }
    for (chord, command) in keyed {
        trie.bind(&[*chord], *command);
    }
    trie
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn press(ch: char) -> KeyEvent {
        KeyEvent::char(ch)
    }

    fn resolve_seq(trie: &KeyTrie, keys: &[KeyEvent]) -> Resolution {
        let mut at = NodeId::ROOT;
        let mut last = Resolution::NoMatch;
        for key in keys {
            last = trie.resolve(key, at);
            match last {
                Resolution::Partial(node) => at = node,
                _ => at = NodeId::ROOT,
            }
        }
        last
    }

    // -- trie mechanics ---------------------------------------------------

    #[test]
    fn single_key_resolves() {
        let maps = Keymaps::vim();
        assert_eq!(
            maps.for_mode(Mode::Normal).resolve(&press('x'), NodeId::ROOT),
            Resolution::Resolved(Command::DeleteChar)
        );
    }

    #[test]
    fn prefix_is_partial() {
        let maps = Keymaps::vim();
        let trie = maps.for_mode(Mode::Normal);
        let Resolution::Partial(node) = trie.resolve(&press('g'), NodeId::ROOT) else {
            panic!("g should be a prefix");
        };
        assert!(!node.is_root());
        assert_eq!(
            trie.resolve(&press('g'), node),
            Resolution::Resolved(Command::GotoBegin)
        );
        assert_eq!(
            trie.resolve(&press('j'), node),
            Resolution::Resolved(Command::MoveDownOnScreen)
        );
    }

    #[test]
    fn dead_end_prefix_is_no_match() {
        let maps = Keymaps::vim();
        let trie = maps.for_mode(Mode::Normal);
        assert_eq!(resolve_seq(trie, &[press('g'), press('z')]), Resolution::NoMatch);
    }

    #[test]
    fn unbound_key_is_no_match() {
        let maps = Keymaps::vim();
        assert_eq!(
            maps.for_mode(Mode::Normal).resolve(&press('Q'), NodeId::ROOT),
            Resolution::NoMatch
        );
    }

    #[test]
    fn rebinding_replaces() {
        let mut trie = KeyTrie::new();
        trie.bind(&lit("x"), Command::DeleteChar);
        trie.bind(&lit("x"), Command::Undo);
        assert_eq!(
            trie.resolve(&press('x'), NodeId::ROOT),
            Resolution::Resolved(Command::Undo)
        );
    }

    #[test]
    fn empty_binding_ignored() {
        let mut trie = KeyTrie::new();
        trie.bind(&[], Command::Undo);
        assert_eq!(trie.resolve(&press('x'), NodeId::ROOT), Resolution::NoMatch);
    }

    #[test]
    fn bad_node_is_no_match() {
        let trie = KeyTrie::new();
        assert_eq!(trie.resolve(&press('x'), NodeId(99)), Resolution::NoMatch);
    }

    // -- chord matching ---------------------------------------------------

    #[test]
    fn literal_ignores_shift() {
        let maps = Keymaps::vim();
        let shifted = KeyEvent::new(KeyCode::Char('G'), Modifiers::SHIFT);
        assert_eq!(
            maps.for_mode(Mode::Normal).resolve(&shifted, NodeId::ROOT),
            Resolution::Resolved(Command::GotoEnd)
        );
    }

    #[test]
    fn case_distinguishes_literals() {
        let maps = Keymaps::vim();
        let trie = maps.for_mode(Mode::Normal);
        assert_eq!(
            trie.resolve(&press('p'), NodeId::ROOT),
            Resolution::Resolved(Command::PasteForward)
        );
        assert_eq!(
            trie.resolve(&press('P'), NodeId::ROOT),
            Resolution::Resolved(Command::PasteBackward)
        );
    }

    #[test]
    fn ctrl_chord_is_exact() {
        let maps = Keymaps::vim();
        let trie = maps.for_mode(Mode::Normal);
        assert_eq!(
            trie.resolve(&KeyEvent::ctrl('r'), NodeId::ROOT),
            Resolution::Resolved(Command::Redo)
        );
        let ctrl_alt_r = KeyEvent::new(KeyCode::Char('r'), Modifiers::CTRL | Modifiers::ALT);
        assert_eq!(trie.resolve(&ctrl_alt_r, NodeId::ROOT), Resolution::NoMatch);
    }

    #[test]
    fn ctrl_letter_does_not_match_literal() {
        let maps = Keymaps::vim();
        // Ctrl-U is unbound; it must not fall through to `u` (undo).
        assert_eq!(
            maps.for_mode(Mode::Normal)
                .resolve(&KeyEvent::ctrl('u'), NodeId::ROOT),
            Resolution::NoMatch
        );
    }

    #[test]
    fn arrows_are_motions() {
        let maps = Keymaps::vim();
        assert_eq!(
            maps.for_mode(Mode::Normal)
                .resolve(&KeyEvent::key(KeyCode::Left), NodeId::ROOT),
            Resolution::Resolved(Command::MoveLeft)
        );
    }

    // -- per-mode tries ---------------------------------------------------

    #[test]
    fn visual_overrides_o_and_text_objects() {
        let maps = Keymaps::vim();
        let visual = maps.for_mode(Mode::Visual);
        assert_eq!(
            visual.resolve(&press('o'), NodeId::ROOT),
            Resolution::Resolved(Command::ToggleVisualCursor)
        );
        assert_eq!(
            visual.resolve(&press('i'), NodeId::ROOT),
            Resolution::Resolved(Command::VisualInner)
        );
        assert_eq!(
            maps.for_mode(Mode::VisualLine).resolve(&press('w'), NodeId::ROOT),
            Resolution::Resolved(Command::WordForward)
        );
        // Normal keeps its own meaning.
        assert_eq!(
            maps.for_mode(Mode::Normal).resolve(&press('o'), NodeId::ROOT),
            Resolution::Resolved(Command::InsertLineBelow)
        );
    }

    #[test]
    fn insert_trie_is_control_only() {
        let maps = Keymaps::vim();
        let insert = maps.for_mode(Mode::Insert);
        assert_eq!(
            insert.resolve(&KeyEvent::ctrl('w'), NodeId::ROOT),
            Resolution::Resolved(Command::DeletePreviousWord)
        );
        assert_eq!(
            insert.resolve(&KeyEvent::ctrl('a'), NodeId::ROOT),
            Resolution::Resolved(Command::InsertLastInserted)
        );
        assert_eq!(insert.resolve(&press('x'), NodeId::ROOT), Resolution::NoMatch);
    }
}
