//! Operators: the `d` / `c` / `y` + motion grammar.
//!
//! Pressing an operator arms a [`PendingOperator`]. The next command then
//! decides what it acts on:
//!
//! | Next key | Span |
//! |----------|------|
//! | same operator (`dd`, `cc`, `yy`) | `count` whole lines |
//! | `i` / `a`, then an object key | the text object ([`crate::text_object`]) |
//! | a motion | cursor → motion target, shaped by the motion's [`Extent`] |
//! | anything else | nothing; the operator is dropped |
//!
//! Visual mode uses the same span appliers with the selection as the span,
//! and arms a [`OperatorKind::Visual`] operator for `vi(` style selection.

use tracing::trace;

use crate::command::{Command, PromptKind};
use crate::engine::{Engine, MAX_COUNT};
use crate::facade::BufferFacade;
use crate::mode::Mode;
use crate::motion;
use crate::register::RegisterKind;
use crate::text_object::{self, ObjectKind, Scope};
use crate::word::{self, CharClass, classify, classify_big};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What an armed operator does with its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    Delete,
    Change,
    Yank,
    /// `i` / `a` in Visual mode: the object becomes the selection.
    Visual,
}

impl OperatorKind {
    /// The operator a command arms, if it is one.
    #[must_use]
    pub const fn from_command(command: Command) -> Option<Self> {
        match command {
            Command::Delete => Some(Self::Delete),
            Command::Change => Some(Self::Change),
            Command::Yank => Some(Self::Yank),
            _ => None,
        }
    }
}

/// An operator waiting for its motion or text object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingOperator {
    pub kind: OperatorKind,
    /// Set after `i` / `a`: the next key names the object.
    pub scope: Option<Scope>,
    /// Count typed before the operator (`2dw`).
    pub count: Option<usize>,
}

impl PendingOperator {
    /// A freshly armed operator.
    #[must_use]
    pub const fn new(kind: OperatorKind, count: Option<usize>) -> Self {
        Self {
            kind,
            scope: None,
            count,
        }
    }

    /// Visual `i` / `a`.
    #[must_use]
    pub const fn visual(scope: Scope) -> Self {
        Self {
            kind: OperatorKind::Visual,
            scope: Some(scope),
            count: None,
        }
    }

    const fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }
}

/// How a motion's range maps onto an operator span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    /// The target char is not included (`w`, `b`, `h`).
    Exclusive,
    /// The target char is included (`e`, `f`, `$`, `%`).
    Inclusive,
    /// Whole lines from the cursor line to the target line (`j`, `G`).
    Linewise,
}

/// A resolved motion target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    pub target: usize,
    pub extent: Extent,
}

impl Motion {
    #[must_use]
    pub const fn exclusive(target: usize) -> Self {
        Self {
            target,
            extent: Extent::Exclusive,
        }
    }

    #[must_use]
    pub const fn inclusive(target: usize) -> Self {
        Self {
            target,
            extent: Extent::Inclusive,
        }
    }

    #[must_use]
    pub const fn linewise(target: usize) -> Self {
        Self {
            target,
            extent: Extent::Linewise,
        }
    }
}

/// `2d3w` = 6; no count on either side stays `None` (`dG` ≠ `d1G`).
fn combine(outer: Option<usize>, inner: Option<usize>) -> Option<usize> {
    match (outer, inner) {
        (None, None) => None,
        (a, b) => Some(
            a.unwrap_or(1)
                .saturating_mul(b.unwrap_or(1))
                .min(MAX_COUNT),
        ),
    }
}

/// Swap the case of every cased char.
pub(crate) fn swap_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if ch.is_lowercase() {
            out.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Operator protocol
// ---------------------------------------------------------------------------

impl<H: BufferFacade> Engine<H> {
    /// Feed the command typed after an armed operator.
    pub(crate) fn continue_operator(&mut self, command: Command) {
        let Some(op) = self.pending.take() else {
            return;
        };
        match command {
            Command::EnterInsert => self.pending = Some(op.with_scope(Scope::Inside)),
            Command::EnterInsertAfter => self.pending = Some(op.with_scope(Scope::Around)),
            Command::SearchPrompt | Command::ReverseSearchPrompt => {
                // The search answer completes the operator.
                self.pending = Some(op);
                self.count = None;
                let kind = if command == Command::SearchPrompt {
                    PromptKind::SearchForward
                } else {
                    PromptKind::SearchBackward
                };
                self.open_prompt(kind);
            }
            c if OperatorKind::from_command(c) == Some(op.kind) => {
                let count = combine(op.count, self.count.take()).unwrap_or(1);
                self.operate_current_lines(op.kind, count);
            }
            c if c.is_motion() => {
                let count = self.count.take();
                self.operate_over_motion(op, c, count, None);
            }
            _ => {
                trace!(?command, "operator dropped");
                self.count = None;
            }
        }
    }

    /// Run `command` as the motion of `op`.
    pub(crate) fn operate_over_motion(
        &mut self,
        op: PendingOperator,
        command: Command,
        count: Option<usize>,
        symbol: Option<char>,
    ) {
        let count = combine(op.count, count);
        let big = command == Command::BigWordForward;
        let on_word = self
            .text
            .char_at(self.cursor)
            .is_some_and(|c| classify(c) != CharClass::Blank);
        // `cw` on a word changes to the word's end, like `ce`.
        let motion = if op.kind == OperatorKind::Change
            && matches!(command, Command::WordForward | Command::BigWordForward)
            && on_word
        {
            Some(self.change_word_motion(count.unwrap_or(1), big))
        } else {
            self.motion(command, count, symbol, true)
        };
        let Some(motion) = motion else {
            trace!(?command, "motion failed; operator dropped");
            return;
        };

        let lo = self.cursor.min(motion.target);
        let hi = self.cursor.max(motion.target);
        match motion.extent {
            Extent::Linewise => self.operate_lines(op.kind, lo, hi),
            Extent::Exclusive => self.operate_chars(op.kind, lo, hi),
            Extent::Inclusive => {
                let end = if self.text.char_at(hi).is_some_and(|c| c != '\n') {
                    hi + 1
                } else {
                    hi
                };
                self.operate_chars(op.kind, lo, end);
            }
        }
    }

    /// Target of `count` `cw`s: a cursor already on a word's last char
    /// counts that word as the first one.
    fn change_word_motion(&self, count: usize, big: bool) -> Motion {
        let class = if big { classify_big } else { classify };
        let mut pos = self.cursor;
        for i in 0..count {
            let at_end = self.text.char_at(pos + 1).map(class) != self.text.char_at(pos).map(class);
            if i == 0 && at_end {
                continue;
            }
            pos = word::word_end(&self.text, pos, big);
        }
        Motion::inclusive(pos)
    }

    /// `i` / `a` + object key.
    pub(crate) fn apply_text_object(&mut self, op: PendingOperator, scope: Scope, kind: ObjectKind) {
        let Some(span) = text_object::resolve(&self.text, self.cursor, scope, kind) else {
            trace!(?kind, "no text object here");
            return;
        };
        if op.kind == OperatorKind::Visual {
            if span.is_empty() {
                return;
            }
            self.anchor = span.start;
            self.cursor = span.end - 1;
            if self.mode == Mode::VisualLine {
                self.set_mode(Mode::Visual);
            }
            return;
        }
        self.operate_chars(op.kind, span.start, span.end);
    }

    // -----------------------------------------------------------------------
    // Span appliers
    // -----------------------------------------------------------------------

    /// Apply `kind` to the chars `[start, end)`.
    pub(crate) fn operate_chars(&mut self, kind: OperatorKind, start: usize, end: usize) {
        if start < end && kind != OperatorKind::Visual {
            let taken = self.text.slice(start, end);
            self.register.set(taken, RegisterKind::Char);
        }
        match kind {
            OperatorKind::Yank => self.cursor = start,
            OperatorKind::Delete => {
                self.apply_edit(start, end, "");
                self.cursor = start;
            }
            OperatorKind::Change => {
                self.apply_edit(start, end, "");
                self.enter_insert(start, 1, false);
            }
            OperatorKind::Visual => {}
        }
    }

    /// Apply `kind` to every line from the one holding `lo` to the one
    /// holding `hi`.
    ///
    /// Delete removes the lines with their `\n` (the preceding one on the
    /// last line); Change empties them into one blank line and enters
    /// Insert there. The register always gets the lines plus `\n`.
    pub(crate) fn operate_lines(&mut self, kind: OperatorKind, lo: usize, hi: usize) {
        let first = self.text.line_start(lo);
        let last_end = self.text.line_end(hi);
        if kind != OperatorKind::Visual {
            let lines = self.text.slice(first, last_end);
            self.register.set(lines, RegisterKind::Line);
        }
        match kind {
            OperatorKind::Yank => self.cursor = lo,
            OperatorKind::Delete => {
                let (start, end) = if last_end < self.text.len() {
                    (first, last_end + 1)
                } else if first > 0 {
                    (first - 1, last_end)
                } else {
                    (first, last_end)
                };
                self.apply_edit(start, end, "");
                self.cursor = self.text.first_non_blank(start);
            }
            OperatorKind::Change => {
                self.apply_edit(first, last_end, "");
                self.enter_insert(first, 1, false);
            }
            OperatorKind::Visual => {}
        }
    }

    /// `dd` / `cc` / `yy` with a count.
    fn operate_current_lines(&mut self, kind: OperatorKind, count: usize) {
        let delta = isize::try_from(count - 1).unwrap_or(isize::MAX);
        let last = motion::vertical(&self.text, self.cursor, delta, 0);
        self.operate_lines(kind, self.cursor, last);
    }

    // -----------------------------------------------------------------------
    // Visual operators
    // -----------------------------------------------------------------------

    /// `d` `c` `y` on the selection. Leaves Visual mode.
    pub(crate) fn visual_operate(&mut self, kind: OperatorKind) {
        let linewise = self.mode == Mode::VisualLine;
        let lo = self.anchor.min(self.cursor);
        let hi = self.anchor.max(self.cursor);
        self.set_mode(Mode::Normal);
        if linewise {
            self.operate_lines(kind, lo, hi);
        } else {
            let end = (hi + 1).min(self.text.len());
            self.operate_chars(kind, lo, end);
        }
    }

    /// `~` on the selection.
    pub(crate) fn visual_toggle_case(&mut self) {
        let Some(span) = self.selection() else {
            return;
        };
        self.set_mode(Mode::Normal);
        self.toggle_case(span.start, span.end);
        self.cursor = span.start;
    }

    /// `p` / `P` on the selection: replace it with the register, which
    /// then holds the replaced text.
    pub(crate) fn visual_replace(&mut self) {
        let Some(span) = self.selection() else {
            return;
        };
        let linewise = self.mode == Mode::VisualLine;
        self.set_mode(Mode::Normal);
        if self.register.is_empty() {
            return;
        }

        let mut content = self.register.content().to_string();
        if linewise && span.end == self.text.len() {
            if content.ends_with('\n') {
                content.pop();
            }
        } else if linewise && !content.ends_with('\n') {
            content.push('\n');
        } else if !linewise && self.register.is_line() {
            content.pop();
        }

        let replaced = self.text.slice(span.start, span.end);
        let len = content.chars().count();
        self.apply_edit(span.start, span.end, &content);
        let kind = if linewise {
            RegisterKind::Line
        } else {
            RegisterKind::Char
        };
        self.register.set(replaced, kind);
        self.cursor = if linewise {
            self.text.first_non_blank(span.start)
        } else {
            span.start + len.saturating_sub(1)
        };
    }

    // -----------------------------------------------------------------------
    // Simple edits
    // -----------------------------------------------------------------------

    /// Swap case over `[start, end)`.
    pub(crate) fn toggle_case(&mut self, start: usize, end: usize) {
        let original = self.text.slice(start, end);
        let swapped = swap_case(&original);
        if swapped != original {
            self.apply_edit(start, end, &swapped);
        }
    }

    /// `p` / `P`.
    ///
    /// Charwise content goes after the cursor (at it on an empty line) and
    /// the cursor lands on the last pasted char. Linewise content goes on
    /// new lines below (above for `P`), cursor on the first of them.
    pub(crate) fn paste(&mut self, after: bool, count: usize) {
        if self.register.is_empty() {
            return;
        }
        let content = self.register.content().repeat(count);

        if self.register.is_line() {
            let at = if after {
                if let Some(next) = self.text.next_line_start(self.cursor) {
                    next
                } else {
                    let end = self.text.len();
                    let body = content.strip_suffix('\n').unwrap_or(&content);
                    self.apply_edit(end, end, &format!("\n{body}"));
                    self.cursor = self.text.first_non_blank(end + 1);
                    return;
                }
            } else {
                self.text.line_start(self.cursor)
            };
            self.apply_edit(at, at, &content);
            self.cursor = self.text.first_non_blank(at);
        } else {
            let at = if after && !self.text.is_line_empty(self.cursor) {
                (self.cursor + 1).min(self.text.len())
            } else {
                self.cursor
            };
            let len = content.chars().count();
            self.apply_edit(at, at, &content);
            self.cursor = at + len - 1;
        }
    }

    /// `x` (and `s` with `insert`): delete up to `count` chars on the line.
    pub(crate) fn delete_chars(&mut self, count: usize, insert: bool) {
        let end = (self.cursor + count).min(self.text.line_end(self.cursor));
        if self.cursor < end {
            let taken = self.text.slice(self.cursor, end);
            self.register.set(taken, RegisterKind::Char);
            self.apply_edit(self.cursor, end, "");
        }
        if insert {
            self.enter_insert(self.cursor, 1, false);
        }
    }

    /// `D` (and `C` with `insert`): delete to the end of the line, or of
    /// the `count - 1`th line below.
    pub(crate) fn delete_to_line_end(&mut self, count: usize, insert: bool) {
        let delta = isize::try_from(count - 1).unwrap_or(isize::MAX);
        let last = motion::vertical(&self.text, self.cursor, delta, 0);
        let end = self.text.line_end(last);
        if self.cursor < end {
            let taken = self.text.slice(self.cursor, end);
            self.register.set(taken, RegisterKind::Char);
            self.apply_edit(self.cursor, end, "");
        }
        if insert {
            self.enter_insert(self.cursor, 1, false);
        }
    }

    /// `Ctrl-A` / `Ctrl-X`.
    pub(crate) fn add_to_number(&mut self, delta: i64) {
        let start = self.text.line_start(self.cursor);
        let line = self.text.slice(start, self.text.line_end(self.cursor));
        let column = self.cursor - start;
        let Some(edit) = crate::number::adjust(&line, column, delta) else {
            return;
        };
        self.apply_edit(start + edit.start, start + edit.end, &edit.replacement);
        self.cursor = start + edit.cursor();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
