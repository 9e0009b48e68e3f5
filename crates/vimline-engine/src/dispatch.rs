//! Normal and Visual mode key handling.
//!
//! A key is looked at in this order:
//!
//! 1. Escape cancels everything half-typed (and leaves Visual).
//! 2. A command waiting for a symbol (`f`, `m`, `q`, `@`, `` ` ``) takes
//!    the key's character.
//! 3. An operator waiting for a text object (`di`) takes the object key.
//! 4. Digits build the count (`0` only after another digit).
//! 5. Everything else walks the mode's keymap trie; a resolved
//!    [`Command`] is dispatched to exactly one handler.

use tracing::{debug, trace, warn};
use vimline_input::KeyEvent;

use crate::command::{Command, PromptKind};
use crate::engine::{Engine, MAX_COUNT, PendingSymbol};
use crate::facade::{BufferFacade, ScreenDirection};
use crate::keymap::{NodeId, Resolution};
use crate::macros::ReplayRefusal;
use crate::mode::Mode;
use crate::motion::{self, FindKind};
use crate::operator::{Motion, OperatorKind, PendingOperator};
use crate::search::{self, SearchDirection, SearchState};
use crate::text_object::{ObjectKind, Scope};
use crate::word;

/// `count` as a signed line delta.
fn lines(count: usize) -> isize {
    isize::try_from(count).unwrap_or(isize::MAX)
}

impl<H: BufferFacade> Engine<H> {
    pub(crate) fn normal_key(&mut self, key: KeyEvent) {
        if key.is_escape() {
            self.reset_pending();
            if self.mode.is_visual() {
                self.set_mode(Mode::Normal);
            }
            return;
        }

        if let Some(wait) = self.awaiting.take() {
            match key.text() {
                Some(symbol) => self.run_with_symbol(wait, symbol),
                None => self.reset_pending(),
            }
            return;
        }

        if let Some(op) = self.pending {
            if let Some(scope) = op.scope {
                self.pending = None;
                self.count = None;
                match key.text().and_then(ObjectKind::from_char) {
                    Some(kind) => self.apply_text_object(op, scope, kind),
                    None => trace!(?key, "not a text object; operator dropped"),
                }
                return;
            }
        }

        if self.trie_node.is_root() {
            if let Some(digit) = key.text().and_then(|c| c.to_digit(10)) {
                if digit != 0 || self.count.is_some() {
                    let count = self
                        .count
                        .unwrap_or(0)
                        .saturating_mul(10)
                        .saturating_add(digit as usize);
                    self.count = Some(count.min(MAX_COUNT));
                    return;
                }
            }
        }

        match self.keymaps.for_mode(self.mode).resolve(&key, self.trie_node) {
            Resolution::Partial(node) => {
                trace!(?key, "key sequence continues");
                self.trie_node = node;
            }
            Resolution::NoMatch => {
                trace!(?key, "unbound key");
                self.reset_pending();
            }
            Resolution::Resolved(command) => {
                self.trie_node = NodeId::ROOT;
                self.dispatch(command);
            }
        }
    }

    /// Run a resolved command.
    pub(crate) fn dispatch(&mut self, command: Command) {
        trace!(?command, mode = %self.mode, "dispatch");
        if !command.is_vertical() {
            self.desired_column = None;
        }

        // Under an operator only motions wait for a symbol; `m`, `q` and
        // `@` fall through to `continue_operator`, which drops the operator.
        let takes_symbol = (command.requires_symbol()
            || (command == Command::RecordMacro && !self.macros.is_recording()))
            && (self.pending.is_none() || command.is_motion());
        if takes_symbol {
            self.awaiting = Some(PendingSymbol {
                command,
                count: self.count.take(),
            });
            return;
        }

        if self.pending.is_some() {
            self.continue_operator(command);
            return;
        }

        let count = self.count.take();
        if command.is_motion() {
            self.run_motion(command, count, None);
        } else if self.mode.is_visual() {
            self.visual_command(command, count);
        } else {
            self.normal_command(command, count);
        }
    }

    fn run_with_symbol(&mut self, wait: PendingSymbol, symbol: char) {
        let PendingSymbol { command, count } = wait;
        match command {
            Command::SetMark => self.marks.set(symbol, self.cursor),
            Command::RecordMacro => {
                if self.macros.start(symbol) {
                    debug!(name = %symbol, "recording macro");
                }
            }
            Command::ReplayMacro => self.replay(symbol, count.unwrap_or(1)),
            _ => self.run_motion(command, count, Some(symbol)),
        }
    }

    /// Complete an armed operator with a motion, or just move.
    pub(crate) fn run_motion(&mut self, command: Command, count: Option<usize>, symbol: Option<char>) {
        if let Some(op) = self.pending.take() {
            self.operate_over_motion(op, command, count, symbol);
            return;
        }
        if let Some(motion) = self.motion(command, count, symbol, false) {
            self.cursor = motion.target;
        }
        if command == Command::LineEnd {
            // `$` then `j` stays at line ends.
            self.desired_column = Some(usize::MAX);
        }
    }

    // -----------------------------------------------------------------------
    // Motions
    // -----------------------------------------------------------------------

    /// Where `command` moves the cursor. `operator` is set when the motion
    /// completes an operator, which lets `l` reach the line end and makes
    /// `w` stop at the end of the last word's line. `None` means the motion
    /// fails (no match, unset mark, no screen rows).
    pub(crate) fn motion(
        &mut self,
        command: Command,
        count: Option<usize>,
        symbol: Option<char>,
        operator: bool,
    ) -> Option<Motion> {
        let n = count.unwrap_or(1);
        let pos = self.cursor;
        let text = &self.text;

        let motion = match command {
            Command::MoveLeft => Motion::exclusive(pos.saturating_sub(n).max(text.line_start(pos))),
            Command::MoveRight => {
                let end = text.line_end(pos);
                let limit = if operator {
                    end
                } else {
                    end.saturating_sub(1).max(text.line_start(pos))
                };
                Motion::exclusive(pos.saturating_add(n).min(limit).max(pos))
            }
            Command::MoveUp | Command::MoveDown => {
                let column = self.desired_column.unwrap_or_else(|| text.column(pos));
                self.desired_column = Some(column);
                let delta = if command == Command::MoveUp {
                    -lines(n)
                } else {
                    lines(n)
                };
                Motion::exclusive(motion::vertical(&self.text, pos, delta, column))
            }
            Command::MoveUpOnScreen | Command::MoveDownOnScreen => {
                let direction = if command == Command::MoveUpOnScreen {
                    ScreenDirection::Up
                } else {
                    ScreenDirection::Down
                };
                self.sync_host();
                let mut target = pos;
                for _ in 0..n {
                    self.host.set_cursor(target);
                    target = self.host.move_by_screen_line(direction)?;
                }
                Motion::exclusive(target)
            }
            Command::WordForward | Command::BigWordForward => {
                let big = command == Command::BigWordForward;
                self.word_forward_motion(n, big, operator)
            }
            Command::WordEnd | Command::BigWordEnd => {
                let big = command == Command::BigWordEnd;
                Motion::inclusive(repeat(n, pos, |p| word::word_end(text, p, big)))
            }
            Command::WordBackward | Command::BigWordBackward => {
                let big = command == Command::BigWordBackward;
                Motion::exclusive(repeat(n, pos, |p| word::word_backward(text, p, big)))
            }
            Command::LineStart => Motion::exclusive(motion::line_start(text, pos)),
            Command::FirstNonBlank => Motion::exclusive(motion::first_non_blank(text, pos)),
            Command::LineEnd => {
                let line = motion::vertical(text, pos, lines(n.saturating_sub(1)), 0);
                Motion::inclusive(motion::line_end(text, line))
            }
            Command::GotoBegin => {
                let line = count.map_or(0, |c| c.saturating_sub(1));
                Motion::exclusive(motion::goto_line(text, line))
            }
            Command::GotoEnd => {
                let line = count.map_or(usize::MAX, |c| c.saturating_sub(1));
                Motion::exclusive(motion::goto_line(text, line))
            }
            Command::FindForward
            | Command::FindBackward
            | Command::TillForward
            | Command::TillBackward => {
                let kind = match command {
                    Command::FindForward => FindKind::Forward,
                    Command::FindBackward => FindKind::Backward,
                    Command::TillForward => FindKind::TillForward,
                    _ => FindKind::TillBackward,
                };
                let target = symbol?;
                self.last_find = Some((kind, target));
                self.find_motion(kind, target, n)?
            }
            Command::RepeatFind | Command::RepeatFindReverse => {
                let (kind, target) = self.last_find?;
                let kind = if command == Command::RepeatFindReverse {
                    kind.opposite()
                } else {
                    kind
                };
                self.find_motion(kind, target, n)?
            }
            Command::SearchNext | Command::SearchPrevious => {
                let state = self.search.as_ref()?;
                let direction = state.effective_direction(command == Command::SearchPrevious);
                let query = state.query.clone();
                self.search_motion(&query, direction, n)?
            }
            Command::SearchWordForward | Command::SearchWordBackward => {
                let query = search::word_under_cursor(text, pos)?;
                let direction = if command == Command::SearchWordForward {
                    SearchDirection::Forward
                } else {
                    SearchDirection::Backward
                };
                debug!(%query, ?direction, "search word under cursor");
                self.search = Some(SearchState {
                    query: query.clone(),
                    direction,
                });
                self.search_motion(&query, direction, n)?
            }
            Command::MatchingBracket => {
                let target = motion::matching_bracket(text, pos);
                if target == pos {
                    return None;
                }
                Motion::inclusive(target)
            }
            Command::ParagraphForward => {
                Motion::exclusive(repeat(n, pos, |p| motion::paragraph_forward(text, p)))
            }
            Command::ParagraphBackward => {
                Motion::exclusive(repeat(n, pos, |p| motion::paragraph_backward(text, p)))
            }
            Command::GotoMark => {
                let offset = self.marks.get(symbol?)?;
                Motion::exclusive(offset.min(text.len()))
            }
            _ => return None,
        };
        if command.is_linewise() {
            return Some(Motion::linewise(motion.target));
        }
        Some(motion)
    }

    /// `w` / `W`. Under an operator the last word never drags the next
    /// line in: the span stops at the end of the line that word is on, and
    /// a `w` with nowhere to go reaches the end of the buffer.
    fn word_forward_motion(&self, count: usize, big: bool, operator: bool) -> Motion {
        let mut pos = self.cursor;
        let mut last_from = pos;
        for _ in 0..count {
            let next = word::word_forward(&self.text, pos, big);
            if next == pos {
                if operator {
                    last_from = pos;
                    pos = self.text.len();
                }
                break;
            }
            last_from = pos;
            pos = next;
        }
        if operator {
            let line_end = self.text.line_end(last_from);
            if line_end > last_from && pos > line_end {
                pos = line_end;
            }
        }
        Motion::exclusive(pos)
    }

    fn find_motion(&self, kind: FindKind, target: char, count: usize) -> Option<Motion> {
        let mut pos = self.cursor;
        for _ in 0..count {
            let next = motion::find_char(&self.text, pos, kind, target);
            if next == pos {
                break;
            }
            pos = next;
        }
        if pos == self.cursor {
            return None;
        }
        Some(if kind.is_inclusive() {
            Motion::inclusive(pos)
        } else {
            Motion::exclusive(pos)
        })
    }

    fn search_motion(&self, query: &str, direction: SearchDirection, count: usize) -> Option<Motion> {
        let ignore_case = self.options.ignore_case;
        let wrap = self.options.wrap_scan;
        if count <= 1 {
            return search::search(&self.text, query, self.cursor, direction, ignore_case, wrap)
                .map(Motion::exclusive);
        }
        let matches = search::find_all(&self.text, query, ignore_case);
        let mut pos = self.cursor;
        for _ in 0..count {
            pos = search::nearest(&matches, pos, direction, wrap)?;
        }
        Some(Motion::exclusive(pos))
    }

    // -----------------------------------------------------------------------
    // Normal mode
    // -----------------------------------------------------------------------

    fn normal_command(&mut self, command: Command, count: Option<usize>) {
        let n = count.unwrap_or(1);
        let cursor = self.cursor;
        match command {
            Command::EnterInsert => self.enter_insert(cursor, n, false),
            Command::EnterInsertAfter => {
                let at = (cursor + 1).min(self.text.line_end(cursor));
                self.enter_insert(at, n, false);
            }
            Command::EnterInsertLineStart => {
                self.enter_insert(self.text.line_start(cursor), n, false);
            }
            Command::EnterInsertLineEnd => self.enter_insert(self.text.line_end(cursor), n, false),
            Command::InsertLineBelow => {
                let at = self.text.line_end(cursor);
                self.apply_edit(at, at, "\n");
                self.enter_insert(at + 1, n, true);
            }
            Command::InsertLineAbove => {
                let at = self.text.line_start(cursor);
                self.apply_edit(at, at, "\n");
                self.enter_insert(at, n, true);
            }
            Command::EnterVisual | Command::EnterVisualLine => {
                self.anchor = cursor;
                let mode = if command == Command::EnterVisual {
                    Mode::Visual
                } else {
                    Mode::VisualLine
                };
                self.set_mode(mode);
            }
            Command::Delete | Command::Change | Command::Yank => {
                if let Some(kind) = OperatorKind::from_command(command) {
                    self.pending = Some(PendingOperator::new(kind, count));
                }
            }
            Command::DeleteChar => self.delete_chars(n, false),
            Command::DeleteCharAndInsert => self.delete_chars(n, true),
            Command::DeleteToLineEnd => self.delete_to_line_end(n, false),
            Command::ChangeToLineEnd => self.delete_to_line_end(n, true),
            Command::PasteForward => self.paste(true, n),
            Command::PasteBackward => self.paste(false, n),
            Command::ToggleCase => {
                let end = (cursor + n).min(self.text.line_end(cursor));
                self.toggle_case(cursor, end);
                self.cursor = end;
            }
            Command::IncrementNumber => self.add_to_number(i64::try_from(n).unwrap_or(i64::MAX)),
            Command::DecrementNumber => self.add_to_number(-i64::try_from(n).unwrap_or(i64::MAX)),
            Command::Undo => self.undo(n),
            Command::Redo => self.redo(n),
            Command::RecordMacro => self.stop_recording(),
            Command::CommandPrompt => self.open_prompt(PromptKind::Command),
            Command::SearchPrompt => self.open_prompt(PromptKind::SearchForward),
            Command::ReverseSearchPrompt => self.open_prompt(PromptKind::SearchBackward),
            _ => trace!(?command, "no effect in normal mode"),
        }
    }

    // -----------------------------------------------------------------------
    // Visual mode
    // -----------------------------------------------------------------------

    fn visual_command(&mut self, command: Command, count: Option<usize>) {
        match command {
            Command::EnterVisual => self.toggle_visual(Mode::Visual),
            Command::EnterVisualLine => self.toggle_visual(Mode::VisualLine),
            Command::ToggleVisualCursor => std::mem::swap(&mut self.anchor, &mut self.cursor),
            Command::VisualInner => self.pending = Some(PendingOperator::visual(Scope::Inside)),
            Command::VisualAround => self.pending = Some(PendingOperator::visual(Scope::Around)),
            Command::Delete | Command::DeleteChar | Command::DeleteToLineEnd => {
                self.visual_operate(OperatorKind::Delete);
            }
            Command::Change | Command::DeleteCharAndInsert | Command::ChangeToLineEnd => {
                self.visual_operate(OperatorKind::Change);
            }
            Command::Yank => self.visual_operate(OperatorKind::Yank),
            Command::ToggleCase => self.visual_toggle_case(),
            Command::PasteForward | Command::PasteBackward => self.visual_replace(),
            Command::RecordMacro => self.stop_recording(),
            Command::CommandPrompt => self.open_prompt(PromptKind::Command),
            Command::SearchPrompt => self.open_prompt(PromptKind::SearchForward),
            Command::ReverseSearchPrompt => self.open_prompt(PromptKind::SearchBackward),
            _ => trace!(?command, ?count, "no effect in visual mode"),
        }
    }

    /// `v` / `V` inside Visual: same kind leaves, the other switches.
    fn toggle_visual(&mut self, mode: Mode) {
        if self.mode == mode {
            self.set_mode(Mode::Normal);
        } else {
            self.set_mode(mode);
        }
    }

    // -----------------------------------------------------------------------
    // Macros
    // -----------------------------------------------------------------------

    fn stop_recording(&mut self) {
        if let Some((name, keys)) = self.macros.stop() {
            debug!(%name, keys, "macro recorded");
        }
    }

    /// `@{name}` × `count`: feed the stored keys back through `feed`.
    fn replay(&mut self, name: char, count: usize) {
        match self.macros.begin_replay(name) {
            Ok((name, keys)) => {
                debug!(%name, keys = keys.len(), count, "replaying macro");
                for _ in 0..count {
                    for &key in &keys {
                        self.feed(key);
                    }
                }
                self.macros.finish_replay();
            }
            Err(ReplayRefusal::Unknown) => trace!(%name, "no such macro"),
            Err(reason) => warn!(%name, ?reason, "macro replay refused"),
        }
    }
}

/// Apply `step` up to `count` times, stopping early once it stalls.
fn repeat(count: usize, start: usize, step: impl Fn(usize) -> usize) -> usize {
    let mut pos = start;
    for _ in 0..count {
        let next = step(pos);
        if next == pos {
            break;
        }
        pos = next;
    }
    pos
}
