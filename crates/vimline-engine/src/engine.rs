//! The modal editing engine.
//!
//! [`Engine`] owns the canonical [`Text`] and all editing state, and mirrors
//! the result into a host widget through [`BufferFacade`] after every call.
//!
//! # Entry points
//!
//! | Call | Who calls it |
//! |------|--------------|
//! | [`handle_key`](Engine::handle_key) | host, for every key press |
//! | [`submit_prompt`](Engine::submit_prompt) | host, when its `:` `/` `?` line is entered |
//! | [`cancel_prompt`](Engine::cancel_prompt) | host, when that line is abandoned |
//! | [`sync_from_host`](Engine::sync_from_host) | host, after it changed text on its own |
//!
//! Every key goes through one internal `feed` step; macro replay feeds
//! stored keys through the same step, so replayed keys behave exactly like
//! typed ones.
//!
//! # Edits
//!
//! All text changes go through `apply_edit`, which opens an undo
//! transaction on first use, shifts marks, and flags the host copy as
//! stale. The transaction is committed when a key has been fully handled
//! outside Insert mode, or when Insert mode is left, so an Insert session
//! (and a whole macro replay) is one undo step.

use std::ops::Range;

use tracing::{debug, trace};
use unicode_width::UnicodeWidthChar;
use vimline_input::{KeyCode, KeyEvent};

use crate::command::{Command, ExCommand, HostRequest, PromptKind};
use crate::facade::BufferFacade;
use crate::history::{History, Snapshot};
use crate::keymap::{Keymaps, NodeId, Resolution};
use crate::macros::MacroRecorder;
use crate::mark::MarkTable;
use crate::mode::Mode;
use crate::motion::{self, FindKind};
use crate::operator::PendingOperator;
use crate::options::Options;
use crate::register::Register;
use crate::search::{SearchDirection, SearchState};
use crate::text::Text;

/// Largest repeat count honoured; longer digit runs saturate here.
pub const MAX_COUNT: usize = 99_999;

/// A command waiting for the character typed after it (`f`, `m`, `@` …).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingSymbol {
    pub command: Command,
    pub count: Option<usize>,
}

/// Bookkeeping for one Insert session.
#[derive(Debug, Default)]
pub(crate) struct InsertSession {
    /// Everything typed so far (Backspace pops).
    pub typed: String,
    /// Count the session was entered with (`3ix<Esc>`).
    pub repeat: usize,
    /// Entered with `o` / `O`: repeats go on new lines.
    pub line: bool,
}

/// A Vim-style editing engine driving a host buffer `H`.
#[derive(Debug)]
pub struct Engine<H: BufferFacade> {
    pub(crate) host: H,
    pub(crate) options: Options,
    pub(crate) keymaps: Keymaps,

    pub(crate) text: Text,
    /// The host's copy is out of date.
    pub(crate) text_dirty: bool,
    pub(crate) mode: Mode,
    pub(crate) cursor: usize,
    /// Visual-mode anchor.
    pub(crate) anchor: usize,
    /// Column kept across a run of `j` / `k`.
    pub(crate) desired_column: Option<usize>,

    // Transient key state.
    pub(crate) count: Option<usize>,
    pub(crate) trie_node: NodeId,
    pub(crate) pending: Option<PendingOperator>,
    pub(crate) awaiting: Option<PendingSymbol>,

    pub(crate) register: Register,
    pub(crate) marks: MarkTable,
    pub(crate) history: History,
    pub(crate) macros: MacroRecorder,
    pub(crate) last_find: Option<(FindKind, char)>,
    pub(crate) search: Option<SearchState>,

    pub(crate) session: InsertSession,
    pub(crate) last_inserted: String,

    pub(crate) prompt: Option<PromptKind>,
    /// Prompt text collected from replayed keys.
    pub(crate) prompt_line: String,
    pub(crate) requests: Vec<HostRequest>,
}

impl<H: BufferFacade> Engine<H> {
    /// Attach an engine with default options to `host`, adopting its text
    /// and cursor.
    #[must_use]
    pub fn new(host: H) -> Self {
        Self::with_options(host, Options::default())
    }

    /// Attach an engine to `host` with explicit options.
    #[must_use]
    pub fn with_options(host: H, options: Options) -> Self {
        let text = Text::from(host.text().as_str());
        let cursor = text.clamp_to_char(host.cursor());
        let history = History::new(options.history_capacity);
        let mut engine = Self {
            host,
            options,
            keymaps: Keymaps::vim(),
            text,
            text_dirty: false,
            mode: Mode::Normal,
            cursor,
            anchor: cursor,
            desired_column: None,
            count: None,
            trie_node: NodeId::ROOT,
            pending: None,
            awaiting: None,
            register: Register::new(),
            marks: MarkTable::new(),
            history,
            macros: MacroRecorder::new(),
            last_find: None,
            search: None,
            session: InsertSession::default(),
            last_inserted: String::new(),
            prompt: None,
            prompt_line: String::new(),
            requests: Vec::new(),
        };
        engine.sync_host();
        engine
    }

    // -- Entry points -------------------------------------------------------

    /// Process one key press. Returns what the host has to act on.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<HostRequest> {
        if self.macros.is_recording() {
            self.macros.record(key);
        }
        self.feed(key);
        self.end_of_input()
    }

    /// Answer the prompt opened by [`HostRequest::OpenPrompt`]. A no-op
    /// when no prompt is open.
    pub fn submit_prompt(&mut self, input: &str) -> Vec<HostRequest> {
        if self.prompt.is_none() {
            return Vec::new();
        }
        if self.macros.is_recording() {
            for ch in input.chars() {
                self.macros.record(KeyEvent::char(ch));
            }
            self.macros.record(KeyEvent::key(KeyCode::Enter));
        }
        self.answer_prompt(input);
        self.settle();
        self.host.request_focus();
        self.end_of_input()
    }

    /// Abandon the open prompt without running it.
    pub fn cancel_prompt(&mut self) {
        if self.prompt.is_none() {
            return;
        }
        if self.macros.is_recording() {
            self.macros.record(KeyEvent::escape());
        }
        self.close_prompt();
        self.host.request_focus();
        self.sync_host();
    }

    /// Adopt the host's text and cursor after the host changed them
    /// itself. Pending keys are dropped; the mode is kept.
    pub fn sync_from_host(&mut self) {
        self.commit_history();
        self.text = Text::from(self.host.text().as_str());
        self.cursor = self.host.cursor();
        self.text_dirty = false;
        self.reset_pending();
        self.settle();
        self.sync_host();
    }

    // -- Accessors ----------------------------------------------------------

    /// The current mode.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// The canonical text.
    #[inline]
    #[must_use]
    pub const fn text(&self) -> &Text {
        &self.text
    }

    /// Cursor offset (char index).
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// The unnamed register.
    #[inline]
    #[must_use]
    pub const fn register(&self) -> &Register {
        &self.register
    }

    /// Offset of mark `name`, if set.
    #[must_use]
    pub fn mark(&self, name: char) -> Option<usize> {
        self.marks.get(name)
    }

    /// The count typed so far, if any.
    #[inline]
    #[must_use]
    pub const fn pending_count(&self) -> Option<usize> {
        self.count
    }

    /// True while a macro is being recorded.
    #[inline]
    #[must_use]
    pub const fn is_recording(&self) -> bool {
        self.macros.is_recording()
    }

    /// The prompt the host is expected to be showing.
    #[inline]
    #[must_use]
    pub const fn pending_prompt(&self) -> Option<PromptKind> {
        self.prompt
    }

    /// The selected span in Visual modes. VisualLine spans whole lines
    /// including the last line's `\n`.
    #[must_use]
    pub fn selection(&self) -> Option<Range<usize>> {
        let lo = self.anchor.min(self.cursor);
        let hi = self.anchor.max(self.cursor);
        match self.mode {
            Mode::Visual => Some(lo..(hi + 1).min(self.text.len())),
            Mode::VisualLine => Some(
                self.text.line_start(lo)..self.text.next_line_start(hi).unwrap_or(self.text.len()),
            ),
            Mode::Normal | Mode::Insert => None,
        }
    }

    /// The options in effect.
    #[inline]
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// The host adapter.
    #[inline]
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// The host adapter, mutably. Call [`sync_from_host`](Self::sync_from_host)
    /// after changing its text.
    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // -- Key routing --------------------------------------------------------

    /// Route one key by mode. Shared by live input and macro replay.
    pub(crate) fn feed(&mut self, key: KeyEvent) {
        if self.prompt.is_some() {
            if self.macros.is_replaying() {
                self.prompt_key(key);
                return;
            }
            debug!("key arrived while a prompt was open; prompt dropped");
            self.close_prompt();
        }
        match self.mode {
            Mode::Insert => self.insert_key(key),
            Mode::Normal | Mode::Visual | Mode::VisualLine => self.normal_key(key),
        }
        self.settle();
    }

    fn end_of_input(&mut self) -> Vec<HostRequest> {
        if self.mode != Mode::Insert {
            self.commit_history();
        }
        self.sync_host();
        std::mem::take(&mut self.requests)
    }

    /// Drop every half-typed command.
    pub(crate) fn reset_pending(&mut self) {
        self.count = None;
        self.pending = None;
        self.awaiting = None;
        self.trie_node = NodeId::ROOT;
    }

    /// Keep the cursor where the mode allows it.
    pub(crate) fn settle(&mut self) {
        if self.mode.cursor_past_end() {
            self.cursor = self.cursor.min(self.text.len());
        } else {
            self.cursor = self.text.clamp_to_char(self.cursor);
            self.anchor = self.anchor.min(self.text.len());
        }
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!(from = %self.mode, to = %mode, "mode change");
            self.mode = mode;
        }
    }

    // -- Host mirror --------------------------------------------------------

    /// Push text, cursor, selection and cursor width to the host.
    pub(crate) fn sync_host(&mut self) {
        if self.text_dirty {
            self.host.set_text(&self.text.to_string());
            self.text_dirty = false;
        }
        self.host.set_cursor(self.cursor);
        match self.selection() {
            Some(span) => self.host.set_selection(span.start, span.len()),
            None => self.host.set_selection(self.cursor, 0),
        }
        let width = self.cursor_width();
        self.host.set_cursor_visual_width(width);
    }

    fn cursor_width(&self) -> u16 {
        if self.mode == Mode::Insert {
            return self.options.insert_cursor_width;
        }
        let cells = self
            .text
            .char_at(self.cursor)
            .filter(|&c| c != '\n')
            .and_then(UnicodeWidthChar::width)
            .unwrap_or(1)
            .max(1);
        u16::try_from(cells)
            .unwrap_or(u16::MAX)
            .saturating_mul(self.options.normal_cursor_width)
    }

    // -- Edits and history --------------------------------------------------

    /// Replace `[start, end)` with `with`. The one place text changes.
    pub(crate) fn apply_edit(&mut self, start: usize, end: usize, with: &str) {
        if !self.history.is_pending() {
            let before = self.snapshot();
            self.history.begin(before);
        }
        let (start, end) = self.text.replace(start, end, with);
        self.marks.shift(start, end - start, with.chars().count());
        self.text_dirty = true;
        trace!(start, end, inserted = with.len(), "edit");
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.text.to_string(),
            cursor: self.cursor,
            marks: self.marks.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.text = Text::from(snapshot.text.as_str());
        self.cursor = snapshot.cursor;
        self.marks = snapshot.marks;
        self.text_dirty = true;
        self.set_mode(Mode::Normal);
    }

    pub(crate) fn commit_history(&mut self) {
        if self.history.is_pending() {
            let text = self.text.to_string();
            self.history.commit(&text);
        }
    }

    pub(crate) fn undo(&mut self, count: usize) {
        self.commit_history();
        for _ in 0..count {
            let live = self.snapshot();
            match self.history.undo(live) {
                Some(snapshot) => self.restore(snapshot),
                None => break,
            }
        }
    }

    pub(crate) fn redo(&mut self, count: usize) {
        self.commit_history();
        for _ in 0..count {
            match self.history.redo() {
                Some(snapshot) => self.restore(snapshot),
                None => break,
            }
        }
    }

    // -- Insert mode --------------------------------------------------------

    /// Switch to Insert with the cursor at `at`. `repeat` re-types the
    /// session on exit; `line` puts each repeat on its own line.
    pub(crate) fn enter_insert(&mut self, at: usize, repeat: usize, line: bool) {
        self.cursor = at.min(self.text.len());
        self.session = InsertSession {
            typed: String::new(),
            repeat,
            line,
        };
        self.set_mode(Mode::Insert);
    }

    fn leave_insert(&mut self) {
        let session = std::mem::take(&mut self.session);
        if session.repeat > 1 && !session.typed.is_empty() {
            let unit = if session.line {
                format!("\n{}", session.typed)
            } else {
                session.typed.clone()
            };
            let extra = unit.repeat(session.repeat - 1);
            self.apply_edit(self.cursor, self.cursor, &extra);
            self.cursor += extra.chars().count();
        }
        // A replay is committed as a whole once its key has been handled.
        if !self.macros.is_replaying() {
            self.commit_history();
        }
        self.last_inserted = session.typed;
        if self.cursor > self.text.line_start(self.cursor) {
            self.cursor -= 1;
        }
        self.set_mode(Mode::Normal);
    }

    fn insert_text(&mut self, s: &str) {
        self.apply_edit(self.cursor, self.cursor, s);
        self.cursor += s.chars().count();
        self.session.typed.push_str(s);
    }

    fn insert_key(&mut self, key: KeyEvent) {
        if key.is_escape() {
            self.leave_insert();
            return;
        }
        if let Resolution::Resolved(command) =
            self.keymaps.for_mode(Mode::Insert).resolve(&key, NodeId::ROOT)
        {
            self.desired_column = None;
            self.insert_command(command);
            return;
        }

        let vertical = matches!(key.code, KeyCode::Up | KeyCode::Down);
        if !vertical {
            self.desired_column = None;
        }
        match key.code {
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.apply_edit(self.cursor - 1, self.cursor, "");
                    self.cursor -= 1;
                    self.session.typed.pop();
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.text.len() {
                    self.apply_edit(self.cursor, self.cursor + 1, "");
                }
            }
            KeyCode::Left => {
                if self.cursor > self.text.line_start(self.cursor) {
                    self.cursor -= 1;
                }
            }
            KeyCode::Right => {
                if self.cursor < self.text.line_end(self.cursor) {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => self.cursor = self.text.line_start(self.cursor),
            KeyCode::End => self.cursor = self.text.line_end(self.cursor),
            KeyCode::Up | KeyCode::Down => {
                let column = self
                    .desired_column
                    .unwrap_or_else(|| self.text.column(self.cursor));
                self.desired_column = Some(column);
                let delta = if key.code == KeyCode::Up { -1 } else { 1 };
                self.cursor = motion::vertical(&self.text, self.cursor, delta, column);
            }
            KeyCode::Char(_) | KeyCode::Enter | KeyCode::Tab | KeyCode::Escape => {
                if let Some(ch) = key.text() {
                    let mut buf = [0u8; 4];
                    self.insert_text(ch.encode_utf8(&mut buf));
                }
            }
        }
    }

    fn insert_command(&mut self, command: Command) {
        trace!(?command, "insert command");
        match command {
            Command::DeletePreviousWord => {
                let Some(i) = self.text.chars_before(self.cursor).position(|c| c == ' ') else {
                    return;
                };
                let start = self.cursor - 1 - i;
                let removed = self.cursor - start;
                self.apply_edit(start, self.cursor, "");
                self.cursor = start;
                for _ in 0..removed {
                    self.session.typed.pop();
                }
            }
            Command::InsertLastInserted => {
                let text = self.last_inserted.clone();
                self.insert_text(&text);
            }
            _ => {}
        }
    }

    // -- Prompt side channel ------------------------------------------------

    pub(crate) fn open_prompt(&mut self, kind: PromptKind) {
        debug!(prompt = %kind.prefix(), "prompt opened");
        self.prompt = Some(kind);
        self.prompt_line.clear();
        if !self.macros.is_replaying() {
            self.requests.push(HostRequest::OpenPrompt(kind));
        }
    }

    fn close_prompt(&mut self) {
        self.prompt = None;
        self.prompt_line.clear();
        self.pending = None;
    }

    /// Line editing for a prompt opened during macro replay.
    fn prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.prompt_line);
                self.answer_prompt(&line);
            }
            KeyCode::Escape => self.close_prompt(),
            KeyCode::Backspace => {
                if self.prompt_line.pop().is_none() {
                    self.close_prompt();
                }
            }
            _ => {
                if let Some(ch) = key.text() {
                    self.prompt_line.push(ch);
                }
            }
        }
    }

    fn answer_prompt(&mut self, input: &str) {
        let Some(kind) = self.prompt.take() else {
            return;
        };
        self.prompt_line.clear();
        match kind {
            PromptKind::Command => {
                self.pending = None;
                let command = ExCommand::parse(input);
                debug!(?command, "ex command");
                self.requests.extend(command.requests());
            }
            PromptKind::SearchForward | PromptKind::SearchBackward => {
                let direction = if kind == PromptKind::SearchForward {
                    SearchDirection::Forward
                } else {
                    SearchDirection::Backward
                };
                // An empty query reuses the last one, in the new direction.
                let query = if input.is_empty() {
                    self.search.as_ref().map(|s| s.query.clone())
                } else {
                    Some(input.to_string())
                };
                let Some(query) = query else {
                    self.pending = None;
                    return;
                };
                debug!(%query, ?direction, "search");
                self.search = Some(SearchState { query, direction });
                self.run_motion(Command::SearchNext, None, None);
            }
        }
    }
}
