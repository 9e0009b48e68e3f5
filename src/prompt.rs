// SPDX-License-Identifier: MIT
//
// The host-side command line for `:`, `/` and `?`.
//
// The engine only asks for a prompt (`HostRequest::OpenPrompt`) and takes
// the finished text back; typing into it is the host's job. This is the
// small line editor that does it: a string with a cursor, edited by the
// keys that arrive while the prompt is open.

use vimline_engine::{KeyCode, KeyEvent, PromptKind};

/// What a key did to the open prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// Still editing.
    Editing,
    /// Enter: the text to submit.
    Submit(String),
    /// Escape, or Backspace on an empty line.
    Cancel,
}

/// The command-line input buffer.
#[derive(Debug, Clone, Default)]
pub struct CommandLine {
    kind: Option<PromptKind>,
    /// Text without the leading `:` / `/` / `?`.
    input: String,
    /// Char offset within `input`.
    cursor: usize,
}

impl CommandLine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or reopen) the line for `kind`, empty.
    pub fn open(&mut self, kind: PromptKind) {
        self.kind = Some(kind);
        self.input.clear();
        self.cursor = 0;
    }

    /// The prompt being edited, if any.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> Option<PromptKind> {
        self.kind
    }

    #[inline]
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.kind.is_some()
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Apply one key. Submitting or cancelling closes the line.
    pub fn handle_key(&mut self, key: KeyEvent) -> PromptOutcome {
        match key.code {
            KeyCode::Enter => {
                self.kind = None;
                self.cursor = 0;
                return PromptOutcome::Submit(std::mem::take(&mut self.input));
            }
            KeyCode::Escape => {
                self.close();
                return PromptOutcome::Cancel;
            }
            KeyCode::Backspace => {
                if self.input.is_empty() {
                    self.close();
                    return PromptOutcome::Cancel;
                }
                self.backspace();
            }
            KeyCode::Delete => {
                self.delete();
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => {
                if self.cursor < self.input.chars().count() {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.chars().count(),
            KeyCode::Char(_) | KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
                if let Some(ch) = key.text() {
                    self.insert_char(ch);
                }
            }
        }
        PromptOutcome::Editing
    }

    fn insert_char(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.input.insert(at, ch);
        self.cursor += 1;
    }

    fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.input.remove(at);
        true
    }

    fn delete(&mut self) -> bool {
        if self.cursor >= self.input.chars().count() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.input.remove(at);
        true
    }

    fn close(&mut self) {
        self.kind = None;
        self.input.clear();
        self.cursor = 0;
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map_or(self.input.len(), |(b, _)| b)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
