// SPDX-License-Identifier: MIT
//
// One editing session: the engine over a `TextBuffer`, plus the host-side
// pieces the engine asks for through `HostRequest`:
//
//   OpenPrompt            → keys go to the `CommandLine` until Enter/Escape
//   Save                  → write the buffer to its file
//   Quit / ForceQuit      → stop accepting keys
//   UnrecognizedCommand   → a notice on stderr

use std::path::PathBuf;

use tracing::{debug, info, warn};
use vimline_engine::{Engine, HostRequest, KeyEvent, Options, PromptKind, TextBuffer};

use crate::prompt::{CommandLine, PromptOutcome};

pub struct Session {
    engine: Engine<TextBuffer>,
    line: CommandLine,
    /// Where `:w` writes when the buffer has no file of its own.
    save_path: Option<PathBuf>,
    quit: bool,
}

impl Session {
    pub fn new(buffer: TextBuffer, options: Options) -> Self {
        Self {
            engine: Engine::with_options(buffer, options),
            line: CommandLine::new(),
            save_path: None,
            quit: false,
        }
    }

    /// Builder: `:w` writes to `path`.
    #[must_use]
    pub fn with_save_path(mut self, path: PathBuf) -> Self {
        self.save_path = Some(path);
        self
    }

    #[inline]
    pub const fn engine(&self) -> &Engine<TextBuffer> {
        &self.engine
    }

    /// The prompt still being typed, with its text so far.
    pub fn open_prompt(&self) -> Option<(PromptKind, &str)> {
        self.line.kind().map(|kind| (kind, self.line.input()))
    }

    /// True once `:q` (or `:q!`, `:wq`) ran.
    #[inline]
    pub const fn has_quit(&self) -> bool {
        self.quit
    }

    /// Feed one key to the prompt if one is open, else to the engine.
    pub fn feed(&mut self, key: KeyEvent) {
        if self.quit {
            return;
        }
        if !self.line.is_open() {
            let requests = self.engine.handle_key(key);
            self.handle_requests(requests);
            return;
        }
        match self.line.handle_key(key) {
            PromptOutcome::Editing => {}
            PromptOutcome::Submit(input) => {
                let requests = self.engine.submit_prompt(&input);
                self.handle_requests(requests);
            }
            PromptOutcome::Cancel => self.engine.cancel_prompt(),
        }
    }

    /// Feed keys until the session quits.
    pub fn feed_all(&mut self, keys: impl IntoIterator<Item = KeyEvent>) {
        for key in keys {
            if self.quit {
                debug!("session quit; remaining keys ignored");
                break;
            }
            self.feed(key);
        }
    }

    fn handle_requests(&mut self, requests: Vec<HostRequest>) {
        for request in requests {
            match request {
                HostRequest::OpenPrompt(kind) => self.line.open(kind),
                HostRequest::Save => self.save(),
                HostRequest::Quit | HostRequest::ForceQuit => self.quit = true,
                HostRequest::UnrecognizedCommand(text) => {
                    eprintln!("vimline: not an editor command: {text}");
                }
            }
        }
    }

    fn save(&mut self) {
        let path = self.save_path.clone();
        let buffer = self.engine.host_mut();
        let result = match path {
            Some(path) => buffer.save_as(&path),
            None => buffer.save(),
        };
        match result {
            Ok(()) => info!(path = ?buffer.path(), "written"),
            Err(err) => warn!(%err, "save failed"),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vimline_input::notation;

    fn session(text: &str) -> Session {
        Session::new(TextBuffer::from_text(text), Options::default())
    }

    fn feed(session: &mut Session, keys: &str) {
        session.feed_all(notation::parse(keys).expect("valid notation"));
    }

    #[test]
    fn prompt_keys_go_to_the_command_line() {
        let mut s = session("one two one");
        feed(&mut s, "/one<CR>x");
        assert_eq!(s.engine().text().to_string(), "one two ne");
    }

    #[test]
    fn quit_stops_feeding() {
        let mut s = session("abc");
        feed(&mut s, "x:q<CR>x");
        assert!(s.has_quit());
        assert_eq!(s.engine().text().to_string(), "bc");
    }

    #[test]
    fn unfinished_prompt_is_reported() {
        let mut s = session("abc");
        feed(&mut s, "/ab");
        assert_eq!(s.open_prompt(), Some((PromptKind::SearchForward, "ab")));
    }

    #[test]
    fn escape_cancels_the_prompt() {
        let mut s = session("abc");
        feed(&mut s, ":q<Esc>x");
        assert!(!s.has_quit());
        assert_eq!(s.engine().text().to_string(), "bc");
    }

    #[test]
    fn write_saves_to_the_given_path() {
        let path = std::env::temp_dir().join(format!("vimline-session-{}.txt", std::process::id()));
        let mut s = session("abc").with_save_path(path.clone());
        feed(&mut s, "x:wq<CR>");
        assert_eq!(std::fs::read_to_string(&path).expect("saved file"), "bc");
        assert!(s.has_quit());
        std::fs::remove_file(&path).ok();
    }
}
