//! Macro recording and replay bookkeeping.
//!
//! `q{name}` starts recording, `q` stops; `@{name}` replays and `@@`
//! replays the last one. The recorder only stores key chords. Replay is
//! driven by the engine, which feeds each stored chord back through its
//! normal key entry point.
//!
//! Two guards keep replay finite:
//!
//! - nothing can be replayed while a recording is in progress;
//! - a macro that is already being replayed can't start again from inside
//!   itself (`qa@aq` would otherwise loop forever on replay).

use std::collections::HashMap;

use vimline_input::KeyEvent;

/// True for the names `q` and `@` accept.
#[inline]
#[must_use]
pub const fn is_valid_name(name: char) -> bool {
    name.is_ascii_alphanumeric()
}

/// Recorder state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum State {
    #[default]
    Idle,
    Recording {
        name: char,
        events: Vec<KeyEvent>,
    },
}

/// Why a replay request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayRefusal {
    /// `@` was used while recording.
    Recording,
    /// The macro is already on the replay stack.
    Recursive,
    /// No macro stored under that name (or `@@` with no previous replay).
    Unknown,
}

/// Stored macros plus the current recording.
#[derive(Debug, Default)]
pub struct MacroRecorder {
    state: State,
    macros: HashMap<char, Vec<KeyEvent>>,
    last_replayed: Option<char>,
    replaying: Vec<char>,
}

impl MacroRecorder {
    /// Create a recorder with no macros.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a `q{name}` recording is active.
    #[inline]
    #[must_use]
    pub const fn is_recording(&self) -> bool {
        matches!(self.state, State::Recording { .. })
    }

    /// The name being recorded, if any.
    #[must_use]
    pub const fn recording_name(&self) -> Option<char> {
        match self.state {
            State::Recording { name, .. } => Some(name),
            State::Idle => None,
        }
    }

    /// Begin recording into `name`. Returns `false` (and does nothing) for
    /// an invalid name or while already recording.
    pub fn start(&mut self, name: char) -> bool {
        if !is_valid_name(name) || self.is_recording() {
            return false;
        }
        self.state = State::Recording {
            name,
            events: Vec::new(),
        };
        true
    }

    /// Append a chord to the active recording. No-op when idle.
    pub fn record(&mut self, key: KeyEvent) {
        if let State::Recording { events, .. } = &mut self.state {
            events.push(key);
        }
    }

    /// Finish the recording, dropping the final chord (the `q` that
    /// stopped it). Stores the macro, overwriting any previous one of the
    /// same name, and returns its name and length.
    pub fn stop(&mut self) -> Option<(char, usize)> {
        match std::mem::take(&mut self.state) {
            State::Recording { name, mut events } => {
                events.pop();
                let len = events.len();
                self.macros.insert(name, events);
                Some((name, len))
            }
            State::Idle => None,
        }
    }

    /// The stored chords of `name`.
    #[must_use]
    pub fn get(&self, name: char) -> Option<&[KeyEvent]> {
        self.macros.get(&name).map(Vec::as_slice)
    }

    /// Start replaying `name` (`'@'` means the last replayed macro).
    ///
    /// On success the name is pushed on the replay stack and the chords are
    /// returned; the caller feeds them and then calls
    /// [`finish_replay`](Self::finish_replay).
    ///
    /// # Errors
    ///
    /// Returns the [`ReplayRefusal`] reason when the replay must not run.
    pub fn begin_replay(&mut self, name: char) -> Result<(char, Vec<KeyEvent>), ReplayRefusal> {
        if self.is_recording() {
            return Err(ReplayRefusal::Recording);
        }
        let name = if name == '@' {
            self.last_replayed.ok_or(ReplayRefusal::Unknown)?
        } else {
            name
        };
        if self.replaying.contains(&name) {
            return Err(ReplayRefusal::Recursive);
        }
        let events = self.macros.get(&name).ok_or(ReplayRefusal::Unknown)?.clone();
        self.replaying.push(name);
        self.last_replayed = Some(name);
        Ok((name, events))
    }

    /// Pop the innermost replay.
    pub fn finish_replay(&mut self) {
        self.replaying.pop();
    }

    /// True while any macro is being replayed.
    #[must_use]
    pub fn is_replaying(&self) -> bool {
        !self.replaying.is_empty()
    }
}
