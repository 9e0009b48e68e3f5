//! Commands: what a resolved key sequence means.
//!
//! The keymap tries resolve key chords into a [`Command`], a closed enum
//! the engine dispatches on by mode. Text entered through the host's
//! command line (`:`) is parsed separately into an [`ExCommand`], and
//! anything the host has to act on comes back as a [`HostRequest`].
//!
//! # Ex commands
//!
//! | Input               | Requests                 |
//! |---------------------|--------------------------|
//! | `:w`, `:write`      | `Save`                   |
//! | `:q`, `:quit`       | `Quit`                   |
//! | `:wq`               | `Save`, then `Quit`      |
//! | `:q!`, `:quit!`     | `ForceQuit`              |
//! | anything else       | `UnrecognizedCommand`    |

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Every command a key sequence can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // ── Motions ─────────────────────────────────────────────────
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    /// `gk`: up one wrapped screen row.
    MoveUpOnScreen,
    /// `gj`: down one wrapped screen row.
    MoveDownOnScreen,
    WordForward,
    BigWordForward,
    WordEnd,
    BigWordEnd,
    WordBackward,
    BigWordBackward,
    /// `0`
    LineStart,
    /// `^` / `_`
    FirstNonBlank,
    /// `$`
    LineEnd,
    /// `gg`
    GotoBegin,
    /// `G`
    GotoEnd,
    /// `f{char}`
    FindForward,
    /// `F{char}`
    FindBackward,
    /// `t{char}`
    TillForward,
    /// `T{char}`
    TillBackward,
    /// `;`
    RepeatFind,
    /// `,`
    RepeatFindReverse,
    /// `n`
    SearchNext,
    /// `N`
    SearchPrevious,
    /// `*`
    SearchWordForward,
    /// `#`
    SearchWordBackward,
    /// `%`
    MatchingBracket,
    /// `}`
    ParagraphForward,
    /// `{`
    ParagraphBackward,
    /// `` `{mark} ``
    GotoMark,

    // ── Mode changes ────────────────────────────────────────────
    /// `i`
    EnterInsert,
    /// `a`
    EnterInsertAfter,
    /// `I`
    EnterInsertLineStart,
    /// `A`
    EnterInsertLineEnd,
    /// `o`
    InsertLineBelow,
    /// `O`
    InsertLineAbove,
    /// `v`
    EnterVisual,
    /// `V`
    EnterVisualLine,
    /// `o` in visual mode: swap cursor and anchor.
    ToggleVisualCursor,
    /// `i` in visual mode: select an inner text object.
    VisualInner,
    /// `a` in visual mode: select an around text object.
    VisualAround,

    // ── Operators ───────────────────────────────────────────────
    Delete,
    Change,
    Yank,

    // ── Edits ───────────────────────────────────────────────────
    /// `x`
    DeleteChar,
    /// `s`
    DeleteCharAndInsert,
    /// `D`
    DeleteToLineEnd,
    /// `C`
    ChangeToLineEnd,
    /// `p`
    PasteForward,
    /// `P`
    PasteBackward,
    /// `~`
    ToggleCase,
    /// `Ctrl-A`
    IncrementNumber,
    /// `Ctrl-X`
    DecrementNumber,
    /// `u`
    Undo,
    /// `Ctrl-R`
    Redo,

    // ── Marks and macros ────────────────────────────────────────
    /// `m{mark}`
    SetMark,
    /// `q{name}` to start, `q` to stop.
    RecordMacro,
    /// `@{name}`, `@@`
    ReplayMacro,

    // ── Host command line ───────────────────────────────────────
    /// `:`
    CommandPrompt,
    /// `/`
    SearchPrompt,
    /// `?`
    ReverseSearchPrompt,

    // ── Insert mode ─────────────────────────────────────────────
    /// `Ctrl-W`: delete back to the previous space.
    DeletePreviousWord,
    /// `Ctrl-A`: insert the text typed in the last insert session.
    InsertLastInserted,
}

impl Command {
    /// True if the command waits for one more typed character.
    ///
    /// `q` is absent: it only takes a name when starting a recording, which
    /// the engine decides from recorder state.
    #[must_use]
    pub const fn requires_symbol(self) -> bool {
        matches!(
            self,
            Self::FindForward
                | Self::FindBackward
                | Self::TillForward
                | Self::TillBackward
                | Self::SetMark
                | Self::GotoMark
                | Self::ReplayMacro
        )
    }

    /// True if the command moves the cursor and can complete an operator.
    #[must_use]
    pub const fn is_motion(self) -> bool {
        matches!(
            self,
            Self::MoveLeft
                | Self::MoveRight
                | Self::MoveUp
                | Self::MoveDown
                | Self::MoveUpOnScreen
                | Self::MoveDownOnScreen
                | Self::WordForward
                | Self::BigWordForward
                | Self::WordEnd
                | Self::BigWordEnd
                | Self::WordBackward
                | Self::BigWordBackward
                | Self::LineStart
                | Self::FirstNonBlank
                | Self::LineEnd
                | Self::GotoBegin
                | Self::GotoEnd
                | Self::FindForward
                | Self::FindBackward
                | Self::TillForward
                | Self::TillBackward
                | Self::RepeatFind
                | Self::RepeatFindReverse
                | Self::SearchNext
                | Self::SearchPrevious
                | Self::SearchWordForward
                | Self::SearchWordBackward
                | Self::MatchingBracket
                | Self::ParagraphForward
                | Self::ParagraphBackward
                | Self::GotoMark
        )
    }

    /// True for `j`, `k`, `gj`, `gk`: they keep the desired column.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(
            self,
            Self::MoveUp | Self::MoveDown | Self::MoveUpOnScreen | Self::MoveDownOnScreen
        )
    }

    /// True if an operator over this motion acts on whole lines.
    #[must_use]
    pub const fn is_linewise(self) -> bool {
        matches!(
            self,
            Self::MoveUp | Self::MoveDown | Self::GotoBegin | Self::GotoEnd
        )
    }
}

// ---------------------------------------------------------------------------
// Host side channel
// ---------------------------------------------------------------------------

/// Which prompt the host's command-line widget is collecting text for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    /// `:`
    Command,
    /// `/`
    SearchForward,
    /// `?`
    SearchBackward,
}

impl PromptKind {
    /// The character the prompt is shown with.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Command => ':',
            Self::SearchForward => '/',
            Self::SearchBackward => '?',
        }
    }
}

/// Something the host has to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    /// Show the command-line widget; answer with `submit_prompt` or
    /// `cancel_prompt`.
    OpenPrompt(PromptKind),
    /// `:w`
    Save,
    /// `:q`
    Quit,
    /// `:q!`
    ForceQuit,
    /// A `:` command the engine doesn't know. Informational only.
    UnrecognizedCommand(String),
}

// ---------------------------------------------------------------------------
// Ex commands
// ---------------------------------------------------------------------------

/// A parsed `:` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExCommand {
    /// `:w` / `:write`
    Write,
    /// `:q` / `:quit`
    Quit,
    /// `:q!` / `:quit!`
    ForceQuit,
    /// `:wq`
    WriteQuit,
    /// Anything else, trimmed, for reporting.
    Unknown(String),
}

impl ExCommand {
    /// Parse command-line text (without the leading `:`).
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed {
            "w" | "write" => Self::Write,
            "q" | "quit" => Self::Quit,
            "q!" | "quit!" => Self::ForceQuit,
            "wq" => Self::WriteQuit,
            _ => Self::Unknown(trimmed.to_string()),
        }
    }

    /// The host requests this command produces, in order.
    #[must_use]
    pub fn requests(self) -> Vec<HostRequest> {
        match self {
            Self::Write => vec![HostRequest::Save],
            Self::Quit => vec![HostRequest::Quit],
            Self::ForceQuit => vec![HostRequest::ForceQuit],
            Self::WriteQuit => vec![HostRequest::Save, HostRequest::Quit],
            Self::Unknown(text) => vec![HostRequest::UnrecognizedCommand(text)],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
