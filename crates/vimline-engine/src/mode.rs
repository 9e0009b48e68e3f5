//! Vim-style modal editing.
//!
//! The engine is always in exactly one [`Mode`]:
//!
//! | Mode       | Cursor limit        | Purpose                       |
//! |------------|---------------------|-------------------------------|
//! | Normal     | on a character      | Navigation, commands          |
//! | Insert     | `0..=len`           | Typing text                   |
//! | Visual     | on a character      | Character-wise selection      |
//! | VisualLine | on a character      | Whole-line selection          |

use std::fmt;

/// The current editing mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Default mode. Keys are commands, not text input.
    #[default]
    Normal,
    /// Text entry mode. Keys produce characters in the buffer.
    Insert,
    /// `v`: character-wise selection.
    Visual,
    /// `V`: line-wise selection (always selects full lines).
    VisualLine,
}

impl Mode {
    /// Human-readable name for a status line.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Visual => "VISUAL",
            Self::VisualLine => "VISUAL LINE",
        }
    }

    /// True if the cursor can sit one-past-the-last-char of a line.
    #[inline]
    #[must_use]
    pub const fn cursor_past_end(self) -> bool {
        matches!(self, Self::Insert)
    }

    /// True for either visual sub-mode.
    #[inline]
    #[must_use]
    pub const fn is_visual(self) -> bool {
        matches!(self, Self::Visual | Self::VisualLine)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
