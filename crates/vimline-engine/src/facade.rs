//! The host boundary.
//!
//! The engine owns the canonical text and mirrors every change into a
//! host widget through [`BufferFacade`]. The host owns rendering, focus and
//! layout; the only layout question the engine ever asks is
//! [`move_by_screen_line`](BufferFacade::move_by_screen_line), used by
//! `gj` / `gk`.
//!
//! Two adapters ship with the crate in [`crate::adapter`]: a single-line
//! [`LineBuffer`](crate::adapter::LineBuffer) and a multi-line, optionally
//! soft-wrapped [`TextBuffer`](crate::adapter::TextBuffer).

/// Direction of a screen-row move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenDirection {
    Up,
    Down,
}

/// A selected span as the host reports it. `end` is exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub begin: usize,
    pub end: usize,
    pub text: String,
}

impl Selection {
    /// True if nothing is selected.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

/// What the engine needs from a host text widget.
///
/// All offsets are char indices into the text.
pub trait BufferFacade {
    /// The whole text.
    fn text(&self) -> String;

    /// Replace the whole text. The host should keep the cursor in range.
    fn set_text(&mut self, text: &str);

    /// Cursor offset.
    fn cursor(&self) -> usize;

    /// Move the cursor, clamped by the host to the text length.
    fn set_cursor(&mut self, offset: usize);

    /// Select `len` chars starting at `begin`. `len == 0` clears the
    /// selection.
    fn set_selection(&mut self, begin: usize, len: usize);

    /// The current selection.
    fn selection(&self) -> Selection;

    /// The offset one wrapped screen row above or below the cursor.
    ///
    /// `None` means the host has no notion of screen rows (a single-line
    /// field) and the motion is a no-op.
    fn move_by_screen_line(&self, direction: ScreenDirection) -> Option<usize>;

    /// Styling hook: cursor width in cells (0 = thin bar).
    fn set_cursor_visual_width(&mut self, cells: u16);

    /// Ask the host to give the widget keyboard focus.
    fn request_focus(&mut self);
}
