//! Host adapters shipped with the engine.
//!
//! - [`LineBuffer`]: a single-line field backed by a `String`. It has no
//!   screen rows, so `gj` / `gk` do nothing.
//! - [`TextBuffer`]: a multi-line buffer backed by the same rope [`Text`]
//!   the engine uses, with optional soft wrapping at a display width
//!   (`unicode-width` columns, wide CJK chars count as 2). It can load from
//!   and save to a file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use unicode_width::UnicodeWidthChar;

use crate::facade::{BufferFacade, ScreenDirection, Selection};
use crate::text::Text;

fn char_count(s: &str) -> usize {
    s.chars().count()
}

/// Byte index of char `idx` in `s`, clamped to `s.len()`.
fn byte_index(s: &str, idx: usize) -> usize {
    s.char_indices().nth(idx).map_or(s.len(), |(b, _)| b)
}

fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

// ---------------------------------------------------------------------------
// LineBuffer
// ---------------------------------------------------------------------------

/// A single-line text field.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    text: String,
    cursor: usize,
    selection: (usize, usize),
    cursor_width: u16,
    focus_requests: usize,
}

impl LineBuffer {
    /// An empty field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A field holding `text`, cursor at 0.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    /// The width last passed to the cursor styling hook.
    #[inline]
    #[must_use]
    pub const fn cursor_width(&self) -> u16 {
        self.cursor_width
    }

    /// How many times focus was requested.
    #[inline]
    #[must_use]
    pub const fn focus_requests(&self) -> usize {
        self.focus_requests
    }
}

impl BufferFacade for LineBuffer {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        text.clone_into(&mut self.text);
        self.cursor = self.cursor.min(char_count(&self.text));
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(char_count(&self.text));
    }

    fn set_selection(&mut self, begin: usize, len: usize) {
        self.selection = (begin, len);
    }

    fn selection(&self) -> Selection {
        let (begin, len) = self.selection;
        let start = byte_index(&self.text, begin);
        let end = byte_index(&self.text, begin + len);
        Selection {
            begin,
            end: begin + len,
            text: self.text[start..end].to_string(),
        }
    }

    fn move_by_screen_line(&self, _direction: ScreenDirection) -> Option<usize> {
        None
    }

    fn set_cursor_visual_width(&mut self, cells: u16) {
        self.cursor_width = cells;
    }

    fn request_focus(&mut self) {
        self.focus_requests += 1;
    }
}

// ---------------------------------------------------------------------------
// TextBuffer
// ---------------------------------------------------------------------------

/// A multi-line buffer with optional soft wrap.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: Text,
    cursor: usize,
    selection: (usize, usize),
    /// Soft-wrap width in display columns; `None` disables wrapping.
    wrap_width: Option<usize>,
    cursor_width: u16,
    focus_requests: usize,
    path: Option<PathBuf>,
    modified: bool,
}

impl TextBuffer {
    /// An empty, unwrapped buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer holding `text`, cursor at 0.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            text: Text::from(text),
            ..Self::default()
        }
    }

    /// Load a file. The path is remembered for [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read as UTF-8.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self {
            text: Text::from(text.as_str()),
            path: Some(path.to_path_buf()),
            ..Self::default()
        })
    }

    /// Builder: wrap rows at `width` display columns (0 disables).
    #[must_use]
    pub const fn with_wrap(mut self, width: usize) -> Self {
        self.wrap_width = if width == 0 { None } else { Some(width) };
        self
    }

    /// Current wrap width.
    #[inline]
    #[must_use]
    pub const fn wrap_width(&self) -> Option<usize> {
        self.wrap_width
    }

    /// The width last passed to the cursor styling hook.
    #[inline]
    #[must_use]
    pub const fn cursor_width(&self) -> u16 {
        self.cursor_width
    }

    /// How many times focus was requested.
    #[inline]
    #[must_use]
    pub const fn focus_requests(&self) -> usize {
        self.focus_requests
    }

    /// The file this buffer saves to.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// True if the text changed since load or the last save.
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Write the text back to its file.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer has no path or the write fails.
    pub fn save(&mut self) -> io::Result<()> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "buffer has no file path"))?;
        self.save_as(&path)
    }

    /// Write the text to `path` and remember it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn save_as(&mut self, path: &Path) -> io::Result<()> {
        fs::write(path, self.text.to_string())?;
        self.path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    // -- Layout -------------------------------------------------------------

    /// The screen rows of the line containing `pos`, as `[start, end)`
    /// char ranges. An unwrapped or empty line is a single row.
    fn rows(&self, pos: usize) -> Vec<(usize, usize)> {
        let start = self.text.line_start(pos);
        let end = self.text.line_end(pos);
        let Some(width) = self.wrap_width else {
            return vec![(start, end)];
        };

        let mut rows = Vec::new();
        let mut row_start = start;
        let mut col = 0;
        for (i, ch) in self.text.chars_from(start).take(end - start).enumerate() {
            let at = start + i;
            let w = char_width(ch);
            if col + w > width && at > row_start {
                rows.push((row_start, at));
                row_start = at;
                col = 0;
            }
            col += w;
        }
        rows.push((row_start, end));
        rows
    }

    fn display_width(&self, start: usize, end: usize) -> usize {
        self.text
            .chars_from(start)
            .take(end.saturating_sub(start))
            .map(char_width)
            .sum()
    }

    /// The offset in `row` at display column `col`, clamped to the row's
    /// last char.
    fn offset_in_row(&self, (start, end): (usize, usize), col: usize) -> usize {
        let mut pos = start;
        let mut acc = 0;
        for ch in self.text.chars_from(start).take(end - start) {
            let w = char_width(ch);
            if acc + w > col {
                break;
            }
            acc += w;
            pos += 1;
        }
        if pos >= end && end > start { end - 1 } else { pos }
    }
}

impl BufferFacade for TextBuffer {
    fn text(&self) -> String {
        self.text.to_string()
    }

    fn set_text(&mut self, text: &str) {
        let next = Text::from(text);
        if next != self.text {
            self.text = next;
            self.modified = true;
        }
        self.cursor = self.cursor.min(self.text.len());
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.text.len());
    }

    fn set_selection(&mut self, begin: usize, len: usize) {
        self.selection = (begin, len);
    }

    fn selection(&self) -> Selection {
        let (begin, len) = self.selection;
        Selection {
            begin,
            end: begin + len,
            text: self.text.slice(begin, begin + len),
        }
    }

    fn move_by_screen_line(&self, direction: ScreenDirection) -> Option<usize> {
        let pos = self.cursor;
        let rows = self.rows(pos);
        let idx = rows.iter().rposition(|&(s, _)| s <= pos).unwrap_or(0);
        let col = self.display_width(rows[idx].0, pos);

        let target = match direction {
            ScreenDirection::Down if idx + 1 < rows.len() => rows[idx + 1],
            ScreenDirection::Down => match self.text.next_line_start(pos) {
                Some(next) => self.rows(next)[0],
                None => return Some(pos),
            },
            ScreenDirection::Up if idx > 0 => rows[idx - 1],
            ScreenDirection::Up => match self.text.prev_line_start(pos) {
                Some(prev) => *self.rows(prev).last()?,
                None => return Some(pos),
            },
        };
        Some(self.offset_in_row(target, col))
    }

    fn set_cursor_visual_width(&mut self, cells: u16) {
        self.cursor_width = cells;
    }

    fn request_focus(&mut self) {
        self.focus_requests += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn at(mut buf: TextBuffer, cursor: usize) -> TextBuffer {
        buf.set_cursor(cursor);
        buf
    }

    // -- LineBuffer -------------------------------------------------------

    #[test]
    fn line_buffer_basics() {
        let mut buf = LineBuffer::from_text("héllo");
        buf.set_cursor(99);
        assert_eq!(buf.cursor(), 5);
        buf.set_selection(1, 3);
        let sel = buf.selection();
        assert_eq!((sel.begin, sel.end), (1, 4));
        assert_eq!(sel.text, "éll");
    }

    #[test]
    fn line_buffer_has_no_screen_rows() {
        let buf = LineBuffer::from_text("abc");
        assert_eq!(buf.move_by_screen_line(ScreenDirection::Down), None);
    }

    #[test]
    fn line_buffer_set_text_clamps_cursor() {
        let mut buf = LineBuffer::from_text("abcdef");
        buf.set_cursor(6);
        buf.set_text("ab");
        assert_eq!(buf.cursor(), 2);
    }

    // -- TextBuffer rows --------------------------------------------------

    #[test]
    fn unwrapped_rows_are_lines() {
        let buf = TextBuffer::from_text("abcdef\nxy");
        assert_eq!(buf.rows(2), vec![(0, 6)]);
        assert_eq!(buf.rows(8), vec![(7, 9)]);
    }

    #[test]
    fn wrapped_rows() {
        let buf = TextBuffer::from_text("abcdefg").with_wrap(3);
        assert_eq!(buf.rows(0), vec![(0, 3), (3, 6), (6, 7)]);
    }

    #[test]
    fn wide_chars_wrap_by_width() {
        // Each CJK char is two columns wide.
        let buf = TextBuffer::from_text("日本語").with_wrap(4);
        assert_eq!(buf.rows(0), vec![(0, 2), (2, 3)]);
    }

    #[test]
    fn empty_line_is_one_row() {
        let buf = TextBuffer::from_text("a\n\nb").with_wrap(3);
        assert_eq!(buf.rows(2), vec![(2, 2)]);
    }

    // -- TextBuffer screen moves ------------------------------------------

    #[test]
    fn down_within_wrapped_line() {
        let buf = at(TextBuffer::from_text("abcdefg").with_wrap(3), 1);
        assert_eq!(buf.move_by_screen_line(ScreenDirection::Down), Some(4));
    }

    #[test]
    fn down_clamps_to_short_row() {
        let buf = at(TextBuffer::from_text("abcdefg").with_wrap(3), 5);
        assert_eq!(buf.move_by_screen_line(ScreenDirection::Down), Some(6));
    }

    #[test]
    fn up_into_previous_lines_last_row() {
        let buf = at(TextBuffer::from_text("abcdefg\nxyz").with_wrap(3), 9);
        assert_eq!(buf.move_by_screen_line(ScreenDirection::Up), Some(6));
    }

    #[test]
    fn unwrapped_moves_by_line() {
        let buf = at(TextBuffer::from_text("abcd\nxy"), 3);
        assert_eq!(buf.move_by_screen_line(ScreenDirection::Down), Some(6));
    }

    #[test]
    fn edges_stay() {
        let buf = at(TextBuffer::from_text("ab\ncd"), 1);
        assert_eq!(buf.move_by_screen_line(ScreenDirection::Up), Some(1));
        let buf = at(TextBuffer::from_text("ab\ncd"), 4);
        assert_eq!(buf.move_by_screen_line(ScreenDirection::Down), Some(4));
    }

    // -- TextBuffer files -------------------------------------------------

    #[test]
    fn set_text_marks_modified() {
        let mut buf = TextBuffer::from_text("a");
        buf.set_text("a");
        assert!(!buf.is_modified());
        buf.set_text("b");
        assert!(buf.is_modified());
    }

    #[test]
    fn save_without_path_fails() {
        let mut buf = TextBuffer::from_text("x");
        assert!(buf.save().is_err());
    }

    #[test]
    fn save_and_reload() {
        let path = std::env::temp_dir().join(format!("vimline-adapter-{}.txt", std::process::id()));
        let mut buf = TextBuffer::from_text("one\ntwo");
        buf.set_text("one\ntwo!");
        buf.save_as(&path).expect("save");
        assert!(!buf.is_modified());
        let loaded = TextBuffer::from_file(&path).expect("load");
        assert_eq!(loaded.text(), "one\ntwo!");
        assert_eq!(loaded.path(), Some(path.as_path()));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file() {
        assert!(TextBuffer::from_file(Path::new("/nonexistent/vimline.txt")).is_err());
    }
}
