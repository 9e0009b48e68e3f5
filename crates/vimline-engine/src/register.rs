//! Register: storage for yanked and deleted text.
//!
//! Every yank (`y`) and delete (`d`, `x`, `dd`, `c`) copies text into the
//! register; paste (`p`, `P`) reads it back. There is exactly one register
//! (Vim's unnamed `""`).
//!
//! The register tracks whether text was captured character-wise or
//! line-wise, because paste behaves differently for each:
//!
//! - **Char-wise**: `p` inserts after the cursor, `P` at the cursor.
//! - **Line-wise**: `p` inserts whole lines below, `P` above.
//!
//! Line-wise content always ends with `\n`.

/// How the register content was captured: determines paste behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterKind {
    /// Character-wise (from `x`, `dw`, `v` visual).
    Char,

    /// Line-wise (from `dd`, `yy`, `V` visual).
    Line,
}

/// The single register slot.
#[derive(Debug, Clone)]
pub struct Register {
    /// The stored text. Empty string when nothing has been yanked yet.
    content: String,

    /// How the text was captured.
    kind: RegisterKind,
}

impl Register {
    /// Create an empty register.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            content: String::new(),
            kind: RegisterKind::Char,
        }
    }

    /// Store text, replacing any previous content. Line-wise text gets a
    /// trailing newline if it lacks one.
    pub fn set(&mut self, mut text: String, kind: RegisterKind) {
        if kind == RegisterKind::Line && !text.ends_with('\n') {
            text.push('\n');
        }
        self.content = text;
        self.kind = kind;
    }

    /// The stored text. Empty if nothing has been yanked.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// How the text was captured.
    #[must_use]
    pub const fn kind(&self) -> RegisterKind {
        self.kind
    }

    /// True for line-wise content.
    #[inline]
    #[must_use]
    pub fn is_line(&self) -> bool {
        self.kind == RegisterKind::Line
    }

    /// True if there is nothing to paste.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl Default for Register {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let reg = Register::new();
        assert!(reg.is_empty());
        assert_eq!(reg.content(), "");
        assert_eq!(reg.kind(), RegisterKind::Char);
    }

    #[test]
    fn set_char() {
        let mut reg = Register::new();
        reg.set("foo ".into(), RegisterKind::Char);
        assert_eq!(reg.content(), "foo ");
        assert!(!reg.is_line());
    }

    #[test]
    fn set_line_adds_newline() {
        let mut reg = Register::new();
        reg.set("two".into(), RegisterKind::Line);
        assert_eq!(reg.content(), "two\n");
        assert!(reg.is_line());
    }

    #[test]
    fn set_replaces() {
        let mut reg = Register::new();
        reg.set("a\n".into(), RegisterKind::Line);
        reg.set("b".into(), RegisterKind::Char);
        assert_eq!(reg.content(), "b");
        assert_eq!(reg.kind(), RegisterKind::Char);
    }
}
