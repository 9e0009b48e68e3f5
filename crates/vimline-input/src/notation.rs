// SPDX-License-Identifier: MIT
//
// Vim angle-bracket key notation.
//
// Plain characters stand for themselves; `<...>` names a special key,
// optionally prefixed with modifiers:
//
//   "dw"          d, w
//   "ihi<Esc>"    i, h, i, Escape
//   "<C-r>"       Ctrl+r
//   "<S-Left>"    Shift+Left
//   "<lt>"        a literal '<'
//
// Names are case-insensitive. A `<` with no closing `>` is an error
// rather than a literal, so typos in test scripts surface early.

use thiserror::Error;

use crate::key::{KeyCode, KeyEvent, Modifiers};

// ─── Errors ─────────────────────────────────────────────────────────────────

/// Failure to parse a key notation string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    /// A `<` at this char offset was never closed.
    #[error("unterminated key name starting at offset {0}")]
    Unterminated(usize),
    /// The text between `<` and `>` is not a known key.
    #[error("unknown key name <{0}>")]
    UnknownKey(String),
}

// ─── Parsing ────────────────────────────────────────────────────────────────

/// Parse a notation string into key events.
///
/// # Errors
///
/// Returns [`NotationError`] for an unclosed `<` or an unknown key name.
pub fn parse(input: &str) -> Result<Vec<KeyEvent>, NotationError> {
    let chars: Vec<char> = input.chars().collect();
    let mut events = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '<' {
            events.push(KeyEvent::char(chars[i]));
            i += 1;
            continue;
        }
        let close = chars[i + 1..]
            .iter()
            .position(|&c| c == '>')
            .ok_or(NotationError::Unterminated(i))?;
        let name: String = chars[i + 1..i + 1 + close].iter().collect();
        events.push(parse_name(&name)?);
        i += close + 2;
    }

    Ok(events)
}

/// Resolve the inside of one `<...>` group.
fn parse_name(name: &str) -> Result<KeyEvent, NotationError> {
    let unknown = || NotationError::UnknownKey(name.to_string());
    let mut modifiers = Modifiers::empty();
    let mut rest = name;

    // Modifier prefixes: C- S- A- M- D-. A trailing "-" is the key itself
    // (as in `<C-->`), so only strip while something follows the dash.
    while rest.len() > 2 && rest.as_bytes()[1] == b'-' {
        let flag = match rest.as_bytes()[0].to_ascii_lowercase() {
            b'c' => Modifiers::CTRL,
            b's' => Modifiers::SHIFT,
            b'a' | b'm' => Modifiers::ALT,
            b'd' => Modifiers::SUPER,
            _ => return Err(unknown()),
        };
        modifiers |= flag;
        rest = &rest[2..];
    }

    let mut chars = rest.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if name.len() == 1 {
            // `<x>` without modifiers is not a key name.
            return Err(unknown());
        }
        let ch = if modifiers.contains(Modifiers::CTRL) {
            ch.to_ascii_lowercase()
        } else {
            ch
        };
        return Ok(KeyEvent::new(KeyCode::Char(ch), modifiers));
    }

    let code = match rest.to_ascii_lowercase().as_str() {
        "esc" => KeyCode::Escape,
        "cr" | "enter" | "return" => KeyCode::Enter,
        "bs" | "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "del" | "delete" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "space" => KeyCode::Char(' '),
        "lt" => KeyCode::Char('<'),
        "bar" => KeyCode::Char('|'),
        "bslash" => KeyCode::Char('\\'),
        _ => return Err(unknown()),
    };
    Ok(KeyEvent::new(code, modifiers))
}

// ─── Formatting ─────────────────────────────────────────────────────────────

/// Render key events back into notation. Inverse of [`parse`] for every
/// event `parse` can produce.
#[must_use]
pub fn format(events: &[KeyEvent]) -> String {
    let mut out = String::new();
    for ev in events {
        format_one(&mut out, ev);
    }
    out
}

fn format_one(out: &mut String, ev: &KeyEvent) {
    let name = match ev.code {
        KeyCode::Char('<') => Some("lt"),
        KeyCode::Char(_) => None,
        KeyCode::Enter => Some("CR"),
        KeyCode::Tab => Some("Tab"),
        KeyCode::Backspace => Some("BS"),
        KeyCode::Escape => Some("Esc"),
        KeyCode::Delete => Some("Del"),
        KeyCode::Up => Some("Up"),
        KeyCode::Down => Some("Down"),
        KeyCode::Left => Some("Left"),
        KeyCode::Right => Some("Right"),
        KeyCode::Home => Some("Home"),
        KeyCode::End => Some("End"),
    };

    if ev.modifiers.is_empty() {
        match (name, ev.code) {
            (Some(name), _) => {
                out.push('<');
                out.push_str(name);
                out.push('>');
            }
            (None, KeyCode::Char(ch)) => out.push(ch),
            (None, _) => {}
        }
        return;
    }

    out.push('<');
    for (flag, prefix) in [
        (Modifiers::CTRL, "C-"),
        (Modifiers::SHIFT, "S-"),
        (Modifiers::ALT, "A-"),
        (Modifiers::SUPER, "D-"),
    ] {
        if ev.modifiers.contains(flag) {
            out.push_str(prefix);
        }
    }
    match (name, ev.code) {
        (_, KeyCode::Char('<')) => out.push('<'),
        (Some(name), _) => out.push_str(name),
        (None, KeyCode::Char(ch)) => out.push(ch),
        (None, _) => {}
    }
    out.push('>');
}

// ─── Tests ──────────────────────────────────────────────────────────────────
