// SPDX-License-Identifier: MIT
//
// Vim scriptout decoder.
//
// `vim -W file` logs every typed key as raw bytes. Printable input is
// plain UTF-8 and control keys are their ASCII control codes, but keys
// with no byte of their own are written as a three-byte special-key
// triplet: `K_SPECIAL` (0x80) followed by a two-byte termcap name.
//
//   0x80 'k' 'b'     Backspace
//   0x80 'k' 'u'     Up         (kd, kl, kr for the other arrows)
//   0x80 'k' 'D'     Delete
//   0x80 'k' 'h'     Home
//   0x80 '@' '7'     End
//   0x80 0xFC m      modifier mask applied to the next key
//   0x80 0xFE 'X'    a literal 0x80 byte inside a UTF-8 sequence
//
// Unknown triplets (focus events, mouse, KS_EXTRA codes) are skipped.
//
// # Design
//
// Same shape as a terminal input parser: feed bytes with
// [`Decoder::advance`], get back every key that is complete. A
// sequence split across two `advance` calls is held until the rest
// arrives; [`Decoder::flush`] drops whatever is left.

use crate::key::{KeyCode, KeyEvent, Modifiers};

/// Vim's special-key lead byte.
const K_SPECIAL: u8 = 0x80;
/// Second byte of a modifier prefix triplet.
const KS_MODIFIER: u8 = 0xFC;
/// Second byte of an escaped literal `K_SPECIAL`.
const KS_SPECIAL: u8 = 0xFE;
/// Third byte of an escaped literal `K_SPECIAL`.
const KE_FILLER: u8 = b'X';

// Vim's modifier mask bits (not the same layout as ours).
const MOD_SHIFT: u8 = 0x02;
const MOD_CTRL: u8 = 0x04;
const MOD_ALT: u8 = 0x08;
const MOD_META: u8 = 0x10;
const MOD_CMD: u8 = 0x80;

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Incremental scriptout decoder.
#[derive(Debug, Default)]
pub struct Decoder {
    /// Bytes waiting for the rest of their sequence.
    buf: Vec<u8>,
    /// Modifiers announced by a `KS_MODIFIER` prefix for the next key.
    pending_mods: Modifiers,
}

impl Decoder {
    /// Create a decoder with nothing buffered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and return every key that could be decoded.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match decode_one(&self.buf[pos..]) {
                Decoded::Key(mut ev, consumed) => {
                    ev.modifiers |= std::mem::take(&mut self.pending_mods);
                    if let KeyCode::Char(ch) = ev.code {
                        if ev.modifiers.contains(Modifiers::CTRL) {
                            ev.code = KeyCode::Char(ch.to_ascii_lowercase());
                        }
                    }
                    events.push(ev);
                    pos += consumed;
                }
                Decoded::Modifier(mods) => {
                    self.pending_mods |= mods;
                    pos += 3;
                }
                Decoded::Skip(n) => pos += n,
                Decoded::Incomplete => break,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }
        events
    }

    /// Are there bytes waiting for more input?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Discard any incomplete trailing sequence.
    ///
    /// A scriptout file that ends mid-sequence was truncated; there is
    /// no key to recover from the fragment.
    pub fn flush(&mut self) -> usize {
        let dropped = self.buf.len();
        self.buf.clear();
        self.pending_mods = Modifiers::empty();
        dropped
    }
}

/// Decode a complete scriptout buffer in one go.
#[must_use]
pub fn decode(data: &[u8]) -> Vec<KeyEvent> {
    let mut decoder = Decoder::new();
    let events = decoder.advance(data);
    decoder.flush();
    events
}

// ─── Stateless decoding ─────────────────────────────────────────────────────

/// Result of decoding from the front of a byte slice.
enum Decoded {
    /// A key, consuming `usize` bytes.
    Key(KeyEvent, usize),
    /// A modifier prefix for the following key (always 3 bytes).
    Modifier(Modifiers),
    /// Bytes with no key meaning.
    Skip(usize),
    /// Need more bytes.
    Incomplete,
}

fn decode_one(buf: &[u8]) -> Decoded {
    match buf[0] {
        K_SPECIAL => decode_special(buf),
        0x1B => key(KeyCode::Escape, 1),
        0x08 | 0x7F => key(KeyCode::Backspace, 1),
        0x09 => key(KeyCode::Tab, 1),
        0x0A | 0x0D => key(KeyCode::Enter, 1),
        0x00 => Decoded::Key(KeyEvent::new(KeyCode::Char('@'), Modifiers::CTRL), 1),
        b @ (0x01..=0x07 | 0x0B..=0x0C | 0x0E..=0x1A) => {
            Decoded::Key(KeyEvent::ctrl(char::from(b + b'a' - 1)), 1)
        }
        b @ 0x20..=0x7E => key(KeyCode::Char(char::from(b)), 1),
        0xC0..=0xFF => decode_utf8(buf),
        _ => Decoded::Skip(1),
    }
}

const fn key(code: KeyCode, consumed: usize) -> Decoded {
    Decoded::Key(KeyEvent::key(code), consumed)
}

fn decode_special(buf: &[u8]) -> Decoded {
    if buf.len() < 3 {
        return Decoded::Incomplete;
    }
    let code = match (buf[1], buf[2]) {
        (KS_MODIFIER, mask) => return Decoded::Modifier(vim_modifiers(mask)),
        (b'k', b'b') => KeyCode::Backspace,
        (b'k', b'D') => KeyCode::Delete,
        (b'k', b'u') => KeyCode::Up,
        (b'k', b'd') => KeyCode::Down,
        (b'k', b'l') => KeyCode::Left,
        (b'k', b'r') => KeyCode::Right,
        (b'k', b'h') => KeyCode::Home,
        (b'@', b'7') => KeyCode::End,
        _ => return Decoded::Skip(3),
    };
    key(code, 3)
}

const fn vim_modifiers(mask: u8) -> Modifiers {
    let mut mods = Modifiers::empty();
    if mask & MOD_SHIFT != 0 {
        mods = mods.union(Modifiers::SHIFT);
    }
    if mask & MOD_CTRL != 0 {
        mods = mods.union(Modifiers::CTRL);
    }
    if mask & (MOD_ALT | MOD_META) != 0 {
        mods = mods.union(Modifiers::ALT);
    }
    if mask & MOD_CMD != 0 {
        mods = mods.union(Modifiers::SUPER);
    }
    mods
}

/// Decode one UTF-8 character whose continuation bytes may contain
/// escaped `K_SPECIAL` triplets.
fn decode_utf8(buf: &[u8]) -> Decoded {
    let expected = utf8_char_len(buf[0]);
    if expected == 0 {
        return Decoded::Skip(1);
    }

    let mut bytes = [0u8; 4];
    bytes[0] = buf[0];
    let mut pos = 1;
    for slot in bytes.iter_mut().take(expected).skip(1) {
        let Some(&b) = buf.get(pos) else {
            return Decoded::Incomplete;
        };
        if b == K_SPECIAL {
            if buf.len() < pos + 3 {
                return Decoded::Incomplete;
            }
            if buf[pos + 1] != KS_SPECIAL || buf[pos + 2] != KE_FILLER {
                return Decoded::Skip(pos);
            }
            *slot = K_SPECIAL;
            pos += 3;
        } else if b & 0xC0 == 0x80 {
            *slot = b;
            pos += 1;
        } else {
            return Decoded::Skip(pos);
        }
    }

    std::str::from_utf8(&bytes[..expected])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Decoded::Skip(pos), |ch| key(KeyCode::Char(ch), pos))
}

/// Expected byte length of a UTF-8 sequence from its lead byte.
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
