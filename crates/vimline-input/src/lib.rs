// SPDX-License-Identifier: MIT
//
// vimline-input: key events and keystroke decoding for vimline.
//
// The editing engine consumes one `KeyEvent` at a time. This crate
// defines that event model and the two ways we produce it outside a
// live GUI: Vim angle-bracket notation (`"d2w"`, `"ci(<Esc>"`) for
// tests and scripted input, and raw Vim `-W` scriptout logs for the
// conformance runner.

pub mod key;
pub mod notation;
pub mod scriptout;

pub use key::{KeyCode, KeyEvent, Modifiers};
pub use notation::NotationError;
