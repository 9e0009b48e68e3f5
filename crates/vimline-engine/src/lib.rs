//! # vimline-engine: Vim-style modal editing for any text widget
//!
//! The engine turns a stream of [`KeyEvent`]s into edits on a host buffer.
//! It owns the canonical text and every piece of editing state; the host
//! only renders and reports what it was asked (see [`BufferFacade`]).
//!
//! - **[`engine`]**: [`Engine`], the entry point
//! - **[`keymap`]**: key-chord tries resolving keys to a [`Command`]
//! - **[`motion`]** / **[`word`]**: cursor targets (`hjkl`, `w`, `f`, `%` …)
//! - **[`text_object`]**: `iw`, `a(`, `i"` and friends
//! - **[`operator`]**: `d` `c` `y` over motions, objects and selections
//! - **[`history`]**: bounded undo / redo of whole-buffer snapshots
//! - **[`register`]**, **[`mark`]**, **[`macros`]**: the unnamed register,
//!   named marks and recorded key sequences
//! - **[`search`]**: `/`, `?`, `n`, `N`, `*`, `#`
//! - **[`adapter`]**: [`LineBuffer`] and [`TextBuffer`] hosts
//!
//! ```
//! use vimline_engine::{Engine, LineBuffer};
//! use vimline_input::notation;
//!
//! let mut engine = Engine::new(LineBuffer::from_text("foo bar"));
//! for key in notation::parse("dw").unwrap() {
//!     engine.handle_key(key);
//! }
//! assert_eq!(engine.text().to_string(), "bar");
//! ```

pub mod adapter;
pub mod command;
mod dispatch;
pub mod engine;
pub mod error;
pub mod facade;
pub mod history;
pub mod keymap;
pub mod macros;
pub mod mark;
pub mod mode;
pub mod motion;
pub mod number;
pub mod operator;
pub mod options;
pub mod register;
pub mod search;
pub mod text;
pub mod text_object;
pub mod word;

pub use adapter::{LineBuffer, TextBuffer};
pub use command::{Command, ExCommand, HostRequest, PromptKind};
pub use engine::{Engine, MAX_COUNT};
pub use error::ConfigError;
pub use facade::{BufferFacade, ScreenDirection, Selection};
pub use mode::Mode;
pub use options::Options;
pub use register::{Register, RegisterKind};
pub use text::Text;
pub use vimline_input::{KeyCode, KeyEvent, Modifiers};
