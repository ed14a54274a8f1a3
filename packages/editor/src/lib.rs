//! # Quire Editor
//!
//! Editing core for block documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ rendering layer: keystrokes, clicks, caret  │
//! └─────────────────────────────────────────────┘
//!                     ↓ InputEvent
//! ┌─────────────────────────────────────────────┐
//! │ session: editing state machine              │
//! │  - Enter / Backspace / arrow semantics      │
//! │  - markdown autoformat, slash menu          │
//! │  - selection, clipboard, keymap             │
//! └─────────────────────────────────────────────┘
//!                     ↓ Mutation
//! ┌─────────────────────────────────────────────┐
//! │ mutations: pure (page, op) → page'          │
//! └─────────────────────────────────────────────┘
//!                     ↓ Page snapshot
//! ┌─────────────────────────────────────────────┐
//! │ history: undo/redo over a logical clock     │
//! │ sync: debounced hand-off to persistence     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Mutations are total**: an operation that cannot apply is a no-op
//! 2. **Children are never dropped silently**: single-block removal promotes them
//! 3. **Focus is transient**: returned next to the page, never stored in it
//! 4. **Time is explicit**: history merging and sync debounce run on a
//!    logical clock the host advances
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quire_editor::{EditSession, EditorConfig, InputEvent, Key, Modifiers, TextCursor};
//!
//! let mut session = EditSession::from_json("doc-1", &json, EditorConfig::default())?;
//!
//! session.handle(InputEvent::ContentChanged {
//!     block: id.clone(),
//!     content: "# ".into(),
//!     cursor: 2,
//! });
//! session.handle(InputEvent::Key {
//!     block: id,
//!     key: Key::Enter,
//!     modifiers: Modifiers::NONE,
//!     cursor: TextCursor::at(0),
//! });
//!
//! let blocks = session.blocks();
//! let focus = session.take_focus_hint();
//! session.advance(1_000); // syncs once the debounce has elapsed
//! ```

pub mod autoformat;
pub mod clipboard;
mod config;
mod errors;
mod events;
mod history;
pub mod keymap;
mod link;
mod mutations;
mod selection;
mod session;
pub mod slash_menu;
mod sync;
pub mod text;

pub use clipboard::{ClipboardError, ClipboardHolder, MemoryClipboard, SystemClipboard, UnavailableClipboard};
pub use config::{EditorConfig, HistoryConfig};
pub use errors::EditorError;
pub use events::{Command, EditMode, EventOutcome, InputEvent, Key, Modifiers, Notification, TextCursor};
pub use history::{History, HistoryEntry, LogicalClock};
pub use link::deep_link;
pub use mutations::{Applied, Direction, FocusHint, Mutation, MutationError};
pub use selection::Selection;
pub use session::EditSession;
pub use sync::{PersistenceSink, SyncError, SyncScheduler};

// Re-export the block model for convenience
pub use quire_model::{Block, BlockId, BlockKind, ModelError, Page};
