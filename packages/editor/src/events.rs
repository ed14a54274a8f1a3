//! Events flowing between the rendering layer and an [`EditSession`].
//!
//! All inbound types are serde-serializable so a session can be driven
//! from a recorded script.
//!
//! [`EditSession`]: crate::EditSession

use crate::mutations::Direction;
use quire_model::{BlockId, BlockKind};
use serde::{Deserialize, Serialize};

/// Caret or text range inside one block, in chars
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextCursor {
    pub start: usize,
    pub end: usize,
}

impl TextCursor {
    pub fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Covers the whole of a block `len` chars long
    pub fn covers(&self, len: usize) -> bool {
        self.start == 0 && self.end >= len
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Enter,
    Backspace,
    Delete,
    Tab,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Char(char),
}

/// `primary` is Cmd on macOS and Ctrl elsewhere
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        primary: false,
        alt: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn primary() -> Self {
        Self {
            primary: true,
            ..Self::NONE
        }
    }

    pub fn primary_shift() -> Self {
        Self {
            shift: true,
            primary: true,
            alt: false,
        }
    }
}

/// Input from the rendering layer, tagged with the block it happened in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    /// Caret entered a block
    Focus { block: BlockId },

    /// Text of a block changed through native editing
    ContentChanged {
        block: BlockId,
        content: String,
        cursor: usize,
    },

    /// Key pressed before native handling; unhandled keys fall through
    Key {
        block: BlockId,
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
        #[serde(default)]
        cursor: TextCursor,
    },

    /// Pointer action on a block's handle
    Click {
        block: BlockId,
        #[serde(default)]
        modifiers: Modifiers,
    },

    /// Menu or toolbar action
    Run { command: Command },
}

/// Actions invoked from menus, toolbars and the keymap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Command {
    Duplicate {
        block: BlockId,
    },
    Delete {
        block: BlockId,
    },
    Move {
        block: BlockId,
        direction: Direction,
    },
    ChangeType {
        block: BlockId,
        kind: BlockKind,
    },
    ToggleChecked {
        block: BlockId,
    },
    ToggleOpen {
        block: BlockId,
    },
    SetPayload {
        block: BlockId,
        payload: Option<serde_json::Value>,
    },
    InsertAfter {
        after: Option<BlockId>,
        #[serde(default)]
        kind: BlockKind,
    },
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    SelectAll,
    DeleteSelection,
    ClearSelection,
    /// Click on a slash menu entry
    SelectSlashEntry {
        index: usize,
    },
}

/// Transient, non-blocking messages for the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    SyncConflict { document_id: String },
    SyncFailed { document_id: String, reason: String },
    ClipboardUnavailable,
    NothingToPaste,
}

/// What the session did with an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// The host should suppress its native handling
    pub handled: bool,

    /// The page changed
    pub changed: bool,
}

impl EventOutcome {
    pub const IGNORED: EventOutcome = EventOutcome {
        handled: false,
        changed: false,
    };

    pub fn handled(changed: bool) -> Self {
        Self {
            handled: true,
            changed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    #[default]
    EditingText,
    /// Block selection active, text editing suspended
    Navigating,
    MenuOpen,
}
