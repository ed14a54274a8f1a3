//! # Slash Menu
//!
//! Typing `/` at the start of a block, or after a space or newline, opens a
//! filterable list of block types anchored at that `/`. Characters typed
//! after it form the query; whitespace in the query closes the menu.
//! Applying an entry strips `/query` from the content and changes the type.

use crate::text;
use quire_model::{BlockId, BlockKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlashCommand {
    pub kind: BlockKind,
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

pub const CATALOG: &[SlashCommand] = &[
    SlashCommand {
        kind: BlockKind::Text,
        label: "Text",
        keywords: &["paragraph", "plain"],
    },
    SlashCommand {
        kind: BlockKind::Heading1,
        label: "Heading 1",
        keywords: &["h1", "title"],
    },
    SlashCommand {
        kind: BlockKind::Heading2,
        label: "Heading 2",
        keywords: &["h2", "subtitle"],
    },
    SlashCommand {
        kind: BlockKind::Heading3,
        label: "Heading 3",
        keywords: &["h3"],
    },
    SlashCommand {
        kind: BlockKind::BulletItem,
        label: "Bulleted list",
        keywords: &["ul", "bullet", "unordered"],
    },
    SlashCommand {
        kind: BlockKind::NumberedItem,
        label: "Numbered list",
        keywords: &["ol", "ordered", "number"],
    },
    SlashCommand {
        kind: BlockKind::Todo,
        label: "To-do list",
        keywords: &["todo", "task", "checkbox"],
    },
    SlashCommand {
        kind: BlockKind::Code,
        label: "Code",
        keywords: &["snippet", "pre"],
    },
    SlashCommand {
        kind: BlockKind::Quote,
        label: "Quote",
        keywords: &["blockquote", "citation"],
    },
    SlashCommand {
        kind: BlockKind::Divider,
        label: "Divider",
        keywords: &["hr", "separator", "line"],
    },
    SlashCommand {
        kind: BlockKind::Toggle,
        label: "Toggle list",
        keywords: &["collapse", "details"],
    },
    SlashCommand {
        kind: BlockKind::Callout,
        label: "Callout",
        keywords: &["note", "info", "warning"],
    },
    SlashCommand {
        kind: BlockKind::Image,
        label: "Image",
        keywords: &["picture", "photo", "media"],
    },
    SlashCommand {
        kind: BlockKind::Table,
        label: "Table",
        keywords: &["grid", "database", "spreadsheet"],
    },
];

/// Catalog entries whose label or keywords contain `query`, case-insensitive
pub fn filter(query: &str) -> Vec<&'static SlashCommand> {
    let query = query.to_lowercase();
    CATALOG
        .iter()
        .filter(|command| {
            query.is_empty()
                || command.label.to_lowercase().contains(&query)
                || command.keywords.iter().any(|keyword| keyword.contains(&query))
        })
        .collect()
}

/// Char offset of a `/` that was just typed in a position that opens the
/// menu: block start, or right after a space or newline
pub fn opens_at(previous: &str, content: &str, cursor: usize) -> Option<usize> {
    if text::char_len(content) != text::char_len(previous) + 1 {
        return None;
    }
    let slash_at = cursor.checked_sub(1)?;
    if text::char_at(content, slash_at) != Some('/') {
        return None;
    }
    match slash_at.checked_sub(1) {
        None => Some(slash_at),
        Some(before) => match text::char_at(content, before) {
            Some(' ') | Some('\n') => Some(slash_at),
            _ => None,
        },
    }
}

/// Open menu state for one block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashMenu {
    block: BlockId,
    slash_at: usize,
    query: String,
    selected: usize,
}

impl SlashMenu {
    pub fn open(block: BlockId, slash_at: usize) -> Self {
        Self {
            block,
            slash_at,
            query: String::new(),
            selected: 0,
        }
    }

    pub fn block(&self) -> &BlockId {
        &self.block
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn matches(&self) -> Vec<&'static SlashCommand> {
        filter(&self.query)
    }

    pub fn highlighted(&self) -> Option<&'static SlashCommand> {
        self.matches().get(self.selected).copied()
    }

    /// Entry at `index` of the current matches (pointer click)
    pub fn entry(&self, index: usize) -> Option<&'static SlashCommand> {
        self.matches().get(index).copied()
    }

    /// Move the highlight, wrapping at both ends
    pub fn cycle(&mut self, forward: bool) {
        let len = self.matches().len();
        if len == 0 {
            return;
        }
        self.selected = if forward {
            (self.selected + 1) % len
        } else {
            (self.selected + len - 1) % len
        };
    }

    /// Re-read the query after a content change. Returns false when the
    /// menu should close.
    pub fn track(&mut self, content: &str, cursor: usize) -> bool {
        if text::char_at(content, self.slash_at) != Some('/') || cursor <= self.slash_at {
            return false;
        }

        let query: String = content
            .chars()
            .skip(self.slash_at + 1)
            .take(cursor - self.slash_at - 1)
            .collect();
        if query.chars().any(char::is_whitespace) {
            return false;
        }

        if query != self.query {
            self.query = query;
            self.selected = 0;
        }
        true
    }

    /// Content with `/query` removed, and the caret position left behind
    pub fn strip(&self, content: &str) -> (String, usize) {
        let count = 1 + text::char_len(&self.query);
        (text::remove_chars(content, self.slash_at, count), self.slash_at)
    }
}
