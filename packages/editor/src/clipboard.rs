//! # Clipboard
//!
//! Two channels carry copied blocks:
//!
//! - the in-process [`ClipboardHolder`], injected into each session, holding
//!   deep copies with their original ids
//! - the [`SystemClipboard`], a single text channel. Blocks travel over it as
//!   a header line followed by JSON, degrading to plain text lines.
//!
//! ```text
//! quire-blocks/v1
//! [{"id":"...","type":"heading1","content":"Title"}, ...]
//! ```
//!
//! Pasted blocks always get fresh ids, whatever channel they came from.

use quire_model::{Block, Page};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;
use tracing::warn;

/// First line of the structured encoding
pub const CLIPBOARD_HEADER: &str = "quire-blocks/v1";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClipboardError {
    #[error("System clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Clipboard is empty")]
    Empty,

    #[error("Malformed clipboard payload: {0}")]
    Malformed(String),
}

/// Text-only system clipboard. Both calls may fail (denied permission,
/// missing helper binary); callers always have a fallback.
pub trait SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
    fn read_text(&mut self) -> Result<String, ClipboardError>;
}

/// In-memory system clipboard. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let clipboard = Self::new();
        clipboard.set(text);
        clipboard
    }

    pub fn set(&self, text: impl Into<String>) {
        *self.contents.borrow_mut() = Some(text.into());
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl SystemClipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.set(text);
        Ok(())
    }

    fn read_text(&mut self) -> Result<String, ClipboardError> {
        match self.contents.borrow().as_deref() {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => Err(ClipboardError::Empty),
        }
    }
}

/// A clipboard that denies every access
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableClipboard;

impl SystemClipboard for UnavailableClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable("permission denied".to_string()))
    }

    fn read_text(&mut self) -> Result<String, ClipboardError> {
        Err(ClipboardError::Unavailable("permission denied".to_string()))
    }
}

/// In-session store of copied blocks (ids preserved)
#[derive(Debug, Clone, Default)]
pub struct ClipboardHolder {
    blocks: Option<Vec<Block>>,
}

impl ClipboardHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, blocks: Vec<Block>) {
        self.blocks = if blocks.is_empty() { None } else { Some(blocks) };
    }

    pub fn blocks(&self) -> Option<&[Block]> {
        self.blocks.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_none()
    }

    /// Copies ready to splice into a page
    pub fn fresh_copies(&self) -> Option<Vec<Block>> {
        self.blocks.as_deref().map(fresh_copies)
    }
}

/// Where pasted blocks came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteSource {
    Holder,
    Structured,
    PlainText,
}

/// How a copy reached the system clipboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Structured,
    PlainText,
}

pub fn encode(blocks: &[Block]) -> Result<String, ClipboardError> {
    let json = serde_json::to_string(blocks).map_err(|e| ClipboardError::Malformed(e.to_string()))?;
    Ok(format!("{}\n{}", CLIPBOARD_HEADER, json))
}

/// Parse the structured encoding. The blocks must form a valid forest:
/// unique ids, children only on containers.
pub fn decode(text: &str) -> Result<Vec<Block>, ClipboardError> {
    let (header, body) = text
        .split_once('\n')
        .ok_or_else(|| ClipboardError::Malformed("missing header line".to_string()))?;
    if header.trim_end_matches('\r') != CLIPBOARD_HEADER {
        return Err(ClipboardError::Malformed(format!("unknown header {:?}", header)));
    }

    let blocks: Vec<Block> =
        serde_json::from_str(body).map_err(|e| ClipboardError::Malformed(e.to_string()))?;
    if blocks.is_empty() {
        return Err(ClipboardError::Malformed("no blocks".to_string()));
    }

    Page::from_blocks(blocks.clone()).map_err(|e| ClipboardError::Malformed(e.to_string()))?;
    Ok(blocks)
}

pub fn is_structured(text: &str) -> bool {
    text.starts_with(CLIPBOARD_HEADER)
}

/// Flatten to one line per block that carries text, depth-first
pub fn plain_text(blocks: &[Block]) -> String {
    let mut lines = Vec::new();
    collect_lines(blocks, &mut lines);
    lines.join("\n")
}

fn collect_lines<'a>(blocks: &'a [Block], lines: &mut Vec<&'a str>) {
    for block in blocks {
        if block.kind.has_text() {
            lines.push(block.content.as_str());
        }
        collect_lines(&block.children, lines);
    }
}

/// One text block per non-blank line
pub fn blocks_from_plain_text(text: &str) -> Vec<Block> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(Block::text)
        .collect()
}

pub fn fresh_copies(blocks: &[Block]) -> Vec<Block> {
    blocks.iter().map(Block::with_fresh_ids).collect()
}

/// Write copied blocks to the system clipboard, structured first, plain
/// text when the structured write is refused
pub fn write_blocks(
    system: &mut dyn SystemClipboard,
    blocks: &[Block],
) -> Result<CopyOutcome, ClipboardError> {
    let structured = encode(blocks).and_then(|text| system.write_text(&text));
    match structured {
        Ok(()) => Ok(CopyOutcome::Structured),
        Err(err) => {
            warn!(error = %err, "Structured clipboard write failed, falling back to plain text");
            system.write_text(&plain_text(blocks))?;
            Ok(CopyOutcome::PlainText)
        }
    }
}

/// Blocks to paste, ids already fresh. The holder wins over the system
/// clipboard; structured text wins over plain lines.
pub fn blocks_for_paste(
    holder: &ClipboardHolder,
    system: &mut dyn SystemClipboard,
) -> Result<(Vec<Block>, PasteSource), ClipboardError> {
    if let Some(blocks) = holder.fresh_copies() {
        return Ok((blocks, PasteSource::Holder));
    }

    let text = system.read_text()?;
    let mut lines = text.as_str();
    if is_structured(&text) {
        match decode(&text) {
            Ok(blocks) => return Ok((fresh_copies(&blocks), PasteSource::Structured)),
            Err(err) => {
                warn!(error = %err, "Clipboard payload rejected, pasting as plain text");
                // The header line is not content
                lines = text.split_once('\n').map(|(_, body)| body).unwrap_or("");
            }
        }
    }

    let blocks = blocks_from_plain_text(lines);
    if blocks.is_empty() {
        return Err(ClipboardError::Empty);
    }
    Ok((blocks, PasteSource::PlainText))
}
