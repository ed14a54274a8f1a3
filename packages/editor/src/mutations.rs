//! # Block Mutations
//!
//! Semantic operations on a page: `(page, mutation) -> page'`.
//!
//! ## Design Principles
//!
//! 1. **Pure**: `apply` never touches its input; it returns a new page
//! 2. **Total**: a mutation that cannot apply (missing id, boundary move,
//!    merge with no previous sibling) returns the input unchanged
//! 3. **Lossless**: removing a block that owns children promotes them into
//!    its place; children are never dropped except by `RemoveBlocks`
//! 4. **Focus travels alongside**: the block to focus next is returned next
//!    to the page, never stored inside it
//!
//! ## Mutation Semantics
//!
//! ### Split
//! - Content `[0:offset]` stays, `[offset:]` moves into a new sibling
//! - Sibling keeps the type for list kinds, otherwise becomes text
//!
//! ### MergeUp
//! - Content is appended to the previous sibling
//! - Children are spliced right after that sibling, in order
//!
//! ### Delete
//! - Children replace the block in place, in order
//!
//! ### RemoveBlocks
//! - Flat removal of every listed block with its subtree, no promotion

use crate::text;
use quire_model::{Block, BlockId, BlockKind, ModelError, Page};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

/// One-shot signal for the rendering layer: focus this block, caret at `offset`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusHint {
    pub block: BlockId,
    pub offset: usize,
}

impl FocusHint {
    pub fn start(block: BlockId) -> Self {
        Self { block, offset: 0 }
    }

    /// Caret at the end of `block`'s content
    pub fn end_of(page: &Page, block: &BlockId) -> Option<Self> {
        let node = page.get(block)?;
        Some(Self {
            block: block.clone(),
            offset: node.char_len(),
        })
    }
}

/// Semantic mutations on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// New block after `after` (end of the page when `None`)
    InsertAfter {
        after: Option<BlockId>,
        kind: BlockKind,
        #[serde(default)]
        content: String,
    },

    /// Cut the content at `offset` into a new sibling below
    Split { id: BlockId, offset: usize },

    /// Append content onto the previous sibling and remove the block
    MergeUp { id: BlockId },

    /// Remove the block, promoting its children into its place
    Delete { id: BlockId },

    /// Swap with the adjacent sibling
    Move { id: BlockId, direction: Direction },

    /// Deep copy with fresh ids, inserted after the original
    Duplicate { id: BlockId },

    ChangeType { id: BlockId, kind: BlockKind },

    /// Insert into a container at `after_index + 1` (front when `None`)
    InsertChild {
        container: BlockId,
        after_index: Option<usize>,
        kind: BlockKind,
        #[serde(default)]
        content: String,
    },

    /// Move a child out of its container to become the container's next sibling
    PromoteToSibling { container: BlockId, child: BlockId },

    /// Replace the text of a block (typing)
    UpdateContent { id: BlockId, content: String },

    SetChecked { id: BlockId, checked: bool },

    SetToggleOpen { id: BlockId, open: bool },

    /// Store collaborator data unchanged
    SetPayload {
        id: BlockId,
        payload: Option<serde_json::Value>,
    },

    /// Splice blocks (ids already fresh) into a sibling list
    InsertBlocks {
        parent: Option<BlockId>,
        index: usize,
        blocks: Vec<Block>,
    },

    /// Flat removal of each block with its subtree
    RemoveBlocks { ids: Vec<BlockId> },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Block {0} is not a container")]
    NotAContainer(BlockId),

    #[error("Block {child} is not a child of {container}")]
    NotAChild { container: BlockId, child: BlockId },

    #[error("Block {0} has no previous sibling to merge into")]
    NoPreviousSibling(BlockId),

    #[error("Block {0} cannot hold text")]
    NoTextContent(BlockId),

    #[error("Block {id} is not a {expected}")]
    WrongKind { id: BlockId, expected: BlockKind },

    #[error("Block {0} is already at the boundary")]
    AtBoundary(BlockId),

    #[error("Invalid structure: {0}")]
    InvalidStructure(#[from] ModelError),
}

/// Result of applying a mutation
#[derive(Debug, Clone)]
pub struct Applied {
    pub page: Page,

    /// Where the caret should go next, if the mutation moved it
    pub focus: Option<FocusHint>,

    /// False when the mutation was a no-op
    pub changed: bool,
}

impl Applied {
    fn unchanged(page: &Page) -> Self {
        Self {
            page: page.clone(),
            focus: None,
            changed: false,
        }
    }
}

impl Mutation {
    /// Apply to a copy of `page`. Never fails: invalid mutations return the
    /// input unchanged.
    pub fn apply(&self, page: &Page) -> Applied {
        if let Err(err) = self.validate(page) {
            debug!(op = self.name(), error = %err, "Mutation skipped");
            return Applied::unchanged(page);
        }

        let mut next = page.clone();
        match self.apply_in_place(&mut next) {
            Ok(focus) => {
                let changed = next != *page;
                debug!(op = self.name(), changed, blocks = next.len(), "Mutation applied");
                Applied {
                    page: next,
                    focus,
                    changed,
                }
            }
            Err(err) => {
                debug!(op = self.name(), error = %err, "Mutation rolled back");
                Applied::unchanged(page)
            }
        }
    }

    /// Structural mutations always open a new history entry; typing merges
    pub fn is_structural(&self) -> bool {
        !matches!(self, Mutation::UpdateContent { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertAfter { .. } => "insert_after",
            Mutation::Split { .. } => "split",
            Mutation::MergeUp { .. } => "merge_up",
            Mutation::Delete { .. } => "delete",
            Mutation::Move { .. } => "move",
            Mutation::Duplicate { .. } => "duplicate",
            Mutation::ChangeType { .. } => "change_type",
            Mutation::InsertChild { .. } => "insert_child",
            Mutation::PromoteToSibling { .. } => "promote_to_sibling",
            Mutation::UpdateContent { .. } => "update_content",
            Mutation::SetChecked { .. } => "set_checked",
            Mutation::SetToggleOpen { .. } => "set_toggle_open",
            Mutation::SetPayload { .. } => "set_payload",
            Mutation::InsertBlocks { .. } => "insert_blocks",
            Mutation::RemoveBlocks { .. } => "remove_blocks",
        }
    }

    /// Check whether the mutation would take effect, without applying it
    pub fn validate(&self, page: &Page) -> Result<(), MutationError> {
        match self {
            Mutation::InsertAfter { after, .. } => match after {
                Some(id) => require(page, id),
                None => Ok(()),
            },

            Mutation::Split { id, .. }
            | Mutation::Delete { id }
            | Mutation::Duplicate { id }
            | Mutation::ChangeType { id, .. }
            | Mutation::SetPayload { id, .. } => require(page, id),

            Mutation::MergeUp { id } => {
                require(page, id)?;
                let (_, index) = page
                    .position(id)
                    .ok_or_else(|| MutationError::BlockNotFound(id.clone()))?;
                let previous = index
                    .checked_sub(1)
                    .and_then(|i| page.siblings_of(id).and_then(|list| list.get(i)))
                    .ok_or_else(|| MutationError::NoPreviousSibling(id.clone()))?;
                match page.get(previous) {
                    Some(node) if node.kind.has_text() => Ok(()),
                    _ => Err(MutationError::NoTextContent(previous.clone())),
                }
            }

            Mutation::Move { id, direction } => {
                let (_, index) = page
                    .position(id)
                    .ok_or_else(|| MutationError::BlockNotFound(id.clone()))?;
                let len = page.siblings_of(id).map(<[BlockId]>::len).unwrap_or(0);
                let at_boundary = match direction {
                    Direction::Up => index == 0,
                    Direction::Down => index + 1 >= len,
                };
                if at_boundary {
                    return Err(MutationError::AtBoundary(id.clone()));
                }
                Ok(())
            }

            Mutation::InsertChild { container, .. } => require_container(page, container),

            Mutation::PromoteToSibling { container, child } => {
                require_container(page, container)?;
                require(page, child)?;
                if page.parent_of(child) != Some(container) {
                    return Err(MutationError::NotAChild {
                        container: container.clone(),
                        child: child.clone(),
                    });
                }
                Ok(())
            }

            Mutation::UpdateContent { id, .. } => {
                let node = page
                    .get(id)
                    .ok_or_else(|| MutationError::BlockNotFound(id.clone()))?;
                if !node.kind.has_text() {
                    return Err(MutationError::NoTextContent(id.clone()));
                }
                Ok(())
            }

            Mutation::SetChecked { id, .. } => require_kind(page, id, BlockKind::Todo),

            Mutation::SetToggleOpen { id, .. } => require_kind(page, id, BlockKind::Toggle),

            Mutation::InsertBlocks { parent, .. } => match parent {
                Some(parent) => require_container(page, parent),
                None => Ok(()),
            },

            Mutation::RemoveBlocks { ids } => match ids.iter().find(|id| page.contains(id)) {
                Some(_) => Ok(()),
                None => Err(MutationError::BlockNotFound(
                    ids.first().cloned().unwrap_or_else(|| BlockId::from("")),
                )),
            },
        }
    }

    fn apply_in_place(&self, page: &mut Page) -> Result<Option<FocusHint>, MutationError> {
        match self {
            Mutation::InsertAfter {
                after,
                kind,
                content,
            } => Self::apply_insert_after(page, after.as_ref(), *kind, content),

            Mutation::Split { id, offset } => Self::apply_split(page, id, *offset),

            Mutation::MergeUp { id } => Self::apply_merge_up(page, id),

            Mutation::Delete { id } => Self::apply_delete(page, id),

            Mutation::Move { id, direction } => Self::apply_move(page, id, *direction),

            Mutation::Duplicate { id } => Self::apply_duplicate(page, id),

            Mutation::ChangeType { id, kind } => Self::apply_change_type(page, id, *kind),

            Mutation::InsertChild {
                container,
                after_index,
                kind,
                content,
            } => Self::apply_insert_child(page, container, *after_index, *kind, content),

            Mutation::PromoteToSibling { container, child } => {
                Self::apply_promote(page, container, child)
            }

            Mutation::UpdateContent { id, content } => {
                node_mut(page, id)?.content = content.clone();
                Ok(None)
            }

            Mutation::SetChecked { id, checked } => {
                node_mut(page, id)?.checked = *checked;
                Ok(None)
            }

            Mutation::SetToggleOpen { id, open } => {
                node_mut(page, id)?.toggle_open = *open;
                Ok(None)
            }

            Mutation::SetPayload { id, payload } => {
                node_mut(page, id)?.payload = payload.clone();
                Ok(None)
            }

            Mutation::InsertBlocks {
                parent,
                index,
                blocks,
            } => Self::apply_insert_blocks(page, parent.as_ref(), *index, blocks),

            Mutation::RemoveBlocks { ids } => {
                for id in ids {
                    page.remove_subtree(id);
                }
                Ok(page.first_block().cloned().map(FocusHint::start))
            }
        }
    }

    fn apply_insert_after(
        page: &mut Page,
        after: Option<&BlockId>,
        kind: BlockKind,
        content: &str,
    ) -> Result<Option<FocusHint>, MutationError> {
        let (parent, index) = match after {
            Some(id) => {
                let (parent, index) = locate(page, id)?;
                (parent, index + 1)
            }
            None => (None, page.roots().len()),
        };

        let id = page.graft(parent.as_ref(), index, new_block(kind, content))?;
        Ok(Some(FocusHint::start(id)))
    }

    fn apply_split(page: &mut Page, id: &BlockId, offset: usize) -> Result<Option<FocusHint>, MutationError> {
        let (parent, index) = locate(page, id)?;
        let node = node_mut(page, id)?;
        let (head, tail) = text::split_at_char(&node.content, offset);
        let sibling_kind = if node.kind.is_list() {
            node.kind
        } else {
            BlockKind::Text
        };
        node.content = head;

        let sibling = page.graft(parent.as_ref(), index + 1, new_block(sibling_kind, &tail))?;
        Ok(Some(FocusHint::start(sibling)))
    }

    fn apply_merge_up(page: &mut Page, id: &BlockId) -> Result<Option<FocusHint>, MutationError> {
        let (parent, index) = locate(page, id)?;
        let previous = page
            .children_of(parent.as_ref())
            .and_then(|list| index.checked_sub(1).and_then(|i| list.get(i)))
            .cloned()
            .ok_or_else(|| MutationError::NoPreviousSibling(id.clone()))?;

        let node = page
            .get(id)
            .ok_or_else(|| MutationError::BlockNotFound(id.clone()))?;
        let content = node.content.clone();
        let children = node.children.clone();

        let target = node_mut(page, &previous)?;
        let boundary = target.char_len();
        target.content.push_str(&content);

        // The merged block sat at `index`, right after `previous`
        promote_children(page, id, parent.as_ref(), index)?;
        debug!(merged = %id, promoted = children.len(), "Merged block into previous sibling");

        Ok(Some(FocusHint {
            block: previous,
            offset: boundary,
        }))
    }

    fn apply_delete(page: &mut Page, id: &BlockId) -> Result<Option<FocusHint>, MutationError> {
        let (parent, index) = locate(page, id)?;
        let first_child = page.get(id).and_then(|node| node.children.first().cloned());

        promote_children(page, id, parent.as_ref(), index)?;

        if let Some(child) = first_child {
            return Ok(Some(FocusHint::start(child)));
        }
        let preceding = index
            .checked_sub(1)
            .and_then(|i| page.children_of(parent.as_ref()).and_then(|list| list.get(i)))
            .cloned();
        if let Some(preceding) = preceding {
            return Ok(FocusHint::end_of(page, &preceding));
        }
        Ok(page.first_block().cloned().map(FocusHint::start))
    }

    fn apply_move(page: &mut Page, id: &BlockId, direction: Direction) -> Result<Option<FocusHint>, MutationError> {
        let (parent, index) = locate(page, id)?;
        let target = match direction {
            Direction::Up => index
                .checked_sub(1)
                .ok_or_else(|| MutationError::AtBoundary(id.clone()))?,
            Direction::Down => index + 1,
        };

        page.detach(id);
        if !page.attach(id, parent.as_ref(), target) {
            return Err(MutationError::BlockNotFound(id.clone()));
        }
        Ok(FocusHint::end_of(page, id))
    }

    fn apply_duplicate(page: &mut Page, id: &BlockId) -> Result<Option<FocusHint>, MutationError> {
        let (parent, index) = locate(page, id)?;
        let copy = page
            .subtree(id)
            .ok_or_else(|| MutationError::BlockNotFound(id.clone()))?
            .with_fresh_ids();

        let copy_id = page.graft(parent.as_ref(), index + 1, copy)?;
        Ok(FocusHint::end_of(page, &copy_id))
    }

    fn apply_change_type(page: &mut Page, id: &BlockId, kind: BlockKind) -> Result<Option<FocusHint>, MutationError> {
        let (parent, index) = locate(page, id)?;
        let node = node_mut(page, id)?;
        let previous_kind = node.kind;
        node.kind = kind;

        if !kind.has_text() {
            node.content.clear();
        }
        if kind != previous_kind {
            node.checked = false;
        }
        if kind == BlockKind::Toggle {
            node.toggle_open = true;
        }

        // A former container's children follow it as siblings
        if previous_kind.is_container() && !kind.is_container() {
            let children = node.children.clone();
            for (offset, child) in children.iter().enumerate() {
                page.detach(child);
                if !page.attach(child, parent.as_ref(), index + 1 + offset) {
                    return Err(MutationError::BlockNotFound(child.clone()));
                }
            }
        }

        Ok(FocusHint::end_of(page, id))
    }

    fn apply_insert_child(
        page: &mut Page,
        container: &BlockId,
        after_index: Option<usize>,
        kind: BlockKind,
        content: &str,
    ) -> Result<Option<FocusHint>, MutationError> {
        let node = node_mut(page, container)?;
        if node.kind == BlockKind::Toggle {
            node.toggle_open = true;
        }

        let index = after_index.map(|i| i + 1).unwrap_or(0);
        let child = page.graft(Some(container), index, new_block(kind, content))?;
        Ok(Some(FocusHint::start(child)))
    }

    fn apply_promote(page: &mut Page, container: &BlockId, child: &BlockId) -> Result<Option<FocusHint>, MutationError> {
        let (parent, index) = locate(page, container)?;
        page.detach(child);
        if !page.attach(child, parent.as_ref(), index + 1) {
            return Err(MutationError::BlockNotFound(child.clone()));
        }
        Ok(Some(FocusHint::start(child.clone())))
    }

    fn apply_insert_blocks(
        page: &mut Page,
        parent: Option<&BlockId>,
        index: usize,
        blocks: &[Block],
    ) -> Result<Option<FocusHint>, MutationError> {
        let mut last = None;
        for (offset, block) in blocks.iter().enumerate() {
            last = Some(page.graft(parent, index + offset, block.clone())?);
        }
        Ok(last.and_then(|id| FocusHint::end_of(page, &id)))
    }
}

fn require(page: &Page, id: &BlockId) -> Result<(), MutationError> {
    if page.contains(id) {
        Ok(())
    } else {
        Err(MutationError::BlockNotFound(id.clone()))
    }
}

fn require_container(page: &Page, id: &BlockId) -> Result<(), MutationError> {
    let node = page
        .get(id)
        .ok_or_else(|| MutationError::BlockNotFound(id.clone()))?;
    if !node.kind.is_container() {
        return Err(MutationError::NotAContainer(id.clone()));
    }
    Ok(())
}

fn require_kind(page: &Page, id: &BlockId, kind: BlockKind) -> Result<(), MutationError> {
    let node = page
        .get(id)
        .ok_or_else(|| MutationError::BlockNotFound(id.clone()))?;
    if node.kind != kind {
        return Err(MutationError::WrongKind {
            id: id.clone(),
            expected: kind,
        });
    }
    Ok(())
}

fn locate(page: &Page, id: &BlockId) -> Result<(Option<BlockId>, usize), MutationError> {
    page.position(id)
        .ok_or_else(|| MutationError::BlockNotFound(id.clone()))
}

fn node_mut<'a>(page: &'a mut Page, id: &BlockId) -> Result<&'a mut quire_model::BlockNode, MutationError> {
    page.get_mut(id)
        .ok_or_else(|| MutationError::BlockNotFound(id.clone()))
}

fn new_block(kind: BlockKind, content: &str) -> Block {
    let content = if kind.has_text() { content } else { "" };
    Block::new(kind, content)
}

/// Remove `id` from the sibling list at (`parent`, `index`) and put its
/// children there instead, order preserved
fn promote_children(
    page: &mut Page,
    id: &BlockId,
    parent: Option<&BlockId>,
    index: usize,
) -> Result<(), MutationError> {
    let children = page
        .get(id)
        .map(|node| node.children.clone())
        .unwrap_or_default();

    for child in &children {
        page.detach(child);
    }
    page.remove_subtree(id);
    for (offset, child) in children.iter().enumerate() {
        if !page.attach(child, parent, index + offset) {
            return Err(MutationError::BlockNotFound(child.clone()));
        }
    }
    Ok(())
}
