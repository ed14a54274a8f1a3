//! # Page Arena
//!
//! A page is an ordered list of root blocks. Nested blocks live in the same
//! arena; containers refer to their children by id.
//!
//! ## Invariants
//!
//! - Every id appears in exactly one sibling list (the root list or one
//!   container's `children`)
//! - `parent` on each node names the container whose list holds it
//! - Only container kinds have children
//! - No cycles
//!
//! `detach` temporarily breaks the first invariant; callers reattach or
//! remove the block before handing the page on.

use crate::{Block, BlockId, BlockKind, BlockNode, ModelError, ModelResult};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    roots: Vec<BlockId>,
    nodes: HashMap<BlockId, BlockNode>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a page from nested blocks, rejecting duplicate ids and
    /// children on non-container kinds
    pub fn from_blocks(blocks: Vec<Block>) -> ModelResult<Self> {
        let mut page = Page::new();
        for block in blocks {
            let index = page.roots.len();
            page.graft(None, index, block)?;
        }
        Ok(page)
    }

    pub fn from_json(json: &str) -> ModelResult<Self> {
        let blocks: Vec<Block> = serde_json::from_str(json)?;
        Self::from_blocks(blocks)
    }

    pub fn to_json(&self) -> ModelResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_blocks())?)
    }

    /// Nested form of the whole page
    pub fn to_blocks(&self) -> Vec<Block> {
        self.roots.iter().filter_map(|id| self.subtree(id)).collect()
    }

    /// Nested copy of one block and its descendants (ids preserved)
    pub fn subtree(&self, id: &BlockId) -> Option<Block> {
        let node = self.nodes.get(id)?;
        Some(Block {
            id: node.id.clone(),
            kind: node.kind,
            content: node.content.clone(),
            checked: node.checked,
            toggle_open: node.toggle_open,
            payload: node.payload.clone(),
            children: node.children.iter().filter_map(|c| self.subtree(c)).collect(),
        })
    }

    pub fn get(&self, id: &BlockId) -> Option<&BlockNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &BlockId) -> Option<&mut BlockNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Total number of blocks, nested ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[BlockId] {
        &self.roots
    }

    pub fn first_block(&self) -> Option<&BlockId> {
        self.roots.first()
    }

    /// Sibling list owned by `parent` (`None` is the root list)
    pub fn children_of(&self, parent: Option<&BlockId>) -> Option<&[BlockId]> {
        match parent {
            None => Some(&self.roots),
            Some(id) => self.nodes.get(id).map(|node| node.children.as_slice()),
        }
    }

    fn list_mut(&mut self, parent: Option<&BlockId>) -> Option<&mut Vec<BlockId>> {
        match parent {
            None => Some(&mut self.roots),
            Some(id) => self.nodes.get_mut(id).map(|node| &mut node.children),
        }
    }

    /// Where a block sits: owning container (or root) and index within it
    pub fn position(&self, id: &BlockId) -> Option<(Option<BlockId>, usize)> {
        let node = self.nodes.get(id)?;
        let list = self.children_of(node.parent.as_ref())?;
        let index = list.iter().position(|c| c == id)?;
        Some((node.parent.clone(), index))
    }

    pub fn siblings_of(&self, id: &BlockId) -> Option<&[BlockId]> {
        let node = self.nodes.get(id)?;
        self.children_of(node.parent.as_ref())
    }

    pub fn parent_of(&self, id: &BlockId) -> Option<&BlockId> {
        self.nodes.get(id).and_then(|node| node.parent.as_ref())
    }

    /// Every block, pre-order
    pub fn document_order(&self) -> Vec<BlockId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for id in &self.roots {
            self.collect(id, false, &mut out);
        }
        out
    }

    /// Pre-order, skipping the children of closed toggles
    pub fn visible_order(&self) -> Vec<BlockId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for id in &self.roots {
            self.collect(id, true, &mut out);
        }
        out
    }

    /// Descendants of `id`, pre-order, excluding `id` itself
    pub fn descendants(&self, id: &BlockId) -> Vec<BlockId> {
        let mut out = Vec::new();
        if let Some(node) = self.nodes.get(id) {
            for child in &node.children {
                self.collect(child, false, &mut out);
            }
        }
        out
    }

    fn collect(&self, id: &BlockId, visible_only: bool, out: &mut Vec<BlockId>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        out.push(id.clone());
        if visible_only && node.kind == BlockKind::Toggle && !node.toggle_open {
            return;
        }
        for child in &node.children {
            self.collect(child, visible_only, out);
        }
    }

    /// True if `ancestor` is a strict ancestor of `id`
    pub fn is_ancestor(&self, ancestor: &BlockId, id: &BlockId) -> bool {
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent_of(parent);
        }
        false
    }

    /// Insert a nested block (and its subtree) into a sibling list.
    /// `index` is clamped to the list length.
    pub fn graft(&mut self, parent: Option<&BlockId>, index: usize, block: Block) -> ModelResult<BlockId> {
        if let Some(parent_id) = parent {
            let node = self
                .nodes
                .get(parent_id)
                .ok_or_else(|| ModelError::DanglingReference(parent_id.clone()))?;
            if !node.kind.is_container() {
                return Err(ModelError::ChildrenOnLeaf(parent_id.clone()));
            }
        }

        let mut seen = HashSet::new();
        self.check_incoming(&block, &mut seen)?;

        let id = self.add_nodes(parent.cloned(), block);
        let list = self
            .list_mut(parent)
            .ok_or_else(|| ModelError::DanglingReference(id.clone()))?;
        let index = index.min(list.len());
        list.insert(index, id.clone());
        Ok(id)
    }

    fn check_incoming(&self, block: &Block, seen: &mut HashSet<BlockId>) -> ModelResult<()> {
        if self.nodes.contains_key(&block.id) || !seen.insert(block.id.clone()) {
            return Err(ModelError::DuplicateId(block.id.clone()));
        }
        if !block.children.is_empty() && !block.kind.is_container() {
            return Err(ModelError::ChildrenOnLeaf(block.id.clone()));
        }
        for child in &block.children {
            self.check_incoming(child, seen)?;
        }
        Ok(())
    }

    fn add_nodes(&mut self, parent: Option<BlockId>, block: Block) -> BlockId {
        let Block {
            id,
            kind,
            content,
            checked,
            toggle_open,
            payload,
            children,
        } = block;

        let children = children
            .into_iter()
            .map(|child| self.add_nodes(Some(id.clone()), child))
            .collect();

        self.nodes.insert(
            id.clone(),
            BlockNode {
                id: id.clone(),
                kind,
                content,
                checked,
                toggle_open,
                payload,
                parent,
                children,
            },
        );
        id
    }

    /// Unlink a block from its sibling list, keeping it (and its subtree)
    /// in the arena. Returns where it was.
    pub fn detach(&mut self, id: &BlockId) -> Option<(Option<BlockId>, usize)> {
        let (parent, index) = self.position(id)?;
        self.list_mut(parent.as_ref())?.remove(index);
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = None;
        }
        Some((parent, index))
    }

    /// Link a detached block into a sibling list. Refuses non-containers
    /// and moves that would create a cycle.
    pub fn attach(&mut self, id: &BlockId, parent: Option<&BlockId>, index: usize) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        if let Some(parent_id) = parent {
            if parent_id == id || self.is_ancestor(id, parent_id) {
                return false;
            }
            match self.nodes.get(parent_id) {
                Some(node) if node.kind.is_container() => {}
                _ => return false,
            }
        }

        let Some(list) = self.list_mut(parent) else {
            return false;
        };
        let index = index.min(list.len());
        list.insert(index, id.clone());

        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = parent.cloned();
        }
        true
    }

    /// Remove a block and its whole subtree, returning it in nested form
    pub fn remove_subtree(&mut self, id: &BlockId) -> Option<Block> {
        self.detach(id)?;
        self.take_block(id)
    }

    fn take_block(&mut self, id: &BlockId) -> Option<Block> {
        let node = self.nodes.remove(id)?;
        let children = node
            .children
            .iter()
            .filter_map(|child| self.take_block(child))
            .collect();
        Some(Block {
            id: node.id,
            kind: node.kind,
            content: node.content,
            checked: node.checked,
            toggle_open: node.toggle_open,
            payload: node.payload,
            children,
        })
    }

    /// Check every structural invariant of the arena
    pub fn validate(&self) -> ModelResult<()> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for id in &self.roots {
            self.validate_node(None, id, &mut seen)?;
        }

        if seen.len() != self.nodes.len() {
            if let Some(orphan) = self.nodes.keys().find(|id| !seen.contains(*id)) {
                return Err(ModelError::Unreachable(orphan.clone()));
            }
        }
        Ok(())
    }

    fn validate_node(
        &self,
        parent: Option<&BlockId>,
        id: &BlockId,
        seen: &mut HashSet<BlockId>,
    ) -> ModelResult<()> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| ModelError::DanglingReference(id.clone()))?;

        if !seen.insert(id.clone()) {
            return Err(ModelError::ListedTwice(id.clone()));
        }
        if node.parent.as_ref() != parent {
            return Err(ModelError::ParentMismatch {
                id: id.clone(),
                recorded: node.parent.clone(),
                actual: parent.cloned(),
            });
        }
        if !node.children.is_empty() && !node.kind.is_container() {
            return Err(ModelError::ChildrenOnLeaf(id.clone()));
        }
        for child in &node.children {
            self.validate_node(Some(id), child, seen)?;
        }
        Ok(())
    }
}
