use crate::{BlockId, BlockKind};
use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

/// A block in nested form: what gets persisted, copied and rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,

    #[serde(rename = "type")]
    pub kind: BlockKind,

    /// Text payload; unused for divider, image and table
    #[serde(default)]
    pub content: String,

    /// Only meaningful for to-do
    #[serde(default, skip_serializing_if = "is_false")]
    pub checked: bool,

    /// Only meaningful for toggle
    #[serde(default, skip_serializing_if = "is_false")]
    pub toggle_open: bool,

    /// Opaque collaborator data (tabular sub-document, image source)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,

    /// Present only on container kinds
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

impl Block {
    /// New leaf block with a fresh id
    pub fn new(kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            id: BlockId::generate(),
            kind,
            content: content.into(),
            checked: false,
            toggle_open: kind == BlockKind::Toggle,
            payload: None,
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(BlockKind::Text, content)
    }

    pub fn with_id(mut self, id: impl Into<BlockId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Number of blocks below this one
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Ids of this block and every descendant, pre-order
    pub fn ids(&self) -> Vec<BlockId> {
        let mut out = Vec::with_capacity(1 + self.descendant_count());
        self.collect_ids(&mut out);
        out
    }

    fn collect_ids(&self, out: &mut Vec<BlockId>) {
        out.push(self.id.clone());
        for child in &self.children {
            child.collect_ids(out);
        }
    }

    /// Deep copy with every id in the subtree regenerated
    pub fn with_fresh_ids(&self) -> Block {
        Block {
            id: BlockId::generate(),
            kind: self.kind,
            content: self.content.clone(),
            checked: self.checked,
            toggle_open: self.toggle_open,
            payload: self.payload.clone(),
            children: self.children.iter().map(Block::with_fresh_ids).collect(),
        }
    }

    /// Same type, content and children shape, ignoring ids
    pub fn same_shape(&self, other: &Block) -> bool {
        self.kind == other.kind
            && self.content == other.content
            && self.checked == other.checked
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_shape(b))
    }
}

/// A block as stored in the page arena: children are referenced by id
#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    pub id: BlockId,
    pub kind: BlockKind,
    pub content: String,
    pub checked: bool,
    pub toggle_open: bool,
    pub payload: Option<serde_json::Value>,
    pub parent: Option<BlockId>,
    pub children: Vec<BlockId>,
}

impl BlockNode {
    /// Content length in chars, the unit cursor offsets are measured in
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
