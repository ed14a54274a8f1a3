//! Multi-block selection: a contiguous document-order run plus an anchor.

use quire_model::{BlockId, Page};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Selected ids in document order
    ids: Vec<BlockId>,
    anchor: Option<BlockId>,

    /// Far end of the run, the block the last range action landed on
    extent: Option<BlockId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.ids.is_empty()
    }

    pub fn ids(&self) -> &[BlockId] {
        &self.ids
    }

    pub fn anchor(&self) -> Option<&BlockId> {
        self.anchor.as_ref()
    }

    /// Plain action on a block: drop the selection, remember the block as anchor
    pub fn anchor_at(&mut self, id: BlockId) {
        self.ids.clear();
        self.anchor = Some(id);
        self.extent = None;
    }

    /// Range action on a block: select everything between the anchor and
    /// `id` in document order. Recomputed from scratch every time.
    pub fn extend_to(&mut self, page: &Page, id: &BlockId) {
        let order = page.document_order();
        let Some(target) = order.iter().position(|candidate| candidate == id) else {
            return;
        };

        let anchor = self
            .anchor
            .as_ref()
            .and_then(|anchor| order.iter().position(|candidate| candidate == anchor));

        match anchor {
            Some(anchor) => {
                let (start, end) = if anchor <= target {
                    (anchor, target)
                } else {
                    (target, anchor)
                };
                self.ids = order[start..=end].to_vec();
            }
            None => {
                self.anchor = Some(id.clone());
                self.ids = vec![id.clone()];
            }
        }
        self.extent = Some(id.clone());
    }

    /// Select every root block. Descendants come along, so `ids` is the
    /// whole document order and stays one contiguous run; `top_level`
    /// gives back exactly the roots.
    pub fn select_all(&mut self, page: &Page) {
        let order = page.document_order();
        self.anchor = order.first().cloned();
        self.extent = order.last().cloned();
        self.ids = order;
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.anchor = None;
        self.extent = None;
    }

    /// Re-derive the run after an edit: everything between anchor and
    /// extent in the new document order. The selection is dropped when
    /// either end no longer exists.
    pub fn reconcile(&mut self, page: &Page) {
        if self.anchor.as_ref().is_some_and(|anchor| !page.contains(anchor)) {
            self.anchor = None;
        }
        if self.ids.is_empty() {
            return;
        }

        let extent = self.extent.clone().filter(|extent| page.contains(extent));
        match extent {
            Some(extent) if self.anchor.is_some() => self.extend_to(page, &extent),
            _ => {
                self.ids.clear();
                self.extent = None;
            }
        }
    }

    /// Selected blocks with no selected ancestor, document order. A selected
    /// container carries its selected descendants along.
    pub fn top_level(&self, page: &Page) -> Vec<BlockId> {
        self.ids
            .iter()
            .filter(|id| page.contains(id))
            .filter(|id| !self.ids.iter().any(|other| page.is_ancestor(other, id)))
            .cloned()
            .collect()
    }

    /// Sibling-list position of the earliest selected block
    pub fn earliest_position(&self, page: &Page) -> Option<(Option<BlockId>, usize)> {
        self.ids.iter().find_map(|id| page.position(id))
    }

    /// True when the ids form one unbroken run of the document order
    pub fn is_contiguous(&self, page: &Page) -> bool {
        if self.ids.is_empty() {
            return true;
        }
        let order = page.document_order();
        let Some(start) = order.iter().position(|id| *id == self.ids[0]) else {
            return false;
        };
        order.get(start..start + self.ids.len()) == Some(self.ids.as_slice())
    }
}
