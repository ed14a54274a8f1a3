use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of block types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    #[default]
    Text,
    Heading1,
    Heading2,
    Heading3,
    BulletItem,
    NumberedItem,
    Todo,
    Code,
    Quote,
    Divider,
    Toggle,
    Callout,
    Image,
    Table,
}

impl BlockKind {
    pub const ALL: [BlockKind; 14] = [
        BlockKind::Text,
        BlockKind::Heading1,
        BlockKind::Heading2,
        BlockKind::Heading3,
        BlockKind::BulletItem,
        BlockKind::NumberedItem,
        BlockKind::Todo,
        BlockKind::Code,
        BlockKind::Quote,
        BlockKind::Divider,
        BlockKind::Toggle,
        BlockKind::Callout,
        BlockKind::Image,
        BlockKind::Table,
    ];

    /// List items continue as the same type when split
    pub fn is_list(self) -> bool {
        matches!(self, BlockKind::BulletItem | BlockKind::NumberedItem | BlockKind::Todo)
    }

    /// Enter inserts a literal newline instead of splitting
    pub fn is_multiline(self) -> bool {
        matches!(self, BlockKind::Code | BlockKind::Quote)
    }

    /// Owns an ordered list of child blocks
    pub fn is_container(self) -> bool {
        matches!(self, BlockKind::Toggle | BlockKind::Callout)
    }

    /// Carries an editable text payload
    pub fn has_text(self) -> bool {
        !matches!(self, BlockKind::Divider | BlockKind::Image | BlockKind::Table)
    }

    pub fn label(self) -> &'static str {
        match self {
            BlockKind::Text => "Text",
            BlockKind::Heading1 => "Heading 1",
            BlockKind::Heading2 => "Heading 2",
            BlockKind::Heading3 => "Heading 3",
            BlockKind::BulletItem => "Bulleted list",
            BlockKind::NumberedItem => "Numbered list",
            BlockKind::Todo => "To-do list",
            BlockKind::Code => "Code",
            BlockKind::Quote => "Quote",
            BlockKind::Divider => "Divider",
            BlockKind::Toggle => "Toggle",
            BlockKind::Callout => "Callout",
            BlockKind::Image => "Image",
            BlockKind::Table => "Table",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(serde_json::to_string(&BlockKind::Heading1).unwrap(), "\"heading1\"");
        assert_eq!(serde_json::to_string(&BlockKind::BulletItem).unwrap(), "\"bullet_item\"");
        let kind: BlockKind = serde_json::from_str("\"todo\"").unwrap();
        assert_eq!(kind, BlockKind::Todo);
    }

    #[test]
    fn test_predicates_partition_kinds() {
        for kind in BlockKind::ALL {
            assert!(!(kind.is_list() && kind.is_container()));
            assert!(!(kind.is_multiline() && kind.is_list()));
        }
        assert!(BlockKind::Toggle.has_text());
        assert!(!BlockKind::Divider.has_text());
    }

    #[test]
    fn test_default_kind_is_text() {
        assert_eq!(BlockKind::default(), BlockKind::Text);
    }
}
