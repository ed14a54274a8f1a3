//! Markdown-style shortcuts typed at the start of an empty text block.

use quire_model::BlockKind;

/// Conversion triggered by a shortcut token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub kind: BlockKind,
    pub checked: bool,
}

const SHORTCUTS: &[(&str, BlockKind, bool)] = &[
    ("#", BlockKind::Heading1, false),
    ("##", BlockKind::Heading2, false),
    ("###", BlockKind::Heading3, false),
    ("*", BlockKind::BulletItem, false),
    ("-", BlockKind::BulletItem, false),
    ("+", BlockKind::BulletItem, false),
    ("1.", BlockKind::NumberedItem, false),
    ("[]", BlockKind::Todo, false),
    ("[ ]", BlockKind::Todo, false),
    ("[x]", BlockKind::Todo, true),
    (">", BlockKind::Quote, false),
    ("```", BlockKind::Code, false),
    ("---", BlockKind::Divider, false),
    ("***", BlockKind::Divider, false),
    (">!", BlockKind::Toggle, false),
];

/// Match content that is exactly a shortcut token followed by a space
pub fn detect(content: &str) -> Option<Shortcut> {
    if !content.ends_with(' ') {
        return None;
    }
    let token = content.trim();
    SHORTCUTS
        .iter()
        .find(|(candidate, _, _)| *candidate == token)
        .map(|&(_, kind, checked)| Shortcut { kind, checked })
}
