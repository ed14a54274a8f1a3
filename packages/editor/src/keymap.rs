use crate::events::{Key, Modifiers};
use crate::mutations::Direction;

/// Block-level shortcuts, independent of the focused block's state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Duplicate,
    DeleteBlock,
    Move(Direction),
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    SelectAll,
}

/// Shortcut bound to a key chord, if any
pub fn resolve(key: Key, modifiers: Modifiers) -> Option<KeyAction> {
    if !modifiers.primary || modifiers.alt {
        return None;
    }

    let action = match (key, modifiers.shift) {
        (Key::Backspace, true) => KeyAction::DeleteBlock,
        (Key::ArrowUp, true) => KeyAction::Move(Direction::Up),
        (Key::ArrowDown, true) => KeyAction::Move(Direction::Down),
        (Key::Char(c), shift) => match (c.to_ascii_lowercase(), shift) {
            ('d', false) => KeyAction::Duplicate,
            ('z', false) => KeyAction::Undo,
            ('z', true) | ('y', false) => KeyAction::Redo,
            ('c', false) => KeyAction::Copy,
            ('x', false) => KeyAction::Cut,
            ('v', false) => KeyAction::Paste,
            ('a', false) => KeyAction::SelectAll,
            _ => return None,
        },
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings() {
        let primary = Modifiers::primary();
        let primary_shift = Modifiers::primary_shift();

        assert_eq!(resolve(Key::Char('d'), primary), Some(KeyAction::Duplicate));
        assert_eq!(resolve(Key::Backspace, primary_shift), Some(KeyAction::DeleteBlock));
        assert_eq!(
            resolve(Key::ArrowUp, primary_shift),
            Some(KeyAction::Move(Direction::Up))
        );
        assert_eq!(resolve(Key::Char('z'), primary), Some(KeyAction::Undo));
        assert_eq!(resolve(Key::Char('Z'), primary_shift), Some(KeyAction::Redo));
        assert_eq!(resolve(Key::Char('y'), primary), Some(KeyAction::Redo));
        assert_eq!(resolve(Key::Char('v'), primary), Some(KeyAction::Paste));
    }

    #[test]
    fn test_plain_keys_are_unbound() {
        assert_eq!(resolve(Key::Char('d'), Modifiers::NONE), None);
        assert_eq!(resolve(Key::Backspace, Modifiers::primary()), None);
        assert_eq!(resolve(Key::ArrowUp, Modifiers::shift()), None);
    }
}
