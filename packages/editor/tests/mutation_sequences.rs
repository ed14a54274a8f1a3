//! Tests for mutation sequences
//!
//! This tests:
//! - Undo/redo round trips over committed sequences
//! - Typing coalescing against structural edits
//! - Tree integrity under random operation chains

use proptest::prelude::*;
use quire_editor::{Block, BlockId, BlockKind, Direction, History, Mutation, Page};

fn seed_page() -> Page {
    Page::from_blocks(vec![
        Block::new(BlockKind::Heading1, "Plan").with_id("h"),
        Block::text("Intro paragraph").with_id("p"),
        Block::new(BlockKind::Toggle, "Details")
            .with_id("t")
            .with_children(vec![
                Block::text("first").with_id("t1"),
                Block::new(BlockKind::BulletItem, "second").with_id("t2"),
            ]),
        Block::new(BlockKind::Callout, "Note")
            .with_id("k")
            .with_children(vec![Block::new(BlockKind::Todo, "check").with_id("k1")]),
        Block::new(BlockKind::Divider, "").with_id("d"),
        Block::new(BlockKind::NumberedItem, "last").with_id("n"),
    ])
    .unwrap()
}

#[test]
fn test_move_then_delete_sequence() {
    let mut page = seed_page();
    let mut history = History::with_limits(page.clone(), 0, 500);

    let chain = [
        Mutation::Move {
            id: "n".into(),
            direction: Direction::Up,
        },
        Mutation::Delete { id: "t".into() },
        Mutation::Duplicate { id: "k".into() },
    ];
    for (at, mutation) in chain.iter().enumerate() {
        let applied = mutation.apply(&page);
        assert!(applied.changed, "{} did nothing", mutation.name());
        page = applied.page;
        history.commit(page.clone(), at as u64, mutation.name());
    }

    // Toggle removed, its children promoted in its place
    let roots: Vec<String> = page.roots().iter().map(|id| id.to_string()).collect();
    assert_eq!(&roots[..4], &["h", "p", "t1", "t2"]);
    assert!(page.validate().is_ok());

    assert_eq!(history.undo_label(), Some("duplicate"));
    history.undo();
    history.undo();
    assert!(history.present().contains(&"t".into()));
    history.undo();
    assert_eq!(history.present(), &seed_page());

    history.redo();
    history.redo();
    history.redo();
    assert_eq!(history.present(), &page);
}

#[test]
fn test_multiple_text_updates_with_undo_redo() {
    let page = seed_page();
    let mut history = History::with_limits(page.clone(), 0, 500);
    let mut current = page.clone();

    // Keystrokes 100ms apart form one undo step
    for (i, text) in ["I", "In", "Int", "Intr"].iter().enumerate() {
        current = Mutation::UpdateContent {
            id: "p".into(),
            content: text.to_string(),
        }
        .apply(&current)
        .page;
        history.commit_merged(current.clone(), i as u64 * 100, "update_content");
    }
    assert_eq!(history.undo_levels(), 1);

    // A structural edit in between starts a new step
    current = Mutation::Split {
        id: "p".into(),
        offset: 2,
    }
    .apply(&current)
    .page;
    history.commit(current.clone(), 350, "split");
    assert_eq!(history.undo_levels(), 2);

    history.undo();
    assert_eq!(history.present().get(&"p".into()).unwrap().content, "Intr");
    history.undo();
    assert_eq!(history.present(), &page);
    assert!(history.undo().is_none());
}

#[test]
fn test_insert_and_remove_sequence() {
    let page = seed_page();

    let inserted = Mutation::InsertBlocks {
        parent: Some("k".into()),
        index: 1,
        blocks: vec![Block::text("pasted a"), Block::text("pasted b")],
    }
    .apply(&page);
    assert!(inserted.changed);
    let callout = inserted.page.get(&"k".into()).unwrap();
    assert_eq!(callout.children.len(), 3);

    let ids: Vec<BlockId> = callout.children[1..].to_vec();
    let removed = Mutation::RemoveBlocks { ids }.apply(&inserted.page);
    assert_eq!(removed.page, page);
}

fn arb_block_kind() -> impl Strategy<Value = BlockKind> {
    prop::sample::select(BlockKind::ALL.to_vec())
}

/// Random operation templates, resolved against the page's current ids
#[derive(Debug, Clone)]
enum Op {
    InsertAfter(usize, BlockKind),
    Split(usize, usize),
    MergeUp(usize),
    Delete(usize),
    Move(usize, bool),
    Duplicate(usize),
    ChangeType(usize, BlockKind),
    InsertChild(usize, BlockKind),
    Promote(usize),
    Type(usize, String),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<usize>(), arb_block_kind()).prop_map(|(i, k)| Op::InsertAfter(i, k)),
        (any::<usize>(), 0usize..20).prop_map(|(i, o)| Op::Split(i, o)),
        any::<usize>().prop_map(Op::MergeUp),
        any::<usize>().prop_map(Op::Delete),
        (any::<usize>(), any::<bool>()).prop_map(|(i, up)| Op::Move(i, up)),
        any::<usize>().prop_map(Op::Duplicate),
        (any::<usize>(), arb_block_kind()).prop_map(|(i, k)| Op::ChangeType(i, k)),
        (any::<usize>(), arb_block_kind()).prop_map(|(i, k)| Op::InsertChild(i, k)),
        any::<usize>().prop_map(Op::Promote),
        (any::<usize>(), "[a-z ]{0,8}").prop_map(|(i, s)| Op::Type(i, s)),
    ]
}

fn resolve(op: &Op, page: &Page) -> Option<Mutation> {
    let order = page.document_order();
    let pick = |i: usize| -> Option<BlockId> {
        if order.is_empty() {
            None
        } else {
            Some(order[i % order.len()].clone())
        }
    };

    let mutation = match op {
        Op::InsertAfter(i, kind) => Mutation::InsertAfter {
            after: pick(*i),
            kind: *kind,
            content: "new".into(),
        },
        Op::Split(i, offset) => Mutation::Split {
            id: pick(*i)?,
            offset: *offset,
        },
        Op::MergeUp(i) => Mutation::MergeUp { id: pick(*i)? },
        Op::Delete(i) => Mutation::Delete { id: pick(*i)? },
        Op::Move(i, up) => Mutation::Move {
            id: pick(*i)?,
            direction: if *up { Direction::Up } else { Direction::Down },
        },
        Op::Duplicate(i) => Mutation::Duplicate { id: pick(*i)? },
        Op::ChangeType(i, kind) => Mutation::ChangeType {
            id: pick(*i)?,
            kind: *kind,
        },
        Op::InsertChild(i, kind) => Mutation::InsertChild {
            container: pick(*i)?,
            after_index: Some(*i % 3),
            kind: *kind,
            content: String::new(),
        },
        Op::Promote(i) => {
            let child = pick(*i)?;
            let container = page.parent_of(&child)?.clone();
            Mutation::PromoteToSibling { container, child }
        }
        Op::Type(i, text) => Mutation::UpdateContent {
            id: pick(*i)?,
            content: text.clone(),
        },
    };
    Some(mutation)
}

proptest! {
    #[test]
    fn prop_random_sequences_keep_tree_valid(ops in prop::collection::vec(arb_op(), 1..40)) {
        let mut page = seed_page();
        for op in &ops {
            if let Some(mutation) = resolve(op, &page) {
                let applied = mutation.apply(&page);
                prop_assert!(applied.page.validate().is_ok(), "{:?} broke the tree", mutation);
                if let Some(focus) = &applied.focus {
                    prop_assert!(applied.page.contains(&focus.block));
                }
                if !applied.changed {
                    prop_assert_eq!(&applied.page, &page);
                }
                page = applied.page;
            }
        }
    }

    #[test]
    fn prop_undo_all_returns_to_start(ops in prop::collection::vec(arb_op(), 1..25)) {
        let start = seed_page();
        let mut history = History::with_limits(start.clone(), 0, 500);
        let mut page = start.clone();
        let mut steps = 0;

        for op in &ops {
            let Some(mutation) = resolve(op, &page) else { continue };
            let applied = mutation.apply(&page);
            if !applied.changed {
                continue;
            }
            page = applied.page;
            history.commit(page.clone(), steps, mutation.name());
            steps += 1;
        }

        for _ in 0..steps {
            prop_assert!(history.undo().is_some());
        }
        prop_assert_eq!(history.present(), &start);

        for _ in 0..steps {
            prop_assert!(history.redo().is_some());
        }
        prop_assert_eq!(history.present(), &page);
    }
}
