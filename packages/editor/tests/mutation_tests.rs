//! Laws of the individual block mutations

use quire_editor::{Block, BlockId, BlockKind, Direction, FocusHint, Mutation, Page};

fn ids(page: &Page, parent: Option<&str>) -> Vec<String> {
    let parent = parent.map(BlockId::from);
    page.children_of(parent.as_ref())
        .unwrap_or_default()
        .iter()
        .map(|id| id.to_string())
        .collect()
}

fn content(page: &Page, id: &str) -> String {
    page.get(&id.into()).unwrap().content.clone()
}

#[test]
fn test_split_mutation() {
    let page = Page::from_blocks(vec![Block::text("Hello World").with_id("a")]).unwrap();

    let applied = Mutation::Split {
        id: "a".into(),
        offset: 5,
    }
    .apply(&page);

    assert!(applied.changed);
    let blocks = applied.page.to_blocks();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].id, "a".into());
    assert_eq!(blocks[0].content, "Hello");
    assert_eq!(blocks[1].content, " World");
    assert_eq!(blocks[1].kind, BlockKind::Text);
    assert_eq!(applied.focus, Some(FocusHint::start(blocks[1].id.clone())));
}

#[test]
fn test_split_keeps_list_kind_only() {
    let page = Page::from_blocks(vec![
        Block::new(BlockKind::Todo, "buy milk").with_id("t").with_checked(true),
        Block::new(BlockKind::Heading1, "Title").with_id("h"),
    ])
    .unwrap();

    let page = Mutation::Split {
        id: "t".into(),
        offset: 3,
    }
    .apply(&page)
    .page;
    let page = Mutation::Split {
        id: "h".into(),
        offset: 5,
    }
    .apply(&page)
    .page;

    let blocks = page.to_blocks();
    assert_eq!(blocks[1].kind, BlockKind::Todo);
    assert_eq!(blocks[1].content, " milk");
    assert!(!blocks[1].checked);
    assert_eq!(blocks[3].kind, BlockKind::Text);
    assert_eq!(blocks[3].content, "");
}

#[test]
fn test_merge_up_law() {
    let page = Page::from_blocks(vec![
        Block::text("abc").with_id("a"),
        Block::new(BlockKind::Callout, "xyz")
            .with_id("b")
            .with_children(vec![Block::text("c1").with_id("c1"), Block::text("c2").with_id("c2")]),
        Block::text("tail").with_id("z"),
    ])
    .unwrap();

    let applied = Mutation::MergeUp { id: "b".into() }.apply(&page);

    assert!(applied.changed);
    assert_eq!(content(&applied.page, "a"), "abcxyz");
    assert!(!applied.page.contains(&"b".into()));
    assert_eq!(ids(&applied.page, None), vec!["a", "c1", "c2", "z"]);
    assert_eq!(
        applied.focus,
        Some(FocusHint {
            block: "a".into(),
            offset: 3
        })
    );
    assert!(applied.page.validate().is_ok());
}

#[test]
fn test_merge_up_of_first_sibling_is_noop() {
    let page = Page::from_blocks(vec![
        Block::text("a").with_id("a"),
        Block::new(BlockKind::Divider, "").with_id("d"),
        Block::text("b").with_id("b"),
    ])
    .unwrap();

    assert!(!Mutation::MergeUp { id: "a".into() }.apply(&page).changed);
    // Nothing to append text to
    assert!(!Mutation::MergeUp { id: "b".into() }.apply(&page).changed);
}

#[test]
fn test_delete_promotes_children() {
    let page = Page::from_blocks(vec![
        Block::text("first").with_id("x"),
        Block::new(BlockKind::Toggle, "container")
            .with_id("t")
            .with_children(vec![Block::text("c1").with_id("c1"), Block::text("c2").with_id("c2")]),
        Block::text("last").with_id("y"),
    ])
    .unwrap();

    let applied = Mutation::Delete { id: "t".into() }.apply(&page);

    // Length L=3 becomes L+1 with the children at the container's index
    assert_eq!(ids(&applied.page, None), vec!["x", "c1", "c2", "y"]);
    assert_eq!(applied.page.get(&"c1".into()).unwrap().parent, None);
    assert_eq!(applied.focus, Some(FocusHint::start("c1".into())));
    assert!(applied.page.validate().is_ok());
}

#[test]
fn test_delete_focus_falls_back() {
    let page = Page::from_blocks(vec![
        Block::text("first").with_id("a"),
        Block::text("second").with_id("b"),
    ])
    .unwrap();

    let applied = Mutation::Delete { id: "b".into() }.apply(&page);
    assert_eq!(
        applied.focus,
        Some(FocusHint {
            block: "a".into(),
            offset: 5
        })
    );

    let applied = Mutation::Delete { id: "a".into() }.apply(&page);
    assert_eq!(applied.focus, Some(FocusHint::start("b".into())));
}

#[test]
fn test_duplicate_identity_law() {
    let page = Page::from_blocks(vec![
        Block::text("before").with_id("p"),
        Block::new(BlockKind::Toggle, "group")
            .with_id("t")
            .with_children(vec![
                Block::text("one").with_id("c1"),
                Block::new(BlockKind::Callout, "two")
                    .with_id("c2")
                    .with_children(vec![Block::text("deep").with_id("c3")]),
            ]),
    ])
    .unwrap();

    let original = page.subtree(&"t".into()).unwrap();
    let applied = Mutation::Duplicate { id: "t".into() }.apply(&page);

    assert_eq!(applied.page.len(), page.len() + 1 + original.descendant_count());
    let roots = applied.page.roots();
    assert_eq!(roots.len(), 3);
    assert_eq!(roots[1], "t".into());

    let copy = applied.page.subtree(&roots[2]).unwrap();
    assert!(copy.same_shape(&original));
    let original_ids = original.ids();
    for id in copy.ids() {
        assert!(!original_ids.contains(&id));
    }
    assert_eq!(applied.focus.map(|hint| hint.block), Some(copy.id));
}

#[test]
fn test_boundary_move_is_noop() {
    let page = Page::from_blocks(vec![
        Block::text("1").with_id("a"),
        Block::text("2").with_id("b"),
        Block::text("3").with_id("c"),
    ])
    .unwrap();

    let up = Mutation::Move {
        id: "a".into(),
        direction: Direction::Up,
    }
    .apply(&page);
    assert!(!up.changed);
    assert_eq!(up.page, page);

    let down = Mutation::Move {
        id: "c".into(),
        direction: Direction::Down,
    }
    .apply(&page);
    assert!(!down.changed);

    let moved = Mutation::Move {
        id: "b".into(),
        direction: Direction::Down,
    }
    .apply(&page);
    assert_eq!(ids(&moved.page, None), vec!["a", "c", "b"]);
}

#[test]
fn test_move_stays_within_container() {
    let page = Page::from_blocks(vec![Block::new(BlockKind::Callout, "")
        .with_id("k")
        .with_children(vec![Block::text("1").with_id("a"), Block::text("2").with_id("b")])])
    .unwrap();

    let moved = Mutation::Move {
        id: "b".into(),
        direction: Direction::Up,
    }
    .apply(&page);
    assert_eq!(ids(&moved.page, Some("k")), vec!["b", "a"]);

    // Already first inside the container
    assert!(!Mutation::Move {
        id: "b".into(),
        direction: Direction::Up
    }
    .apply(&moved.page)
    .changed);
}

#[test]
fn test_change_type() {
    let page = Page::from_blocks(vec![
        Block::text("words").with_id("a"),
        Block::new(BlockKind::Todo, "task").with_id("t").with_checked(true),
    ])
    .unwrap();

    let divider = Mutation::ChangeType {
        id: "a".into(),
        kind: BlockKind::Divider,
    }
    .apply(&page);
    assert_eq!(content(&divider.page, "a"), "");

    let todo = Mutation::ChangeType {
        id: "a".into(),
        kind: BlockKind::Todo,
    }
    .apply(&page);
    let node = todo.page.get(&"a".into()).unwrap();
    assert_eq!(node.kind, BlockKind::Todo);
    assert_eq!(node.content, "words");
    assert!(!node.checked);

    let text = Mutation::ChangeType {
        id: "t".into(),
        kind: BlockKind::Text,
    }
    .apply(&page);
    assert!(!text.page.get(&"t".into()).unwrap().checked);
}

#[test]
fn test_change_type_from_container_keeps_children() {
    let page = Page::from_blocks(vec![
        Block::new(BlockKind::Toggle, "t")
            .with_id("t")
            .with_children(vec![Block::text("c").with_id("c")]),
        Block::text("after").with_id("z"),
    ])
    .unwrap();

    let applied = Mutation::ChangeType {
        id: "t".into(),
        kind: BlockKind::Heading2,
    }
    .apply(&page);
    assert_eq!(ids(&applied.page, None), vec!["t", "c", "z"]);
    assert!(applied.page.validate().is_ok());
}

#[test]
fn test_insert_child_opens_toggle() {
    let mut page = Page::from_blocks(vec![Block::new(BlockKind::Toggle, "t")
        .with_id("t")
        .with_children(vec![Block::text("c").with_id("c")])])
    .unwrap();
    page.get_mut(&"t".into()).unwrap().toggle_open = false;

    let applied = Mutation::InsertChild {
        container: "t".into(),
        after_index: Some(0),
        kind: BlockKind::Text,
        content: "new".into(),
    }
    .apply(&page);

    let toggle = applied.page.get(&"t".into()).unwrap();
    assert!(toggle.toggle_open);
    assert_eq!(toggle.children.len(), 2);
    assert_eq!(content(&applied.page, toggle.children[1].as_str()), "new");

    // Leaves never take children
    let leaf = Mutation::InsertChild {
        container: "c".into(),
        after_index: None,
        kind: BlockKind::Text,
        content: String::new(),
    }
    .apply(&applied.page);
    assert!(!leaf.changed);
}

#[test]
fn test_promote_to_sibling() {
    let page = Page::from_blocks(vec![
        Block::new(BlockKind::Callout, "note")
            .with_id("k")
            .with_children(vec![Block::text("keep").with_id("a"), Block::text("").with_id("b")]),
        Block::text("after").with_id("z"),
    ])
    .unwrap();

    let applied = Mutation::PromoteToSibling {
        container: "k".into(),
        child: "b".into(),
    }
    .apply(&page);

    assert_eq!(ids(&applied.page, None), vec!["k", "b", "z"]);
    assert_eq!(ids(&applied.page, Some("k")), vec!["a"]);
    assert_eq!(applied.focus, Some(FocusHint::start("b".into())));

    // Not a child of that container
    assert!(!Mutation::PromoteToSibling {
        container: "k".into(),
        child: "z".into()
    }
    .apply(&page)
    .changed);
}

#[test]
fn test_payload_is_stored_unchanged() {
    let page = Page::from_blocks(vec![Block::new(BlockKind::Table, "").with_id("tbl")]).unwrap();
    let grid = serde_json::json!({
        "columns": [{"name": "Done", "type": "checkbox"}],
        "rows": [[true], [false]]
    });

    let applied = Mutation::SetPayload {
        id: "tbl".into(),
        payload: Some(grid.clone()),
    }
    .apply(&page);
    assert_eq!(applied.page.get(&"tbl".into()).unwrap().payload, Some(grid));
}

#[test]
fn test_remove_blocks_does_not_promote() {
    let page = Page::from_blocks(vec![
        Block::text("1").with_id("a"),
        Block::new(BlockKind::Toggle, "2")
            .with_id("t")
            .with_children(vec![Block::text("child").with_id("c")]),
        Block::text("3").with_id("b"),
    ])
    .unwrap();

    let applied = Mutation::RemoveBlocks {
        ids: vec!["t".into(), "b".into()],
    }
    .apply(&page);

    assert_eq!(ids(&applied.page, None), vec!["a"]);
    assert!(!applied.page.contains(&"c".into()));
    assert_eq!(applied.focus, Some(FocusHint::start("a".into())));
}

#[test]
fn test_operations_on_missing_ids_are_identity() {
    let page = Page::from_blocks(vec![Block::text("only").with_id("a")]).unwrap();
    let missing: BlockId = "gone".into();

    let mutations = vec![
        Mutation::Split {
            id: missing.clone(),
            offset: 1,
        },
        Mutation::MergeUp { id: missing.clone() },
        Mutation::Delete { id: missing.clone() },
        Mutation::Duplicate { id: missing.clone() },
        Mutation::Move {
            id: missing.clone(),
            direction: Direction::Down,
        },
        Mutation::ChangeType {
            id: missing.clone(),
            kind: BlockKind::Quote,
        },
        Mutation::UpdateContent {
            id: missing.clone(),
            content: "x".into(),
        },
        Mutation::InsertAfter {
            after: Some(missing.clone()),
            kind: BlockKind::Text,
            content: String::new(),
        },
        Mutation::RemoveBlocks { ids: vec![missing] },
    ];

    for mutation in mutations {
        let applied = mutation.apply(&page);
        assert!(!applied.changed, "{:?}", mutation);
        assert_eq!(applied.page, page);
    }
}
