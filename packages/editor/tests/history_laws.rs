//! Undo/redo laws over real editing sequences

use pagesmith_common::{BlockStyle, BlockType, HistorySnapshot, Props, TextAlign};
use pagesmith_editor::{ContentTree, FileHistoryStore, HistoryStore};
use serde_json::json;
use std::sync::Arc;

fn props(value: serde_json::Value) -> Props {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Props::new(),
    }
}

/// Builds a page through a mix of operations; returns the number of
/// tracked steps taken
fn edit_session(tree: &mut ContentTree) -> usize {
    let header = tree.add_block(BlockType::Header);
    let text = tree.add_block(BlockType::HeadingText);
    let gallery = tree.add_block(BlockType::Gallery);
    tree.update_props(&header, props(json!({"title": "Harbour Coffee"})));
    tree.update_style(
        &text,
        BlockStyle {
            padding: Some(32.0),
            text_align: Some(TextAlign::Center),
            ..Default::default()
        },
    );
    tree.reorder(&gallery, Some(&header));
    tree.update_design_tokens(|tokens| tokens.card.surface_color = "#fff7ed".to_string());
    tree.set_slug("harbour-coffee");
    tree.remove_block(&text);
    9
}

#[test]
fn test_undo_then_redo_reproduces_state() {
    let mut tree = ContentTree::in_memory("laws", HistorySnapshot::default());
    let steps = edit_session(&mut tree);
    let edited = tree.snapshot().clone();

    for _ in 0..steps {
        assert!(tree.undo());
    }
    assert_eq!(*tree.snapshot(), HistorySnapshot::default());
    assert!(!tree.undo());

    for _ in 0..steps {
        assert!(tree.redo());
    }
    assert_eq!(*tree.snapshot(), edited);
    assert!(!tree.redo());
}

#[test]
fn test_new_mutation_after_undo_discards_redo() {
    let mut tree = ContentTree::in_memory("branch", HistorySnapshot::default());
    edit_session(&mut tree);

    tree.undo();
    tree.undo();
    assert!(tree.can_redo());

    tree.add_block(BlockType::Contact);
    assert!(!tree.can_redo());
    assert!(!tree.redo());
}

#[test]
fn test_reorder_no_ops_keep_order_and_identity() {
    let mut tree = ContentTree::in_memory("reorder", HistorySnapshot::default());
    let a = tree.add_block(BlockType::Header);
    let b = tree.add_block(BlockType::Video);
    let before = tree.snapshot().clone();

    assert_eq!(tree.reorder(&a, Some(&a)), None);
    assert_eq!(tree.reorder(&b, None), None);

    let after = tree.snapshot();
    assert_eq!(after.content_blocks.len(), before.content_blocks.len());
    for (x, y) in before.content_blocks.iter().zip(&after.content_blocks) {
        assert!(Arc::ptr_eq(x, y));
    }

    // the two adds are still the only undo steps
    assert!(tree.undo());
    assert!(tree.undo());
    assert!(!tree.undo());
}

#[test]
fn test_batched_keystrokes_undo_together() {
    let mut tree = ContentTree::in_memory("batch", HistorySnapshot::default());
    let id = tree.add_block(BlockType::HeadingText);

    tree.begin_batch();
    for heading in ["O", "Ou", "Our", "Our menu"] {
        tree.update_props(&id, props(json!({ "heading": heading })));
    }
    tree.end_batch();

    assert_eq!(tree.blocks()[0].props["heading"], "Our menu");
    assert!(tree.undo());
    assert_eq!(tree.blocks()[0].props["heading"], "Heading");
    assert!(tree.undo());
    assert!(tree.is_empty());
}

#[test]
fn test_history_survives_reload_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn HistoryStore> = Arc::new(FileHistoryStore::new(dir.path()));

    let mut tree = ContentTree::open("page://7", HistorySnapshot::default(), 50, store.clone());
    edit_session(&mut tree);
    tree.undo();
    let present = tree.snapshot().clone();
    drop(tree);

    let mut reloaded = ContentTree::open("page://7", HistorySnapshot::default(), 50, store);
    assert_eq!(*reloaded.snapshot(), present);
    assert!(reloaded.can_redo());
    assert!(reloaded.redo());
    assert_eq!(reloaded.snapshot().link_metadata.slug, "harbour-coffee");
}

#[test]
fn test_corrupt_history_file_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileHistoryStore::new(dir.path());
    store.save("page://8", "[broken").unwrap();

    let tree = ContentTree::open(
        "page://8",
        HistorySnapshot::default(),
        50,
        Arc::new(store),
    );
    assert!(tree.is_empty());
    assert!(!tree.can_undo());
}
