use chrono::{DateTime, Utc};
use std::cell::Cell;
use std::rc::Rc;
use tilekit_core::{Micro, Point};
use tilekit_layout::history::{HistoryConfig, HistoryEngine};
use tilekit_layout::pattern::registry::LINEAR_SQUARE;
use tilekit_layout::{EngineConfig, LayoutCommand, LayoutEditor, LayoutInput, TileLayout};

fn layout() -> TileLayout {
    let input = LayoutInput::from_mm((1000, 1000), (200, 200), 0);
    TileLayout::generate(&input, LINEAR_SQUARE, &EngineConfig::default()).unwrap()
}

fn editor_with_clock(config: HistoryConfig) -> (LayoutEditor, Rc<Cell<i64>>) {
    let millis = Rc::new(Cell::new(0));
    let source = Rc::clone(&millis);
    let history = HistoryEngine::<LayoutCommand>::new(config).with_clock(move || {
        DateTime::<Utc>::from_timestamp_millis(1_750_000_000_000 + source.get()).unwrap_or_default()
    });
    (LayoutEditor::with_history(layout(), history), millis)
}

fn position(editor: &LayoutEditor, id: &str) -> Point {
    editor.layout().grid().cell(id).unwrap().position
}

#[test]
fn test_drag_merges_into_one_step() {
    let (mut editor, millis) = editor_with_clock(HistoryConfig::default());
    for step in 0..10 {
        millis.set(step * 50);
        editor.move_tile("tile_1_1", Micro::from_mm(1), Micro::ZERO);
    }
    assert_eq!(editor.history().undo_size(), 1);
    assert_eq!(position(&editor, "tile_1_1"), Point::from_mm(210, 200));

    editor.undo();
    assert_eq!(position(&editor, "tile_1_1"), Point::from_mm(200, 200));
}

#[test]
fn test_pause_splits_merge_window() {
    let (mut editor, millis) = editor_with_clock(HistoryConfig::default());
    editor.move_tile("tile_0_0", Micro::from_mm(5), Micro::ZERO);
    millis.set(1500);
    editor.move_tile("tile_0_0", Micro::from_mm(5), Micro::ZERO);
    assert_eq!(editor.history().undo_size(), 2);
}

#[test]
fn test_merge_disabled() {
    let (mut editor, _) = editor_with_clock(HistoryConfig {
        merge_enabled: false,
        ..HistoryConfig::default()
    });
    editor.move_tile("tile_0_0", Micro::from_mm(5), Micro::ZERO);
    editor.move_tile("tile_0_0", Micro::from_mm(5), Micro::ZERO);
    assert_eq!(editor.history().undo_size(), 2);
}

#[test]
fn test_undo_then_new_edit_drops_redo() {
    let mut editor = LayoutEditor::new(layout(), HistoryConfig::default());
    editor.rotate_tile("tile_0_0", 1);
    editor.undo();
    assert!(editor.can_redo());
    editor.set_tile_locked("tile_0_0", true);
    assert!(!editor.can_redo());
}

#[test]
fn test_descriptions_for_menus() {
    let mut editor = LayoutEditor::new(layout(), HistoryConfig::default());
    editor.rotate_tile("tile_0_0", 1);
    editor.set_tile_locked("tile_0_1", true);
    assert_eq!(
        editor.history().undo_descriptions(),
        vec!["Lock tile tile_0_1".to_string(), "Rotate tile tile_0_0".to_string()]
    );
    editor.undo();
    assert_eq!(
        editor.history().redo_descriptions(),
        vec!["Lock tile tile_0_1".to_string()]
    );
}

#[test]
fn test_group_undoes_as_one() {
    let mut editor = LayoutEditor::new(layout(), HistoryConfig::default());
    editor.begin_group("Rotate row");
    for col in 0..5 {
        editor.rotate_tile(&format!("tile_0_{col}"), 2);
    }
    let id = editor.end_group();
    assert!(id.is_some());
    assert_eq!(editor.history().undo_size(), 1);
    assert_eq!(editor.history().undo_descriptions(), vec!["Rotate row".to_string()]);

    let result = editor.undo().unwrap();
    assert!(result.success);
    assert_eq!(result.affected_ids.len(), 5);
    assert!(editor
        .layout()
        .grid()
        .cells()
        .all(|c| c.rotation == tilekit_layout::Rotation::Deg0));
}

#[test]
fn test_cancel_group_restores_layout() {
    let mut editor = LayoutEditor::new(layout(), HistoryConfig::default());
    editor.begin_group("Drag");
    editor.move_tile("tile_2_2", Micro::from_mm(40), Micro::ZERO);
    editor.move_tile("tile_2_2", Micro::from_mm(40), Micro::ZERO);
    let results = editor.cancel_group();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.success));
    assert_eq!(position(&editor, "tile_2_2"), Point::from_mm(400, 400));
    assert!(!editor.can_undo());
}

#[test]
fn test_bounded_depth() {
    let mut editor = LayoutEditor::new(
        layout(),
        HistoryConfig {
            max_size: 3,
            ..HistoryConfig::default()
        },
    );
    for col in 0..5 {
        editor.rotate_tile(&format!("tile_0_{col}"), 1);
    }
    assert_eq!(editor.history().undo_size(), 3);
    while editor.undo().is_some() {}
    let rotated = editor
        .layout()
        .grid()
        .cells()
        .filter(|c| c.rotation != tilekit_layout::Rotation::Deg0)
        .count();
    assert_eq!(rotated, 2);
}

#[test]
fn test_clear_history_keeps_layout() {
    let mut editor = LayoutEditor::new(layout(), HistoryConfig::default());
    editor.move_tile("tile_0_0", Micro::from_mm(7), Micro::ZERO);
    editor.clear_history();
    assert!(!editor.can_undo());
    assert!(editor.undo().is_none());
    assert_eq!(position(&editor, "tile_0_0"), Point::from_mm(7, 0));
}
