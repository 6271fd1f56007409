use std::cell::RefCell;
use std::rc::Rc;
use tilekit_core::{CommandError, Dimension, Micro, Point, Rect};
use tilekit_layout::history::{HistoryEvent, HistoryEventKind};
use tilekit_layout::masking::MaskEvent;
use tilekit_layout::pattern::registry::{LINEAR_SQUARE, RUNNING_BOND_SQUARE};
use tilekit_layout::{EngineConfig, HistoryConfig, LayoutEditor, LayoutInput, TileLayout};

fn editor() -> LayoutEditor {
    let input = LayoutInput::from_mm((1000, 1000), (200, 200), 0);
    let layout = TileLayout::generate(&input, LINEAR_SQUARE, &EngineConfig::default()).unwrap();
    LayoutEditor::new(layout, HistoryConfig::default())
}

fn rect_mm(x: i64, y: i64, w: i64, h: i64) -> Rect {
    Rect::new(Point::from_mm(x, y), Dimension::from_mm(w, h))
}

#[test]
fn test_mask_lifecycle_with_undo() {
    let mut editor = editor();
    let added = editor.add_rectangle_mask("door", rect_mm(0, 800, 400, 200), Some("Door".into()));
    assert!(added.success);
    assert_eq!(added.affected_ids, vec!["door", "tile_4_0", "tile_4_1"]);
    assert_eq!(editor.layout().masking().get_visible_tile_count(), 23);

    assert!(editor.resize_mask("door", Dimension::from_mm(600, 200)).success);
    assert_eq!(editor.layout().masking().get_visible_tile_count(), 22);

    assert!(editor.remove_mask("door").success);
    assert_eq!(editor.layout().masking().get_visible_tile_count(), 25);

    editor.undo();
    assert_eq!(editor.layout().masking().get_visible_tile_count(), 22);
    editor.undo();
    assert_eq!(editor.layout().masking().get_visible_tile_count(), 23);
    editor.undo();
    assert_eq!(editor.layout().masking().mask_count(), 0);
    assert_eq!(editor.layout().masking().get_visible_tile_count(), 25);

    editor.redo();
    let door = editor.layout().masking().get_mask("door").unwrap();
    assert_eq!(door.label.as_deref(), Some("Door"));
    assert_eq!(door.covered.len(), 2);
}

#[test]
fn test_duplicate_mask_is_failed_and_unrecorded() {
    let mut editor = editor();
    editor.add_circle_mask("m", Point::from_mm(500, 500), Micro::from_mm(50), None);
    let result = editor.add_circle_mask("m", Point::from_mm(100, 100), Micro::from_mm(50), None);
    assert!(!result.success);
    assert!(matches!(result.error, Some(CommandError::Layout(_))));
    assert_eq!(editor.history().undo_size(), 1);
}

#[test]
fn test_locked_tile_edits_fail() {
    let mut editor = editor();
    assert!(editor.set_tile_locked("tile_3_3", true).success);
    let result = editor.move_tile("tile_3_3", Micro::from_mm(10), Micro::ZERO);
    assert!(!result.success);
    assert_eq!(
        result.error,
        Some(CommandError::TileLocked {
            id: "tile_3_3".into()
        })
    );
    assert!(!editor.rotate_tile("tile_3_3", 1).success);
    assert_eq!(editor.history().undo_size(), 1);

    editor.undo();
    assert!(editor.move_tile("tile_3_3", Micro::from_mm(10), Micro::ZERO).success);
}

#[test]
fn test_moving_tile_out_of_mask_reveals_it() {
    let mut editor = editor();
    editor.add_rectangle_mask("m", rect_mm(0, 0, 200, 200), None);
    assert!(!editor.layout().grid().cell("tile_0_0").unwrap().visible);

    editor.move_tile("tile_0_0", Micro::ZERO, Micro::from_mm(300));
    let cell = editor.layout().grid().cell("tile_0_0").unwrap();
    assert!(cell.visible);
    assert!(cell.masked_by.is_empty());

    editor.undo();
    let cell = editor.layout().grid().cell("tile_0_0").unwrap();
    assert!(!cell.visible);
    assert_eq!(editor.layout().masking().tiles_for_mask("m").len(), 1);
}

#[test]
fn test_pattern_change_keeps_manual_edits() {
    let mut editor = editor();
    editor.move_tile("tile_1_0", Micro::from_mm(3), Micro::ZERO);
    editor.rotate_tile("tile_1_1", 1);

    assert!(editor.change_pattern(RUNNING_BOND_SQUARE).success);
    let grid = editor.layout().grid();
    assert_eq!(grid.cell("tile_1_0").unwrap().position, Point::from_mm(103, 200));
    assert_eq!(
        grid.cell("tile_1_1").unwrap().rotation,
        tilekit_layout::Rotation::Deg90
    );

    editor.undo();
    let grid = editor.layout().grid();
    assert_eq!(grid.cell("tile_1_0").unwrap().position, Point::from_mm(3, 200));
    assert_eq!(editor.layout().pattern_id(), LINEAR_SQUARE);
}

#[test]
fn test_unknown_pattern_change_fails() {
    let mut editor = editor();
    let result = editor.change_pattern("SPIRAL");
    assert!(!result.success);
    assert!(!editor.can_undo());
}

#[test]
fn test_commands_survive_grid_replacement() {
    let mut editor = editor();
    editor.move_tile("tile_2_2", Micro::from_mm(10), Micro::ZERO);
    editor.change_pattern(RUNNING_BOND_SQUARE);
    editor.undo();
    editor.undo();
    assert_eq!(
        editor.layout().grid().cell("tile_2_2").unwrap().position,
        Point::from_mm(400, 400)
    );
    editor.redo();
    editor.redo();
    assert_eq!(
        editor.layout().grid().cell("tile_2_2").unwrap().position,
        Point::from_mm(410, 400)
    );
}

#[test]
fn test_notifications() {
    let mut editor = editor();
    let history_events = Rc::new(RefCell::new(Vec::new()));
    let mask_events = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&history_events);
    editor.subscribe_history(move |e: &HistoryEvent| sink.borrow_mut().push(e.kind));
    let counter = Rc::clone(&mask_events);
    editor.subscribe_masks(move |_: &MaskEvent| *counter.borrow_mut() += 1);

    editor.add_rectangle_mask("m", rect_mm(0, 0, 200, 200), None);
    editor.undo();
    editor.redo();

    assert_eq!(
        *history_events.borrow(),
        vec![
            HistoryEventKind::Executed,
            HistoryEventKind::Undone,
            HistoryEventKind::Redone
        ]
    );
    assert_eq!(*mask_events.borrow(), 3);
}
