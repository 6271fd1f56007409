use std::cell::RefCell;
use std::rc::Rc;
use tilekit_core::{Dimension, LayoutError, Micro, Point, Rect};
use tilekit_layout::grid::{GridEngine, LayoutInput, TileId};
use tilekit_layout::masking::{
    IntersectionType, MaskEvent, MaskEventKind, MaskGeometry, MaskingConfig, MaskingEngine,
};

fn engine() -> MaskingEngine {
    let input = LayoutInput::from_mm((1000, 1000), (200, 200), 0);
    MaskingEngine::new(GridEngine::new().generate(&input).unwrap().grid)
}

fn rect_mm(x: i64, y: i64, w: i64, h: i64) -> Rect {
    Rect::new(Point::from_mm(x, y), Dimension::from_mm(w, h))
}

#[test]
fn test_overlapping_masks_need_both_removed() {
    let mut masking = engine();
    masking
        .add_rectangle_mask("a", rect_mm(0, 0, 400, 200), None)
        .unwrap();
    masking
        .add_rectangle_mask("b", rect_mm(200, 0, 400, 200), Some("Window".into()))
        .unwrap();

    assert_eq!(masking.get_masks_for_tile("tile_0_1").len(), 2);
    assert_eq!(masking.get_masked_tile_count(), 3);

    let restored = masking.remove_mask("a");
    assert_eq!(restored, vec![TileId::from("tile_0_0")]);
    assert!(masking.is_tile_masked("tile_0_1"));

    let restored = masking.remove_mask("b");
    assert_eq!(restored.len(), 2);
    assert_eq!(masking.get_visible_tile_count(), 25);
}

#[test]
fn test_minimal_overlap_keeps_tile_visible() {
    let mut masking = engine();
    // 8 mm of a 200 mm tile is 4 %.
    masking
        .add_rectangle_mask("sliver", rect_mm(0, 0, 8, 200), None)
        .unwrap();
    assert!(!masking.is_tile_masked("tile_0_0"));
    assert!(masking.tiles_for_mask("sliver").is_empty());

    let strict = MaskingEngine::with_config(
        masking.grid().clone(),
        MaskingConfig {
            minimal_overlap_percent: 0,
        },
    );
    let cell = strict.grid().cell("tile_0_0").unwrap();
    let hit = strict.intersect(&MaskGeometry::rectangle(rect_mm(0, 0, 8, 200)), cell);
    assert_eq!(hit.kind, IntersectionType::PartialLeft);
}

#[test]
fn test_intersection_directions() {
    let masking = engine();
    let cell = masking.grid().cell("tile_1_1").unwrap();
    let cases = [
        (rect_mm(100, 100, 200, 300), IntersectionType::PartialLeft),
        (rect_mm(300, 100, 200, 300), IntersectionType::PartialRight),
        (rect_mm(100, 100, 300, 200), IntersectionType::PartialTop),
        (rect_mm(100, 300, 300, 200), IntersectionType::PartialBottom),
        (rect_mm(100, 100, 200, 200), IntersectionType::PartialCorner),
        (rect_mm(150, 150, 300, 300), IntersectionType::Full),
        (rect_mm(600, 600, 100, 100), IntersectionType::None),
    ];
    for (rect, expected) in cases {
        let hit = masking.intersect(&MaskGeometry::rectangle(rect), cell);
        assert_eq!(hit.kind, expected, "{rect:?}");
    }
}

#[test]
fn test_circle_uses_sampling() {
    let mut masking = engine();
    let covered = masking
        .add_circle_mask("c", Point::from_mm(500, 500), Micro::from_mm(150), None)
        .unwrap()
        .covered;
    // The centre tile is fully inside; each edge neighbour has two corners
    // inside the circle.
    assert!(covered.contains(&TileId::from("tile_2_2")));
    assert!(covered.contains(&TileId::from("tile_1_2")));
    assert!(!covered.contains(&TileId::from("tile_0_0")));

    let cell = masking.grid().cell("tile_2_2").unwrap();
    let hit = masking.intersect(
        &MaskGeometry::circle(Point::from_mm(500, 500), Micro::from_mm(150)),
        cell,
    );
    assert_eq!(hit.kind, IntersectionType::Full);
}

#[test]
fn test_polygon_mask() {
    let mut masking = engine();
    let triangle = vec![
        Point::from_mm(0, 0),
        Point::from_mm(1000, 0),
        Point::from_mm(0, 1000),
    ];
    masking.add_polygon_mask("tri", triangle, None).unwrap();
    assert!(masking.is_tile_masked("tile_0_0"));
    assert!(!masking.is_tile_masked("tile_4_4"));
}

#[test]
fn test_invalid_and_duplicate_masks() {
    let mut masking = engine();
    let err = masking
        .add_rectangle_mask("flat", rect_mm(0, 0, 0, 100), None)
        .unwrap_err();
    assert!(matches!(err, LayoutError::InvalidMaskGeometry { .. }));

    let err = masking
        .add_polygon_mask("line", vec![Point::ORIGIN, Point::from_mm(10, 10)], None)
        .unwrap_err();
    assert!(matches!(err, LayoutError::InvalidMaskGeometry { .. }));

    masking
        .add_rectangle_mask("m", rect_mm(0, 0, 100, 100), None)
        .unwrap();
    let err = masking
        .add_rectangle_mask("m", rect_mm(0, 0, 100, 100), None)
        .unwrap_err();
    assert_eq!(err, LayoutError::DuplicateMaskId { id: "m".into() });
    assert_eq!(masking.mask_count(), 1);
}

#[test]
fn test_move_and_resize() {
    let mut masking = engine();
    masking
        .add_rectangle_mask("m", rect_mm(0, 0, 200, 200), None)
        .unwrap();

    masking.move_shape("m", Point::from_mm(800, 800));
    assert!(masking.is_tile_masked("tile_4_4"));
    assert!(!masking.is_tile_masked("tile_0_0"));

    masking.translate_shape("m", Micro::from_mm(-800), Micro::ZERO);
    assert!(masking.is_tile_masked("tile_4_0"));

    masking
        .resize_shape("m", Dimension::from_mm(1000, 200))
        .unwrap();
    assert_eq!(masking.tiles_for_mask("m").len(), 5);
    assert!(masking.resize_shape("m", Dimension::from_mm(0, 200)).is_err());
    assert_eq!(masking.tiles_for_mask("m").len(), 5);
}

#[test]
fn test_unknown_mask_operations_are_noops() {
    let mut masking = engine();
    assert!(masking.remove_mask("nope").is_empty());
    assert!(masking.move_shape("nope", Point::ORIGIN).is_empty());
    assert!(masking
        .resize_shape("nope", Dimension::from_mm(10, 10))
        .unwrap()
        .is_empty());
}

#[test]
fn test_queries_in_creation_order() {
    let mut masking = engine();
    masking
        .add_rectangle_mask("z", rect_mm(0, 0, 300, 300), None)
        .unwrap();
    masking
        .add_circle_mask("a", Point::from_mm(100, 100), Micro::from_mm(50), None)
        .unwrap();
    let ids: Vec<&str> = masking.masks().into_iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["z", "a"]);

    let at: Vec<&str> = masking
        .masks_at_point(Point::from_mm(100, 100))
        .into_iter()
        .map(|m| m.id.as_str())
        .collect();
    assert_eq!(at, vec!["z", "a"]);
    assert!(masking.masks_at_point(Point::from_mm(900, 900)).is_empty());
}

#[test]
fn test_events_carry_tile_ids() {
    let mut masking = engine();
    let events: Rc<RefCell<Vec<MaskEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let subscription = masking.subscribe(move |e: &MaskEvent| sink.borrow_mut().push(e.clone()));

    masking
        .add_rectangle_mask("m", rect_mm(0, 0, 400, 200), None)
        .unwrap();
    masking.remove_mask("m");
    masking.clear();

    {
        let events = events.borrow();
        let kinds: Vec<MaskEventKind> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![MaskEventKind::Added, MaskEventKind::Removed, MaskEventKind::Cleared]
        );
        assert_eq!(events[0].tile_ids.len(), 2);
        assert_eq!(events[1].tile_ids.len(), 2);
    }

    assert!(masking.unsubscribe(subscription));
    masking
        .add_rectangle_mask("n", rect_mm(0, 0, 200, 200), None)
        .unwrap();
    assert_eq!(events.borrow().len(), 3);
}
