use tilekit_core::{Dimension, InputField, LayoutError, Micro, Point, ValidationCode};
use tilekit_layout::grid::{
    CutClass, GridConfig, GridEngine, LayoutInput, PieceType, StartLine, TilePiece,
};

#[test]
fn test_rectangular_tiles_without_gap() {
    let input = LayoutInput::from_mm((3000, 2000), (600, 300), 0);
    let result = GridEngine::new().generate(&input).unwrap();

    assert_eq!(result.columns, 5);
    assert_eq!(result.rows, 7);
    assert_eq!(result.total_tiles, 35);
    assert_eq!(result.full_tiles, 30);
    assert_eq!(result.large_pieces, 5);
    assert_eq!(result.small_pieces, 0);

    let large = result.large_piece.unwrap();
    assert_eq!(large.size.width, Micro::from_mm(600));
    assert_eq!(large.size.height, Micro::from_mm(200));
    assert_eq!(large.area_ratio_percent, 66);
    assert_eq!(result.remainders.bottom, Micro::from_mm(200));
    assert_eq!(result.remainders.right, Micro::ZERO);
}

#[test]
fn test_gap_places_far_cut_after_joint() {
    let input = LayoutInput::from_mm((1000, 300), (300, 300), 10);
    let result = GridEngine::new().generate(&input).unwrap();

    assert_eq!(result.columns, 4);
    let row = &result.grid.rows()[0];
    let xs: Vec<Micro> = row.iter().map(|c| c.position.x).collect();
    assert_eq!(
        xs,
        vec![
            Micro::ZERO,
            Micro::from_mm(310),
            Micro::from_mm(620),
            Micro::from_mm(930)
        ]
    );
    let last = row.last().unwrap();
    assert_eq!(last.piece_type(), PieceType::Small);
    let size = last.resolved_size(result.grid.tile_size());
    assert_eq!(size.width, Micro::from_mm(70));
    assert_eq!(last.position.x + size.width, Micro::from_mm(1000));
    assert_eq!(result.remainders.right, Micro::from_mm(80));
}

#[test]
fn test_center_alignment_splits_remainder() {
    let input = LayoutInput::from_mm((1000, 1000), (300, 300), 0)
        .with_alignment(StartLine::Center, StartLine::Start);
    let result = GridEngine::new().generate(&input).unwrap();

    assert_eq!(result.columns, 5);
    assert_eq!(result.rows, 4);
    assert_eq!(result.remainders.left, Micro::from_mm(50));
    assert_eq!(result.remainders.right, Micro::from_mm(50));
    let first = result.grid.get(0, 0).unwrap();
    assert_eq!(first.position, Point::ORIGIN);
    assert_eq!(first.piece, TilePiece::cut(CutClass::Small, Dimension::from_mm(50, 300)));
    assert_eq!(result.grid.get(0, 1).unwrap().position.x, Micro::from_mm(50));
}

#[test]
fn test_end_alignment_moves_cut_to_near_edge() {
    let input = LayoutInput::from_mm((1000, 300), (300, 300), 0)
        .with_alignment(StartLine::End, StartLine::Start);
    let result = GridEngine::new().generate(&input).unwrap();
    let row = &result.grid.rows()[0];
    assert_ne!(row[0].piece_type(), PieceType::Full);
    assert!(row[1..].iter().all(|c| c.piece_type() == PieceType::Full));
    assert_eq!(row[1].position.x, Micro::from_mm(100));
}

#[test]
fn test_exact_fit_has_no_cuts() {
    let input = LayoutInput::from_mm((1200, 600), (300, 300), 0);
    let result = GridEngine::new().generate(&input).unwrap();
    assert_eq!(result.total_tiles, 8);
    assert_eq!(result.full_tiles, 8);
    assert_eq!(result.cut_pieces(), 0);
    assert!(result.large_piece.is_none());
    assert!(result.small_piece.is_none());
}

#[test]
fn test_validation_reports_every_field() {
    let mut input = LayoutInput::from_mm((50, 1000), (300, 5), 0);
    input.gap = Micro::from_mm(60);
    let err = GridEngine::new().validate(&input).unwrap_err();

    assert_eq!(err.for_field(InputField::AreaWidth).count(), 1);
    assert_eq!(err.for_field(InputField::TileHeight).count(), 1);
    assert_eq!(err.for_field(InputField::Gap).count(), 1);
    assert!(err.has_code(ValidationCode::MinValue));
    assert!(err.has_code(ValidationCode::MaxValue));
}

#[test]
fn test_tile_larger_than_area() {
    let input = LayoutInput::from_mm((200, 1000), (300, 300), 0);
    let err = GridEngine::new().generate(&input).unwrap_err();
    let LayoutError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.0[0].code, ValidationCode::TileLargerThanArea);
    assert_eq!(errors.0[0].field, InputField::TileWidth);
}

#[test]
fn test_gap_must_be_smaller_than_tile() {
    let input = LayoutInput::from_mm((1000, 1000), (40, 300), 40);
    let errors = GridEngine::new().validate(&input).unwrap_err();
    assert!(errors.has_code(ValidationCode::GapLargerThanTile));
}

#[test]
fn test_cell_cap() {
    let input = LayoutInput::from_mm((10_000, 10_000), (50, 50), 0);
    let errors = GridEngine::new().validate(&input).unwrap_err();
    assert!(errors.has_code(ValidationCode::Overflow));
    assert_eq!(errors.for_field(InputField::Layout).count(), 1);

    let engine = GridEngine::with_config(GridConfig {
        max_cells: 40_000,
        ..GridConfig::default()
    });
    assert!(engine.validate(&input).is_ok());
}

#[test]
fn test_ids_and_hit_test() {
    let input = LayoutInput::from_mm((1000, 1000), (300, 300), 0);
    let result = GridEngine::new().generate(&input).unwrap();
    let cell = result.grid.cell("tile_1_2").unwrap();
    assert_eq!((cell.row, cell.col), (1, 2));
    assert_eq!(cell.position, Point::from_mm(600, 300));

    let hit = result.grid.cell_at_point(Point::from_mm(650, 350)).unwrap();
    assert_eq!(hit.id.as_str(), "tile_1_2");
    assert!(result.grid.cell_at_point(Point::from_mm(1200, 10)).is_none());
}

#[test]
fn test_summary_areas() {
    let input = LayoutInput::from_mm((3000, 2000), (600, 300), 0);
    let summary = GridEngine::new().generate(&input).unwrap().summary();
    assert_eq!(summary.total_area_m2, 6.0);
    assert_eq!(summary.tile_area_m2, 6.0);
    assert_eq!(summary.remainder_bottom_mm, 200.0);
}
