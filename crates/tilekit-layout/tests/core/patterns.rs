use tilekit_core::{Dimension, Micro};
use tilekit_layout::grid::{Grid, GridEngine, LayoutInput, Rotation};
use tilekit_layout::pattern::registry::*;
use tilekit_layout::pattern::{ApplyPatternOptions, PatternCategory, PatternConfig, PatternEngine};

fn rectangular_grid() -> Grid {
    let input = LayoutInput::from_mm((2400, 1200), (600, 300), 0);
    GridEngine::new().generate(&input).unwrap().grid
}

fn apply(grid: &Grid, id: &str) -> Grid {
    PatternEngine::new()
        .apply_pattern(
            grid,
            id,
            &PatternConfig::from_grid(grid),
            &ApplyPatternOptions::default(),
        )
        .unwrap()
}

#[test]
fn test_every_builtin_keeps_cells() {
    let grid = rectangular_grid();
    let engine = PatternEngine::new();
    for id in engine.registry().ids() {
        let patterned = apply(&grid, id);
        assert_eq!(patterned.cell_count(), grid.cell_count(), "{id}");
        for cell in grid.cells() {
            assert!(patterned.contains(cell.id.as_str()), "{id} lost {}", cell.id);
        }
    }
}

#[test]
fn test_source_grid_untouched() {
    let grid = rectangular_grid();
    let before = grid.clone();
    let _ = apply(&grid, TRADITIONAL_HERRINGBONE);
    assert_eq!(grid, before);
}

#[test]
fn test_running_bond_rectangular() {
    let grid = rectangular_grid();
    let patterned = apply(&grid, RUNNING_BOND_RECTANGULAR);
    for cell in patterned.cells() {
        let base = grid.cell(cell.id.as_str()).unwrap();
        let expected = if cell.row % 2 == 1 {
            Micro::from_mm(300)
        } else {
            Micro::ZERO
        };
        assert_eq!(cell.position.x - base.position.x, expected);
        assert_eq!(cell.position.y, base.position.y);
    }
}

#[test]
fn test_vertical_stack_bond_turns_every_tile() {
    let grid = rectangular_grid();
    let patterned = apply(&grid, STACK_BOND_VERTICAL);
    let nominal = patterned.tile_size();
    for cell in patterned.cells() {
        assert_eq!(cell.rotation, Rotation::Deg90);
        assert_eq!(cell.footprint(nominal), Dimension::from_mm(300, 600));
    }
}

#[test]
fn test_straight_herringbone_checkerboard() {
    let patterned = apply(&rectangular_grid(), STRAIGHT_HERRINGBONE);
    assert_eq!(patterned.get(0, 0).unwrap().rotation, Rotation::Deg0);
    assert_eq!(patterned.get(0, 1).unwrap().rotation, Rotation::Deg90);
    assert_eq!(patterned.get(1, 0).unwrap().rotation, Rotation::Deg90);
    assert_eq!(patterned.get(1, 1).unwrap().rotation, Rotation::Deg0);
}

#[test]
fn test_quarter_turn_cycles() {
    let patterned = apply(&rectangular_grid(), QUARTER_TURN);
    let rotations: Vec<Rotation> = (0..4)
        .map(|c| patterned.get(0, c).unwrap().rotation)
        .collect();
    assert_eq!(
        rotations,
        vec![
            Rotation::Deg0,
            Rotation::Deg90,
            Rotation::Deg180,
            Rotation::Deg270
        ]
    );
}

#[test]
fn test_reset_options_clear_cell_state() {
    let mut grid = rectangular_grid();
    if let Some(cell) = grid.cell_mut("tile_0_0") {
        cell.locked = true;
        cell.visible = false;
    }
    let engine = PatternEngine::new();
    let config = PatternConfig::from_grid(&grid);

    let kept = engine
        .apply_pattern(&grid, STACK_BOND, &config, &ApplyPatternOptions::default())
        .unwrap();
    let kept_cell = kept.cell("tile_0_0").unwrap();
    assert!(kept_cell.locked);
    assert!(!kept_cell.visible);

    let reset = engine
        .apply_pattern(&grid, STACK_BOND, &config, &ApplyPatternOptions::reset())
        .unwrap();
    let reset_cell = reset.cell("tile_0_0").unwrap();
    assert!(!reset_cell.locked);
    assert!(reset_cell.visible);
}

#[test]
fn test_unknown_pattern_fails() {
    let grid = rectangular_grid();
    let result = PatternEngine::new().apply_pattern(
        &grid,
        "PINWHEEL",
        &PatternConfig::from_grid(&grid),
        &ApplyPatternOptions::default(),
    );
    assert!(result.is_err());
}

#[test]
fn test_registry_metadata() {
    let registry = PatternEngine::new().registry().clone();
    let herringbone = registry.get(TRADITIONAL_HERRINGBONE).unwrap();
    assert_eq!(herringbone.category, PatternCategory::Herringbone);
    assert!(herringbone.requires_rectangular);
    assert_eq!(herringbone.names.for_locale("de-DE"), "Klassisches Fischgrät");
    assert_eq!(herringbone.names.for_locale("en"), "Traditional herringbone");

    let square = Dimension::from_mm(300, 300);
    assert!(registry.compatibility(BASKET_WEAVE, square).unwrap().is_some());
    assert!(registry.compatibility(LINEAR_SQUARE, square).unwrap().is_none());
    assert!(registry
        .compatibility(BASKET_WEAVE, Dimension::from_mm(300, 150))
        .unwrap()
        .is_none());
}
