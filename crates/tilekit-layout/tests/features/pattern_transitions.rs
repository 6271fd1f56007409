use tilekit_core::Micro;
use tilekit_layout::grid::{Grid, GridEngine, LayoutInput};
use tilekit_layout::pattern::{ApplyPatternOptions, PatternConfig, PatternEngine};

fn base_grid() -> Grid {
    // Cut pieces on the right and bottom edges exercise sized-piece swaps.
    let input = LayoutInput::from_mm((1000, 700), (300, 150), 3);
    GridEngine::new().generate(&input).unwrap().grid
}

fn transition(engine: &PatternEngine, grid: &Grid, from: &str, to: &str) -> Grid {
    engine
        .apply_pattern(
            grid,
            to,
            &PatternConfig::from_grid(grid),
            &ApplyPatternOptions::default().replacing(from),
        )
        .unwrap()
}

#[test]
fn test_every_transition_is_reversible() {
    let engine = PatternEngine::new();
    let base = base_grid();
    let ids: Vec<&str> = engine.registry().ids().collect();

    for from in &ids {
        let mut start = engine
            .apply_pattern(
                &base,
                from,
                &PatternConfig::from_grid(&base),
                &ApplyPatternOptions::default(),
            )
            .unwrap();
        if let Some(cell) = start.cell_mut("tile_1_1") {
            cell.translate(Micro::from_mm(7), Micro::from_mm(-2));
            cell.rotation = cell.rotation.rotated_by(1);
        }

        for to in &ids {
            let there = transition(&engine, &start, from, to);
            let back = transition(&engine, &there, to, from);
            assert_eq!(back, start, "{from} -> {to} -> {from}");
        }
    }
}

#[test]
fn test_transition_matches_fresh_application() {
    let engine = PatternEngine::new();
    let base = base_grid();
    let config = PatternConfig::from_grid(&base);
    let options = ApplyPatternOptions::default();

    for from in engine.registry().ids() {
        let start = engine.apply_pattern(&base, from, &config, &options).unwrap();
        for to in engine.registry().ids() {
            let fresh = engine.apply_pattern(&base, to, &config, &options).unwrap();
            let switched = transition(&engine, &start, from, to);
            for cell in fresh.cells() {
                let other = switched.cell(cell.id.as_str()).unwrap();
                assert_eq!(other.position, cell.position, "{from} -> {to} {}", cell.id);
                assert_eq!(other.rotation, cell.rotation, "{from} -> {to} {}", cell.id);
                assert_eq!(other.piece, cell.piece, "{from} -> {to} {}", cell.id);
            }
        }
    }
}
