//! Property tests for axis planning and grid generation.

use proptest::prelude::*;
use tilekit_core::Micro;
use tilekit_layout::grid::{plan_axis, GridEngine, LayoutInput, PieceType, StartLine};

fn start_line() -> impl Strategy<Value = StartLine> {
    prop_oneof![
        Just(StartLine::Start),
        Just(StartLine::Center),
        Just(StartLine::End),
    ]
}

proptest! {
    /// The full-tile count is the largest that fits, and shares add up.
    #[test]
    fn full_count_is_maximal(
        area in 100i64..20_000,
        tile in 10i64..2_000,
        gap in 0i64..10,
        start in start_line(),
    ) {
        prop_assume!(tile <= area);
        let (area, tile, gap) = (Micro::from_mm(area), Micro::from_mm(tile), Micro::from_mm(gap));
        let plan = plan_axis(area, tile, gap, start, Micro::from_mm(1)).unwrap();

        let n = plan.full_count;
        prop_assert!(n >= 1);
        let span = |k: i64| tile.times(k) + gap.times(k - 1);
        prop_assert!(span(n) <= area);
        prop_assert!(span(n + 1) > area);
        prop_assert_eq!(plan.near + plan.far, plan.remainder);
        prop_assert_eq!(plan.used + plan.remainder, area);
    }

    /// Centre alignment splits the remainder within one micrometre.
    #[test]
    fn center_split_is_balanced(area in 100i64..20_000, tile in 10i64..2_000) {
        prop_assume!(tile <= area);
        let plan = plan_axis(
            Micro::from_mm(area),
            Micro::from_mm(tile),
            Micro::ZERO,
            StartLine::Center,
            Micro::from_mm(1),
        )
        .unwrap();
        let diff = (plan.far - plan.near).raw();
        prop_assert!((0..=1).contains(&diff));
    }

    /// Segments never overlap and never leave the area.
    #[test]
    fn segments_stay_inside(
        area in 100i64..20_000,
        tile in 10i64..2_000,
        gap in 0i64..10,
        start in start_line(),
    ) {
        prop_assume!(tile <= area && gap < tile);
        let area = Micro::from_mm(area);
        let plan = plan_axis(area, Micro::from_mm(tile), Micro::from_mm(gap), start, Micro::from_mm(1)).unwrap();
        let mut cursor = Micro::ZERO;
        for segment in &plan.segments {
            prop_assert!(segment.offset >= cursor);
            prop_assert!(segment.size > Micro::ZERO);
            cursor = segment.offset + segment.size;
        }
        prop_assert!(cursor <= area);
    }

    /// Piece counts add up and every cell has a unique id.
    #[test]
    fn counts_are_consistent(
        w in 100i64..4_000,
        h in 100i64..4_000,
        tw in 50i64..800,
        th in 50i64..800,
    ) {
        prop_assume!(tw <= w && th <= h);
        let input = LayoutInput::from_mm((w, h), (tw, th), 2);
        let result = GridEngine::new().generate(&input).unwrap();

        prop_assert_eq!(
            result.full_tiles + result.large_pieces + result.small_pieces,
            result.total_tiles
        );
        prop_assert_eq!(result.total_tiles, result.columns * result.rows);
        let full = result
            .grid
            .cells()
            .filter(|c| c.piece_type() == PieceType::Full)
            .count();
        prop_assert_eq!(full, result.full_tiles);

        let mut ids: Vec<&str> = result.grid.cells().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), result.total_tiles);
    }
}
