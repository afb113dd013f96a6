//! Board engine tests - tilt rules and their invariants

use proptest::prelude::*;

use tui_2048::core::{BoardEngine, Grid, TileRecord, TiltEvent};
use tui_2048::types::{Direction, Position, BOARD_CELLS, BOARD_SIZE};

fn engine_with(rows: [[u32; BOARD_SIZE]; BOARD_SIZE]) -> BoardEngine {
    let mut engine = BoardEngine::new(1);
    engine.load_tiles(&records(&Grid::from_rows(rows))).unwrap();
    engine
}

fn records(grid: &Grid) -> Vec<TileRecord> {
    grid.cells()
        .iter()
        .enumerate()
        .filter(|(_, &v)| v != 0)
        .map(|(i, &v)| TileRecord::new(v, Position::from_index(i)))
        .collect()
}

fn sorted_values(grid: &Grid) -> Vec<u32> {
    let mut values: Vec<u32> = grid.cells().iter().copied().filter(|&v| v != 0).collect();
    values.sort_unstable();
    values
}

fn column(rows: &[[u32; BOARD_SIZE]; BOARD_SIZE], col: usize) -> [u32; BOARD_SIZE] {
    [rows[0][col], rows[1][col], rows[2][col], rows[3][col]]
}

#[test]
fn test_west_example_row() {
    let mut engine = engine_with([[2, 0, 2, 4], [0; 4], [0; 4], [0; 4]]);
    let result = engine.tilt(Direction::West, true);

    assert!(result.changed);
    assert_eq!(result.score_gained, 4);
    assert_eq!(engine.grid().rows()[0], [4, 4, 0, 0]);
    assert_eq!(engine.score(), 4);
}

#[test]
fn test_four_equal_tiles_merge_pairwise() {
    for direction in Direction::ALL {
        let mut engine = engine_with([[2, 2, 2, 2], [2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0]]);
        engine.tilt(direction, true);
        let rows = engine.grid().rows();
        match direction {
            Direction::West => assert_eq!(rows[0], [4, 4, 0, 0]),
            Direction::East => assert_eq!(rows[0], [0, 0, 4, 4]),
            Direction::North => assert_eq!(column(&rows, 0), [4, 4, 0, 0]),
            Direction::South => assert_eq!(column(&rows, 0), [0, 0, 4, 4]),
        }
    }
}

#[test]
fn test_merged_tile_does_not_absorb_again() {
    let mut engine = engine_with([[4, 4, 8, 0], [0; 4], [0; 4], [0; 4]]);
    engine.tilt(Direction::West, true);
    assert_eq!(engine.grid().rows()[0], [8, 8, 0, 0]);
    assert_eq!(engine.score(), 8);
}

#[test]
fn test_double_1024_wins() {
    let mut engine = engine_with([[0; 4], [0; 4], [0, 1024, 0, 0], [0, 1024, 0, 0]]);
    let result = engine.tilt(Direction::South, true);
    assert!(result.changed);
    assert_eq!(engine.grid().get(Position::new(3, 1)), Some(2048));
    assert!(engine.won());
    assert!(engine.is_game_over());
}

#[test]
fn test_full_board_game_over_both_ways() {
    let locked = engine_with([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
    assert!(locked.is_game_over());

    let open = engine_with([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 8, 8]]);
    assert!(!open.is_game_over());
    assert!(open.probe(Direction::East));
    assert!(!open.probe(Direction::North));
}

#[test]
fn test_seeded_spawn_is_deterministic() {
    let mut a = BoardEngine::new(42);
    let mut b = BoardEngine::new(42);
    for _ in 0..BOARD_CELLS {
        assert_eq!(a.spawn_random_tile(), b.spawn_random_tile());
    }
    assert_eq!(a.grid(), b.grid());
    assert!(a.grid().is_full());
    assert_eq!(a.spawn_random_tile(), None);
}

fn arb_grid() -> impl Strategy<Value = Grid> {
    prop::array::uniform16(prop_oneof![
        3 => Just(0u32),
        5 => (1u32..=10).prop_map(|e| 1 << e),
    ])
    .prop_map(|cells| {
        let mut grid = Grid::new();
        for (i, v) in cells.into_iter().enumerate() {
            grid.set(Position::from_index(i), v);
        }
        grid
    })
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_tilt_accounting(grid in arb_grid(), direction in arb_direction()) {
        let mut engine = BoardEngine::new(1);
        engine.load_tiles(&records(&grid)).unwrap();
        let before_count = engine.occupied_count();

        let result = engine.tilt(direction, true);
        let after = *engine.grid();

        prop_assert_eq!(after.total(), grid.total());
        prop_assert_eq!(engine.occupied_count(), before_count - result.merges as usize);
        prop_assert_eq!(engine.occupied_count(), after.occupied_count());
        prop_assert_eq!(engine.score(), result.score_gained);

        let merged: u32 = result
            .events
            .iter()
            .filter_map(|e| match *e {
                TiltEvent::Merge { merged, .. } => Some(merged),
                TiltEvent::Slide { .. } => None,
            })
            .sum();
        prop_assert_eq!(merged, result.score_gained);

        if !result.changed {
            prop_assert_eq!(after, grid);
            prop_assert!(result.events.is_empty());
            prop_assert_eq!(sorted_values(&after), sorted_values(&grid));
        }
    }

    #[test]
    fn prop_probe_is_idempotent(grid in arb_grid(), direction in arb_direction()) {
        let mut engine = BoardEngine::new(1);
        engine.load_tiles(&records(&grid)).unwrap();

        let first = engine.probe(direction);
        prop_assert_eq!(engine.probe(direction), first);
        prop_assert_eq!(engine.tilt(direction, false).changed, first);
        prop_assert_eq!(*engine.grid(), grid);
        prop_assert_eq!(engine.score(), 0);
    }
}
