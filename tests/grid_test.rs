//! Digit grid puzzles: chiton risk paths and smoke basin flood fill.

use rstest::rstest;

use advent::domain::{DomainError, Grid};

const CHITON: &str = include_str!("fixtures/chiton/example.txt");
const SMOKE_BASIN: &str = include_str!("fixtures/smoke-basin/example.txt");

#[rstest]
#[case(1, 40)]
#[case(5, 315)]
fn given_chiton_example_when_searching_path_then_matches_published_risk(
    #[case] repeats: usize,
    #[case] expected: u64,
) {
    let grid = Grid::parse(CHITON).unwrap();
    assert_eq!(grid.lowest_total_risk(repeats).unwrap(), expected);
}

#[test]
fn given_chiton_example_when_tiled_then_corner_tile_shifts_by_eight() {
    let grid = Grid::parse(CHITON).unwrap();
    let tiled = grid.tiled(5).unwrap();

    assert_eq!((tiled.rows(), tiled.cols()), (50, 50));
    // bottom-right cell: 1 shifted by 8
    assert_eq!(tiled.value_at(49, 49), 9);
    // first cell of the second tile column: 1 shifted by 1
    assert_eq!(tiled.value_at(0, 10), 2);
}

#[test]
fn given_straight_line_when_searching_path_then_sums_all_but_start() {
    let grid = Grid::parse("19999\n").unwrap();
    assert_eq!(grid.lowest_total_risk(1).unwrap(), 36);
}

#[test]
fn given_smoke_basin_example_when_summing_low_points_then_15() {
    let grid = Grid::parse(SMOKE_BASIN).unwrap();

    assert_eq!(grid.low_points(), vec![(0, 1), (0, 9), (2, 2), (4, 6)]);
    assert_eq!(grid.low_point_risk_sum(), 15);
}

#[test]
fn given_smoke_basin_example_when_measuring_basins_then_product_is_1134() {
    let grid = Grid::parse(SMOKE_BASIN).unwrap();

    let mut sizes = grid.basins();
    sizes.sort_unstable();

    assert_eq!(sizes, vec![3, 9, 9, 14]);
    assert_eq!(grid.largest_basins_product(), 1134);
}

#[test]
fn given_flat_grid_when_finding_low_points_then_none() {
    let grid = Grid::parse("55\n55\n").unwrap();
    assert!(grid.low_points().is_empty());
    assert_eq!(grid.low_point_risk_sum(), 0);
}

#[test]
fn given_empty_input_when_parsing_grid_then_empty_input_error() {
    assert_eq!(Grid::parse("\n  \n").unwrap_err(), DomainError::EmptyInput);
}
