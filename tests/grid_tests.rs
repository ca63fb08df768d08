//! Grid tests - locking, merge resolution, line clears and termination

use tetris_2048::core::{BoundedFrame, Error, GameConfig, Grid, Tile};
use tetris_2048::types::Position;

/// Grid with bottom-up rows of values (0 = empty).
fn grid_with(height: usize, width: usize, rows: &[&[u32]]) -> Grid {
    let mut grid = Grid::new(height, width).unwrap();
    for (row, values) in rows.iter().enumerate() {
        for (col, &v) in values.iter().enumerate() {
            if v != 0 {
                assert!(grid.set(col as i32, row as i32, Some(Tile::new(v).unwrap())));
            }
        }
    }
    grid
}

fn value(grid: &Grid, row: usize, col: usize) -> u32 {
    grid.cell(row, col).unwrap().map_or(0, |t| t.value())
}

fn frame(rows: &[&[u32]], col: i32, row: i32) -> BoundedFrame {
    BoundedFrame::from_values(rows, Position::new(col, row)).unwrap()
}

#[test]
fn test_vertical_pair_merges_on_lock() {
    let mut grid = Grid::new(6, 4).unwrap();
    let outcome = grid.lock_and_resolve(&frame(&[&[2], &[2]], 0, 0)).unwrap();

    assert_eq!(value(&grid, 0, 0), 4);
    assert_eq!(value(&grid, 1, 0), 0);
    assert_eq!(grid.score(), 4);
    assert_eq!(outcome.merges, 1);
    assert_eq!(outcome.points, 4);
    assert!(!outcome.game_over);
}

#[test]
fn test_four_twos_resolve_to_eight() {
    let mut grid = grid_with(6, 4, &[&[2], &[2], &[2]]);
    let outcome = grid.lock_and_resolve(&frame(&[&[2]], 0, 3)).unwrap();

    assert_eq!(value(&grid, 0, 0), 8);
    for row in 1..6 {
        assert_eq!(value(&grid, row, 0), 0);
    }
    // Both lower pairs merge in the first pass (4 + 4), then the two fours (8).
    assert_eq!(outcome.merges, 3);
    assert_eq!(grid.score(), 16);
}

#[test]
fn test_top_out_keeps_in_bounds_tiles() {
    let mut grid = Grid::new(6, 4).unwrap();
    let outcome = grid
        .lock_and_resolve(&frame(&[&[2], &[4], &[8], &[16]], 0, 4))
        .unwrap();

    assert!(outcome.topped_out);
    assert!(outcome.game_over);
    assert!(!outcome.win);
    assert!(grid.game_over());
    assert_eq!(value(&grid, 4, 0), 2);
    assert_eq!(value(&grid, 5, 0), 4);
}

#[test]
fn test_reaching_2048_wins() {
    let mut grid = grid_with(6, 4, &[&[1024]]);
    let outcome = grid.lock_and_resolve(&frame(&[&[1024]], 0, 1)).unwrap();

    assert_eq!(value(&grid, 0, 0), 2048);
    assert!(outcome.win);
    assert!(outcome.game_over);
    assert!(grid.win());
    assert!(grid.game_over());
    assert_eq!(grid.score(), 2048);
}

#[test]
fn test_win_survives_clearing_the_merged_row() {
    // The 2048 completes the floor row, which clears in the same lock.
    let mut grid = grid_with(6, 4, &[&[2, 4, 8, 1024]]);
    let outcome = grid.lock_and_resolve(&frame(&[&[1024]], 3, 1)).unwrap();

    assert_eq!(outcome.merges, 1);
    assert_eq!(outcome.rows_cleared, vec![0]);
    assert_eq!(grid.max_value(), 0);
    assert!(outcome.win);
    assert!(outcome.game_over);
    assert!(grid.win());
    assert_eq!(grid.score(), 2048 + (2 + 4 + 8 + 2048));
}

#[test]
fn test_win_threshold_from_config() {
    let config = GameConfig {
        height: 6,
        width: 4,
        win_threshold: 8,
        ..GameConfig::default()
    };
    let mut grid = Grid::from_config(&config).unwrap();
    let outcome = grid
        .lock_and_resolve(&frame(&[&[4], &[4]], 2, 0))
        .unwrap();
    assert!(outcome.win);
}

#[test]
fn test_lock_after_game_over_changes_nothing() {
    let mut grid = Grid::new(6, 4).unwrap();
    grid.lock_and_resolve(&frame(&[&[2], &[4], &[8], &[16]], 0, 4))
        .unwrap();
    let before = grid.clone();

    let outcome = grid.lock_and_resolve(&frame(&[&[2]], 3, 0)).unwrap();
    assert!(outcome.game_over);
    assert_eq!(outcome.merges, 0);
    assert_eq!(grid, before);
}

#[test]
fn test_simultaneous_clear_of_separated_rows() {
    let mut grid = grid_with(
        8,
        4,
        &[
            &[16, 0, 0, 0],
            &[0, 0, 0, 0],
            &[2, 4, 8, 16],
            &[4, 0, 0, 0],
            &[0, 0, 0, 0],
            &[32, 64, 128, 256],
            &[0, 8, 0, 0],
        ],
    );

    let cleared = grid.clear_full_rows();
    assert_eq!(cleared, vec![2, 5]);
    assert_eq!(grid.score(), 30 + 480);

    assert_eq!(value(&grid, 0, 0), 16);
    assert_eq!(value(&grid, 2, 0), 4);
    assert_eq!(value(&grid, 4, 1), 8);
    for row in 5..8 {
        for col in 0..4 {
            assert_eq!(value(&grid, row, col), 0);
        }
    }
}

#[test]
fn test_adjacent_full_rows_clear_together() {
    let mut grid = grid_with(
        6,
        4,
        &[&[2, 0, 0, 0], &[2, 4, 2, 4], &[4, 2, 4, 2], &[8, 0, 0, 0]],
    );
    assert_eq!(grid.clear_full_rows(), vec![1, 2]);
    assert_eq!(value(&grid, 0, 0), 2);
    assert_eq!(value(&grid, 1, 0), 8);
    assert_eq!(value(&grid, 2, 0), 0);
}

#[test]
fn test_clear_runs_after_merge() {
    // Row 0 has three tiles; the locked pair lands in column 3 and merges into
    // the 4 that completes the row.
    let mut grid = grid_with(6, 4, &[&[2, 4, 8, 0]]);
    let outcome = grid
        .lock_and_resolve(&frame(&[&[2], &[2]], 3, 0))
        .unwrap();

    assert_eq!(outcome.merges, 1);
    assert_eq!(outcome.rows_cleared, vec![0]);
    // Merge 4 plus the cleared row 2 + 4 + 8 + 4.
    assert_eq!(outcome.points, 4 + 18);
    assert!(grid.cells().iter().all(|c| c.is_none()));
}

#[test]
fn test_malformed_frames_are_rejected() {
    let mut grid = Grid::new(6, 4).unwrap();

    let empty = BoundedFrame::from_values(&[], Position::new(0, 0)).unwrap();
    assert!(matches!(
        grid.lock_and_resolve(&empty),
        Err(Error::InvalidArgument(_))
    ));

    let ragged = frame(&[&[2, 2], &[2]], 0, 0);
    assert!(matches!(
        grid.lock_and_resolve(&ragged),
        Err(Error::InvalidArgument(_))
    ));

    let below_floor = frame(&[&[2]], 0, -1);
    assert!(grid.lock_and_resolve(&below_floor).is_err());

    let off_side = frame(&[&[2, 2]], 3, 0);
    assert!(grid.lock_and_resolve(&off_side).is_err());

    assert!(grid.cells().iter().all(|c| c.is_none()));
    assert_eq!(grid.score(), 0);
}

#[test]
fn test_overlapping_lock_leaves_grid_unchanged() {
    let mut grid = grid_with(6, 4, &[&[8, 0, 0, 0]]);
    let before = grid.clone();
    let result = grid.lock_and_resolve(&frame(&[&[2, 2]], 0, 0));
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert_eq!(grid, before);
}

#[test]
fn test_checked_cell_query() {
    let grid = Grid::new(6, 4).unwrap();
    assert_eq!(grid.cell(5, 3), Ok(None));
    assert!(matches!(grid.cell(6, 0), Err(Error::InvalidArgument(_))));
    assert!(matches!(grid.cell(0, 4), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_grid_dimension_limits() {
    assert!(Grid::new(3, 4).is_err());
    assert!(Grid::new(4, 3).is_err());
    assert!(Grid::new(65, 8).is_err());
    assert!(Grid::new(4, 4).is_ok());
    assert!(matches!(Grid::new(0, 0), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_can_place_above_top_but_not_below_floor() {
    let grid = Grid::new(6, 4).unwrap();
    assert!(grid.is_free(0, 6));
    assert!(grid.is_free(3, 100));
    assert!(!grid.is_free(0, -1));
    assert!(!grid.is_free(-1, 3));
    assert!(!grid.is_free(4, 3));
}
