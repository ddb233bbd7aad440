#![cfg(test)]

use super::field::{GhostPolicy, PaddedField};
use super::grid::Grid2D;

#[test]
fn zeros_covers_padded_extent() {
    let grid = Grid2D::new(3, 2);
    let field = PaddedField::zeros(grid, 2);
    assert_eq!(field.get(-2, -2), 0.0);
    assert_eq!(field.get(3, 4), 0.0);
}

#[test]
fn from_channel_copies_interior_scaled_to_unit_range() {
    let grid = Grid2D::new(2, 2);
    // (H, W, C) interleaved with three channels.
    let buffer = [
        0u8, 51, 102, //
        10, 153, 204, //
        20, 255, 0, //
        30, 0, 255,
    ];
    let field = PaddedField::from_channel(&buffer, grid, 3, 1, 1, GhostPolicy::Zero);
    assert_eq!(field.get(0, 0), 51.0 / 255.0);
    assert_eq!(field.get(0, 1), 153.0 / 255.0);
    assert_eq!(field.get(1, 0), 1.0);
    assert_eq!(field.get(1, 1), 0.0);
}

#[test]
#[should_panic(expected = "channel index 3 out of range")]
fn from_channel_rejects_out_of_range_channel() {
    let grid = Grid2D::new(1, 1);
    let buffer = [1u8, 2, 3];
    let _ = PaddedField::from_channel(&buffer, grid, 3, 3, 1, GhostPolicy::Zero);
}

#[test]
#[should_panic(expected = "buffer length must match grid size times channel count")]
fn from_channel_rejects_short_buffer() {
    let grid = Grid2D::new(2, 2);
    let buffer = [0u8; 7];
    let _ = PaddedField::from_channel(&buffer, grid, 2, 0, 1, GhostPolicy::Zero);
}

#[test]
fn zero_policy_leaves_ghost_cells_zero() {
    let grid = Grid2D::new(2, 2);
    let field = PaddedField::from_values(grid, 1, &[1.0, 2.0, 3.0, 4.0], GhostPolicy::Zero);
    assert_eq!(field.get(-1, 0), 0.0);
    assert_eq!(field.get(0, -1), 0.0);
    assert_eq!(field.get(2, 2), 0.0);
}

#[test]
fn prolong_replicates_border_rows_and_columns() {
    let grid = Grid2D::new(2, 2);
    let field = PaddedField::from_values(grid, 2, &[1.0, 2.0, 3.0, 4.0], GhostPolicy::Prolong);
    // Rows replicate vertically.
    assert_eq!(field.get(-1, 0), 1.0);
    assert_eq!(field.get(-2, 1), 2.0);
    assert_eq!(field.get(2, 0), 3.0);
    assert_eq!(field.get(3, 1), 4.0);
    // Columns replicate horizontally.
    assert_eq!(field.get(0, -2), 1.0);
    assert_eq!(field.get(1, 3), 4.0);
}

#[test]
fn prolong_fills_corners_from_row_prolonged_edges() {
    let grid = Grid2D::new(2, 2);
    let field = PaddedField::from_values(grid, 2, &[1.0, 2.0, 3.0, 4.0], GhostPolicy::Prolong);
    // Corner ghost cells equal the nearest interior corner value.
    assert_eq!(field.get(-2, -2), 1.0);
    assert_eq!(field.get(-1, 3), 2.0);
    assert_eq!(field.get(3, -1), 3.0);
    assert_eq!(field.get(2, 2), 4.0);
}

#[test]
fn interior_recovers_source_values_row_major() {
    let grid = Grid2D::new(3, 2);
    let values = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5];
    let field = PaddedField::from_values(grid, 2, &values, GhostPolicy::Prolong);
    assert_eq!(field.interior(), values.to_vec());
}

#[test]
#[should_panic(expected = "outside field")]
fn get_rejects_reads_past_the_ghost_layers() {
    let grid = Grid2D::new(2, 2);
    let field = PaddedField::zeros(grid, 1);
    let _ = field.get(-2, 0);
}
