#![cfg(test)]

use super::assembler::assemble_affinity_matrix;
use super::field::{GhostPolicy, PaddedField};
use super::grid::Grid2D;
use super::sparse::CsrMatrix;
use super::stats::{local_means, local_variance};

fn assemble(values: &[f64], nx: usize, ny: usize) -> CsrMatrix {
    let grid = Grid2D::new(nx, ny);
    let intensity = PaddedField::from_values(grid, 2, values, GhostPolicy::Prolong);
    let means = local_means(&intensity);
    let variance = local_variance(&intensity, &means);
    assemble_affinity_matrix(&intensity, &means, &variance)
}

fn row_nnz(matrix: &CsrMatrix, i: usize) -> usize {
    matrix.row(i).0.len()
}

#[test]
fn three_by_three_has_four_corner_and_nine_interior_nonzeros() {
    let m = assemble(&vec![0.5; 9], 3, 3);
    assert_eq!(m.nrows(), 9);
    for corner in [0, 2, 6, 8] {
        assert_eq!(row_nnz(&m, corner), 4);
    }
    assert_eq!(row_nnz(&m, 4), 9);
}

#[test]
fn five_by_five_edge_rows_have_six_nonzeros() {
    let m = assemble(&vec![0.5; 25], 5, 5);
    // Edge-but-non-corner pixels of a 5x5 grid.
    for edge in [1, 2, 3, 5, 9, 10, 14, 15, 19, 21, 22, 23] {
        assert_eq!(row_nnz(&m, edge), 6, "row {edge}");
    }
    for interior in [6, 7, 8, 11, 12, 13, 16, 17, 18] {
        assert_eq!(row_nnz(&m, interior), 9, "row {interior}");
    }
    let expected_nnz = 4 * 4 + 12 * 6 + 9 * 9;
    assert_eq!(m.nnz(), expected_nnz);
}

#[test]
fn every_row_has_a_unit_diagonal() {
    let m = assemble(&vec![0.3; 25], 5, 5);
    for i in 0..m.nrows() {
        let (cols, vals) = m.row(i);
        let diag = cols
            .iter()
            .position(|&c| c == i)
            .expect("diagonal entry present");
        assert_eq!(vals[diag], 1.0);
    }
}

#[test]
fn off_diagonals_are_negative_and_sum_to_minus_one() {
    let ramp: Vec<f64> = (0..25).map(|i| i as f64 / 25.0).collect();
    let m = assemble(&ramp, 5, 5);
    for i in 0..m.nrows() {
        let (cols, vals) = m.row(i);
        let off_sum: f64 = cols
            .iter()
            .zip(vals)
            .filter(|(&c, _)| c != i)
            .map(|(_, &v)| v)
            .sum();
        assert!((off_sum + 1.0).abs() < 1e-12, "row {i}: {off_sum}");
        for (&c, &v) in cols.iter().zip(vals) {
            if c != i {
                assert!(v < 0.0, "row {i} col {c} not negative: {v}");
            }
        }
    }
}

#[test]
fn uniform_intensity_gives_equal_neighbor_coefficients() {
    let m = assemble(&vec![0.5; 25], 5, 5);
    // Interior row: eight neighbors, each -1/8 after normalization.
    let (cols, vals) = m.row(12);
    assert_eq!(cols.len(), 9);
    for (&c, &v) in cols.iter().zip(vals) {
        if c != 12 {
            assert!((v + 1.0 / 8.0).abs() < 1e-15);
        }
    }
}

#[test]
fn columns_follow_the_neighbor_scan_order() {
    let m = assemble(&vec![0.5; 25], 5, 5);
    let nx = 5;
    let idx = 12; // interior pixel (2, 2)
    let (cols, _) = m.row(idx);
    let expected = [
        idx - nx - 1,
        idx - nx,
        idx - nx + 1,
        idx - 1,
        idx,
        idx + 1,
        idx + nx - 1,
        idx + nx,
        idx + nx + 1,
    ];
    assert_eq!(cols, expected);
}

#[test]
fn corner_row_omits_out_of_bounds_neighbors_in_order() {
    let m = assemble(&vec![0.5; 25], 5, 5);
    // Top-left corner: diagonal first, then east, south, south-east.
    let (cols, _) = m.row(0);
    assert_eq!(cols, [0, 1, 5, 6]);
}

#[test]
fn offsets_are_monotone_and_end_at_nnz() {
    let m = assemble(&vec![0.5; 9], 3, 3);
    let offsets = m.row_offsets();
    assert_eq!(offsets[0], 0);
    assert!(offsets.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(*offsets.last().unwrap(), m.nnz());
}
