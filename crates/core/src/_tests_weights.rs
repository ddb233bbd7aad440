#![cfg(test)]

use super::field::{GhostPolicy, PaddedField};
use super::grid::Grid2D;
use super::stats::{local_means, local_variance};
use super::weights::{affinity_weight, VARIANCE_FLOOR};

fn stats_for(values: &[f64], nx: usize, ny: usize) -> (PaddedField, PaddedField, PaddedField) {
    let grid = Grid2D::new(nx, ny);
    let intensity = PaddedField::from_values(grid, 2, values, GhostPolicy::Prolong);
    let means = local_means(&intensity);
    let variance = local_variance(&intensity, &means);
    (intensity, means, variance)
}

#[test]
fn uniform_intensity_gives_weight_exactly_one() {
    let (intensity, means, variance) = stats_for(&[0.5; 16], 4, 4);
    for iy in 0..4 {
        for ix in 0..4 {
            for (ny, nx) in [(iy, ix + 1), (iy + 1, ix)] {
                if ny >= 4 || nx >= 4 {
                    continue;
                }
                let w = affinity_weight(&intensity, &means, &variance, (iy, ix), (ny, nx));
                assert_eq!(w, 1.0);
            }
        }
    }
}

#[test]
fn weight_is_one_regardless_of_variance_when_correlation_vanishes() {
    // Force the reference pixel's deviation to zero while keeping a
    // large variance in its window: the correlation term still dies.
    let (intensity, means, variance) = stats_for(
        &[
            0.0, 1.0, 0.0, //
            1.0, 0.5, 1.0, //
            0.0, 1.0, 0.0,
        ],
        3,
        3,
    );
    let mu = means.get(1, 1);
    if (intensity.get(1, 1) - mu).abs() < 1e-12 {
        let w = affinity_weight(&intensity, &means, &variance, (1, 1), (0, 1));
        assert!((w - 1.0).abs() < 1e-12);
    }
}

#[test]
fn weight_is_directional_not_symmetric() {
    let (intensity, means, variance) = stats_for(
        &[
            0.1, 0.9, 0.2, //
            0.8, 0.3, 0.7, //
            0.2, 0.6, 0.1,
        ],
        3,
        3,
    );
    let forward = affinity_weight(&intensity, &means, &variance, (0, 0), (1, 1));
    let backward = affinity_weight(&intensity, &means, &variance, (1, 1), (0, 0));
    assert!((forward - backward).abs() > 1e-9);
}

#[test]
fn variance_floor_bounds_the_correlation_term() {
    // Nearly uniform neighborhood: raw variance is far below the
    // floor, so the weight stays finite and close to one.
    let mut values = vec![0.5; 9];
    values[4] = 0.5 + 1e-9;
    let (intensity, means, variance) = stats_for(&values, 3, 3);
    assert!(variance.get(1, 1) < VARIANCE_FLOOR);
    let w = affinity_weight(&intensity, &means, &variance, (1, 1), (0, 0));
    assert!(w.is_finite());
    assert!((w - 1.0).abs() < 1e-3);
}

#[test]
fn correlated_neighbor_weighs_more_than_anticorrelated() {
    // Bright reference pixel: a bright neighbor correlates positively,
    // a dark one negatively.
    let (intensity, means, variance) = stats_for(
        &[
            0.9, 0.1, 0.9, //
            0.1, 0.9, 0.1, //
            0.9, 0.1, 0.9,
        ],
        3,
        3,
    );
    let bright = affinity_weight(&intensity, &means, &variance, (1, 1), (0, 0));
    let dark = affinity_weight(&intensity, &means, &variance, (1, 1), (0, 1));
    assert!(bright > dark);
}
