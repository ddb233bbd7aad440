//! Local 3×3 intensity statistics.
//!
//! Both passes consume one ghost layer of their input as boundary
//! context, so the outputs carry one fewer layer than the intensity
//! field. Every retained position, including the output's own ghost
//! ring, is computed from a full 3×3 window.

use crate::field::PaddedField;

/// Mean intensity of each pixel with its eight neighbors.
pub fn local_means(intensity: &PaddedField) -> PaddedField {
    assert!(
        intensity.layers() >= 1,
        "means need at least one ghost layer of context"
    );
    let grid = intensity.grid();
    let mut means = PaddedField::zeros(grid, intensity.layers() - 1);
    let l = means.layers() as isize;
    for iy in -l..grid.ny as isize + l {
        for ix in -l..grid.nx as isize + l {
            let mut sum = 0.0;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    sum += intensity.get(iy + dy, ix + dx);
                }
            }
            means.set(iy, ix, sum / 9.0);
        }
    }
    means
}

/// Sum of squared deviations from the window mean over the same 3×3
/// window. Deliberately not divided by 9: the weighting formula
/// expects the unnormalized sum-of-squares scale.
pub fn local_variance(intensity: &PaddedField, means: &PaddedField) -> PaddedField {
    assert!(
        intensity.layers() >= 1,
        "variance needs at least one ghost layer of context"
    );
    assert_eq!(
        means.layers(),
        intensity.layers() - 1,
        "means must carry one fewer ghost layer than the intensity"
    );
    assert_eq!(
        means.grid(),
        intensity.grid(),
        "means and intensity must share a grid"
    );
    let grid = intensity.grid();
    let mut variance = PaddedField::zeros(grid, means.layers());
    let l = variance.layers() as isize;
    for iy in -l..grid.ny as isize + l {
        for ix in -l..grid.nx as isize + l {
            let mu = means.get(iy, ix);
            let mut sum = 0.0;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let dev = intensity.get(iy + dy, ix + dx) - mu;
                    sum += dev * dev;
                }
            }
            variance.set(iy, ix, sum);
        }
    }
    variance
}
