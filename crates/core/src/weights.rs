//! Pairwise affinity weights from local intensity statistics.

use crate::field::PaddedField;

/// Variance floor applied wherever the variance appears as a divisor,
/// so near-uniform neighborhoods cannot blow the correlation term up.
pub const VARIANCE_FLOOR: f64 = 2e-6;

/// Correlation weight for the contribution of neighbor `c` to the
/// reference pixel `r`, both given as logical `(iy, ix)` coordinates.
///
/// Only the reference pixel's mean and variance enter the formula, so
/// the relation is directional: `weight(r, c)` and `weight(c, r)`
/// generally differ. When the intensity is literally uniform the
/// correlation term vanishes and the weight is exactly 1, whatever
/// the (floored) variance.
pub fn affinity_weight(
    intensity: &PaddedField,
    means: &PaddedField,
    variance: &PaddedField,
    r: (usize, usize),
    c: (usize, usize),
) -> f64 {
    let (ry, rx) = (r.0 as isize, r.1 as isize);
    let (cy, cx) = (c.0 as isize, c.1 as isize);
    let mu = means.get(ry, rx);
    let sigma = variance.get(ry, rx).max(VARIANCE_FLOOR);
    1.0 + (intensity.get(ry, rx) - mu) * (intensity.get(cy, cx) - mu) / sigma
}
