//! Dirichlet pinning of known-color pixels.
//!
//! Pinning is a pure transformation stage: it takes the assembled
//! matrix and returns a new one, so a matrix read concurrently by both
//! channel solves is never mutated in place.

use crate::sparse::CsrMatrix;

/// Pixel indices whose chrominance is already known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirichletSet {
    pinned: Vec<bool>,
    indices: Vec<usize>,
}

impl DirichletSet {
    /// An empty set over a domain of `n` unknowns.
    pub fn empty(n: usize) -> Self {
        Self {
            pinned: vec![false; n],
            indices: Vec::new(),
        }
    }

    pub fn from_indices(n: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut set = Self::empty(n);
        for idx in indices {
            assert!(idx < n, "pinned index {idx} out of domain of {n} unknowns");
            if !set.pinned[idx] {
                set.pinned[idx] = true;
                set.indices.push(idx);
            }
        }
        set
    }

    /// Detect hint pixels from the marked image's hue and saturation
    /// planes: a pixel is pinned when both are nonzero.
    pub fn from_hint_channels(hue: &[f64], saturation: &[f64]) -> Self {
        assert_eq!(
            hue.len(),
            saturation.len(),
            "hue and saturation planes must have equal length"
        );
        let indices = hue
            .iter()
            .zip(saturation)
            .enumerate()
            .filter(|(_, (&h, &s))| h != 0.0 && s != 0.0)
            .map(|(idx, _)| idx);
        Self::from_indices(hue.len(), indices.collect::<Vec<_>>())
    }

    /// Number of unknowns in the domain the set was built over.
    pub fn domain_len(&self) -> usize {
        self.pinned.len()
    }

    /// Number of pinned pixels.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn is_pinned(&self, idx: usize) -> bool {
        self.pinned[idx]
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

/// Rewrite the matrix so pinned unknowns are fixed: a pinned row
/// collapses to the identity, and every other row zeroes its
/// coefficients in pinned columns. The remaining weights of those rows
/// are deliberately not re-normalized; losing the off-diagonal sum
/// structure is the accepted consequence of pinning.
pub fn apply_dirichlet(matrix: &CsrMatrix, set: &DirichletSet) -> CsrMatrix {
    assert_eq!(
        set.domain_len(),
        matrix.nrows(),
        "dirichlet set domain must match the matrix dimension"
    );
    let mut values = Vec::with_capacity(matrix.nnz());
    for i in 0..matrix.nrows() {
        let (cols, vals) = matrix.row(i);
        if set.is_pinned(i) {
            values.extend(cols.iter().map(|&col| if col == i { 1.0 } else { 0.0 }));
        } else {
            values.extend(
                cols.iter()
                    .zip(vals)
                    .map(|(&col, &v)| if set.is_pinned(col) { 0.0 } else { v }),
            );
        }
    }
    matrix.with_values(values)
}
