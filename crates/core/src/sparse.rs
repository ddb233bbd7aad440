//! Compressed sparse-row matrix storage and kernels.
//!
//! Three parallel arrays: row-start offsets (length `nrows + 1`,
//! monotonically non-decreasing), column indices, and coefficients.
//! Column order within a row is whatever the producer emitted; it is
//! not required to be sorted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix {
    nrows: usize,
    ncols: usize,
    row_offsets: Vec<usize>,
    col_indices: Vec<usize>,
    values: Vec<f64>,
}

impl CsrMatrix {
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        row_offsets: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<f64>,
    ) -> Self {
        assert_eq!(
            row_offsets.len(),
            nrows + 1,
            "row offsets must have nrows + 1 entries"
        );
        assert_eq!(row_offsets[0], 0, "first row offset must be zero");
        assert!(
            row_offsets.windows(2).all(|pair| pair[0] <= pair[1]),
            "row offsets must be monotonically non-decreasing"
        );
        assert_eq!(
            *row_offsets.last().expect("offsets are non-empty"),
            col_indices.len(),
            "last row offset must equal the nonzero count"
        );
        assert_eq!(
            col_indices.len(),
            values.len(),
            "column indices and values must have equal length"
        );
        assert!(
            col_indices.iter().all(|&col| col < ncols),
            "column index out of matrix bounds"
        );
        Self {
            nrows,
            ncols,
            row_offsets,
            col_indices,
            values,
        }
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn nnz(&self) -> usize {
        self.col_indices.len()
    }

    pub fn row_offsets(&self) -> &[usize] {
        &self.row_offsets
    }

    /// Column indices and coefficients of row `i`.
    pub fn row(&self, i: usize) -> (&[usize], &[f64]) {
        assert!(i < self.nrows, "row index {i} out of matrix bounds");
        let span = self.row_offsets[i]..self.row_offsets[i + 1];
        (&self.col_indices[span.clone()], &self.values[span])
    }

    /// Dense product `self · x`, computed directly in this process.
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        assert_eq!(
            x.len(),
            self.ncols,
            "vector length must match matrix columns"
        );
        (0..self.nrows)
            .map(|i| {
                let (cols, vals) = self.row(i);
                cols.iter().zip(vals).map(|(&col, &v)| v * x[col]).sum()
            })
            .collect()
    }

    /// Transposed copy in CSR form (counting pass, then scatter).
    pub fn transpose(&self) -> CsrMatrix {
        let mut counts = vec![0usize; self.ncols + 1];
        for &col in &self.col_indices {
            counts[col + 1] += 1;
        }
        for i in 0..self.ncols {
            counts[i + 1] += counts[i];
        }
        let row_offsets = counts.clone();
        let mut cursor = counts;
        let mut col_indices = vec![0usize; self.nnz()];
        let mut values = vec![0.0; self.nnz()];
        for i in 0..self.nrows {
            let (cols, vals) = self.row(i);
            for (&col, &v) in cols.iter().zip(vals) {
                let slot = cursor[col];
                col_indices[slot] = i;
                values[slot] = v;
                cursor[col] += 1;
            }
        }
        CsrMatrix::from_parts(self.ncols, self.nrows, row_offsets, col_indices, values)
    }

    /// Contiguous row slice `start..end` with rebased offsets. The
    /// column space is unchanged, so the block still multiplies the
    /// full-length vector. This is the unit shipped to a worker.
    pub fn row_block(&self, start: usize, end: usize) -> CsrMatrix {
        assert!(
            start <= end && end <= self.nrows,
            "row block {start}..{end} out of matrix bounds"
        );
        let base = self.row_offsets[start];
        let row_offsets: Vec<usize> = self.row_offsets[start..=end]
            .iter()
            .map(|&offset| offset - base)
            .collect();
        let span = base..self.row_offsets[end];
        CsrMatrix::from_parts(
            end - start,
            self.ncols,
            row_offsets,
            self.col_indices[span.clone()].to_vec(),
            self.values[span].to_vec(),
        )
    }

    /// Rebuild with the same sparsity pattern and new coefficients.
    pub fn with_values(&self, values: Vec<f64>) -> CsrMatrix {
        CsrMatrix::from_parts(
            self.nrows,
            self.ncols,
            self.row_offsets.clone(),
            self.col_indices.clone(),
            values,
        )
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }
}
