//! Padded scalar-field storage on a uniform 2D grid.
//!
//! A `PaddedField` wraps a logical `ny × nx` grid with `L` ghost layers
//! on every side, so stencil code can read one cell past the image
//! border without branching. Ghost cells are either zero or prolonged
//! (copies of the nearest interior border row/column).

use crate::grid::Grid2D;

/// How ghost cells are initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostPolicy {
    /// Ghost cells stay zero.
    Zero,
    /// Ghost cells replicate the outermost interior row/column. Rows
    /// are prolonged first, then columns, so corners receive the
    /// column prolongation of an already row-prolonged edge.
    Prolong,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaddedField {
    grid: Grid2D,
    layers: usize,
    data: Vec<f64>,
}

impl PaddedField {
    pub fn zeros(grid: Grid2D, layers: usize) -> Self {
        let padded = (grid.ny + 2 * layers) * (grid.nx + 2 * layers);
        Self {
            grid,
            layers,
            data: vec![0.0; padded],
        }
    }

    /// Extract channel `channel` from an interleaved `(H, W, C)` u8
    /// buffer into a padded field, scaling interior values into [0,1].
    pub fn from_channel(
        buffer: &[u8],
        grid: Grid2D,
        channels: usize,
        channel: usize,
        layers: usize,
        policy: GhostPolicy,
    ) -> Self {
        assert!(
            channel < channels,
            "channel index {channel} out of range (buffer has {channels} channels)"
        );
        assert_eq!(
            buffer.len(),
            grid.len() * channels,
            "buffer length must match grid size times channel count"
        );
        let mut field = Self::zeros(grid, layers);
        for iy in 0..grid.ny {
            for ix in 0..grid.nx {
                let raw = buffer[(iy * grid.nx + ix) * channels + channel];
                field.set(iy as isize, ix as isize, f64::from(raw) / 255.0);
            }
        }
        if policy == GhostPolicy::Prolong {
            field.prolong_ghosts();
        }
        field
    }

    /// Build a field from already-normalized interior values.
    pub fn from_values(grid: Grid2D, layers: usize, values: &[f64], policy: GhostPolicy) -> Self {
        assert_eq!(
            values.len(),
            grid.len(),
            "value length must match grid size"
        );
        let mut field = Self::zeros(grid, layers);
        for iy in 0..grid.ny {
            for ix in 0..grid.nx {
                field.set(iy as isize, ix as isize, values[iy * grid.nx + ix]);
            }
        }
        if policy == GhostPolicy::Prolong {
            field.prolong_ghosts();
        }
        field
    }

    pub fn grid(&self) -> Grid2D {
        self.grid
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    fn padded_nx(&self) -> usize {
        self.grid.nx + 2 * self.layers
    }

    fn padded_ny(&self) -> usize {
        self.grid.ny + 2 * self.layers
    }

    /// Flat index for logical coordinates; ghost cells live at
    /// `-layers..0` and `n..n+layers`.
    fn raw_idx(&self, iy: isize, ix: isize) -> usize {
        let l = self.layers as isize;
        let py = iy + l;
        let px = ix + l;
        assert!(
            py >= 0 && (py as usize) < self.padded_ny(),
            "row {iy} outside field of {} rows with {} ghost layers",
            self.grid.ny,
            self.layers
        );
        assert!(
            px >= 0 && (px as usize) < self.padded_nx(),
            "column {ix} outside field of {} columns with {} ghost layers",
            self.grid.nx,
            self.layers
        );
        (py as usize) * self.padded_nx() + (px as usize)
    }

    #[inline]
    pub fn get(&self, iy: isize, ix: isize) -> f64 {
        self.data[self.raw_idx(iy, ix)]
    }

    #[inline]
    pub fn set(&mut self, iy: isize, ix: isize, value: f64) {
        let idx = self.raw_idx(iy, ix);
        self.data[idx] = value;
    }

    /// Interior values, row-major, without ghost cells.
    pub fn interior(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.grid.len());
        for iy in 0..self.grid.ny as isize {
            for ix in 0..self.grid.nx as isize {
                out.push(self.get(iy, ix));
            }
        }
        out
    }

    fn prolong_ghosts(&mut self) {
        let l = self.layers as isize;
        let ny = self.grid.ny as isize;
        let nx = self.grid.nx as isize;
        // Rows first: only interior columns, corners stay untouched.
        for layer in 1..=l {
            for ix in 0..nx {
                let top = self.get(0, ix);
                let bottom = self.get(ny - 1, ix);
                self.set(-layer, ix, top);
                self.set(ny - 1 + layer, ix, bottom);
            }
        }
        // Then columns over the full padded height, filling corners.
        for layer in 1..=l {
            for iy in -l..ny + l {
                let left = self.get(iy, 0);
                let right = self.get(iy, nx - 1);
                self.set(iy, -layer, left);
                self.set(iy, nx - 1 + layer, right);
            }
        }
    }
}
