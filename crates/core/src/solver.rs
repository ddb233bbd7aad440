//! Conjugate-gradient-style minimizer over a `MatVecEngine`.
//!
//! The reference formulation computed `M·p` and `Mᵗ·r` once before the
//! iteration loop and reused them unchanged as `p` and `r` evolved,
//! which deviates from a textbook derivation. Both behaviors are kept
//! behind [`DirectionUpdate`]: `Frozen` reproduces the reuse verbatim,
//! `Recompute` (the default) refreshes both products every iteration.

use serde::{Deserialize, Serialize};

use crate::colorize::Verbosity;
use crate::engine::MatVecEngine;
use crate::sparse::CsrMatrix;

/// Gradient-norm floor below which the iteration exits early.
pub const GRADIENT_FLOOR: f64 = 1e-14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DirectionUpdate {
    /// Reuse the pre-loop `M·p` and `Mᵗ·r` products on every
    /// iteration, as the reference formulation does.
    Frozen,
    /// Recompute both products each iteration.
    #[default]
    Recompute,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Iteration cap; the best available iterate is returned when it
    /// is reached, never an error.
    pub max_iter: usize,
    /// Relative-residual tolerance `‖r‖ / ‖r0‖`.
    pub tol: f64,
    pub direction_update: DirectionUpdate,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iter: 10,
            tol: 1e-10,
            direction_update: DirectionUpdate::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SolveResult {
    pub x: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
    pub residual_ratio: f64,
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += alpha * xi;
    }
}

/// Minimize the quadratic by driving `matrix · x` toward `b`, starting
/// from `x0`. Non-convergence at the iteration cap is not an error.
pub fn minimize<E: MatVecEngine>(
    engine: &E,
    matrix: &CsrMatrix,
    b: &[f64],
    x0: &[f64],
    opts: &SolverOptions,
    verbosity: Verbosity,
) -> SolveResult {
    assert_eq!(b.len(), matrix.nrows(), "rhs length must match the matrix");
    assert_eq!(
        x0.len(),
        matrix.ncols(),
        "initial guess length must match the matrix"
    );

    let mut x = x0.to_vec();
    let a_dot_x0 = engine.apply(matrix, &x);
    let mut r: Vec<f64> = b.iter().zip(&a_dot_x0).map(|(bi, ai)| bi - ai).collect();
    let nrm_r0 = norm(&r);
    if nrm_r0 < GRADIENT_FLOOR {
        // Nothing to correct (e.g. every unknown pinned).
        return SolveResult {
            x,
            iterations: 0,
            converged: true,
            residual_ratio: 0.0,
        };
    }

    let transposed = matrix.transpose();
    let at_dot_r0 = engine.apply(&transposed, &r);
    let mut gc = at_dot_r0.clone();
    let mut nrm_gc = norm(&gc);
    if nrm_gc < GRADIENT_FLOOR {
        return SolveResult {
            x,
            iterations: 0,
            converged: true,
            residual_ratio: 1.0,
        };
    }

    let mut p = gc.clone();
    let a_dot_p0 = engine.apply(matrix, &p);
    let mut cp = a_dot_p0.clone();

    let nrm_cp = norm(&cp);
    let mut alpha = nrm_gc * nrm_gc / (nrm_cp * nrm_cp);
    axpy(alpha, &p, &mut x);
    axpy(-alpha, &cp, &mut r);
    let mut nrm_r = norm(&r);
    let mut nrm_gp = nrm_gc;
    gc = match opts.direction_update {
        DirectionUpdate::Frozen => at_dot_r0.clone(),
        DirectionUpdate::Recompute => engine.apply(&transposed, &r),
    };
    let mut iterations = 1;
    let mut converged = nrm_r < opts.tol * nrm_r0;

    for iter in 1..opts.max_iter {
        if converged {
            break;
        }
        if verbosity.enabled() {
            eprintln!(
                "[minimize] iter {:06}/{:06} ||r||/||r0|| = {:.14e}",
                iter,
                opts.max_iter,
                nrm_r / nrm_r0
            );
        }
        nrm_gc = norm(&gc);
        if nrm_gc < GRADIENT_FLOOR {
            converged = true;
            break;
        }
        let beta = -nrm_gc * nrm_gc / (nrm_gp * nrm_gp);
        for (pi, gi) in p.iter_mut().zip(&gc) {
            *pi = gi - beta * *pi;
        }
        cp = match opts.direction_update {
            DirectionUpdate::Frozen => a_dot_p0.clone(),
            DirectionUpdate::Recompute => engine.apply(matrix, &p),
        };
        let nrm_cp = norm(&cp);
        alpha = nrm_gc * nrm_gc / (nrm_cp * nrm_cp);
        axpy(alpha, &p, &mut x);
        axpy(-alpha, &cp, &mut r);
        nrm_gp = nrm_gc;
        gc = match opts.direction_update {
            DirectionUpdate::Frozen => at_dot_r0.clone(),
            DirectionUpdate::Recompute => engine.apply(&transposed, &r),
        };
        nrm_r = norm(&r);
        iterations = iter + 1;
        if nrm_r < opts.tol * nrm_r0 {
            converged = true;
        }
    }

    SolveResult {
        x,
        iterations,
        converged,
        residual_ratio: nrm_r / nrm_r0,
    }
}
