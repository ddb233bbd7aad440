//! End-to-end colorization pipeline orchestration.
//!
//! Field → statistics → assembly → Dirichlet → two channel solves.
//! The solve works on the chrominance correction `x` with
//! `b = −(A · chroma)` and a zero initial guess; the returned channel
//! is `chroma + x`. Pinned rows get a zero right-hand side, so with
//! the identity row and zeroed pinned columns the correction at a
//! hinted pixel stays exactly zero at every iterate and the hint value
//! is returned untouched.

use std::time::Instant;

use crate::assembler::assemble_affinity_matrix;
use crate::dirichlet::{apply_dirichlet, DirichletSet};
use crate::engine::MatVecEngine;
use crate::field::PaddedField;
use crate::solver::{minimize, SolverOptions};
use crate::stats::{local_means, local_variance};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Verbose,
}

impl Verbosity {
    pub(crate) fn enabled(self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// One colorization invocation. All entities derived from it are
/// constructed fresh per run and discarded afterwards.
#[derive(Debug, Clone)]
pub struct ColorizeJob {
    /// Intensity field with two ghost layers, prolonged at the border.
    pub intensity: PaddedField,
    /// Marked-image Cb plane in [0,1], row-major, length `N`.
    pub chroma_b: Vec<f64>,
    /// Marked-image Cr plane in [0,1], row-major, length `N`.
    pub chroma_r: Vec<f64>,
    pub pinned: DirichletSet,
    pub solver: SolverOptions,
}

#[derive(Debug, Clone, Copy)]
pub struct ChannelSummary {
    pub iterations: usize,
    pub converged: bool,
    pub residual_ratio: f64,
}

#[derive(Debug, Clone)]
pub struct ColorizeResult {
    pub chroma_b: Vec<f64>,
    pub chroma_r: Vec<f64>,
    pub summary_b: ChannelSummary,
    pub summary_r: ChannelSummary,
}

pub fn run<E: MatVecEngine>(engine: &E, job: &ColorizeJob, verbosity: Verbosity) -> ColorizeResult {
    let grid = job.intensity.grid();
    let n = grid.len();
    assert!(
        job.intensity.layers() >= 2,
        "intensity needs two ghost layers for the statistics stencils"
    );
    assert_eq!(job.chroma_b.len(), n, "Cb plane length must match the grid");
    assert_eq!(job.chroma_r.len(), n, "Cr plane length must match the grid");
    assert_eq!(
        job.pinned.domain_len(),
        n,
        "pinned set domain must match the grid"
    );

    let pipeline_start = Instant::now();
    if verbosity.enabled() {
        eprintln!(
            "[setup] grid={}x{} pixels={} pinned={} max_iter={} tol={} update={:?}",
            grid.nx,
            grid.ny,
            n,
            job.pinned.len(),
            job.solver.max_iter,
            job.solver.tol,
            job.solver.direction_update
        );
    }

    let stats_start = Instant::now();
    let means = local_means(&job.intensity);
    let variance = local_variance(&job.intensity, &means);
    if verbosity.enabled() {
        eprintln!("[stats] means and variance in {:.2?}", stats_start.elapsed());
    }

    let assembly_start = Instant::now();
    let matrix = assemble_affinity_matrix(&job.intensity, &means, &variance);
    if verbosity.enabled() {
        eprintln!(
            "[matrix] {} rows, {} nonzeros in {:.2?}",
            matrix.nrows(),
            matrix.nnz(),
            assembly_start.elapsed()
        );
    }

    // Right-hand sides come from the unpinned matrix; pinned rows are
    // then zeroed so their correction stays zero.
    let mut b_cb: Vec<f64> = matrix.mul_vec(&job.chroma_b).iter().map(|v| -v).collect();
    let mut b_cr: Vec<f64> = matrix.mul_vec(&job.chroma_r).iter().map(|v| -v).collect();
    for &p in job.pinned.indices() {
        b_cb[p] = 0.0;
        b_cr[p] = 0.0;
    }

    let dirichlet_start = Instant::now();
    let pinned_matrix = apply_dirichlet(&matrix, &job.pinned);
    if verbosity.enabled() {
        eprintln!(
            "[dirichlet] {} rows pinned in {:.2?}",
            job.pinned.len(),
            dirichlet_start.elapsed()
        );
    }

    let x0 = vec![0.0; n];
    let (chroma_b, summary_b) = solve_channel(
        engine,
        &pinned_matrix,
        &b_cb,
        &x0,
        &job.chroma_b,
        job,
        "Cb",
        verbosity,
    );
    let (chroma_r, summary_r) = solve_channel(
        engine,
        &pinned_matrix,
        &b_cr,
        &x0,
        &job.chroma_r,
        job,
        "Cr",
        verbosity,
    );

    if verbosity.enabled() {
        eprintln!(
            "[done] solved both channels in {:.2?} (iters Cb={} Cr={})",
            pipeline_start.elapsed(),
            summary_b.iterations,
            summary_r.iterations
        );
    }

    ColorizeResult {
        chroma_b,
        chroma_r,
        summary_b,
        summary_r,
    }
}

#[allow(clippy::too_many_arguments)]
fn solve_channel<E: MatVecEngine>(
    engine: &E,
    matrix: &crate::sparse::CsrMatrix,
    b: &[f64],
    x0: &[f64],
    chroma: &[f64],
    job: &ColorizeJob,
    label: &str,
    verbosity: Verbosity,
) -> (Vec<f64>, ChannelSummary) {
    let start = Instant::now();
    let result = minimize(engine, matrix, b, x0, &job.solver, verbosity);
    if verbosity.enabled() {
        eprintln!(
            "[solve] channel={} iters={} converged={} ||r||/||r0||={:.3e} elapsed={:.2?}",
            label,
            result.iterations,
            result.converged,
            result.residual_ratio,
            start.elapsed()
        );
    }
    let solved = chroma.iter().zip(&result.x).map(|(c, x)| c + x).collect();
    (
        solved,
        ChannelSummary {
            iterations: result.iterations,
            converged: result.converged,
            residual_ratio: result.residual_ratio,
        },
    )
}
