use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use image::RgbImage;
use tint2d_core::{
    colorize::{self, ColorizeJob, Verbosity},
    dirichlet::DirichletSet,
    field::{GhostPolicy, PaddedField},
    grid::Grid2D,
    solver::{DirectionUpdate, SolverOptions},
};
use tint2d_pool::WorkerPool;

mod color;

#[derive(Parser, Debug)]
#[command(name = "tint2d", about = "Propagate color hints across a grayscale image")]
struct Cli {
    /// Grayscale input image
    gray: PathBuf,
    /// Copy of the input with color hints scribbled on it
    marked: PathBuf,
    /// Path to the colorized PNG output
    #[arg(short, long, default_value = "colorized.png")]
    output: PathBuf,
    /// Worker threads for the mat-vec pool (coordinator not included)
    #[arg(long)]
    workers: Option<usize>,
    /// Path to a TOML file with solver options
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the solver iteration cap
    #[arg(long)]
    max_iter: Option<usize>,
    /// Override the relative residual tolerance
    #[arg(long)]
    tol: Option<f64>,
    /// Override the search-direction update policy
    #[arg(long, value_enum)]
    directions: Option<DirectionArg>,
    /// Suppress progress logs (stderr)
    #[arg(long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionArg {
    Frozen,
    Recompute,
}

impl From<DirectionArg> for DirectionUpdate {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Frozen => DirectionUpdate::Frozen,
            DirectionArg::Recompute => DirectionUpdate::Recompute,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut solver = match &cli.config {
        Some(path) => {
            if !cli.quiet {
                eprintln!("[cli] loading solver config {}", path.display());
            }
            let raw = fs::read_to_string(path)?;
            toml::from_str::<SolverOptions>(&raw)?
        }
        None => SolverOptions::default(),
    };
    if let Some(max_iter) = cli.max_iter {
        solver.max_iter = max_iter;
    }
    if let Some(tol) = cli.tol {
        solver.tol = tol;
    }
    if let Some(directions) = cli.directions {
        solver.direction_update = directions.into();
    }

    let gray = image::open(&cli.gray)?.to_rgb8();
    let marked = image::open(&cli.marked)?.to_rgb8();
    if gray.dimensions() != marked.dimensions() {
        return Err(format!(
            "image dimensions differ: {:?} vs {:?}",
            gray.dimensions(),
            marked.dimensions()
        )
        .into());
    }
    let (width, height) = gray.dimensions();
    let grid = Grid2D::new(width as usize, height as usize);
    if !cli.quiet {
        eprintln!("[cli] {}x{} pixels", width, height);
    }

    // Luminance from the grayscale image drives the affinity weights;
    // chrominance and hints come from the marked copy.
    let mut luma = Vec::with_capacity(grid.len());
    let mut chroma_b = Vec::with_capacity(grid.len());
    let mut chroma_r = Vec::with_capacity(grid.len());
    let mut hue = Vec::with_capacity(grid.len());
    let mut saturation = Vec::with_capacity(grid.len());
    for (gray_px, marked_px) in gray.pixels().zip(marked.pixels()) {
        let (y, _, _) = color::rgb_to_ycbcr(
            gray_px[0] as f64,
            gray_px[1] as f64,
            gray_px[2] as f64,
        );
        luma.push(y / 255.0);
        let (_, cb, cr) = color::rgb_to_ycbcr(
            marked_px[0] as f64,
            marked_px[1] as f64,
            marked_px[2] as f64,
        );
        chroma_b.push(cb / 255.0);
        chroma_r.push(cr / 255.0);
        let (h, s, _) = color::rgb_to_hsv(
            marked_px[0] as f64 / 255.0,
            marked_px[1] as f64 / 255.0,
            marked_px[2] as f64 / 255.0,
        );
        hue.push(h);
        saturation.push(s);
    }

    let pinned = DirichletSet::from_hint_channels(&hue, &saturation);
    if pinned.is_empty() {
        return Err("marked image contains no color hints".into());
    }
    if !cli.quiet {
        eprintln!("[cli] {} hint pixels detected", pinned.len());
    }

    let job = ColorizeJob {
        intensity: PaddedField::from_values(grid, 2, &luma, GhostPolicy::Prolong),
        chroma_b,
        chroma_r,
        pinned,
        solver,
    };

    let workers = cli
        .workers
        .unwrap_or_else(|| num_cpus::get().saturating_sub(1));
    if !cli.quiet {
        eprintln!("[cli] spawning {} workers", workers);
    }
    let mut pool = WorkerPool::spawn(workers)?;
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        Verbosity::Verbose
    };
    let result = colorize::run(&pool, &job, verbosity);
    pool.shutdown()?;

    let mut output = RgbImage::new(width, height);
    for (idx, px) in output.pixels_mut().enumerate() {
        let (r, g, b) = color::ycbcr_to_rgb(
            luma[idx] * 255.0,
            result.chroma_b[idx] * 255.0,
            result.chroma_r[idx] * 255.0,
        );
        *px = image::Rgb([r.round() as u8, g.round() as u8, b.round() as u8]);
    }
    output.save(&cli.output)?;
    if !cli.quiet {
        eprintln!(
            "wrote {} (Cb iters={} converged={}, Cr iters={} converged={})",
            cli.output.display(),
            result.summary_b.iterations,
            result.summary_b.converged,
            result.summary_r.iterations,
            result.summary_r.converged
        );
    }
    Ok(())
}
