//! Core numerics for hint-propagating image colorization.
//!
//! Builds a sparse affinity matrix from local intensity statistics,
//! pins hinted pixels with Dirichlet constraints, and solves one
//! linear system per chrominance channel through a pluggable
//! matrix-vector engine.

pub mod assembler;
pub mod colorize;
pub mod dirichlet;
pub mod engine;
pub mod field;
pub mod grid;
pub mod solver;
pub mod sparse;
pub mod stats;
pub mod weights;

#[cfg(test)]
mod _tests_assembler;
#[cfg(test)]
mod _tests_field;
#[cfg(test)]
mod _tests_weights;
