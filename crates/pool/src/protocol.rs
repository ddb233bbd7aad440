//! Typed message vocabulary between the coordinator and its workers.
//!
//! Work requests and shutdown travel in the same task queue so a
//! worker observes them in submission order. Replies carry the sender
//! rank; the coordinator gathers them in strictly ascending rank.

use thiserror::Error;
use tint2d_core::sparse::CsrMatrix;

/// Coordinator to worker.
#[derive(Debug, Clone)]
pub enum Task {
    /// Multiply a contiguous row block against the full input vector.
    /// Both travel by value; workers share no state with the
    /// coordinator.
    MatVec { rows: CsrMatrix, x: Vec<f64> },
    /// Cooperative shutdown request.
    Stop,
}

/// Worker to coordinator.
#[derive(Debug, Clone)]
pub enum Reply {
    /// The product of one row block.
    Partial { rank: usize, y: Vec<f64> },
    /// Acknowledgement that the worker observed `Stop` and is exiting.
    ExitAck { rank: usize },
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("worker {rank} disconnected before answering")]
    Disconnected { rank: usize },
    #[error("worker {rank} sent an unexpected reply")]
    Protocol { rank: usize },
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}
