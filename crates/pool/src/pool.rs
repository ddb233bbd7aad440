//! Message-passing worker pool for distributed matrix-vector products.
//!
//! The pool owns `n_workers` threads; the calling thread acts as the
//! coordinator and takes part in the computation itself, so a pool of
//! `n_workers` has `n_workers + 1` participants. Each product
//! partitions the matrix rows into contiguous blocks, ships one block
//! per worker together with the full input vector, computes the
//! coordinator's own block while the workers run, and gathers the
//! partial results in ascending rank order.
//!
//! Gathering blocks indefinitely on each worker's reply channel. A
//! worker that never answers stalls the product; there is no timeout
//! or watchdog.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::trace;
use tint2d_core::engine::MatVecEngine;
use tint2d_core::sparse::CsrMatrix;

use crate::protocol::{PoolError, Reply, Task};

struct WorkerHandle {
    rank: usize,
    tasks: Sender<Task>,
    replies: Receiver<Reply>,
    thread: Option<JoinHandle<()>>,
}

pub struct WorkerPool {
    workers: Vec<WorkerHandle>,
    stopped: bool,
}

impl WorkerPool {
    /// Spawn `n_workers` worker threads. Ranks start at 1; rank 0 is
    /// the coordinator.
    pub fn spawn(n_workers: usize) -> Result<Self, PoolError> {
        let mut workers = Vec::with_capacity(n_workers);
        for rank in 1..=n_workers {
            let (task_tx, task_rx) = unbounded::<Task>();
            let (reply_tx, reply_rx) = unbounded::<Reply>();
            let thread = thread::Builder::new()
                .name(format!("matvec-worker-{rank}"))
                .spawn(move || worker_loop(rank, task_rx, reply_tx))?;
            workers.push(WorkerHandle {
                rank,
                tasks: task_tx,
                replies: reply_rx,
                thread: Some(thread),
            });
        }
        Ok(Self {
            workers,
            stopped: false,
        })
    }

    /// Worker threads plus the coordinator.
    pub fn participants(&self) -> usize {
        self.workers.len() + 1
    }

    /// Ask every worker to exit and join its thread. Safe to call more
    /// than once; later calls are no-ops.
    pub fn shutdown(&mut self) -> Result<(), PoolError> {
        if self.stopped {
            return Ok(());
        }
        self.stopped = true;
        for worker in &self.workers {
            if worker.tasks.send(Task::Stop).is_err() {
                return Err(PoolError::Disconnected { rank: worker.rank });
            }
        }
        for worker in &mut self.workers {
            match worker.replies.recv() {
                Ok(Reply::ExitAck { rank }) if rank == worker.rank => {}
                Ok(_) => return Err(PoolError::Protocol { rank: worker.rank }),
                Err(_) => return Err(PoolError::Disconnected { rank: worker.rank }),
            }
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    return Err(PoolError::Disconnected { rank: worker.rank });
                }
            }
        }
        Ok(())
    }
}

impl MatVecEngine for WorkerPool {
    fn apply(&self, matrix: &CsrMatrix, x: &[f64]) -> Vec<f64> {
        assert!(!self.stopped, "pool already shut down");
        let n = matrix.nrows();
        let parts = self.participants();

        for worker in &self.workers {
            let (start, end) = partition(n, parts, worker.rank);
            trace!("dispatch rows {start}..{end} to worker {}", worker.rank);
            let task = Task::MatVec {
                rows: matrix.row_block(start, end),
                x: x.to_vec(),
            };
            if worker.tasks.send(task).is_err() {
                panic!("worker {} disconnected before answering", worker.rank);
            }
        }

        // The coordinator's own block overlaps with the workers' runs.
        let (start, end) = partition(n, parts, 0);
        let mut y = matrix.row_block(start, end).mul_vec(x);

        for worker in &self.workers {
            match worker.replies.recv() {
                Ok(Reply::Partial { rank, y: partial }) if rank == worker.rank => {
                    y.extend(partial);
                }
                Ok(reply) => panic!(
                    "worker {} sent an unexpected reply: {reply:?}",
                    worker.rank
                ),
                Err(_) => panic!("worker {} disconnected before answering", worker.rank),
            }
        }
        debug_assert_eq!(y.len(), n);
        y
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

fn worker_loop(rank: usize, tasks: Receiver<Task>, replies: Sender<Reply>) {
    trace!("worker {rank} up");
    loop {
        match tasks.recv() {
            Ok(Task::MatVec { rows, x }) => {
                let y = rows.mul_vec(&x);
                if replies.send(Reply::Partial { rank, y }).is_err() {
                    break;
                }
            }
            Ok(Task::Stop) => {
                let _ = replies.send(Reply::ExitAck { rank });
                break;
            }
            // Coordinator gone; nothing left to do.
            Err(_) => break,
        }
    }
    trace!("worker {rank} down");
}

/// Contiguous row range owned by `rank` when `n` rows are split over
/// `parts` participants. All participants take `ceil(n / parts)` rows
/// except the last, which takes `floor(n / parts)`; every range is
/// clamped to `n`, so trailing ranks may come up empty.
pub fn partition(n: usize, parts: usize, rank: usize) -> (usize, usize) {
    assert!(parts > 0, "partition needs at least one participant");
    assert!(rank < parts, "rank {rank} out of {parts} participants");
    let block = n.div_ceil(parts);
    let start = (block * rank).min(n);
    let span = if rank + 1 == parts { n / parts } else { block };
    let end = (start + span).min(n);
    (start, end)
}
