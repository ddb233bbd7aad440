//! Thread-backed worker pool that distributes sparse matrix-vector
//! products over message-passing channels. Plugs into the solver
//! through the `MatVecEngine` trait from `tint2d-core`.

pub mod pool;
pub mod protocol;

pub use pool::{partition, WorkerPool};
pub use protocol::{PoolError, Reply, Task};
