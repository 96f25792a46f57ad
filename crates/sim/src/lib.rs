//! Backends that execute the instruction streams emitted by `qram-circuit`.
//!
//! [`SparseSimulator`] tracks the non-zero amplitudes of the state vector, which keeps
//! memory-access circuits cheap to simulate: they only create as many branches as there are
//! addresses in superposition. [`ResourceEstimator`] never touches a state and just counts.

mod backend;
mod basis;
mod error;
mod estimator;
mod sparse;

pub use backend::*;
pub use basis::*;
pub use error::*;
pub use estimator::*;
pub use sparse::*;
