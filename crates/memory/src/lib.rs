//! The classical description of a sparse quantum memory.

mod bank;
mod cell;

pub use bank::*;
pub use cell::*;
