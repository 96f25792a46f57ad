//! Bucket-brigade QRAM: a one-hot address decoder and the read/write protocols built on it.
//!
//! A read borrows an auxiliary register of `2^n` qubits, fans the `n`-qubit address out into a
//! one-hot selector ([`AddressFanout`]), copies the selected memory field into the target
//! ([`ReadoutMemory`]), and uncomputes the selector before returning the auxiliary qubits.

mod config;
mod error;
mod fanout;
mod oracle;
mod read;
mod readout;
mod toffoli;
mod write;

#[cfg(test)]
mod testing;

pub use config::*;
pub use error::*;
pub use fanout::*;
pub use oracle::*;
pub use read::*;
pub use readout::*;
pub use toffoli::*;
pub use write::*;
