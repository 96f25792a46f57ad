//! Reversible circuit primitives: qubits, registers, gates, and the instruction stream that
//! operations emit into.
//!
//! Operations never execute anything. They append [`Instruction`]s to a [`Circuit`], and a
//! backend decides what those instructions mean. The [`Reversible`] trait is the contract every
//! composable operation fulfils: it can be applied, run backwards, and conditioned on extra
//! control qubits.

mod circuit;
mod gate;
mod instruction;
mod qubit;
mod reversible;

pub use circuit::*;
pub use gate::*;
pub use instruction::*;
pub use qubit::*;
pub use reversible::*;
