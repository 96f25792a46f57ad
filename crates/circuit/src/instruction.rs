use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Gate, Qubit, Register};

/// One step of a circuit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    /// A (possibly controlled) unitary gate.
    Gate(Gate),
    /// Brings fresh qubits into scope in the `|0⟩` state.
    Allocate(Register),
    /// Returns qubits to the pool. They must be back in `|0⟩`.
    Release(Register),
    /// Forces a qubit to `|0⟩`. Not reversible; only initialization code may emit it.
    Reset(Qubit),
}

impl Instruction {
    /// The instruction that undoes this one when the stream is replayed backwards.
    ///
    /// # Panics
    ///
    /// Panics on [`Instruction::Reset`], which has no inverse.
    #[must_use]
    #[track_caller]
    pub fn adjoint(&self) -> Self {
        match self {
            Instruction::Gate(gate) => Instruction::Gate(gate.adjoint()),
            Instruction::Allocate(register) => Instruction::Release(register.clone()),
            Instruction::Release(register) => Instruction::Allocate(register.clone()),
            Instruction::Reset(qubit) => panic!("reset of {} has no adjoint", qubit),
        }
    }

    /// Adds `controls` to gates. Allocation scopes stay unconditional.
    ///
    /// # Panics
    ///
    /// Panics on [`Instruction::Reset`], which cannot be controlled.
    #[must_use]
    #[track_caller]
    pub fn controlled(&self, controls: &[Qubit]) -> Self {
        match self {
            Instruction::Gate(gate) => Instruction::Gate(gate.controlled(controls)),
            Instruction::Allocate(_) | Instruction::Release(_) => self.clone(),
            Instruction::Reset(qubit) => panic!("reset of {} cannot be controlled", qubit),
        }
    }

    #[inline]
    pub fn as_gate(&self) -> Option<&Gate> {
        match self {
            Instruction::Gate(gate) => Some(gate),
            _ => None,
        }
    }
}

impl From<Gate> for Instruction {
    fn from(gate: Gate) -> Self {
        Instruction::Gate(gate)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Gate(gate) => write!(f, "{}", gate),
            Instruction::Allocate(register) => write!(f, "alloc {}", register),
            Instruction::Release(register) => write!(f, "release {}", register),
            Instruction::Reset(qubit) => write!(f, "reset {}", qubit),
        }
    }
}
