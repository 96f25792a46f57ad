use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Gate, GateKind, Instruction, Qubit, Register};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    #[error("qubit {0} is not allocated")]
    NotAllocated(Qubit),
    #[error("qubit {0} appears twice in the released register")]
    DuplicateRelease(Qubit),
}

/// An append-only stream of instructions together with the allocator for its qubit space.
///
/// Qubits are handed out lowest-index first, and released qubits are reused before the qubit
/// space grows, so the same sequence of calls always produces the same circuit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    instructions: Vec<Instruction>,
    num_qubits: usize,
    free: BTreeSet<Qubit>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    #[inline]
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    /// The size of the qubit space, i.e. the highest number of qubits ever live at once.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Returns `true` if `qubit` is currently handed out.
    pub fn is_allocated(&self, qubit: Qubit) -> bool {
        qubit.index() < self.num_qubits && !self.free.contains(&qubit)
    }

    #[inline]
    pub fn push(&mut self, instruction: impl Into<Instruction>) {
        self.instructions.push(instruction.into());
    }

    /// Allocates `width` qubits in `|0⟩` and records the allocation.
    pub fn allocate(&mut self, width: usize) -> Register {
        let mut qubits = Vec::with_capacity(width);
        while qubits.len() < width {
            match self.free.pop_first() {
                Some(qubit) => qubits.push(qubit),
                None => break,
            }
        }
        let fresh = width - qubits.len();
        qubits.extend((self.num_qubits..self.num_qubits + fresh).map(Qubit));
        self.num_qubits += fresh;

        let register = Register::new(qubits);
        self.instructions.push(Instruction::Allocate(register.clone()));
        register
    }

    /// Returns `register` to the pool and records the release.
    ///
    /// The qubits must be back in `|0⟩`; backends enforce this when they execute the release.
    pub fn release(&mut self, register: Register) -> Result<(), CircuitError> {
        let mut seen = BTreeSet::new();
        for &qubit in register.iter() {
            if !self.is_allocated(qubit) {
                return Err(CircuitError::NotAllocated(qubit));
            }
            if !seen.insert(qubit) {
                return Err(CircuitError::DuplicateRelease(qubit));
            }
        }
        self.free.extend(seen);
        self.instructions.push(Instruction::Release(register));
        Ok(())
    }

    /// Borrows `width` fresh qubits for the duration of `body` and releases them afterwards.
    ///
    /// `body` must leave the register in `|0⟩` and must not release it itself.
    pub fn scoped<R>(&mut self, width: usize, body: impl FnOnce(&mut Self, &Register) -> R) -> R {
        let register = self.allocate(width);
        let result = body(self, &register);
        self.free.extend(register.iter().copied());
        self.instructions.push(Instruction::Release(register));
        result
    }

    /// Runs `body` against this circuit and returns the instructions it emitted instead of
    /// keeping them.
    ///
    /// The allocator is shared with `body`, so qubits it borrows get the same indices they would
    /// get if `body` had been applied directly.
    pub fn record(&mut self, body: impl FnOnce(&mut Self)) -> Vec<Instruction> {
        let outer = std::mem::take(&mut self.instructions);
        body(self);
        std::mem::replace(&mut self.instructions, outer)
    }

    pub fn gate(&mut self, kind: GateKind, target: Qubit) {
        self.push(Gate::new(kind, target));
    }

    pub fn x(&mut self, target: Qubit) {
        self.push(Gate::x(target));
    }

    pub fn h(&mut self, target: Qubit) {
        self.push(Gate::h(target));
    }

    pub fn t(&mut self, target: Qubit) {
        self.push(Gate::t(target));
    }

    pub fn tdg(&mut self, target: Qubit) {
        self.push(Gate::tdg(target));
    }

    #[track_caller]
    pub fn cnot(&mut self, control: Qubit, target: Qubit) {
        self.push(Gate::cnot(control, target));
    }

    #[track_caller]
    pub fn ccnot(&mut self, control1: Qubit, control2: Qubit, target: Qubit) {
        self.push(Gate::ccnot(control1, control2, target));
    }

    pub fn reset(&mut self, qubit: Qubit) {
        self.push(Instruction::Reset(qubit));
    }
}

impl Extend<Instruction> for Circuit {
    fn extend<T: IntoIterator<Item = Instruction>>(&mut self, iter: T) {
        self.instructions.extend(iter);
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            writeln!(f, "{}", instruction)?;
        }
        Ok(())
    }
}
