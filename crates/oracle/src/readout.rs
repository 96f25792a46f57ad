use qram_circuit::{Circuit, MemoryRegister, Qubit, Register, Reversible, Sequence};

use crate::{OracleError, Strategy, Toffoli};

/// Copies the memory field selected by a one-hot auxiliary register into a target register.
///
/// The memory is split into `aux.len()` consecutive fields of `target.len()` qubits. Target bit
/// `j` is flipped once for every `i` with both `aux[i]` and `field_i[j]` set; with a one-hot
/// `aux` that leaves the target XOR-ed with exactly the selected field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadoutMemory {
    aux: Register,
    memory: MemoryRegister,
    target: Register,
    strategy: Strategy,
}

impl ReadoutMemory {
    /// # Errors
    ///
    /// Fails if `memory` is not `aux.len() * target.len()` qubits wide or any two registers
    /// share qubits.
    pub fn new(
        aux: Register,
        memory: MemoryRegister,
        target: Register,
        strategy: Strategy,
    ) -> Result<Self, OracleError> {
        let expected = aux.len() * target.len();
        if memory.len() != expected {
            return Err(OracleError::MemoryWidthMismatch { expected, got: memory.len() });
        }
        let registers = [&aux, memory.as_register(), &target];
        let aliased = registers.iter().any(|r| !r.is_unique())
            || !aux.is_disjoint(&memory)
            || !aux.is_disjoint(&target)
            || !memory.is_disjoint(&target);
        if aliased {
            return Err(OracleError::AliasedRegisters);
        }
        Ok(Self::new_unchecked(aux, memory, target, strategy))
    }

    pub(crate) const fn new_unchecked(
        aux: Register,
        memory: MemoryRegister,
        target: Register,
        strategy: Strategy,
    ) -> Self {
        Self { aux, memory, target, strategy }
    }

    fn steps(&self) -> Sequence<Toffoli> {
        self.aux
            .iter()
            .zip(self.memory.fields(self.target.len()))
            .flat_map(|(&selector, field)| {
                field
                    .into_qubits()
                    .into_iter()
                    .zip(self.target.iter())
                    .map(move |(bit, &target)| Toffoli::new(selector, bit, target, self.strategy))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

impl Reversible for ReadoutMemory {
    fn apply(&self, circuit: &mut Circuit) {
        self.steps().apply(circuit)
    }

    /// The readout only XORs into the target, so it is its own inverse.
    fn adjoint(&self, circuit: &mut Circuit) {
        self.apply(circuit)
    }

    fn controlled(&self, controls: &[Qubit], circuit: &mut Circuit) {
        self.steps().controlled(controls, circuit)
    }

    fn controlled_adjoint(&self, controls: &[Qubit], circuit: &mut Circuit) {
        self.controlled(controls, circuit)
    }
}
