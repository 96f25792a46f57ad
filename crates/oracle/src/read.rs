use qram_circuit::{
    AddressRegister, Circuit, Conjugate, Gate, MemoryRegister, Qubit, Register, Reversible,
    Sequence,
};

use crate::{AddressFanout, ReadoutMemory, Strategy};

/// XORs the memory field selected by `address` into `target`.
///
/// Every form borrows a fresh `2^n`-qubit auxiliary register, sets its token, decodes the
/// address into it, runs the readout and undoes the decoding before handing the register back.
/// Only the readout is inverted or controlled; the borrow and the decoding stay unconditional.
///
/// Created through [`crate::Qram::read`] or [`crate::Qrom::read`], which validate the registers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Read {
    address: AddressRegister,
    memory: MemoryRegister,
    target: Register,
    strategy: Strategy,
}

impl Read {
    pub(crate) const fn new(
        address: AddressRegister,
        memory: MemoryRegister,
        target: Register,
        strategy: Strategy,
    ) -> Self {
        Self { address, memory, target, strategy }
    }

    #[inline]
    pub fn address(&self) -> &AddressRegister {
        &self.address
    }

    #[inline]
    pub fn target(&self) -> &Register {
        &self.target
    }

    #[inline]
    fn aux_width(&self) -> usize {
        // The address width was checked against the oracle's address size, which fits.
        1 << self.address.len()
    }

    fn body(&self, aux: &Register) -> Conjugate<Sequence<Box<dyn Reversible>>, ReadoutMemory> {
        let fanout = AddressFanout::new_unchecked(self.address.clone(), aux.clone(), self.strategy);
        let within: Sequence<Box<dyn Reversible>> =
            Sequence(vec![Box::new(Gate::x(aux[0])), Box::new(fanout)]);
        let readout = ReadoutMemory::new_unchecked(
            aux.clone(),
            self.memory.clone(),
            self.target.clone(),
            self.strategy,
        );
        Conjugate::new(within, readout)
    }
}

impl Reversible for Read {
    fn apply(&self, circuit: &mut Circuit) {
        circuit.scoped(self.aux_width(), |circuit, aux| self.body(aux).apply(circuit))
    }

    fn adjoint(&self, circuit: &mut Circuit) {
        circuit.scoped(self.aux_width(), |circuit, aux| self.body(aux).adjoint(circuit))
    }

    fn controlled(&self, controls: &[Qubit], circuit: &mut Circuit) {
        circuit.scoped(self.aux_width(), |circuit, aux| {
            self.body(aux).controlled(controls, circuit)
        })
    }

    fn controlled_adjoint(&self, controls: &[Qubit], circuit: &mut Circuit) {
        circuit.scoped(self.aux_width(), |circuit, aux| {
            self.body(aux).controlled_adjoint(controls, circuit)
        })
    }
}

#[cfg(test)]
mod tests {
    use qram_circuit::Instruction;

    use super::*;
    use crate::testing::{prepare, simulate};

    /// A 2-bit address over four 1-bit fields holding `0, 1, 1, 0`.
    fn setup(circuit: &mut Circuit) -> Read {
        let memory = MemoryRegister::new(circuit.allocate(4));
        prepare(circuit, &memory, 0b0110);
        let address = AddressRegister::new(circuit.allocate(2));
        let target = circuit.allocate(1);
        Read::new(address, memory, target, Strategy::Standard)
    }

    #[test]
    fn test_aux_is_scoped() {
        let mut circuit = Circuit::new();
        let read = setup(&mut circuit);
        let start = circuit.len();
        read.apply(&mut circuit);
        read.apply(&mut circuit);

        // The second read reuses the qubits the first one returned.
        assert_eq!(circuit.num_qubits(), 7 + 4);
        let allocations: Vec<_> = circuit.instructions()[start..]
            .iter()
            .filter_map(|instruction| match instruction {
                Instruction::Allocate(register) => Some(register.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(allocations.len(), 2);
        assert_eq!(allocations[0], allocations[1]);
        for qubit in allocations[0].iter() {
            assert!(!circuit.is_allocated(*qubit));
        }
    }

    #[test]
    fn test_read_each_address() {
        for address in 0..4u64 {
            let mut circuit = Circuit::new();
            let read = setup(&mut circuit);
            prepare(&mut circuit, read.address(), address);
            read.apply(&mut circuit);

            let sim = simulate(&circuit);
            let expected = address == 1 || address == 2;
            assert_eq!(sim.classical_value(read.target()).unwrap(), Some(vec![expected]));
        }
    }

    #[test]
    fn test_controlled_adjoint_undoes_controlled() {
        let mut circuit = Circuit::new();
        let read = setup(&mut circuit);
        let control = circuit.allocate(1);
        prepare(&mut circuit, read.address(), 2);
        circuit.x(control[0]);

        read.controlled(&[control[0]], &mut circuit);
        let sim = simulate(&circuit);
        assert_eq!(sim.classical_value(read.target()).unwrap(), Some(vec![true]));

        read.controlled_adjoint(&[control[0]], &mut circuit);
        let sim = simulate(&circuit);
        assert_eq!(sim.classical_value(read.target()).unwrap(), Some(vec![false]));
    }

    #[test]
    fn test_only_readout_is_controlled() {
        let mut circuit = Circuit::new();
        let read = setup(&mut circuit);
        let control = circuit.allocate(1);
        let start = circuit.len();
        read.controlled(&[control[0]], &mut circuit);

        // Token flips and decoder CNOTs keep their own arity; readout Toffolis gain a control.
        let gates: Vec<&Gate> =
            circuit.instructions()[start..].iter().filter_map(Instruction::as_gate).collect();
        let controlled = gates.iter().filter(|gate| gate.controls().contains(&control[0]));
        assert_eq!(controlled.count(), 4);
        assert!(gates.iter().any(|gate| gate.controls().is_empty()));
    }
}
