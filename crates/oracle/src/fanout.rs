use qram_circuit::{AddressRegister, Circuit, Gate, Qubit, Register, Reversible, Sequence};
use qram_utils::checked_pow2;

use crate::{OracleError, Strategy, Toffoli};

/// Decodes an `n`-qubit address into a one-hot selector over `2^n` auxiliary qubits.
///
/// The auxiliary register must start with only qubit `0` set (the token). Afterwards the token
/// sits at the index encoded by the address, entangled with it. Address bits are consumed from
/// least to most significant; after processing bit `idx` the token is correct on the first
/// `2^(idx+1)` auxiliary qubits:
///
/// ```text
/// idx = 0:  cnot(addr[0] -> aux[1]); cnot(aux[1] -> aux[0])
/// idx > 0:  for m in 0..2^idx:
///               toffoli(addr[idx], aux[m] -> aux[m + 2^idx])
///               cnot(aux[m + 2^idx] -> aux[m])
/// ```
///
/// With an empty address the auxiliary register has a single qubit and nothing is emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressFanout {
    address: AddressRegister,
    aux: Register,
    strategy: Strategy,
}

impl AddressFanout {
    /// # Errors
    ///
    /// Fails if `2^address.len()` overflows a `usize`, or if `aux` is not that many qubits wide or
    /// shares qubits with `address`.
    pub fn new(
        address: AddressRegister,
        aux: Register,
        strategy: Strategy,
    ) -> Result<Self, OracleError> {
        let expected = checked_pow2(address.len())
            .ok_or(OracleError::AddressSpaceTooLarge(address.len()))?;
        if aux.len() != expected {
            return Err(OracleError::AuxiliaryWidthMismatch { expected, got: aux.len() });
        }
        if !address.is_unique() || !aux.is_unique() || !address.is_disjoint(&aux) {
            return Err(OracleError::AliasedRegisters);
        }
        Ok(Self::new_unchecked(address, aux, strategy))
    }

    pub(crate) const fn new_unchecked(
        address: AddressRegister,
        aux: Register,
        strategy: Strategy,
    ) -> Self {
        Self { address, aux, strategy }
    }

    #[inline]
    pub fn address(&self) -> &AddressRegister {
        &self.address
    }

    #[inline]
    pub fn aux(&self) -> &Register {
        &self.aux
    }

    fn steps(&self) -> Sequence<Box<dyn Reversible>> {
        let aux = &self.aux;
        let mut steps: Vec<Box<dyn Reversible>> = Vec::new();
        for (idx, &bit) in self.address.iter().enumerate() {
            if idx == 0 {
                steps.push(Box::new(Gate::cnot(bit, aux[1])));
                steps.push(Box::new(Gate::cnot(aux[1], aux[0])));
                continue;
            }
            let offset = 1 << idx;
            for m in 0..offset {
                steps.push(Box::new(Toffoli::new(bit, aux[m], aux[m + offset], self.strategy)));
                steps.push(Box::new(Gate::cnot(aux[m + offset], aux[m])));
            }
        }
        Sequence(steps)
    }
}

impl Reversible for AddressFanout {
    fn apply(&self, circuit: &mut Circuit) {
        self.steps().apply(circuit)
    }

    fn adjoint(&self, circuit: &mut Circuit) {
        self.steps().adjoint(circuit)
    }

    fn controlled(&self, controls: &[Qubit], circuit: &mut Circuit) {
        self.steps().controlled(controls, circuit)
    }

    fn controlled_adjoint(&self, controls: &[Qubit], circuit: &mut Circuit) {
        self.steps().controlled_adjoint(controls, circuit)
    }
}
