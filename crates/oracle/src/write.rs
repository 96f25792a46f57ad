use qram_circuit::{Circuit, Register};

/// Stores a classical value into one memory slot.
///
/// Every qubit of the slot is reset to `|0⟩` and the bits set in the value are then flipped, so
/// a value shorter than the slot is zero-padded. Resetting is a measurement, which is why this
/// is an initialization step and not a [`qram_circuit::Reversible`] operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Write {
    slot: Register,
    value: Vec<bool>,
}

impl Write {
    pub(crate) fn new(slot: Register, value: Vec<bool>) -> Self {
        debug_assert!(value.len() <= slot.len());
        Self { slot, value }
    }

    #[inline]
    pub fn slot(&self) -> &Register {
        &self.slot
    }

    #[inline]
    pub fn value(&self) -> &[bool] {
        &self.value
    }

    pub fn apply(&self, circuit: &mut Circuit) {
        for &qubit in self.slot.iter() {
            circuit.reset(qubit);
        }
        for (&qubit, &bit) in self.slot.iter().zip(&self.value) {
            if bit {
                circuit.x(qubit);
            }
        }
    }
}
