use qram_circuit::{Circuit, Register};
use qram_sim::{Backend, SparseSimulator};

/// Flips the qubits of `register` so it holds `value`, least significant bit first.
pub fn prepare(circuit: &mut Circuit, register: &Register, value: u64) {
    for (i, &qubit) in register.iter().enumerate() {
        if i < 64 && (value >> i) & 1 == 1 {
            circuit.x(qubit);
        }
    }
}

/// Puts every qubit of `register` into `|+⟩`.
pub fn superpose(circuit: &mut Circuit, register: &Register) {
    for &qubit in register.iter() {
        circuit.h(qubit);
    }
}

pub fn simulate(circuit: &Circuit) -> SparseSimulator {
    let mut sim = SparseSimulator::default();
    sim.run(circuit).unwrap();
    sim
}

/// The one-hot pattern selecting `index` out of `width` positions.
pub fn one_hot(index: usize, width: usize) -> Vec<bool> {
    (0..width).map(|i| i == index).collect()
}
