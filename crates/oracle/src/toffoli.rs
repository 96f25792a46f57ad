use qram_circuit::{Circuit, Conjugate, Gate, Qubit, Reversible};

use crate::Strategy;

/// `|a, b, c⟩ ↦ (-1)^{abc} |a, b, c⟩` written with CNOT, T and T† only.
///
/// The phase polynomial `a + b + c - (a⊕b) - (a⊕c) - (b⊕c) + (a⊕b⊕c) = 4abc` is
/// accumulated in multiples of π/4; every CNOT is undone, so the basis state is unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ccz {
    pub a: Qubit,
    pub b: Qubit,
    pub c: Qubit,
}

impl Reversible for Ccz {
    fn apply(&self, circuit: &mut Circuit) {
        let Ccz { a, b, c } = *self;
        circuit.cnot(b, c);
        circuit.tdg(c);
        circuit.cnot(a, c);
        circuit.t(c);
        circuit.cnot(b, c);
        circuit.tdg(c);
        circuit.cnot(a, c);
        circuit.t(b);
        circuit.t(c);
        circuit.cnot(a, b);
        circuit.t(a);
        circuit.tdg(b);
        circuit.cnot(a, b);
    }
}

/// A doubly-controlled NOT realized according to a [`Strategy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Toffoli {
    pub control1: Qubit,
    pub control2: Qubit,
    pub target: Qubit,
    pub strategy: Strategy,
}

impl Toffoli {
    pub const fn new(control1: Qubit, control2: Qubit, target: Qubit, strategy: Strategy) -> Self {
        Self { control1, control2, target, strategy }
    }

    fn conjugated_ccz(&self) -> Conjugate<Gate, Ccz> {
        Conjugate::new(
            Gate::h(self.target),
            Ccz { a: self.control1, b: self.control2, c: self.target },
        )
    }
}

impl Reversible for Toffoli {
    fn apply(&self, circuit: &mut Circuit) {
        match self.strategy {
            Strategy::Standard => circuit.ccnot(self.control1, self.control2, self.target),
            Strategy::TDepth => self.conjugated_ccz().apply(circuit),
        }
    }

    fn adjoint(&self, circuit: &mut Circuit) {
        self.apply(circuit)
    }

    fn controlled(&self, controls: &[Qubit], circuit: &mut Circuit) {
        match self.strategy {
            Strategy::Standard => circuit.push(
                Gate::ccnot(self.control1, self.control2, self.target).controlled(controls),
            ),
            Strategy::TDepth => self.conjugated_ccz().controlled(controls, circuit),
        }
    }

    fn controlled_adjoint(&self, controls: &[Qubit], circuit: &mut Circuit) {
        self.controlled(controls, circuit)
    }
}
