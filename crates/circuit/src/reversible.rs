use crate::{Circuit, Gate, Instruction, Qubit};

/// An operation with a well-defined inverse and a well-defined controlled form.
///
/// Implementors only have to provide [`Reversible::apply`]. The remaining methods derive the
/// inverse and controlled forms from the emitted instructions:
///
/// * the adjoint of a sequence is the reversed sequence of adjoints;
/// * the controlled form adds the controls to every gate, leaving allocation scopes untouched.
///
/// Operations with cheaper structure (e.g. [`Conjugate`]) override the defaults.
pub trait Reversible {
    fn apply(&self, circuit: &mut Circuit);

    fn adjoint(&self, circuit: &mut Circuit) {
        let body = circuit.record(|circuit| self.apply(circuit));
        circuit.extend(body.iter().rev().map(Instruction::adjoint));
    }

    fn controlled(&self, controls: &[Qubit], circuit: &mut Circuit) {
        let body = circuit.record(|circuit| self.apply(circuit));
        circuit.extend(body.iter().map(|instruction| instruction.controlled(controls)));
    }

    fn controlled_adjoint(&self, controls: &[Qubit], circuit: &mut Circuit) {
        let body = circuit.record(|circuit| self.adjoint(circuit));
        circuit.extend(body.iter().map(|instruction| instruction.controlled(controls)));
    }
}

impl Reversible for Gate {
    fn apply(&self, circuit: &mut Circuit) {
        circuit.push(self.clone());
    }

    fn adjoint(&self, circuit: &mut Circuit) {
        circuit.push(Gate::adjoint(self));
    }

    fn controlled(&self, controls: &[Qubit], circuit: &mut Circuit) {
        circuit.push(Gate::controlled(self, controls));
    }

    fn controlled_adjoint(&self, controls: &[Qubit], circuit: &mut Circuit) {
        circuit.push(Gate::adjoint(self).controlled(controls));
    }
}

impl<T: Reversible + ?Sized> Reversible for &T {
    fn apply(&self, circuit: &mut Circuit) {
        (**self).apply(circuit)
    }

    fn adjoint(&self, circuit: &mut Circuit) {
        (**self).adjoint(circuit)
    }

    fn controlled(&self, controls: &[Qubit], circuit: &mut Circuit) {
        (**self).controlled(controls, circuit)
    }

    fn controlled_adjoint(&self, controls: &[Qubit], circuit: &mut Circuit) {
        (**self).controlled_adjoint(controls, circuit)
    }
}

impl<T: Reversible + ?Sized> Reversible for Box<T> {
    fn apply(&self, circuit: &mut Circuit) {
        (**self).apply(circuit)
    }

    fn adjoint(&self, circuit: &mut Circuit) {
        (**self).adjoint(circuit)
    }

    fn controlled(&self, controls: &[Qubit], circuit: &mut Circuit) {
        (**self).controlled(controls, circuit)
    }

    fn controlled_adjoint(&self, controls: &[Qubit], circuit: &mut Circuit) {
        (**self).controlled_adjoint(controls, circuit)
    }
}

/// The inverse of an operation, as an operation.
#[derive(Clone, Debug)]
pub struct Adjoint<Op>(pub Op);

impl<Op: Reversible> Reversible for Adjoint<Op> {
    fn apply(&self, circuit: &mut Circuit) {
        self.0.adjoint(circuit)
    }

    fn adjoint(&self, circuit: &mut Circuit) {
        self.0.apply(circuit)
    }

    fn controlled(&self, controls: &[Qubit], circuit: &mut Circuit) {
        self.0.controlled_adjoint(controls, circuit)
    }

    fn controlled_adjoint(&self, controls: &[Qubit], circuit: &mut Circuit) {
        self.0.controlled(controls, circuit)
    }
}

/// An operation conditioned on a fixed set of control qubits.
#[derive(Clone, Debug)]
pub struct Controlled<Op> {
    pub controls: Vec<Qubit>,
    pub op: Op,
}

impl<Op> Controlled<Op> {
    pub const fn new(controls: Vec<Qubit>, op: Op) -> Self {
        Self { controls, op }
    }

    fn with_extra(&self, controls: &[Qubit]) -> Vec<Qubit> {
        let mut all = self.controls.clone();
        all.extend_from_slice(controls);
        all
    }
}

impl<Op: Reversible> Reversible for Controlled<Op> {
    fn apply(&self, circuit: &mut Circuit) {
        self.op.controlled(&self.controls, circuit)
    }

    fn adjoint(&self, circuit: &mut Circuit) {
        self.op.controlled_adjoint(&self.controls, circuit)
    }

    fn controlled(&self, controls: &[Qubit], circuit: &mut Circuit) {
        self.op.controlled(&self.with_extra(controls), circuit)
    }

    fn controlled_adjoint(&self, controls: &[Qubit], circuit: &mut Circuit) {
        self.op.controlled_adjoint(&self.with_extra(controls), circuit)
    }
}

/// Operations applied one after another.
#[derive(Clone, Debug, Default)]
pub struct Sequence<Op>(pub Vec<Op>);

impl<Op: Reversible> Reversible for Sequence<Op> {
    fn apply(&self, circuit: &mut Circuit) {
        for op in &self.0 {
            op.apply(circuit);
        }
    }

    fn adjoint(&self, circuit: &mut Circuit) {
        for op in self.0.iter().rev() {
            op.adjoint(circuit);
        }
    }

    fn controlled(&self, controls: &[Qubit], circuit: &mut Circuit) {
        for op in &self.0 {
            op.controlled(controls, circuit);
        }
    }

    fn controlled_adjoint(&self, controls: &[Qubit], circuit: &mut Circuit) {
        for op in self.0.iter().rev() {
            op.controlled_adjoint(controls, circuit);
        }
    }
}

impl<Op> FromIterator<Op> for Sequence<Op> {
    fn from_iter<T: IntoIterator<Item = Op>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The pattern `within; apply; within†`.
///
/// Since `within` is undone afterwards, only `apply` needs to be inverted or controlled:
/// `(W·A·W†)† = W·A†·W†` and `ctl(W·A·W†) = W·ctl(A)·W†`.
#[derive(Clone, Debug)]
pub struct Conjugate<W, A> {
    pub within: W,
    pub apply: A,
}

impl<W, A> Conjugate<W, A> {
    pub const fn new(within: W, apply: A) -> Self {
        Self { within, apply }
    }
}

impl<W: Reversible, A: Reversible> Reversible for Conjugate<W, A> {
    fn apply(&self, circuit: &mut Circuit) {
        self.within.apply(circuit);
        self.apply.apply(circuit);
        self.within.adjoint(circuit);
    }

    fn adjoint(&self, circuit: &mut Circuit) {
        self.within.apply(circuit);
        self.apply.adjoint(circuit);
        self.within.adjoint(circuit);
    }

    fn controlled(&self, controls: &[Qubit], circuit: &mut Circuit) {
        self.within.apply(circuit);
        self.apply.controlled(controls, circuit);
        self.within.adjoint(circuit);
    }

    fn controlled_adjoint(&self, controls: &[Qubit], circuit: &mut Circuit) {
        self.within.apply(circuit);
        self.apply.controlled_adjoint(controls, circuit);
        self.within.adjoint(circuit);
    }
}
