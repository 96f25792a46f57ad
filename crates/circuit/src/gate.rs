use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::Qubit;

/// The single-qubit unitaries the circuit language is built from.
///
/// Every gate may carry any number of controls, so `X` with one control is a CNOT and `X` with
/// two controls is a Toffoli.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum GateKind {
    X,
    Z,
    H,
    S,
    Sdg,
    T,
    Tdg,
}

impl GateKind {
    #[must_use]
    pub const fn adjoint(self) -> Self {
        match self {
            GateKind::S => GateKind::Sdg,
            GateKind::Sdg => GateKind::S,
            GateKind::T => GateKind::Tdg,
            GateKind::Tdg => GateKind::T,
            kind => kind,
        }
    }

    /// Whether the gate is diagonal in the computational basis.
    #[inline]
    pub const fn is_diagonal(self) -> bool {
        !matches!(self, GateKind::X | GateKind::H)
    }

    /// Whether the gate is a T or T† rotation.
    #[inline]
    pub const fn is_t(self) -> bool {
        matches!(self, GateKind::T | GateKind::Tdg)
    }
}

/// A single-qubit unitary applied to `target`, conditioned on every qubit of `controls` being set.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gate {
    kind: GateKind,
    target: Qubit,
    controls: Vec<Qubit>,
}

impl Gate {
    #[inline]
    pub const fn new(kind: GateKind, target: Qubit) -> Self {
        Self { kind, target, controls: Vec::new() }
    }

    /// A gate with the given controls.
    ///
    /// # Panics
    ///
    /// Panics if the target is also a control or a control is repeated.
    #[track_caller]
    pub fn with_controls(kind: GateKind, controls: Vec<Qubit>, target: Qubit) -> Self {
        assert!(!controls.contains(&target), "{} cannot control itself", target);
        assert!(controls.iter().all_unique(), "repeated control in {:?}", controls);
        Self { kind, target, controls }
    }

    pub const fn x(target: Qubit) -> Self {
        Self::new(GateKind::X, target)
    }

    pub const fn h(target: Qubit) -> Self {
        Self::new(GateKind::H, target)
    }

    pub const fn t(target: Qubit) -> Self {
        Self::new(GateKind::T, target)
    }

    pub const fn tdg(target: Qubit) -> Self {
        Self::new(GateKind::Tdg, target)
    }

    #[track_caller]
    pub fn cnot(control: Qubit, target: Qubit) -> Self {
        Self::with_controls(GateKind::X, vec![control], target)
    }

    #[track_caller]
    pub fn ccnot(control1: Qubit, control2: Qubit, target: Qubit) -> Self {
        Self::with_controls(GateKind::X, vec![control1, control2], target)
    }

    #[inline]
    pub const fn kind(&self) -> GateKind {
        self.kind
    }

    #[inline]
    pub const fn target(&self) -> Qubit {
        self.target
    }

    #[inline]
    pub fn controls(&self) -> &[Qubit] {
        &self.controls
    }

    /// All qubits the gate touches, controls first.
    pub fn qubits(&self) -> impl Iterator<Item = Qubit> + '_ {
        self.controls.iter().copied().chain(std::iter::once(self.target))
    }

    #[must_use]
    pub fn adjoint(&self) -> Self {
        Self { kind: self.kind.adjoint(), target: self.target, controls: self.controls.clone() }
    }

    /// The same gate with `controls` appended to its control set.
    #[must_use]
    #[track_caller]
    pub fn controlled(&self, controls: &[Qubit]) -> Self {
        let mut all = self.controls.clone();
        all.extend_from_slice(controls);
        Self::with_controls(self.kind, all, self.target)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in &self.controls {
            write!(f, "c")?;
        }
        write!(f, "{}", self.kind)?;
        for qubit in self.qubits() {
            write!(f, " {}", qubit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_adjoint_is_involution() {
        for kind in GateKind::iter() {
            assert_eq!(kind.adjoint().adjoint(), kind);
        }
        assert_eq!(GateKind::T.adjoint(), GateKind::Tdg);
        assert_eq!(GateKind::H.adjoint(), GateKind::H);
    }

    #[test]
    fn test_controlled_gate() {
        let gate = Gate::cnot(Qubit(0), Qubit(2)).controlled(&[Qubit(1)]);
        assert_eq!(gate.controls(), &[Qubit(0), Qubit(1)]);
        assert_eq!(gate.target(), Qubit(2));
        assert_eq!(gate.to_string(), "ccx q0 q1 q2");
    }

    #[test]
    #[should_panic]
    fn test_control_on_target() {
        let _ = Gate::x(Qubit(3)).controlled(&[Qubit(3)]);
    }

    #[test]
    fn test_gate_serialize_deserialize() {
        let gate = Gate::ccnot(Qubit(0), Qubit(1), Qubit(2));
        let serialized = serde_json::to_string(&gate).unwrap();
        let deserialized: Gate = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, gate);
    }
}
