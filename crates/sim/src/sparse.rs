use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use hashbrown::HashMap;
use num_complex::Complex64;
use qram_circuit::{Gate, GateKind, Instruction, Qubit, Register};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{Backend, BasisState, SimError};

/// Tuning knobs for [`SparseSimulator`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Seed of the generator used to sample measurement outcomes.
    pub seed: u64,
    /// Upper bound on the number of non-zero amplitudes.
    pub max_amplitudes: usize,
    /// Amplitudes with squared magnitude below this are dropped.
    pub tolerance: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self { seed: 0, max_amplitudes: 1 << 22, tolerance: 1e-12 }
    }
}

/// A state-vector simulator storing only the basis states with non-zero amplitude.
///
/// Permutation gates (controlled X) and diagonal gates never change the number of stored
/// amplitudes; only Hadamards can branch the state.
#[derive(Clone, Debug)]
pub struct SparseSimulator {
    config: SimulatorConfig,
    num_qubits: usize,
    live: Vec<bool>,
    state: HashMap<BasisState, Complex64>,
    rng: StdRng,
}

impl Default for SparseSimulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

impl SparseSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        let mut state = HashMap::new();
        state.insert(BasisState::zero(0), Complex64::new(1.0, 0.0));
        Self {
            config,
            num_qubits: 0,
            live: Vec::new(),
            state,
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(SimulatorConfig { seed, ..SimulatorConfig::default() })
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    #[inline]
    pub fn num_amplitudes(&self) -> usize {
        self.state.len()
    }

    #[inline]
    pub fn is_live(&self, qubit: Qubit) -> bool {
        self.live.get(qubit.index()).copied().unwrap_or(false)
    }

    /// The non-zero amplitudes of the current state.
    pub fn amplitudes(&self) -> impl Iterator<Item = (&BasisState, &Complex64)> {
        self.state.iter()
    }

    pub fn amplitude(&self, basis: &BasisState) -> Complex64 {
        self.state.get(basis).copied().unwrap_or_default()
    }

    pub fn norm_sqr(&self) -> f64 {
        self.state.values().map(Complex64::norm_sqr).sum()
    }

    /// `⟨self|other⟩`, treating both states as living in the larger qubit space.
    pub fn inner_product(&self, other: &SparseSimulator) -> Complex64 {
        let num_qubits = self.num_qubits.max(other.num_qubits);
        let grown = |basis: &BasisState| {
            let mut basis = basis.clone();
            basis.grow(num_qubits);
            basis
        };
        let other: HashMap<_, _> = other.state.iter().map(|(b, a)| (grown(b), *a)).collect();
        self.state
            .iter()
            .filter_map(|(basis, amp)| other.get(&grown(basis)).map(|o| amp.conj() * o))
            .sum()
    }

    /// The probability of observing `qubit` in `|1⟩`.
    pub fn probability_of_one(&self, qubit: Qubit) -> Result<f64, SimError> {
        self.check_range(qubit)?;
        Ok(self.state.iter().filter(|(basis, _)| basis.get(qubit)).map(|(_, a)| a.norm_sqr()).sum())
    }

    /// The value of `register` if it is the same in every branch of the state.
    pub fn classical_value(&self, register: &Register) -> Result<Option<Vec<bool>>, SimError> {
        for &qubit in register.iter() {
            self.check_range(qubit)?;
        }
        let mut values = self.state.keys().map(|basis| basis.bits_of(register));
        let first = values.next();
        Ok(match first {
            Some(first) if values.all(|value| value == first) => Some(first),
            _ => None,
        })
    }

    /// Measures `qubit` in the computational basis, collapsing the state.
    pub fn measure(&mut self, qubit: Qubit) -> Result<bool, SimError> {
        self.check_live(qubit)?;
        let p1 = self.probability_of_one(qubit)?;
        let outcome = if p1 <= self.config.tolerance {
            false
        } else if p1 >= 1.0 - self.config.tolerance {
            true
        } else {
            let outcome = self.rng.gen_bool(p1.clamp(0.0, 1.0));
            tracing::debug!("measured {} = {} with probability {:.4}", qubit, outcome, p1);
            outcome
        };

        let p = if outcome { p1 } else { 1.0 - p1 };
        let scale = 1.0 / p.sqrt();
        self.state.retain(|basis, _| basis.get(qubit) == outcome);
        self.state.values_mut().for_each(|amp| *amp *= scale);
        Ok(outcome)
    }

    /// Measures every qubit of `register`, in order.
    pub fn measure_register(&mut self, register: &Register) -> Result<Vec<bool>, SimError> {
        register.iter().map(|&qubit| self.measure(qubit)).collect()
    }

    fn check_range(&self, qubit: Qubit) -> Result<(), SimError> {
        if qubit.index() < self.num_qubits {
            Ok(())
        } else {
            Err(SimError::QubitOutOfRange(qubit))
        }
    }

    fn check_live(&self, qubit: Qubit) -> Result<(), SimError> {
        self.check_range(qubit)?;
        if self.is_live(qubit) {
            Ok(())
        } else {
            Err(SimError::QubitNotAllocated(qubit))
        }
    }

    fn grow(&mut self, num_qubits: usize) {
        if num_qubits <= self.num_qubits {
            return;
        }
        self.num_qubits = num_qubits;
        self.live.resize(num_qubits, false);
        self.state = std::mem::take(&mut self.state)
            .into_iter()
            .map(|(mut basis, amp)| {
                basis.grow(num_qubits);
                (basis, amp)
            })
            .collect();
    }

    fn allocate(&mut self, register: &Register) -> Result<(), SimError> {
        if let Some(max) = register.iter().map(|q| q.index() + 1).max() {
            self.grow(max);
        }
        for &qubit in register.iter() {
            if self.is_live(qubit) {
                return Err(SimError::AllocatedQubitInUse(qubit));
            }
            self.live[qubit.index()] = true;
        }
        Ok(())
    }

    fn release(&mut self, register: &Register) -> Result<(), SimError> {
        for &qubit in register.iter() {
            self.check_live(qubit)?;
            let probability = self.probability_of_one(qubit)?;
            if probability > self.config.tolerance {
                return Err(SimError::ReleasedQubitNotZero { qubit, probability });
            }
        }
        // Drop numerically negligible branches that still mention the released qubits.
        self.state.retain(|basis, _| register.iter().all(|&q| !basis.get(q)));
        for &qubit in register.iter() {
            self.live[qubit.index()] = false;
        }
        Ok(())
    }

    fn reset(&mut self, qubit: Qubit) -> Result<(), SimError> {
        if self.measure(qubit)? {
            self.permute(&[], qubit);
        }
        Ok(())
    }

    fn apply_gate(&mut self, gate: &Gate) -> Result<(), SimError> {
        for qubit in gate.qubits() {
            self.check_live(qubit)?;
        }
        let controls = gate.controls();
        let target = gate.target();
        match gate.kind() {
            GateKind::X => self.permute(controls, target),
            GateKind::H => self.hadamard(controls, target)?,
            kind => self.phase(controls, target, phase_of(kind)),
        }
        Ok(())
    }

    fn permute(&mut self, controls: &[Qubit], target: Qubit) {
        self.state = std::mem::take(&mut self.state)
            .into_par_iter()
            .map(|(mut basis, amp)| {
                if basis.all(controls) {
                    basis.flip(target);
                }
                (basis, amp)
            })
            .collect();
    }

    fn phase(&mut self, controls: &[Qubit], target: Qubit, phase: Complex64) {
        self.state.par_iter_mut().for_each(|(basis, amp)| {
            if basis.get(target) && basis.all(controls) {
                *amp *= phase;
            }
        });
    }

    fn hadamard(&mut self, controls: &[Qubit], target: Qubit) -> Result<(), SimError> {
        let mut next: HashMap<BasisState, Complex64> = HashMap::with_capacity(self.state.len() * 2);
        for (basis, amp) in self.state.drain() {
            if !basis.all(controls) {
                *next.entry(basis).or_default() += amp;
                continue;
            }
            let one = basis.get(target);
            let mut zero_branch = basis.clone();
            zero_branch.set(target, false);
            let mut one_branch = basis;
            one_branch.set(target, true);

            let half = amp * FRAC_1_SQRT_2;
            *next.entry(zero_branch).or_default() += half;
            *next.entry(one_branch).or_default() += if one { -half } else { half };
        }

        let tolerance = self.config.tolerance;
        next.retain(|_, amp| amp.norm_sqr() > tolerance);
        if next.len() > self.config.max_amplitudes {
            return Err(SimError::AmplitudeBudgetExceeded(next.len(), self.config.max_amplitudes));
        }
        self.state = next;
        Ok(())
    }
}

fn phase_of(kind: GateKind) -> Complex64 {
    match kind {
        GateKind::Z => Complex64::new(-1.0, 0.0),
        GateKind::S => Complex64::new(0.0, 1.0),
        GateKind::Sdg => Complex64::new(0.0, -1.0),
        GateKind::T => Complex64::from_polar(1.0, FRAC_PI_4),
        GateKind::Tdg => Complex64::from_polar(1.0, -FRAC_PI_4),
        GateKind::X | GateKind::H => unreachable!("{} is not diagonal", kind),
    }
}

impl Backend for SparseSimulator {
    type Error = SimError;

    fn execute(&mut self, instruction: &Instruction) -> Result<(), Self::Error> {
        tracing::trace!("{}", instruction);
        match instruction {
            Instruction::Gate(gate) => self.apply_gate(gate),
            Instruction::Allocate(register) => self.allocate(register),
            Instruction::Release(register) => self.release(register),
            Instruction::Reset(qubit) => self.reset(*qubit),
        }
    }
}
