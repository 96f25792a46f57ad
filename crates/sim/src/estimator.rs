use std::{convert::Infallible, fmt};

use hashbrown::HashMap;
use qram_circuit::{Gate, GateKind, Instruction, Qubit};
use serde::{Deserialize, Serialize};

use crate::Backend;

/// Gate and qubit counts of a circuit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCount {
    /// The largest number of qubits live at the same time.
    pub qubits: usize,
    pub gates: usize,
    /// Uncontrolled single-qubit gates.
    pub single_qubit: usize,
    pub cnot: usize,
    pub toffoli: usize,
    /// Controlled gates that are neither CNOT nor Toffoli.
    pub multi_controlled: usize,
    /// Uncontrolled T and T† gates.
    pub t_count: usize,
    /// The number of sequential layers of uncontrolled T and T† gates.
    pub t_depth: usize,
    pub depth: usize,
    pub resets: usize,
}

impl fmt::Display for ResourceCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "qubits:           {}", self.qubits)?;
        writeln!(f, "gates:            {}", self.gates)?;
        writeln!(f, "  single-qubit:   {}", self.single_qubit)?;
        writeln!(f, "  cnot:           {}", self.cnot)?;
        writeln!(f, "  toffoli:        {}", self.toffoli)?;
        writeln!(f, "  multi-control:  {}", self.multi_controlled)?;
        writeln!(f, "t-count:          {}", self.t_count)?;
        writeln!(f, "t-depth:          {}", self.t_depth)?;
        writeln!(f, "depth:            {}", self.depth)?;
        write!(f, "resets:           {}", self.resets)
    }
}

/// A backend that schedules gates as early as possible and counts what it sees.
#[derive(Clone, Debug, Default)]
pub struct ResourceEstimator {
    count: ResourceCount,
    live: usize,
    layer: HashMap<Qubit, usize>,
    t_layer: HashMap<Qubit, usize>,
}

impl ResourceEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn count(&self) -> ResourceCount {
        self.count
    }

    fn record_gate(&mut self, gate: &Gate) {
        let count = &mut self.count;
        count.gates += 1;
        match (gate.kind(), gate.controls().len()) {
            (_, 0) => count.single_qubit += 1,
            (GateKind::X, 1) => count.cnot += 1,
            (GateKind::X, 2) => count.toffoli += 1,
            _ => count.multi_controlled += 1,
        }

        let is_t = gate.kind().is_t() && gate.controls().is_empty();
        if is_t {
            count.t_count += 1;
        }

        let start = gate.qubits().map(|q| self.layer.get(&q).copied().unwrap_or(0)).max();
        let t_start = gate.qubits().map(|q| self.t_layer.get(&q).copied().unwrap_or(0)).max();
        let layer = start.unwrap_or(0) + 1;
        let t_layer = t_start.unwrap_or(0) + usize::from(is_t);
        for qubit in gate.qubits() {
            self.layer.insert(qubit, layer);
            self.t_layer.insert(qubit, t_layer);
        }
        count.depth = count.depth.max(layer);
        count.t_depth = count.t_depth.max(t_layer);
    }
}

impl Backend for ResourceEstimator {
    type Error = Infallible;

    fn execute(&mut self, instruction: &Instruction) -> Result<(), Self::Error> {
        match instruction {
            Instruction::Gate(gate) => self.record_gate(gate),
            Instruction::Allocate(register) => {
                self.live += register.len();
                self.count.qubits = self.count.qubits.max(self.live);
            }
            Instruction::Release(register) => {
                self.live = self.live.saturating_sub(register.len());
            }
            Instruction::Reset(_) => self.count.resets += 1,
        }
        Ok(())
    }
}
