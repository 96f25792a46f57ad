use qram_circuit::Qubit;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("qubit {0} is outside the simulated qubit space")]
    QubitOutOfRange(Qubit),
    #[error("qubit {0} is used without being allocated")]
    QubitNotAllocated(Qubit),
    #[error("qubit {0} is allocated twice")]
    AllocatedQubitInUse(Qubit),
    #[error("qubit {qubit} released with probability {probability} of being |1⟩")]
    ReleasedQubitNotZero { qubit: Qubit, probability: f64 },
    #[error("state has {0} amplitudes, more than the configured budget of {1}")]
    AmplitudeBudgetExceeded(usize, usize),
}
