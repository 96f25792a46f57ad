use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("address register has {got} qubits, expected {expected}")]
    AddressWidthMismatch { expected: usize, got: usize },
    #[error("target register has {got} qubits, expected {expected}")]
    TargetWidthMismatch { expected: usize, got: usize },
    #[error("memory register has {got} qubits, expected {expected}")]
    MemoryWidthMismatch { expected: usize, got: usize },
    #[error("auxiliary register has {got} qubits, expected {expected}")]
    AuxiliaryWidthMismatch { expected: usize, got: usize },
    #[error("address {address} is outside the {num_addresses} addressable slots")]
    AddressOutOfRange { address: u64, num_addresses: usize },
    #[error("value of {len} bits does not fit a {width}-bit memory field")]
    ValueTooWide { len: usize, width: usize },
    #[error("a {0}-bit address space is too large to lay out in memory")]
    AddressSpaceTooLarge(usize),
    #[error("a bit-per-address memory cannot store {0}-bit values")]
    DataSizeTooLarge(usize),
    #[error("registers passed to the oracle share qubits")]
    AliasedRegisters,
}
