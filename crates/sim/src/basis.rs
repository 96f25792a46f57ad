use std::fmt;

use qram_circuit::Qubit;

const WORD_BITS: usize = u64::BITS as usize;

/// A computational basis state over a fixed number of qubits, packed into 64-bit words.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BasisState {
    words: Vec<u64>,
    num_qubits: usize,
}

impl BasisState {
    /// The all-zero state on `num_qubits` qubits.
    pub fn zero(num_qubits: usize) -> Self {
        Self { words: vec![0; num_qubits.div_ceil(WORD_BITS)], num_qubits }
    }

    /// The state whose qubit `i` is `bits[i]`.
    pub fn from_bits(bits: &[bool]) -> Self {
        let mut state = Self::zero(bits.len());
        for (i, &bit) in bits.iter().enumerate() {
            if bit {
                state.flip(Qubit(i));
            }
        }
        state
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    #[inline]
    pub fn get(&self, qubit: Qubit) -> bool {
        let i = qubit.index();
        debug_assert!(i < self.num_qubits);
        (self.words[i / WORD_BITS] >> (i % WORD_BITS)) & 1 == 1
    }

    #[inline]
    pub fn flip(&mut self, qubit: Qubit) {
        let i = qubit.index();
        debug_assert!(i < self.num_qubits);
        self.words[i / WORD_BITS] ^= 1 << (i % WORD_BITS);
    }

    #[inline]
    pub fn set(&mut self, qubit: Qubit, value: bool) {
        if self.get(qubit) != value {
            self.flip(qubit);
        }
    }

    /// Returns `true` if every qubit of `qubits` is set.
    #[inline]
    pub fn all(&self, qubits: &[Qubit]) -> bool {
        qubits.iter().all(|&q| self.get(q))
    }

    /// The values of `qubits`, in order.
    pub fn bits_of(&self, qubits: &[Qubit]) -> Vec<bool> {
        qubits.iter().map(|&q| self.get(q)).collect()
    }

    /// Extends the state with zero qubits up to `num_qubits`.
    pub fn grow(&mut self, num_qubits: usize) {
        if num_qubits > self.num_qubits {
            self.words.resize(num_qubits.div_ceil(WORD_BITS), 0);
            self.num_qubits = num_qubits;
        }
    }
}

impl fmt::Debug for BasisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|")?;
        for i in 0..self.num_qubits {
            write!(f, "{}", u8::from(self.get(Qubit(i))))?;
        }
        write!(f, "⟩")
    }
}
