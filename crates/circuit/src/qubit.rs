use std::{
    fmt,
    ops::{Deref, Index, Range},
};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A handle to a single qubit, identified by its position in the circuit's qubit space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Qubit(pub usize);

impl Qubit {
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// An ordered, fixed-length sequence of qubits.
///
/// Index `0` is the least significant position whenever the register encodes an integer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    qubits: Vec<Qubit>,
}

impl Register {
    #[inline]
    pub const fn new(qubits: Vec<Qubit>) -> Self {
        Self { qubits }
    }

    /// A register over the contiguous qubit range `range`.
    pub fn contiguous(range: Range<usize>) -> Self {
        range.map(Qubit).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    #[inline]
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    #[inline]
    pub fn into_qubits(self) -> Vec<Qubit> {
        self.qubits
    }

    /// The sub-register covering `range`.
    #[track_caller]
    pub fn slice(&self, range: Range<usize>) -> Register {
        Register::new(self.qubits[range].to_vec())
    }

    /// Splits the register into consecutive fields of `width` qubits.
    ///
    /// A zero `width` yields no fields.
    pub fn fields(&self, width: usize) -> impl Iterator<Item = Register> + '_ {
        let chunk = width.max(1);
        self.qubits
            .chunks(chunk)
            .filter(move |_| width > 0)
            .map(|chunk| Register::new(chunk.to_vec()))
    }

    /// Returns `true` if no qubit appears in both registers.
    pub fn is_disjoint(&self, other: &Register) -> bool {
        self.qubits.iter().all(|q| !other.qubits.contains(q))
    }

    /// Returns `true` if no qubit appears twice in the register.
    pub fn is_unique(&self) -> bool {
        self.qubits.iter().all_unique()
    }
}

impl Deref for Register {
    type Target = [Qubit];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.qubits
    }
}

impl Index<usize> for Register {
    type Output = Qubit;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.qubits[index]
    }
}

impl FromIterator<Qubit> for Register {
    fn from_iter<T: IntoIterator<Item = Qubit>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<Qubit>> for Register {
    fn from(qubits: Vec<Qubit>) -> Self {
        Self::new(qubits)
    }
}

impl<'a> IntoIterator for &'a Register {
    type Item = &'a Qubit;
    type IntoIter = std::slice::Iter<'a, Qubit>;

    fn into_iter(self) -> Self::IntoIter {
        self.qubits.iter()
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.qubits.iter().join(", "))
    }
}

macro_rules! register_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[repr(transparent)]
        pub struct $name(Register);

        impl $name {
            #[inline]
            pub const fn new(register: Register) -> Self {
                Self(register)
            }

            #[inline]
            pub fn as_register(&self) -> &Register {
                &self.0
            }

            #[inline]
            pub fn into_register(self) -> Register {
                self.0
            }
        }

        impl Deref for $name {
            type Target = Register;

            #[inline]
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<Register> for $name {
            fn from(register: Register) -> Self {
                Self(register)
            }
        }
    };
}

register_newtype!(
    /// A register holding an address, least significant bit first.
    AddressRegister
);

register_newtype!(
    /// A register holding the contents of a quantum memory.
    MemoryRegister
);
