use std::{fmt, str::FromStr};

use qram_utils::bit_string;
use serde::{Deserialize, Deserializer, Serialize};

use crate::MemoryError;

/// One explicitly stored entry of a memory: the bits of `value` live at `address`.
///
/// `value[0]` is the first bit of the stored word.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryCell {
    address: u64,
    #[serde(deserialize_with = "deserialize_bits")]
    value: Vec<bool>,
}

impl MemoryCell {
    #[inline]
    pub const fn new(address: u64, value: Vec<bool>) -> Self {
        Self { address, value }
    }

    /// A cell whose value is given as a `0`/`1` string, first bit first.
    pub fn from_bits(address: u64, bits: &str) -> Result<Self, MemoryError> {
        Ok(Self::new(address, parse_bits(bits)?))
    }

    #[inline]
    pub const fn address(&self) -> u64 {
        self.address
    }

    #[inline]
    pub fn value(&self) -> &[bool] {
        &self.value
    }
}

impl fmt::Display for MemoryCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.address, bit_string(&self.value))
    }
}

impl From<(u64, Vec<bool>)> for MemoryCell {
    fn from((address, value): (u64, Vec<bool>)) -> Self {
        Self::new(address, value)
    }
}

impl FromStr for MemoryCell {
    type Err = MemoryError;

    /// Parses `"<address>:<bits>"`, e.g. `"3:111"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, bits) =
            s.split_once(':').ok_or_else(|| MemoryError::InvalidCell(s.to_string()))?;
        let address =
            address.trim().parse().map_err(|_| MemoryError::InvalidCell(s.to_string()))?;
        Self::from_bits(address, bits.trim())
    }
}

fn parse_bits(bits: &str) -> Result<Vec<bool>, MemoryError> {
    bits.chars()
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            _ => Err(MemoryError::InvalidBitString(bits.to_string())),
        })
        .collect()
}

/// Accepts a value written either as a bit string or as an array of booleans/`0`/`1`.
fn deserialize_bits<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<bool>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Bit {
        Bool(bool),
        Int(u8),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Bits {
        Text(String),
        List(Vec<Bit>),
    }

    match Bits::deserialize(deserializer)? {
        Bits::Text(text) => parse_bits(&text).map_err(serde::de::Error::custom),
        Bits::List(list) => list
            .into_iter()
            .map(|bit| match bit {
                Bit::Bool(b) => Ok(b),
                Bit::Int(0) => Ok(false),
                Bit::Int(1) => Ok(true),
                Bit::Int(other) => Err(serde::de::Error::custom(format!("invalid bit {}", other))),
            })
            .collect(),
    }
}
