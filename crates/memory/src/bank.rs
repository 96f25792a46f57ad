use hashbrown::HashSet;
use itertools::Itertools;
use qram_utils::{bit_length, checked_pow2};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::MemoryCell;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("a memory bank needs at least one cell")]
    EmptyDataSet,
    #[error("address {0} is listed more than once")]
    DuplicateAddress(u64),
    #[error("invalid bit string {0:?}, expected only '0' and '1'")]
    InvalidBitString(String),
    #[error("invalid cell {0:?}, expected <address>:<bits>")]
    InvalidCell(String),
}

/// A sparse, immutable memory: the explicitly stored cells plus the register widths they imply.
///
/// Addresses that are not listed hold all-zero values. `address_size` and `data_size` are computed
/// once from the cells and cannot drift from them, since the bank exposes no mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemoryBank {
    cells: Vec<MemoryCell>,
    address_size: usize,
    data_size: usize,
}

impl MemoryBank {
    /// Builds a bank from `cells`, keeping their order.
    ///
    /// The address width is the bit length of the largest address, so a bank whose only address
    /// is `0` has `address_size == 0`. The data width is the length of the longest value.
    ///
    /// # Errors
    ///
    /// Fails if `cells` is empty or lists an address twice.
    pub fn generate(cells: impl IntoIterator<Item = MemoryCell>) -> Result<Self, MemoryError> {
        let cells = cells.into_iter().collect_vec();

        let mut seen = HashSet::with_capacity(cells.len());
        for cell in &cells {
            if !seen.insert(cell.address()) {
                return Err(MemoryError::DuplicateAddress(cell.address()));
            }
        }

        let max_address =
            cells.iter().map(MemoryCell::address).max().ok_or(MemoryError::EmptyDataSet)?;
        let address_size = bit_length(max_address);
        let data_size = cells.iter().map(|cell| cell.value().len()).max().unwrap_or_default();

        tracing::debug!(
            "memory bank with {} cells, address size {}, data size {}",
            cells.len(),
            address_size,
            data_size
        );

        Ok(Self { cells, address_size, data_size })
    }

    /// Builds a bank from `(address, value)` pairs.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (u64, Vec<bool>)>,
    ) -> Result<Self, MemoryError> {
        Self::generate(pairs.into_iter().map(MemoryCell::from))
    }

    #[inline]
    pub fn cells(&self) -> &[MemoryCell] {
        &self.cells
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: an empty bank cannot be constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub const fn address_size(&self) -> usize {
        self.address_size
    }

    #[inline]
    pub const fn data_size(&self) -> usize {
        self.data_size
    }

    /// The number of addressable slots, `2^address_size`, or `None` if that overflows a `usize`.
    #[inline]
    pub const fn num_addresses(&self) -> Option<usize> {
        checked_pow2(self.address_size)
    }

    /// The word stored at `address`, right-padded with zeros to `data_size`.
    ///
    /// Unlisted addresses, including ones beyond the address space, read as `data_size` zeros.
    pub fn data_at_address(&self, address: u64) -> Vec<bool> {
        let mut data = self
            .cells
            .iter()
            .find(|cell| cell.address() == address)
            .map(|cell| cell.value().to_vec())
            .unwrap_or_default();
        data.resize(self.data_size, false);
        data
    }
}

impl<'de> Deserialize<'de> for MemoryBank {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Cells(Vec<MemoryCell>),
            Bank { cells: Vec<MemoryCell> },
        }

        let cells = match Repr::deserialize(deserializer)? {
            Repr::Cells(cells) | Repr::Bank { cells } => cells,
        };
        Self::generate(cells).map_err(serde::de::Error::custom)
    }
}
