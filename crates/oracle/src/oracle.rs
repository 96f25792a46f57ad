use qram_circuit::{AddressRegister, Circuit, MemoryRegister, Register};
use qram_memory::{MemoryBank, MemoryCell};
use qram_utils::checked_pow2;

use crate::{OracleConfig, OracleError, Read, Strategy, Write};

/// How values are laid out in the memory register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Slot `a` occupies qubits `a * data_size .. (a + 1) * data_size`.
    Sliced,
    /// One qubit per address; only single-bit values fit.
    BitPerAddress,
}

impl Layout {
    /// The width of one slot for values of `data_size` bits.
    #[inline]
    pub const fn field_width(self, data_size: usize) -> usize {
        match self {
            Layout::Sliced => data_size,
            Layout::BitPerAddress => 1,
        }
    }

    /// The memory register width needed for `2^address_size` slots, or `None` if it overflows a
    /// `usize`.
    #[inline]
    pub const fn memory_width(self, address_size: usize, data_size: usize) -> Option<usize> {
        match checked_pow2(address_size) {
            Some(slots) => slots.checked_mul(self.field_width(data_size)),
            None => None,
        }
    }
}

/// A read-write bucket-brigade oracle bound to one memory register.
///
/// Construction writes every cell of the bank into the memory register, in bank order. Reads
/// can then be emitted any number of times and [`Qram::write`] can overwrite single slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Qram {
    memory: MemoryRegister,
    address_size: usize,
    data_size: usize,
    layout: Layout,
    strategy: Strategy,
}

impl Qram {
    /// An oracle whose memory holds `2^address_size` slots of `data_size` qubits.
    ///
    /// # Errors
    ///
    /// Fails if the address space is too large to lay out, or if `memory` has the wrong width or
    /// repeats a qubit.
    #[tracing::instrument(
        name = "bucket-brigade qram",
        level = "debug",
        skip_all,
        fields(cells = bank.len(), strategy = %config.strategy)
    )]
    pub fn bucket_brigade(
        circuit: &mut Circuit,
        memory: MemoryRegister,
        bank: &MemoryBank,
        config: OracleConfig,
    ) -> Result<Self, OracleError> {
        Self::build(circuit, memory, bank, Layout::Sliced, config)
    }

    /// An oracle with one memory qubit per address.
    ///
    /// # Errors
    ///
    /// Fails if the bank stores values wider than one bit, or if `memory` has the wrong width or
    /// repeats a qubit.
    #[tracing::instrument(
        name = "single-bit qram",
        level = "debug",
        skip_all,
        fields(cells = bank.len(), strategy = %config.strategy)
    )]
    pub fn single_bit(
        circuit: &mut Circuit,
        memory: MemoryRegister,
        bank: &MemoryBank,
        config: OracleConfig,
    ) -> Result<Self, OracleError> {
        if bank.data_size() > 1 {
            return Err(OracleError::DataSizeTooLarge(bank.data_size()));
        }
        Self::build(circuit, memory, bank, Layout::BitPerAddress, config)
    }

    fn build(
        circuit: &mut Circuit,
        memory: MemoryRegister,
        bank: &MemoryBank,
        layout: Layout,
        config: OracleConfig,
    ) -> Result<Self, OracleError> {
        let address_size = bank.address_size();
        let expected = layout
            .memory_width(address_size, bank.data_size())
            .ok_or(OracleError::AddressSpaceTooLarge(address_size))?;
        if memory.len() != expected {
            return Err(OracleError::MemoryWidthMismatch { expected, got: memory.len() });
        }
        if !memory.is_unique() {
            return Err(OracleError::AliasedRegisters);
        }

        let qram = Self {
            memory,
            address_size,
            data_size: layout.field_width(bank.data_size()),
            layout,
            strategy: config.strategy,
        };

        // Validate every cell before emitting anything.
        let writes: Vec<Write> =
            bank.cells().iter().map(|cell| qram.write(cell)).collect::<Result<_, _>>()?;
        for write in &writes {
            write.apply(circuit);
        }
        tracing::debug!(
            "initialized {} slots on {} memory qubits",
            writes.len(),
            qram.memory.len()
        );

        Ok(qram)
    }

    #[inline]
    pub const fn address_size(&self) -> usize {
        self.address_size
    }

    #[inline]
    pub const fn data_size(&self) -> usize {
        self.data_size
    }

    #[inline]
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    #[inline]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[inline]
    pub fn memory(&self) -> &MemoryRegister {
        &self.memory
    }

    /// The number of addressable slots, `2^address_size`.
    ///
    /// Construction rejects address spaces whose slot count overflows a `usize`.
    #[inline]
    pub const fn num_addresses(&self) -> usize {
        1 << self.address_size
    }

    /// A read of the slot selected by `address` into `target`.
    ///
    /// `target` should start in `|0⟩` to receive the value itself; otherwise the value is XOR-ed
    /// into it.
    ///
    /// # Errors
    ///
    /// Fails if the registers have the wrong widths or share qubits with each other or with the
    /// memory.
    pub fn read(&self, address: &AddressRegister, target: &Register) -> Result<Read, OracleError> {
        if address.len() != self.address_size {
            return Err(OracleError::AddressWidthMismatch {
                expected: self.address_size,
                got: address.len(),
            });
        }
        if target.len() != self.data_size {
            return Err(OracleError::TargetWidthMismatch {
                expected: self.data_size,
                got: target.len(),
            });
        }
        let aliased = !address.is_unique()
            || !target.is_unique()
            || !address.is_disjoint(target)
            || !address.is_disjoint(&self.memory)
            || !target.is_disjoint(&self.memory);
        if aliased {
            return Err(OracleError::AliasedRegisters);
        }
        Ok(Read::new(address.clone(), self.memory.clone(), target.clone(), self.strategy))
    }

    /// A write of `cell` into its slot.
    ///
    /// # Errors
    ///
    /// Fails if the address is outside the oracle's address space or the value is wider than a
    /// slot.
    pub fn write(&self, cell: &MemoryCell) -> Result<Write, OracleError> {
        let num_addresses = self.num_addresses();
        let slot = usize::try_from(cell.address())
            .ok()
            .filter(|&slot| slot < num_addresses)
            .ok_or(OracleError::AddressOutOfRange { address: cell.address(), num_addresses })?;
        if cell.value().len() > self.data_size {
            return Err(OracleError::ValueTooWide {
                len: cell.value().len(),
                width: self.data_size,
            });
        }
        let width = self.data_size;
        Ok(Write::new(self.memory.slice(slot * width..(slot + 1) * width), cell.value().to_vec()))
    }

    /// Drops write access.
    pub fn into_rom(self) -> Qrom {
        Qrom { inner: self }
    }
}

/// A read-only bucket-brigade oracle.
///
/// Built the same way as [`Qram`], but after construction the memory can only be read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Qrom {
    inner: Qram,
}

impl Qrom {
    /// See [`Qram::bucket_brigade`].
    ///
    /// # Errors
    ///
    /// Fails if `memory` has the wrong width or repeats a qubit.
    pub fn bucket_brigade(
        circuit: &mut Circuit,
        memory: MemoryRegister,
        bank: &MemoryBank,
        config: OracleConfig,
    ) -> Result<Self, OracleError> {
        Qram::bucket_brigade(circuit, memory, bank, config).map(Qram::into_rom)
    }

    /// See [`Qram::single_bit`].
    ///
    /// # Errors
    ///
    /// Fails if the bank stores values wider than one bit, or if `memory` has the wrong width or
    /// repeats a qubit.
    pub fn single_bit(
        circuit: &mut Circuit,
        memory: MemoryRegister,
        bank: &MemoryBank,
        config: OracleConfig,
    ) -> Result<Self, OracleError> {
        Qram::single_bit(circuit, memory, bank, config).map(Qram::into_rom)
    }

    #[inline]
    pub const fn address_size(&self) -> usize {
        self.inner.address_size()
    }

    #[inline]
    pub const fn data_size(&self) -> usize {
        self.inner.data_size()
    }

    #[inline]
    pub const fn num_addresses(&self) -> usize {
        self.inner.num_addresses()
    }

    /// See [`Qram::read`].
    ///
    /// # Errors
    ///
    /// Fails if the registers have the wrong widths or share qubits.
    pub fn read(&self, address: &AddressRegister, target: &Register) -> Result<Read, OracleError> {
        self.inner.read(address, target)
    }
}

#[cfg(test)]
mod tests {
    use qram_circuit::Reversible;
    use qram_sim::SparseSimulator;
    use rand::seq::SliceRandom;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::testing::{prepare, simulate, superpose};

    /// `{0: 10, 3: 111}`, with address size 2 and data size 3.
    fn bank() -> MemoryBank {
        MemoryBank::from_pairs([(0, vec![true, false]), (3, vec![true, true, true])]).unwrap()
    }

    fn allocate_memory(circuit: &mut Circuit, bank: &MemoryBank, layout: Layout) -> MemoryRegister {
        let width = layout.memory_width(bank.address_size(), bank.data_size()).unwrap();
        MemoryRegister::new(circuit.allocate(width))
    }

    fn memory_contents(qram: &Qram, sim: &SparseSimulator) -> Vec<Vec<bool>> {
        let bits = sim.classical_value(qram.memory()).unwrap().unwrap();
        bits.chunks(qram.data_size()).map(<[bool]>::to_vec).collect()
    }

    #[test]
    fn test_memory_fidelity() {
        let bank = bank();
        let mut circuit = Circuit::new();
        let memory = allocate_memory(&mut circuit, &bank, Layout::Sliced);
        let qram =
            Qram::bucket_brigade(&mut circuit, memory, &bank, OracleConfig::default()).unwrap();
        assert_eq!(qram.address_size(), 2);
        assert_eq!(qram.data_size(), 3);

        let sim = simulate(&circuit);
        let contents = memory_contents(&qram, &sim);
        for (address, slot) in contents.iter().enumerate() {
            assert_eq!(slot, &bank.data_at_address(address as u64), "slot {}", address);
        }
    }

    #[test]
    fn test_read_classical_addresses() {
        let bank = bank();
        for strategy in Strategy::iter() {
            for address in 0..4u64 {
                let mut circuit = Circuit::new();
                let memory = allocate_memory(&mut circuit, &bank, Layout::Sliced);
                let qram = Qram::bucket_brigade(
                    &mut circuit,
                    memory,
                    &bank,
                    OracleConfig::with_strategy(strategy),
                )
                .unwrap();
                let address_register = AddressRegister::new(circuit.allocate(2));
                let target = circuit.allocate(3);
                prepare(&mut circuit, &address_register, address);
                qram.read(&address_register, &target).unwrap().apply(&mut circuit);

                let sim = simulate(&circuit);
                assert_eq!(
                    sim.classical_value(&target).unwrap(),
                    Some(bank.data_at_address(address)),
                    "{} strategy, address {}",
                    strategy,
                    address
                );
                assert_eq!(sim.num_amplitudes(), 1);
            }
        }
        assert_eq!(bank.data_at_address(3), vec![true; 3]);
        assert_eq!(bank.data_at_address(1), vec![false; 3]);
    }

    #[test]
    fn test_repeated_reads_agree() {
        let bank = bank();
        let mut circuit = Circuit::new();
        let memory = allocate_memory(&mut circuit, &bank, Layout::Sliced);
        let qrom =
            Qrom::bucket_brigade(&mut circuit, memory, &bank, OracleConfig::default()).unwrap();
        let address = AddressRegister::new(circuit.allocate(2));
        prepare(&mut circuit, &address, 0);

        let first = circuit.allocate(3);
        let second = circuit.allocate(3);
        qrom.read(&address, &first).unwrap().apply(&mut circuit);
        qrom.read(&address, &second).unwrap().apply(&mut circuit);

        let sim = simulate(&circuit);
        let expected = Some(vec![true, false, false]);
        assert_eq!(sim.classical_value(&first).unwrap(), expected);
        assert_eq!(sim.classical_value(&second).unwrap(), expected);
    }

    #[test]
    fn test_superposed_read_is_entangled() {
        let bank = MemoryBank::from_pairs([
            (0, vec![true, false]),
            (1, vec![false, true]),
            (2, vec![true, true]),
            (5, vec![true]),
        ])
        .unwrap();
        for strategy in Strategy::iter() {
            let mut circuit = Circuit::new();
            let memory = allocate_memory(&mut circuit, &bank, Layout::Sliced);
            let config = OracleConfig::with_strategy(strategy);
            let qrom = Qrom::bucket_brigade(&mut circuit, memory, &bank, config).unwrap();
            let address = AddressRegister::new(circuit.allocate(3));
            let target = circuit.allocate(2);
            superpose(&mut circuit, &address);
            qrom.read(&address, &target).unwrap().apply(&mut circuit);

            let sim = simulate(&circuit);
            assert_eq!(sim.num_amplitudes(), 8);
            for (basis, amplitude) in sim.amplitudes() {
                let a = qram_utils::from_bits_le(&basis.bits_of(&address));
                assert_eq!(basis.bits_of(&target), bank.data_at_address(a));
                assert!((amplitude.norm_sqr() - 0.125).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_adjoint_clears_target() {
        let bank = bank();
        for strategy in Strategy::iter() {
            let mut circuit = Circuit::new();
            let memory = allocate_memory(&mut circuit, &bank, Layout::Sliced);
            let config = OracleConfig::with_strategy(strategy);
            let qrom = Qrom::bucket_brigade(&mut circuit, memory, &bank, config).unwrap();
            let address = AddressRegister::new(circuit.allocate(2));
            let target = circuit.allocate(3);
            superpose(&mut circuit, &address);

            let read = qrom.read(&address, &target).unwrap();
            read.apply(&mut circuit);
            read.adjoint(&mut circuit);
            let sim = simulate(&circuit);
            assert_eq!(sim.classical_value(&target).unwrap(), Some(vec![false; 3]), "{}", strategy);
            assert_eq!(sim.num_amplitudes(), 4);
        }
    }

    #[test]
    fn test_controlled_read() {
        let bank = bank();
        for strategy in Strategy::iter() {
            for control in [false, true] {
                let mut circuit = Circuit::new();
                let memory = allocate_memory(&mut circuit, &bank, Layout::Sliced);
                let config = OracleConfig::with_strategy(strategy);
                let qrom = Qrom::bucket_brigade(&mut circuit, memory, &bank, config).unwrap();
                let address = AddressRegister::new(circuit.allocate(2));
                let target = circuit.allocate(3);
                let ctl = circuit.allocate(1);
                prepare(&mut circuit, &address, 3);
                prepare(&mut circuit, &ctl, u64::from(control));
                qrom.read(&address, &target).unwrap().controlled(&[ctl[0]], &mut circuit);

                let sim = simulate(&circuit);
                assert_eq!(sim.classical_value(&target).unwrap(), Some(vec![control; 3]));
            }
        }
    }

    #[test]
    fn test_read_with_superposed_control() {
        let bank = bank();
        for strategy in Strategy::iter() {
            let mut circuit = Circuit::new();
            let memory = allocate_memory(&mut circuit, &bank, Layout::Sliced);
            let config = OracleConfig::with_strategy(strategy);
            let qrom = Qrom::bucket_brigade(&mut circuit, memory, &bank, config).unwrap();
            let address = AddressRegister::new(circuit.allocate(2));
            let target = circuit.allocate(3);
            let ctl = circuit.allocate(1);
            superpose(&mut circuit, &address);
            superpose(&mut circuit, &ctl);

            let read = qrom.read(&address, &target).unwrap();
            read.controlled(&[ctl[0]], &mut circuit);
            let sim = simulate(&circuit);
            assert_eq!(sim.num_amplitudes(), 8);
            for (basis, amplitude) in sim.amplitudes() {
                let a = qram_utils::from_bits_le(&basis.bits_of(&address));
                let expected =
                    if basis.get(ctl[0]) { bank.data_at_address(a) } else { vec![false; 3] };
                assert_eq!(basis.bits_of(&target), expected, "{} strategy", strategy);
                assert!((amplitude.norm_sqr() - 0.125).abs() < 1e-9);
            }

            read.controlled_adjoint(&[ctl[0]], &mut circuit);
            let sim = simulate(&circuit);
            assert_eq!(sim.classical_value(&target).unwrap(), Some(vec![false; 3]));
            assert_eq!(sim.num_amplitudes(), 8);
        }
    }

    #[test]
    fn test_write_order_is_irrelevant() {
        let mut rng = rand::thread_rng();
        let mut cells: Vec<MemoryCell> = (0..8u64)
            .map(|address| MemoryCell::new(address, qram_utils::bits_le(address * 5 % 8, 3)))
            .collect();
        let reference = MemoryBank::generate(cells.clone()).unwrap();

        let contents = |bank: &MemoryBank| {
            let mut circuit = Circuit::new();
            let memory = allocate_memory(&mut circuit, bank, Layout::Sliced);
            let qram = Qram::bucket_brigade(&mut circuit, memory, bank, OracleConfig::default())
                .unwrap();
            memory_contents(&qram, &simulate(&circuit))
        };
        let expected = contents(&reference);
        for _ in 0..4 {
            cells.shuffle(&mut rng);
            let shuffled = MemoryBank::generate(cells.clone()).unwrap();
            assert_eq!(contents(&shuffled), expected);
        }
    }

    #[test]
    fn test_write_overwrites_slot() {
        let bank = bank();
        let mut circuit = Circuit::new();
        let memory = allocate_memory(&mut circuit, &bank, Layout::Sliced);
        let qram =
            Qram::bucket_brigade(&mut circuit, memory, &bank, OracleConfig::default()).unwrap();
        qram.write(&MemoryCell::from_bits(3, "01").unwrap()).unwrap().apply(&mut circuit);
        qram.write(&MemoryCell::from_bits(1, "001").unwrap()).unwrap().apply(&mut circuit);

        let sim = simulate(&circuit);
        assert_eq!(
            memory_contents(&qram, &sim),
            vec![
                vec![true, false, false],
                vec![false, false, true],
                vec![false, false, false],
                vec![false, true, false],
            ]
        );
    }

    #[test]
    fn test_single_bit() {
        let bank = MemoryBank::from_pairs([(1, vec![true]), (2, vec![]), (6, vec![true])]).unwrap();
        for strategy in Strategy::iter() {
            let mut circuit = Circuit::new();
            let memory = allocate_memory(&mut circuit, &bank, Layout::BitPerAddress);
            assert_eq!(memory.len(), 8);
            let qram =
                Qram::single_bit(&mut circuit, memory, &bank, OracleConfig::with_strategy(strategy))
                    .unwrap();
            assert_eq!(qram.data_size(), 1);
            assert_eq!(qram.layout(), Layout::BitPerAddress);

            let address = AddressRegister::new(circuit.allocate(3));
            let target = circuit.allocate(1);
            superpose(&mut circuit, &address);
            qram.read(&address, &target).unwrap().apply(&mut circuit);

            let sim = simulate(&circuit);
            for (basis, _) in sim.amplitudes() {
                let a = qram_utils::from_bits_le(&basis.bits_of(&address));
                assert_eq!(basis.bits_of(&target), vec![a == 1 || a == 6]);
            }
        }
    }

    #[test]
    fn test_address_space_too_large() {
        assert_eq!(Layout::Sliced.memory_width(2, 3), Some(12));
        assert_eq!(Layout::Sliced.memory_width(63, 2), None);
        assert_eq!(Layout::BitPerAddress.memory_width(64, 1), None);

        let mut circuit = Circuit::new();
        let memory = MemoryRegister::new(circuit.allocate(2));
        let start = circuit.len();

        let bank = MemoryBank::from_pairs([(1 << 62, vec![true, true])]).unwrap();
        assert_eq!(
            Qram::bucket_brigade(&mut circuit, memory.clone(), &bank, OracleConfig::default()),
            Err(OracleError::AddressSpaceTooLarge(63))
        );

        let bank = MemoryBank::from_pairs([(u64::MAX, vec![true])]).unwrap();
        assert_eq!(
            Qrom::single_bit(&mut circuit, memory.clone(), &bank, OracleConfig::default()),
            Err(OracleError::AddressSpaceTooLarge(64))
        );
        assert_eq!(
            Qrom::bucket_brigade(&mut circuit, memory, &bank, OracleConfig::default()),
            Err(OracleError::AddressSpaceTooLarge(64))
        );
        assert_eq!(circuit.len(), start);
    }

    #[test]
    fn test_construction_errors() {
        let mut circuit = Circuit::new();
        let bank = bank();
        let memory = MemoryRegister::new(circuit.allocate(11));
        assert_eq!(
            Qram::bucket_brigade(&mut circuit, memory, &bank, OracleConfig::default()),
            Err(OracleError::MemoryWidthMismatch { expected: 12, got: 11 })
        );

        let memory = MemoryRegister::new(circuit.allocate(4));
        assert_eq!(
            Qram::single_bit(&mut circuit, memory, &bank, OracleConfig::default()),
            Err(OracleError::DataSizeTooLarge(3))
        );

        let qubits = circuit.allocate(11);
        let repeated: Register = qubits.iter().copied().chain([qubits[0]]).collect();
        let start = circuit.len();
        let memory = MemoryRegister::new(repeated);
        assert_eq!(
            Qrom::bucket_brigade(&mut circuit, memory, &bank, OracleConfig::default()),
            Err(OracleError::AliasedRegisters)
        );
        assert_eq!(circuit.len(), start);
    }

    #[test]
    fn test_request_errors() {
        let bank = bank();
        let mut circuit = Circuit::new();
        let memory = allocate_memory(&mut circuit, &bank, Layout::Sliced);
        let qram =
            Qram::bucket_brigade(&mut circuit, memory, &bank, OracleConfig::default()).unwrap();
        let address = AddressRegister::new(circuit.allocate(2));
        let target = circuit.allocate(3);

        let narrow = AddressRegister::new(address.slice(0..1));
        assert_eq!(
            qram.read(&narrow, &target),
            Err(OracleError::AddressWidthMismatch { expected: 2, got: 1 })
        );
        assert_eq!(
            qram.read(&address, &target.slice(0..2)),
            Err(OracleError::TargetWidthMismatch { expected: 3, got: 2 })
        );
        assert_eq!(
            qram.read(&address, &qram.memory().slice(0..3)),
            Err(OracleError::AliasedRegisters)
        );
        assert_eq!(
            qram.write(&MemoryCell::new(4, vec![true])),
            Err(OracleError::AddressOutOfRange { address: 4, num_addresses: 4 })
        );
        assert_eq!(
            qram.write(&MemoryCell::new(2, vec![true; 4])),
            Err(OracleError::ValueTooWide { len: 4, width: 3 })
        );
    }
}
