use super::ram::{check_access, format_size, read_value};
use super::{BusError, BusSlave, Transaction};
use crate::addr::{Addr, Range};

//===========================================================================//

/// A read-only memory device mapped into a bus's address space.
///
/// Reads behave like [`RamSlave`](super::RamSlave); writes are claimed (the
/// region is mapped) but fail with [`BusError::ReadOnly`].
pub struct RomSlave {
    range: Range,
    rom: Box<[u8]>,
}

impl RomSlave {
    /// Constructs a ROM device mapped at `base`, using the given byte array
    /// as the contents of ROM.  Panics under the same conditions as
    /// [`RamSlave::new`](super::RamSlave::new).
    pub fn new(base: Addr, rom: Box<[u8]>) -> RomSlave {
        assert!(base.is_aligned_to(4));
        assert!(!rom.is_empty() && rom.len() % 4 == 0);
        let range = base.range_with_size(rom.len() as u64).unwrap();
        RomSlave { range, rom }
    }
}

impl BusSlave for RomSlave {
    fn description(&self) -> String {
        format_size(self.rom.len(), "ROM")
    }

    fn mapped_range(&self) -> Range {
        self.range
    }

    fn can_handle(&self, transaction: &Transaction) -> bool {
        self.range.contains(transaction.addr())
            && (transaction.is_read() || transaction.is_write())
    }

    fn handle(&mut self, transaction: &mut Transaction) {
        if transaction.is_write() {
            transaction.set_error(BusError::ReadOnly);
            return;
        }
        let Some(offset) = check_access(self.range, transaction) else {
            return;
        };
        let value = read_value(&self.rom, offset, transaction.size());
        transaction.set_read_data(value);
    }
}

//===========================================================================//


//===========================================================================//
