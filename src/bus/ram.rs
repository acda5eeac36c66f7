use super::{AccessSize, BusError, BusSlave, Transaction};
use crate::addr::{Addr, Range};
use byteorder::{ByteOrder, LittleEndian};

//===========================================================================//

/// A RAM device mapped into a bus's address space.
///
/// Supports byte, half, and word accesses at naturally aligned addresses;
/// data is stored little-endian.  Misaligned accesses are claimed but fail
/// with [`BusError::Misaligned`].
pub struct RamSlave {
    range: Range,
    ram: Box<[u8]>,
}

impl RamSlave {
    /// Constructs a RAM device mapped at `base`, using the given byte array
    /// as the contents of RAM.  Panics if `base` is not word-aligned, or if
    /// the length of the byte array is zero, not a multiple of 4, or extends
    /// past the end of the address space.
    pub fn new(base: Addr, ram: Box<[u8]>) -> RamSlave {
        assert!(base.is_aligned_to(4));
        assert!(!ram.is_empty() && ram.len() % 4 == 0);
        let range = base.range_with_size(ram.len() as u64).unwrap();
        RamSlave { range, ram }
    }
}

impl BusSlave for RamSlave {
    fn description(&self) -> String {
        format_size(self.ram.len(), "RAM")
    }

    fn mapped_range(&self) -> Range {
        self.range
    }

    fn can_handle(&self, transaction: &Transaction) -> bool {
        self.range.contains(transaction.addr())
            && (transaction.is_read() || transaction.is_write())
    }

    fn handle(&mut self, transaction: &mut Transaction) {
        let Some(offset) = check_access(self.range, transaction) else {
            return;
        };
        // Read before write, so an atomic read-modify-write reports the old
        // value.
        if transaction.is_read() {
            let value = read_value(&self.ram, offset, transaction.size());
            transaction.set_read_data(value);
        }
        if transaction.is_write() {
            write_value(
                &mut self.ram,
                offset,
                transaction.size(),
                transaction.write_data(),
            );
        }
    }
}

//===========================================================================//

/// Checks the alignment of a transaction against its access size, attaching
/// a [`BusError::Misaligned`] error if it fails.  On success, returns the
/// transaction's byte offset from the start of `range`.
pub(super) fn check_access(
    range: Range,
    transaction: &mut Transaction,
) -> Option<usize> {
    let addr = transaction.addr();
    if !addr.is_aligned_to(transaction.size().num_bytes()) {
        transaction.set_error(BusError::Misaligned);
        return None;
    }
    Some(addr.as_usize() - range.start().as_usize())
}

pub(super) fn read_value(
    data: &[u8],
    offset: usize,
    size: AccessSize,
) -> u32 {
    match size {
        AccessSize::Byte => u32::from(data[offset]),
        AccessSize::Half => {
            u32::from(LittleEndian::read_u16(&data[offset..offset + 2]))
        }
        AccessSize::Word => LittleEndian::read_u32(&data[offset..offset + 4]),
    }
}

pub(super) fn write_value(
    data: &mut [u8],
    offset: usize,
    size: AccessSize,
    value: u32,
) {
    match size {
        AccessSize::Byte => data[offset] = value as u8,
        AccessSize::Half => {
            LittleEndian::write_u16(&mut data[offset..offset + 2], value as u16)
        }
        AccessSize::Word => {
            LittleEndian::write_u32(&mut data[offset..offset + 4], value)
        }
    }
}

pub(super) fn format_size(size: usize, kind: &str) -> String {
    if size < 1024 {
        format!("{size}B {kind}")
    } else if size < 1024 * 1024 {
        format!("{}kB {kind}", size >> 10)
    } else {
        format!("{}MB {kind}", size >> 20)
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::RamSlave;
    use crate::addr::Addr;
    use crate::bus::{AccessSize, BusError, BusSlave, Transaction};

    fn new_ram() -> RamSlave {
        RamSlave::new(
            Addr::from(0x1000u16),
            vec![0u8; 0x100].into_boxed_slice(),
        )
    }

    #[test]
    fn description() {
        let ram = new_ram();
        assert_eq!(ram.description(), "256B RAM");
        let ram = RamSlave::new(
            Addr::from(0u8),
            vec![0u8; 0x10000].into_boxed_slice(),
        );
        assert_eq!(ram.description(), "64kB RAM");
    }

    #[test]
    fn claims_only_its_range() {
        let ram = new_ram();
        let inside = Transaction::read(Addr::from(0x1080u16), AccessSize::Byte);
        let outside =
            Transaction::read(Addr::from(0x2000u16), AccessSize::Byte);
        assert!(ram.can_handle(&inside));
        assert!(!ram.can_handle(&outside));
    }

    #[test]
    fn write_then_read_little_endian() {
        let mut ram = new_ram();
        let mut write = Transaction::write(
            Addr::from(0x1010u16),
            AccessSize::Word,
            0xdeadbeef,
        );
        ram.handle(&mut write);
        assert_eq!(write.error(), None);

        let mut read =
            Transaction::read(Addr::from(0x1010u16), AccessSize::Byte);
        ram.handle(&mut read);
        assert_eq!(read.read_data(), 0xef);

        let mut read =
            Transaction::read(Addr::from(0x1012u16), AccessSize::Half);
        ram.handle(&mut read);
        assert_eq!(read.read_data(), 0xdead);
    }

    #[test]
    fn misaligned_access_sets_error() {
        let mut ram = new_ram();
        let mut trans =
            Transaction::read(Addr::from(0x1001u16), AccessSize::Word);
        ram.handle(&mut trans);
        assert_eq!(trans.error(), Some(BusError::Misaligned));
        let mut trans =
            Transaction::write(Addr::from(0x1003u16), AccessSize::Half, 1);
        ram.handle(&mut trans);
        assert_eq!(trans.error(), Some(BusError::Misaligned));
    }

    #[test]
    fn atomic_reports_old_value() {
        let mut ram = new_ram();
        let mut write = Transaction::write(
            Addr::from(0x1020u16),
            AccessSize::Word,
            0x11111111,
        );
        ram.handle(&mut write);
        let mut rmw = Transaction::atomic(
            Addr::from(0x1020u16),
            AccessSize::Word,
            0x22222222,
        );
        ram.handle(&mut rmw);
        assert_eq!(rmw.read_data(), 0x11111111);
        let mut read =
            Transaction::read(Addr::from(0x1020u16), AccessSize::Word);
        ram.handle(&mut read);
        assert_eq!(read.read_data(), 0x22222222);
    }
}

//===========================================================================//
