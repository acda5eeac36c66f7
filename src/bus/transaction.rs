use crate::addr::Addr;
use std::fmt;
use std::ops;

//===========================================================================//

/// The set of operations requested by a bus transaction.
///
/// An `Ops` value is a small flag set; flags are combined with `|`.  A
/// transaction that is both [`Ops::READ`] and [`Ops::WRITE`] must also be
/// [`Ops::ATOMIC`], or the bus will reject it during arbitration.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Ops(u8);

impl Ops {
    /// The transaction reads data from the addressed device.
    pub const READ: Ops = Ops(0b001);

    /// The transaction writes data to the addressed device.
    pub const WRITE: Ops = Ops(0b010);

    /// The transaction is an indivisible read-modify-write operation.
    pub const ATOMIC: Ops = Ops(0b100);

    /// Returns true if every flag in `other` is also set in `self`.
    pub fn contains(self, other: Ops) -> bool {
        self.0 & other.0 == other.0
    }
}

impl ops::BitOr for Ops {
    type Output = Ops;

    fn bitor(self, rhs: Ops) -> Ops {
        Ops(self.0 | rhs.0)
    }
}

//===========================================================================//

/// The width of the data access performed by a bus transaction.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AccessSize {
    /// An 8-bit access.
    Byte,
    /// A 16-bit access.
    Half,
    /// A 32-bit access.
    Word,
}

impl AccessSize {
    /// Returns the number of bytes transferred by an access of this size.
    pub fn num_bytes(self) -> u32 {
        match self {
            AccessSize::Byte => 1,
            AccessSize::Half => 2,
            AccessSize::Word => 4,
        }
    }
}

impl fmt::Display for AccessSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            AccessSize::Byte => "byte".fmt(f),
            AccessSize::Half => "half".fmt(f),
            AccessSize::Word => "word".fmt(f),
        }
    }
}

//===========================================================================//

/// The kinds of errors that can be attached to a bus transaction.
///
/// The first four variants are raised by the bus arbiter itself; the
/// remaining variants are raised by the responding slave device.  Errors are
/// carried as data on the transaction and never abort the simulation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BusError {
    /// No slave devices at all are registered on the bus.
    NoSlaves,
    /// The transaction requests both a read and a write without being
    /// flagged atomic.
    NonAtomicReadWrite,
    /// No registered slave claims the transaction's address.
    NoResponder,
    /// More than one registered slave claims the transaction's address,
    /// indicating overlapping ranges in the memory map.
    MultipleSlaves,
    /// The transaction's address is not aligned to its access size.
    Misaligned,
    /// The addressed region does not support being written.
    ReadOnly,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            BusError::NoSlaves => "no slaves attached to bus".fmt(f),
            BusError::NonAtomicReadWrite => {
                "simultaneous read/write without atomic".fmt(f)
            }
            BusError::NoResponder => "no responder at address".fmt(f),
            BusError::MultipleSlaves => {
                "multiple responders at address".fmt(f)
            }
            BusError::Misaligned => "misaligned access".fmt(f),
            BusError::ReadOnly => "write to read-only region".fmt(f),
        }
    }
}

//===========================================================================//

/// One bus operation issued by a master.
///
/// A transaction is created by a master, mutated only while the bus
/// dispatches it (the responding slave fills in read data and may attach an
/// error), and is read-only afterward.  The bus never retains the
/// transaction itself; the trace history stores an immutable snapshot.
#[derive(Clone, Debug)]
pub struct Transaction {
    addr: Addr,
    size: AccessSize,
    ops: Ops,
    write_data: u32,
    read_data: u32,
    error: Option<BusError>,
    hidden: bool,
}

impl Transaction {
    /// Constructs a transaction with the given address, operation flags,
    /// access size, and data to be written (ignored for pure reads).
    pub fn new(
        addr: Addr,
        ops: Ops,
        size: AccessSize,
        write_data: u32,
    ) -> Transaction {
        Transaction {
            addr,
            size,
            ops,
            write_data,
            read_data: 0,
            error: None,
            hidden: false,
        }
    }

    /// Constructs a read transaction.
    pub fn read(addr: Addr, size: AccessSize) -> Transaction {
        Transaction::new(addr, Ops::READ, size, 0)
    }

    /// Constructs a write transaction.
    pub fn write(addr: Addr, size: AccessSize, data: u32) -> Transaction {
        Transaction::new(addr, Ops::WRITE, size, data)
    }

    /// Constructs an atomic read-modify-write transaction.
    pub fn atomic(addr: Addr, size: AccessSize, data: u32) -> Transaction {
        let ops = Ops::READ | Ops::WRITE | Ops::ATOMIC;
        Transaction::new(addr, ops, size, data)
    }

    /// Returns the address this transaction accesses.
    pub fn addr(&self) -> Addr {
        self.addr
    }

    /// Returns the access size of this transaction.
    pub fn size(&self) -> AccessSize {
        self.size
    }

    /// Returns true if this transaction reads data.
    pub fn is_read(&self) -> bool {
        self.ops.contains(Ops::READ)
    }

    /// Returns true if this transaction writes data.
    pub fn is_write(&self) -> bool {
        self.ops.contains(Ops::WRITE)
    }

    /// Returns true if this transaction is atomic.
    pub fn is_atomic(&self) -> bool {
        self.ops.contains(Ops::ATOMIC)
    }

    /// Returns true if this transaction is excluded from the trace history
    /// and from sniffer notification.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Marks this transaction as hidden, excluding it from the trace history
    /// and from sniffer notification (e.g. for speculative probes).
    pub fn set_hidden(&mut self) {
        self.hidden = true;
    }

    /// Returns the data to be written by this transaction.
    pub fn write_data(&self) -> u32 {
        self.write_data
    }

    /// Returns the data read by the responding slave, or zero if no read has
    /// been performed.
    pub fn read_data(&self) -> u32 {
        self.read_data
    }

    /// Fills in the data read by the responding slave.
    pub fn set_read_data(&mut self, data: u32) {
        self.read_data = data;
    }

    /// Returns the error attached to this transaction, if any.
    pub fn error(&self) -> Option<BusError> {
        self.error
    }

    /// Returns true if an error has been attached to this transaction.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Attaches an error to this transaction.  The error field is one-shot:
    /// once an error has been set, later calls are ignored.
    pub fn set_error(&mut self, error: BusError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let kind = if self.is_atomic() {
            "AT"
        } else if self.is_read() && self.is_write() {
            "RW"
        } else if self.is_write() {
            "WR"
        } else {
            "RD"
        };
        write!(f, "{} {} @ ${:08x}", kind, self.size, self.addr)?;
        if self.is_write() {
            write!(f, " <= ${:08x}", self.write_data)?;
        }
        if self.is_read() && !self.has_error() {
            write!(f, " => ${:08x}", self.read_data)?;
        }
        if let Some(error) = self.error {
            write!(f, " !{error}")?;
        }
        Ok(())
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{AccessSize, BusError, Ops, Transaction};
    use crate::addr::Addr;

    #[test]
    fn ops_flags() {
        let ops = Ops::READ | Ops::WRITE | Ops::ATOMIC;
        assert!(ops.contains(Ops::READ));
        assert!(ops.contains(Ops::WRITE | Ops::ATOMIC));
        assert!(!Ops::READ.contains(Ops::WRITE));
        assert!(!Ops::default().contains(Ops::READ));
    }

    #[test]
    fn constructors() {
        let trans = Transaction::read(Addr::from(0x100u16), AccessSize::Byte);
        assert!(trans.is_read());
        assert!(!trans.is_write());
        assert!(!trans.is_atomic());
        assert!(!trans.is_hidden());
        assert!(!trans.has_error());

        let trans =
            Transaction::write(Addr::from(0x100u16), AccessSize::Word, 7);
        assert!(!trans.is_read());
        assert!(trans.is_write());
        assert_eq!(trans.write_data(), 7);

        let trans =
            Transaction::atomic(Addr::from(0x100u16), AccessSize::Word, 7);
        assert!(trans.is_read());
        assert!(trans.is_write());
        assert!(trans.is_atomic());
    }

    #[test]
    fn error_is_one_shot() {
        let mut trans =
            Transaction::read(Addr::from(0x100u16), AccessSize::Byte);
        assert_eq!(trans.error(), None);
        trans.set_error(BusError::Misaligned);
        assert_eq!(trans.error(), Some(BusError::Misaligned));
        trans.set_error(BusError::NoResponder);
        assert_eq!(trans.error(), Some(BusError::Misaligned));
    }

    #[test]
    fn display() {
        let mut trans =
            Transaction::read(Addr::from(0x1000u16), AccessSize::Word);
        trans.set_read_data(0xdeadbeef);
        assert_eq!(
            format!("{trans}"),
            "RD word @ $00001000 => $deadbeef"
        );

        let mut trans =
            Transaction::write(Addr::from(0x1001u16), AccessSize::Half, 0x12);
        trans.set_error(BusError::Misaligned);
        assert_eq!(
            format!("{trans}"),
            "WR half @ $00001001 <= $00000012 !misaligned access"
        );
    }
}

//===========================================================================//
