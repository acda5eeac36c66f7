//! Facilities for simulating a shared SoC memory bus: slave and sniffer
//! registration, transaction arbitration, and the bounded trace history.

use crate::addr::Range;
use std::sync::atomic::{AtomicU64, Ordering};

mod arbiter;
mod ram;
mod registry;
mod rom;
mod state;
mod trace;
mod transaction;

pub use arbiter::SocBus;
pub use ram::RamSlave;
pub use registry::SlaveRegistry;
pub use rom::RomSlave;
pub use state::{BusState, StateStore};
pub use trace::{DEFAULT_TRACE_CAPACITY, TraceEntry, TraceHistory};
pub use transaction::{AccessSize, BusError, Ops, Transaction};

//===========================================================================//

/// Unique identifier for a simulated bus instance.
///
/// A `BusId` keys the bus's per-simulation state in a [`StateStore`];
/// distinct bus components get distinct ids and therefore fully independent
/// registries and trace histories.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct BusId(u64);

impl BusId {
    /// Creates a new [BusId] that is different from any other created so
    /// far.
    pub fn create() -> BusId {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        BusId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

//===========================================================================//

/// A slave device mapped into a bus's address space.
///
/// The surrounding simulator implements this trait for each device model
/// (memories, peripherals) and registers the device with the bus.  The claim
/// predicate must be pure: the arbiter calls it for every registered slave
/// before deciding whether to dispatch at all.
pub trait BusSlave {
    /// Returns a human-readable description of this device, for memory-map
    /// display.
    fn description(&self) -> String;

    /// Returns the address range this device is mapped at.
    fn mapped_range(&self) -> Range;

    /// Returns true if this device claims the given transaction, based on
    /// address-range membership and operation legality.  Must not have side
    /// effects.
    fn can_handle(&self, transaction: &Transaction) -> bool;

    /// Services the given transaction.  Called only when this device was the
    /// unique claimant; this is the only point at which device state may
    /// mutate.  The handler may attach a device-local error (e.g. a
    /// misaligned access) to the transaction.
    fn handle(&mut self, transaction: &mut Transaction);
}

//===========================================================================//

/// A passive observer of bus traffic.
///
/// Sniffers are notified of every successfully dispatched, non-hidden
/// transaction, in registration order.  By the time a sniffer sees a
/// transaction it is guaranteed to be error-free and non-hidden.
pub trait BusSniffer {
    /// Observes one dispatched transaction.
    fn sniff(&mut self, transaction: &Transaction);
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::BusId;

    #[test]
    fn create_bus_id() {
        let id1 = BusId::create();
        let id2 = BusId::create();
        let id3 = id1;
        assert_ne!(id1, id2);
        assert_eq!(id1, id3);
    }
}

//===========================================================================//
