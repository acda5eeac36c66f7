use super::BusSlave;
use std::cell::RefCell;
use std::rc::Rc;

//===========================================================================//

/// The ordered set of slave devices registered on a bus.
///
/// Slaves are kept in registration order, which is the order the arbiter
/// scans them in.  Membership is by identity: registering a second handle to
/// an already-registered device is a no-op, as is removing a device that is
/// not present.
pub struct SlaveRegistry {
    slaves: Vec<Rc<RefCell<dyn BusSlave>>>,
}

impl SlaveRegistry {
    /// Constructs an empty registry.
    pub fn new() -> SlaveRegistry {
        SlaveRegistry { slaves: Vec::new() }
    }

    /// Adds a slave device to the registry if it is not already present.
    pub fn register(&mut self, slave: &Rc<RefCell<dyn BusSlave>>) {
        if !self.contains(slave) {
            self.slaves.push(Rc::clone(slave));
        }
    }

    /// Removes a slave device from the registry if it is present.
    pub fn remove(&mut self, slave: &Rc<RefCell<dyn BusSlave>>) {
        self.slaves.retain(|member| !Rc::ptr_eq(member, slave));
    }

    /// Returns the registered slaves, in registration order.
    pub fn slaves(&self) -> &[Rc<RefCell<dyn BusSlave>>] {
        &self.slaves
    }

    /// Returns the number of registered slaves.
    pub fn len(&self) -> usize {
        self.slaves.len()
    }

    /// Returns true if no slaves are registered.
    pub fn is_empty(&self) -> bool {
        self.slaves.is_empty()
    }

    /// Returns true if the given slave's mapped range overlaps that of any
    /// other registered slave, indicating a memory-map misconfiguration
    /// that will make transactions in the shared range fail with
    /// [`BusError::MultipleSlaves`](super::BusError::MultipleSlaves).
    pub fn overlaps_another(
        &self,
        slave: &Rc<RefCell<dyn BusSlave>>,
    ) -> bool {
        let range = slave.borrow().mapped_range();
        self.slaves.iter().any(|member| {
            !Rc::ptr_eq(member, slave)
                && member.borrow().mapped_range().overlaps(range)
        })
    }

    fn contains(&self, slave: &Rc<RefCell<dyn BusSlave>>) -> bool {
        self.slaves.iter().any(|member| Rc::ptr_eq(member, slave))
    }
}

impl Default for SlaveRegistry {
    fn default() -> SlaveRegistry {
        SlaveRegistry::new()
    }
}

//===========================================================================//


//===========================================================================//
