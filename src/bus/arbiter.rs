use super::{
    BusError, BusId, BusSlave, BusSniffer, SlaveRegistry, StateStore,
    Transaction,
};
use std::cell::RefCell;
use std::rc::Rc;

//===========================================================================//

/// One simulated SoC bus: the slave registry, the sniffer set, and the
/// transaction arbitration engine.
///
/// Masters submit transactions through [`dispatch`](Self::dispatch), which
/// routes each one to exactly one responding slave (or attaches an error),
/// fans it out to sniffers, and records it in the bus's trace history.
///
/// Slave handlers must not dispatch further transactions on the same bus;
/// the registry and trace are not reentrant-safe (the `RefCell` borrow
/// discipline will panic on such nesting).
pub struct SocBus {
    id: BusId,
    slaves: SlaveRegistry,
    sniffers: Vec<Rc<RefCell<dyn BusSniffer>>>,
    show_trace: bool,
}

impl SocBus {
    /// Constructs a bus with no slaves and no sniffers.
    pub fn new() -> SocBus {
        SocBus {
            id: BusId::create(),
            slaves: SlaveRegistry::new(),
            sniffers: Vec::new(),
            show_trace: true,
        }
    }

    /// Returns the identity token keying this bus's state in a
    /// [`StateStore`].
    pub fn id(&self) -> BusId {
        self.id
    }

    /// Adds a slave device to this bus if it is not already registered.
    pub fn register_slave(&mut self, slave: &Rc<RefCell<dyn BusSlave>>) {
        self.slaves.register(slave);
    }

    /// Removes a slave device from this bus if it is registered.
    pub fn remove_slave(&mut self, slave: &Rc<RefCell<dyn BusSlave>>) {
        self.slaves.remove(slave);
    }

    /// Returns the registry of slave devices on this bus.
    pub fn slaves(&self) -> &SlaveRegistry {
        &self.slaves
    }

    /// Adds a sniffer to this bus if it is not already registered.
    pub fn register_sniffer(
        &mut self,
        sniffer: &Rc<RefCell<dyn BusSniffer>>,
    ) {
        if !self.sniffers.iter().any(|member| Rc::ptr_eq(member, sniffer)) {
            self.sniffers.push(Rc::clone(sniffer));
        }
    }

    /// Removes a sniffer from this bus if it is registered.
    pub fn remove_sniffer(
        &mut self,
        sniffer: &Rc<RefCell<dyn BusSniffer>>,
    ) {
        self.sniffers.retain(|member| !Rc::ptr_eq(member, sniffer));
    }

    /// Returns true if dispatch should request a repaint of the trace
    /// display when the history changes.
    pub fn show_trace(&self) -> bool {
        self.show_trace
    }

    /// Sets whether dispatch should request trace-display repaints.  This
    /// never affects arbitration semantics.
    pub fn set_show_trace(&mut self, show_trace: bool) {
        self.show_trace = show_trace;
    }

    /// Updates the level of this bus's reset line.  A rising transition
    /// clears the trace history.
    pub fn set_reset(&self, store: &mut StateStore, reset: bool) {
        if let Some(state) = store.state_mut(self.id) {
            state.set_reset(reset);
        }
    }

    /// Arbitrates and dispatches one transaction.
    ///
    /// Exactly one of the following happens, checked in this order: the
    /// registry is empty ([`BusError::NoSlaves`]); the transaction requests
    /// read and write without being atomic
    /// ([`BusError::NonAtomicReadWrite`]); no slave claims it
    /// ([`BusError::NoResponder`]); more than one slave claims it
    /// ([`BusError::MultipleSlaves`], with no handler invoked); or exactly
    /// one slave claims it and its handler runs, possibly attaching a
    /// slave-local error.  All registered slaves are scanned before any
    /// handler runs, so an ambiguous match never causes a partial side
    /// effect.
    ///
    /// Afterward, error-free non-hidden transactions are passed to every
    /// sniffer in registration order, and all non-hidden transactions
    /// (errored or not) are appended to the bus's trace history in `store`
    /// (skipped if the store holds no state for this bus).  Returns true if
    /// the history changed and this bus is configured to show its trace,
    /// i.e. if the caller should repaint the trace display.
    pub fn dispatch(
        &self,
        store: &mut StateStore,
        transaction: &mut Transaction,
    ) -> bool {
        if self.slaves.is_empty() {
            transaction.set_error(BusError::NoSlaves);
        } else if transaction.is_read()
            && transaction.is_write()
            && !transaction.is_atomic()
        {
            transaction.set_error(BusError::NonAtomicReadWrite);
        } else {
            let mut num_responders = 0;
            let mut responder = None;
            for slave in self.slaves.slaves() {
                if slave.borrow().can_handle(transaction) {
                    num_responders += 1;
                    responder = Some(slave);
                }
            }
            match (num_responders, responder) {
                (0, _) => transaction.set_error(BusError::NoResponder),
                (1, Some(slave)) => slave.borrow_mut().handle(transaction),
                _ => transaction.set_error(BusError::MultipleSlaves),
            }
        }
        if !transaction.has_error() && !transaction.is_hidden() {
            for sniffer in &self.sniffers {
                sniffer.borrow_mut().sniff(transaction);
            }
        }
        let mut repaint = false;
        if !transaction.is_hidden()
            && let Some(state) = store.state_mut(self.id)
        {
            state.history_mut().append(Rc::new(transaction.clone()));
            repaint = self.show_trace;
        }
        repaint
    }
}

impl Default for SocBus {
    fn default() -> SocBus {
        SocBus::new()
    }
}

//===========================================================================//


//===========================================================================//
