use socbus::addr::Addr;
use socbus::bus::{
    AccessSize, BusError, BusSlave, BusSniffer, RamSlave, RomSlave, SocBus,
    StateStore, Transaction,
};
use std::cell::RefCell;
use std::rc::Rc;

//===========================================================================//

const RAM_BASE: u32 = 0x0000_0000;
const ROM_BASE: u32 = 0x1000_0000;

fn make_test_bus() -> SocBus {
    let mut bus = SocBus::new();
    let ram = RamSlave::new(
        Addr::from(RAM_BASE),
        vec![0u8; 0x1000].into_boxed_slice(),
    );
    let mut rom_data = vec![0u8; 0x100];
    rom_data[..4].copy_from_slice(&[0x78, 0x56, 0x34, 0x12]);
    let rom = RomSlave::new(
        Addr::from(ROM_BASE),
        rom_data.into_boxed_slice(),
    );
    let ram: Rc<RefCell<dyn BusSlave>> = Rc::new(RefCell::new(ram));
    let rom: Rc<RefCell<dyn BusSlave>> = Rc::new(RefCell::new(rom));
    bus.register_slave(&ram);
    bus.register_slave(&rom);
    bus
}

fn make_running(bus: &SocBus) -> StateStore {
    let mut store = StateStore::new();
    store.ensure_state(bus.id());
    store
}

struct RecordingSniffer {
    addrs: Vec<u32>,
}

impl RecordingSniffer {
    fn register_on(bus: &mut SocBus) -> Rc<RefCell<RecordingSniffer>> {
        let sniffer =
            Rc::new(RefCell::new(RecordingSniffer { addrs: Vec::new() }));
        let handle: Rc<RefCell<dyn BusSniffer>> = sniffer.clone();
        bus.register_sniffer(&handle);
        sniffer
    }
}

impl BusSniffer for RecordingSniffer {
    fn sniff(&mut self, transaction: &Transaction) {
        self.addrs.push(transaction.addr().as_u32());
    }
}

//===========================================================================//

#[test]
fn write_then_read_round_trip() {
    let bus = make_test_bus();
    let mut store = make_running(&bus);

    let mut write = Transaction::write(
        Addr::from(0x0100u16),
        AccessSize::Word,
        0xcafef00d,
    );
    bus.dispatch(&mut store, &mut write);
    assert_eq!(write.error(), None);

    let mut read = Transaction::read(Addr::from(0x0100u16), AccessSize::Word);
    bus.dispatch(&mut store, &mut read);
    assert_eq!(read.error(), None);
    assert_eq!(read.read_data(), 0xcafef00d);

    let history = store.state(bus.id()).unwrap().history();
    assert_eq!(history.len(), 2);
    assert_eq!(history.base_index(), 0);
    assert!(history.entry_at(0).unwrap().transaction().is_write());
    assert!(history.entry_at(1).unwrap().transaction().is_read());
}

#[test]
fn rom_is_readable_but_not_writable() {
    let bus = make_test_bus();
    let mut store = make_running(&bus);

    let mut read = Transaction::read(Addr::from(ROM_BASE), AccessSize::Word);
    bus.dispatch(&mut store, &mut read);
    assert_eq!(read.error(), None);
    assert_eq!(read.read_data(), 0x12345678);

    let mut write =
        Transaction::write(Addr::from(ROM_BASE), AccessSize::Word, 0);
    bus.dispatch(&mut store, &mut write);
    assert_eq!(write.error(), Some(BusError::ReadOnly));

    // The failed write is still visible in the trace.
    let history = store.state(bus.id()).unwrap().history();
    assert_eq!(history.len(), 2);
    assert_eq!(
        history.entry_at(1).unwrap().transaction().error(),
        Some(BusError::ReadOnly)
    );
}

#[test]
fn unmapped_address_gets_no_responder() {
    let bus = make_test_bus();
    let mut store = make_running(&bus);
    let mut read =
        Transaction::read(Addr::from(0x2000_0000u32), AccessSize::Word);
    bus.dispatch(&mut store, &mut read);
    assert_eq!(read.error(), Some(BusError::NoResponder));
}

#[test]
fn overlapping_slaves_get_multiple_slaves_and_no_mutation() {
    let mut bus = make_test_bus();
    let mut store = make_running(&bus);

    let mut write =
        Transaction::write(Addr::from(0x0200u16), AccessSize::Word, 0x11);
    bus.dispatch(&mut store, &mut write);
    assert_eq!(write.error(), None);

    // Map a second RAM over the first one's range.
    let shadow = RamSlave::new(
        Addr::from(RAM_BASE),
        vec![0u8; 0x1000].into_boxed_slice(),
    );
    let shadow: Rc<RefCell<dyn BusSlave>> = Rc::new(RefCell::new(shadow));
    bus.register_slave(&shadow);

    let mut write =
        Transaction::write(Addr::from(0x0200u16), AccessSize::Word, 0x22);
    bus.dispatch(&mut store, &mut write);
    assert_eq!(write.error(), Some(BusError::MultipleSlaves));

    // Removing the overlapping device restores service; the earlier value
    // is intact, proving the ambiguous write never reached the RAM.
    bus.remove_slave(&shadow);
    let mut read = Transaction::read(Addr::from(0x0200u16), AccessSize::Word);
    bus.dispatch(&mut store, &mut read);
    assert_eq!(read.error(), None);
    assert_eq!(read.read_data(), 0x11);
}

#[test]
fn sniffer_sees_successful_visible_transactions_only() {
    let mut bus = make_test_bus();
    let sniffer = RecordingSniffer::register_on(&mut bus);
    let mut store = make_running(&bus);

    let mut ok = Transaction::read(Addr::from(0x0300u16), AccessSize::Word);
    bus.dispatch(&mut store, &mut ok);

    let mut errored =
        Transaction::write(Addr::from(ROM_BASE), AccessSize::Word, 0);
    bus.dispatch(&mut store, &mut errored);

    let mut hidden =
        Transaction::read(Addr::from(0x0304u16), AccessSize::Word);
    hidden.set_hidden();
    bus.dispatch(&mut store, &mut hidden);

    assert_eq!(sniffer.borrow().addrs, vec![0x0300]);
}

#[test]
fn hidden_probe_leaves_no_trace() {
    let bus = make_test_bus();
    let mut store = make_running(&bus);

    let mut write =
        Transaction::write(Addr::from(0x0400u16), AccessSize::Word, 0xab);
    bus.dispatch(&mut store, &mut write);

    let mut probe = Transaction::read(Addr::from(0x0400u16), AccessSize::Word);
    probe.set_hidden();
    bus.dispatch(&mut store, &mut probe);
    assert_eq!(probe.read_data(), 0xab);

    let history = store.state(bus.id()).unwrap().history();
    assert_eq!(history.len(), 1);
}

#[test]
fn reset_pulse_clears_history_and_restarts_indexing() {
    let bus = make_test_bus();
    let mut store = make_running(&bus);

    for offset in [0u16, 4, 8] {
        let mut trans = Transaction::read(
            Addr::from(0x0500 + offset),
            AccessSize::Word,
        );
        bus.dispatch(&mut store, &mut trans);
    }
    assert_eq!(store.state(bus.id()).unwrap().history().len(), 3);

    bus.set_reset(&mut store, true);
    assert!(store.state(bus.id()).unwrap().history().is_empty());

    // Holding the line high is not another edge.
    bus.set_reset(&mut store, true);
    bus.set_reset(&mut store, false);

    let mut trans = Transaction::read(Addr::from(0x0500u16), AccessSize::Word);
    bus.dispatch(&mut store, &mut trans);
    let history = store.state(bus.id()).unwrap().history();
    assert_eq!(history.entry_at(0).unwrap().index(), 0);
}

#[test]
fn bus_instances_are_independent() {
    let first = make_test_bus();
    let second = make_test_bus();
    let mut store = StateStore::new();
    store.ensure_state(first.id());
    store.ensure_state(second.id());

    let mut trans = Transaction::read(Addr::from(0x0600u16), AccessSize::Word);
    first.dispatch(&mut store, &mut trans);

    assert_eq!(store.state(first.id()).unwrap().history().len(), 1);
    assert!(store.state(second.id()).unwrap().history().is_empty());
}

#[test]
fn snapshotted_state_is_unaffected_by_later_dispatch() {
    let bus = make_test_bus();
    let mut store = make_running(&bus);

    let mut trans = Transaction::read(Addr::from(0x0700u16), AccessSize::Word);
    bus.dispatch(&mut store, &mut trans);
    let snapshot = store.state(bus.id()).unwrap().clone();

    let mut trans = Transaction::read(Addr::from(0x0704u16), AccessSize::Word);
    bus.dispatch(&mut store, &mut trans);

    assert_eq!(store.state(bus.id()).unwrap().history().len(), 2);
    assert_eq!(snapshot.history().len(), 1);
}

//===========================================================================//
