use super::{BusId, TraceHistory};
use std::collections::HashMap;

//===========================================================================//

/// The per-instance simulation state of one bus component.
///
/// Each simulated bus instance owns exactly one `BusState`; cloning it (e.g.
/// when the simulator snapshots state for rewind) yields a fully independent
/// trace history.
#[derive(Clone, Debug)]
pub struct BusState {
    history: TraceHistory,
    old_reset: bool,
}

impl BusState {
    /// Constructs the state for a freshly started simulation.
    pub fn new() -> BusState {
        BusState { history: TraceHistory::new(), old_reset: false }
    }

    /// Returns the trace history for this bus instance.
    pub fn history(&self) -> &TraceHistory {
        &self.history
    }

    /// Returns the trace history for this bus instance, mutably.
    pub fn history_mut(&mut self) -> &mut TraceHistory {
        &mut self.history
    }

    /// Updates the level of the simulated reset line.  A rising transition
    /// (false to true) clears the trace history; any other transition leaves
    /// it untouched.
    pub fn set_reset(&mut self, reset: bool) {
        if !self.old_reset && reset {
            self.history.clear();
        }
        self.old_reset = reset;
    }
}

impl Default for BusState {
    fn default() -> BusState {
        BusState::new()
    }
}

//===========================================================================//

/// A keyed store mapping bus components to their running simulation state.
///
/// The surrounding simulator owns one store per simulation and passes it to
/// [`SocBus::dispatch`](super::SocBus::dispatch); multiple bus instances
/// keyed by distinct [`BusId`]s are fully independent.
pub struct StateStore {
    states: HashMap<BusId, BusState>,
}

impl StateStore {
    /// Constructs an empty store.
    pub fn new() -> StateStore {
        StateStore { states: HashMap::new() }
    }

    /// Returns the state for the given bus, if the simulation has created
    /// one.
    pub fn state(&self, id: BusId) -> Option<&BusState> {
        self.states.get(&id)
    }

    /// Returns the state for the given bus mutably, if the simulation has
    /// created one.
    pub fn state_mut(&mut self, id: BusId) -> Option<&mut BusState> {
        self.states.get_mut(&id)
    }

    /// Returns the state for the given bus, creating a fresh one if the bus
    /// has none yet.
    pub fn ensure_state(&mut self, id: BusId) -> &mut BusState {
        self.states.entry(id).or_default()
    }

    /// Discards the state for the given bus, if any.
    pub fn remove_state(&mut self, id: BusId) {
        self.states.remove(&id);
    }
}

impl Default for StateStore {
    fn default() -> StateStore {
        StateStore::new()
    }
}

//===========================================================================//


//===========================================================================//
