//! Simulation core for system-on-chip (SoC) memory buses.

#![warn(missing_docs)]

pub mod addr;
pub mod bus;
pub mod parse;
