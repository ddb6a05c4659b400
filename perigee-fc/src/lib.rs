//! Flight-computer glue: the perpetual tasks that wire the core logic to
//! the cooperative runtime, and the serial seam they pull bytes through.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod ingest;
pub mod serial;
pub mod tasks;

pub use ingest::PositionIngest;
pub use serial::SerialPort;
pub use tasks::{flight_phase_task, position_ingest_task, wait_for_phase};
