// lib.rs
#![no_std]

pub mod blackboard;
pub mod datacells;
pub mod flight;
pub mod gps;
pub mod types;

pub use blackboard::FlightShared;
pub use datacells::DataCell;
pub use flight::*;
pub use gps::types::*;
pub use types::*;
