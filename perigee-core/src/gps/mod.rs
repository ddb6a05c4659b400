// gps/mod.rs
pub mod decoder;
pub mod frame;
pub mod types;

pub use decoder::*;
pub use frame::*;
pub use types::*;
