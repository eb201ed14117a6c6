//! Ethereum execution-layer upgrades and the rules they activate.

#![deny(unsafe_code)]

mod eip;
mod fork;

pub use eip::{Eip, MAX_CODE_SIZE, MAX_INITCODE_SIZE};
pub use fork::Fork;
