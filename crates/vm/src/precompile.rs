//! Precompiled contract dispatch.
//!
//! The core owns the address table and the calling convention; the
//! cryptographic implementations live with the host. Only the data-copy
//! precompile at `0x04` ships built in, since it needs no external math.

use crate::gas;
use alloy_primitives::{Address, Bytes};
use std::collections::HashMap;

/// Outcome of a precompile invocation.
#[derive(Clone, Debug)]
pub struct PrecompileOutcome {
    /// Output bytes, empty on failure.
    pub output: Bytes,
    /// Gas left from the forwarded amount.
    pub gas_left: u64,
    /// Whether the invocation succeeded.
    pub success: bool,
}

/// A precompile handler: `(input, gas_limit)` to output, gas left and status.
pub type PrecompileFn = fn(&[u8], u64) -> PrecompileOutcome;

/// The fixed low-address precompile table.
///
/// # Example
/// ```
/// # use fovea_vm::Precompiles;
/// let precompiles = Precompiles::standard();
/// assert!(precompiles.handler(Precompiles::address(0x04)).is_some());
/// assert!(precompiles.handler(Precompiles::address(0x01)).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Precompiles {
    /// Registered handlers by address.
    handlers: HashMap<Address, PrecompileFn>,
}

impl Precompiles {
    /// The table with the built-in data-copy handler registered.
    #[must_use]
    pub fn standard() -> Self {
        let mut precompiles = Self::default();
        precompiles.register(Self::address(0x04), data_copy);
        precompiles
    }

    /// The address of the precompile with the given index: twenty bytes with
    /// the index in the last position.
    #[must_use]
    pub fn address(index: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = index;
        Address::from(bytes)
    }

    /// Registers (or replaces) a handler.
    pub fn register(&mut self, address: Address, handler: PrecompileFn) {
        self.handlers.insert(address, handler);
    }

    /// Handler registered at the address, if any.
    #[must_use]
    pub fn handler(&self, address: Address) -> Option<PrecompileFn> {
        self.handlers.get(&address).copied()
    }
}

/// The identity precompile at `0x04`: echoes its input at 15 gas plus 3 per
/// word.
fn data_copy(input: &[u8], gas_limit: u64) -> PrecompileOutcome {
    let cost = 15 + 3 * gas::words(input.len());
    match gas_limit.checked_sub(cost) {
        Some(gas_left) => PrecompileOutcome {
            output: Bytes::copy_from_slice(input),
            gas_left,
            success: true,
        },
        None => PrecompileOutcome {
            output: Bytes::new(),
            gas_left: 0,
            success: false,
        },
    }
}
