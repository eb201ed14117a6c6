//! Call frames and the per-frame gas counter.

use crate::{Halt, JumpTable, Memory, Stack};
use alloy_primitives::{Address, Bytes, U256};

/// A frame's gas counter.
///
/// # Example
/// ```
/// # use fovea_vm::Gas;
/// let mut gas = Gas::new(100);
/// gas.charge(30).unwrap();
/// assert_eq!(gas.remaining(), 70);
/// assert_eq!(gas.spent(), 30);
/// assert!(gas.charge(71).is_err());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Gas {
    /// Gas the frame started with.
    limit: u64,
    /// Gas still available.
    remaining: u64,
}

impl Gas {
    /// A fresh counter holding `limit` gas.
    #[must_use]
    pub const fn new(limit: u64) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    /// Gas the frame started with.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Gas still available.
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Gas consumed so far.
    #[must_use]
    pub const fn spent(&self) -> u64 {
        self.limit - self.remaining
    }

    /// Deducts `cost`.
    ///
    /// # Errors
    /// Returns [`Halt::OutOfGas`] if the charge exceeds the remaining gas;
    /// the counter is left untouched in that case.
    #[inline]
    pub fn charge(&mut self, cost: u64) -> Result<(), Halt> {
        self.remaining = self.remaining.checked_sub(cost).ok_or(Halt::OutOfGas)?;
        Ok(())
    }

    /// Consumes everything that is left. Used on exceptional halts.
    pub fn consume_all(&mut self) {
        self.remaining = 0;
    }

    /// Returns gas to the counter: a child call's unspent remainder.
    pub fn reclaim(&mut self, amount: u64) {
        self.remaining = self.remaining.saturating_add(amount);
    }
}

/// One call context: bytecode, program counter, stack, memory, gas and the
/// addresses the code runs under.
pub struct Frame {
    /// The code being executed.
    pub code: Bytes,
    /// Valid jump destinations of `code`.
    pub jump_table: JumpTable,
    /// Program counter, an offset into `code`.
    pub pc: usize,
    /// Gas counter.
    pub gas: Gas,
    /// Operand stack.
    pub stack: Stack,
    /// Frame memory.
    pub memory: Memory,
    /// Call data.
    pub input: Bytes,
    /// Account the code executes as (`ADDRESS`, storage owner).
    pub address: Address,
    /// Account that made the call (`CALLER`).
    pub caller: Address,
    /// Apparent value of the call (`CALLVALUE`).
    pub value: U256,
    /// Whether state mutation is forbidden (`STATICCALL` context).
    pub is_static: bool,
    /// Output of the most recent child call.
    pub return_data: Bytes,
    /// Bytes this frame returns or reverts with.
    pub output: Bytes,
}

impl Frame {
    /// Builds a frame ready to execute from its first instruction.
    #[must_use]
    pub fn new(
        code: Bytes,
        input: Bytes,
        address: Address,
        caller: Address,
        value: U256,
        gas_limit: u64,
        is_static: bool,
    ) -> Self {
        let jump_table = JumpTable::analyze(&code);
        Self {
            code,
            jump_table,
            pc: 0,
            gas: Gas::new(gas_limit),
            stack: Stack::new(),
            memory: Memory::new(),
            input,
            address,
            caller,
            value,
            is_static,
            return_data: Bytes::new(),
            output: Bytes::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gas_accounting() {
        let mut gas = Gas::new(10);
        gas.charge(4).unwrap();
        gas.reclaim(2);
        assert_eq!(gas.remaining(), 8);
        assert_eq!(gas.spent(), 2);
        assert_eq!(gas.charge(9), Err(Halt::OutOfGas));
        // A failed charge leaves the counter alone.
        assert_eq!(gas.remaining(), 8);
        gas.consume_all();
        assert_eq!(gas.remaining(), 0);
        assert_eq!(gas.spent(), 10);
    }

    #[test]
    fn frame_analyzes_its_code() {
        let frame = Frame::new(
            Bytes::from(vec![0x60, 0x00, 0x5B]),
            Bytes::new(),
            Address::ZERO,
            Address::ZERO,
            U256::ZERO,
            1_000,
            false,
        );
        assert!(frame.jump_table.is_valid(2));
        assert!(!frame.jump_table.is_valid(1));
    }
}
