//! Instruction handlers, grouped by family.
//!
//! Each handler implements one opcode's semantics: pop operands, charge any
//! dynamic gas, mutate the frame or the journaled state, and report how the
//! interpreter loop should continue. Static per-opcode gas is charged by the
//! loop before the handler runs.

pub(crate) mod arithmetic;
pub(crate) mod bitwise;
pub(crate) mod block;
pub(crate) mod environment;
pub(crate) mod flow;
mod i256;
pub(crate) mod logging;
pub(crate) mod memory;
pub(crate) mod stack;
pub(crate) mod storage;
pub(crate) mod system;

use crate::{Frame, Halt, gas, memory::range_end, memory::usize_size};
use alloy_primitives::{Address, B256, U256};

/// Widens an address to the word the stack carries.
pub(crate) fn address_to_word(address: Address) -> U256 {
    U256::from_be_bytes(address.into_word().0)
}

/// Truncates a stack word to its low 20 bytes, the address interpretation.
pub(crate) fn word_to_address(word: U256) -> Address {
    Address::from_word(B256::from(word.to_be_bytes::<32>()))
}

/// Shared body of the `*COPY` family: charge per-word copy gas and memory
/// expansion, then write `source[offset..offset + size]` to memory at `dest`,
/// zero-padding reads past the end of the source.
pub(crate) fn copy_to_memory(
    frame: &mut Frame,
    dest: U256,
    offset: U256,
    size: U256,
    source: &[u8],
) -> Result<(), Halt> {
    let size = usize_size(size)?;
    if size == 0 {
        return Ok(());
    }
    frame.gas.charge(gas::copy_cost(size)?)?;
    let end = range_end(dest, size)?;
    frame.gas.charge(frame.memory.expansion_cost(end))?;
    frame.memory.grow(end);

    let start = usize::try_from(offset).unwrap_or(usize::MAX);
    let source = source.get(start..).unwrap_or(&[]);
    let dest = end - size;
    frame.memory.store_padded(dest, size, source);
    Ok(())
}
