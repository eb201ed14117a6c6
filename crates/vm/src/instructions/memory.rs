//! Memory operations.

use crate::{
    Frame, Halt, gas,
    interpreter::Control,
    memory::{range_end, usize_size},
};
use alloy_primitives::U256;

pub(crate) fn mload(frame: &mut Frame) -> Result<Control, Halt> {
    let offset = frame.stack.pop()?;
    let end = range_end(offset, 32)?;
    frame.gas.charge(frame.memory.expansion_cost(end))?;
    frame.memory.grow(end);
    frame.stack.push(frame.memory.load_word(end - 32))?;
    Ok(Control::Continue)
}

pub(crate) fn mstore(frame: &mut Frame) -> Result<Control, Halt> {
    let offset = frame.stack.pop()?;
    let value = frame.stack.pop()?;
    let end = range_end(offset, 32)?;
    frame.gas.charge(frame.memory.expansion_cost(end))?;
    frame.memory.grow(end);
    frame.memory.store_word(end - 32, value);
    Ok(Control::Continue)
}

pub(crate) fn mstore8(frame: &mut Frame) -> Result<Control, Halt> {
    let offset = frame.stack.pop()?;
    let value = frame.stack.pop()?;
    let end = range_end(offset, 1)?;
    frame.gas.charge(frame.memory.expansion_cost(end))?;
    frame.memory.grow(end);
    frame.memory.store_byte(end - 1, value.byte(0));
    Ok(Control::Continue)
}

pub(crate) fn msize(frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(U256::from(frame.memory.len()))?;
    Ok(Control::Continue)
}

/// Overlap-safe memory copy (EIP-5656, Cancun+).
pub(crate) fn mcopy(frame: &mut Frame) -> Result<Control, Halt> {
    let dest = frame.stack.pop()?;
    let source = frame.stack.pop()?;
    let size = frame.stack.pop()?;

    let size = usize_size(size)?;
    if size == 0 {
        return Ok(Control::Continue);
    }
    frame.gas.charge(gas::copy_cost(size)?)?;

    let dest_end = range_end(dest, size)?;
    let source_end = range_end(source, size)?;
    let end = dest_end.max(source_end);
    frame.gas.charge(frame.memory.expansion_cost(end))?;
    frame.memory.grow(end);

    frame
        .memory
        .copy_within(dest_end - size, source_end - size, size);
    Ok(Control::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::tests::frame_with_stack;

    #[test]
    fn mstore_then_mload_round_trips() {
        let mut frame = frame_with_stack(&[U256::from(42), U256::from(64)]);
        mstore(&mut frame).unwrap();
        assert_eq!(frame.memory.len(), 96);
        // 3 words of expansion.
        assert_eq!(frame.gas.spent(), 9);

        frame.stack.push(U256::from(64)).unwrap();
        mload(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), U256::from(42));
        // No further expansion.
        assert_eq!(frame.gas.spent(), 9);
    }

    #[test]
    fn mstore8_writes_the_low_byte(){
        let mut frame = frame_with_stack(&[U256::from(0x1234), U256::ZERO]);
        mstore8(&mut frame).unwrap();
        assert_eq!(frame.memory.slice(0, 1), &[0x34]);
        assert_eq!(frame.memory.len(), 32);
    }

    #[test]
    fn mcopy_handles_overlap() {
        let mut frame = frame_with_stack(&[U256::from(8)]);
        frame.memory.grow(32);
        for i in 0..8 {
            frame.memory.store_byte(i, i as u8 + 1);
        }
        frame.stack.push(U256::ZERO).unwrap(); // source
        frame.stack.push(U256::from(4)).unwrap(); // dest
        // Stack is now dest, source, size from the top.
        mcopy(&mut frame).unwrap();
        assert_eq!(frame.memory.slice(4, 8), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn huge_offset_is_out_of_gas() {
        let mut frame = frame_with_stack(&[U256::MAX]);
        assert_eq!(mload(&mut frame), Err(Halt::OutOfGas));
    }
}
