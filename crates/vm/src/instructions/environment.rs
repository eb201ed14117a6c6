//! Environmental information operations.

use super::{address_to_word, copy_to_memory, word_to_address};
use crate::{Evm, Frame, Halt, gas, interpreter::Control, memory::usize_size};
use alloy_primitives::{U256, keccak256};
use state::Backend;

pub(crate) fn address(frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(address_to_word(frame.address))?;
    Ok(Control::Continue)
}

pub(crate) fn balance<B: Backend>(evm: &mut Evm<B>, frame: &mut Frame) -> Result<Control, Halt> {
    let account = word_to_address(frame.stack.pop()?);
    let was_cold = evm.journal.touch_address(account);
    frame.gas.charge(gas::account_access(evm.fork, was_cold))?;
    frame.stack.push(evm.journal.balance(account))?;
    Ok(Control::Continue)
}

pub(crate) fn origin<B: Backend>(evm: &Evm<B>, frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(address_to_word(evm.tx.caller))?;
    Ok(Control::Continue)
}

pub(crate) fn caller(frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(address_to_word(frame.caller))?;
    Ok(Control::Continue)
}

pub(crate) fn callvalue(frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(frame.value)?;
    Ok(Control::Continue)
}

/// Reads a 32-byte word of calldata, zero-padded past the end.
pub(crate) fn calldataload(frame: &mut Frame) -> Result<Control, Halt> {
    let offset = frame.stack.pop()?;
    let mut word = [0u8; 32];
    if let Ok(offset) = usize::try_from(offset) {
        if offset < frame.input.len() {
            let available = (frame.input.len() - offset).min(32);
            word[..available].copy_from_slice(&frame.input[offset..offset + available]);
        }
    }
    frame.stack.push(U256::from_be_bytes(word))?;
    Ok(Control::Continue)
}

pub(crate) fn calldatasize(frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(U256::from(frame.input.len()))?;
    Ok(Control::Continue)
}

pub(crate) fn calldatacopy(frame: &mut Frame) -> Result<Control, Halt> {
    let dest = frame.stack.pop()?;
    let offset = frame.stack.pop()?;
    let size = frame.stack.pop()?;
    let input = frame.input.clone();
    copy_to_memory(frame, dest, offset, size, &input)?;
    Ok(Control::Continue)
}

pub(crate) fn codesize(frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(U256::from(frame.code.len()))?;
    Ok(Control::Continue)
}

pub(crate) fn codecopy(frame: &mut Frame) -> Result<Control, Halt> {
    let dest = frame.stack.pop()?;
    let offset = frame.stack.pop()?;
    let size = frame.stack.pop()?;
    let code = frame.code.clone();
    copy_to_memory(frame, dest, offset, size, &code)?;
    Ok(Control::Continue)
}

pub(crate) fn gasprice<B: Backend>(evm: &Evm<B>, frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(evm.tx.gas_price)?;
    Ok(Control::Continue)
}

pub(crate) fn extcodesize<B: Backend>(
    evm: &mut Evm<B>,
    frame: &mut Frame,
) -> Result<Control, Halt> {
    let account = word_to_address(frame.stack.pop()?);
    let was_cold = evm.journal.touch_address(account);
    frame.gas.charge(gas::account_access(evm.fork, was_cold))?;
    frame.stack.push(U256::from(evm.journal.code(account).len()))?;
    Ok(Control::Continue)
}

pub(crate) fn extcodecopy<B: Backend>(
    evm: &mut Evm<B>,
    frame: &mut Frame,
) -> Result<Control, Halt> {
    let account = word_to_address(frame.stack.pop()?);
    let dest = frame.stack.pop()?;
    let offset = frame.stack.pop()?;
    let size = frame.stack.pop()?;

    let was_cold = evm.journal.touch_address(account);
    frame.gas.charge(gas::account_access(evm.fork, was_cold))?;

    let code = evm.journal.code(account);
    copy_to_memory(frame, dest, offset, size, &code)?;
    Ok(Control::Continue)
}

/// Hash of an account's code; zero for accounts that are dead per EIP-161.
pub(crate) fn extcodehash<B: Backend>(
    evm: &mut Evm<B>,
    frame: &mut Frame,
) -> Result<Control, Halt> {
    let account = word_to_address(frame.stack.pop()?);
    let was_cold = evm.journal.touch_address(account);
    frame.gas.charge(gas::account_access(evm.fork, was_cold))?;

    let hash = if evm.journal.is_empty(account) {
        U256::ZERO
    } else {
        U256::from_be_bytes(keccak256(evm.journal.code(account)).0)
    };
    frame.stack.push(hash)?;
    Ok(Control::Continue)
}

pub(crate) fn returndatasize(frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(U256::from(frame.return_data.len()))?;
    Ok(Control::Continue)
}

/// Unlike the other copies, reading past the end of the return-data buffer is
/// a hard failure (EIP-211).
pub(crate) fn returndatacopy(frame: &mut Frame) -> Result<Control, Halt> {
    let dest = frame.stack.pop()?;
    let offset = frame.stack.pop()?;
    let size = frame.stack.pop()?;

    let size_usize = usize_size(size).map_err(|_| Halt::OutOfOffset)?;
    let end = usize::try_from(offset)
        .ok()
        .and_then(|offset| offset.checked_add(size_usize))
        .ok_or(Halt::OutOfOffset)?;
    if end > frame.return_data.len() {
        return Err(Halt::OutOfOffset);
    }

    let data = frame.return_data.clone();
    copy_to_memory(frame, dest, offset, size, &data)?;
    Ok(Control::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::tests::frame_with_stack;
    use alloy_primitives::Bytes;

    #[test]
    fn calldataload_zero_pads() {
        let mut frame = frame_with_stack(&[U256::from(1)]);
        frame.input = Bytes::from(vec![0xAA, 0xBB]);
        calldataload(&mut frame).unwrap();
        let mut expected = [0u8; 32];
        expected[0] = 0xBB;
        assert_eq!(frame.stack.pop().unwrap(), U256::from_be_bytes(expected));

        // Far past the end: all zeros.
        let mut frame = frame_with_stack(&[U256::MAX]);
        frame.input = Bytes::from(vec![0xAA]);
        calldataload(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), U256::ZERO);
    }

    #[test]
    fn returndatacopy_checks_bounds() {
        // Copy 3 bytes from offset 2 of a 4-byte buffer: out of bounds.
        let mut frame = frame_with_stack(&[U256::from(3), U256::from(2), U256::ZERO]);
        frame.return_data = Bytes::from(vec![1, 2, 3, 4]);
        assert_eq!(returndatacopy(&mut frame), Err(Halt::OutOfOffset));

        // An in-bounds copy succeeds.
        let mut frame = frame_with_stack(&[U256::from(2), U256::from(2), U256::ZERO]);
        frame.return_data = Bytes::from(vec![1, 2, 3, 4]);
        returndatacopy(&mut frame).unwrap();
        assert_eq!(frame.memory.slice(0, 2), &[3, 4]);
    }
}
