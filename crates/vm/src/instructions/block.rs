//! Block information operations.

use super::address_to_word;
use crate::{Evm, Frame, Halt, interpreter::Control};
use alloy_primitives::U256;
use state::Backend;

/// Hash of one of the 256 most recent blocks; zero outside that window.
pub(crate) fn blockhash<B: Backend>(evm: &Evm<B>, frame: &mut Frame) -> Result<Control, Halt> {
    let requested = frame.stack.pop()?;
    let current = evm.block.number;

    let hash = u64::try_from(requested)
        .ok()
        .filter(|number| *number < current && current - number <= 256)
        .and_then(|number| evm.block.block_hashes.get(&number))
        .map_or(U256::ZERO, |hash| U256::from_be_bytes(hash.0));

    frame.stack.push(hash)?;
    Ok(Control::Continue)
}

pub(crate) fn coinbase<B: Backend>(evm: &Evm<B>, frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(address_to_word(evm.block.coinbase))?;
    Ok(Control::Continue)
}

pub(crate) fn timestamp<B: Backend>(evm: &Evm<B>, frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(U256::from(evm.block.timestamp))?;
    Ok(Control::Continue)
}

pub(crate) fn number<B: Backend>(evm: &Evm<B>, frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(U256::from(evm.block.number))?;
    Ok(Control::Continue)
}

/// The randomness beacon value since Paris; the block difficulty before.
pub(crate) fn prevrandao<B: Backend>(evm: &Evm<B>, frame: &mut Frame) -> Result<Control, Halt> {
    frame
        .stack
        .push(U256::from_be_bytes(evm.block.prev_randao.0))?;
    Ok(Control::Continue)
}

pub(crate) fn gaslimit<B: Backend>(evm: &Evm<B>, frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(U256::from(evm.block.gas_limit))?;
    Ok(Control::Continue)
}

pub(crate) fn chainid<B: Backend>(evm: &Evm<B>, frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(U256::from(evm.chain_id))?;
    Ok(Control::Continue)
}

pub(crate) fn selfbalance<B: Backend>(evm: &Evm<B>, frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(evm.journal.balance(frame.address))?;
    Ok(Control::Continue)
}

pub(crate) fn basefee<B: Backend>(evm: &Evm<B>, frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(evm.block.base_fee)?;
    Ok(Control::Continue)
}

/// Versioned hash of the transaction's blob at the given index; zero past the
/// end (EIP-4844).
pub(crate) fn blobhash<B: Backend>(evm: &Evm<B>, frame: &mut Frame) -> Result<Control, Halt> {
    let index = frame.stack.pop()?;
    let hash = usize::try_from(index)
        .ok()
        .and_then(|index| evm.tx.blob_hashes.get(index))
        .map_or(U256::ZERO, |hash| U256::from_be_bytes(hash.0));
    frame.stack.push(hash)?;
    Ok(Control::Continue)
}

pub(crate) fn blobbasefee<B: Backend>(evm: &Evm<B>, frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(evm.block.blob_base_fee)?;
    Ok(Control::Continue)
}
