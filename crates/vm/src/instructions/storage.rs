//! Storage operations.

use crate::{Evm, Frame, Halt, gas, interpreter::Control};
use forks::Eip;
use state::Backend;

pub(crate) fn sload<B: Backend>(evm: &mut Evm<B>, frame: &mut Frame) -> Result<Control, Halt> {
    let slot = frame.stack.pop()?;
    let was_cold = evm.journal.touch_slot(frame.address, slot);
    frame.gas.charge(gas::sload_access(evm.fork, was_cold))?;
    frame.stack.push(evm.journal.storage(frame.address, slot))?;
    Ok(Control::Continue)
}

/// The fork-exact `SSTORE`: stipend guard, cold-slot surcharge, then the
/// per-case cost and refund from the gas schedule.
pub(crate) fn sstore<B: Backend>(evm: &mut Evm<B>, frame: &mut Frame) -> Result<Control, Halt> {
    // EIP-2200: refuse to run on no more than the call stipend.
    if evm.fork.includes(Eip::Eip2200) && frame.gas.remaining() <= gas::SSTORE_STIPEND_CHECK {
        return Err(Halt::OutOfGas);
    }

    let slot = frame.stack.pop()?;
    let new = frame.stack.pop()?;

    let was_cold = evm.journal.touch_slot(frame.address, slot);
    if evm.fork.includes(Eip::Eip2929) && was_cold {
        frame.gas.charge(gas::COLD_SLOAD)?;
    }

    let original = evm.journal.original_storage(frame.address, slot);
    let current = evm.journal.storage(frame.address, slot);

    let schedule = gas::sstore_gas(evm.fork, original, current, new);
    frame.gas.charge(schedule.cost)?;
    match schedule.refund {
        refund if refund > 0 => evm.journal.add_refund(refund.unsigned_abs()),
        refund if refund < 0 => evm.journal.sub_refund(refund.unsigned_abs()),
        _ => {}
    }

    evm.journal.set_storage(frame.address, slot, new);
    Ok(Control::Continue)
}

pub(crate) fn tload<B: Backend>(evm: &mut Evm<B>, frame: &mut Frame) -> Result<Control, Halt> {
    let slot = frame.stack.pop()?;
    frame.stack.push(evm.journal.transient(frame.address, slot))?;
    Ok(Control::Continue)
}

pub(crate) fn tstore<B: Backend>(evm: &mut Evm<B>, frame: &mut Frame) -> Result<Control, Halt> {
    let slot = frame.stack.pop()?;
    let value = frame.stack.pop()?;
    evm.journal.set_transient(frame.address, slot, value);
    Ok(Control::Continue)
}
