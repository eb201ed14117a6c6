//! System operations: hashing, calls, creates and halts.

use super::{address_to_word, word_to_address};
use crate::{
    Evm, Frame, Halt, Outcome, gas,
    evm::{CallKind, CallMessage, CreateMessage, CreateScheme},
    interpreter::Control,
    memory::{range_end, usize_size},
};
use alloy_primitives::{B256, Bytes, U256, keccak256 as keccak};
use forks::{Eip, MAX_INITCODE_SIZE};
use state::Backend;

pub(crate) fn keccak256(frame: &mut Frame) -> Result<Control, Halt> {
    let offset = frame.stack.pop()?;
    let size = frame.stack.pop()?;

    let size = usize_size(size)?;
    frame.gas.charge(gas::keccak_cost(size)?)?;

    let hash = if size == 0 {
        keccak(b"")
    } else {
        let end = range_end(offset, size)?;
        frame.gas.charge(frame.memory.expansion_cost(end))?;
        frame.memory.grow(end);
        keccak(frame.memory.slice(end - size, size))
    };

    frame.stack.push(U256::from_be_bytes(hash.0))?;
    Ok(Control::Continue)
}

/// Reads the `(offset, size)` output range shared by `RETURN` and `REVERT`.
fn exit_output(frame: &mut Frame) -> Result<Bytes, Halt> {
    let offset = frame.stack.pop()?;
    let size = frame.stack.pop()?;

    let size = usize_size(size)?;
    if size == 0 {
        return Ok(Bytes::new());
    }
    let end = range_end(offset, size)?;
    frame.gas.charge(frame.memory.expansion_cost(end))?;
    frame.memory.grow(end);
    Ok(Bytes::copy_from_slice(frame.memory.slice(end - size, size)))
}

pub(crate) fn ret(frame: &mut Frame) -> Result<Control, Halt> {
    frame.output = exit_output(frame)?;
    Ok(Control::Return)
}

pub(crate) fn revert(frame: &mut Frame) -> Result<Control, Halt> {
    frame.output = exit_output(frame)?;
    Ok(Control::Revert)
}

pub(crate) fn invalid() -> Result<Control, Halt> {
    Err(Halt::InvalidOpcode(0xFE))
}

/// Halts the frame, sending the balance to the beneficiary. From Cancun the
/// account itself is only destroyed when it was created in this transaction
/// (EIP-6780); the transfer happens regardless.
pub(crate) fn selfdestruct<B: Backend>(
    evm: &mut Evm<B>,
    frame: &mut Frame,
) -> Result<Control, Halt> {
    let beneficiary = word_to_address(frame.stack.pop()?);

    let was_cold = evm.journal.touch_address(beneficiary);
    if evm.fork.includes(Eip::Eip2929) && was_cold {
        frame.gas.charge(gas::COLD_ACCOUNT_ACCESS)?;
    }

    let balance = evm.journal.balance(frame.address);

    if evm.fork.includes(Eip::Eip150) {
        let charges_new_account = if evm.fork.includes(Eip::Eip161) {
            !balance.is_zero() && evm.journal.is_dead(beneficiary)
        } else {
            !evm.journal.exists(beneficiary)
        };
        if charges_new_account {
            frame.gas.charge(gas::NEW_ACCOUNT)?;
        }
    }

    if beneficiary != frame.address {
        evm.journal
            .transfer(frame.address, beneficiary, balance)
            .map_err(Halt::from)?;
    }

    let destroys = !evm.fork.includes(Eip::Eip6780)
        || evm.journal.created_this_transaction(frame.address);
    if destroys {
        if beneficiary == frame.address {
            evm.journal.set_balance(frame.address, U256::ZERO);
        }
        let first_mark = evm.journal.mark_self_destruct(frame.address);
        if first_mark && !evm.fork.includes(Eip::Eip3529) {
            evm.journal.add_refund(gas::SELFDESTRUCT_REFUND);
        }
    }

    Ok(Control::SelfDestruct)
}

/// `CREATE`/`CREATE2`: charge initcode costs, forward all-but-one-64th of the
/// remaining gas, and hand the message to the orchestrator.
pub(crate) fn create<B: Backend>(
    evm: &mut Evm<B>,
    frame: &mut Frame,
    is_create2: bool,
) -> Result<Control, Halt> {
    let value = frame.stack.pop()?;
    let offset = frame.stack.pop()?;
    let size = frame.stack.pop()?;
    let salt = if is_create2 {
        Some(frame.stack.pop()?)
    } else {
        None
    };

    let size = usize_size(size)?;
    let init_code = if size == 0 {
        Bytes::new()
    } else {
        let end = range_end(offset, size)?;
        frame.gas.charge(frame.memory.expansion_cost(end))?;
        frame.memory.grow(end);
        Bytes::copy_from_slice(frame.memory.slice(end - size, size))
    };

    frame.return_data = Bytes::new();

    if evm.fork.includes(Eip::Eip3860) {
        if size > MAX_INITCODE_SIZE {
            // Fails the create before any gas is forwarded; the charges so
            // far stand.
            frame.stack.push(U256::ZERO)?;
            return Ok(Control::Continue);
        }
        frame.gas.charge(gas::INITCODE_WORD * gas::words(size))?;
    }
    if is_create2 {
        frame.gas.charge(gas::keccak_cost(size)?)?;
    }

    let remaining = frame.gas.remaining();
    let forwarded = if evm.fork.includes(Eip::Eip150) {
        remaining - remaining / 64
    } else {
        remaining
    };
    frame.gas.charge(forwarded)?;

    let scheme = match salt {
        Some(salt) => CreateScheme::Create2 {
            salt: B256::from(salt.to_be_bytes::<32>()),
        },
        None => CreateScheme::Legacy,
    };
    let result = evm.inner_create(CreateMessage {
        caller: frame.address,
        value,
        init_code,
        gas: forwarded,
        scheme,
    });
    frame.gas.reclaim(result.gas_left);

    match result.outcome {
        Outcome::Success => {
            frame
                .stack
                .push(result.address.map_or(U256::ZERO, address_to_word))?;
        }
        Outcome::Revert => {
            frame.return_data = result.output;
            frame.stack.push(U256::ZERO)?;
        }
        Outcome::Halt(_) => {
            frame.stack.push(U256::ZERO)?;
        }
    }
    Ok(Control::Continue)
}

/// The `CALL` family: charge access, value and new-account costs, apply the
/// 63/64 forwarding rule, and dispatch the message.
pub(crate) fn call<B: Backend>(
    evm: &mut Evm<B>,
    frame: &mut Frame,
    kind: CallKind,
) -> Result<Control, Halt> {
    let gas_word = frame.stack.pop()?;
    let target = word_to_address(frame.stack.pop()?);
    let value = if matches!(kind, CallKind::Call | CallKind::CallCode) {
        frame.stack.pop()?
    } else {
        U256::ZERO
    };
    let in_offset = frame.stack.pop()?;
    let in_size = frame.stack.pop()?;
    let out_offset = frame.stack.pop()?;
    let out_size = frame.stack.pop()?;

    if kind == CallKind::Call && frame.is_static && !value.is_zero() {
        return Err(Halt::StaticStateChange);
    }

    let in_size = usize_size(in_size)?;
    let out_size = usize_size(out_size)?;
    let mut end = 0usize;
    let mut in_start = 0usize;
    let mut out_start = 0usize;
    if in_size > 0 {
        let in_end = range_end(in_offset, in_size)?;
        in_start = in_end - in_size;
        end = in_end;
    }
    if out_size > 0 {
        let out_end = range_end(out_offset, out_size)?;
        out_start = out_end - out_size;
        end = end.max(out_end);
    }
    if end > 0 {
        frame.gas.charge(frame.memory.expansion_cost(end))?;
        frame.memory.grow(end);
    }
    let input = if in_size > 0 {
        Bytes::copy_from_slice(frame.memory.slice(in_start, in_size))
    } else {
        Bytes::new()
    };

    let was_cold = evm.journal.touch_address(target);
    frame.gas.charge(gas::account_access(evm.fork, was_cold))?;

    // EIP-7702: calling through a delegation also accesses the delegate.
    if evm.fork.includes(Eip::Eip7702) {
        if let Some(delegate) = Evm::<B>::delegation_target(&evm.journal.code(target)) {
            let delegate_cold = evm.journal.touch_address(delegate);
            frame
                .gas
                .charge(gas::account_access(evm.fork, delegate_cold))?;
        }
    }

    let transfers_value = matches!(kind, CallKind::Call | CallKind::CallCode) && !value.is_zero();
    if transfers_value {
        frame.gas.charge(gas::CALL_VALUE)?;
    }
    if kind == CallKind::Call {
        let charges_new_account = if evm.fork.includes(Eip::Eip161) {
            transfers_value && evm.journal.is_dead(target)
        } else {
            !evm.journal.exists(target)
        };
        if charges_new_account {
            frame.gas.charge(gas::NEW_ACCOUNT)?;
        }
    }

    let forwarded = gas::forwarded_gas(evm.fork, gas_word, frame.gas.remaining())?;
    frame.gas.charge(forwarded)?;
    let child_gas = forwarded + if transfers_value { gas::CALL_STIPEND } else { 0 };

    frame.return_data = Bytes::new();

    let (recipient, caller, child_value, is_static) = match kind {
        CallKind::Call => (target, frame.address, value, frame.is_static),
        CallKind::CallCode => (frame.address, frame.address, value, frame.is_static),
        CallKind::DelegateCall => (frame.address, frame.caller, frame.value, frame.is_static),
        CallKind::StaticCall => (target, frame.address, U256::ZERO, true),
    };

    let result = evm.inner_call(CallMessage {
        kind,
        caller,
        recipient,
        code_address: target,
        value: child_value,
        transfer_value: if transfers_value { value } else { U256::ZERO },
        input,
        gas: child_gas,
        is_static,
    });
    frame.gas.reclaim(result.gas_left);

    frame.return_data = result.output.clone();
    if out_size > 0 && !result.output.is_empty() {
        let copied = out_size.min(result.output.len());
        frame.memory.store(out_start, &result.output[..copied]);
    }

    frame
        .stack
        .push(if result.outcome.is_success() {
            U256::from(1)
        } else {
            U256::ZERO
        })?;
    Ok(Control::Continue)
}
