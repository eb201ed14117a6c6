//! Control flow operations.

use crate::{Frame, Halt, interpreter::Control};
use alloy_primitives::U256;

/// Validates a jump target against the frame's jump table.
fn target(frame: &Frame, destination: U256) -> Result<usize, Halt> {
    let destination = usize::try_from(destination).map_err(|_| Halt::InvalidJump)?;
    if !frame.jump_table.is_valid(destination) {
        return Err(Halt::InvalidJump);
    }
    Ok(destination)
}

pub(crate) fn jump(frame: &mut Frame) -> Result<Control, Halt> {
    let destination = frame.stack.pop()?;
    frame.pc = target(frame, destination)?;
    Ok(Control::Jump)
}

pub(crate) fn jumpi(frame: &mut Frame) -> Result<Control, Halt> {
    let destination = frame.stack.pop()?;
    let condition = frame.stack.pop()?;
    if condition.is_zero() {
        return Ok(Control::Continue);
    }
    frame.pc = target(frame, destination)?;
    Ok(Control::Jump)
}

pub(crate) fn pc(frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(U256::from(frame.pc))?;
    Ok(Control::Continue)
}

pub(crate) fn jumpdest() -> Result<Control, Halt> {
    Ok(Control::Continue)
}

pub(crate) fn stop() -> Result<Control, Halt> {
    Ok(Control::Stop)
}

pub(crate) fn gas_remaining(frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.push(U256::from(frame.gas.remaining()))?;
    Ok(Control::Continue)
}
