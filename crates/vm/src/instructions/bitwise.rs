//! Comparison and bitwise logic operations.

use super::i256;
use crate::{Frame, Halt, interpreter::Control};
use alloy_primitives::U256;

/// Converts a predicate into the 0/1 word the comparison opcodes push.
fn word(condition: bool) -> U256 {
    if condition { U256::from(1) } else { U256::ZERO }
}

pub(crate) fn lt(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(word(a < b))?;
    Ok(Control::Continue)
}

pub(crate) fn gt(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(word(a > b))?;
    Ok(Control::Continue)
}

pub(crate) fn slt(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(word(i256::lt(a, b)))?;
    Ok(Control::Continue)
}

pub(crate) fn sgt(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(word(i256::lt(b, a)))?;
    Ok(Control::Continue)
}

pub(crate) fn eq(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(word(a == b))?;
    Ok(Control::Continue)
}

pub(crate) fn iszero(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    frame.stack.push(word(a.is_zero()))?;
    Ok(Control::Continue)
}

pub(crate) fn and(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(a & b)?;
    Ok(Control::Continue)
}

pub(crate) fn or(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(a | b)?;
    Ok(Control::Continue)
}

pub(crate) fn xor(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(a ^ b)?;
    Ok(Control::Continue)
}

pub(crate) fn not(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    frame.stack.push(!a)?;
    Ok(Control::Continue)
}

/// Byte `index` of the word, counted from the most significant end; indices
/// past 31 yield zero.
pub(crate) fn byte(frame: &mut Frame) -> Result<Control, Halt> {
    let index = frame.stack.pop()?;
    let value = frame.stack.pop()?;

    let result = if index < U256::from(32) {
        let index = usize::try_from(index).unwrap_or(31);
        U256::from(value.byte(31 - index))
    } else {
        U256::ZERO
    };

    frame.stack.push(result)?;
    Ok(Control::Continue)
}

pub(crate) fn shl(frame: &mut Frame) -> Result<Control, Halt> {
    let shift = frame.stack.pop()?;
    let value = frame.stack.pop()?;
    let result = if shift < U256::from(256) {
        value << usize::try_from(shift).unwrap_or(255)
    } else {
        U256::ZERO
    };
    frame.stack.push(result)?;
    Ok(Control::Continue)
}

pub(crate) fn shr(frame: &mut Frame) -> Result<Control, Halt> {
    let shift = frame.stack.pop()?;
    let value = frame.stack.pop()?;
    let result = if shift < U256::from(256) {
        value >> usize::try_from(shift).unwrap_or(255)
    } else {
        U256::ZERO
    };
    frame.stack.push(result)?;
    Ok(Control::Continue)
}

/// Arithmetic shift: the sign bit back-fills vacated positions.
pub(crate) fn sar(frame: &mut Frame) -> Result<Control, Halt> {
    let shift = frame.stack.pop()?;
    let value = frame.stack.pop()?;
    let negative = i256::is_negative(value);

    let result = if shift < U256::from(256) {
        let shift = usize::try_from(shift).unwrap_or(255);
        let shifted = value >> shift;
        if negative && shift > 0 {
            // Fill the vacated high bits with ones.
            shifted | (U256::MAX << (256 - shift))
        } else {
            shifted
        }
    } else if negative {
        U256::MAX
    } else {
        U256::ZERO
    };

    frame.stack.push(result)?;
    Ok(Control::Continue)
}
