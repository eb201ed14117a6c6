//! Stop and arithmetic operations.

use super::i256;
use crate::{Frame, Halt, gas, interpreter::Control};
use alloy_primitives::U256;
use forks::Fork;

pub(crate) fn add(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(a.wrapping_add(b))?;
    Ok(Control::Continue)
}

pub(crate) fn mul(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(a.wrapping_mul(b))?;
    Ok(Control::Continue)
}

pub(crate) fn sub(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(a.wrapping_sub(b))?;
    Ok(Control::Continue)
}

/// Division by zero yields zero rather than a fault.
pub(crate) fn div(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(a.checked_div(b).unwrap_or(U256::ZERO))?;
    Ok(Control::Continue)
}

pub(crate) fn sdiv(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(i256::div(a, b))?;
    Ok(Control::Continue)
}

pub(crate) fn rem(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(a.checked_rem(b).unwrap_or(U256::ZERO))?;
    Ok(Control::Continue)
}

pub(crate) fn srem(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    frame.stack.push(i256::rem(a, b))?;
    Ok(Control::Continue)
}

/// `(a + b) % m`, with the addition performed at full width; modulus zero
/// yields zero.
pub(crate) fn addmod(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    let modulus = frame.stack.pop()?;
    frame.stack.push(a.add_mod(b, modulus))?;
    Ok(Control::Continue)
}

pub(crate) fn mulmod(frame: &mut Frame) -> Result<Control, Halt> {
    let a = frame.stack.pop()?;
    let b = frame.stack.pop()?;
    let modulus = frame.stack.pop()?;
    frame.stack.push(a.mul_mod(b, modulus))?;
    Ok(Control::Continue)
}

/// Exponentiation wraps modulo 2^256; the dynamic charge grows with the
/// exponent's significant bytes, so an exponent of zero costs the base only.
pub(crate) fn exp(frame: &mut Frame, fork: Fork) -> Result<Control, Halt> {
    let base = frame.stack.pop()?;
    let exponent = frame.stack.pop()?;
    frame.gas.charge(gas::exp_cost(fork, exponent))?;
    frame.stack.push(base.pow(exponent))?;
    Ok(Control::Continue)
}

/// Sign-extends the value in the second operand from the byte position given
/// by the first; positions past 31 leave the value unchanged.
pub(crate) fn signextend(frame: &mut Frame) -> Result<Control, Halt> {
    let position = frame.stack.pop()?;
    let value = frame.stack.pop()?;

    let result = if position < U256::from(31) {
        let bit = usize::try_from(position).unwrap_or(31) * 8 + 7;
        let mask = (U256::from(1) << (bit + 1)).wrapping_sub(U256::from(1));
        if value.bit(bit) {
            value | !mask
        } else {
            value & mask
        }
    } else {
        value
    };

    frame.stack.push(result)?;
    Ok(Control::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::tests::frame_with_stack;

    #[test]
    fn wrapping_addition() {
        let mut frame = frame_with_stack(&[U256::from(1), U256::MAX]);
        add(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), U256::ZERO);
    }

    #[test]
    fn division_by_zero_is_zero() {
        let mut frame = frame_with_stack(&[U256::ZERO, U256::from(7)]);
        div(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), U256::ZERO);

        let mut frame = frame_with_stack(&[U256::ZERO, U256::from(7)]);
        srem(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), U256::ZERO);
    }

    #[test]
    fn modular_arithmetic_with_zero_modulus() {
        let mut frame = frame_with_stack(&[U256::ZERO, U256::from(2), U256::from(3)]);
        addmod(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), U256::ZERO);

        let mut frame = frame_with_stack(&[U256::ZERO, U256::from(2), U256::from(3)]);
        mulmod(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), U256::ZERO);
    }

    #[test]
    fn addmod_adds_at_full_width() {
        // (MAX + 2) % 3 == ((2^256 - 1) + 2) % 3, not a wrapped sum.
        let mut frame = frame_with_stack(&[U256::from(3), U256::from(2), U256::MAX]);
        addmod(&mut frame).unwrap();
        let expected = (U256::MAX.reduce_mod(U256::from(3)) + U256::from(2))
            .reduce_mod(U256::from(3));
        assert_eq!(frame.stack.pop().unwrap(), expected);
    }

    #[test]
    fn exp_charges_per_exponent_byte() {
        let mut frame = frame_with_stack(&[U256::from(0x0100), U256::from(2)]);
        exp(&mut frame, Fork::Cancun).unwrap();
        // 2^256 wraps to zero.
        assert_eq!(frame.stack.pop().unwrap(), U256::ZERO);
        // Two significant exponent bytes at 50 gas each.
        assert_eq!(frame.gas.spent(), 100);
    }

    #[test]
    fn exp_with_zero_exponent_is_base_cost_only() {
        let mut frame = frame_with_stack(&[U256::ZERO, U256::from(7)]);
        exp(&mut frame, Fork::Cancun).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), U256::from(1));
        assert_eq!(frame.gas.spent(), 0);
    }

    #[test]
    fn signextend_from_byte_zero() {
        let mut frame = frame_with_stack(&[U256::from(0xFF), U256::ZERO]);
        signextend(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), U256::MAX);

        let mut frame = frame_with_stack(&[U256::from(0x7F), U256::ZERO]);
        signextend(&mut frame).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), U256::from(0x7F));
    }
}
