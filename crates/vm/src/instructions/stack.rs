//! Stack manipulation operations.

use crate::{Frame, Halt, interpreter::Control};
use alloy_primitives::U256;

pub(crate) fn pop(frame: &mut Frame) -> Result<Control, Halt> {
    frame.stack.pop()?;
    Ok(Control::Continue)
}

/// `PUSH0` through `PUSH32`: places the next `size` code bytes on the stack.
/// Bytes past the end of the code read as zero.
pub(crate) fn push(frame: &mut Frame, size: u8) -> Result<Control, Halt> {
    let size = size as usize;
    let start = frame.pc + 1;

    let mut word = [0u8; 32];
    let available = frame.code.len().saturating_sub(start).min(size);
    word[32 - size..32 - size + available]
        .copy_from_slice(&frame.code[start..start + available]);

    frame.stack.push(U256::from_be_bytes(word))?;
    Ok(Control::Continue)
}

pub(crate) fn dup(frame: &mut Frame, depth: u8) -> Result<Control, Halt> {
    frame.stack.dup(depth as usize)?;
    Ok(Control::Continue)
}

pub(crate) fn swap(frame: &mut Frame, depth: u8) -> Result<Control, Halt> {
    frame.stack.swap(depth as usize)?;
    Ok(Control::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::tests::frame_with_code;

    #[test]
    fn push_reads_immediates() {
        // PUSH2 0xAABB
        let mut frame = frame_with_code(&[0x61, 0xAA, 0xBB]);
        push(&mut frame, 2).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), U256::from(0xAABB));
    }

    #[test]
    fn truncated_push_zero_pads() {
        // PUSH2 with one byte of code left reads 0xAA00.
        let mut frame = frame_with_code(&[0x61, 0xAA]);
        push(&mut frame, 2).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), U256::from(0xAA00));
    }

    #[test]
    fn push0_is_zero() {
        let mut frame = frame_with_code(&[0x5F]);
        push(&mut frame, 0).unwrap();
        assert_eq!(frame.stack.pop().unwrap(), U256::ZERO);
    }
}
