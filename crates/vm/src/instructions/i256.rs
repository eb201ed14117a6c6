//! Two's complement views of 256-bit words.

use alloy_primitives::U256;

/// The sign bit of a 256-bit word.
pub(crate) fn is_negative(value: U256) -> bool {
    value.bit(255)
}

/// Two's complement negation.
pub(crate) fn negate(value: U256) -> U256 {
    (!value).wrapping_add(U256::from(1))
}

/// Magnitude of a signed word.
fn magnitude(value: U256) -> U256 {
    if is_negative(value) {
        negate(value)
    } else {
        value
    }
}

/// Signed division, truncating toward zero. Division by zero yields zero;
/// `MIN / -1` wraps to `MIN`.
pub(crate) fn div(dividend: U256, divisor: U256) -> U256 {
    if divisor.is_zero() {
        return U256::ZERO;
    }
    let quotient = magnitude(dividend)
        .checked_div(magnitude(divisor))
        .unwrap_or(U256::ZERO);
    if is_negative(dividend) == is_negative(divisor) {
        quotient
    } else {
        negate(quotient)
    }
}

/// Signed remainder; takes the sign of the dividend. Modulo zero yields zero.
pub(crate) fn rem(dividend: U256, divisor: U256) -> U256 {
    if divisor.is_zero() {
        return U256::ZERO;
    }
    let remainder = magnitude(dividend)
        .checked_rem(magnitude(divisor))
        .unwrap_or(U256::ZERO);
    if is_negative(dividend) {
        negate(remainder)
    } else {
        remainder
    }
}

/// Signed less-than.
pub(crate) fn lt(left: U256, right: U256) -> bool {
    match (is_negative(left), is_negative(right)) {
        (true, false) => true,
        (false, true) => false,
        _ => left < right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minus(value: u64) -> U256 {
        negate(U256::from(value))
    }

    #[test]
    fn signed_division() {
        assert_eq!(div(U256::from(10), U256::from(3)), U256::from(3));
        assert_eq!(div(minus(10), U256::from(3)), minus(3));
        assert_eq!(div(U256::from(10), minus(3)), minus(3));
        assert_eq!(div(minus(10), minus(3)), U256::from(3));
        assert_eq!(div(U256::from(10), U256::ZERO), U256::ZERO);

        // MIN / -1 wraps back to MIN.
        let min = U256::from(1) << 255;
        assert_eq!(div(min, minus(1)), min);
    }

    #[test]
    fn signed_remainder() {
        assert_eq!(rem(U256::from(10), U256::from(3)), U256::from(1));
        assert_eq!(rem(minus(10), U256::from(3)), minus(1));
        assert_eq!(rem(U256::from(10), minus(3)), U256::from(1));
        assert_eq!(rem(minus(10), U256::ZERO), U256::ZERO);
    }

    #[test]
    fn signed_comparison() {
        assert!(lt(minus(1), U256::ZERO));
        assert!(!lt(U256::ZERO, minus(1)));
        assert!(lt(minus(2), minus(1)));
        assert!(lt(U256::from(1), U256::from(2)));
    }
}
