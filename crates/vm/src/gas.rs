//! The gas schedule: constants and fork-indexed cost functions.

use crate::Halt;
use alloy_primitives::U256;
use asm::Mnemonic;
use forks::{Eip, Fork};

/// No charge.
pub const ZERO: u64 = 0;
/// Cheapest chargeable tier: environment reads, `POP`, `PC`.
pub const BASE: u64 = 2;
/// Arithmetic, comparisons, pushes, dups and swaps.
pub const VERYLOW: u64 = 3;
/// Multiplication-class arithmetic and `SELFBALANCE`.
pub const LOW: u64 = 5;
/// Modular arithmetic and `JUMP`.
pub const MID: u64 = 8;
/// `JUMPI`.
pub const HIGH: u64 = 10;
/// `JUMPDEST` marker.
pub const JUMPDEST: u64 = 1;
/// `EXP` base cost.
pub const EXP: u64 = 10;
/// Per exponent byte for `EXP` before Spurious Dragon.
pub const EXP_BYTE_FRONTIER: u64 = 10;
/// Per exponent byte for `EXP` from Spurious Dragon (EIP-160).
pub const EXP_BYTE: u64 = 50;
/// `KECCAK256` base cost.
pub const KECCAK256: u64 = 30;
/// `KECCAK256` cost per 32-byte word hashed.
pub const KECCAK256_WORD: u64 = 6;
/// Cost per 32-byte word copied by the `*COPY` family.
pub const COPY_WORD: u64 = 3;
/// Linear coefficient of the memory expansion cost.
pub const MEMORY_WORD: u64 = 3;
/// Quadratic divisor of the memory expansion cost.
pub const MEMORY_QUADRATIC_DIVISOR: u64 = 512;
/// `BLOCKHASH` cost.
pub const BLOCKHASH: u64 = 20;
/// `LOGx` base cost.
pub const LOG: u64 = 375;
/// Additional cost per log topic.
pub const LOG_TOPIC: u64 = 375;
/// Cost per logged data byte.
pub const LOG_DATA_BYTE: u64 = 8;
/// Warm storage or account access (EIP-2929).
pub const WARM_ACCESS: u64 = 100;
/// Cold account access surcharge (EIP-2929).
pub const COLD_ACCOUNT_ACCESS: u64 = 2_600;
/// Cold storage slot access surcharge (EIP-2929).
pub const COLD_SLOAD: u64 = 2_100;
/// `TLOAD`/`TSTORE` flat cost (EIP-1153).
pub const TRANSIENT_ACCESS: u64 = 100;
/// `SSTORE` cost writing a zero slot to non-zero.
pub const SSTORE_SET: u64 = 20_000;
/// `SSTORE` cost rewriting a non-zero slot, before cold-access splitting.
pub const SSTORE_RESET: u64 = 5_000;
/// Gas below which `SSTORE` refuses to run (EIP-2200, Istanbul+).
pub const SSTORE_STIPEND_CHECK: u64 = 2_300;
/// Refund for clearing a slot, Frontier through Berlin.
pub const SSTORE_CLEAR_REFUND: u64 = 15_000;
/// Refund for clearing a slot from London (EIP-3529).
pub const SSTORE_CLEAR_REFUND_LONDON: u64 = 4_800;
/// `SELFDESTRUCT` base cost from Tangerine Whistle.
pub const SELFDESTRUCT: u64 = 5_000;
/// `SELFDESTRUCT` refund, removed by London (EIP-3529).
pub const SELFDESTRUCT_REFUND: u64 = 24_000;
/// `CREATE`/`CREATE2` base cost.
pub const CREATE: u64 = 32_000;
/// Cost per deployed code byte at the end of a create.
pub const CODE_DEPOSIT_BYTE: u64 = 200;
/// Cost per 32-byte initcode word (EIP-3860, Shanghai+).
pub const INITCODE_WORD: u64 = 2;
/// Surcharge for a `CALL` transferring value.
pub const CALL_VALUE: u64 = 9_000;
/// Gas stipend granted to the callee of a value transfer.
pub const CALL_STIPEND: u64 = 2_300;
/// Surcharge for calling into a dead account with value.
pub const NEW_ACCOUNT: u64 = 25_000;
/// Base transaction cost.
pub const TX_BASE: u64 = 21_000;
/// Additional cost of a creation transaction (EIP-2, Homestead+).
pub const TX_CREATE: u64 = 32_000;
/// Intrinsic cost per zero calldata byte.
pub const TX_DATA_ZERO: u64 = 4;
/// Intrinsic cost per non-zero calldata byte before Istanbul.
pub const TX_DATA_NONZERO_FRONTIER: u64 = 68;
/// Intrinsic cost per non-zero calldata byte from Istanbul (EIP-2028).
pub const TX_DATA_NONZERO: u64 = 16;
/// Intrinsic cost per access-list address (EIP-2930).
pub const TX_ACCESS_LIST_ADDRESS: u64 = 2_400;
/// Intrinsic cost per access-list storage key (EIP-2930).
pub const TX_ACCESS_LIST_KEY: u64 = 1_900;
/// Cost per EIP-7623 calldata token.
pub const TX_FLOOR_TOKEN: u64 = 10;
/// Calldata tokens per non-zero byte (EIP-7623).
pub const TX_TOKEN_NONZERO: u64 = 4;
/// Intrinsic cost per EIP-7702 authorization tuple.
pub const TX_AUTHORIZATION: u64 = 25_000;
/// Refund per EIP-7702 authorization whose authority already exists.
pub const TX_AUTHORIZATION_EXISTING_REFUND: u64 = 12_500;
/// Gas consumed by one blob (EIP-4844).
pub const BLOB_GAS_PER_BLOB: u64 = 131_072;

/// Number of 32-byte words needed to hold `bytes` bytes.
#[must_use]
pub const fn words(bytes: usize) -> u64 {
    (bytes as u64).div_ceil(32)
}

/// Static cost charged for a mnemonic before its handler runs.
///
/// Opcodes whose whole cost is fork- or state-dependent (`SSTORE`, and the
/// account-access family from Berlin on) return the portion that is fixed;
/// their handlers charge the rest.
#[must_use]
pub fn static_cost(mnemonic: Mnemonic, fork: Fork) -> u64 {
    use Mnemonic as M;

    if mnemonic.is_push() || mnemonic.is_dup() || mnemonic.is_swap() {
        return if mnemonic == M::PUSH0 { BASE } else { VERYLOW };
    }
    if mnemonic.is_log() {
        return LOG;
    }

    match mnemonic {
        M::STOP | M::RETURN | M::REVERT | M::INVALID | M::SSTORE => ZERO,

        M::ADDRESS
        | M::ORIGIN
        | M::CALLER
        | M::CALLVALUE
        | M::CALLDATASIZE
        | M::CODESIZE
        | M::GASPRICE
        | M::RETURNDATASIZE
        | M::COINBASE
        | M::TIMESTAMP
        | M::NUMBER
        | M::PREVRANDAO
        | M::GASLIMIT
        | M::CHAINID
        | M::BASEFEE
        | M::BLOBBASEFEE
        | M::POP
        | M::PC
        | M::MSIZE
        | M::GAS => BASE,

        M::ADD
        | M::SUB
        | M::NOT
        | M::LT
        | M::GT
        | M::SLT
        | M::SGT
        | M::EQ
        | M::ISZERO
        | M::AND
        | M::OR
        | M::XOR
        | M::BYTE
        | M::SHL
        | M::SHR
        | M::SAR
        | M::CALLDATALOAD
        | M::MLOAD
        | M::MSTORE
        | M::MSTORE8
        | M::CALLDATACOPY
        | M::CODECOPY
        | M::RETURNDATACOPY
        | M::MCOPY
        | M::BLOBHASH => VERYLOW,

        M::MUL | M::DIV | M::SDIV | M::MOD | M::SMOD | M::SIGNEXTEND | M::SELFBALANCE => LOW,

        M::ADDMOD | M::MULMOD | M::JUMP => MID,

        M::JUMPI => HIGH,

        M::EXP => EXP,

        M::KECCAK256 => KECCAK256,

        M::JUMPDEST => JUMPDEST,

        M::BLOCKHASH => BLOCKHASH,

        M::TLOAD | M::TSTORE => TRANSIENT_ACCESS,

        M::SLOAD => sload_static(fork),

        M::BALANCE => {
            if fork.includes(Eip::Eip2929) {
                ZERO
            } else if fork.includes(Eip::Eip1884) {
                700
            } else if fork.includes(Eip::Eip150) {
                400
            } else {
                20
            }
        }

        M::EXTCODESIZE | M::EXTCODECOPY => {
            if fork.includes(Eip::Eip2929) {
                ZERO
            } else if fork.includes(Eip::Eip150) {
                700
            } else {
                20
            }
        }

        M::EXTCODEHASH => {
            if fork.includes(Eip::Eip2929) {
                ZERO
            } else if fork.includes(Eip::Eip1884) {
                700
            } else {
                400
            }
        }

        M::CALL | M::CALLCODE | M::DELEGATECALL | M::STATICCALL => call_static(fork),

        M::CREATE | M::CREATE2 => CREATE,

        M::SELFDESTRUCT => {
            if fork.includes(Eip::Eip150) {
                SELFDESTRUCT
            } else {
                ZERO
            }
        }

        // PUSH/DUP/SWAP/LOG are handled by the family checks above.
        _ => ZERO,
    }
}

/// Static portion of the `SLOAD` cost. Zero from Berlin; the handler charges
/// warm/cold access instead.
#[must_use]
pub fn sload_static(fork: Fork) -> u64 {
    if fork.includes(Eip::Eip2929) {
        ZERO
    } else if fork.includes(Eip::Eip1884) {
        800
    } else if fork.includes(Eip::Eip150) {
        200
    } else {
        50
    }
}

/// Static portion of the `CALL`-family cost. Zero from Berlin; the handler
/// charges warm/cold access instead.
#[must_use]
pub fn call_static(fork: Fork) -> u64 {
    if fork.includes(Eip::Eip2929) {
        ZERO
    } else if fork.includes(Eip::Eip150) {
        700
    } else {
        40
    }
}

/// Warm/cold account access cost (EIP-2929). Zero before Berlin, where the
/// static schedules already cover the access.
#[must_use]
pub fn account_access(fork: Fork, was_cold: bool) -> u64 {
    if !fork.includes(Eip::Eip2929) {
        ZERO
    } else if was_cold {
        COLD_ACCOUNT_ACCESS
    } else {
        WARM_ACCESS
    }
}

/// Warm/cold storage access cost for `SLOAD` (EIP-2929).
#[must_use]
pub fn sload_access(fork: Fork, was_cold: bool) -> u64 {
    if !fork.includes(Eip::Eip2929) {
        ZERO
    } else if was_cold {
        COLD_SLOAD
    } else {
        WARM_ACCESS
    }
}

/// Total cost of memory sized to `words` 32-byte words:
/// `3 * words + words^2 / 512`.
#[must_use]
pub fn memory_cost(words: u64) -> u64 {
    let words = u128::from(words);
    let linear = words * u128::from(MEMORY_WORD);
    let quadratic = words * words / u128::from(MEMORY_QUADRATIC_DIVISOR);
    u64::try_from(linear + quadratic).unwrap_or(u64::MAX)
}

/// Cost of copying `size` bytes: 3 per 32-byte word.
///
/// # Errors
/// Returns [`Halt::OutOfGas`] if the word count overflows.
pub fn copy_cost(size: usize) -> Result<u64, Halt> {
    COPY_WORD.checked_mul(words(size)).ok_or(Halt::OutOfGas)
}

/// Dynamic cost of `KECCAK256` over `size` bytes.
///
/// # Errors
/// Returns [`Halt::OutOfGas`] if the word count overflows.
pub fn keccak_cost(size: usize) -> Result<u64, Halt> {
    KECCAK256_WORD
        .checked_mul(words(size))
        .ok_or(Halt::OutOfGas)
}

/// Dynamic cost of `EXP`: per-byte charge on the exponent's significant bytes.
/// An exponent of zero costs nothing beyond the base charge.
#[must_use]
pub fn exp_cost(fork: Fork, exponent: U256) -> u64 {
    let byte_size = (exponent.bit_len() as u64).div_ceil(8);
    let per_byte = if fork.includes(Eip::Eip160) {
        EXP_BYTE
    } else {
        EXP_BYTE_FRONTIER
    };
    per_byte.saturating_mul(byte_size)
}

/// Dynamic cost of `LOGx` excluding memory expansion.
///
/// # Errors
/// Returns [`Halt::OutOfGas`] on arithmetic overflow.
pub fn log_cost(topics: u8, size: usize) -> Result<u64, Halt> {
    let data = LOG_DATA_BYTE
        .checked_mul(size as u64)
        .ok_or(Halt::OutOfGas)?;
    LOG_TOPIC
        .checked_mul(u64::from(topics))
        .and_then(|topic_cost| topic_cost.checked_add(data))
        .ok_or(Halt::OutOfGas)
}

/// `SSTORE` cost and refund delta for one write.
///
/// `cost` excludes the cold-access surcharge, which the handler charges
/// separately when the slot is cold; `refund` is applied to the journal's
/// signed refund counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SstoreGas {
    /// Gas to charge.
    pub cost: u64,
    /// Signed change to the refund counter.
    pub refund: i64,
}

/// The fork-exact `SSTORE` schedule.
///
/// Four rule families cover Frontier through Prague: the original two-tier
/// schedule, EIP-1283 net metering (Constantinople), EIP-2200 (Istanbul) and
/// EIP-2929/EIP-3529 warm-slot metering (Berlin and London on).
#[must_use]
pub fn sstore_gas(fork: Fork, original: U256, current: U256, new: U256) -> SstoreGas {
    if fork.includes(Eip::Eip2929) {
        let clear_refund = if fork.includes(Eip::Eip3529) {
            SSTORE_CLEAR_REFUND_LONDON
        } else {
            SSTORE_CLEAR_REFUND
        };
        net_metered(
            original,
            current,
            new,
            WARM_ACCESS,
            SSTORE_RESET - COLD_SLOAD,
            clear_refund,
        )
    } else if fork.includes(Eip::Eip2200) {
        net_metered(original, current, new, 800, SSTORE_RESET, SSTORE_CLEAR_REFUND)
    } else if fork.includes(Eip::Eip1283) {
        net_metered(original, current, new, 200, SSTORE_RESET, SSTORE_CLEAR_REFUND)
    } else {
        // Original schedule: only the current value matters.
        let cost = if current.is_zero() && !new.is_zero() {
            SSTORE_SET
        } else {
            SSTORE_RESET
        };
        let refund = if !current.is_zero() && new.is_zero() {
            i64::try_from(SSTORE_CLEAR_REFUND).unwrap_or(i64::MAX)
        } else {
            0
        };
        SstoreGas { cost, refund }
    }
}

/// Net gas metering shared by EIP-1283, EIP-2200 and EIP-2929, parameterized
/// by the no-op cost, the reset cost and the clear refund.
fn net_metered(
    original: U256,
    current: U256,
    new: U256,
    noop: u64,
    reset: u64,
    clear_refund: u64,
) -> SstoreGas {
    let clear = i64::try_from(clear_refund).unwrap_or(i64::MAX);

    if current == new {
        return SstoreGas {
            cost: noop,
            refund: 0,
        };
    }

    if current == original {
        if original.is_zero() {
            return SstoreGas {
                cost: SSTORE_SET,
                refund: 0,
            };
        }
        let refund = if new.is_zero() { clear } else { 0 };
        return SstoreGas { cost: reset, refund };
    }

    // Dirty slot: charge the no-op cost and reconcile refunds.
    let mut refund = 0i64;
    if !original.is_zero() {
        if current.is_zero() {
            refund -= clear;
        } else if new.is_zero() {
            refund += clear;
        }
    }
    if new == original {
        let reconcile = if original.is_zero() {
            SSTORE_SET - noop
        } else {
            reset - noop
        };
        refund += i64::try_from(reconcile).unwrap_or(i64::MAX);
    }
    SstoreGas { cost: noop, refund }
}

/// Gas forwarded to a child call: the requested amount, capped at 63/64 of
/// what remains after the call's own cost (EIP-150, Tangerine Whistle+).
///
/// # Errors
/// Before Tangerine Whistle, requesting more gas than remains is
/// [`Halt::OutOfGas`].
pub fn forwarded_gas(fork: Fork, requested: U256, remaining: u64) -> Result<u64, Halt> {
    let all_but_one_64th = remaining - remaining / 64;
    let requested = u64::try_from(requested).unwrap_or(u64::MAX);
    if fork.includes(Eip::Eip150) {
        Ok(requested.min(all_but_one_64th))
    } else if requested > remaining {
        Err(Halt::OutOfGas)
    } else {
        Ok(requested)
    }
}

/// Intrinsic gas of a transaction: the charge taken before any bytecode runs.
#[must_use]
pub fn intrinsic_gas(
    fork: Fork,
    data: &[u8],
    is_create: bool,
    access_list_addresses: usize,
    access_list_keys: usize,
    authorizations: usize,
) -> u64 {
    let mut gas = TX_BASE;

    let zero_bytes = data.iter().filter(|byte| **byte == 0).count() as u64;
    let nonzero_bytes = data.len() as u64 - zero_bytes;
    let nonzero_cost = if fork.includes(Eip::Eip2028) {
        TX_DATA_NONZERO
    } else {
        TX_DATA_NONZERO_FRONTIER
    };
    gas = gas.saturating_add(zero_bytes * TX_DATA_ZERO);
    gas = gas.saturating_add(nonzero_bytes.saturating_mul(nonzero_cost));

    if is_create {
        if fork.is_at_least(Fork::Homestead) {
            gas = gas.saturating_add(TX_CREATE);
        }
        if fork.includes(Eip::Eip3860) {
            gas = gas.saturating_add(INITCODE_WORD.saturating_mul(words(data.len())));
        }
    }

    if fork.includes(Eip::Eip2930) {
        gas = gas.saturating_add(TX_ACCESS_LIST_ADDRESS.saturating_mul(access_list_addresses as u64));
        gas = gas.saturating_add(TX_ACCESS_LIST_KEY.saturating_mul(access_list_keys as u64));
    }

    if fork.includes(Eip::Eip7702) {
        gas = gas.saturating_add(TX_AUTHORIZATION.saturating_mul(authorizations as u64));
    }

    gas
}

/// EIP-7623 calldata floor: the minimum gas a transaction pays, measured in
/// calldata tokens (Prague+).
#[must_use]
pub fn calldata_floor(data: &[u8]) -> u64 {
    let zero_bytes = data.iter().filter(|byte| **byte == 0).count() as u64;
    let nonzero_bytes = data.len() as u64 - zero_bytes;
    let tokens = zero_bytes + nonzero_bytes * TX_TOKEN_NONZERO;
    TX_BASE.saturating_add(tokens.saturating_mul(TX_FLOOR_TOKEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_cost_is_quadratic() {
        assert_eq!(memory_cost(0), 0);
        assert_eq!(memory_cost(1), 3);
        assert_eq!(memory_cost(32), 32 * 3 + 2);
        // 512 words: 1536 linear + 512 quadratic.
        assert_eq!(memory_cost(512), 2048);
    }

    #[test]
    fn exp_cost_counts_significant_bytes() {
        assert_eq!(exp_cost(Fork::Cancun, U256::ZERO), 0);
        assert_eq!(exp_cost(Fork::Cancun, U256::from(1)), 50);
        assert_eq!(exp_cost(Fork::Cancun, U256::from(0x100)), 100);
        assert_eq!(exp_cost(Fork::Cancun, U256::MAX), 50 * 32);
        // Pre-Spurious pricing.
        assert_eq!(exp_cost(Fork::Homestead, U256::from(0x100)), 20);
    }

    #[test]
    fn legacy_sstore_schedule() {
        let zero = U256::ZERO;
        let one = U256::from(1);
        let two = U256::from(2);

        let set = sstore_gas(Fork::Frontier, zero, zero, one);
        assert_eq!(set, SstoreGas { cost: 20_000, refund: 0 });

        let reset = sstore_gas(Fork::Frontier, one, one, two);
        assert_eq!(reset, SstoreGas { cost: 5_000, refund: 0 });

        let clear = sstore_gas(Fork::Frontier, one, one, zero);
        assert_eq!(clear, SstoreGas { cost: 5_000, refund: 15_000 });

        // No-op writes still pay the reset charge pre-Constantinople.
        let noop = sstore_gas(Fork::Frontier, one, one, one);
        assert_eq!(noop, SstoreGas { cost: 5_000, refund: 0 });
    }

    #[test]
    fn istanbul_sstore_schedule() {
        let zero = U256::ZERO;
        let one = U256::from(1);
        let two = U256::from(2);

        assert_eq!(
            sstore_gas(Fork::Istanbul, one, one, one),
            SstoreGas { cost: 800, refund: 0 }
        );
        assert_eq!(
            sstore_gas(Fork::Istanbul, zero, zero, one),
            SstoreGas { cost: 20_000, refund: 0 }
        );
        assert_eq!(
            sstore_gas(Fork::Istanbul, one, one, zero),
            SstoreGas { cost: 5_000, refund: 15_000 }
        );
        // Dirty reconciliation back to the original value.
        assert_eq!(
            sstore_gas(Fork::Istanbul, one, two, one),
            SstoreGas { cost: 800, refund: 4_200 }
        );
        assert_eq!(
            sstore_gas(Fork::Istanbul, zero, one, zero),
            SstoreGas { cost: 800, refund: 19_200 }
        );
    }

    #[test]
    fn constantinople_sstore_schedule() {
        let one = U256::from(1);
        let two = U256::from(2);

        // EIP-1283 net metering: a no-op write costs the 200-gas dirty rate.
        assert_eq!(
            sstore_gas(Fork::Constantinople, one, one, one),
            SstoreGas { cost: 200, refund: 0 }
        );
        assert_eq!(
            sstore_gas(Fork::Constantinople, one, two, one),
            SstoreGas { cost: 200, refund: 4_800 }
        );
    }

    #[test]
    fn london_sstore_schedule() {
        let zero = U256::ZERO;
        let one = U256::from(1);
        let two = U256::from(2);

        assert_eq!(
            sstore_gas(Fork::London, zero, zero, one),
            SstoreGas { cost: 20_000, refund: 0 }
        );
        assert_eq!(
            sstore_gas(Fork::London, one, one, two),
            SstoreGas { cost: 2_900, refund: 0 }
        );
        assert_eq!(
            sstore_gas(Fork::London, one, one, zero),
            SstoreGas { cost: 2_900, refund: 4_800 }
        );
        // Un-clearing a dirty slot takes the granted refund back.
        assert_eq!(
            sstore_gas(Fork::London, one, zero, two),
            SstoreGas { cost: 100, refund: -4_800 }
        );
        // Restoring the original non-zero value reconciles.
        assert_eq!(
            sstore_gas(Fork::London, one, two, one),
            SstoreGas { cost: 100, refund: 2_800 }
        );
    }

    #[test]
    fn forwarding_keeps_one_64th() {
        assert_eq!(
            forwarded_gas(Fork::Cancun, U256::MAX, 6_400).unwrap(),
            6_300
        );
        assert_eq!(
            forwarded_gas(Fork::Cancun, U256::from(100), 6_400).unwrap(),
            100
        );
        // Pre-Tangerine semantics: request everything or fail.
        assert_eq!(
            forwarded_gas(Fork::Homestead, U256::from(7_000), 6_400),
            Err(Halt::OutOfGas)
        );
        assert_eq!(
            forwarded_gas(Fork::Homestead, U256::from(6_000), 6_400).unwrap(),
            6_000
        );
    }

    #[test]
    fn intrinsic_gas_by_fork() {
        // 2 zero bytes + 2 non-zero bytes.
        let data = [0x00, 0x01, 0x00, 0x02];
        assert_eq!(
            intrinsic_gas(Fork::Homestead, &data, false, 0, 0, 0),
            21_000 + 2 * 4 + 2 * 68
        );
        assert_eq!(
            intrinsic_gas(Fork::Istanbul, &data, false, 0, 0, 0),
            21_000 + 2 * 4 + 2 * 16
        );
        assert_eq!(
            intrinsic_gas(Fork::Berlin, &data, false, 2, 3, 0),
            21_000 + 2 * 4 + 2 * 16 + 2 * 2_400 + 3 * 1_900
        );
        // Creation cost plus initcode words from Shanghai.
        assert_eq!(
            intrinsic_gas(Fork::Shanghai, &data, true, 0, 0, 0),
            21_000 + 2 * 4 + 2 * 16 + 32_000 + 2
        );
    }

    #[test]
    fn calldata_floor_counts_tokens() {
        let data = [0x00, 0x01, 0x00, 0x02];
        // 2 zero tokens + 2 * 4 non-zero tokens = 10 tokens.
        assert_eq!(calldata_floor(&data), 21_000 + 100);
        assert_eq!(calldata_floor(&[]), 21_000);
    }
}
