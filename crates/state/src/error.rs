//! State mutation errors.

use alloy_primitives::Address;
use thiserror::Error;

/// Errors that can happen while mutating journaled state.
///
/// All of these are frame-fatal: the orchestrator reverts the offending
/// frame's snapshot and surfaces the failure to the caller.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum StateError {
    /// A balance transfer would overdraw the sender.
    #[error("insufficient balance in {0}")]
    BalanceUnderflow(Address),

    /// Incrementing a nonce would exceed 2^64 - 1 (EIP-2681).
    #[error("nonce of {0} at maximum")]
    NonceOverflow(Address),

    /// Deployed code exceeds the EIP-170 size limit.
    #[error("code of {size} bytes exceeds the deployment limit")]
    CodeSizeLimit {
        /// Size of the rejected code in bytes.
        size: usize,
    },

    /// Deployed code starts with the `0xEF` byte (EIP-3541).
    #[error("code starts with the reserved 0xEF byte")]
    InvalidCodePrefix,
}
