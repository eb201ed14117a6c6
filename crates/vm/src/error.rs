//! Execution failure taxonomy.

use state::StateError;
use thiserror::Error;

/// Reasons a frame stops executing exceptionally.
///
/// Every variant reverts the frame's snapshot. All of them except
/// [`Halt::InitcodeSizeLimit`] also consume the frame's remaining gas; an
/// explicit `REVERT` is not a halt and is represented by
/// [`crate::Outcome::Revert`] instead.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Halt {
    /// A gas charge would drop the gas counter below zero.
    #[error("out of gas")]
    OutOfGas,

    /// A push would grow the stack beyond 1024 items.
    #[error("stack overflow")]
    StackOverflow,

    /// An instruction required more operands than the stack holds.
    #[error("stack underflow")]
    StackUnderflow,

    /// The byte at the program counter is not a defined opcode under the
    /// active fork, or execution reached `INVALID`.
    #[error("invalid opcode 0x{0:02x}")]
    InvalidOpcode(u8),

    /// `JUMP`/`JUMPI` target is not a `JUMPDEST`, or sits inside push data.
    #[error("invalid jump destination")]
    InvalidJump,

    /// A state-mutating instruction ran under the static flag.
    #[error("state modification in static context")]
    StaticStateChange,

    /// `RETURNDATACOPY` read past the end of the return-data buffer.
    #[error("return data access out of bounds")]
    OutOfOffset,

    /// Deployed code exceeds the 24 576-byte limit (EIP-170).
    #[error("deployed code exceeds size limit")]
    CodeSizeLimit,

    /// Deployed code starts with the reserved `0xEF` byte (EIP-3541).
    #[error("deployed code starts with 0xEF")]
    InvalidCodePrefix,

    /// Initcode exceeds the 49 152-byte limit (EIP-3860, Shanghai+).
    #[error("initcode exceeds size limit")]
    InitcodeSizeLimit,

    /// Incrementing a nonce would overflow (EIP-2681).
    #[error("nonce overflow")]
    NonceOverflow,

    /// `CREATE`/`CREATE2` target address already has code or a nonce.
    #[error("contract address collision")]
    CreateCollision,
}

impl From<StateError> for Halt {
    fn from(error: StateError) -> Self {
        match error {
            StateError::BalanceUnderflow(_) => Self::OutOfGas,
            StateError::NonceOverflow(_) => Self::NonceOverflow,
            StateError::CodeSizeLimit { .. } => Self::CodeSizeLimit,
            StateError::InvalidCodePrefix => Self::InvalidCodePrefix,
        }
    }
}

/// Reasons a transaction is rejected before any bytecode runs.
///
/// These leave no state changes and consume no gas; they surface to the
/// caller of [`crate::Evm::transact`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidTransaction {
    /// Transaction nonce does not match the sender account nonce.
    #[error("nonce mismatch: transaction has {tx}, account has {account}")]
    NonceMismatch {
        /// Nonce carried by the transaction.
        tx: u64,
        /// Current nonce of the sender account.
        account: u64,
    },

    /// Sender cannot cover gas purchase plus transferred value.
    #[error("insufficient funds for gas * price + value")]
    InsufficientFunds,

    /// The gas limit does not cover the intrinsic gas.
    #[error("gas limit below intrinsic gas: limit {limit}, intrinsic {intrinsic}")]
    GasLimitBelowIntrinsic {
        /// Transaction gas limit.
        limit: u64,
        /// Intrinsic gas of the transaction.
        intrinsic: u64,
    },

    /// The gas limit does not cover the EIP-7623 calldata floor (Prague+).
    #[error("gas limit below calldata floor: limit {limit}, floor {floor}")]
    GasLimitBelowFloor {
        /// Transaction gas limit.
        limit: u64,
        /// EIP-7623 calldata floor.
        floor: u64,
    },

    /// Creation transaction carries initcode above the EIP-3860 limit.
    #[error("initcode of {size} bytes exceeds the limit")]
    InitcodeTooLarge {
        /// Size of the rejected initcode.
        size: usize,
    },

    /// Blob fee cap below the current blob base fee, or blob balance short
    /// (EIP-4844).
    #[error("blob gas unaffordable")]
    BlobGasUnaffordable,

    /// The transaction uses features the active fork does not have.
    #[error("transaction type not supported by the active fork")]
    Unsupported,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;

    #[test]
    fn state_errors_map_to_halts() {
        assert_eq!(
            Halt::from(StateError::NonceOverflow(Address::ZERO)),
            Halt::NonceOverflow
        );
        assert_eq!(
            Halt::from(StateError::CodeSizeLimit { size: 30_000 }),
            Halt::CodeSizeLimit
        );
        assert_eq!(
            Halt::from(StateError::InvalidCodePrefix),
            Halt::InvalidCodePrefix
        );
    }

    #[test]
    fn halts_render_human_messages() {
        assert_eq!(Halt::InvalidOpcode(0x0C).to_string(), "invalid opcode 0x0c");
        assert_eq!(
            Halt::StaticStateChange.to_string(),
            "state modification in static context"
        );
    }
}
