//! Execution outcomes.

use crate::Halt;
use alloy_primitives::{Address, Bytes};
use state::{Log, StateChange};

/// How a frame finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// `STOP`, `RETURN` or `SELFDESTRUCT`: changes commit.
    Success,
    /// Explicit `REVERT`: changes roll back, unspent gas and output survive.
    Revert,
    /// Exceptional halt: changes roll back, all gas is consumed.
    Halt(Halt),
}

impl Outcome {
    /// Returns [`true`] for a committing outcome.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Result of one message call as seen by the calling frame.
#[derive(Clone, Debug)]
pub struct CallResult {
    /// How the callee finished.
    pub outcome: Outcome,
    /// Return or revert data. Empty after an exceptional halt.
    pub output: Bytes,
    /// Gas flowing back to the caller.
    pub gas_left: u64,
}

impl CallResult {
    /// A failure that refunds the forwarded gas, e.g. at the depth limit.
    #[must_use]
    pub fn aborted(gas_left: u64) -> Self {
        Self {
            outcome: Outcome::Halt(Halt::OutOfGas),
            output: Bytes::new(),
            gas_left,
        }
    }
}

/// Result of one contract creation as seen by the creating frame.
#[derive(Clone, Debug)]
pub struct CreateResult {
    /// How the initcode finished.
    pub outcome: Outcome,
    /// Address of the deployed contract on success.
    pub address: Option<Address>,
    /// Revert data, when the initcode reverted.
    pub output: Bytes,
    /// Gas flowing back to the creator.
    pub gas_left: u64,
}

impl CreateResult {
    /// A failure that refunds the forwarded gas.
    #[must_use]
    pub fn aborted(gas_left: u64) -> Self {
        Self {
            outcome: Outcome::Halt(Halt::OutOfGas),
            address: None,
            output: Bytes::new(),
            gas_left,
        }
    }

    /// A failure that consumes all forwarded gas, e.g. an address collision.
    #[must_use]
    pub fn failed(halt: Halt) -> Self {
        Self {
            outcome: Outcome::Halt(halt),
            address: None,
            output: Bytes::new(),
            gas_left: 0,
        }
    }
}

/// Result of a whole transaction.
#[derive(Clone, Debug)]
pub struct ExecutionResult {
    /// Whether the top-level call or creation committed.
    pub success: bool,
    /// Return or revert data of the top-level frame.
    pub output: Bytes,
    /// Gas charged to the sender, refunds and floor applied.
    pub gas_used: u64,
    /// Refund that was credited against consumption.
    pub gas_refunded: u64,
    /// Logs emitted by committed frames.
    pub logs: Vec<Log>,
    /// Address of the created contract, for successful creation transactions.
    pub created_address: Option<Address>,
    /// Net account changes, including destroyed accounts.
    pub state_changes: Vec<StateChange>,
}
