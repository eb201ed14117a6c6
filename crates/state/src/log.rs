//! Execution log records.

use alloy_primitives::{Address, B256, Bytes};

/// A log record emitted by a `LOGx` instruction.
///
/// Logs are appended in emission order, inherited by the parent frame on
/// commit and truncated on revert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Log {
    /// Address of the account that emitted the log.
    pub address: Address,
    /// Zero to four indexed topics.
    pub topics: Vec<B256>,
    /// Opaque data payload.
    pub data: Bytes,
}
