//! Block and transaction context.

use alloy_primitives::{Address, B256, Bytes, U256};
use std::collections::HashMap;

/// What a transaction targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxKind {
    /// A message call to an existing account.
    Call(Address),
    /// Contract creation; the calldata is the initcode.
    Create,
}

/// One EIP-2930 access list entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccessListItem {
    /// Address to pre-warm.
    pub address: Address,
    /// Storage keys of `address` to pre-warm.
    pub storage_keys: Vec<U256>,
}

/// One EIP-7702 authorization tuple.
///
/// Signature recovery happens outside the core: `authority` carries the
/// recovered signer, or [`None`] when the signature did not verify, in which
/// case the tuple is skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authorization {
    /// Chain the authorization is valid on; zero means any chain.
    pub chain_id: U256,
    /// Account whose code the authority delegates to.
    pub address: Address,
    /// Expected nonce of the authority.
    pub nonce: u64,
    /// Recovered signer of the tuple.
    pub authority: Option<Address>,
}

/// Read-only block context consumed by environment opcodes.
#[derive(Clone, Debug)]
pub struct BlockEnv {
    /// Block number (`NUMBER`).
    pub number: u64,
    /// Block timestamp in seconds (`TIMESTAMP`).
    pub timestamp: u64,
    /// Fee recipient (`COINBASE`).
    pub coinbase: Address,
    /// Block gas limit (`GASLIMIT`).
    pub gas_limit: u64,
    /// Base fee per gas (`BASEFEE`, London+).
    pub base_fee: U256,
    /// Randomness beacon value (`PREVRANDAO`, Paris+; the difficulty before).
    pub prev_randao: B256,
    /// Blob base fee (`BLOBBASEFEE`, Cancun+).
    pub blob_base_fee: U256,
    /// Hashes of the previous 256 blocks, keyed by number (`BLOCKHASH`).
    pub block_hashes: HashMap<u64, B256>,
}

impl Default for BlockEnv {
    fn default() -> Self {
        Self {
            number: 0,
            timestamp: 0,
            coinbase: Address::ZERO,
            gas_limit: 30_000_000,
            base_fee: U256::ZERO,
            prev_randao: B256::ZERO,
            blob_base_fee: U256::from(1),
            block_hashes: HashMap::new(),
        }
    }
}

/// A decoded transaction, ready for [`crate::Evm::transact`].
#[derive(Clone, Debug)]
pub struct TxEnv {
    /// Sender address (`ORIGIN`), recovered by the host.
    pub caller: Address,
    /// Call target or contract creation.
    pub kind: TxKind,
    /// Value transferred to the target.
    pub value: U256,
    /// Calldata, or initcode when creating.
    pub data: Bytes,
    /// Gas limit of the transaction.
    pub gas_limit: u64,
    /// Effective gas price the sender pays per unit.
    pub gas_price: U256,
    /// Sender nonce carried by the transaction.
    pub nonce: u64,
    /// EIP-2930 access list.
    pub access_list: Vec<AccessListItem>,
    /// EIP-4844 blob versioned hashes.
    pub blob_hashes: Vec<B256>,
    /// EIP-4844 blob fee cap.
    pub max_fee_per_blob_gas: U256,
    /// EIP-7702 authorization list.
    pub authorizations: Vec<Authorization>,
}

impl Default for TxEnv {
    fn default() -> Self {
        Self {
            caller: Address::ZERO,
            kind: TxKind::Call(Address::ZERO),
            value: U256::ZERO,
            data: Bytes::new(),
            gas_limit: 30_000_000,
            gas_price: U256::ZERO,
            nonce: 0,
            access_list: Vec::new(),
            blob_hashes: Vec::new(),
            max_fee_per_blob_gas: U256::ZERO,
            authorizations: Vec::new(),
        }
    }
}
