//! The execution orchestrator.

use crate::{
    BlockEnv, CallResult, CreateResult, ExecutionResult, Frame, Halt, InvalidTransaction, Outcome,
    Precompiles, TxEnv, TxKind, gas,
    precompile::PrecompileFn,
    trace::{Summary, TraceSink, hex_bytes, hex_u64},
};
use alloy_primitives::{Address, B256, Bytes, U256, keccak256};
use forks::{Eip, Fork, MAX_INITCODE_SIZE};
use state::{Backend, Journal};

/// Maximum depth of nested call/create frames.
const CALL_DEPTH_LIMIT: usize = 1024;

/// Which member of the `CALL` family a message came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CallKind {
    /// Plain `CALL`.
    Call,
    /// `CALLCODE`: runs foreign code against the caller's own state.
    CallCode,
    /// `DELEGATECALL`: like `CALLCODE` but keeps caller and value bindings.
    DelegateCall,
    /// `STATICCALL`: read-only `CALL`.
    StaticCall,
}

/// A message call, address bindings already resolved by the opcode handler.
pub(crate) struct CallMessage {
    /// Call family member.
    pub kind: CallKind,
    /// `CALLER` binding of the child frame.
    pub caller: Address,
    /// `ADDRESS` binding of the child frame (the state it runs against).
    pub recipient: Address,
    /// Account whose code runs.
    pub code_address: Address,
    /// `CALLVALUE` binding of the child frame.
    pub value: U256,
    /// Wei actually moved before execution; zero for delegate/static calls.
    pub transfer_value: U256,
    /// Calldata.
    pub input: Bytes,
    /// Gas given to the child, stipend included.
    pub gas: u64,
    /// Whether the child runs under the static flag.
    pub is_static: bool,
}

/// How a create derives its address.
pub(crate) enum CreateScheme {
    /// `CREATE`: sender and nonce; increments the creator's nonce here.
    Legacy,
    /// `CREATE2`: sender, salt and initcode hash; increments the creator's
    /// nonce here.
    Create2 {
        /// The salt operand.
        salt: B256,
    },
    /// Top-level creation transaction; the sender's nonce was already
    /// incremented during transaction setup.
    Root,
}

/// A contract creation message.
pub(crate) struct CreateMessage {
    /// The creating account.
    pub caller: Address,
    /// Wei endowed to the new account.
    pub value: U256,
    /// Initcode to execute.
    pub init_code: Bytes,
    /// Gas given to the initcode frame.
    pub gas: u64,
    /// Address derivation scheme.
    pub scheme: CreateScheme,
}

/// The EVM: journaled state, block and transaction context, and the nested
/// call machinery, all gated on one [`Fork`].
///
/// # Example
/// ```
/// # use alloy_primitives::{Address, Bytes, U256};
/// # use forks::Fork;
/// # use state::{Account, InMemoryState};
/// # use fovea_vm::{Evm, TxEnv, TxKind};
/// let mut state = InMemoryState::default();
/// let contract = Address::repeat_byte(0xC0);
/// // PUSH1 1; PUSH1 2; ADD; STOP
/// state.insert(contract, Account {
///     code: Bytes::from(vec![0x60, 0x01, 0x60, 0x02, 0x01, 0x00]),
///     ..Account::default()
/// });
///
/// let mut evm = Evm::new(state, Fork::Cancun);
/// let result = evm.transact(TxEnv {
///     kind: TxKind::Call(contract),
///     gas_limit: 100_000,
///     ..TxEnv::default()
/// }).unwrap();
/// assert!(result.success);
/// ```
pub struct Evm<B: Backend> {
    /// Active fork.
    pub(crate) fork: Fork,
    /// Chain id (`CHAINID`, EIP-7702 validation).
    pub(crate) chain_id: u64,
    /// Block context.
    pub(crate) block: BlockEnv,
    /// Journaled state.
    pub(crate) journal: Journal<B>,
    /// Precompile dispatch table.
    pub(crate) precompiles: Precompiles,
    /// Optional EIP-3155 step tracer.
    pub(crate) tracer: Option<Box<dyn TraceSink>>,
    /// Context of the transaction being executed.
    pub(crate) tx: TxEnv,
    /// Number of active frames.
    pub(crate) depth: usize,
}

impl<B: Backend> Evm<B> {
    /// Wraps a state backend for execution under the given fork.
    pub fn new(backend: B, fork: Fork) -> Self {
        Self {
            fork,
            chain_id: 1,
            block: BlockEnv::default(),
            journal: Journal::new(backend, fork),
            precompiles: Precompiles::standard(),
            tracer: None,
            tx: TxEnv::default(),
            depth: 0,
        }
    }

    /// Sets the block context.
    #[must_use]
    pub fn with_block(mut self, block: BlockEnv) -> Self {
        self.block = block;
        self
    }

    /// Sets the chain id. Defaults to mainnet's 1.
    #[must_use]
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Attaches an EIP-3155 step tracer.
    #[must_use]
    pub fn with_tracer(mut self, tracer: Box<dyn TraceSink>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Registers a host-provided precompile handler.
    pub fn register_precompile(&mut self, address: Address, handler: PrecompileFn) {
        self.precompiles.register(address, handler);
    }

    /// The active fork.
    #[must_use]
    pub fn fork(&self) -> Fork {
        self.fork
    }

    /// Shared access to the underlying state backend.
    pub fn backend(&self) -> &B {
        self.journal.backend()
    }

    /// Consumes the EVM, returning the state backend.
    pub fn into_backend(self) -> B {
        self.journal.into_backend()
    }

    /// Parses an EIP-7702 delegation designator: `0xEF0100` followed by the
    /// delegate address.
    pub(crate) fn delegation_target(code: &[u8]) -> Option<Address> {
        if code.len() == 23 && code[..3] == [0xEF, 0x01, 0x00] {
            Some(Address::from_slice(&code[3..]))
        } else {
            None
        }
    }

    /// Returns [`true`] if the address belongs to the fork's precompile range.
    fn is_precompile(&self, address: Address) -> bool {
        let bytes = address.as_slice();
        bytes[..19].iter().all(|byte| *byte == 0)
            && bytes[19] >= 1
            && bytes[19] <= self.fork.precompile_count()
    }

    /// Executes one transaction against the journaled state.
    ///
    /// Validation failures reject the transaction wholesale: no state change,
    /// no gas charged. Execution failures (revert, exceptional halt) are
    /// reported through [`ExecutionResult::success`] with gas consumed.
    ///
    /// # Errors
    /// Returns [`InvalidTransaction`] when sender validation, intrinsic gas
    /// or fee coverage fails.
    pub fn transact(&mut self, tx: TxEnv) -> Result<ExecutionResult, InvalidTransaction> {
        self.journal.reset();
        self.depth = 0;

        let is_create = matches!(tx.kind, TxKind::Create);

        // Feature gating.
        if (!tx.blob_hashes.is_empty() || !tx.max_fee_per_blob_gas.is_zero())
            && !self.fork.includes(Eip::Eip4844)
        {
            return Err(InvalidTransaction::Unsupported);
        }
        if !tx.authorizations.is_empty() && (!self.fork.includes(Eip::Eip7702) || is_create) {
            return Err(InvalidTransaction::Unsupported);
        }
        if !tx.access_list.is_empty() && !self.fork.includes(Eip::Eip2930) {
            return Err(InvalidTransaction::Unsupported);
        }
        if is_create && self.fork.includes(Eip::Eip3860) && tx.data.len() > MAX_INITCODE_SIZE {
            return Err(InvalidTransaction::InitcodeTooLarge { size: tx.data.len() });
        }

        // Sender validation.
        let account_nonce = self.journal.nonce(tx.caller);
        if account_nonce != tx.nonce || account_nonce == u64::MAX {
            return Err(InvalidTransaction::NonceMismatch {
                tx: tx.nonce,
                account: account_nonce,
            });
        }

        let access_list_keys = tx
            .access_list
            .iter()
            .map(|item| item.storage_keys.len())
            .sum();
        let intrinsic = gas::intrinsic_gas(
            self.fork,
            &tx.data,
            is_create,
            tx.access_list.len(),
            access_list_keys,
            tx.authorizations.len(),
        );
        if intrinsic > tx.gas_limit {
            return Err(InvalidTransaction::GasLimitBelowIntrinsic {
                limit: tx.gas_limit,
                intrinsic,
            });
        }

        let floor = if self.fork.includes(Eip::Eip7623) {
            gas::calldata_floor(&tx.data)
        } else {
            0
        };
        if floor > tx.gas_limit {
            return Err(InvalidTransaction::GasLimitBelowFloor {
                limit: tx.gas_limit,
                floor,
            });
        }

        // Blob gas is bought upfront at the block's blob base fee and never
        // refunded (EIP-4844).
        let blob_gas = gas::BLOB_GAS_PER_BLOB.saturating_mul(tx.blob_hashes.len() as u64);
        if !tx.blob_hashes.is_empty() && tx.max_fee_per_blob_gas < self.block.blob_base_fee {
            return Err(InvalidTransaction::BlobGasUnaffordable);
        }
        let blob_cost = U256::from(blob_gas).saturating_mul(self.block.blob_base_fee);

        let gas_cost = U256::from(tx.gas_limit).saturating_mul(tx.gas_price);
        let required = gas_cost
            .checked_add(tx.value)
            .and_then(|sum| sum.checked_add(blob_cost))
            .ok_or(InvalidTransaction::InsufficientFunds)?;
        let balance = self.journal.balance(tx.caller);
        if balance < required {
            return Err(InvalidTransaction::InsufficientFunds);
        }

        // Buy gas and bump the nonce; these survive any later revert.
        self.journal
            .set_balance(tx.caller, balance - gas_cost - blob_cost);
        self.journal
            .increment_nonce(tx.caller)
            .map_err(|_| InvalidTransaction::NonceMismatch {
                tx: tx.nonce,
                account: account_nonce,
            })?;

        self.tx = tx;

        // Pre-populate the warm sets (EIP-2929 and friends).
        self.journal.touch_address(self.tx.caller);
        if let TxKind::Call(to) = self.tx.kind {
            self.journal.touch_address(to);
        }
        for index in 1..=self.fork.precompile_count() {
            self.journal.touch_address(Precompiles::address(index));
        }
        for item in &self.tx.access_list {
            self.journal.touch_address(item.address);
            for key in &item.storage_keys {
                self.journal.touch_slot(item.address, *key);
            }
        }
        if self.fork.includes(Eip::Eip3651) {
            self.journal.touch_address(self.block.coinbase);
        }

        self.apply_authorizations();

        // Root dispatch.
        let available = self.tx.gas_limit - intrinsic;
        let (outcome, output, gas_left, created_address) = match self.tx.kind {
            TxKind::Call(to) => {
                let result = self.inner_call(CallMessage {
                    kind: CallKind::Call,
                    caller: self.tx.caller,
                    recipient: to,
                    code_address: to,
                    value: self.tx.value,
                    transfer_value: self.tx.value,
                    input: self.tx.data.clone(),
                    gas: available,
                    is_static: false,
                });
                (result.outcome, result.output, result.gas_left, None)
            }
            TxKind::Create => {
                let result = self.inner_create(CreateMessage {
                    caller: self.tx.caller,
                    value: self.tx.value,
                    init_code: self.tx.data.clone(),
                    gas: available,
                    scheme: CreateScheme::Root,
                });
                (result.outcome, result.output, result.gas_left, result.address)
            }
        };

        Ok(self.finalize(outcome, output, gas_left, floor, created_address))
    }

    /// Post-execution bookkeeping: refunds, fee payment, self-destruct
    /// resolution and result assembly.
    fn finalize(
        &mut self,
        outcome: Outcome,
        output: Bytes,
        gas_left: u64,
        floor: u64,
        created_address: Option<Address>,
    ) -> ExecutionResult {
        let gas_limit = self.tx.gas_limit;
        let used_before_refund = gas_limit - gas_left;

        // The refund counter is clamped only here, at transaction end.
        let refund_cap = used_before_refund / self.fork.refund_divisor();
        let gas_refunded = self
            .journal
            .refund()
            .max(0)
            .unsigned_abs()
            .min(refund_cap);
        let mut gas_used = used_before_refund - gas_refunded;
        if self.fork.includes(Eip::Eip7623) {
            gas_used = gas_used.max(floor);
        }

        // Return unused gas to the sender.
        let reimbursed = U256::from(gas_limit - gas_used).saturating_mul(self.tx.gas_price);
        let sender_balance = self.journal.balance(self.tx.caller);
        self.journal
            .set_balance(self.tx.caller, sender_balance.saturating_add(reimbursed));

        // Pay the coinbase its share; the base fee is burned (EIP-1559).
        let price_per_gas = if self.fork.includes(Eip::Eip1559) {
            self.tx.gas_price.saturating_sub(self.block.base_fee)
        } else {
            self.tx.gas_price
        };
        let reward = U256::from(gas_used).saturating_mul(price_per_gas);
        if !reward.is_zero() {
            let coinbase_balance = self.journal.balance(self.block.coinbase);
            self.journal
                .set_balance(self.block.coinbase, coinbase_balance.saturating_add(reward));
        }

        // Resolve self-destructs: transfers already happened at the opcode;
        // deletion is what remains.
        let destroyed: Vec<Address> = self.journal.self_destructs().to_vec();
        let mut state_changes = self.journal.collect_changes();
        for address in &destroyed {
            self.journal.delete_account(*address);
            if let Some(change) = state_changes
                .iter_mut()
                .find(|change| change.address == *address)
            {
                change.destroyed = true;
            }
        }

        let logs = self.journal.take_logs();
        let success = outcome.is_success();

        if let Some(tracer) = self.tracer.as_mut() {
            tracer.finish(&Summary {
                output: hex_bytes(&output),
                gas_used: hex_u64(gas_used),
                error: match outcome {
                    Outcome::Success => None,
                    Outcome::Revert => Some("execution reverted".into()),
                    Outcome::Halt(halt) => Some(halt.to_string()),
                },
            });
        }

        ExecutionResult {
            success,
            output,
            gas_used,
            gas_refunded,
            logs,
            created_address: if success { created_address } else { None },
            state_changes,
        }
    }

    /// Installs EIP-7702 delegation designators from the transaction's
    /// authorization list. Invalid tuples are skipped; installs survive a
    /// reverted execution.
    fn apply_authorizations(&mut self) {
        let authorizations = std::mem::take(&mut self.tx.authorizations);
        for authorization in &authorizations {
            // A zero chain id authorizes every chain.
            if !authorization.chain_id.is_zero()
                && authorization.chain_id != U256::from(self.chain_id)
            {
                continue;
            }
            let Some(authority) = authorization.authority else {
                continue;
            };
            if authorization.nonce == u64::MAX {
                continue;
            }
            // Only fresh accounts and existing delegations may delegate.
            let code = self.journal.code(authority);
            if !code.is_empty() && Self::delegation_target(&code).is_none() {
                continue;
            }
            if self.journal.nonce(authority) != authorization.nonce {
                continue;
            }

            if !self.journal.is_empty(authority) {
                self.journal
                    .add_refund(gas::TX_AUTHORIZATION_EXISTING_REFUND);
            }
            self.journal.touch_address(authority);

            if authorization.address == Address::ZERO {
                // Delegation to the zero address clears the designator.
                self.journal.set_code(authority, Bytes::new());
            } else {
                let mut designator = Vec::with_capacity(23);
                designator.extend_from_slice(&[0xEF, 0x01, 0x00]);
                designator.extend_from_slice(authorization.address.as_slice());
                self.journal.set_code(authority, Bytes::from(designator));
            }
            // Checked above against u64::MAX.
            self.journal.increment_nonce(authority).ok();
        }
        self.tx.authorizations = authorizations;
    }

    /// Runs a message call: snapshot, value transfer, precompile or bytecode
    /// execution, then commit or revert.
    pub(crate) fn inner_call(&mut self, message: CallMessage) -> CallResult {
        if self.depth >= CALL_DEPTH_LIMIT {
            return CallResult::aborted(message.gas);
        }

        let snapshot = self.journal.snapshot();

        match message.kind {
            CallKind::Call if !message.transfer_value.is_zero() => {
                if self
                    .journal
                    .transfer(message.caller, message.recipient, message.transfer_value)
                    .is_err()
                {
                    self.journal.revert_to(snapshot);
                    return CallResult::aborted(message.gas);
                }
            }
            CallKind::CallCode if !message.transfer_value.is_zero() => {
                // The transfer is self-to-self, but the balance must cover it.
                if self.journal.balance(message.caller) < message.transfer_value {
                    self.journal.revert_to(snapshot);
                    return CallResult::aborted(message.gas);
                }
            }
            _ => {}
        }

        if self.is_precompile(message.code_address) {
            if let Some(handler) = self.precompiles.handler(message.code_address) {
                let outcome = handler(&message.input, message.gas);
                return if outcome.success {
                    self.journal.commit(snapshot);
                    CallResult {
                        outcome: Outcome::Success,
                        output: outcome.output,
                        gas_left: outcome.gas_left,
                    }
                } else {
                    self.journal.revert_to(snapshot);
                    CallResult {
                        outcome: Outcome::Halt(Halt::OutOfGas),
                        output: Bytes::new(),
                        gas_left: outcome.gas_left,
                    }
                };
            }
            // No handler registered: behaves as an empty account.
        }

        let mut code = self.journal.code(message.code_address);
        if self.fork.includes(Eip::Eip7702) {
            if let Some(delegate) = Self::delegation_target(&code) {
                // One level of delegation resolution.
                code = self.journal.code(delegate);
            }
        }

        if code.is_empty() {
            self.journal.commit(snapshot);
            return CallResult {
                outcome: Outcome::Success,
                output: Bytes::new(),
                gas_left: message.gas,
            };
        }

        let mut frame = Frame::new(
            code,
            message.input,
            message.recipient,
            message.caller,
            message.value,
            message.gas,
            message.is_static,
        );
        self.depth += 1;
        let (outcome, output) = self.run_frame(&mut frame);
        self.depth -= 1;

        match outcome {
            Outcome::Success => {
                self.journal.commit(snapshot);
                CallResult {
                    outcome,
                    output,
                    gas_left: frame.gas.remaining(),
                }
            }
            Outcome::Revert => {
                self.journal.revert_to(snapshot);
                CallResult {
                    outcome,
                    output,
                    gas_left: frame.gas.remaining(),
                }
            }
            Outcome::Halt(_) => {
                self.journal.revert_to(snapshot);
                CallResult {
                    outcome,
                    output: Bytes::new(),
                    gas_left: 0,
                }
            }
        }
    }

    /// Runs a contract creation: address derivation, collision check,
    /// initcode execution and code deposit.
    pub(crate) fn inner_create(&mut self, message: CreateMessage) -> CreateResult {
        if self.depth >= CALL_DEPTH_LIMIT {
            return CreateResult::aborted(message.gas);
        }
        if self.journal.balance(message.caller) < message.value {
            return CreateResult::aborted(message.gas);
        }

        // The creator's nonce rises before the initcode runs and stays
        // risen when the create fails.
        let address = match &message.scheme {
            CreateScheme::Legacy => {
                let Ok(previous) = self.journal.increment_nonce(message.caller) else {
                    return CreateResult::aborted(message.gas);
                };
                message.caller.create(previous)
            }
            CreateScheme::Create2 { salt } => {
                if self.journal.increment_nonce(message.caller).is_err() {
                    return CreateResult::aborted(message.gas);
                }
                message
                    .caller
                    .create2(*salt, keccak256(&message.init_code))
            }
            CreateScheme::Root => {
                let nonce = self.journal.nonce(message.caller);
                message.caller.create(nonce - 1)
            }
        };

        self.journal.touch_address(address);

        if self.journal.nonce(address) != 0 || !self.journal.code(address).is_empty() {
            return CreateResult::failed(Halt::CreateCollision);
        }

        let snapshot = self.journal.snapshot();
        self.journal.mark_created(address);
        if self.fork.includes(Eip::Eip161) {
            self.journal.set_nonce(address, 1);
        }
        if self
            .journal
            .transfer(message.caller, address, message.value)
            .is_err()
        {
            self.journal.revert_to(snapshot);
            return CreateResult::aborted(message.gas);
        }

        let mut frame = Frame::new(
            message.init_code,
            Bytes::new(),
            address,
            message.caller,
            message.value,
            message.gas,
            false,
        );
        self.depth += 1;
        let (outcome, output) = self.run_frame(&mut frame);
        self.depth -= 1;

        match outcome {
            Outcome::Success => {
                let deposit_cost = gas::CODE_DEPOSIT_BYTE.saturating_mul(output.len() as u64);
                if frame.gas.charge(deposit_cost).is_err() {
                    if self.fork.is_at_least(Fork::Homestead) {
                        self.journal.revert_to(snapshot);
                        return CreateResult::failed(Halt::OutOfGas);
                    }
                    // Frontier: an unaffordable deposit leaves an account
                    // with no code.
                    self.journal.commit(snapshot);
                    return CreateResult {
                        outcome: Outcome::Success,
                        address: Some(address),
                        output: Bytes::new(),
                        gas_left: frame.gas.remaining(),
                    };
                }
                match self.journal.deploy_code(address, output) {
                    Ok(()) => {
                        self.journal.commit(snapshot);
                        CreateResult {
                            outcome: Outcome::Success,
                            address: Some(address),
                            output: Bytes::new(),
                            gas_left: frame.gas.remaining(),
                        }
                    }
                    Err(error) => {
                        self.journal.revert_to(snapshot);
                        CreateResult::failed(Halt::from(error))
                    }
                }
            }
            Outcome::Revert => {
                self.journal.revert_to(snapshot);
                CreateResult {
                    outcome,
                    address: None,
                    output,
                    gas_left: frame.gas.remaining(),
                }
            }
            Outcome::Halt(_) => {
                self.journal.revert_to(snapshot);
                CreateResult {
                    outcome,
                    address: None,
                    output: Bytes::new(),
                    gas_left: 0,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Authorization, env::AccessListItem};
    use state::{Account, Backend as _, InMemoryState};

    const CONTRACT: Address = Address::repeat_byte(0xC0);
    const SENDER: Address = Address::repeat_byte(0xAA);

    /// State with one contract installed and a funded sender.
    fn state_with_code(code: &[u8]) -> InMemoryState {
        let mut state = InMemoryState::default();
        state.insert(
            CONTRACT,
            Account {
                code: Bytes::copy_from_slice(code),
                ..Account::default()
            },
        );
        state.insert(SENDER, Account::with_balance(U256::from(10_u64.pow(18))));
        state
    }

    fn call_tx(to: Address, gas_limit: u64) -> TxEnv {
        TxEnv {
            caller: SENDER,
            kind: TxKind::Call(to),
            gas_limit,
            ..TxEnv::default()
        }
    }

    #[test]
    fn simple_add_returns_three() {
        // PUSH1 1; PUSH1 2; ADD; PUSH1 0; MSTORE; PUSH1 32; PUSH1 0; RETURN
        let code = [
            0x60, 0x01, 0x60, 0x02, 0x01, 0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xF3,
        ];
        let mut evm = Evm::new(state_with_code(&code), Fork::Cancun);
        let result = evm.transact(call_tx(CONTRACT, 100_000)).unwrap();

        assert!(result.success);
        assert_eq!(result.output.len(), 32);
        assert_eq!(result.output[31], 3);
        assert!(result.output[..31].iter().all(|byte| *byte == 0));
        // 21000 intrinsic + 7 three-gas instructions + 3 memory expansion.
        assert_eq!(result.gas_used, 21_024);
    }

    #[test]
    fn sstore_set_from_zero() {
        // PUSH1 42; PUSH1 0; SSTORE; STOP
        let code = [0x60, 0x2A, 0x60, 0x00, 0x55, 0x00];
        let mut evm = Evm::new(state_with_code(&code), Fork::Cancun);
        let result = evm.transact(call_tx(CONTRACT, 100_000)).unwrap();

        assert!(result.success);
        // 21000 + 3 + 3 + 2100 cold + 20000 set.
        assert_eq!(result.gas_used, 43_106);
        assert_eq!(result.gas_refunded, 0);
        assert_eq!(
            evm.backend().storage(CONTRACT, U256::ZERO),
            U256::from(42)
        );
    }

    #[test]
    fn staticcall_blocks_sstore() {
        let inner = Address::repeat_byte(0x11);
        // Inner: PUSH1 1; PUSH1 0; SSTORE
        let mut state = state_with_code(&{
            // Outer: STATICCALL(0xFFFF gas, inner, no data), store the
            // status word, return it.
            let mut code = vec![0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x73];
            code.extend_from_slice(inner.as_slice());
            code.extend_from_slice(&[0x61, 0xFF, 0xFF, 0xFA]);
            code.extend_from_slice(&[0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xF3]);
            code
        });
        state.insert(
            inner,
            Account {
                code: Bytes::from(vec![0x60, 0x01, 0x60, 0x00, 0x55]),
                ..Account::default()
            },
        );

        let mut evm = Evm::new(state, Fork::Cancun);
        let result = evm.transact(call_tx(CONTRACT, 200_000)).unwrap();

        // The outer call continues and reports the inner failure as a 0 word.
        assert!(result.success);
        assert_eq!(result.output.as_ref(), &[0u8; 32]);
        assert_eq!(evm.backend().storage(inner, U256::ZERO), U256::ZERO);
    }

    #[test]
    fn create_collision_consumes_gas_and_keeps_nonce() {
        let creator = Address::repeat_byte(0x11);
        let mut state = InMemoryState::default();
        state.insert(
            creator,
            Account {
                nonce: 5,
                ..Account::default()
            },
        );
        // Pre-occupy the address CREATE would derive from (creator, 5).
        state.insert(
            creator.create(5),
            Account {
                nonce: 1,
                ..Account::default()
            },
        );

        let mut evm = Evm::new(state, Fork::Cancun);
        let result = evm.inner_create(CreateMessage {
            caller: creator,
            value: U256::ZERO,
            init_code: Bytes::new(),
            gas: 50_000,
            scheme: CreateScheme::Legacy,
        });

        assert_eq!(result.outcome, Outcome::Halt(Halt::CreateCollision));
        assert_eq!(result.gas_left, 0);
        assert_eq!(result.address, None);
        // The nonce increment survives the failed create.
        assert_eq!(evm.journal.nonce(creator), 6);
    }

    #[test]
    fn sstore_refund_reconciliation() {
        // PUSH1 0; PUSH1 0; SSTORE; PUSH1 5; PUSH1 0; SSTORE; STOP
        let code = [0x60, 0x00, 0x60, 0x00, 0x55, 0x60, 0x05, 0x60, 0x00, 0x55, 0x00];
        let mut state = state_with_code(&code);
        state.set_storage(CONTRACT, U256::ZERO, U256::from(5));

        let mut evm = Evm::new(state, Fork::Cancun);
        let result = evm.transact(call_tx(CONTRACT, 100_000)).unwrap();

        assert!(result.success);
        // Clearing grants 4800; un-clearing takes it back and restoring the
        // original leaves the 2800 reconciliation.
        assert_eq!(result.gas_refunded, 2_800);
        // 21000 + 3 + 3 + (2100 + 2900) + 3 + 3 + 100 - 2800.
        assert_eq!(result.gas_used, 23_312);
        assert_eq!(evm.backend().storage(CONTRACT, U256::ZERO), U256::from(5));
    }

    #[test]
    fn transient_storage_cleared_between_transactions() {
        // With empty calldata: TSTORE(1, 99). With calldata: return TLOAD(1).
        let code = [
            0x36, 0x60, 0x0A, 0x57, // CALLDATASIZE; PUSH1 10; JUMPI
            0x60, 0x63, 0x60, 0x01, 0x5D, 0x00, // PUSH1 99; PUSH1 1; TSTORE; STOP
            0x5B, 0x60, 0x01, 0x5C, // JUMPDEST; PUSH1 1; TLOAD
            0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xF3, // MSTORE; RETURN
        ];
        let mut evm = Evm::new(state_with_code(&code), Fork::Cancun);

        let store = evm.transact(call_tx(CONTRACT, 100_000)).unwrap();
        assert!(store.success);

        let mut load = call_tx(CONTRACT, 100_000);
        load.data = Bytes::from(vec![0x01]);
        load.nonce = 1;
        let result = evm.transact(load).unwrap();

        assert!(result.success);
        // A fresh transaction reads zero: transient storage did not survive.
        assert_eq!(result.output.as_ref(), &[0u8; 32]);
    }

    #[test]
    fn call_to_empty_account_with_zero_value_succeeds() {
        let ghost = Address::repeat_byte(0x99);
        let mut code = vec![
            0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x73,
        ];
        code.extend_from_slice(ghost.as_slice());
        code.extend_from_slice(&[0x61, 0xFF, 0xFF, 0xF1]);
        code.extend_from_slice(&[0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xF3]);

        let mut evm = Evm::new(state_with_code(&code), Fork::Cancun);
        let result = evm.transact(call_tx(CONTRACT, 200_000)).unwrap();

        assert!(result.success);
        let mut expected = [0u8; 32];
        expected[31] = 1;
        assert_eq!(result.output.as_ref(), &expected);
        // No account materialized.
        assert!(!evm.backend().exists(ghost));
    }

    #[test]
    fn delegatecall_writes_the_callers_storage() {
        let library = Address::repeat_byte(0x22);
        let mut code = vec![0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x73];
        code.extend_from_slice(library.as_slice());
        code.extend_from_slice(&[0x61, 0xFF, 0xFF, 0xF4, 0x00]);

        let mut state = state_with_code(&code);
        state.insert(
            library,
            Account {
                // PUSH1 7; PUSH1 0; SSTORE; STOP
                code: Bytes::from(vec![0x60, 0x07, 0x60, 0x00, 0x55, 0x00]),
                ..Account::default()
            },
        );

        let mut evm = Evm::new(state, Fork::Cancun);
        let result = evm.transact(call_tx(CONTRACT, 200_000)).unwrap();

        assert!(result.success);
        assert_eq!(evm.backend().storage(CONTRACT, U256::ZERO), U256::from(7));
        assert_eq!(evm.backend().storage(library, U256::ZERO), U256::ZERO);
    }

    #[test]
    fn reverted_subcall_keeps_gas_but_not_state() {
        let child = Address::repeat_byte(0x33);
        let mut code = vec![0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x73];
        code.extend_from_slice(child.as_slice());
        code.extend_from_slice(&[0x61, 0xFF, 0xFF, 0xF1]);
        code.extend_from_slice(&[0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xF3]);

        let mut state = state_with_code(&code);
        state.insert(
            child,
            Account {
                // PUSH1 9; PUSH1 0; SSTORE; PUSH1 0; PUSH1 0; REVERT
                code: Bytes::from(vec![
                    0x60, 0x09, 0x60, 0x00, 0x55, 0x60, 0x00, 0x60, 0x00, 0xFD,
                ]),
                ..Account::default()
            },
        );

        let mut evm = Evm::new(state, Fork::Cancun);
        let result = evm.transact(call_tx(CONTRACT, 200_000)).unwrap();

        assert!(result.success);
        // The child's write rolled back and the status word is 0.
        assert_eq!(result.output.as_ref(), &[0u8; 32]);
        assert_eq!(evm.backend().storage(child, U256::ZERO), U256::ZERO);
        // The child's SSTORE gas stayed consumed: more than a plain call.
        assert!(result.gas_used > 44_000);
    }

    #[test]
    fn access_list_pre_warms_slots() {
        // PUSH1 0; SLOAD; STOP — slot 0 is in the access list, so warm.
        let code = [0x60, 0x00, 0x54, 0x00];
        let mut evm = Evm::new(state_with_code(&code), Fork::Cancun);

        let mut tx = call_tx(CONTRACT, 100_000);
        tx.access_list = vec![AccessListItem {
            address: CONTRACT,
            storage_keys: vec![U256::ZERO],
        }];
        let result = evm.transact(tx).unwrap();

        assert!(result.success);
        // 21000 + 2400 + 1900 intrinsic, then 3 + 100 warm + 0.
        assert_eq!(result.gas_used, 21_000 + 2_400 + 1_900 + 3 + 100);
    }

    #[test]
    fn set_code_transaction_installs_and_resolves_delegation() {
        let authority = Address::repeat_byte(0x77);
        let target = Address::repeat_byte(0x88);

        let mut state = InMemoryState::default();
        state.insert(SENDER, Account::with_balance(U256::from(10_u64.pow(18))));
        state.insert(
            target,
            Account {
                // PUSH1 1; PUSH1 0; SSTORE; STOP
                code: Bytes::from(vec![0x60, 0x01, 0x60, 0x00, 0x55, 0x00]),
                ..Account::default()
            },
        );

        let mut evm = Evm::new(state, Fork::Prague);
        let mut tx = call_tx(authority, 200_000);
        tx.authorizations = vec![Authorization {
            chain_id: U256::ZERO,
            address: target,
            nonce: 0,
            authority: Some(authority),
        }];
        let result = evm.transact(tx).unwrap();

        assert!(result.success);
        // The designator is installed on the authority...
        let installed = evm.backend().code(authority);
        assert_eq!(installed.len(), 23);
        assert_eq!(&installed[..3], &[0xEF, 0x01, 0x00]);
        assert_eq!(&installed[3..], target.as_slice());
        assert_eq!(evm.backend().nonce(authority), 1);
        // ...and the call ran the target's code in the authority's context.
        assert_eq!(evm.backend().storage(authority, U256::ZERO), U256::from(1));
        assert_eq!(evm.backend().storage(target, U256::ZERO), U256::ZERO);
    }

    #[test]
    fn blob_gas_is_bought_upfront_and_not_refunded() {
        let code = [0x00];
        let mut evm = Evm::new(state_with_code(&code), Fork::Cancun);
        let before = evm.backend().balance(SENDER);

        let mut tx = call_tx(CONTRACT, 100_000);
        tx.blob_hashes = vec![B256::repeat_byte(1)];
        tx.max_fee_per_blob_gas = U256::from(1);
        let result = evm.transact(tx).unwrap();

        assert!(result.success);
        // One blob at the default blob base fee of 1 wei per gas.
        let after = evm.backend().balance(SENDER);
        assert_eq!(before - after, U256::from(gas::BLOB_GAS_PER_BLOB));
    }

    #[test]
    fn invalid_transactions_leave_no_trace() {
        let code = [0x00];
        let mut evm = Evm::new(state_with_code(&code), Fork::Cancun);

        let mut tx = call_tx(CONTRACT, 100_000);
        tx.nonce = 9;
        assert!(matches!(
            evm.transact(tx),
            Err(InvalidTransaction::NonceMismatch { tx: 9, account: 0 })
        ));

        let tx = call_tx(CONTRACT, 20_000);
        assert!(matches!(
            evm.transact(tx),
            Err(InvalidTransaction::GasLimitBelowIntrinsic { .. })
        ));

        // Nothing changed: nonce still 0, balance untouched.
        assert_eq!(evm.backend().nonce(SENDER), 0);
        assert_eq!(
            evm.backend().balance(SENDER),
            U256::from(10_u64.pow(18))
        );
    }

    #[test]
    fn selfdestruct_of_preexisting_account_survives_on_cancun() {
        let doomed = Address::repeat_byte(0x44);
        let beneficiary = Address::repeat_byte(0x55);

        let mut state = state_with_code(&[]);
        state.insert(
            doomed,
            Account {
                balance: U256::from(1_000),
                // PUSH20 beneficiary; SELFDESTRUCT
                code: {
                    let mut code = vec![0x73];
                    code.extend_from_slice(beneficiary.as_slice());
                    code.push(0xFF);
                    Bytes::from(code)
                },
                ..Account::default()
            },
        );

        let mut evm = Evm::new(state, Fork::Cancun);
        let result = evm.transact(call_tx(doomed, 100_000)).unwrap();
        assert!(result.success);

        // EIP-6780: funds move but the pre-existing account survives.
        assert_eq!(evm.backend().balance(beneficiary), U256::from(1_000));
        assert_eq!(evm.backend().balance(doomed), U256::ZERO);
        assert!(evm.backend().exists(doomed));
        assert!(!evm.backend().code(doomed).is_empty());

        // The same story on London deletes the account.
        let mut state = state_with_code(&[]);
        state.insert(
            doomed,
            Account {
                balance: U256::from(1_000),
                code: {
                    let mut code = vec![0x73];
                    code.extend_from_slice(beneficiary.as_slice());
                    code.push(0xFF);
                    Bytes::from(code)
                },
                ..Account::default()
            },
        );
        let mut evm = Evm::new(state, Fork::London);
        let result = evm.transact(call_tx(doomed, 100_000)).unwrap();
        assert!(result.success);
        assert_eq!(evm.backend().balance(beneficiary), U256::from(1_000));
        assert!(!evm.backend().exists(doomed));
    }

    #[test]
    fn create_transaction_deploys_code() {
        let mut state = InMemoryState::default();
        state.insert(SENDER, Account::with_balance(U256::from(10_u64.pow(18))));

        // Initcode: PUSH1 1 (one byte of code: STOP); PUSH1 0; ... return
        // the byte at offset 31 of the stored word. Simpler: store 0x00 and
        // return 1 byte => deploys [0x00].
        // PUSH1 0; PUSH1 0; MSTORE8; PUSH1 1; PUSH1 0; RETURN
        let init = vec![0x60, 0x00, 0x60, 0x00, 0x53, 0x60, 0x01, 0x60, 0x00, 0xF3];

        let mut evm = Evm::new(state, Fork::Cancun);
        let tx = TxEnv {
            caller: SENDER,
            kind: TxKind::Create,
            data: Bytes::from(init),
            gas_limit: 200_000,
            ..TxEnv::default()
        };
        let result = evm.transact(tx).unwrap();

        assert!(result.success);
        let created = result.created_address.unwrap();
        assert_eq!(created, SENDER.create(0));
        assert_eq!(evm.backend().code(created).as_ref(), &[0x00]);
        assert_eq!(evm.backend().nonce(created), 1);
        assert_eq!(evm.backend().nonce(SENDER), 1);
    }
}
