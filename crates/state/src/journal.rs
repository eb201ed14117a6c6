//! Pre-image journaling over a state backend.

use crate::{Backend, Log, StateError};
use alloy_primitives::{Address, B256, Bytes, U256};
use forks::{Eip, Fork, MAX_CODE_SIZE};
use std::collections::{HashMap, HashSet};

/// Identifier of a state checkpoint created by [`Journal::snapshot`].
pub type SnapshotId = usize;

/// A recorded pre-image. Reverting replays these in LIFO order.
#[derive(Clone, Debug)]
enum Entry {
    /// Balance of `address` was `previous` before the write.
    Balance {
        /// Account whose balance changed.
        address: Address,
        /// Balance before the write.
        previous: U256,
    },
    /// Nonce of `address` was `previous` before the write.
    Nonce {
        /// Account whose nonce changed.
        address: Address,
        /// Nonce before the write.
        previous: u64,
    },
    /// Code of `address` was `previous` before the write.
    Code {
        /// Account whose code changed.
        address: Address,
        /// Code before the write.
        previous: Bytes,
    },
    /// Storage slot held `previous` before the write.
    Storage {
        /// Account whose storage changed.
        address: Address,
        /// Slot that changed.
        slot: U256,
        /// Value before the write.
        previous: U256,
    },
    /// Transient storage slot held `previous` before the write.
    Transient {
        /// Account whose transient storage changed.
        address: Address,
        /// Slot that changed.
        slot: U256,
        /// Value before the write.
        previous: U256,
    },
    /// The address entered the warm set.
    AddressWarmed {
        /// Address that became warm.
        address: Address,
    },
    /// The storage slot entered the warm set.
    SlotWarmed {
        /// Account the slot belongs to.
        address: Address,
        /// Slot that became warm.
        slot: U256,
    },
    /// The account was marked for self-destruction.
    DestructMarked {
        /// Account that self-destructed.
        address: Address,
    },
    /// The account was recorded as created in this transaction.
    Created {
        /// Account created in this transaction.
        address: Address,
    },
}

/// A checkpoint: lengths of the mutable sequences at snapshot time.
#[derive(Clone, Copy, Debug)]
struct Checkpoint {
    /// Journal length at snapshot time.
    entries: usize,
    /// Log count at snapshot time.
    logs: usize,
    /// Refund counter at snapshot time.
    refund: i64,
}

/// Summary of one account's net change over a transaction.
#[derive(Clone, Debug, Default)]
pub struct StateChange {
    /// Account the change applies to.
    pub address: Address,
    /// Final balance, if the balance was written.
    pub balance: Option<U256>,
    /// Final nonce, if the nonce was written.
    pub nonce: Option<u64>,
    /// Final code, if code was deployed or replaced.
    pub code: Option<Bytes>,
    /// Final values of written storage slots, sorted by slot.
    pub storage: Vec<(U256, U256)>,
    /// Whether the account was destroyed at the end of the transaction.
    pub destroyed: bool,
}

/// Transaction-scoped journaled state.
///
/// Mutations write through to the wrapped [`Backend`] and record pre-images;
/// [`Journal::snapshot`] is O(1) and [`Journal::revert_to`] is proportional to
/// the number of changes made after the snapshot.
///
/// # Example
/// ```
/// # use alloy_primitives::{Address, U256};
/// # use forks::Fork;
/// # use fovea_state::{InMemoryState, Journal};
/// let mut journal = Journal::new(InMemoryState::default(), Fork::Cancun);
/// let address = Address::repeat_byte(1);
///
/// let snapshot = journal.snapshot();
/// journal.set_balance(address, U256::from(10));
/// journal.revert_to(snapshot);
/// assert_eq!(journal.balance(address), U256::ZERO);
/// ```
pub struct Journal<B> {
    /// The backing store all reads and writes go through.
    backend: B,
    /// Active fork; gates warm/cold tracking and code deployment checks.
    fork: Fork,
    /// Recorded pre-images since transaction start.
    entries: Vec<Entry>,
    /// Open checkpoints, oldest first.
    checkpoints: Vec<Checkpoint>,
    /// Storage slots journaled in the current frame scope. One set per open
    /// checkpoint plus the root scope; a slot is journaled once per scope.
    written: Vec<HashSet<(Address, U256)>>,
    /// Addresses accessed this transaction (EIP-2929).
    warm_addresses: HashSet<Address>,
    /// Storage slots accessed this transaction (EIP-2929).
    warm_slots: HashSet<(Address, U256)>,
    /// Transient storage (EIP-1153); cleared between transactions.
    transient: HashMap<(Address, U256), U256>,
    /// Storage values at transaction start, recorded on first access.
    original_storage: HashMap<(Address, U256), U256>,
    /// Logs emitted so far, in order.
    logs: Vec<Log>,
    /// Running refund counter. May be negative mid-transaction; clamped at
    /// transaction end by the orchestrator.
    refund: i64,
    /// Accounts marked for destruction, in marking order.
    destructs: Vec<Address>,
    /// Set view of `destructs`.
    destructed: HashSet<Address>,
    /// Accounts created in this transaction (EIP-6780).
    created: HashSet<Address>,
}

impl<B: Backend> Journal<B> {
    /// Wraps a backend for one transaction under the given fork.
    pub fn new(backend: B, fork: Fork) -> Self {
        Self {
            backend,
            fork,
            entries: Vec::new(),
            checkpoints: Vec::new(),
            written: vec![HashSet::new()],
            warm_addresses: HashSet::new(),
            warm_slots: HashSet::new(),
            transient: HashMap::new(),
            original_storage: HashMap::new(),
            logs: Vec::new(),
            refund: 0,
            destructs: Vec::new(),
            destructed: HashSet::new(),
            created: HashSet::new(),
        }
    }

    /// The active fork.
    #[must_use]
    pub fn fork(&self) -> Fork {
        self.fork
    }

    /// Shared access to the wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consumes the journal, returning the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Drops all transaction-scoped bookkeeping, readying the journal for the
    /// next transaction. Committed backend state is untouched; transient
    /// storage is wiped (EIP-1153).
    pub fn reset(&mut self) {
        self.entries.clear();
        self.checkpoints.clear();
        self.written = vec![HashSet::new()];
        self.warm_addresses.clear();
        self.warm_slots.clear();
        self.transient.clear();
        self.original_storage.clear();
        self.logs.clear();
        self.refund = 0;
        self.destructs.clear();
        self.destructed.clear();
        self.created.clear();
    }

    // --- balances ---

    /// Balance of the account.
    #[must_use]
    pub fn balance(&self, address: Address) -> U256 {
        self.backend.balance(address)
    }

    /// Overwrites the balance of the account.
    pub fn set_balance(&mut self, address: Address, balance: U256) {
        let previous = self.backend.balance(address);
        self.entries.push(Entry::Balance { address, previous });
        self.backend.set_balance(address, balance);
    }

    /// Moves `value` wei from one account to another.
    ///
    /// A zero-value transfer is a no-op and journals nothing.
    ///
    /// # Errors
    /// Returns [`StateError::BalanceUnderflow`] if the sender cannot cover the
    /// value; no state is changed in that case.
    pub fn transfer(&mut self, from: Address, to: Address, value: U256) -> Result<(), StateError> {
        if value.is_zero() {
            return Ok(());
        }
        let from_balance = self.backend.balance(from);
        let Some(remainder) = from_balance.checked_sub(value) else {
            return Err(StateError::BalanceUnderflow(from));
        };
        self.set_balance(from, remainder);
        let to_balance = self.backend.balance(to);
        self.set_balance(to, to_balance.saturating_add(value));
        Ok(())
    }

    // --- nonces ---

    /// Nonce of the account.
    #[must_use]
    pub fn nonce(&self, address: Address) -> u64 {
        self.backend.nonce(address)
    }

    /// Overwrites the nonce of the account.
    pub fn set_nonce(&mut self, address: Address, nonce: u64) {
        let previous = self.backend.nonce(address);
        self.entries.push(Entry::Nonce { address, previous });
        self.backend.set_nonce(address, nonce);
    }

    /// Increments the nonce of the account, returning its previous value.
    ///
    /// # Errors
    /// Returns [`StateError::NonceOverflow`] if the nonce is already at
    /// 2^64 - 1 (EIP-2681).
    pub fn increment_nonce(&mut self, address: Address) -> Result<u64, StateError> {
        let previous = self.backend.nonce(address);
        let next = previous
            .checked_add(1)
            .ok_or(StateError::NonceOverflow(address))?;
        self.set_nonce(address, next);
        Ok(previous)
    }

    // --- code ---

    /// Bytecode of the account.
    #[must_use]
    pub fn code(&self, address: Address) -> Bytes {
        self.backend.code(address)
    }

    /// Overwrites the bytecode of the account without deployment checks.
    ///
    /// Used for EIP-7702 delegation designators, which legitimately start with
    /// `0xEF`; contract deployment goes through [`Journal::deploy_code`].
    pub fn set_code(&mut self, address: Address, code: Bytes) {
        let previous = self.backend.code(address);
        self.entries.push(Entry::Code { address, previous });
        self.backend.set_code(address, code);
    }

    /// Deploys contract code, enforcing the fork's deployment rules.
    ///
    /// # Errors
    /// Returns [`StateError::InvalidCodePrefix`] for code starting with `0xEF`
    /// from London on (EIP-3541) and [`StateError::CodeSizeLimit`] for code
    /// over 24 576 bytes from Spurious Dragon on (EIP-170).
    pub fn deploy_code(&mut self, address: Address, code: Bytes) -> Result<(), StateError> {
        if self.fork.includes(Eip::Eip3541) && code.first() == Some(&0xEF) {
            return Err(StateError::InvalidCodePrefix);
        }
        if self.fork.includes(Eip::Eip170) && code.len() > MAX_CODE_SIZE {
            return Err(StateError::CodeSizeLimit { size: code.len() });
        }
        self.set_code(address, code);
        Ok(())
    }

    // --- storage ---

    /// Value of a storage slot, recording the transaction-start original on
    /// first access.
    pub fn storage(&mut self, address: Address, slot: U256) -> U256 {
        let value = self.backend.storage(address, slot);
        self.original_storage.entry((address, slot)).or_insert(value);
        value
    }

    /// Value the slot held at transaction start. Stable across the
    /// transaction regardless of intermediate writes and reverts.
    pub fn original_storage(&mut self, address: Address, slot: U256) -> U256 {
        if let Some(original) = self.original_storage.get(&(address, slot)) {
            return *original;
        }
        let value = self.backend.storage(address, slot);
        self.original_storage.insert((address, slot), value);
        value
    }

    /// Writes a storage slot, journaling the pre-value once per frame scope.
    pub fn set_storage(&mut self, address: Address, slot: U256, value: U256) {
        let previous = self.backend.storage(address, slot);
        self.original_storage
            .entry((address, slot))
            .or_insert(previous);
        let scope = self
            .written
            .last_mut()
            .unwrap_or_else(|| unreachable!("root scope always present"));
        if scope.insert((address, slot)) {
            self.entries.push(Entry::Storage {
                address,
                slot,
                previous,
            });
        }
        self.backend.set_storage(address, slot, value);
    }

    // --- transient storage ---

    /// Value of a transient storage slot (EIP-1153). Zero if never written
    /// this transaction.
    #[must_use]
    pub fn transient(&self, address: Address, slot: U256) -> U256 {
        self.transient
            .get(&(address, slot))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Writes a transient storage slot (EIP-1153).
    pub fn set_transient(&mut self, address: Address, slot: U256, value: U256) {
        let previous = self
            .transient
            .insert((address, slot), value)
            .unwrap_or(U256::ZERO);
        self.entries.push(Entry::Transient {
            address,
            slot,
            previous,
        });
    }

    // --- logs ---

    /// Appends a log record.
    pub fn emit_log(&mut self, address: Address, topics: Vec<B256>, data: Bytes) {
        self.logs.push(Log {
            address,
            topics,
            data,
        });
    }

    /// Logs emitted so far, in emission order.
    #[must_use]
    pub fn logs(&self) -> &[Log] {
        &self.logs
    }

    /// Takes all emitted logs, leaving the journal's log list empty.
    pub fn take_logs(&mut self) -> Vec<Log> {
        std::mem::take(&mut self.logs)
    }

    // --- warm/cold accounting ---

    /// Marks an address as accessed, returning [`true`] if it was cold.
    ///
    /// Before Berlin there is no warm set; every access reports cold and the
    /// fixed gas schedules ignore the answer.
    pub fn touch_address(&mut self, address: Address) -> bool {
        if !self.fork.includes(Eip::Eip2929) {
            return true;
        }
        let was_cold = self.warm_addresses.insert(address);
        if was_cold {
            self.entries.push(Entry::AddressWarmed { address });
        }
        was_cold
    }

    /// Marks a storage slot as accessed, returning [`true`] if it was cold.
    pub fn touch_slot(&mut self, address: Address, slot: U256) -> bool {
        if !self.fork.includes(Eip::Eip2929) {
            return true;
        }
        let was_cold = self.warm_slots.insert((address, slot));
        if was_cold {
            self.entries.push(Entry::SlotWarmed { address, slot });
        }
        was_cold
    }

    // --- refunds ---

    /// Adds to the refund counter.
    pub fn add_refund(&mut self, amount: u64) {
        self.refund += i64::try_from(amount).unwrap_or(i64::MAX);
    }

    /// Subtracts from the refund counter. The counter may go negative between
    /// operations; it is clamped at transaction end only.
    pub fn sub_refund(&mut self, amount: u64) {
        self.refund -= i64::try_from(amount).unwrap_or(i64::MAX);
    }

    /// Current (unclamped) refund counter.
    #[must_use]
    pub fn refund(&self) -> i64 {
        self.refund
    }

    // --- self-destructs and creations ---

    /// Marks the account for destruction at transaction end, returning
    /// [`true`] if this is its first mark this transaction.
    pub fn mark_self_destruct(&mut self, address: Address) -> bool {
        let first = self.destructed.insert(address);
        if first {
            self.destructs.push(address);
            self.entries.push(Entry::DestructMarked { address });
        }
        first
    }

    /// Accounts marked for destruction, in marking order.
    #[must_use]
    pub fn self_destructs(&self) -> &[Address] {
        &self.destructs
    }

    /// Records that the account was created in this transaction.
    pub fn mark_created(&mut self, address: Address) {
        if self.created.insert(address) {
            self.entries.push(Entry::Created { address });
        }
    }

    /// Returns [`true`] if the account was created in this transaction
    /// (EIP-6780).
    #[must_use]
    pub fn created_this_transaction(&self, address: Address) -> bool {
        self.created.contains(&address)
    }

    /// Removes the account from the backend. Used by the orchestrator when
    /// resolving self-destructs; not journaled, so only valid after the last
    /// snapshot of the transaction has been committed.
    pub fn delete_account(&mut self, address: Address) {
        self.backend.remove_account(address);
    }

    // --- existence ---

    /// Returns [`true`] if the account exists in the backend.
    #[must_use]
    pub fn exists(&self, address: Address) -> bool {
        self.backend.exists(address)
    }

    /// Returns [`true`] if the account is empty per EIP-161.
    #[must_use]
    pub fn is_empty(&self, address: Address) -> bool {
        self.backend.balance(address).is_zero()
            && self.backend.nonce(address) == 0
            && self.backend.code(address).is_empty()
    }

    /// Returns [`true`] if the account counts as dead for the new-account
    /// call surcharge: empty per EIP-161 from Spurious Dragon, nonexistent
    /// before.
    #[must_use]
    pub fn is_dead(&self, address: Address) -> bool {
        if self.fork.includes(Eip::Eip161) {
            self.is_empty(address)
        } else {
            !self.exists(address)
        }
    }

    // --- snapshots ---

    /// Creates a checkpoint of the current state. O(1).
    pub fn snapshot(&mut self) -> SnapshotId {
        let id = self.checkpoints.len();
        self.checkpoints.push(Checkpoint {
            entries: self.entries.len(),
            logs: self.logs.len(),
            refund: self.refund,
        });
        self.written.push(HashSet::new());
        id
    }

    /// Discards the checkpoint, making all changes since it permanent from the
    /// caller's point of view. Later checkpoints are discarded with it.
    ///
    /// # Panics
    /// Panics if the snapshot id was never issued or was already consumed.
    pub fn commit(&mut self, snapshot: SnapshotId) {
        assert!(snapshot < self.checkpoints.len(), "unknown snapshot");
        self.checkpoints.truncate(snapshot);
        self.written.truncate(snapshot + 1);
    }

    /// Rolls back every mutation recorded after the checkpoint, in LIFO
    /// order. Later checkpoints are implicitly invalidated.
    ///
    /// # Panics
    /// Panics if the snapshot id was never issued or was already consumed.
    pub fn revert_to(&mut self, snapshot: SnapshotId) {
        assert!(snapshot < self.checkpoints.len(), "unknown snapshot");
        let checkpoint = self.checkpoints[snapshot];

        while self.entries.len() > checkpoint.entries {
            let entry = self
                .entries
                .pop()
                .unwrap_or_else(|| unreachable!("length checked above"));
            self.undo(entry);
        }

        self.logs.truncate(checkpoint.logs);
        self.refund = checkpoint.refund;
        self.checkpoints.truncate(snapshot);
        self.written.truncate(snapshot + 1);
    }

    /// Applies a single pre-image.
    fn undo(&mut self, entry: Entry) {
        match entry {
            Entry::Balance { address, previous } => self.backend.set_balance(address, previous),
            Entry::Nonce { address, previous } => self.backend.set_nonce(address, previous),
            Entry::Code { address, previous } => self.backend.set_code(address, previous),
            Entry::Storage {
                address,
                slot,
                previous,
            } => self.backend.set_storage(address, slot, previous),
            Entry::Transient {
                address,
                slot,
                previous,
            } => {
                if previous.is_zero() {
                    self.transient.remove(&(address, slot));
                } else {
                    self.transient.insert((address, slot), previous);
                }
            }
            Entry::AddressWarmed { address } => {
                self.warm_addresses.remove(&address);
            }
            Entry::SlotWarmed { address, slot } => {
                self.warm_slots.remove(&(address, slot));
            }
            Entry::DestructMarked { address } => {
                self.destructed.remove(&address);
                self.destructs.pop();
            }
            Entry::Created { address } => {
                self.created.remove(&address);
            }
        }
    }

    // --- reporting ---

    /// Summarizes the net state change per touched account, reading final
    /// values from the backend. Sorted by address for stable output.
    #[must_use]
    pub fn collect_changes(&self) -> Vec<StateChange> {
        let mut changes: HashMap<Address, StateChange> = HashMap::new();
        let mut slots: HashMap<Address, HashSet<U256>> = HashMap::new();

        for entry in &self.entries {
            match entry {
                Entry::Balance { address, .. } => {
                    let change = changes.entry(*address).or_default();
                    change.address = *address;
                    change.balance = Some(self.backend.balance(*address));
                }
                Entry::Nonce { address, .. } => {
                    let change = changes.entry(*address).or_default();
                    change.address = *address;
                    change.nonce = Some(self.backend.nonce(*address));
                }
                Entry::Code { address, .. } => {
                    let change = changes.entry(*address).or_default();
                    change.address = *address;
                    change.code = Some(self.backend.code(*address));
                }
                Entry::Storage { address, slot, .. } => {
                    slots.entry(*address).or_default().insert(*slot);
                }
                _ => {}
            }
        }

        for (address, slots) in slots {
            let change = changes.entry(address).or_default();
            change.address = address;
            let mut written: Vec<(U256, U256)> = slots
                .into_iter()
                .map(|slot| (slot, self.backend.storage(address, slot)))
                .collect();
            written.sort_unstable_by_key(|(slot, _)| *slot);
            change.storage = written;
        }

        for address in &self.destructs {
            let change = changes.entry(*address).or_default();
            change.address = *address;
        }

        let mut changes: Vec<StateChange> = changes.into_values().collect();
        changes.sort_unstable_by_key(|change| change.address);
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryState;

    fn journal(fork: Fork) -> Journal<InMemoryState> {
        Journal::new(InMemoryState::default(), fork)
    }

    const fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn snapshot_then_revert_restores_state() {
        let mut journal = journal(Fork::Cancun);
        let a = addr(1);

        journal.set_balance(a, U256::from(100));
        journal.set_storage(a, U256::from(1), U256::from(7));

        let snapshot = journal.snapshot();
        journal.set_balance(a, U256::from(50));
        journal.set_storage(a, U256::from(1), U256::from(8));
        journal.set_transient(a, U256::from(2), U256::from(9));
        journal.emit_log(a, vec![], Bytes::new());
        journal.add_refund(4800);

        journal.revert_to(snapshot);

        assert_eq!(journal.balance(a), U256::from(100));
        assert_eq!(journal.storage(a, U256::from(1)), U256::from(7));
        assert_eq!(journal.transient(a, U256::from(2)), U256::ZERO);
        assert!(journal.logs().is_empty());
        assert_eq!(journal.refund(), 0);
    }

    #[test]
    fn snapshot_then_commit_is_transparent() {
        let mut journal = journal(Fork::Cancun);
        let a = addr(2);

        let snapshot = journal.snapshot();
        journal.set_balance(a, U256::from(5));
        journal.emit_log(a, vec![], Bytes::new());
        journal.commit(snapshot);

        assert_eq!(journal.balance(a), U256::from(5));
        assert_eq!(journal.logs().len(), 1);
    }

    #[test]
    fn nested_snapshots_revert_in_lifo_order() {
        let mut journal = journal(Fork::Cancun);
        let a = addr(3);
        let slot = U256::from(1);

        journal.set_storage(a, slot, U256::from(1));
        let outer = journal.snapshot();
        journal.set_storage(a, slot, U256::from(2));
        let inner = journal.snapshot();
        journal.set_storage(a, slot, U256::from(3));
        journal.commit(inner);

        // Committed inner changes still roll back with the outer snapshot.
        journal.revert_to(outer);
        assert_eq!(journal.storage(a, slot), U256::from(1));
    }

    #[test]
    fn reverting_outer_invalidates_inner() {
        let mut journal = journal(Fork::Cancun);
        let a = addr(4);

        let outer = journal.snapshot();
        let _inner = journal.snapshot();
        journal.set_balance(a, U256::from(1));
        journal.revert_to(outer);
        assert_eq!(journal.balance(a), U256::ZERO);
        // Both snapshots are gone; a new one starts fresh.
        assert_eq!(journal.snapshot(), 0);
    }

    #[test]
    fn original_storage_is_stable() {
        let mut state = InMemoryState::default();
        let a = addr(5);
        state.set_storage(a, U256::from(1), U256::from(42));
        let mut journal = Journal::new(state, Fork::Cancun);

        assert_eq!(journal.original_storage(a, U256::from(1)), U256::from(42));
        journal.set_storage(a, U256::from(1), U256::from(43));
        journal.set_storage(a, U256::from(1), U256::from(44));
        assert_eq!(journal.original_storage(a, U256::from(1)), U256::from(42));

        let snapshot = journal.snapshot();
        journal.set_storage(a, U256::from(1), U256::from(45));
        journal.revert_to(snapshot);
        assert_eq!(journal.original_storage(a, U256::from(1)), U256::from(42));
    }

    #[test]
    fn warm_sets_are_tagged_by_snapshot() {
        let mut journal = journal(Fork::Berlin);
        let a = addr(6);
        let b = addr(7);

        assert!(journal.touch_address(a));
        let snapshot = journal.snapshot();
        assert!(journal.touch_address(b));
        assert!(!journal.touch_address(b));
        journal.revert_to(snapshot);

        // `a` stays warm, `b` cooled with the revert.
        assert!(!journal.touch_address(a));
        assert!(journal.touch_address(b));
    }

    #[test]
    fn pre_berlin_touches_always_report_cold() {
        let mut journal = journal(Fork::Istanbul);
        let a = addr(8);
        assert!(journal.touch_address(a));
        assert!(journal.touch_address(a));
        assert!(journal.touch_slot(a, U256::ZERO));
        assert!(journal.touch_slot(a, U256::ZERO));
    }

    #[test]
    fn transfer_checks_balance() {
        let mut journal = journal(Fork::Cancun);
        let from = addr(9);
        let to = addr(10);

        journal.set_balance(from, U256::from(10));
        journal.transfer(from, to, U256::from(4)).unwrap();
        assert_eq!(journal.balance(from), U256::from(6));
        assert_eq!(journal.balance(to), U256::from(4));

        assert_eq!(
            journal.transfer(from, to, U256::from(100)),
            Err(StateError::BalanceUnderflow(from))
        );
        assert_eq!(journal.balance(from), U256::from(6));
    }

    #[test]
    fn nonce_overflow_is_rejected() {
        let mut journal = journal(Fork::Cancun);
        let a = addr(11);
        journal.set_nonce(a, u64::MAX);
        assert_eq!(
            journal.increment_nonce(a),
            Err(StateError::NonceOverflow(a))
        );
    }

    #[test]
    fn deploy_code_enforces_fork_rules() {
        let a = addr(12);

        let mut cancun = journal(Fork::Cancun);
        assert_eq!(
            cancun.deploy_code(a, Bytes::from(vec![0xEF, 0x00])),
            Err(StateError::InvalidCodePrefix)
        );
        assert_eq!(
            cancun.deploy_code(a, Bytes::from(vec![0; MAX_CODE_SIZE + 1])),
            Err(StateError::CodeSizeLimit {
                size: MAX_CODE_SIZE + 1
            })
        );
        cancun.deploy_code(a, Bytes::from(vec![0x00])).unwrap();

        // Before London the 0xEF prefix deploys fine.
        let mut berlin = journal(Fork::Berlin);
        berlin.deploy_code(a, Bytes::from(vec![0xEF, 0x00])).unwrap();

        // Before Spurious Dragon there is no size cap.
        let mut homestead = journal(Fork::Homestead);
        homestead
            .deploy_code(a, Bytes::from(vec![0; MAX_CODE_SIZE + 1]))
            .unwrap();
    }

    #[test]
    fn destruct_marks_revert_with_snapshot() {
        let mut journal = journal(Fork::Cancun);
        let a = addr(13);

        let snapshot = journal.snapshot();
        assert!(journal.mark_self_destruct(a));
        assert!(!journal.mark_self_destruct(a));
        assert_eq!(journal.self_destructs(), &[a]);
        journal.revert_to(snapshot);
        assert!(journal.self_destructs().is_empty());
        assert!(journal.mark_self_destruct(a));
    }

    #[test]
    fn refund_may_go_negative() {
        let mut journal = journal(Fork::London);
        journal.add_refund(4800);
        journal.sub_refund(9600);
        assert_eq!(journal.refund(), -4800);
    }

    #[test]
    fn collect_changes_reports_final_values() {
        let mut journal = journal(Fork::Cancun);
        let a = addr(14);

        journal.set_balance(a, U256::from(10));
        journal.set_storage(a, U256::from(2), U256::from(20));
        journal.set_storage(a, U256::from(1), U256::from(30));

        let changes = journal.collect_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].address, a);
        assert_eq!(changes[0].balance, Some(U256::from(10)));
        assert_eq!(
            changes[0].storage,
            vec![
                (U256::from(1), U256::from(30)),
                (U256::from(2), U256::from(20))
            ]
        );
    }
}
