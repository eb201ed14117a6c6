//! Host state backends.

use crate::Account;
use alloy_primitives::{Address, Bytes, U256};
use std::collections::HashMap;

/// Host-provided account state.
///
/// The execution core layers its own journaling, warm/cold accounting and
/// transient storage on top of this boundary; a backend only has to answer
/// point reads and accept point writes. Absent accounts read as zero balance,
/// zero nonce, empty code and zeroed storage.
pub trait Backend {
    /// Balance of the account in wei.
    fn balance(&self, address: Address) -> U256;

    /// Overwrites the balance of the account, materializing it if absent.
    fn set_balance(&mut self, address: Address, balance: U256);

    /// Nonce of the account.
    fn nonce(&self, address: Address) -> u64;

    /// Overwrites the nonce of the account, materializing it if absent.
    fn set_nonce(&mut self, address: Address, nonce: u64);

    /// Bytecode of the account. Empty if the account has no code.
    fn code(&self, address: Address) -> Bytes;

    /// Overwrites the bytecode of the account, materializing it if absent.
    fn set_code(&mut self, address: Address, code: Bytes);

    /// Value of a storage slot. Zero if never written.
    fn storage(&self, address: Address, slot: U256) -> U256;

    /// Overwrites a storage slot, materializing the account if absent.
    fn set_storage(&mut self, address: Address, slot: U256, value: U256);

    /// Returns [`true`] if the account exists at all, even if empty.
    fn exists(&self, address: Address) -> bool;

    /// Removes the account and all of its storage.
    fn remove_account(&mut self, address: Address);
}

impl<T: Backend + ?Sized> Backend for &mut T {
    fn balance(&self, address: Address) -> U256 {
        (**self).balance(address)
    }

    fn set_balance(&mut self, address: Address, balance: U256) {
        (**self).set_balance(address, balance);
    }

    fn nonce(&self, address: Address) -> u64 {
        (**self).nonce(address)
    }

    fn set_nonce(&mut self, address: Address, nonce: u64) {
        (**self).set_nonce(address, nonce);
    }

    fn code(&self, address: Address) -> Bytes {
        (**self).code(address)
    }

    fn set_code(&mut self, address: Address, code: Bytes) {
        (**self).set_code(address, code);
    }

    fn storage(&self, address: Address, slot: U256) -> U256 {
        (**self).storage(address, slot)
    }

    fn set_storage(&mut self, address: Address, slot: U256, value: U256) {
        (**self).set_storage(address, slot, value);
    }

    fn exists(&self, address: Address) -> bool {
        (**self).exists(address)
    }

    fn remove_account(&mut self, address: Address) {
        (**self).remove_account(address);
    }
}

/// Self-contained account state held in a hash map.
///
/// # Example
/// ```
/// # use alloy_primitives::{Address, U256};
/// # use fovea_state::{Account, Backend, InMemoryState};
/// let mut state = InMemoryState::default();
/// let address = Address::repeat_byte(0xAA);
/// state.insert(address, Account::with_balance(U256::from(100)));
/// assert_eq!(state.balance(address), U256::from(100));
/// assert_eq!(state.balance(Address::ZERO), U256::ZERO);
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryState {
    /// Accounts keyed by address.
    accounts: HashMap<Address, Account>,
}

impl InMemoryState {
    /// Inserts an account, replacing any previous state at the address.
    pub fn insert(&mut self, address: Address, account: Account) {
        self.accounts.insert(address, account);
    }

    /// Returns the account at the address, if it exists.
    #[must_use]
    pub fn account(&self, address: Address) -> Option<&Account> {
        self.accounts.get(&address)
    }

    /// Account entry, materializing a default account if absent.
    fn entry(&mut self, address: Address) -> &mut Account {
        self.accounts.entry(address).or_default()
    }
}

impl Backend for InMemoryState {
    fn balance(&self, address: Address) -> U256 {
        self.accounts
            .get(&address)
            .map_or(U256::ZERO, |account| account.balance)
    }

    fn set_balance(&mut self, address: Address, balance: U256) {
        self.entry(address).balance = balance;
    }

    fn nonce(&self, address: Address) -> u64 {
        self.accounts
            .get(&address)
            .map_or(0, |account| account.nonce)
    }

    fn set_nonce(&mut self, address: Address, nonce: u64) {
        self.entry(address).nonce = nonce;
    }

    fn code(&self, address: Address) -> Bytes {
        self.accounts
            .get(&address)
            .map_or_else(Bytes::new, |account| account.code.clone())
    }

    fn set_code(&mut self, address: Address, code: Bytes) {
        self.entry(address).code = code;
    }

    fn storage(&self, address: Address, slot: U256) -> U256 {
        self.accounts
            .get(&address)
            .and_then(|account| account.storage.get(&slot))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    fn set_storage(&mut self, address: Address, slot: U256, value: U256) {
        self.entry(address).storage.insert(slot, value);
    }

    fn exists(&self, address: Address) -> bool {
        self.accounts.contains_key(&address)
    }

    fn remove_account(&mut self, address: Address) {
        self.accounts.remove(&address);
    }
}

/// Where account state lives: inside the core or behind a host boundary.
///
/// Distinguishes the two modes statically instead of threading a nullable
/// host pointer through the execution core.
pub enum StateSource<'host> {
    /// Self-contained mode backed by an owned [`InMemoryState`].
    Memory(InMemoryState),
    /// Delegated mode backed by a host implementation.
    External(&'host mut dyn Backend),
}

impl Default for StateSource<'_> {
    fn default() -> Self {
        Self::Memory(InMemoryState::default())
    }
}

impl Backend for StateSource<'_> {
    fn balance(&self, address: Address) -> U256 {
        match self {
            Self::Memory(state) => state.balance(address),
            Self::External(host) => host.balance(address),
        }
    }

    fn set_balance(&mut self, address: Address, balance: U256) {
        match self {
            Self::Memory(state) => state.set_balance(address, balance),
            Self::External(host) => host.set_balance(address, balance),
        }
    }

    fn nonce(&self, address: Address) -> u64 {
        match self {
            Self::Memory(state) => state.nonce(address),
            Self::External(host) => host.nonce(address),
        }
    }

    fn set_nonce(&mut self, address: Address, nonce: u64) {
        match self {
            Self::Memory(state) => state.set_nonce(address, nonce),
            Self::External(host) => host.set_nonce(address, nonce),
        }
    }

    fn code(&self, address: Address) -> Bytes {
        match self {
            Self::Memory(state) => state.code(address),
            Self::External(host) => host.code(address),
        }
    }

    fn set_code(&mut self, address: Address, code: Bytes) {
        match self {
            Self::Memory(state) => state.set_code(address, code),
            Self::External(host) => host.set_code(address, code),
        }
    }

    fn storage(&self, address: Address, slot: U256) -> U256 {
        match self {
            Self::Memory(state) => state.storage(address, slot),
            Self::External(host) => host.storage(address, slot),
        }
    }

    fn set_storage(&mut self, address: Address, slot: U256, value: U256) {
        match self {
            Self::Memory(state) => state.set_storage(address, slot, value),
            Self::External(host) => host.set_storage(address, slot, value),
        }
    }

    fn exists(&self, address: Address) -> bool {
        match self {
            Self::Memory(state) => state.exists(address),
            Self::External(host) => host.exists(address),
        }
    }

    fn remove_account(&mut self, address: Address) {
        match self {
            Self::Memory(state) => state.remove_account(address),
            Self::External(host) => host.remove_account(address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_accounts_read_as_zero() {
        let state = InMemoryState::default();
        let address = Address::repeat_byte(1);

        assert_eq!(state.balance(address), U256::ZERO);
        assert_eq!(state.nonce(address), 0);
        assert!(state.code(address).is_empty());
        assert_eq!(state.storage(address, U256::from(3)), U256::ZERO);
        assert!(!state.exists(address));
    }

    #[test]
    fn writes_materialize_accounts() {
        let mut state = InMemoryState::default();
        let address = Address::repeat_byte(2);

        state.set_storage(address, U256::from(1), U256::from(9));
        assert!(state.exists(address));
        assert_eq!(state.storage(address, U256::from(1)), U256::from(9));

        state.remove_account(address);
        assert!(!state.exists(address));
        assert_eq!(state.storage(address, U256::from(1)), U256::ZERO);
    }

    #[test]
    fn state_source_delegates() {
        let mut host = InMemoryState::default();
        let address = Address::repeat_byte(3);
        host.insert(address, Account::with_balance(U256::from(5)));

        let source = StateSource::External(&mut host);
        assert_eq!(source.balance(address), U256::from(5));

        let mut owned = StateSource::default();
        owned.set_balance(address, U256::from(6));
        assert_eq!(owned.balance(address), U256::from(6));
    }
}
