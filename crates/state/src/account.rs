//! Account state.

use alloy_primitives::{Bytes, U256};
use std::collections::HashMap;

/// State of a single account: balance, nonce, code and storage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Account {
    /// Account balance in wei.
    pub balance: U256,
    /// Number of transactions sent (for externally owned accounts) or contracts
    /// created (for contract accounts).
    pub nonce: u64,
    /// Contract bytecode. Empty for externally owned accounts.
    pub code: Bytes,
    /// Persistent storage slots. Absent slots read as zero.
    pub storage: HashMap<U256, U256>,
}

impl Account {
    /// Creates an account holding the given balance and nothing else.
    ///
    /// # Example
    /// ```
    /// # use alloy_primitives::U256;
    /// # use fovea_state::Account;
    /// let account = Account::with_balance(U256::from(7));
    /// assert_eq!(account.balance, U256::from(7));
    /// assert_eq!(account.nonce, 0);
    /// ```
    #[must_use]
    pub fn with_balance(balance: U256) -> Self {
        Self {
            balance,
            ..Self::default()
        }
    }

    /// Returns [`true`] if the account is empty in the EIP-161 sense: zero
    /// balance, zero nonce and no code.
    ///
    /// # Example
    /// ```
    /// # use alloy_primitives::U256;
    /// # use fovea_state::Account;
    /// assert!(Account::default().is_empty());
    /// assert!(!Account::with_balance(U256::from(1)).is_empty());
    /// ```
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balance.is_zero() && self.nonce == 0 && self.code.is_empty()
    }
}
