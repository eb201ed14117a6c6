//! Ethereum network upgrades (hard forks).

use crate::eip::Eip;
use asm::Mnemonic;
use strum::{Display, EnumIter, EnumString};

/// An Ethereum execution-layer upgrade.
///
/// Variants are declared in activation order, so the derived [`Ord`] is the
/// chronological order of the upgrades and fork-sensitive rules reduce to
/// ordinary comparisons.
///
/// # Example
/// ```
/// # use fovea_forks::Fork;
/// assert!(Fork::Berlin < Fork::London);
/// assert!(Fork::Cancun.is_at_least(Fork::Shanghai));
/// assert_eq!(Fork::default(), Fork::Cancun);
/// ```
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Fork {
    /// Frontier, the original mainnet launch rule set.
    Frontier,
    /// Homestead: `DELEGATECALL`, creation-failure semantics, 64-bit call depth fix.
    Homestead,
    /// Tangerine Whistle (EIP-150): repriced IO-heavy operations, 63/64 gas forwarding.
    #[strum(serialize = "tangerine", serialize = "tangerine-whistle")]
    TangerineWhistle,
    /// Spurious Dragon: empty-account cleanup (EIP-161), code size limit (EIP-170),
    /// `EXP` repricing (EIP-160).
    #[strum(serialize = "spurious", serialize = "spurious-dragon")]
    SpuriousDragon,
    /// Byzantium: `REVERT`, `STATICCALL`, `RETURNDATASIZE`/`RETURNDATACOPY`.
    Byzantium,
    /// Constantinople: `CREATE2`, shifts, `EXTCODEHASH`, net SSTORE metering (EIP-1283).
    Constantinople,
    /// Istanbul: EIP-2200 SSTORE metering, repriced state reads (EIP-1884), cheaper
    /// calldata (EIP-2028), `CHAINID` and `SELFBALANCE`.
    Istanbul,
    /// Berlin: warm/cold access accounting (EIP-2929), typed transactions and access
    /// lists (EIP-2930).
    Berlin,
    /// London: EIP-1559 base fee, `BASEFEE`, reduced refunds (EIP-3529), `0xEF`
    /// deployment rejection (EIP-3541).
    London,
    /// Paris, the merge: `PREVRANDAO` replaces `DIFFICULTY` semantics.
    #[strum(serialize = "merge", serialize = "paris")]
    Paris,
    /// Shanghai: `PUSH0`, initcode size limit and metering (EIP-3860), warm coinbase.
    Shanghai,
    /// Cancun: transient storage (EIP-1153), `MCOPY`, blob data opcodes, restricted
    /// `SELFDESTRUCT` (EIP-6780).
    #[default]
    Cancun,
    /// Prague: set-code transactions (EIP-7702), calldata floor pricing (EIP-7623),
    /// BLS precompiles.
    Prague,
}

impl Fork {
    /// Returns [`true`] if this fork is the given fork or a later one.
    ///
    /// # Example
    /// ```
    /// # use fovea_forks::Fork;
    /// assert!(Fork::London.is_at_least(Fork::Berlin));
    /// assert!(Fork::London.is_at_least(Fork::London));
    /// assert!(!Fork::London.is_at_least(Fork::Shanghai));
    /// ```
    #[must_use]
    #[inline]
    pub fn is_at_least(self, other: Self) -> bool {
        self >= other
    }

    /// Returns [`true`] if this fork precedes the given fork.
    ///
    /// # Example
    /// ```
    /// # use fovea_forks::Fork;
    /// assert!(Fork::Homestead.is_before(Fork::Byzantium));
    /// assert!(!Fork::Byzantium.is_before(Fork::Byzantium));
    /// ```
    #[must_use]
    #[inline]
    pub fn is_before(self, other: Self) -> bool {
        self < other
    }

    /// Returns [`true`] if this fork includes the given EIP.
    ///
    /// # Example
    /// ```
    /// # use fovea_forks::{Eip, Fork};
    /// assert!(Fork::Berlin.includes(Eip::Eip2929));
    /// assert!(!Fork::Istanbul.includes(Eip::Eip2929));
    /// ```
    #[must_use]
    #[inline]
    pub fn includes(self, eip: Eip) -> bool {
        self >= eip.introduced_in()
    }

    /// Block at which this upgrade activated on Ethereum Mainnet.
    ///
    /// # Example
    /// ```
    /// # use fovea_forks::Fork;
    /// assert_eq!(Fork::Frontier.mainnet_activation_block(), 0);
    /// assert_eq!(Fork::Berlin.mainnet_activation_block(), 12_244_000);
    /// ```
    #[must_use]
    pub const fn mainnet_activation_block(self) -> u64 {
        match self {
            Self::Frontier => 0,
            Self::Homestead => 1_150_000,
            Self::TangerineWhistle => 2_463_000,
            Self::SpuriousDragon => 2_675_000,
            Self::Byzantium => 4_370_000,
            Self::Constantinople => 7_280_000,
            Self::Istanbul => 9_069_000,
            Self::Berlin => 12_244_000,
            Self::London => 12_965_000,
            Self::Paris => 15_537_394,
            Self::Shanghai => 17_034_870,
            Self::Cancun => 19_426_587,
            Self::Prague => 22_431_084,
        }
    }

    /// The fork in which a mnemonic first became executable.
    ///
    /// `PREVRANDAO` shares its byte with the original `DIFFICULTY` and has been
    /// executable since Frontier; only its semantics changed in Paris.
    ///
    /// # Example
    /// ```
    /// # use asm::Mnemonic;
    /// # use fovea_forks::Fork;
    /// assert_eq!(Fork::introduction_of(Mnemonic::PUSH0), Fork::Shanghai);
    /// assert_eq!(Fork::introduction_of(Mnemonic::ADD), Fork::Frontier);
    /// ```
    #[must_use]
    pub const fn introduction_of(mnemonic: Mnemonic) -> Self {
        match mnemonic {
            Mnemonic::DELEGATECALL => Self::Homestead,
            Mnemonic::REVERT
            | Mnemonic::RETURNDATASIZE
            | Mnemonic::RETURNDATACOPY
            | Mnemonic::STATICCALL => Self::Byzantium,
            Mnemonic::SHL
            | Mnemonic::SHR
            | Mnemonic::SAR
            | Mnemonic::EXTCODEHASH
            | Mnemonic::CREATE2 => Self::Constantinople,
            Mnemonic::CHAINID | Mnemonic::SELFBALANCE => Self::Istanbul,
            Mnemonic::BASEFEE => Self::London,
            Mnemonic::PUSH0 => Self::Shanghai,
            Mnemonic::TLOAD
            | Mnemonic::TSTORE
            | Mnemonic::MCOPY
            | Mnemonic::BLOBHASH
            | Mnemonic::BLOBBASEFEE => Self::Cancun,
            _ => Self::Frontier,
        }
    }

    /// Returns [`true`] if this fork supports execution of the given mnemonic.
    ///
    /// # Example
    /// ```
    /// # use asm::Mnemonic;
    /// # use fovea_forks::Fork;
    /// assert!(Fork::Shanghai.supports(Mnemonic::PUSH0));
    /// assert!(!Fork::Paris.supports(Mnemonic::PUSH0));
    /// assert!(Fork::Frontier.supports(Mnemonic::ADD));
    /// ```
    #[must_use]
    #[inline]
    pub fn supports(self, mnemonic: Mnemonic) -> bool {
        self >= Self::introduction_of(mnemonic)
    }

    /// Number of precompiled contracts occupying the low address range `0x01..=N`
    /// under this fork.
    ///
    /// # Example
    /// ```
    /// # use fovea_forks::Fork;
    /// assert_eq!(Fork::Frontier.precompile_count(), 4);
    /// assert_eq!(Fork::Prague.precompile_count(), 17);
    /// ```
    #[must_use]
    pub const fn precompile_count(self) -> u8 {
        match self {
            Self::Frontier
            | Self::Homestead
            | Self::TangerineWhistle
            | Self::SpuriousDragon => 4,
            Self::Byzantium | Self::Constantinople => 8,
            Self::Istanbul => 9,
            Self::Berlin | Self::London | Self::Paris | Self::Shanghai => 10,
            Self::Cancun => 11,
            Self::Prague => 17,
        }
    }

    /// Divisor capping the gas refund at the end of a transaction:
    /// `refund <= gas_used / divisor`.
    ///
    /// # Example
    /// ```
    /// # use fovea_forks::Fork;
    /// assert_eq!(Fork::Berlin.refund_divisor(), 2);
    /// assert_eq!(Fork::London.refund_divisor(), 5);
    /// ```
    #[must_use]
    #[inline]
    pub const fn refund_divisor(self) -> u64 {
        if self.is_at_least_const(Self::London) { 5 } else { 2 }
    }

    /// Const-context variant of [`Fork::is_at_least`].
    #[must_use]
    #[inline]
    const fn is_at_least_const(self, other: Self) -> bool {
        self as u8 >= other as u8
    }
}
