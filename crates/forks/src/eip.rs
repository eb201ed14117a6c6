//! Ethereum Improvement Proposals relevant to execution.

use crate::Fork;

/// Maximum deployed contract bytecode size, as defined in EIP-170.
pub const MAX_CODE_SIZE: usize = 0x6000;

/// Maximum initcode size, as defined in EIP-3860. Twice [`MAX_CODE_SIZE`].
pub const MAX_INITCODE_SIZE: usize = 2 * MAX_CODE_SIZE;

/// An execution-relevant Ethereum Improvement Proposal.
///
/// The catalogue is limited to the EIPs whose activation changes interpreter,
/// orchestrator or state behavior; purely consensus-layer proposals are omitted.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[non_exhaustive]
pub enum Eip {
    /// Homestead gas repricings and creation-failure semantics.
    Eip2,
    /// `DELEGATECALL`.
    Eip7,
    /// Gas cost changes for IO-heavy operations; 63/64 call gas forwarding.
    Eip150,
    /// Simple replay attack protection (chain id).
    Eip155,
    /// `EXP` cost increase.
    Eip160,
    /// State-trie clearing of empty accounts.
    Eip161,
    /// Contract code size limit.
    Eip170,
    /// `REVERT` instruction.
    Eip140,
    /// New opcodes: `RETURNDATASIZE` and `RETURNDATACOPY`.
    Eip211,
    /// `STATICCALL`.
    Eip214,
    /// Transaction status code in receipts.
    Eip658,
    /// Bitwise shifting instructions.
    Eip145,
    /// Skinny `CREATE2`.
    Eip1014,
    /// `EXTCODEHASH`.
    Eip1052,
    /// Net gas metering for `SSTORE` without dirty maps.
    Eip1283,
    /// `ChainID` opcode.
    Eip1344,
    /// Repricing for trie-size-dependent opcodes.
    Eip1884,
    /// Calldata gas cost reduction.
    Eip2028,
    /// Structured definitions for net gas metering.
    Eip2200,
    /// Typed transaction envelope.
    Eip2718,
    /// Gas cost increases for state access opcodes (warm/cold accounting).
    Eip2929,
    /// Optional access lists.
    Eip2930,
    /// Fee market change (base fee).
    Eip1559,
    /// `BASEFEE` opcode.
    Eip3198,
    /// Reduction in refunds.
    Eip3529,
    /// Reject new contract code starting with the `0xEF` byte.
    Eip3541,
    /// Supplant `DIFFICULTY` with `PREVRANDAO`.
    Eip4399,
    /// Warm coinbase.
    Eip3651,
    /// `PUSH0` instruction.
    Eip3855,
    /// Limit and meter initcode.
    Eip3860,
    /// Transient storage opcodes.
    Eip1153,
    /// Shard blob transactions.
    Eip4844,
    /// `MCOPY` memory copying instruction.
    Eip5656,
    /// `SELFDESTRUCT` only in same transaction.
    Eip6780,
    /// `BLOBBASEFEE` opcode.
    Eip7516,
    /// Precompile for BLS12-381 curve operations.
    Eip2537,
    /// Increase calldata cost (floor pricing).
    Eip7623,
    /// Set-code transactions (delegation designators).
    Eip7702,
}

impl Eip {
    /// The fork in which this EIP activated on mainnet.
    ///
    /// # Example
    /// ```
    /// # use fovea_forks::{Eip, Fork};
    /// assert_eq!(Eip::Eip150.introduced_in(), Fork::TangerineWhistle);
    /// assert_eq!(Eip::Eip7702.introduced_in(), Fork::Prague);
    /// ```
    #[must_use]
    pub const fn introduced_in(self) -> Fork {
        match self {
            Self::Eip2 | Self::Eip7 => Fork::Homestead,
            Self::Eip150 => Fork::TangerineWhistle,
            Self::Eip155 | Self::Eip160 | Self::Eip161 | Self::Eip170 => Fork::SpuriousDragon,
            Self::Eip140 | Self::Eip211 | Self::Eip214 | Self::Eip658 => Fork::Byzantium,
            Self::Eip145 | Self::Eip1014 | Self::Eip1052 | Self::Eip1283 => Fork::Constantinople,
            Self::Eip1344 | Self::Eip1884 | Self::Eip2028 | Self::Eip2200 => Fork::Istanbul,
            Self::Eip2718 | Self::Eip2929 | Self::Eip2930 => Fork::Berlin,
            Self::Eip1559 | Self::Eip3198 | Self::Eip3529 | Self::Eip3541 => Fork::London,
            Self::Eip4399 => Fork::Paris,
            Self::Eip3651 | Self::Eip3855 | Self::Eip3860 => Fork::Shanghai,
            Self::Eip1153 | Self::Eip4844 | Self::Eip5656 | Self::Eip6780 | Self::Eip7516 => {
                Fork::Cancun
            }
            Self::Eip2537 | Self::Eip7623 | Self::Eip7702 => Fork::Prague,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn introduction_forks() {
        assert_eq!(Eip::Eip7.introduced_in(), Fork::Homestead);
        assert_eq!(Eip::Eip2929.introduced_in(), Fork::Berlin);
        assert_eq!(Eip::Eip3529.introduced_in(), Fork::London);
        assert_eq!(Eip::Eip6780.introduced_in(), Fork::Cancun);
    }

    #[test]
    fn size_limits() {
        assert_eq!(MAX_CODE_SIZE, 24_576);
        assert_eq!(MAX_INITCODE_SIZE, 49_152);
    }
}
