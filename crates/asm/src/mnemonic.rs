//! EVM operation code mnemonics.

use strum::{Display, EnumCount, EnumIter, EnumString, FromRepr, VariantNames};

/// EVM operation code mnemonic.
#[repr(u8)]
#[non_exhaustive]
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Debug,
    Hash,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    FromRepr,
    VariantNames,
)]
pub enum Mnemonic {
    /// Halts execution.
    STOP = 0x00,
    /// Addition operation.
    ADD = 0x01,
    /// Multiplication operation.
    MUL = 0x02,
    /// Subtraction operation.
    SUB = 0x03,
    /// Integer division operation.
    DIV = 0x04,
    /// Signed integer division operation (truncated).
    SDIV = 0x05,
    /// Modulo remainder operation.
    MOD = 0x06,
    /// Signed modulo remainder operation.
    SMOD = 0x07,
    /// Modulo addition operation.
    ADDMOD = 0x08,
    /// Modulo multiplication operation.
    MULMOD = 0x09,
    /// Exponential operation.
    EXP = 0x0A,
    /// Extend length of two's complement signed integer.
    SIGNEXTEND = 0x0B,
    /// Less-than comparison.
    LT = 0x10,
    /// Greater-than comparison.
    GT = 0x11,
    /// Signed less-than comparison.
    SLT = 0x12,
    /// Signed greater-than comparison.
    SGT = 0x13,
    /// Equality comparison.
    EQ = 0x14,
    /// Is-zero comparison.
    ISZERO = 0x15,
    /// Bitwise AND operation.
    AND = 0x16,
    /// Bitwise OR operation.
    OR = 0x17,
    /// Bitwise XOR operation.
    XOR = 0x18,
    /// Bitwise NOT operation.
    NOT = 0x19,
    /// Retrieve single byte from word.
    BYTE = 0x1A,
    /// Left shift operation.
    SHL = 0x1B,
    /// Logical right shift operation.
    SHR = 0x1C,
    /// Arithmetic (signed) right shift operation.
    SAR = 0x1D,
    /// Compute Keccak-256 hash.
    KECCAK256 = 0x20,
    /// Get address of currently executing account.
    ADDRESS = 0x30,
    /// Get balance of the given account.
    BALANCE = 0x31,
    /// Get execution origination address.
    ORIGIN = 0x32,
    /// Get caller address.
    CALLER = 0x33,
    /// Get deposited value by the instruction transaction responsible for this execution.
    CALLVALUE = 0x34,
    /// Get input data of current environment.
    CALLDATALOAD = 0x35,
    /// Get size of input data in current environment.
    CALLDATASIZE = 0x36,
    /// Copy input data in current environment to memory.
    CALLDATACOPY = 0x37,
    /// Get size of code running in current environment.
    CODESIZE = 0x38,
    /// Copy code running in current environment to memory.
    CODECOPY = 0x39,
    /// Get price of gas in current environment.
    GASPRICE = 0x3A,
    /// Get size of an account's code.
    EXTCODESIZE = 0x3B,
    /// Copy an account's code to memory.
    EXTCODECOPY = 0x3C,
    /// Get size of output data from the previous call from the current environment.
    RETURNDATASIZE = 0x3D,
    /// Copy output data from the previous call to memory.
    RETURNDATACOPY = 0x3E,
    /// Get hash of an account's code.
    EXTCODEHASH = 0x3F,
    /// Get the hash of one of the 256 most recent complete blocks.
    BLOCKHASH = 0x40,
    /// Get the block's beneficiary address.
    COINBASE = 0x41,
    /// Get the block's timestamp.
    TIMESTAMP = 0x42,
    /// Get the block's number.
    NUMBER = 0x43,
    /// Get the block's difficulty (the prev-randao beacon value since the merge).
    PREVRANDAO = 0x44,
    /// Get the block's gas limit.
    GASLIMIT = 0x45,
    /// Get the chain ID.
    CHAINID = 0x46,
    /// Get balance of currently executing account.
    SELFBALANCE = 0x47,
    /// Get the base fee.
    BASEFEE = 0x48,
    /// Get versioned hashes.
    BLOBHASH = 0x49,
    /// Returns the value of the blob base-fee of the current block.
    BLOBBASEFEE = 0x4A,
    /// Remove item from stack.
    POP = 0x50,
    /// Load word from memory.
    MLOAD = 0x51,
    /// Save word to memory.
    MSTORE = 0x52,
    /// Save byte to memory.
    MSTORE8 = 0x53,
    /// Load word from storage.
    SLOAD = 0x54,
    /// Save word to storage.
    SSTORE = 0x55,
    /// Alter the program counter.
    JUMP = 0x56,
    /// Conditionally alter the program counter.
    JUMPI = 0x57,
    /// Get the value of the program counter prior to the increment corresponding to this instruction.
    PC = 0x58,
    /// Get the size of active memory in bytes.
    MSIZE = 0x59,
    /// Get the amount of available gas including the corresponding reduction for the cost of this instruction.
    GAS = 0x5A,
    /// Mark a valid destination for jumps.
    JUMPDEST = 0x5B,
    /// Load word from transient storage.
    TLOAD = 0x5C,
    /// Save word to transient storage.
    TSTORE = 0x5D,
    /// Copy memory areas.
    MCOPY = 0x5E,
    /// Place value 0 on stack.
    PUSH0 = 0x5F,
    /// Place 1 byte item on stack.
    PUSH1 = 0x60,
    /// Place 2 byte item on stack.
    PUSH2 = 0x61,
    /// Place 3 byte item on stack.
    PUSH3 = 0x62,
    /// Place 4 byte item on stack.
    PUSH4 = 0x63,
    /// Place 5 byte item on stack.
    PUSH5 = 0x64,
    /// Place 6 byte item on stack.
    PUSH6 = 0x65,
    /// Place 7 byte item on stack.
    PUSH7 = 0x66,
    /// Place 8 byte item on stack.
    PUSH8 = 0x67,
    /// Place 9 byte item on stack.
    PUSH9 = 0x68,
    /// Place 10 byte item on stack.
    PUSH10 = 0x69,
    /// Place 11 byte item on stack.
    PUSH11 = 0x6A,
    /// Place 12 byte item on stack.
    PUSH12 = 0x6B,
    /// Place 13 byte item on stack.
    PUSH13 = 0x6C,
    /// Place 14 byte item on stack.
    PUSH14 = 0x6D,
    /// Place 15 byte item on stack.
    PUSH15 = 0x6E,
    /// Place 16 byte item on stack.
    PUSH16 = 0x6F,
    /// Place 17 byte item on stack.
    PUSH17 = 0x70,
    /// Place 18 byte item on stack.
    PUSH18 = 0x71,
    /// Place 19 byte item on stack.
    PUSH19 = 0x72,
    /// Place 20 byte item on stack.
    PUSH20 = 0x73,
    /// Place 21 byte item on stack.
    PUSH21 = 0x74,
    /// Place 22 byte item on stack.
    PUSH22 = 0x75,
    /// Place 23 byte item on stack.
    PUSH23 = 0x76,
    /// Place 24 byte item on stack.
    PUSH24 = 0x77,
    /// Place 25 byte item on stack.
    PUSH25 = 0x78,
    /// Place 26 byte item on stack.
    PUSH26 = 0x79,
    /// Place 27 byte item on stack.
    PUSH27 = 0x7A,
    /// Place 28 byte item on stack.
    PUSH28 = 0x7B,
    /// Place 29 byte item on stack.
    PUSH29 = 0x7C,
    /// Place 30 byte item on stack.
    PUSH30 = 0x7D,
    /// Place 31 byte item on stack.
    PUSH31 = 0x7E,
    /// Place 32 byte (full word) item on stack.
    PUSH32 = 0x7F,
    /// Duplicate 1st stack item.
    DUP1 = 0x80,
    /// Duplicate 2nd stack item.
    DUP2 = 0x81,
    /// Duplicate 3rd stack item.
    DUP3 = 0x82,
    /// Duplicate 4th stack item.
    DUP4 = 0x83,
    /// Duplicate 5th stack item.
    DUP5 = 0x84,
    /// Duplicate 6th stack item.
    DUP6 = 0x85,
    /// Duplicate 7th stack item.
    DUP7 = 0x86,
    /// Duplicate 8th stack item.
    DUP8 = 0x87,
    /// Duplicate 9th stack item.
    DUP9 = 0x88,
    /// Duplicate 10th stack item.
    DUP10 = 0x89,
    /// Duplicate 11th stack item.
    DUP11 = 0x8A,
    /// Duplicate 12th stack item.
    DUP12 = 0x8B,
    /// Duplicate 13th stack item.
    DUP13 = 0x8C,
    /// Duplicate 14th stack item.
    DUP14 = 0x8D,
    /// Duplicate 15th stack item.
    DUP15 = 0x8E,
    /// Duplicate 16th stack item.
    DUP16 = 0x8F,
    /// Exchange 1st and 2nd stack items.
    SWAP1 = 0x90,
    /// Exchange 1st and 3rd stack items.
    SWAP2 = 0x91,
    /// Exchange 1st and 4th stack items.
    SWAP3 = 0x92,
    /// Exchange 1st and 5th stack items.
    SWAP4 = 0x93,
    /// Exchange 1st and 6th stack items.
    SWAP5 = 0x94,
    /// Exchange 1st and 7th stack items.
    SWAP6 = 0x95,
    /// Exchange 1st and 8th stack items.
    SWAP7 = 0x96,
    /// Exchange 1st and 9th stack items.
    SWAP8 = 0x97,
    /// Exchange 1st and 10th stack items.
    SWAP9 = 0x98,
    /// Exchange 1st and 11th stack items.
    SWAP10 = 0x99,
    /// Exchange 1st and 12th stack items.
    SWAP11 = 0x9A,
    /// Exchange 1st and 13th stack items.
    SWAP12 = 0x9B,
    /// Exchange 1st and 14th stack items.
    SWAP13 = 0x9C,
    /// Exchange 1st and 15th stack items.
    SWAP14 = 0x9D,
    /// Exchange 1st and 16th stack items.
    SWAP15 = 0x9E,
    /// Exchange 1st and 17th stack items.
    SWAP16 = 0x9F,
    /// Append log record with no topics.
    LOG0 = 0xA0,
    /// Append log record with one topic.
    LOG1 = 0xA1,
    /// Append log record with two topics.
    LOG2 = 0xA2,
    /// Append log record with three topics.
    LOG3 = 0xA3,
    /// Append log record with four topics.
    LOG4 = 0xA4,
    /// Create a new account with associated code.
    CREATE = 0xF0,
    /// Message-call into an account.
    CALL = 0xF1,
    /// Message-call into this account with alternative account's code.
    CALLCODE = 0xF2,
    /// Halt execution returning output data.
    RETURN = 0xF3,
    /// Message-call into this account with an alternative account's code but persisting the current values for sender and value.
    DELEGATECALL = 0xF4,
    /// Create a new account with associated code at a predictable address.
    CREATE2 = 0xF5,
    /// Static message-call into an account.
    STATICCALL = 0xFA,
    /// Halt execution reverting state changes but returning data and remaining gas.
    REVERT = 0xFD,
    /// Designated invalid instruction.
    INVALID = 0xFE,
    /// Halt execution and register account for later deletion or send all Ether to address (post-Cancun).
    SELFDESTRUCT = 0xFF,
}

impl Mnemonic {
    /// Attempts to parse a byte as a mnemonic. Returns [`None`] if the byte is not a known
    /// mnemonic.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::Mnemonic;
    /// assert_eq!(Mnemonic::from_byte(0x5A), Some(Mnemonic::GAS));
    /// assert_eq!(Mnemonic::from_byte(0xF), None);
    /// ```
    #[must_use]
    #[inline]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        Self::from_repr(byte)
    }

    /// Converts this mnemonic into its byte representation.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::Mnemonic;
    /// assert_eq!(Mnemonic::GAS.into_byte(), 0x5A);
    /// ```
    #[must_use]
    #[inline]
    pub const fn into_byte(self) -> u8 {
        self as u8
    }

    /// Returns [`true`] if this mnemonic is of the type `PUSHx`.
    ///
    /// `PUSH0` counts: it pushes a constant zero and has no immediate bytes.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::Mnemonic;
    /// assert_eq!(Mnemonic::PUSH7.is_push(), true);
    /// assert_eq!(Mnemonic::PUSH0.is_push(), true);
    /// assert_eq!(Mnemonic::GAS.is_push(), false);
    /// ```
    #[must_use]
    #[inline]
    pub const fn is_push(&self) -> bool {
        Self::PUSH0.into_byte() <= (*self as u8) && (*self as u8) <= Self::PUSH32.into_byte()
    }

    /// Returns the size in bytes of the value a `PUSHx` mnemonic places on the stack,
    /// or [`None`] for every other mnemonic.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::Mnemonic;
    /// assert_eq!(Mnemonic::PUSH0.push_size(), Some(0));
    /// assert_eq!(Mnemonic::PUSH32.push_size(), Some(32));
    /// assert_eq!(Mnemonic::GAS.push_size(), None);
    /// ```
    #[must_use]
    #[inline]
    pub const fn push_size(&self) -> Option<u8> {
        if self.is_push() {
            Some(*self as u8 - Self::PUSH0.into_byte())
        } else {
            None
        }
    }

    /// Returns [`true`] if this mnemonic is of the type `DUPx`.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::Mnemonic;
    /// assert_eq!(Mnemonic::DUP2.is_dup(), true);
    /// assert_eq!(Mnemonic::GAS.is_dup(), false);
    /// ```
    #[must_use]
    #[inline]
    pub const fn is_dup(&self) -> bool {
        Self::DUP1.into_byte() <= (*self as u8) && (*self as u8) <= Self::DUP16.into_byte()
    }

    /// Returns the 1-based stack depth a `DUPx` mnemonic duplicates from, or [`None`]
    /// for every other mnemonic.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::Mnemonic;
    /// assert_eq!(Mnemonic::DUP1.dup_depth(), Some(1));
    /// assert_eq!(Mnemonic::DUP16.dup_depth(), Some(16));
    /// assert_eq!(Mnemonic::GAS.dup_depth(), None);
    /// ```
    #[must_use]
    #[inline]
    pub const fn dup_depth(&self) -> Option<u8> {
        if self.is_dup() {
            Some(*self as u8 - Self::DUP1.into_byte() + 1)
        } else {
            None
        }
    }

    /// Returns [`true`] if this mnemonic is of the type `SWAPx`.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::Mnemonic;
    /// assert_eq!(Mnemonic::SWAP2.is_swap(), true);
    /// assert_eq!(Mnemonic::GAS.is_swap(), false);
    /// ```
    #[must_use]
    #[inline]
    pub const fn is_swap(&self) -> bool {
        Self::SWAP1.into_byte() <= (*self as u8) && (*self as u8) <= Self::SWAP16.into_byte()
    }

    /// Returns the 1-based depth of the stack item a `SWAPx` mnemonic exchanges the top
    /// with, or [`None`] for every other mnemonic.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::Mnemonic;
    /// assert_eq!(Mnemonic::SWAP1.swap_depth(), Some(1));
    /// assert_eq!(Mnemonic::SWAP16.swap_depth(), Some(16));
    /// assert_eq!(Mnemonic::GAS.swap_depth(), None);
    /// ```
    #[must_use]
    #[inline]
    pub const fn swap_depth(&self) -> Option<u8> {
        if self.is_swap() {
            Some(*self as u8 - Self::SWAP1.into_byte() + 1)
        } else {
            None
        }
    }

    /// Returns [`true`] if this mnemonic is of the type `LOGx`.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::Mnemonic;
    /// assert_eq!(Mnemonic::LOG2.is_log(), true);
    /// assert_eq!(Mnemonic::GAS.is_log(), false);
    /// ```
    #[must_use]
    #[inline]
    pub const fn is_log(&self) -> bool {
        Self::LOG0.into_byte() <= (*self as u8) && (*self as u8) <= Self::LOG4.into_byte()
    }

    /// Returns the number of topics a `LOGx` mnemonic records, or [`None`] for every
    /// other mnemonic.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::Mnemonic;
    /// assert_eq!(Mnemonic::LOG0.log_topic_count(), Some(0));
    /// assert_eq!(Mnemonic::LOG4.log_topic_count(), Some(4));
    /// assert_eq!(Mnemonic::GAS.log_topic_count(), None);
    /// ```
    #[must_use]
    #[inline]
    pub const fn log_topic_count(&self) -> Option<u8> {
        if self.is_log() {
            Some(*self as u8 - Self::LOG0.into_byte())
        } else {
            None
        }
    }

    /// Returns [`true`] for mnemonics that terminate execution of the smart contract.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::Mnemonic;
    /// assert_eq!(Mnemonic::RETURN.is_terminator(), true);
    /// assert_eq!(Mnemonic::SELFDESTRUCT.is_terminator(), true);
    /// assert_eq!(Mnemonic::GAS.is_terminator(), false);
    /// ```
    #[must_use]
    #[inline]
    pub const fn is_terminator(&self) -> bool {
        matches!(
            self,
            Self::STOP | Self::RETURN | Self::REVERT | Self::INVALID | Self::SELFDESTRUCT
        )
    }

    /// Returns the number of immediate bytes that follow this instruction in the
    /// bytecode stream. Non-zero only for `PUSH1`..=`PUSH32`.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::Mnemonic;
    /// assert_eq!(Mnemonic::PUSH2.immediate_size(), 2);
    /// assert_eq!(Mnemonic::PUSH0.immediate_size(), 0);
    /// assert_eq!(Mnemonic::GAS.immediate_size(), 0);
    /// ```
    #[must_use]
    #[inline]
    pub const fn immediate_size(&self) -> u8 {
        match self.push_size() {
            Some(size) => size,
            None => 0,
        }
    }

    /// Returns the number of stack items this instruction pops.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::Mnemonic;
    /// assert_eq!(Mnemonic::ADD.stack_inputs(), 2);
    /// assert_eq!(Mnemonic::CALL.stack_inputs(), 7);
    /// assert_eq!(Mnemonic::SWAP3.stack_inputs(), 4);
    /// ```
    #[must_use]
    pub const fn stack_inputs(&self) -> u8 {
        if self.is_push() {
            return 0;
        }
        if let Some(depth) = self.dup_depth() {
            return depth;
        }
        if let Some(depth) = self.swap_depth() {
            return depth + 1;
        }
        if let Some(topics) = self.log_topic_count() {
            return topics + 2;
        }

        match self {
            Self::STOP
            | Self::ADDRESS
            | Self::ORIGIN
            | Self::CALLER
            | Self::CALLVALUE
            | Self::CALLDATASIZE
            | Self::CODESIZE
            | Self::GASPRICE
            | Self::RETURNDATASIZE
            | Self::COINBASE
            | Self::TIMESTAMP
            | Self::NUMBER
            | Self::PREVRANDAO
            | Self::GASLIMIT
            | Self::CHAINID
            | Self::SELFBALANCE
            | Self::BASEFEE
            | Self::BLOBBASEFEE
            | Self::PC
            | Self::MSIZE
            | Self::GAS
            | Self::JUMPDEST
            | Self::INVALID => 0,

            Self::ISZERO
            | Self::NOT
            | Self::BALANCE
            | Self::CALLDATALOAD
            | Self::EXTCODESIZE
            | Self::EXTCODEHASH
            | Self::BLOCKHASH
            | Self::BLOBHASH
            | Self::POP
            | Self::MLOAD
            | Self::SLOAD
            | Self::TLOAD
            | Self::JUMP
            | Self::SELFDESTRUCT => 1,

            Self::ADD
            | Self::MUL
            | Self::SUB
            | Self::DIV
            | Self::SDIV
            | Self::MOD
            | Self::SMOD
            | Self::EXP
            | Self::SIGNEXTEND
            | Self::LT
            | Self::GT
            | Self::SLT
            | Self::SGT
            | Self::EQ
            | Self::AND
            | Self::OR
            | Self::XOR
            | Self::BYTE
            | Self::SHL
            | Self::SHR
            | Self::SAR
            | Self::KECCAK256
            | Self::MSTORE
            | Self::MSTORE8
            | Self::SSTORE
            | Self::TSTORE
            | Self::JUMPI
            | Self::RETURN
            | Self::REVERT => 2,

            Self::ADDMOD
            | Self::MULMOD
            | Self::CALLDATACOPY
            | Self::CODECOPY
            | Self::RETURNDATACOPY
            | Self::MCOPY
            | Self::CREATE => 3,

            Self::EXTCODECOPY | Self::CREATE2 => 4,

            Self::DELEGATECALL | Self::STATICCALL => 6,

            Self::CALL | Self::CALLCODE => 7,

            // All remaining variants are PUSH/DUP/SWAP/LOG, handled above.
            _ => 0,
        }
    }

    /// Returns the number of stack items this instruction pushes.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::Mnemonic;
    /// assert_eq!(Mnemonic::ADD.stack_outputs(), 1);
    /// assert_eq!(Mnemonic::SSTORE.stack_outputs(), 0);
    /// assert_eq!(Mnemonic::SWAP3.stack_outputs(), 4);
    /// ```
    #[must_use]
    pub const fn stack_outputs(&self) -> u8 {
        if self.is_push() {
            return 1;
        }
        if let Some(depth) = self.dup_depth() {
            return depth + 1;
        }
        if let Some(depth) = self.swap_depth() {
            return depth + 1;
        }
        if self.is_log() {
            return 0;
        }

        match self {
            Self::STOP
            | Self::CALLDATACOPY
            | Self::CODECOPY
            | Self::EXTCODECOPY
            | Self::RETURNDATACOPY
            | Self::POP
            | Self::MSTORE
            | Self::MSTORE8
            | Self::SSTORE
            | Self::TSTORE
            | Self::MCOPY
            | Self::JUMP
            | Self::JUMPI
            | Self::JUMPDEST
            | Self::RETURN
            | Self::REVERT
            | Self::INVALID
            | Self::SELFDESTRUCT => 0,

            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn byte_round_trip() {
        for mnemonic in Mnemonic::iter() {
            assert_eq!(Mnemonic::from_byte(mnemonic.into_byte()), Some(mnemonic));
        }
    }

    #[test]
    fn gaps_are_unknown() {
        assert_eq!(Mnemonic::from_byte(0x0C), None);
        assert_eq!(Mnemonic::from_byte(0x1E), None);
        assert_eq!(Mnemonic::from_byte(0x21), None);
        assert_eq!(Mnemonic::from_byte(0x4B), None);
        assert_eq!(Mnemonic::from_byte(0xA5), None);
        assert_eq!(Mnemonic::from_byte(0xF6), None);
        assert_eq!(Mnemonic::from_byte(0xFB), None);
    }

    #[test]
    fn variant_count_matches_defined_opcodes() {
        // 26 arithmetic/comparison/bitwise + 1 keccak + 16 environment
        // + 11 block + 15 stack/memory/storage/flow + 33 push + 16 dup
        // + 16 swap + 5 log + 10 system.
        assert_eq!(Mnemonic::COUNT, 149);
    }

    #[test]
    fn family_metadata() {
        assert_eq!(Mnemonic::PUSH17.push_size(), Some(17));
        assert_eq!(Mnemonic::PUSH17.immediate_size(), 17);
        assert_eq!(Mnemonic::DUP9.dup_depth(), Some(9));
        assert_eq!(Mnemonic::SWAP11.swap_depth(), Some(11));
        assert_eq!(Mnemonic::LOG3.log_topic_count(), Some(3));
        assert!(!Mnemonic::PUSH0.is_dup());
        assert!(!Mnemonic::LOG0.is_swap());
    }

    #[test]
    fn stack_arity_is_consistent() {
        assert_eq!(Mnemonic::CALL.stack_inputs(), 7);
        assert_eq!(Mnemonic::CALL.stack_outputs(), 1);
        assert_eq!(Mnemonic::DELEGATECALL.stack_inputs(), 6);
        assert_eq!(Mnemonic::LOG4.stack_inputs(), 6);
        assert_eq!(Mnemonic::LOG4.stack_outputs(), 0);
        assert_eq!(Mnemonic::DUP16.stack_inputs(), 16);
        assert_eq!(Mnemonic::DUP16.stack_outputs(), 17);
        assert_eq!(Mnemonic::SWAP16.stack_inputs(), 17);
        assert_eq!(Mnemonic::SWAP16.stack_outputs(), 17);

        for mnemonic in Mnemonic::iter() {
            // No opcode touches more than 17 slots.
            assert!(mnemonic.stack_inputs() <= 17, "{mnemonic}");
            assert!(mnemonic.stack_outputs() <= 17, "{mnemonic}");
        }
    }

    #[test]
    fn display_matches_variant_name() {
        assert_eq!(Mnemonic::KECCAK256.to_string(), "KECCAK256");
        assert_eq!(Mnemonic::PUSH0.to_string(), "PUSH0");
    }
}
