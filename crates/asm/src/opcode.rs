//! EVM operation codes.

use crate::Mnemonic;
use derive_more::Display;

/// EVM operation code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Display)]
pub enum OpCode {
    /// An opcode with a known [`Mnemonic`].
    #[display("{_0}")]
    Known(Mnemonic),
    /// An opcode without a known [`Mnemonic`]. Contains the raw byte.
    #[display("UNKNOWN(0x{_0:02X})")]
    Unknown(u8),
}

impl OpCode {
    /// Returns [`true`] if the opcode is known.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::{Mnemonic, OpCode};
    /// assert_eq!(OpCode::Known(Mnemonic::GAS).is_known(), true);
    /// assert_eq!(OpCode::Unknown(0xF).is_known(), false);
    /// ```
    #[must_use]
    #[inline]
    pub const fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Returns [`true`] if the opcode is unknown.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::{Mnemonic, OpCode};
    /// assert_eq!(OpCode::Unknown(0xF).is_unknown(), true);
    /// assert_eq!(OpCode::Known(Mnemonic::GAS).is_unknown(), false);
    /// ```
    #[must_use]
    #[inline]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    /// Converts a byte into an [`OpCode`], returning [`OpCode::Unknown`] if no known
    /// mnemonic exists.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::{Mnemonic, OpCode};
    /// assert_eq!(OpCode::from_byte(0x5A), OpCode::Known(Mnemonic::GAS));
    /// assert_eq!(OpCode::from_byte(0xF), OpCode::Unknown(0xF));
    /// ```
    #[must_use]
    #[inline]
    pub const fn from_byte(byte: u8) -> Self {
        match Mnemonic::from_byte(byte) {
            Some(mnemonic) => Self::Known(mnemonic),
            None => Self::Unknown(byte),
        }
    }

    /// Converts this opcode into a byte.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::{Mnemonic, OpCode};
    /// assert_eq!(OpCode::Known(Mnemonic::GAS).into_byte(), 0x5A);
    /// assert_eq!(OpCode::Unknown(0xF).into_byte(), 0xF);
    /// ```
    #[must_use]
    #[inline]
    pub const fn into_byte(self) -> u8 {
        match self {
            OpCode::Known(mnemonic) => mnemonic as u8,
            OpCode::Unknown(byte) => byte,
        }
    }

    /// Returns the mnemonic of this opcode, or [`None`] if the opcode is unknown.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::{Mnemonic, OpCode};
    /// assert_eq!(OpCode::Known(Mnemonic::GAS).mnemonic(), Some(Mnemonic::GAS));
    /// assert_eq!(OpCode::Unknown(0xF).mnemonic(), None);
    /// ```
    #[must_use]
    #[inline]
    pub const fn mnemonic(&self) -> Option<Mnemonic> {
        match self {
            OpCode::Known(mnemonic) => Some(*mnemonic),
            OpCode::Unknown(_) => None,
        }
    }

    /// Returns the number of immediate bytes that follow this opcode in the bytecode
    /// stream. Unknown opcodes carry no immediates.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::{Mnemonic, OpCode};
    /// assert_eq!(OpCode::Known(Mnemonic::PUSH4).immediate_size(), 4);
    /// assert_eq!(OpCode::Unknown(0xF).immediate_size(), 0);
    /// ```
    #[must_use]
    #[inline]
    pub const fn immediate_size(&self) -> u8 {
        match self {
            OpCode::Known(mnemonic) => mnemonic.immediate_size(),
            OpCode::Unknown(_) => 0,
        }
    }

    /// Returns [`true`] for opcodes that terminate execution of the smart contract.
    /// Unknown opcodes terminate by definition: executing one is an invalid-opcode halt.
    ///
    /// # Example
    /// ```
    /// # use fovea_asm::{Mnemonic, OpCode};
    /// assert_eq!(OpCode::Known(Mnemonic::RETURN).is_terminator(), true);
    /// assert_eq!(OpCode::Unknown(0xF).is_terminator(), true);
    /// assert_eq!(OpCode::Known(Mnemonic::GAS).is_terminator(), false);
    /// ```
    #[must_use]
    #[inline]
    pub const fn is_terminator(&self) -> bool {
        match self {
            OpCode::Known(mnemonic) => mnemonic.is_terminator(),
            OpCode::Unknown(_) => true,
        }
    }
}

impl From<OpCode> for u8 {
    #[inline]
    fn from(opcode: OpCode) -> Self {
        opcode.into_byte()
    }
}

impl From<u8> for OpCode {
    #[inline]
    fn from(byte: u8) -> Self {
        Self::from_byte(byte)
    }
}

impl From<Mnemonic> for OpCode {
    #[inline]
    fn from(mnemonic: Mnemonic) -> Self {
        Self::Known(mnemonic)
    }
}

impl PartialEq<Mnemonic> for OpCode {
    #[inline]
    fn eq(&self, other: &Mnemonic) -> bool {
        self.into_byte() == *other as u8
    }
}

impl PartialEq<u8> for OpCode {
    #[inline]
    fn eq(&self, other: &u8) -> bool {
        self.into_byte().eq(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(OpCode::from_byte(0x01), OpCode::Known(Mnemonic::ADD));
        assert_eq!(u8::from(OpCode::Known(Mnemonic::ADD)), 0x01);
        assert_eq!(OpCode::from(Mnemonic::STOP), OpCode::Known(Mnemonic::STOP));
        assert_eq!(OpCode::from(0xFCu8), OpCode::Unknown(0xFC));
    }

    #[test]
    fn mixed_comparisons() {
        assert_eq!(OpCode::Known(Mnemonic::GAS), Mnemonic::GAS);
        assert_eq!(OpCode::Known(Mnemonic::GAS), 0x5Au8);
        assert_eq!(OpCode::Unknown(0xF), 0xFu8);
    }

    #[test]
    fn display() {
        assert_eq!(OpCode::Known(Mnemonic::KECCAK256).to_string(), "KECCAK256");
        assert_eq!(OpCode::Unknown(0x0C).to_string(), "UNKNOWN(0x0C)");
    }
}
