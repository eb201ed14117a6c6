//! EVM instructions, opcodes and mnemonics.

#![deny(unsafe_code)]

mod mnemonic;
mod opcode;

pub use mnemonic::Mnemonic;
pub use opcode::OpCode;
