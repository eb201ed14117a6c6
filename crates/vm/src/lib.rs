//! EVM bytecode interpreter and transaction orchestrator.
//!
//! The crate is organized around three cooperating pieces:
//!
//! * [`Frame`] — one call context: stack, memory, program counter, gas and
//!   bytecode, driven one instruction at a time by the interpreter loop.
//! * [`Evm`] — the orchestrator: transaction entry, nested call/create
//!   dispatch, snapshot discipline, refund finalization and self-destruct
//!   resolution.
//! * [`state::Journal`] — the journaled state substrate the other two
//!   mutate.
//!
//! Hardfork-sensitive rules are gated on a single [`forks::Fork`] value, from
//! Frontier through Prague.

#![deny(unsafe_code)]

mod analysis;
mod env;
mod error;
mod evm;
mod frame;
pub mod gas;
mod instructions;
mod interpreter;
mod memory;
mod precompile;
mod result;
mod stack;
pub mod trace;

pub use analysis::JumpTable;
pub use env::{AccessListItem, Authorization, BlockEnv, TxEnv, TxKind};
pub use error::{Halt, InvalidTransaction};
pub use evm::Evm;
pub use frame::{Frame, Gas};
pub use memory::Memory;
pub use precompile::{PrecompileFn, PrecompileOutcome, Precompiles};
pub use result::{CallResult, CreateResult, ExecutionResult, Outcome};
pub use stack::{STACK_LIMIT, Stack};
