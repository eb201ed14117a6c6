//! Journaled EVM transaction state.
//!
//! The [`Journal`] layers warm/cold bookkeeping, transient storage, logs, the
//! refund counter and snapshot/revert discipline over a host-provided
//! [`Backend`]. Writes go through to the backend immediately; every mutation
//! records a pre-image so that reverting a snapshot replays the journal tail
//! in LIFO order.

#![deny(unsafe_code)]

mod account;
mod backend;
mod error;
mod journal;
mod log;

pub use account::Account;
pub use backend::{Backend, InMemoryState, StateSource};
pub use error::StateError;
pub use journal::{Journal, SnapshotId, StateChange};
pub use log::Log;
