//! Error taxonomy.
//!
//! Absence of a key is never an error (lookups return `Option`). These
//! variants describe construction misuse and allocation trouble; none of them
//! leaves a table in an inconsistent state.

use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("failed to allocate a slot array of {capacity} slots")]
    SlotAlloc {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("failed to allocate a {len}-byte key buffer")]
    KeyAlloc {
        len: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("cannot grow past {capacity} slots: capacity overflow")]
    CapacityOverflow { capacity: usize },

    #[error("no vacant slot among {capacity} slots")]
    TableFull { capacity: usize },

    #[error("invalid table configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
