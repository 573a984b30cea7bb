//! strtab: an open-addressing hash table from string keys to values.
//!
//! Internal Design:
//!
//! Summary
//! - One structure, `StringTable<V, S>`: a flat array of slots, each
//!   `Empty`, `Occupied { key, value }` or `Tombstone`.
//! - Keys are deep-copied into table-owned buffers on insert. Values are
//!   opaque `V`; whether the table owns or borrows them is decided by the
//!   caller's choice of `V` (`Box<T>` owns, `&T`/`Rc<T>` share).
//! - Collisions use linear probing with step 1, wrapping at the end.
//!
//! Probing
//! - The home index of a key is `hash(key) % capacity`. The default hasher
//!   is the `h * 33 + byte` string hash seeded at 5381, fed the key's raw
//!   bytes, so indices are reproducible.
//! - Lookups (`get`, `contains_key`, `remove`) walk from the home index
//!   until they meet the key or an `Empty` slot. Tombstones are walked
//!   through.
//! - `insert` walks the same run. If the key is found its value is
//!   replaced; otherwise the entry goes into the first tombstone seen, or
//!   the `Empty` slot that ended the run. Walking past tombstones before
//!   settling keeps at most one copy of a key on its run.
//! - Every walk is bounded by one lap of the array, so a table with no
//!   `Empty` slot left (possible after failed growth) still terminates.
//!
//! Growth
//! - Before a new key is stored, the table grows while `(len + 1) /
//!   capacity` would reach the load threshold (0.7 by default). Growth
//!   doubles the array, moves live entries over and drops tombstones.
//! - Replacing the value of an existing key never grows.
//! - There is no shrinking.
//!
//! Failure policy
//! - Allocation failure is never fatal. Creation returns `Err`. A failed
//!   growth is logged and skipped; the table keeps working at its current
//!   capacity, possibly above the threshold. A failed key copy, or a
//!   saturated table, rejects the insert and hands the value back through
//!   `Insert::Rejected`.
//! - Absence is `None`/`false`, never an error.
//!
//! Notes and non-goals
//! - Single-threaded; mutation takes `&mut self`. Share across threads by
//!   wrapping the whole table in a lock.
//! - Iteration order is slot order: neither insertion nor key order.
//! - Keys are text only.

mod alloc;
pub mod config;
pub mod error;
pub mod hasher;
mod slot;
pub mod string_table;
mod string_table_proptest;

// Public surface
pub use config::{TableConfig, MAX_LOAD_FACTOR, MIN_CAPACITY};
pub use error::{Error, Result};
pub use hasher::{Djb2BuildHasher, Djb2Hasher};
pub use string_table::{Insert, IntoIter, Iter, StringTable};
