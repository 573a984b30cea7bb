//! Fallible allocation of slot arrays and key buffers.
//!
//! Every heap allocation a table makes goes through here, so an allocator
//! refusal turns into an `Error` instead of an abort. Test builds can make
//! the next allocations fail on the current thread (see [`fault`]).

use crate::error::{Error, Result};
use crate::slot::Slot;

/// Allocate `capacity` empty slots.
pub(crate) fn try_slots<V>(capacity: usize) -> Result<Vec<Slot<V>>> {
    let mut slots = Vec::new();
    let reserved = match fault::injected() {
        Some(source) => Err(source),
        None => slots.try_reserve_exact(capacity),
    };
    reserved.map_err(|source| Error::SlotAlloc { capacity, source })?;
    slots.resize_with(capacity, || Slot::Empty);
    Ok(slots)
}

/// Deep-copy `key` into a buffer owned by the table.
pub(crate) fn try_copy_key(key: &str) -> Result<Box<str>> {
    let mut buf = String::new();
    let reserved = match fault::injected() {
        Some(source) => Err(source),
        None => buf.try_reserve_exact(key.len()),
    };
    reserved.map_err(|source| Error::KeyAlloc {
        len: key.len(),
        source,
    })?;
    buf.push_str(key);
    Ok(buf.into_boxed_str())
}

#[cfg(not(test))]
mod fault {
    use std::collections::TryReserveError;

    #[inline(always)]
    pub(crate) fn injected() -> Option<TryReserveError> {
        None
    }
}

/// Thread-local allocation fault injection for unit tests.
#[cfg(test)]
pub(crate) mod fault {
    use std::cell::Cell;
    use std::collections::TryReserveError;

    thread_local! {
        // Number of upcoming allocations that must fail.
        static FAILING: Cell<usize> = const { Cell::new(0) };
    }

    /// Make the next `n` allocations on this thread fail; later ones succeed.
    pub(crate) fn fail_next(n: usize) {
        FAILING.with(|f| f.set(n));
    }

    pub(crate) fn disarm() {
        FAILING.with(|f| f.set(0));
    }

    pub(crate) fn injected() -> Option<TryReserveError> {
        FAILING.with(|f| match f.get() {
            0 => None,
            n => {
                f.set(n - 1);
                Some(refusal())
            }
        })
    }

    // `TryReserveError` has no public constructor; ask for an impossible size.
    fn refusal() -> TryReserveError {
        match Vec::<u8>::new().try_reserve(usize::MAX) {
            Err(e) => e,
            Ok(()) => unreachable!("reserving usize::MAX bytes cannot succeed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_start_empty() {
        let s: Vec<Slot<u8>> = try_slots(5).unwrap();
        assert_eq!(s.len(), 5);
        assert!(s.iter().all(Slot::is_empty));
    }

    #[test]
    fn key_copy_is_deep() {
        let original = String::from("copy me");
        let copy = try_copy_key(&original).unwrap();
        drop(original);
        assert_eq!(&*copy, "copy me");
    }

    #[test]
    fn injected_faults_surface_as_errors() {
        fault::fail_next(2);
        assert!(matches!(
            try_copy_key("second"),
            Err(Error::KeyAlloc { len: 6, .. })
        ));
        assert!(matches!(
            try_slots::<u8>(4),
            Err(Error::SlotAlloc { capacity: 4, .. })
        ));
        assert!(try_copy_key("third").is_ok());

        fault::fail_next(3);
        fault::disarm();
        assert!(try_slots::<u8>(4).is_ok());
    }
}
