//! Slot: the per-index state of the open-addressing array.

/// One position of the slot array.
///
/// `Empty` terminates a probe run. `Tombstone` marks a removed entry: lookups
/// probe through it, inserts may reuse it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Slot<V> {
    Empty,
    Occupied { key: Box<str>, value: V },
    Tombstone,
}

impl<V> Slot<V> {
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    /// True when the slot is occupied by exactly `key`.
    #[inline]
    pub(crate) fn holds(&self, key: &str) -> bool {
        match self {
            Slot::Occupied { key: k, .. } => &**k == key,
            _ => false,
        }
    }

    #[inline]
    pub(crate) fn entry(&self) -> Option<(&str, &V)> {
        match self {
            Slot::Occupied { key, value } => Some((&**key, value)),
            _ => None,
        }
    }

    /// Replace the slot with a tombstone, handing back the entry it held.
    /// Slots that are not occupied are left untouched.
    pub(crate) fn bury(&mut self) -> Option<(Box<str>, V)> {
        if !matches!(self, Slot::Occupied { .. }) {
            return None;
        }
        match core::mem::replace(self, Slot::Tombstone) {
            Slot::Occupied { key, value } => Some((key, value)),
            _ => None,
        }
    }

    /// Consume the slot, yielding its entry if occupied.
    #[inline]
    pub(crate) fn into_entry(self) -> Option<(Box<str>, V)> {
        match self {
            Slot::Occupied { key, value } => Some((key, value)),
            _ => None,
        }
    }
}
