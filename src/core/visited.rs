use log::trace;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VisitState {
    Claimed,
    Fetched,
    Failed,
}

/// Addresses seen during one crawl. An address enters the set only through
/// [`VisitedSet::claim`] and never leaves it.
#[derive(Debug, Default)]
pub struct VisitedSet {
    addresses: RwLock<HashMap<String, VisitState>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomic test-and-set. Returns `true` for exactly one caller per address.
    pub fn claim(&self, address: &str) -> bool {
        match self.addresses.write().entry(address.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                trace!("Claimed {}", address);
                slot.insert(VisitState::Claimed);
                true
            }
        }
    }

    /// Moves a claimed address to its final state. Unclaimed or already
    /// completed addresses are left untouched and `false` is returned.
    pub fn complete(&self, address: &str, state: VisitState) -> bool {
        if state == VisitState::Claimed {
            return false;
        }

        match self.addresses.write().get_mut(address) {
            Some(current) if *current == VisitState::Claimed => {
                *current = state;
                true
            }
            _ => false,
        }
    }

    pub fn state(&self, address: &str) -> Option<VisitState> {
        self.addresses.read().get(address).copied()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.addresses.read().contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.addresses.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.read().is_empty()
    }

    pub fn addresses(&self) -> Vec<String> {
        let mut addresses: Vec<String> = self.addresses.read().keys().cloned().collect();
        addresses.sort();
        addresses
    }
}
