//! Composite-key registry used to skip duplicate rows

use std::collections::{HashMap, HashSet};

use super::types::RecordId;

/// Outcome of claiming a software key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoftwareClaim {
    /// First time this key was seen; the record must be created
    New(RecordId),
    /// Key already registered; reuse the id
    Existing(RecordId),
}

impl SoftwareClaim {
    pub fn id(&self) -> &RecordId {
        match self {
            SoftwareClaim::New(id) | SoftwareClaim::Existing(id) => id,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, SoftwareClaim::New(_))
    }
}

/// Keys seen during one run
#[derive(Debug, Default, Clone)]
pub struct KeyRegistry {
    software: HashMap<String, RecordId>,
    /// Every software id in use, seeded or assigned
    ids: HashSet<RecordId>,
    installs: HashSet<String>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a software key
    ///
    /// A new key gets the id of the first row counter at or after `counter`
    /// whose id is not already taken.
    pub fn claim_software(&mut self, key: &str, counter: u64) -> SoftwareClaim {
        if let Some(existing) = self.software.get(key) {
            return SoftwareClaim::Existing(existing.clone());
        }

        let mut next = counter;
        let mut id = RecordId::from_row_counter(next);
        while self.ids.contains(&id) {
            next += 1;
            id = RecordId::from_row_counter(next);
        }
        if next != counter {
            log::debug!("Id for row counter {} is taken, using {}", counter, id);
        }

        self.ids.insert(id.clone());
        self.software.insert(key.to_string(), id.clone());
        SoftwareClaim::New(id)
    }

    /// Register an installation key; `false` if it was already present
    pub fn claim_install(&mut self, key: &str) -> bool {
        self.installs.insert(key.to_string())
    }

    /// Pre-register a software record that already exists in the target
    pub fn seed_software(&mut self, key: impl Into<String>, id: RecordId) {
        self.ids.insert(id.clone());
        self.software.insert(key.into(), id);
    }

    /// Pre-register an installation that already exists in the target
    pub fn seed_install(&mut self, key: impl Into<String>) {
        self.installs.insert(key.into());
    }
}

#[cfg(test)]
impl KeyRegistry {
    pub fn software_id(&self, key: &str) -> Option<&RecordId> {
        self.software.get(key)
    }

    pub fn contains_install(&self, key: &str) -> bool {
        self.installs.contains(key)
    }
}
