use crate::facts::organization_record::OrganizationRecord;
use std::collections::HashMap;

/// Organizations already known to the run, keyed by login.
///
/// Seeded from the existing organizations file so that repeated runs never
/// emit the same organization twice.
#[derive(Debug, Clone, Default)]
pub struct OrganizationMemo {
    known: HashMap<String, OrganizationRecord>,
}

impl OrganizationMemo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, login: &str) -> Option<&OrganizationRecord> {
        self.known.get(login)
    }

    #[must_use]
    pub fn contains(&self, login: &str) -> bool {
        self.known.contains_key(login)
    }

    /// Remember `record`; returns `false` if the login was already known.
    pub fn insert(&mut self, record: OrganizationRecord) -> bool {
        if self.known.contains_key(&record.organization_user_name) {
            return false;
        }

        let _ = self.known.insert(record.organization_user_name.clone(), record);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.known.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

impl FromIterator<OrganizationRecord> for OrganizationMemo {
    fn from_iter<I: IntoIterator<Item = OrganizationRecord>>(iter: I) -> Self {
        let mut memo = Self::new();
        for record in iter {
            let _ = memo.insert(record);
        }
        memo
    }
}
