use crate::domain::{NormalizedEmail, Record, RecordId};
use std::collections::HashMap;

/// Order ids grouped by normalized email. Each id appears at most once per
/// email, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailIndex {
    entries: HashMap<NormalizedEmail, Vec<RecordId>>,
}

impl EmailIndex {
    /// Returns false when the id was already present for this email.
    pub fn insert(&mut self, email: NormalizedEmail, id: RecordId) -> bool {
        let ids = self.entries.entry(email).or_default();
        if ids.contains(&id) {
            return false;
        }
        ids.push(id);
        true
    }

    pub fn get(&self, email: &NormalizedEmail) -> &[RecordId] {
        self.entries
            .get(email)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn unique_emails(&self) -> usize {
        self.entries.len()
    }

    pub fn total_ids(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouping {
    pub index: EmailIndex,
    pub without_email: usize,
    pub without_id: usize,
}

pub fn group_by_email<'a, I>(records: I, email_field: &str) -> Grouping
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut grouping = Grouping::default();
    for record in records {
        let Some(email) = record.email(email_field) else {
            grouping.without_email += 1;
            continue;
        };
        let Some(id) = record.id() else {
            grouping.without_id += 1;
            continue;
        };
        grouping.index.insert(email, id);
    }
    grouping
}
