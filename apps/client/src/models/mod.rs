pub mod application;
pub mod job;
pub mod profile;

use serde::{Deserialize, Serialize};

use crate::session::types::RecordId;

/// A reference the backend may or may not have populated with the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Populated<T> {
    Record(T),
    Id(RecordId),
}

impl<T> Populated<T> {
    pub fn record(&self) -> Option<&T> {
        match self {
            Populated::Record(record) => Some(record),
            Populated::Id(_) => None,
        }
    }
}

/// Records that carry their own backend id.
pub trait Identified {
    fn record_id(&self) -> &RecordId;
}

impl<T: Identified> Populated<T> {
    pub fn id(&self) -> &RecordId {
        match self {
            Populated::Record(record) => record.record_id(),
            Populated::Id(id) => id,
        }
    }
}

/// Case-insensitive substring test used by the list filters.
pub(crate) fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}
