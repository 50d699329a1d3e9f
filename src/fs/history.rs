//! File revisions.

use chrono::{DateTime, Utc};

use super::Size;
use crate::api::HistoryRecord;

/// One revision of a file.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    pub id: i64,
    pub revision: i64,
    pub full_path: String,
    pub name: String,
    /// Content hash of this revision
    pub hash: String,
    pub size: Size,
    pub last_modified: DateTime<Utc>,
    /// Set on the first revision returned by the server only
    pub is_current_version: bool,
}

impl History {
    fn from_record(record: HistoryRecord, is_current_version: bool) -> Self {
        Self {
            id: record.id,
            revision: record.revision,
            full_path: record.full_path,
            name: record.name,
            hash: record.hash,
            size: Size::new(record.size),
            last_modified: unix_to_utc(record.time),
            is_current_version,
        }
    }
}

/// Convert server records, marking the first one as the current version.
pub(crate) fn from_records(records: Vec<HistoryRecord>) -> Vec<History> {
    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| History::from_record(record, idx == 0))
        .collect()
}

pub(crate) fn unix_to_utc(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or_default()
}
