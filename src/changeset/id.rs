//! Changeset id generation

use chrono::Local;

/// Stable, auto-generated changeset identifiers: one timestamp per
/// generation run plus a monotonically increasing sequence number.
pub struct ChangeSetIdGenerator {
    timestamp: String,
    seq: u32,
}

impl ChangeSetIdGenerator {
    pub fn new() -> Self {
        ChangeSetIdGenerator {
            timestamp: Local::now().format("%Y%m%d%H%M%S").to_string(),
            seq: 1,
        }
    }

    /// Fixed timestamp constructor used by tests for reproducible ids.
    pub fn with_timestamp(timestamp: impl Into<String>) -> Self {
        ChangeSetIdGenerator {
            timestamp: timestamp.into(),
            seq: 1,
        }
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.timestamp, self.seq);
        self.seq += 1;
        id
    }
}

impl Default for ChangeSetIdGenerator {
    fn default() -> Self {
        ChangeSetIdGenerator::new()
    }
}
