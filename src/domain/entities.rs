use serde::{Deserialize, Serialize};

// Claims carried inside a session token. Integrity-protected, never encrypted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    // Issue time in epoch milliseconds.
    pub iat: u64,
}

// One stored check-in: the latest timestamp for a guest within an event partition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckinRecord {
    pub id: String,
    pub checked_in_at: String,
}

// Report projection of a check-in joined with the roster name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRow {
    pub name: String,
    pub id: String,
    pub checked_in_at: Option<String>,
}
