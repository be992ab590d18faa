use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::entities::CheckinRecord;
use crate::domain::errors::CheckinError;
use crate::domain::ports::{CheckinStore, Clock, GuestRoster};

pub(crate) type CheckinTable = Arc<Mutex<HashMap<(String, String), String>>>;

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) DateTime<Utc>);

impl FixedClock {
    pub(crate) fn at_millis(millis: i64) -> Self {
        Self(
            Utc.timestamp_millis_opt(millis)
                .single()
                .expect("valid test timestamp"),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub upsert: bool,
    pub list: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingStore {
    checkins: CheckinTable,
    failures: FailureFlags,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self {
            checkins: Arc::new(Mutex::new(HashMap::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_checkin(&self, event_key: &str, id: &str, ts: &str) {
        let mut guard = self.checkins.lock().expect("checkins mutex poisoned");
        guard.insert((event_key.to_string(), id.to_string()), ts.to_string());
    }

    pub(crate) fn get_test_checkin(&self, event_key: &str, id: &str) -> Option<String> {
        let guard = self.checkins.lock().expect("checkins mutex poisoned");
        guard
            .get(&(event_key.to_string(), id.to_string()))
            .cloned()
    }
}

#[async_trait]
impl CheckinStore for RecordingStore {
    async fn upsert_checkin(
        &self,
        event_key: &str,
        guest_id: &str,
        checked_in_at: &str,
    ) -> Result<(), CheckinError> {
        if self.failures.upsert {
            return Err(CheckinError::Storage("upsert failed".to_string()));
        }

        self.insert_test_checkin(event_key, guest_id, checked_in_at);
        Ok(())
    }

    async fn list_checkins(&self, event_key: &str) -> Result<Vec<CheckinRecord>, CheckinError> {
        if self.failures.list {
            return Err(CheckinError::Storage("list failed".to_string()));
        }

        let guard = self.checkins.lock().expect("checkins mutex poisoned");
        Ok(guard
            .iter()
            .filter(|((key, _), _)| key == event_key)
            .map(|((_, id), ts)| CheckinRecord {
                id: id.clone(),
                checked_in_at: ts.clone(),
            })
            .collect())
    }
}

// Roster double; `None` behaves like a missing roster file.
#[derive(Clone)]
pub(crate) struct StaticRoster {
    pub(crate) rows: Option<Vec<(String, String)>>,
}

impl StaticRoster {
    pub(crate) fn with(rows: &[(&str, &str)]) -> Self {
        Self {
            rows: Some(
                rows.iter()
                    .map(|(id, name)| (id.to_string(), name.to_string()))
                    .collect(),
            ),
        }
    }

    pub(crate) fn missing() -> Self {
        Self { rows: None }
    }
}

#[async_trait]
impl GuestRoster for StaticRoster {
    async fn raw_csv(&self) -> Result<String, CheckinError> {
        let rows = self.rows.as_ref().ok_or(CheckinError::MissingRoster)?;
        let mut lines = vec!["id,name".to_string()];
        lines.extend(rows.iter().map(|(id, name)| format!("{id},{name}")));
        Ok(lines.join("\n"))
    }

    async fn names(&self) -> Result<HashMap<String, String>, CheckinError> {
        let rows = self.rows.as_ref().ok_or(CheckinError::MissingRoster)?;
        Ok(rows.iter().cloned().collect())
    }
}
