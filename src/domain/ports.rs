use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::CheckinRecord;
use crate::domain::errors::CheckinError;

// Port for check-in persistence. Implementations must overwrite the timestamp
// when the (event_key, id) pair already exists.
#[async_trait]
pub trait CheckinStore: Send + Sync {
    async fn upsert_checkin(
        &self,
        event_key: &str,
        guest_id: &str,
        checked_in_at: &str,
    ) -> Result<(), CheckinError>;

    // Records with an empty id are never returned.
    async fn list_checkins(&self, event_key: &str) -> Result<Vec<CheckinRecord>, CheckinError>;
}

// Port for the read-only guest roster.
#[async_trait]
pub trait GuestRoster: Send + Sync {
    async fn raw_csv(&self) -> Result<String, CheckinError>;
    async fn names(&self) -> Result<HashMap<String, String>, CheckinError>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[async_trait]
impl<T: CheckinStore + ?Sized> CheckinStore for Arc<T> {
    async fn upsert_checkin(
        &self,
        event_key: &str,
        guest_id: &str,
        checked_in_at: &str,
    ) -> Result<(), CheckinError> {
        (**self)
            .upsert_checkin(event_key, guest_id, checked_in_at)
            .await
    }

    async fn list_checkins(&self, event_key: &str) -> Result<Vec<CheckinRecord>, CheckinError> {
        (**self).list_checkins(event_key).await
    }
}

#[async_trait]
impl<T: GuestRoster + ?Sized> GuestRoster for Arc<T> {
    async fn raw_csv(&self) -> Result<String, CheckinError> {
        (**self).raw_csv().await
    }

    async fn names(&self) -> Result<HashMap<String, String>, CheckinError> {
        (**self).names().await
    }
}
