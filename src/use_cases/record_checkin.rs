use chrono::SecondsFormat;

use crate::domain::entities::CheckinRecord;
use crate::domain::errors::CheckinError;
use crate::domain::ports::{CheckinStore, Clock};

// Check-in use case with injected dependencies.
pub struct RecordCheckinUseCase<'a, C, S> {
    pub clock: C,
    pub store: S,
    pub event_key: &'a str,
}

impl<C, S> RecordCheckinUseCase<'_, C, S>
where
    C: Clock,
    S: CheckinStore,
{
    pub async fn execute(
        &self,
        guest_id: Option<String>,
        checked_in_at: Option<String>,
    ) -> Result<CheckinRecord, CheckinError> {
        let id = guest_id.unwrap_or_default().trim().to_string();
        if id.is_empty() {
            return Err(CheckinError::MissingGuestId);
        }

        let checked_in_at = checked_in_at
            .filter(|ts| !ts.is_empty())
            .unwrap_or_else(|| {
                self.clock
                    .now()
                    .to_rfc3339_opts(SecondsFormat::Millis, true)
            });

        self.store
            .upsert_checkin(self.event_key, &id, &checked_in_at)
            .await?;

        Ok(CheckinRecord { id, checked_in_at })
    }
}
