use std::collections::BTreeMap;

use crate::domain::errors::CheckinError;
use crate::domain::ports::CheckinStore;

// Lists the current check-ins for an event as `guest id -> timestamp`.
pub struct ListCheckinsUseCase<'a, S> {
    pub store: S,
    pub event_key: &'a str,
}

impl<S> ListCheckinsUseCase<'_, S>
where
    S: CheckinStore,
{
    pub async fn execute(&self) -> Result<BTreeMap<String, String>, CheckinError> {
        let records = self.store.list_checkins(self.event_key).await?;

        Ok(records
            .into_iter()
            .filter(|record| !record.id.is_empty())
            .map(|record| (record.id, record.checked_in_at))
            .collect())
    }
}
