use tracing::warn;

use crate::domain::entities::ReportRow;
use crate::domain::errors::CheckinError;
use crate::domain::ports::{CheckinStore, GuestRoster};
use crate::domain::report;

// Attendance export joining stored check-ins with roster names.
pub struct ExportReportUseCase<'a, S, R> {
    pub store: S,
    pub roster: R,
    pub event_key: &'a str,
}

impl<S, R> ExportReportUseCase<'_, S, R>
where
    S: CheckinStore,
    R: GuestRoster,
{
    pub async fn list_checkins_with_names(&self) -> Result<Vec<ReportRow>, CheckinError> {
        let records = self.store.list_checkins(self.event_key).await?;

        // The report still renders without a roster; names are left blank.
        let names = match self.roster.names().await {
            Ok(names) => names,
            Err(CheckinError::MissingRoster) => {
                warn!("guest roster missing, exporting report without names");
                Default::default()
            }
            Err(err) => return Err(err),
        };

        let mut rows: Vec<ReportRow> = records
            .into_iter()
            .filter(|record| !record.id.is_empty())
            .map(|record| ReportRow {
                name: names.get(&record.id).cloned().unwrap_or_default(),
                checked_in_at: Some(record.checked_in_at).filter(|ts| !ts.is_empty()),
                id: record.id,
            })
            .collect();
        report::sort_rows(&mut rows);

        Ok(rows)
    }

    pub async fn execute(&self) -> Result<String, CheckinError> {
        let rows = self.list_checkins_with_names().await?;
        Ok(report::render_csv(&rows))
    }
}
