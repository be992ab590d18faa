use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::error;

use crate::domain::errors::CheckinError;
use crate::domain::ports::GuestRoster;

// Guest roster read from a CSV file on every call; the file is never written.
#[derive(Clone, Debug)]
pub struct CsvFileRoster {
    pub path: PathBuf,
}

#[async_trait]
impl GuestRoster for CsvFileRoster {
    async fn raw_csv(&self) -> Result<String, CheckinError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => CheckinError::MissingRoster,
                _ => {
                    error!(path = %self.path.display(), error = %err, "failed to read guest roster");
                    CheckinError::Storage(err.to_string())
                }
            })
    }

    async fn names(&self) -> Result<HashMap<String, String>, CheckinError> {
        let csv = self.raw_csv().await?;
        Ok(parse_names(&csv))
    }
}

// Builds `id -> name` from roster CSV. Columns are located by header name
// (`id`, `name`, case-insensitive); without a match the first two columns are used.
// Rows may be ragged; malformed rows are skipped.
pub fn parse_names(text: &str) -> HashMap<String, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.trim_start_matches('\u{feff}').as_bytes());
    let mut records = reader.records().filter_map(Result::ok);
    let Some(header) = records.next() else {
        return HashMap::new();
    };

    let column = |wanted: &str, fallback: usize| {
        header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
            .unwrap_or(fallback)
    };
    let id_col = column("id", 0);
    let name_col = column("name", 1);

    records
        .filter_map(|record| {
            let id = record.get(id_col)?.trim().to_string();
            if id.is_empty() {
                return None;
            }
            let name = record
                .get(name_col)
                .map(|n| n.trim().to_string())
                .unwrap_or_default();
            Some((id, name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_header_names_columns_then_they_are_used_in_any_order() {
        let names = parse_names("Name,Table,ID\nAda Lovelace,4,g1\nGrace Hopper,2,g2\n");

        assert_eq!(names.get("g1").map(String::as_str), Some("Ada Lovelace"));
        assert_eq!(names.get("g2").map(String::as_str), Some("Grace Hopper"));
    }

    #[test]
    fn when_fields_are_quoted_then_commas_and_quotes_survive() {
        let names = parse_names("id,name\r\ng1,\"Jane, \"\"VIP\"\"\"\r\n");

        assert_eq!(names.get("g1").map(String::as_str), Some(r#"Jane, "VIP""#));
    }

    #[test]
    fn when_header_is_unrecognised_then_first_two_columns_are_used() {
        let names = parse_names("guest,full name\ng9,Alan Turing");

        assert_eq!(names.get("g9").map(String::as_str), Some("Alan Turing"));
    }

    #[test]
    fn when_rows_are_blank_or_lack_ids_then_they_are_skipped() {
        let names = parse_names("\u{feff}id,name\n\n,Nobody\ng1,Ada\n");

        assert_eq!(names.len(), 1);
        assert!(names.contains_key("g1"));
    }

    #[test]
    fn when_rows_have_fewer_fields_than_header_then_missing_names_are_empty() {
        let names = parse_names("id,name,table\ng1,Ada,4\ng2\n");

        assert_eq!(names.get("g1").map(String::as_str), Some("Ada"));
        assert_eq!(names.get("g2").map(String::as_str), Some(""));
    }

    #[test]
    fn when_csv_is_empty_then_no_names_are_returned() {
        assert!(parse_names("").is_empty());
    }

    #[tokio::test]
    async fn when_roster_file_is_missing_then_returns_missing_roster() {
        let roster = CsvFileRoster {
            path: PathBuf::from("does/not/exist/guests.csv"),
        };

        let result = roster.raw_csv().await;

        assert_eq!(result, Err(CheckinError::MissingRoster));
    }

    #[tokio::test]
    async fn when_roster_file_exists_then_it_is_returned_verbatim() {
        let path = std::env::temp_dir().join(format!("roster-{}.csv", std::process::id()));
        tokio::fs::write(&path, "id,name\ng1,Ada\n")
            .await
            .expect("expected roster fixture to be written");
        let roster = CsvFileRoster { path: path.clone() };

        let csv = roster.raw_csv().await.expect("expected roster csv");
        let names = roster.names().await.expect("expected roster names");
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(csv, "id,name\ng1,Ada\n");
        assert_eq!(names.get("g1").map(String::as_str), Some("Ada"));
    }
}
