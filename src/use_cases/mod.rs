pub mod export_report;
pub mod list_checkins;
pub mod record_checkin;
pub mod verify_pin;

#[cfg(test)]
pub(crate) mod test_support;
