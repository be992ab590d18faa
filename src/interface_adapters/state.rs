use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::ports::{CheckinStore, Clock, GuestRoster};
use crate::frameworks::config::Config;

// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    // `None` when no backend is configured; store-backed endpoints then answer 500.
    pub store: Option<Arc<dyn CheckinStore>>,
    pub roster: Arc<dyn GuestRoster>,
}

// System clock adapter used by check-in use cases.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
