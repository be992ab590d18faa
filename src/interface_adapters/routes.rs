use crate::interface_adapters::handlers::{checkin, checkins, guests, logout, me, report, verify};
use crate::interface_adapters::state::AppState;
use axum::{Router, routing::any};

// Guarded handlers check the method themselves, after authentication.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/verify", any(verify))
        .route("/logout", any(logout))
        .route("/me", any(me))
        .route("/checkin", any(checkin))
        .route("/checkins", any(checkins))
        .route("/report", any(report))
        .route("/guests", any(guests))
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api_routes())
        .nest("/api", api_routes())
        .with_state(state)
}
