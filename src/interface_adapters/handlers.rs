use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::{debug, info};

use crate::domain::errors::CheckinError;
use crate::domain::ports::CheckinStore;
use crate::domain::report::REPORT_FILENAME;
use crate::interface_adapters::protocol::{
    CheckinRequest, CheckinResponse, CheckinsResponse, ErrorResponse, OkResponse, VerifyRequest,
    loose_string, parse_body,
};
use crate::interface_adapters::session;
use crate::interface_adapters::state::{AppState, SystemClock};
use crate::use_cases::export_report::ExportReportUseCase;
use crate::use_cases::list_checkins::ListCheckinsUseCase;
use crate::use_cases::record_checkin::RecordCheckinUseCase;
use crate::use_cases::verify_pin::VerifyPinUseCase;

type ApiError = (StatusCode, Json<ErrorResponse>);

const NO_STORE: (HeaderName, &str) = (header::CACHE_CONTROL, "no-store");
const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

// Handler for exchanging the shared PIN for a session cookie.
#[tracing::instrument(name = "verify", skip_all)]
pub async fn verify(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Response, ApiError> {
    if method != Method::POST {
        return Err(map_checkin_error(
            CheckinError::MethodNotAllowed,
            ErrorContext::Verify,
        ));
    }

    let payload: VerifyRequest = parse_body(&body);
    let submitted_pin = loose_string(payload.pin).unwrap_or_default();

    let use_case = VerifyPinUseCase {
        clock: SystemClock,
        expected_pin: state.config.guest_pin.as_deref(),
        secret: state.config.auth_secret.as_deref(),
    };
    let result = use_case.execute(&submitted_pin).map_err(|err| {
        if err == CheckinError::InvalidPin {
            debug!("pin rejected");
        }
        map_checkin_error(err, ErrorContext::Verify)
    })?;

    info!(iat = result.claims.iat, "session issued");

    Ok((
        [(header::SET_COOKIE, session::issue_cookie(&result.token))],
        Json(OkResponse { ok: true }),
    )
        .into_response())
}

// Handler for clearing the session cookie. Tokens are stateless, so nothing is revoked.
pub async fn logout() -> Response {
    (
        [(header::SET_COOKIE, session::cleared_cookie())],
        Json(OkResponse { ok: true }),
    )
        .into_response()
}

// Handler reporting whether the caller holds a valid session.
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<OkResponse>, ApiError> {
    let secret = state.config.auth_secret.as_deref().ok_or_else(|| {
        map_checkin_error(
            CheckinError::MissingConfig("Missing AUTH_SECRET"),
            ErrorContext::Me,
        )
    })?;

    let ok = session::authenticate(session::cookie_header(&headers).as_deref(), secret);
    Ok(Json(OkResponse { ok }))
}

// Handler recording or overwriting a guest check-in.
#[tracing::instrument(name = "checkin", skip_all)]
pub async fn checkin(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    authorize(&state, &headers, &method, Method::POST)?;
    let store = require_store(&state)?;

    let payload: CheckinRequest = parse_body(&body);
    let use_case = RecordCheckinUseCase {
        clock: SystemClock,
        store,
        event_key: &state.config.event_key,
    };

    let record = use_case
        .execute(loose_string(payload.id), loose_string(payload.checked_in_at))
        .await
        .map_err(|err| map_checkin_error(err, ErrorContext::Guarded))?;

    info!(guest_id = %record.id, "guest checked in");

    Ok((
        [NO_STORE],
        Json(CheckinResponse {
            ok: true,
            id: record.id,
            checked_in_at: record.checked_in_at,
        }),
    )
        .into_response())
}

// Handler listing check-ins for the configured event.
#[tracing::instrument(name = "checkins", skip_all)]
pub async fn checkins(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    authorize(&state, &headers, &method, Method::GET)?;
    let store = require_store(&state)?;

    let use_case = ListCheckinsUseCase {
        store,
        event_key: &state.config.event_key,
    };
    let checkins = use_case
        .execute()
        .await
        .map_err(|err| map_checkin_error(err, ErrorContext::Guarded))?;

    Ok((
        [NO_STORE],
        Json(CheckinsResponse { ok: true, checkins }),
    )
        .into_response())
}

// Handler exporting the attendance report as a CSV attachment.
#[tracing::instrument(name = "report", skip_all)]
pub async fn report(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    authorize(&state, &headers, &method, Method::GET)?;
    let store = require_store(&state)?;

    let use_case = ExportReportUseCase {
        store,
        roster: state.roster.clone(),
        event_key: &state.config.event_key,
    };
    let csv = use_case
        .execute()
        .await
        .map_err(|err| map_checkin_error(err, ErrorContext::Guarded))?;

    Ok((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={REPORT_FILENAME}"),
            ),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        csv,
    )
        .into_response())
}

// Handler serving the guest roster file as-is.
#[tracing::instrument(name = "guests", skip_all)]
pub async fn guests(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    authorize(&state, &headers, &method, Method::GET)?;

    let csv = state
        .roster
        .raw_csv()
        .await
        .map_err(|err| map_checkin_error(err, ErrorContext::Guarded))?;

    Ok((
        [(header::CONTENT_TYPE, CSV_CONTENT_TYPE), NO_STORE],
        csv,
    )
        .into_response())
}

// Session first, method second: unauthenticated callers only ever see 401.
fn authorize(
    state: &AppState,
    headers: &HeaderMap,
    method: &Method,
    allowed: Method,
) -> Result<(), ApiError> {
    session::require_session(headers, state.config.auth_secret.as_deref()).map_err(|err| {
        if err == CheckinError::Unauthorized {
            debug!("request rejected without a valid session");
        }
        map_checkin_error(err, ErrorContext::Guarded)
    })?;

    if *method != allowed {
        return Err(map_checkin_error(
            CheckinError::MethodNotAllowed,
            ErrorContext::Guarded,
        ));
    }

    Ok(())
}

fn require_store(state: &AppState) -> Result<Arc<dyn CheckinStore>, ApiError> {
    state.store.clone().ok_or_else(|| {
        map_checkin_error(
            CheckinError::MissingConfig("Missing store configuration"),
            ErrorContext::Guarded,
        )
    })
}

// Helper to build a JSON error response.
fn error_response(status: StatusCode, ok: Option<bool>, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            ok,
            error: message.to_string(),
        }),
    )
}

// Maps domain errors to HTTP responses by endpoint context.
enum ErrorContext {
    Verify,
    Me,
    Guarded,
}

fn map_checkin_error(err: CheckinError, context: ErrorContext) -> ApiError {
    let status = match err {
        CheckinError::MissingConfig(_)
        | CheckinError::MissingRoster
        | CheckinError::Storage(_)
        | CheckinError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        CheckinError::Unauthorized | CheckinError::InvalidPin => StatusCode::UNAUTHORIZED,
        CheckinError::MissingGuestId => StatusCode::BAD_REQUEST,
        CheckinError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
    };

    // Verify and me carry an explicit `ok: false` alongside the error.
    let ok = match (context, &err) {
        (ErrorContext::Me, _) | (ErrorContext::Verify, CheckinError::InvalidPin) => Some(false),
        (ErrorContext::Verify, _) | (ErrorContext::Guarded, _) => None,
    };

    error_response(status, ok, &err.to_string())
}
