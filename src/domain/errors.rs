use thiserror::Error;

// Domain-level errors for check-in workflows.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckinError {
    // Carries the user-facing message naming what is missing.
    #[error("{0}")]
    MissingConfig(&'static str),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid PIN")]
    InvalidPin,
    #[error("Missing id")]
    MissingGuestId,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Missing guest roster")]
    MissingRoster,
    // Backend message is passed through to the caller.
    #[error("{0}")]
    Storage(String),
    #[error("{0}")]
    Internal(String),
}
