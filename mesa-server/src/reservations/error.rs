//! Reservation core errors

use crate::db::repository::RepoError;
use shared::ReservationStatus;
use thiserror::Error;

/// Errors raised by the availability checker and the lifecycle manager
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("Reservation not found: {0}")]
    NotFound(String),

    /// Requested tables are taken for the window; ids enumerated so the
    /// client can offer alternatives
    #[error("Tables already reserved for this time: {}", occupied.join(", "))]
    TableConflict { occupied: Vec<String> },

    #[error("The venue is already booked for this time")]
    VenueConflict,

    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    Rule(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<ReservationError> for crate::utils::AppError {
    fn from(err: ReservationError) -> Self {
        use crate::utils::AppError;
        match err {
            ReservationError::NotFound(msg) => AppError::NotFound(msg),
            ReservationError::TableConflict { .. } | ReservationError::VenueConflict => {
                AppError::Conflict(err.to_string())
            }
            ReservationError::InvalidTransition { .. } => {
                AppError::InvalidTransition(err.to_string())
            }
            ReservationError::Validation(msg) => AppError::Validation(msg),
            ReservationError::Rule(msg) => AppError::BusinessRule(msg),
            ReservationError::Repo(e) => e.into(),
        }
    }
}

pub type ReservationResult<T> = Result<T, ReservationError>;
