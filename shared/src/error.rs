//! Error taxonomy for session gating and prediction submissions

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Route;

/// Why a session could not be used
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnauthenticatedReason {
    /// Token or user record absent from local storage
    MissingCredentials,
    /// The authentication service answered with a non-success status
    Rejected { status: u16 },
    /// The verification call never produced a response
    VerificationUnreachable { detail: String },
    /// A prediction service refused the bearer token
    TokenRefused { status: u16 },
}

/// The stored credential is missing, invalid or expired.
///
/// Always resolved by clearing the local session and sending the user to
/// [`Route::Landing`]; never rendered as an inline form error.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[error("Unauthenticated: {reason:?}")]
pub struct Unauthenticated {
    pub reason: UnauthenticatedReason,
}

impl Unauthenticated {
    pub fn missing_credentials() -> Self {
        Self {
            reason: UnauthenticatedReason::MissingCredentials,
        }
    }

    pub fn rejected(status: u16) -> Self {
        Self {
            reason: UnauthenticatedReason::Rejected { status },
        }
    }

    pub fn unreachable(detail: impl Into<String>) -> Self {
        Self {
            reason: UnauthenticatedReason::VerificationUnreachable {
                detail: detail.into(),
            },
        }
    }

    pub fn token_refused(status: u16) -> Self {
        Self {
            reason: UnauthenticatedReason::TokenRefused { status },
        }
    }

    /// Where the caller must navigate after the session has been cleared
    pub fn redirect_to(&self) -> Route {
        Route::Landing
    }
}

/// Failure of a single prediction submission
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredictionError {
    #[error(transparent)]
    Unauthenticated(Unauthenticated),

    /// Rejected client-side before any network call
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    /// The service understood the request but would not fulfil it
    #[error("{message}")]
    DomainRejection {
        message: String,
        supported_values: Option<Vec<String>>,
    },

    /// No usable response: network error, timeout or malformed body
    #[error("Transport failure: {detail}")]
    TransportFailure { detail: String },
}

impl PredictionError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PredictionError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn rejection(message: impl Into<String>) -> Self {
        PredictionError::DomainRejection {
            message: message.into(),
            supported_values: None,
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        PredictionError::TransportFailure {
            detail: detail.into(),
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, PredictionError::Unauthenticated(_))
    }

    /// Transport failures are the only class worth an identical resubmission
    pub fn is_retryable(&self) -> bool {
        matches!(self, PredictionError::TransportFailure { .. })
    }
}

impl From<Unauthenticated> for PredictionError {
    fn from(e: Unauthenticated) -> Self {
        PredictionError::Unauthenticated(e)
    }
}
