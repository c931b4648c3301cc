//! # API Error Types
//!
//! Everything a register command can fail with, in one serializable shape.
//!
//! ## Conversion Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Source error                           ApiError.code                   │
//! │  ────────────────────────────────────   ───────────────────────         │
//! │  CoreError::NoActiveOrder               SESSION_ERROR                   │
//! │  CoreError::AlreadyLoggedIn             SESSION_ERROR                   │
//! │  CoreError::InvalidIndex / Quantity     ORDER_ERROR / VALIDATION_ERROR  │
//! │  CoreError::EmptyOrder                  ORDER_ERROR                     │
//! │  CoreError::*Addon* / SingleSelect      VALIDATION_ERROR                │
//! │  CoreError::AmountOverflow              VALIDATION_ERROR                │
//! │  ValidationError                        VALIDATION_ERROR                │
//! │  AuthError                              UNAUTHORIZED                    │
//! │  StoreError (startup only)              DATABASE_ERROR                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Print failures are not errors: they come back as a `PrintOutcome`.

use serde::Serialize;
use tally_core::{CoreError, ValidationError};
use tally_store::StoreError;
use thiserror::Error;

/// API error returned from register commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "ORDER_ERROR",
///   "message": "Order is empty and cannot be submitted"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Wrong access code, wrong admin code, or admin gate locked
    Unauthorized,

    /// Login/logout state doesn't allow the operation
    SessionError,

    /// Operation on the in-progress order failed
    OrderError,

    /// Database could not be opened
    DatabaseError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

// =============================================================================
// Auth Error
// =============================================================================

/// Authentication failures. Never locks anyone out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("No staff member has that access code")]
    UnknownAccessCode,

    #[error("Unknown staff member: {0}")]
    UnknownStaff(String),

    #[error("Wrong admin code")]
    WrongAdminCode,

    #[error("Admin access required")]
    AdminLocked,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::new(ErrorCode::Unauthorized, err.to_string())
    }
}

// =============================================================================
// Conversions
// =============================================================================

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::NoActiveOrder | CoreError::AlreadyLoggedIn { .. } => ErrorCode::SessionError,
            CoreError::InvalidIndex { .. } | CoreError::EmptyOrder => ErrorCode::OrderError,
            CoreError::InvalidQuantity(_)
            | CoreError::AmountOverflow(_)
            | CoreError::SingleSelectViolation { .. }
            | CoreError::UnknownAddonCategory { .. }
            | CoreError::UnknownAddonOption { .. }
            | CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts store errors to API errors.
///
/// Only reachable when opening the store; reads and writes mask their own
/// failures.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Store error reached the command layer");
        ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
