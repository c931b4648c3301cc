//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Order session / business rule failures         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tally-store errors (separate crate)                                   │
//! │  └── StoreError       - Logged and masked, never reaches callers       │
//! │                                                                         │
//! │  tally-receipt errors (separate crate)                                 │
//! │  └── RenderError      - Reported as a failed print outcome             │
//! │                                                                         │
//! │  Register app                                                          │
//! │  └── ApiError         - What the front end sees                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant here is recoverable: the session is left exactly as it was
//! before the failing call.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Order session and business rule errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An order operation was attempted with nobody logged in.
    #[error("No active order: log in first")]
    NoActiveOrder,

    /// `login` was called while another session is still open.
    ///
    /// ## User Workflow
    /// ```text
    /// Ahmed logged in ──► Fatima taps her name
    ///      │
    ///      ▼
    /// AlreadyLoggedIn { staff_name: "Ahmed" }
    ///      │
    ///      ▼
    /// UI asks Ahmed to log out first
    /// ```
    #[error("{staff_name} is still logged in; log out first")]
    AlreadyLoggedIn { staff_name: String },

    /// Item index does not point at a line of the current order.
    #[error("No order item at index {index} (order has {len} items)")]
    InvalidIndex { index: usize, len: usize },

    /// Quantity must be a positive integer; use remove for zero.
    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(i64),

    /// A line or order total no longer fits in [`Money`](crate::Money).
    #[error("Amount too large: {0}")]
    AmountOverflow(String),

    /// Submitting an order with no items.
    #[error("Order is empty and cannot be submitted")]
    EmptyOrder,

    /// A single-select addon category needs exactly one option.
    #[error("{category} requires exactly one choice, got {selected}")]
    SingleSelectViolation { category: String, selected: usize },

    /// Selection references a category the product does not carry.
    #[error("Product {product_id} has no addon category {category_id}")]
    UnknownAddonCategory {
        product_id: String,
        category_id: String,
    },

    /// Selection references an option missing from its category.
    #[error("Addon category {category} has no option {option_id}")]
    UnknownAddonOption { category: String, option_id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., access code with letters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two staff sharing an access code).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
