//! # Error Types
//!
//! Domain-specific error types for factura-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  factura-core errors (this file)                                       │
//! │  ├── CoreError        - Editor operations that cannot proceed          │
//! │  └── ValidationError  - Form input rejected before saving              │
//! │                                                                         │
//! │  factura-cli errors (app)                                              │
//! │  └── CliError         - I/O, JSON, and the two above                   │
//! │                                                                         │
//! │  NOT HERE: the totals calculator has no error type. It cannot fail.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, index, bounds)
//! 3. Errors are enum variants, never String

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Editor errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A row index does not exist.
    ///
    /// ## When This Occurs
    /// - The form sent an edit for a row that was removed meanwhile
    #[error("Line {index} not found (document has {len} lines)")]
    LineNotFound { index: usize, len: usize },

    /// Removing the only row of a document.
    ///
    /// ## User Workflow
    /// ```text
    /// Document with 1 row
    ///      │
    ///      ▼
    /// Click remove
    ///      │
    ///      ▼
    /// LastLine → the remove button does nothing
    /// ```
    #[error("A document must keep at least one line")]
    LastLine,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors raised by the form layer.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: Decimal,
        max: Decimal,
    },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
