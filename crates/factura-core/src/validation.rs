//! # Validation Module
//!
//! Input validation for document forms and payments.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form (this module)                                           │
//! │  ├── Required descriptions, client selected                            │
//! │  ├── Quantities, prices, rates in range                                │
//! │  └── Runs on save, shows "could not save" on failure                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Totals calculator                                            │
//! │  └── Validates NOTHING. Garbage becomes 0, >100% discounts go negative │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Storage backend                                              │
//! │  └── NOT NULL / foreign key constraints                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use factura_core::validation::{validate_quantity, validate_discount_percent};
//! use factura_core::types::Percent;
//! use rust_decimal::Decimal;
//!
//! assert!(validate_quantity(Decimal::from(5)).is_ok());
//! assert!(validate_discount_percent("discount_percent", Percent::from_int(150)).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{LineItem, Percent};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest description accepted on a line.
pub const MAX_DESCRIPTION_LEN: usize = 500;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a line description.
///
/// ## Rules
/// - Must not be blank
/// - At most 500 characters
pub fn validate_description(description: &str) -> ValidationResult<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

fn non_negative(field: &str, value: Decimal) -> ValidationResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a line quantity. Zero is allowed (placeholder rows).
pub fn validate_quantity(quantity: Decimal) -> ValidationResult<()> {
    non_negative("quantity", quantity)
}

/// Validates a unit price. Zero is allowed (free items).
pub fn validate_unit_price(unit_price: Decimal) -> ValidationResult<()> {
    non_negative("unit_price", unit_price)
}

/// Validates a tax rate. No upper bound; 0% is allowed.
pub fn validate_tax_rate(rate: Percent) -> ValidationResult<()> {
    non_negative("tax_rate", rate.value())
}

/// Validates a discount percentage, line or document level.
///
/// ## Rules
/// - Must be within 0..=100
///
/// ## User Workflow
/// ```text
/// User types 150 in the discount cell
///      │
///      ▼
/// validate_discount_percent ← THIS FUNCTION
///      │
///      ├── < 0 or > 100? → "discount_percent must be between 0 and 100"
///      │
///      └── OK → save proceeds
/// ```
pub fn validate_discount_percent(field: &str, discount: Percent) -> ValidationResult<()> {
    if discount < Percent::zero() || discount > Percent::hundred() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: Decimal::ZERO,
            max: Decimal::ONE_HUNDRED,
        });
    }
    Ok(())
}

/// Validates a payment amount.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }
    Ok(())
}

/// Validates every field of a line.
pub fn validate_line_item(line: &LineItem) -> ValidationResult<()> {
    validate_description(&line.description)?;
    validate_quantity(line.quantity)?;
    validate_unit_price(line.unit_price)?;
    validate_tax_rate(line.tax_rate)?;
    validate_discount_percent("discount_percent", line.discount_percent)
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a backend identifier (UUID).
///
/// ## Example
/// ```rust
/// use factura_core::validation::validate_uuid;
///
/// assert!(validate_uuid("client", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("client", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
