//! # Validation Module
//!
//! Input validation utilities for Tally POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end                                                     │
//! │  ├── Digits-only code entry, disabled buttons                          │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Register command (Rust)                                      │
//! │  └── THIS MODULE: catalog / staff / settings rules                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Order session                                                │
//! │  └── Index bounds, addon selection, empty-order submit                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{validate_access_code, validate_name};
//!
//! validate_access_code("1111").unwrap();
//! validate_name("shop_name", "Tally Coffee").unwrap();
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Product, Staff};
use crate::ACCESS_CODE_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (product, staff, category, option).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 100 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a staff access code.
///
/// ## Rules
/// - Exactly [`ACCESS_CODE_LEN`] characters
/// - ASCII digits only
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_access_code;
///
/// assert!(validate_access_code("0420").is_ok());
/// assert!(validate_access_code("42").is_err());
/// assert!(validate_access_code("12a4").is_err());
/// ```
pub fn validate_access_code(code: &str) -> ValidationResult<()> {
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "access code".to_string(),
        });
    }

    if code.len() != ACCESS_CODE_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "access code".to_string(),
            reason: format!("must be exactly {} digits", ACCESS_CODE_LEN),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a catalog price as entered on the product form.
///
/// ## Rules
/// - Must be strictly positive (a product cannot be saved at 0.00)
pub fn validate_product_price(price: Money) -> ValidationResult<()> {
    if price.cents() <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a product before it is written to the catalog.
///
/// ## Rules
/// - Id and name present, price positive
/// - Every addon category is named and offers at least one option
/// - Option ids are unique within their category
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    if product.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }
    validate_name("name", &product.name)?;
    validate_product_price(product.price)?;

    for category in &product.addon_categories {
        validate_name("addon category", &category.name)?;

        if category.options.is_empty() {
            return Err(ValidationError::Required {
                field: format!("{} options", category.name),
            });
        }

        let mut seen = HashSet::new();
        for option in &category.options {
            validate_name("addon option", &option.name)?;
            if !seen.insert(option.id.as_str()) {
                return Err(ValidationError::Duplicate {
                    field: format!("{} option id", category.name),
                    value: option.id.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Validates a staff roster before it is written.
///
/// ## Rules
/// - Every member has a name and a well-formed access code
/// - Access codes are unique (login resolves staff by code)
pub fn validate_staff_roster(staff: &[Staff]) -> ValidationResult<()> {
    let mut codes = HashSet::new();

    for member in staff {
        validate_name("staff name", &member.name)?;
        validate_access_code(&member.access_code)?;

        if !codes.insert(member.access_code.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "access code".to_string(),
                value: member.access_code.clone(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AddonCategory, AddonOption, StaffRole};

    fn staff(name: &str, code: &str) -> Staff {
        Staff {
            id: format!("w-{}", name),
            name: name.to_string(),
            access_code: code.to_string(),
            role: StaffRole::Staff,
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Latte").is_ok());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_access_code() {
        assert!(validate_access_code("1111").is_ok());
        assert!(validate_access_code("").is_err());
        assert!(validate_access_code("11111").is_err());
        assert!(validate_access_code("11 1").is_err());
    }

    #[test]
    fn test_validate_product() {
        let plain = Product::new("p1", "Espresso", Money::from_major(15));
        assert!(validate_product(&plain).is_ok());

        let free = Product::new("p2", "Water", Money::zero());
        assert!(validate_product(&free).is_err());

        let empty_category = plain.clone().with_addon_category(AddonCategory {
            id: "size".to_string(),
            name: "Size".to_string(),
            is_single_select: true,
            options: Vec::new(),
        });
        assert!(validate_product(&empty_category).is_err());
    }

    #[test]
    fn test_validate_product_rejects_duplicate_option_ids() {
        let option = AddonOption {
            id: "large".to_string(),
            name: "Large".to_string(),
            price_adjustment: Money::from_major(5),
        };
        let product = Product::new("p1", "Latte", Money::from_major(22)).with_addon_category(
            AddonCategory {
                id: "size".to_string(),
                name: "Size".to_string(),
                is_single_select: true,
                options: vec![option.clone(), option],
            },
        );
        assert!(matches!(
            validate_product(&product),
            Err(ValidationError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_validate_staff_roster_rejects_shared_codes() {
        let roster = vec![staff("Ahmed", "1111"), staff("Fatima", "1111")];
        assert!(matches!(
            validate_staff_roster(&roster),
            Err(ValidationError::Duplicate { .. })
        ));

        let roster = vec![staff("Ahmed", "1111"), staff("Fatima", "2222")];
        assert!(validate_staff_roster(&roster).is_ok());
    }
}
