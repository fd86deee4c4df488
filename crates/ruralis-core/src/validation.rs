//! # Validation Module
//!
//! Input validation for Ruralis requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum Json)                                   │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Empty / length checks on text                                     │
//! │  └── Finite, positive, non-negative checks on numbers                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── UNIQUE (users.email)                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ruralis_core::validation::{validate_email, validate_application};
//! use ruralis_core::ApplicationRequest;
//!
//! assert!(validate_email("ana@campo.com.ar").is_ok());
//! assert!(validate_application(&ApplicationRequest::new(2.0, 10.0)).is_ok());
//! assert!(validate_application(&ApplicationRequest::new(0.0, 10.0)).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{ApplicationRequest, NewAgrochemical, NewUser};
use crate::MAX_NAME_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum email length (RFC 5321 path limit).
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum unit label length.
const MAX_UNIT_LENGTH: usize = 50;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a user's display name.
pub fn validate_user_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_NAME_LENGTH)
}

/// Validates an email address.
///
/// ## Rules
/// - Not empty, at most 254 characters
/// - Exactly one `@`, with text on both sides
/// - No whitespace
///
/// Deliverability is not checked.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_text("email", email, MAX_EMAIL_LENGTH)?;

    let email = email.trim();
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(invalid("must look like user@domain")),
    }
}

/// Validates an agrochemical name.
pub fn validate_agrochemical_name(name: &str) -> ValidationResult<()> {
    validate_text("nombre", name, MAX_NAME_LENGTH)
}

/// Validates a unit label ("L", "kg", ...).
pub fn validate_unit(unit: &str) -> ValidationResult<()> {
    validate_text("unidad", unit, MAX_UNIT_LENGTH)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Requires a finite value `>= 0`.
///
/// ## Example
/// ```rust
/// use ruralis_core::validation::validate_non_negative;
///
/// assert!(validate_non_negative("cantidad", 0.0).is_ok());
/// assert!(validate_non_negative("cantidad", -1.0).is_err());
/// assert!(validate_non_negative("cantidad", f64::NAN).is_err());
/// ```
pub fn validate_non_negative(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Requires a finite value `> 0`.
pub fn validate_positive(field: &str, value: f64) -> ValidationResult<()> {
    validate_non_negative(field, value)?;

    if value == 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Request Validators
// =============================================================================

/// Validates a user creation request.
pub fn validate_new_user(user: &NewUser) -> ValidationResult<()> {
    validate_user_name(&user.name)?;
    validate_email(&user.email)
}

/// Validates an agrochemical creation request.
pub fn validate_new_agrochemical(agro: &NewAgrochemical) -> ValidationResult<()> {
    validate_agrochemical_name(&agro.name)?;
    validate_unit(&agro.unit)?;
    validate_non_negative("cantidad", agro.quantity)?;
    validate_non_negative("precio_unitario", agro.unit_price)
}

/// Validates an application request.
///
/// ## Rules
/// - Dose and hectares are finite and strictly positive
/// - Their product is finite (no overflow to infinity)
pub fn validate_application(request: &ApplicationRequest) -> ValidationResult<()> {
    validate_positive("dosis_por_ha", request.dose_per_hectare)?;
    validate_positive("hectareas", request.hectares)?;

    if !request.quantity_needed().is_finite() {
        return Err(ValidationError::NotFinite {
            field: "dosis_por_ha × hectareas".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Currency;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana@campo.com.ar").is_ok());
        assert!(validate_email("  ana@campo.com.ar ").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("ana").is_err());
        assert!(validate_email("@campo.com").is_err());
        assert!(validate_email("ana@").is_err());
        assert!(validate_email("ana@b@c").is_err());
        assert!(validate_email("ana maria@campo.com").is_err());
        assert!(validate_email(&format!("{}@x.com", "a".repeat(260))).is_err());
    }

    #[test]
    fn test_validate_names() {
        assert!(validate_user_name("Ana").is_ok());
        assert!(validate_user_name("   ").is_err());
        assert!(validate_agrochemical_name(&"G".repeat(201)).is_err());
        assert!(validate_unit("kg").is_ok());
        assert!(validate_unit("").is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("dosis", 0.5).is_ok());
        assert!(matches!(
            validate_positive("dosis", 0.0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_positive("dosis", -2.0),
            Err(ValidationError::MustNotBeNegative { .. })
        ));
        assert!(matches!(
            validate_positive("dosis", f64::INFINITY),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_validate_new_agrochemical() {
        let mut agro = NewAgrochemical {
            name: "Atrazina".to_string(),
            quantity: 0.0,
            unit: "kg".to_string(),
            unit_price: 12.0,
            currency: Currency::Usd,
        };
        assert!(validate_new_agrochemical(&agro).is_ok());

        agro.quantity = -1.0;
        assert!(validate_new_agrochemical(&agro).is_err());

        agro.quantity = 10.0;
        agro.unit_price = f64::NAN;
        assert!(validate_new_agrochemical(&agro).is_err());
    }

    #[test]
    fn test_validate_application_overflow() {
        let request = ApplicationRequest::new(f64::MAX, 10.0);
        assert!(matches!(
            validate_application(&request),
            Err(ValidationError::NotFinite { .. })
        ));
    }
}
