// ⚠️ Record Errors - validation rejections
//
// Every mutator in the record subsystem either succeeds completely or
// returns one of these without touching state. Lookup misses are Option::None,
// I/O problems are anyhow errors in the persistence layers.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("Payment of {attempted} exceeds outstanding amount {outstanding}")]
    Overpayment {
        attempted: Decimal,
        outstanding: Decimal,
    },

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: Decimal },

    #[error("Unknown course code: {code}")]
    UnknownCourse { code: String },

    #[error("Course code '{code}' already exists")]
    DuplicateCourse { code: String },

    #[error("Username '{username}' is already registered")]
    DuplicateUsername { username: String },

    #[error("Invalid {field}: must be non-empty and contain no whitespace")]
    InvalidCredential { field: &'static str },

    #[error("Identity '{username}' is not a {expected}")]
    RoleMismatch { username: String, expected: &'static str },

    #[error("Identity '{username}' has a {field} the flat-file layout cannot hold")]
    UnwritableField { username: String, field: &'static str },
}

impl RecordError {
    pub fn unknown_course(code: impl Into<String>) -> Self {
        Self::UnknownCourse { code: code.into() }
    }

    pub fn duplicate_course(code: impl Into<String>) -> Self {
        Self::DuplicateCourse { code: code.into() }
    }

    pub fn duplicate_username(username: impl Into<String>) -> Self {
        Self::DuplicateUsername {
            username: username.into(),
        }
    }

    pub fn unwritable_field(username: impl Into<String>, field: &'static str) -> Self {
        Self::UnwritableField {
            username: username.into(),
            field,
        }
    }

    /// True for rejections caused by money amounts (fee account)
    pub fn is_payment_rejection(&self) -> bool {
        matches!(
            self,
            RecordError::Overpayment { .. } | RecordError::InvalidAmount { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_messages() {
        let err = RecordError::Overpayment {
            attempted: dec!(250),
            outstanding: dec!(200),
        };
        assert_eq!(
            err.to_string(),
            "Payment of 250 exceeds outstanding amount 200"
        );

        let err = RecordError::unknown_course("CS101");
        assert_eq!(err.to_string(), "Unknown course code: CS101");

        let err = RecordError::InvalidCredential { field: "username" };
        assert!(err.to_string().contains("username"));

        let err = RecordError::unwritable_field("dana", "course");
        assert_eq!(
            err.to_string(),
            "Identity 'dana' has a course the flat-file layout cannot hold"
        );
    }

    #[test]
    fn test_is_payment_rejection() {
        assert!(RecordError::InvalidAmount { amount: dec!(-1) }.is_payment_rejection());
        assert!(!RecordError::duplicate_username("alice").is_payment_rejection());
    }
}
