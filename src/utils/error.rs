use crate::domain::model::{Amount, TaxIdKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid {kind}: {value}")]
    InvalidTaxId { kind: TaxIdKind, value: String },

    #[error("{kind} already registered: {value}")]
    DuplicateTaxId { kind: TaxIdKind, value: String },

    #[error("Company not found: {id}")]
    CompanyNotFound { id: String },

    #[error("Customer not found: {id}")]
    CustomerNotFound { id: String },

    #[error("Identifier already in use: {id}")]
    DuplicateId { id: String },

    #[error("Insufficient balance for company {company_id}: required {required}, available {available}")]
    InsufficientBalance {
        company_id: String,
        required: Amount,
        available: Amount,
    },

    #[error("Balance arithmetic overflow for company {company_id}")]
    AmountOverflow { company_id: String },

    #[error("Company {company_id} was modified concurrently: expected version {expected}, found {found}")]
    VersionConflict {
        company_id: String,
        expected: u64,
        found: u64,
    },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required field: {field}")]
    MissingFieldError { field: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Business,
    Concurrency,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl LedgerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LedgerError::InvalidTaxId { .. }
            | LedgerError::DuplicateTaxId { .. }
            | LedgerError::InvalidValueError { .. }
            | LedgerError::MissingFieldError { .. } => ErrorCategory::Validation,
            LedgerError::CompanyNotFound { .. } | LedgerError::CustomerNotFound { .. } => {
                ErrorCategory::NotFound
            }
            LedgerError::InsufficientBalance { .. } | LedgerError::AmountOverflow { .. } => {
                ErrorCategory::Business
            }
            LedgerError::VersionConflict { .. } => ErrorCategory::Concurrency,
            LedgerError::ConfigError { .. } | LedgerError::ConfigValidationError { .. } => {
                ErrorCategory::Configuration
            }
            LedgerError::DuplicateId { .. }
            | LedgerError::IoError(_)
            | LedgerError::SerializationError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::NotFound | ErrorCategory::Business => {
                ErrorSeverity::High
            }
            ErrorCategory::Concurrency => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn is_insufficient_balance(&self) -> bool {
        matches!(self, LedgerError::InsufficientBalance { .. })
    }

    /// Message safe to show to whoever issued the request.
    pub fn user_friendly_message(&self) -> String {
        match self {
            LedgerError::InvalidTaxId { kind, .. } => format!("Provide a valid {}!", kind),
            LedgerError::DuplicateTaxId { kind, .. } => {
                format!("{} is invalid or already registered, check it and try again!", kind)
            }
            LedgerError::CompanyNotFound { .. } => {
                "Company not found, check the ID and try again!".to_string()
            }
            LedgerError::CustomerNotFound { .. } => {
                "Customer not found, check the ID and try again!".to_string()
            }
            LedgerError::InsufficientBalance { .. } => {
                "Insufficient balance for withdrawal! Check the amount and try again.".to_string()
            }
            LedgerError::AmountOverflow { .. } => {
                "The amount is too large to be applied to this balance.".to_string()
            }
            LedgerError::VersionConflict { .. } => {
                "The company balance changed while the operation was running.".to_string()
            }
            LedgerError::InvalidValueError { field, reason, .. } => {
                format!("{}: {}", field, reason)
            }
            LedgerError::MissingFieldError { field } => format!("{} must not be blank", field),
            LedgerError::ConfigError { .. } | LedgerError::ConfigValidationError { .. } => {
                format!("Configuration problem: {}", self)
            }
            LedgerError::DuplicateId { .. }
            | LedgerError::IoError(_)
            | LedgerError::SerializationError(_) => {
                format!("Storage problem: {}", self)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "Fix the highlighted input and submit it again",
            ErrorCategory::NotFound => "Check the ID returned when the record was registered",
            ErrorCategory::Business => "Use a smaller amount or credit the company first",
            ErrorCategory::Concurrency => "Repeat the operation; another writer updated the balance",
            ErrorCategory::Configuration => "Check the TOML configuration file and CLI overrides",
            ErrorCategory::Storage => "Check that the store file is readable and holds valid JSON",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insufficient_balance_display() {
        let err = LedgerError::InsufficientBalance {
            company_id: "c-1".to_string(),
            required: dec!(51),
            available: dec!(50),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance for company c-1: required 51, available 50"
        );
        assert!(err.is_insufficient_balance());
        assert_eq!(err.category(), ErrorCategory::Business);
    }

    #[test]
    fn test_tax_id_errors_are_validation() {
        let err = LedgerError::InvalidTaxId {
            kind: TaxIdKind::Cpf,
            value: "123".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid CPF: 123");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.user_friendly_message(), "Provide a valid CPF!");
        assert!(!err.is_insufficient_balance());
    }

    #[test]
    fn test_severity_ordering() {
        let storage = LedgerError::IoError(std::io::Error::other("disk"));
        let conflict = LedgerError::VersionConflict {
            company_id: "c-1".to_string(),
            expected: 1,
            found: 2,
        };
        assert_eq!(storage.severity(), ErrorSeverity::Critical);
        assert!(conflict.severity() < storage.severity());
    }

    #[test]
    fn test_every_error_maps_to_a_failing_severity() {
        let errors = [
            LedgerError::MissingFieldError {
                field: "name".to_string(),
            },
            LedgerError::CompanyNotFound {
                id: "c-1".to_string(),
            },
            LedgerError::AmountOverflow {
                company_id: "c-1".to_string(),
            },
            LedgerError::VersionConflict {
                company_id: "c-1".to_string(),
                expected: 1,
                found: 2,
            },
            LedgerError::ConfigError {
                message: "bad".to_string(),
            },
            LedgerError::DuplicateId {
                id: "c-1".to_string(),
            },
        ];
        for err in &errors {
            assert!(err.severity() >= ErrorSeverity::Medium, "{}", err);
        }
    }

    #[test]
    fn test_duplicate_id_is_storage() {
        let err = LedgerError::DuplicateId {
            id: "c-1".to_string(),
        };
        assert_eq!(err.to_string(), "Identifier already in use: c-1");
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
