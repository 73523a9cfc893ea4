//! Billing error taxonomy.

use service_core::error::AppError;
use std::fmt;
use thiserror::Error;

/// Entity being normalized when a field was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Customer,
    Vehicle,
    Invoice,
    LineItem,
    ExtraCharge,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Customer => "customer",
            EntityKind::Vehicle => "vehicle",
            EntityKind::Invoice => "invoice",
            EntityKind::LineItem => "line item",
            EntityKind::ExtraCharge => "extra charge",
        };
        f.write_str(name)
    }
}

/// Errors that abort rendering a single invoice.
///
/// Neither is retryable: both mean the upstream record is bad.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    /// A required field is absent under every known alias.
    #[error("cannot render: missing {field}")]
    Normalization { entity: EntityKind, field: String },

    /// Negative quantity, price or charge, or a line discount above the line amount.
    #[error("cannot render: invalid amount for {field}: {value}")]
    InvalidAmount { field: String, value: String },
}

impl BillingError {
    pub fn missing(entity: EntityKind, field: impl Into<String>) -> Self {
        BillingError::Normalization {
            entity,
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, value: impl ToString) -> Self {
        BillingError::InvalidAmount {
            field: field.into(),
            value: value.to_string(),
        }
    }

    /// Stable label used for error metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            BillingError::Normalization { .. } => "normalization",
            BillingError::InvalidAmount { .. } => "invalid_amount",
        }
    }
}

impl From<BillingError> for AppError {
    fn from(err: BillingError) -> Self {
        AppError::Unprocessable(anyhow::Error::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_message_names_field() {
        let err = BillingError::missing(EntityKind::Customer, "name");
        assert_eq!(err.to_string(), "cannot render: missing name");
    }

    #[test]
    fn test_converts_to_unprocessable() {
        let err: AppError = BillingError::invalid("labor_charges", "-5").into();
        assert!(matches!(err, AppError::Unprocessable(_)));
        assert_eq!(err.kind(), "unprocessable");
    }
}
