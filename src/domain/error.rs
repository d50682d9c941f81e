//! Domain errors

use thiserror::Error;

use super::booking::BookingStep;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A wizard step was reached before its prerequisite; `step` is the
    /// earliest step that still has to be completed.
    #[error("Booking step not available yet, complete {step} first")]
    PrerequisiteMissing { step: BookingStep },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    /// Whether the user can fix this by resubmitting the form.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Conflict(_) | Self::Unauthorized(_)
        )
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
