use thiserror::Error;

/// The main error type for placement group raising.
///
/// Every variant except `Validation` is fatal once the control loop has
/// started: nothing is retried and the process terminates.
#[derive(Error, Debug)]
pub enum RaiseError {
    /// Operator input failed validation before the loop started
    ///
    /// # Fields
    /// * `0` - The underlying validation error
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An external command could not be run or exited unsuccessfully
    ///
    /// # Fields
    /// * `operation` - Name of the failing operation (`health`, `get`, `set`)
    /// * `message` - What went wrong
    #[error("{operation}: {message}")]
    Command {
        operation: &'static str,
        message: String,
    },

    /// An external command answered with output that could not be decoded
    ///
    /// # Fields
    /// * `operation` - Name of the failing operation
    /// * `message` - Description of the decoding failure
    #[error("{operation}: {message}")]
    Malformed {
        operation: &'static str,
        message: String,
    },

    /// The process received an interrupt or termination signal
    #[error("interrupted")]
    Interrupted,
}

impl RaiseError {
    /// Returns the name of the operation that produced this error.
    pub fn operation(&self) -> &'static str {
        match self {
            RaiseError::Validation(_) => "config",
            RaiseError::Command { operation, .. } | RaiseError::Malformed { operation, .. } => {
                operation
            }
            RaiseError::Interrupted => "signal",
        }
    }

    pub(crate) fn command(operation: &'static str, message: impl Into<String>) -> Self {
        RaiseError::Command {
            operation,
            message: message.into(),
        }
    }

    pub(crate) fn malformed(operation: &'static str, message: impl Into<String>) -> Self {
        RaiseError::Malformed {
            operation,
            message: message.into(),
        }
    }
}

/// Specialized error type for validation failures.
///
/// This enum provides detailed context about why operator input was
/// rejected: either a specific field or a domain constraint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents violations of domain constraints
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

impl ValidationError {
    /// Returns the operator-facing message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            ValidationError::Field { message, .. } => message,
            ValidationError::ConstraintViolation(message) => message,
        }
    }
}

/// Type alias for Results that may fail with a RaiseError
pub type RaiseResult<T> = Result<T, RaiseError>;
