use crate::core::domain::error::ValidationError;

/// How far a single write may raise a placement group count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSize(i64);

impl StepSize {
    pub const DEFAULT: i64 = 10;

    pub fn new(step: i64) -> Result<Self, ValidationError> {
        validate_step_size(step)?;
        Ok(Self(step))
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl Default for StepSize {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Validates a step size. A step of zero would never converge.
pub(crate) fn validate_step_size(step: i64) -> Result<(), ValidationError> {
    if step <= 0 {
        return Err(ValidationError::Field {
            field: "delta".to_string(),
            message: "Delta must be greater then 0".to_string(),
        });
    }
    Ok(())
}
