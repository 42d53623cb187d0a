use crate::core::domain::error::ValidationError;
use std::fmt;

/// The placement group count a pool should end up with.
///
/// Always greater than zero and a power of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PgTarget(i64);

impl PgTarget {
    /// Validates and wraps a target placement group count.
    pub fn new(target: i64) -> Result<Self, ValidationError> {
        validate_pg_target(target)?;
        Ok(Self(target))
    }

    /// Returns the target count.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for PgTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reports whether `n` is a power of two. Zero and negative numbers never are.
pub fn is_power_of_two(n: i64) -> bool {
    n > 0 && (n as u64).is_power_of_two()
}

/// Validates a target placement group count.
pub(crate) fn validate_pg_target(target: i64) -> Result<(), ValidationError> {
    if !is_power_of_two(target) {
        return Err(ValidationError::ConstraintViolation(
            "Target PG number must be greater then 0 and a power of 2".to_string(),
        ));
    }
    Ok(())
}
