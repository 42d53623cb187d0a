use crate::core::domain::error::ValidationError;
use std::fmt;

/// A validated Ceph pool name.
///
/// The name is opaque to this crate; it is handed verbatim to the `ceph`
/// command line and only has to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolName(String);

impl PoolName {
    /// Validates and wraps a pool name.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_pool_name(&name)?;
        Ok(Self(name))
    }

    /// Creates a new pool name without validation.
    #[allow(unused)]
    pub(crate) fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the pool name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates a pool name.
pub(crate) fn validate_pool_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::Field {
            field: "pool".to_string(),
            message: "A pool name must be provided.".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pool_name_valid() {
        assert!(validate_pool_name("data").is_ok());
        assert!(validate_pool_name("cephfs_data").is_ok());
        assert!(validate_pool_name("rbd.ssd-01").is_ok());
    }

    #[test]
    fn test_validate_pool_name_empty() {
        assert!(validate_pool_name("").is_err());
        assert!(validate_pool_name("   ").is_err());
    }

    #[test]
    fn test_pool_name_keeps_value() {
        let pool = PoolName::new("my_fancy_pool").unwrap();
        assert_eq!(pool.as_str(), "my_fancy_pool");
        assert_eq!(pool.to_string(), "my_fancy_pool");
    }
}
