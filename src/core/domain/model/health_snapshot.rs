//! Domain model for the output of `ceph health -f json`.
//!
//! Only the overall status and four operational checks matter for deciding
//! whether placement groups may be raised. Every other check is ignored.

use crate::core::domain::error::{RaiseError, RaiseResult};
use serde::{Deserialize, Deserializer};

/// Overall cluster health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum HealthStatus {
    Ok,
    Warn,
    Err,
}

impl TryFrom<String> for HealthStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "HEALTH_OK" => Ok(HealthStatus::Ok),
            "HEALTH_WARN" => Ok(HealthStatus::Warn),
            "HEALTH_ERR" => Ok(HealthStatus::Err),
            other => Err(format!("unknown health status {other:?}")),
        }
    }
}

/// Severity of a single health check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Severity {
    Warn,
    Err,
    /// Any severity string ceph may add later.
    Other(String),
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        match value.as_str() {
            "HEALTH_WARN" => Severity::Warn,
            "HEALTH_ERR" => Severity::Err,
            _ => Severity::Other(value),
        }
    }
}

/// A single entry under `checks`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthCheck {
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// The tracked checks. Unknown keys are dropped during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HealthChecks {
    /// Reduced data availability (inactive or down PGs).
    #[serde(rename = "PG_AVAILABILITY", default)]
    pub availability: Option<HealthCheck>,
    /// Degraded data redundancy.
    #[serde(rename = "PG_DEGRADED", default)]
    pub degraded: Option<HealthCheck>,
    /// Slow or blocked requests.
    #[serde(rename = "REQUEST_SLOW", default)]
    pub slow_requests: Option<HealthCheck>,
    /// Misplaced objects.
    #[serde(rename = "OBJECT_MISPLACED", default)]
    pub misplaced: Option<HealthCheck>,
}

impl HealthChecks {
    fn tracked(&self) -> [(&'static str, Option<&HealthCheck>); 4] {
        [
            ("PG_AVAILABILITY", self.availability.as_ref()),
            ("PG_DEGRADED", self.degraded.as_ref()),
            ("REQUEST_SLOW", self.slow_requests.as_ref()),
            ("OBJECT_MISPLACED", self.misplaced.as_ref()),
        ]
    }
}

/// A point-in-time cluster health report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthSnapshot {
    pub status: HealthStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub checks: HealthChecks,
}

/// Treats an explicit `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl HealthSnapshot {
    /// Decodes a snapshot from the JSON emitted by `ceph health -f json`.
    ///
    /// # Errors
    ///
    /// Returns `RaiseError::Malformed` with operation `health` when the input
    /// is not valid JSON, lacks `status`, or carries an unknown status.
    pub fn parse(bytes: &[u8]) -> RaiseResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| {
            RaiseError::malformed("health", format!("Could not unmarshal json: {e}. stopping."))
        })
    }

    /// Reports whether the cluster is healthy enough to raise placement groups.
    ///
    /// `HEALTH_OK` always passes and `HEALTH_ERR` always fails. Under
    /// `HEALTH_WARN` only the four tracked checks can block; a warning caused
    /// by anything else does not.
    pub fn is_safe_to_raise(&self) -> bool {
        match self.status {
            HealthStatus::Ok => true,
            HealthStatus::Err => false,
            HealthStatus::Warn => self.blocking_checks().is_empty(),
        }
    }

    /// Names of the tracked checks currently at `HEALTH_WARN`.
    pub fn blocking_checks(&self) -> Vec<&'static str> {
        self.checks
            .tracked()
            .into_iter()
            .filter(|(_, check)| {
                matches!(
                    check,
                    Some(HealthCheck {
                        severity: Some(Severity::Warn)
                    })
                )
            })
            .map(|(name, _)| name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEALTH_OK: &str = r#"{"checks": {}, "status": "HEALTH_OK"}"#;

    const HEALTH_ERR: &str = r#"{
        "checks": {
            "OSD_BACKFILLFULL": {"severity": "HEALTH_WARN", "summary": {"message": "1 backfillfull osd(s)"}},
            "OSD_FULL": {"severity": "HEALTH_ERR", "summary": {"message": "11 full osd(s)"}},
            "SMALLER_PGP_NUM": {"severity": "HEALTH_WARN", "summary": {"message": "1 pools have pg_num > pgp_num"}}
        },
        "status": "HEALTH_ERR"
    }"#;

    const HEALTH_WARN_UNTRACKED: &str = r#"{
        "checks": {
            "OSD_BACKFILLFULL": {"severity": "HEALTH_WARN", "summary": {"message": "1 backfillfull osd(s)"}},
            "OSD_NEARFULL": {"severity": "HEALTH_WARN", "summary": {"message": "21 nearfull osd(s)"}},
            "SMALLER_PGP_NUM": {"severity": "HEALTH_WARN", "summary": {"message": "1 pools have pg_num > pgp_num"}}
        },
        "status": "HEALTH_WARN"
    }"#;

    fn warn_with(check: &str) -> String {
        format!(
            r#"{{
                "checks": {{
                    "{check}": {{"severity": "HEALTH_WARN", "summary": {{"message": "blocked"}}}},
                    "SMALLER_PGP_NUM": {{"severity": "HEALTH_WARN", "summary": {{"message": "1 pools have pg_num > pgp_num"}}}}
                }},
                "status": "HEALTH_WARN"
            }}"#
        )
    }

    fn all_tracked(status: &str) -> String {
        format!(
            r#"{{
                "checks": {{
                    "PG_AVAILABILITY": {{"severity": "HEALTH_WARN"}},
                    "PG_DEGRADED": {{"severity": "HEALTH_WARN"}},
                    "REQUEST_SLOW": {{"severity": "HEALTH_WARN"}},
                    "OBJECT_MISPLACED": {{"severity": "HEALTH_WARN"}}
                }},
                "status": "{status}"
            }}"#
        )
    }

    fn safe(json: &str) -> bool {
        HealthSnapshot::parse(json.as_bytes())
            .unwrap()
            .is_safe_to_raise()
    }

    #[test]
    fn test_ok_is_safe_regardless_of_checks() {
        assert!(safe(HEALTH_OK));
        assert!(safe(&all_tracked("HEALTH_OK")));
    }

    #[test]
    fn test_err_is_unsafe_regardless_of_checks() {
        assert!(!safe(HEALTH_ERR));
        assert!(!safe(r#"{"status": "HEALTH_ERR"}"#));
    }

    #[test]
    fn test_warn_from_untracked_checks_is_safe() {
        assert!(safe(HEALTH_WARN_UNTRACKED));
    }

    #[test]
    fn test_warn_without_checks_is_safe() {
        assert!(safe(r#"{"status": "HEALTH_WARN"}"#));
        assert!(safe(r#"{"status": "HEALTH_WARN", "checks": {}}"#));
    }

    #[test]
    fn test_warn_with_null_checks_is_safe() {
        let snapshot = HealthSnapshot::parse(br#"{"status":"HEALTH_WARN","checks":null}"#).unwrap();
        assert_eq!(snapshot.checks, HealthChecks::default());
        assert!(snapshot.is_safe_to_raise());
        assert!(!safe(r#"{"status":"HEALTH_ERR","checks":null}"#));
    }

    #[test]
    fn test_null_tracked_check_is_absent() {
        assert!(safe(
            r#"{"status":"HEALTH_WARN","checks":{"PG_DEGRADED":null,"REQUEST_SLOW":{"severity":null}}}"#
        ));
    }

    #[test]
    fn test_each_tracked_check_blocks_under_warn() {
        for check in [
            "PG_AVAILABILITY",
            "PG_DEGRADED",
            "REQUEST_SLOW",
            "OBJECT_MISPLACED",
        ] {
            let snapshot = HealthSnapshot::parse(warn_with(check).as_bytes()).unwrap();
            assert!(!snapshot.is_safe_to_raise(), "{check} should block");
            assert_eq!(snapshot.blocking_checks(), vec![check]);
        }
    }

    #[test]
    fn test_all_tracked_checks_block_under_warn() {
        let snapshot = HealthSnapshot::parse(all_tracked("HEALTH_WARN").as_bytes()).unwrap();
        assert!(!snapshot.is_safe_to_raise());
        assert_eq!(snapshot.blocking_checks().len(), 4);
    }

    #[test]
    fn test_tracked_check_at_other_severity_does_not_block() {
        let json = r#"{
            "checks": {"PG_DEGRADED": {"severity": "HEALTH_OK"}, "REQUEST_SLOW": {}},
            "status": "HEALTH_WARN"
        }"#;
        let snapshot = HealthSnapshot::parse(json.as_bytes()).unwrap();
        assert_eq!(
            snapshot.checks.degraded,
            Some(HealthCheck {
                severity: Some(Severity::Other("HEALTH_OK".to_string()))
            })
        );
        assert!(snapshot.is_safe_to_raise());
    }

    #[test]
    fn test_malformed_snapshot_is_rejected() {
        for json in ["", "not json", "{}", r#"{"status": "HEALTH_MAYBE"}"#] {
            let err = HealthSnapshot::parse(json.as_bytes()).unwrap_err();
            assert_eq!(err.operation(), "health");
            assert!(matches!(err, RaiseError::Malformed { .. }));
        }
    }
}
