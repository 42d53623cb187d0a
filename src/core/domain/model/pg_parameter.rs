//! The two pool parameters raised by this crate.

use std::fmt;

/// A placement group parameter of a pool.
///
/// `pgp_num` depends on `pg_num` and is only raised once `pg_num` has reached
/// its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PgParameter {
    /// `pg_num`, the number of placement groups.
    PgNum,
    /// `pgp_num`, the number of placement groups used for placement.
    PgpNum,
}

impl PgParameter {
    /// Phases in the order they must be run.
    pub const PHASES: [PgParameter; 2] = [PgParameter::PgNum, PgParameter::PgpNum];

    /// Returns the name ceph uses for this parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            PgParameter::PgNum => "pg_num",
            PgParameter::PgpNum => "pgp_num",
        }
    }
}

impl fmt::Display for PgParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
