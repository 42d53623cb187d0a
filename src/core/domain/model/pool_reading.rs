//! Domain model for the output of `ceph osd pool get <pool> <param> -f json`.

use crate::core::domain::{
    error::{RaiseError, RaiseResult},
    model::pg_parameter::PgParameter,
    value_object::PoolName,
};
use serde_json::{Map, Value};

/// Extracts the current value of `parameter` from a pool parameter read.
///
/// The payload looks like `{"pool":"data","pool_id":22,"pg_num":1024}`; keys
/// other than the requested parameter are ignored.
///
/// # Errors
///
/// Returns `RaiseError::Malformed` with operation `get` when the payload is not
/// a JSON object, the parameter is missing, or its value is not a
/// non-negative integer.
pub fn parse_pool_parameter(
    bytes: &[u8],
    pool: &PoolName,
    parameter: PgParameter,
) -> RaiseResult<i64> {
    let fields: Map<String, Value> = serde_json::from_slice(bytes)
        .map_err(|e| RaiseError::malformed("get", format!("Could not unmarshal json: {e}")))?;

    let value = fields.get(parameter.as_str()).ok_or_else(|| {
        RaiseError::malformed("get", format!("Error in getting {parameter} of {pool}"))
    })?;

    value
        .as_i64()
        .filter(|v| *v >= 0)
        .ok_or_else(|| {
            RaiseError::malformed(
                "get",
                format!("Unexpected value {value} for {parameter} of {pool}"),
            )
        })
}
