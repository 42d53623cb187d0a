pub mod health_snapshot;
pub mod pg_parameter;
pub mod pool_reading;
