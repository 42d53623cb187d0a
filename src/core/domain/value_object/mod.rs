mod pg_target;
mod pool_name;
mod step_size;

pub use pg_target::{PgTarget, is_power_of_two};
pub use pool_name::PoolName;
pub use step_size::StepSize;
