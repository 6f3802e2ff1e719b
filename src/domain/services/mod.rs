pub mod availability;
pub mod capacity;
pub mod pricing;
pub mod schedule_time;
pub mod schedule_validator;
