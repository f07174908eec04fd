//! Condition providers reading the injected [`Clock`](crate::Clock).

mod later_than;
mod week_day;

pub use later_than::LaterThan;
pub use week_day::WeekDay;
