pub mod battery;
pub mod charge_hour;
pub mod charge_plan;
pub mod error;
pub mod planner;
