pub mod driver;
pub mod example;
pub mod solarnet;

pub use self::driver::{BatteryApi, Driver};
