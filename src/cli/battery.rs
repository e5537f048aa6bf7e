//! Battery-related CLI arguments.

use clap::Parser;

use crate::{
    core::battery::Battery,
    quantity::{energy::WattHours, percent::Percent, power::Watts, rate::KilowattHourRate},
};

#[must_use]
#[derive(Copy, Clone, Parser)]
pub struct BatteryArgs {
    /// Usable battery capacity in watt-hours.
    #[clap(long = "battery-capacity-watt-hours", env = "BATTERY_CAPACITY_WATT_HOURS")]
    pub capacity: WattHours,

    #[clap(flatten)]
    pub power_limits: BatteryPowerLimits,

    /// Minimal state-of-charge percent.
    #[clap(long = "min-soc-percent", default_value = "0", env = "MIN_SOC_PERCENT")]
    pub min_soc: Percent,

    /// Maximal state-of-charge percent.
    #[clap(long = "max-soc-percent", default_value = "100", env = "MAX_SOC_PERCENT")]
    pub max_soc: Percent,

    /// Current state-of-charge percent.
    #[clap(long = "soc-percent", default_value = "0", env = "SOC_PERCENT")]
    pub soc: Percent,

    /// Average price paid for the energy that is currently stored.
    #[clap(
        long = "average-charge-cost-per-kwh",
        default_value = "0",
        env = "AVERAGE_CHARGE_COST_PER_KWH"
    )]
    pub average_charge_cost: KilowattHourRate,
}

impl BatteryArgs {
    pub fn battery(self) -> Battery {
        let mut battery = Battery::builder()
            .capacity(self.capacity)
            .max_charge_power(self.power_limits.charging)
            .max_discharge_power(self.power_limits.discharging)
            .lower_soc_limit(self.min_soc)
            .upper_soc_limit(self.max_soc)
            .average_charge_cost(self.average_charge_cost)
            .build();
        battery.set_soc(self.soc);
        battery
    }
}

#[must_use]
#[derive(Copy, Clone, Parser)]
pub struct BatteryPowerLimits {
    /// Charging power in watts.
    #[clap(long = "charging-power-watts", default_value = "1000", env = "CHARGING_POWER_WATTS")]
    pub charging: Watts,

    /// Discharging power in watts.
    #[clap(
        long = "discharging-power-watts",
        default_value = "1000",
        env = "DISCHARGING_POWER_WATTS"
    )]
    pub discharging: Watts,
}
