use chrono::NaiveDate;
use clap::Parser;

use crate::{core::planner::Planner, quantity::rate::KilowattHourRate};

#[derive(Copy, Clone, Parser)]
pub struct PlannerArgs {
    /// Battery wear cost per cycled kilowatt-hour.
    #[clap(
        long = "battery-cycle-cost-per-kwh",
        default_value = "0",
        env = "BATTERY_CYCLE_COST_PER_KWH"
    )]
    pub battery_cycle_cost: KilowattHourRate,

    /// Minimal earnings per kilowatt-hour to bother charging.
    #[clap(long = "price-margin-per-kwh", default_value = "0", env = "PRICE_MARGIN_PER_KWH")]
    pub price_margin: KilowattHourRate,

    /// Charge below this import price even if there is no arbitrage opportunity.
    #[clap(
        long = "low-price-threshold-per-kwh",
        default_value = "0",
        env = "LOW_PRICE_THRESHOLD_PER_KWH"
    )]
    pub low_price_threshold: KilowattHourRate,

    /// Date of the first forecast price, today by default.
    #[clap(long = "date", env = "PLAN_DATE")]
    pub date: Option<NaiveDate>,
}

impl PlannerArgs {
    pub fn planner(self) -> Planner {
        Planner::builder()
            .battery_cycle_cost(self.battery_cycle_cost)
            .price_margin(self.price_margin)
            .low_price_threshold(self.low_price_threshold)
            .maybe_midnight(self.date)
            .build()
    }
}
