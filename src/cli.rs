mod battery;
mod driver;
mod plan;
mod planner;

use clap::{Parser, Subcommand};

pub use self::{
    battery::{BatteryArgs, BatteryPowerLimits},
    driver::{DriverArgs, SolarnetArgs},
    plan::{PlanArgs, plan},
    planner::PlannerArgs,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: plan the battery for the price forecast, and optionally push the plan.
    #[clap(name = "plan")]
    Plan(Box<PlanArgs>),

    /// Show the plan the battery is currently following.
    #[clap(name = "active")]
    Active(DriverArgs),

    /// Deactivate the schedule on the battery without removing it.
    #[clap(name = "stop")]
    Stop(DriverArgs),

    /// Remove the schedule from the battery.
    #[clap(name = "clear")]
    Clear(DriverArgs),
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use clap::CommandFactory;

    use super::*;
    use crate::{api::Driver, prelude::*, quantity::percent::Percent};

    #[test]
    fn test_command() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_plan() -> Result {
        let args = Args::try_parse_from([
            "battery-planner",
            "plan",
            "--forecast",
            "prices.toml",
            "--battery-capacity-watt-hours",
            "5000",
            "--soc-percent",
            "40",
            "--push",
            "--driver",
            "fronius-solarnet",
            "--solarnet-url",
            "http://192.168.1.20",
        ])?;
        let Command::Plan(args) = args.command else { bail!("expected the plan command") };
        assert!(args.push);
        assert_eq!(args.driver.driver, Driver::FroniusSolarnet);

        let battery = args.battery.battery();
        assert_abs_diff_eq!(battery.soc().0, 40.0);
        assert_eq!(battery.upper_soc_limit, Percent::HUNDRED);
        Ok(())
    }
}
