use std::path::PathBuf;

use clap::Parser;

use crate::{
    cli::{BatteryArgs, DriverArgs, PlannerArgs},
    forecast::Forecast,
    prelude::*,
    tables::build_plan_table,
};

#[derive(Parser)]
pub struct PlanArgs {
    /// TOML file with the `import` and `export` price forecast.
    #[clap(long = "forecast", env = "FORECAST_PATH")]
    pub forecast_path: PathBuf,

    /// Print the plan as JSON instead of the table.
    #[clap(long)]
    pub json: bool,

    /// Push the plan to the battery.
    #[clap(long)]
    pub push: bool,

    #[clap(flatten)]
    pub battery: BatteryArgs,

    #[clap(flatten)]
    pub planner: PlannerArgs,

    #[clap(flatten)]
    pub driver: DriverArgs,
}

#[instrument(skip_all)]
pub async fn plan(args: &PlanArgs) -> Result {
    let forecast = Forecast::read_from(&args.forecast_path)?;
    info!(n_hours = forecast.import.len(), start_hour = forecast.start_hour, "loaded the forecast");

    let battery = args.battery.battery();
    let plan = args.planner.planner().create_price_arbitrage_plan(
        &battery,
        &forecast.import,
        &forecast.export,
        forecast.start_hour,
    )?;
    info!(
        expected_yield = ?plan.expected_yield(),
        average_charging_price = ?plan.average_charging_price(),
        "planned",
    );

    if args.json {
        println!("{}", plan.to_json()?);
    } else {
        println!("{}", build_plan_table(&plan));
    }

    if args.push {
        args.driver.connect()?.schedule(&plan).await?;
    }
    Ok(())
}
