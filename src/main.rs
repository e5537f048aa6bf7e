use battery_planner::{
    cli::{Args, Command, plan},
    prelude::*,
    tables::build_plan_table,
};
use clap::{Parser, crate_version};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Plan(args) => {
            plan(&args).await?;
        }

        Command::Active(args) => {
            let plan = args.connect()?.active_plan().await?;
            println!("{}", build_plan_table(&plan));
        }

        Command::Stop(args) => {
            args.connect()?.stop().await?;
        }

        Command::Clear(args) => {
            args.connect()?.clear().await?;
        }
    }

    Ok(())
}
